use std::sync::Arc;
use std::thread;

use varspace_choice::{FnVariant, VariantRegistry};
use varspace_core::{DatasetProperties, VarspaceError};

fn builtins() -> VariantRegistry {
    VariantRegistry::with_builtins([
        FnVariant::new("Alpha").shared(),
        FnVariant::new("Beta").shared(),
    ])
    .expect("valid builtins")
}

#[test]
fn builtins_come_first_and_addons_append() {
    let registry = builtins();
    registry.register(FnVariant::new("Gamma").shared()).unwrap();
    assert_eq!(registry.all().names(), ["Alpha", "Beta", "Gamma"]);
    assert_eq!(registry.builtin_names(), ["Alpha", "Beta"]);
}

#[test]
fn addon_replaces_builtin_in_place() {
    let registry = builtins();
    registry
        .register(
            FnVariant::new("Alpha")
                .with_predicate(|_| false)
                .shared(),
        )
        .unwrap();
    let all = registry.all();
    assert_eq!(all.names(), ["Alpha", "Beta"]);
    let props = DatasetProperties::tabular(["x"], Vec::<&str>::new());
    assert!(!all.get("Alpha").unwrap().is_applicable(&props));
}

#[test]
fn last_registration_wins() {
    let registry = VariantRegistry::new();
    registry.register(FnVariant::new("Custom").shared()).unwrap();
    registry
        .register(FnVariant::new("Custom").with_predicate(|_| false).shared())
        .unwrap();
    let all = registry.all();
    assert_eq!(all.len(), 1);
    let props = DatasetProperties::tabular(["x"], Vec::<&str>::new());
    assert!(!all.get("Custom").unwrap().is_applicable(&props));
}

#[test]
fn invalid_names_fail_at_registration() {
    let registry = VariantRegistry::new();
    let err = registry.register(FnVariant::new("").shared()).unwrap_err();
    assert!(matches!(err, VarspaceError::Registration(_)));
    let err = registry
        .register(FnVariant::new("Robust.v2").shared())
        .unwrap_err();
    assert_eq!(err.info().code, "varspace_choice.variant_name_separator");
    assert!(registry.all().is_empty());

    let err = VariantRegistry::with_builtins([
        FnVariant::new("Alpha").shared(),
        FnVariant::new("Alpha").shared(),
    ])
    .unwrap_err();
    assert_eq!(err.info().code, "varspace_choice.duplicate_builtin");
}

#[test]
fn concurrent_registrations_are_serialized() {
    let registry = Arc::new(builtins());
    let handles: Vec<_> = (0..8)
        .map(|idx| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry
                    .register(FnVariant::new(format!("Addon{idx}")).shared())
                    .expect("register");
                let snapshot = registry.all();
                assert!(snapshot.contains(&format!("Addon{idx}")));
                assert_eq!(&snapshot.names()[..2], ["Alpha", "Beta"]);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread");
    }
    assert_eq!(registry.all().len(), 10);
}
