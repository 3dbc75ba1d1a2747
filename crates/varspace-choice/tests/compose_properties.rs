use std::sync::Arc;

use proptest::prelude::*;
use varspace_choice::{
    ChoiceEngine, ChoicePolicy, ChoiceRequest, FnVariant, SearchSpaceUpdates, VariantRegistry,
    CHOICE_PARAMETER,
};
use varspace_core::{DatasetProperties, VarspaceError};
use varspace_space::{resolve_space, OverrideRecord, ParamSpec};

const NAMES: [&str; 4] = ["Alpha", "Beta", "Gamma", "Noop"];

fn engine() -> ChoiceEngine {
    let variants = NAMES.iter().map(|name| {
        FnVariant::new(*name)
            .with_sub_space(|_, overrides| {
                resolve_space(&[ParamSpec::int("depth", 1, 8, 3)], overrides)
            })
            .shared()
    });
    let registry = Arc::new(VariantRegistry::with_builtins(variants).unwrap());
    ChoiceEngine::new(registry, ChoicePolicy::new(NAMES, "Noop"))
}

fn props(numerical: usize) -> DatasetProperties {
    DatasetProperties::tabular((0..numerical).map(|idx| format!("n{idx}")), ["c0"])
}

proptest! {
    #[test]
    fn numeric_data_offers_every_variant(numerical in 1usize..6, seed in any::<u64>()) {
        let mut engine = engine();
        let space = engine.compose(&props(numerical), &ChoiceRequest::default()).unwrap();
        for name in NAMES {
            let key = format!("{name}.depth");
            prop_assert!(space.get(&key).is_some());
        }
        for config in space.sample_configurations(8, seed) {
            prop_assert!(space.check_configuration(&config).is_ok());
            prop_assert_eq!(config.len(), 2);
        }
    }

    #[test]
    fn repeated_composition_is_identical(
        excluded in prop::sample::subsequence(NAMES.to_vec(), 0..3),
    ) {
        let mut engine = engine();
        let request = ChoiceRequest::default().with_exclude(excluded);
        let first = engine.compose(&props(2), &request).unwrap();
        let second = engine.compose(&props(2), &request).unwrap();
        prop_assert_eq!(first.canonical_hash().unwrap(), second.canonical_hash().unwrap());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn non_subset_override_fails_without_caching(extra in "[A-Z][a-z]{3,8}") {
        prop_assume!(!NAMES.contains(&extra.as_str()));
        let updates = SearchSpaceUpdates::new()
            .with("", OverrideRecord::new(["Alpha".to_string(), extra.clone()], "Alpha"))
            .unwrap();
        let mut engine = engine().with_updates(updates);
        let err = engine.compose(&props(1), &ChoiceRequest::default()).unwrap_err();
        prop_assert!(matches!(err, VarspaceError::InvalidOverrideDomain(_)));
        prop_assert!(engine.configuration_space().is_none());
        prop_assert_eq!(engine.registry().all().len(), NAMES.len());
    }

    #[test]
    fn categorical_data_only_offers_no_op(categorical in 0usize..4) {
        let mut engine = engine();
        let props = DatasetProperties::tabular(
            Vec::<String>::new(),
            (0..categorical).map(|idx| format!("c{idx}")),
        );
        let space = engine.compose(&props, &ChoiceRequest::default()).unwrap();
        let config = space.default_configuration();
        prop_assert_eq!(config.get_str(CHOICE_PARAMETER), Some("Noop"));
        prop_assert!(space.get("Alpha.depth").is_none());
    }
}
