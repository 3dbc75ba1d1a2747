use varspace_core::errors::{ErrorInfo, VarspaceError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("variant", "StandardScaler")
        .with_list("expected", ["NoScaler"])
}

#[test]
fn override_domain_surface() {
    let err = VarspaceError::InvalidOverrideDomain(sample_info("O001", "not a subset"));
    assert_eq!(err.info().code, "O001");
    assert_eq!(err.info().context["expected"], "[NoScaler]");
}

#[test]
fn display_renders_context_and_hint() {
    let err = VarspaceError::NoDefaultFound(
        sample_info("D001", "scan exhausted").with_hint("pass an explicit default"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("no default found: scan exhausted (code: D001)"));
    assert!(rendered.contains("variant=StandardScaler"));
    assert!(rendered.ends_with("| hint: pass an explicit default"));
}

#[test]
fn errors_serialize_with_kind_tag() {
    let err = VarspaceError::Space(ErrorInfo::new("S001", "duplicate name"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["kind"], "Space");
    assert_eq!(json["detail"]["code"], "S001");
    let back: VarspaceError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, err);
}
