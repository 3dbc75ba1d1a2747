use std::fs;

use varspace_choice::{load_choice_config, ChoiceConfig, OverridePath};
use varspace_core::{ParamValue, VarspaceError};

const CONFIG: &str = r#"
include: [StandardScaler, RobustScaler]
default: RobustScaler
updates:
  "":
    value_range: [RobustScaler]
    default_value: RobustScaler
  RobustScaler.q_min:
    value_range: [0.1, 0.3]
    default_value: 0.2
    log: true
"#;

#[test]
fn config_loads_request_and_updates() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("choice.yaml");
    fs::write(&path, CONFIG).expect("write fixture");

    let config = load_choice_config(&path).expect("config loads");
    assert_eq!(config.request.include, ["StandardScaler", "RobustScaler"]);
    assert!(config.request.exclude.is_empty());
    assert_eq!(config.request.default.as_deref(), Some("RobustScaler"));

    let choice = config.updates.choice().expect("choice override");
    assert_eq!(choice.value_range, [ParamValue::from("RobustScaler")]);
    let nested = config.updates.nested_for("RobustScaler");
    assert_eq!(nested["q_min"].default_value, ParamValue::Float(0.2));
    assert!(nested["q_min"].log);
}

#[test]
fn config_roundtrips_through_yaml() {
    let config: ChoiceConfig = serde_yaml::from_str(CONFIG).expect("parse");
    let rendered = config.to_yaml_string().expect("render");
    let reparsed: ChoiceConfig = serde_yaml::from_str(&rendered).expect("reparse");
    assert_eq!(reparsed, config);
}

#[test]
fn malformed_override_key_is_rejected() {
    let yaml = "updates:\n  RobustScaler:\n    value_range: [1]\n    default_value: 1\n";
    assert!(serde_yaml::from_str::<ChoiceConfig>(yaml).is_err());
    assert!("RobustScaler".parse::<OverridePath>().is_err());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.yaml");
    match load_choice_config(&path) {
        Err(VarspaceError::Serde(info)) => {
            assert_eq!(info.code, "varspace_choice.config_read");
            assert!(info.context["path"].ends_with("absent.yaml"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
