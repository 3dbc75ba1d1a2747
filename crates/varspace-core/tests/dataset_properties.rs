use serde_json::json;
use varspace_core::{check_dataset_properties, DatasetProperties, VarspaceError};

#[test]
fn tabular_bag_passes_validation() {
    let props = DatasetProperties::tabular(["c1", "c2"], Vec::<&str>::new());
    check_dataset_properties(&props).expect("valid");
    assert_eq!(props.numerical_columns().len(), 2);
    assert!(props.categorical_columns().is_empty());
    assert!(props.has_numerical_columns());
    assert!(!props.is_sparse());
}

#[test]
fn missing_keys_are_reported() {
    let props = DatasetProperties::new().with("numerical_columns", json!([0, 1]));
    let err = check_dataset_properties(&props).expect_err("categorical listing missing");
    match &err {
        VarspaceError::MissingDatasetProperty(info) => {
            assert_eq!(info.context["missing"], "[categorical_columns]");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_sequence_columns_count_as_empty() {
    let props = DatasetProperties::new()
        .with("numerical_columns", json!(null))
        .with("categorical_columns", json!(["c1"]));
    check_dataset_properties(&props).expect("keys present");
    assert!(!props.has_numerical_columns());
}

#[test]
fn overlay_keys_win_when_merging() {
    let base = DatasetProperties::tabular(["a"], ["b"]).with("issparse", true);
    let overlay = DatasetProperties::new().with("numerical_columns", json!([]));
    let merged = DatasetProperties::merged(&base, &overlay);
    assert!(!merged.has_numerical_columns());
    assert_eq!(merged.categorical_columns().len(), 1);
    assert!(merged.is_sparse());
}

#[test]
fn properties_load_from_yaml() {
    let yaml = "numerical_columns: [age, income]\ncategorical_columns: []\ntask_type: tabular_classification\n";
    let props: DatasetProperties = serde_yaml::from_str(yaml).expect("yaml");
    check_dataset_properties(&props).expect("valid");
    assert_eq!(props.get("task_type"), Some(&json!("tabular_classification")));
}
