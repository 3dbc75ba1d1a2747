use proptest::prelude::*;
use varspace_choice::{ChoiceRequest, CHOICE_PARAMETER};
use varspace_core::{DatasetProperties, VarspaceError};
use varspace_scaling::{BuiltinScaler, ScalerChoice, SCALER_PREFERENCE};

fn scaler_names() -> Vec<&'static str> {
    BuiltinScaler::ALL.iter().map(|scaler| scaler.as_str()).collect()
}

fn props(sparse: bool) -> DatasetProperties {
    DatasetProperties::tabular(["n0", "n1"], ["c0"]).with("issparse", sparse)
}

proptest! {
    #[test]
    fn default_is_most_preferred_included_scaler(
        include in prop::sample::subsequence(scaler_names(), 1..=7),
    ) {
        let mut choice = ScalerChoice::with_builtins().unwrap();
        let request = ChoiceRequest::default().with_include(include.clone());
        let space = choice.search_space(&props(false), &request).unwrap();
        let expected = SCALER_PREFERENCE
            .iter()
            .find(|name| include.contains(*name))
            .copied();
        let defaults = space.default_configuration();
        prop_assert_eq!(defaults.get_str(CHOICE_PARAMETER), expected);
    }

    #[test]
    fn sparse_data_only_offers_sparse_capable_scalers(
        include in prop::sample::subsequence(scaler_names(), 1..=7),
        seed in any::<u64>(),
    ) {
        let mut choice = ScalerChoice::with_builtins().unwrap();
        let request = ChoiceRequest::default().with_include(include.clone());
        let capable: Vec<_> = BuiltinScaler::ALL
            .iter()
            .filter(|scaler| scaler.handles_sparse() && include.contains(&scaler.as_str()))
            .collect();
        match choice.search_space(&props(true), &request) {
            Ok(space) => {
                prop_assert_eq!(capable.len(), include.len());
                for config in space.sample_configurations(8, seed) {
                    prop_assert!(space.check_configuration(&config).is_ok());
                }
            }
            Err(err) => {
                prop_assert!(capable.len() < include.len());
                prop_assert!(matches!(err, VarspaceError::NoApplicableVariant(_)));
            }
        }
    }
}
