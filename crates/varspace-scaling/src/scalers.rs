//! Built-in scaling strategies.
//!
//! Only the search-space side lives here: the numeric transforms themselves
//! belong to the training pipeline.

use varspace_choice::Variant;
use varspace_core::{DatasetProperties, VarspaceError};
use varspace_space::{resolve_space, ConfigurationSpace, NestedOverrides, ParamSpec};

/// The scalers shipped with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinScaler {
    /// Rescales every feature to `[0, 1]`.
    MinMaxScaler,
    /// Leaves the data untouched.
    NoScaler,
    /// Rescales every sample to unit norm.
    Normalizer,
    /// Yeo-Johnson power transform.
    PowerTransformer,
    /// Maps features onto a uniform or normal distribution via quantiles.
    QuantileTransformer,
    /// Centers on the median and scales by a quantile range.
    RobustScaler,
    /// Zero mean, unit variance.
    StandardScaler,
}

impl BuiltinScaler {
    /// Every built-in scaler in discovery order.
    pub const ALL: [BuiltinScaler; 7] = [
        BuiltinScaler::MinMaxScaler,
        BuiltinScaler::NoScaler,
        BuiltinScaler::Normalizer,
        BuiltinScaler::PowerTransformer,
        BuiltinScaler::QuantileTransformer,
        BuiltinScaler::RobustScaler,
        BuiltinScaler::StandardScaler,
    ];

    /// Registry name.
    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinScaler::MinMaxScaler => "MinMaxScaler",
            BuiltinScaler::NoScaler => "NoScaler",
            BuiltinScaler::Normalizer => "Normalizer",
            BuiltinScaler::PowerTransformer => "PowerTransformer",
            BuiltinScaler::QuantileTransformer => "QuantileTransformer",
            BuiltinScaler::RobustScaler => "RobustScaler",
            BuiltinScaler::StandardScaler => "StandardScaler",
        }
    }

    /// Whether the scaler can operate on sparse matrices without densifying.
    pub fn handles_sparse(self) -> bool {
        matches!(
            self,
            BuiltinScaler::NoScaler | BuiltinScaler::Normalizer | BuiltinScaler::StandardScaler
        )
    }

    /// Default search ranges of the scaler's tunable parameters.
    pub fn param_specs(self) -> Vec<ParamSpec> {
        match self {
            BuiltinScaler::Normalizer => vec![ParamSpec::categorical(
                "norm",
                &["mean_abs", "mean_squared", "max"],
                "mean_squared",
            )],
            BuiltinScaler::QuantileTransformer => vec![
                ParamSpec::int("n_quantiles", 10, 2000, 1000),
                ParamSpec::categorical("output_distribution", &["uniform", "normal"], "normal"),
            ],
            BuiltinScaler::RobustScaler => vec![
                ParamSpec::float("q_min", 0.001, 0.3, 0.25),
                ParamSpec::float("q_max", 0.7, 0.999, 0.75),
            ],
            BuiltinScaler::MinMaxScaler
            | BuiltinScaler::NoScaler
            | BuiltinScaler::PowerTransformer
            | BuiltinScaler::StandardScaler => Vec::new(),
        }
    }
}

impl Variant for BuiltinScaler {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn is_applicable(&self, properties: &DatasetProperties) -> bool {
        !properties.is_sparse() || self.handles_sparse()
    }

    fn build_sub_space(
        &self,
        _properties: &DatasetProperties,
        overrides: &NestedOverrides,
    ) -> Result<ConfigurationSpace, VarspaceError> {
        resolve_space(&self.param_specs(), overrides)
    }
}
