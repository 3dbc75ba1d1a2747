//! Default search ranges and caller supplied range overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use varspace_core::{ErrorInfo, ParamValue, VarspaceError};

use crate::hyperparameter::{
    CategoricalHyperparameter, Hyperparameter, UniformFloatHyperparameter,
    UniformIntHyperparameter,
};
use crate::space::ConfigurationSpace;

/// Caller supplied replacement for a parameter's range and default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRecord {
    /// Permissible values; `[lower, upper]` for numeric parameters.
    pub value_range: Vec<ParamValue>,
    /// Default value, which must lie within `value_range`.
    pub default_value: ParamValue,
    /// Sample numeric ranges in log space.
    #[serde(default)]
    pub log: bool,
}

impl OverrideRecord {
    /// Creates a linear-scale override.
    pub fn new<V: Into<ParamValue>>(
        value_range: impl IntoIterator<Item = V>,
        default_value: impl Into<ParamValue>,
    ) -> Self {
        Self {
            value_range: value_range.into_iter().map(Into::into).collect(),
            default_value: default_value.into(),
            log: false,
        }
    }

    /// Marks the override as log scaled.
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// String labels of the range, or `None` if any entry is not a string.
    pub fn labels(&self) -> Option<Vec<&str>> {
        self.value_range.iter().map(ParamValue::as_str).collect()
    }
}

/// Nested overrides for one variant, keyed by bare parameter name.
pub type NestedOverrides = BTreeMap<String, OverrideRecord>;

/// A variant's built-in search range for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamSpec {
    /// Labelled choices.
    Categorical {
        /// Parameter name.
        name: String,
        /// Choices in declaration order.
        choices: Vec<ParamValue>,
        /// Default choice.
        default: ParamValue,
    },
    /// Continuous range.
    Float {
        /// Parameter name.
        name: String,
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
        /// Default value.
        default: f64,
        /// Log scaled sampling.
        log: bool,
    },
    /// Integer range.
    Int {
        /// Parameter name.
        name: String,
        /// Lower bound.
        lower: i64,
        /// Upper bound.
        upper: i64,
        /// Default value.
        default: i64,
        /// Log scaled sampling.
        log: bool,
    },
}

impl ParamSpec {
    /// Categorical range over string labels.
    pub fn categorical(name: &str, labels: &[&str], default: &str) -> Self {
        ParamSpec::Categorical {
            name: name.to_string(),
            choices: labels.iter().map(|label| ParamValue::from(*label)).collect(),
            default: ParamValue::from(default),
        }
    }

    /// Linear float range.
    pub fn float(name: &str, lower: f64, upper: f64, default: f64) -> Self {
        ParamSpec::Float {
            name: name.to_string(),
            lower,
            upper,
            default,
            log: false,
        }
    }

    /// Linear integer range.
    pub fn int(name: &str, lower: i64, upper: i64, default: i64) -> Self {
        ParamSpec::Int {
            name: name.to_string(),
            lower,
            upper,
            default,
            log: false,
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        match self {
            ParamSpec::Categorical { name, .. }
            | ParamSpec::Float { name, .. }
            | ParamSpec::Int { name, .. } => name,
        }
    }

    /// Builds the hyperparameter, applying the override addressed to it.
    pub fn resolve(&self, overrides: &NestedOverrides) -> Result<Hyperparameter, VarspaceError> {
        let Some(record) = overrides.get(self.name()) else {
            return self.build_default();
        };
        let name = self.name();
        match self {
            ParamSpec::Categorical { .. } => {
                if record.value_range.is_empty() {
                    return Err(invalid_domain(name, record, "override range is empty"));
                }
                let range = &record.value_range;
                if (1..range.len()).any(|idx| range[..idx].contains(&range[idx])) {
                    return Err(invalid_domain(
                        name,
                        record,
                        "override range lists a value twice",
                    ));
                }
                if !record.value_range.contains(&record.default_value) {
                    return Err(invalid_default(name, record));
                }
                Ok(CategoricalHyperparameter::new(
                    name,
                    record.value_range.clone(),
                    record.default_value.clone(),
                )?
                .into())
            }
            ParamSpec::Float { .. } => {
                let (lower, upper) = numeric_bounds(name, record, ParamValue::as_f64)?;
                let default = record
                    .default_value
                    .as_f64()
                    .filter(|value| (lower..=upper).contains(value))
                    .ok_or_else(|| invalid_default(name, record))?;
                Ok(UniformFloatHyperparameter::new(name, lower, upper, default, record.log)?.into())
            }
            ParamSpec::Int { .. } => {
                let (lower, upper) = numeric_bounds(name, record, ParamValue::as_i64)?;
                let default = record
                    .default_value
                    .as_i64()
                    .filter(|value| (lower..=upper).contains(value))
                    .ok_or_else(|| invalid_default(name, record))?;
                Ok(UniformIntHyperparameter::new(name, lower, upper, default, record.log)?.into())
            }
        }
    }

    fn build_default(&self) -> Result<Hyperparameter, VarspaceError> {
        Ok(match self {
            ParamSpec::Categorical {
                name,
                choices,
                default,
            } => CategoricalHyperparameter::new(name, choices.clone(), default.clone())?.into(),
            ParamSpec::Float {
                name,
                lower,
                upper,
                default,
                log,
            } => UniformFloatHyperparameter::new(name, *lower, *upper, *default, *log)?.into(),
            ParamSpec::Int {
                name,
                lower,
                upper,
                default,
                log,
            } => UniformIntHyperparameter::new(name, *lower, *upper, *default, *log)?.into(),
        })
    }
}

/// Builds a flat space from `specs`, applying `overrides`.
///
/// Overrides naming a parameter that none of the specs declares are
/// rejected rather than ignored.
pub fn resolve_space(
    specs: &[ParamSpec],
    overrides: &NestedOverrides,
) -> Result<ConfigurationSpace, VarspaceError> {
    if let Some(unknown) = overrides
        .keys()
        .find(|key| !specs.iter().any(|spec| spec.name() == key.as_str()))
    {
        return Err(VarspaceError::InvalidOverrideDomain(
            ErrorInfo::new(
                "varspace_space.unknown_override",
                "override addresses a parameter that is not part of the search space",
            )
            .with_context("hyperparameter", unknown.as_str())
            .with_list("expected", specs.iter().map(ParamSpec::name)),
        ));
    }
    let mut space = ConfigurationSpace::new();
    for spec in specs {
        space.add_hyperparameter(spec.resolve(overrides)?)?;
    }
    Ok(space)
}

fn numeric_bounds<T: PartialOrd + Copy>(
    name: &str,
    record: &OverrideRecord,
    read: impl Fn(&ParamValue) -> Option<T>,
) -> Result<(T, T), VarspaceError> {
    match record.value_range.as_slice() {
        [lower, upper] => match (read(lower), read(upper)) {
            (Some(lower), Some(upper)) if lower < upper => Ok((lower, upper)),
            _ => Err(invalid_domain(
                name,
                record,
                "numeric override range must be [lower, upper] with lower < upper",
            )),
        },
        _ => Err(invalid_domain(
            name,
            record,
            "numeric override range must have exactly two entries",
        )),
    }
}

fn invalid_domain(name: &str, record: &OverrideRecord, message: &str) -> VarspaceError {
    VarspaceError::InvalidOverrideDomain(
        ErrorInfo::new("varspace_space.invalid_override_range", message)
            .with_context("hyperparameter", name)
            .with_list(
                "value_range",
                record.value_range.iter().map(ToString::to_string),
            ),
    )
}

fn invalid_default(name: &str, record: &OverrideRecord) -> VarspaceError {
    VarspaceError::InvalidOverrideDefault(
        ErrorInfo::new(
            "varspace_space.override_default_out_of_range",
            "override default must lie within its own range",
        )
        .with_context("hyperparameter", name)
        .with_context("default", record.default_value.to_string())
        .with_list(
            "value_range",
            record.value_range.iter().map(ToString::to_string),
        ),
    )
}
