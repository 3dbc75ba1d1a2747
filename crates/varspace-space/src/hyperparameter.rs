//! Hyperparameter domains.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use varspace_core::{ErrorInfo, ParamValue, VarspaceError};

use crate::PATH_SEPARATOR;

fn invalid(code: &str, name: &str, message: impl Into<String>) -> VarspaceError {
    VarspaceError::Space(ErrorInfo::new(code, message).with_context("hyperparameter", name))
}

fn check_name(name: &str) -> Result<(), VarspaceError> {
    if name.trim().is_empty() {
        return Err(invalid(
            "varspace_space.empty_name",
            name,
            "hyperparameter name must not be empty",
        ));
    }
    Ok(())
}

/// Finite set of labels, exactly one of which is picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalHyperparameter {
    name: String,
    choices: Vec<ParamValue>,
    default_value: ParamValue,
}

impl CategoricalHyperparameter {
    /// Creates a categorical domain; `default_value` must be one of `choices`.
    pub fn new(
        name: impl Into<String>,
        choices: Vec<ParamValue>,
        default_value: impl Into<ParamValue>,
    ) -> Result<Self, VarspaceError> {
        let name = name.into();
        let default_value = default_value.into();
        check_name(&name)?;
        if choices.is_empty() {
            return Err(invalid(
                "varspace_space.empty_choices",
                &name,
                "categorical hyperparameter needs at least one choice",
            ));
        }
        for (idx, choice) in choices.iter().enumerate() {
            if choices[..idx].contains(choice) {
                return Err(VarspaceError::Space(
                    ErrorInfo::new(
                        "varspace_space.duplicate_choice",
                        "categorical choices must be unique",
                    )
                    .with_context("hyperparameter", name.as_str())
                    .with_context("choice", choice.to_string()),
                ));
            }
        }
        if !choices.contains(&default_value) {
            return Err(VarspaceError::Space(
                ErrorInfo::new(
                    "varspace_space.default_not_in_domain",
                    "default value must be one of the choices",
                )
                .with_context("hyperparameter", name.as_str())
                .with_context("default", default_value.to_string())
                .with_list("choices", choices.iter().map(ToString::to_string)),
            ));
        }
        Ok(Self {
            name,
            choices,
            default_value,
        })
    }

    /// Convenience constructor for string labels.
    pub fn from_labels<S: AsRef<str>>(
        name: impl Into<String>,
        labels: &[S],
        default_value: &str,
    ) -> Result<Self, VarspaceError> {
        let choices = labels
            .iter()
            .map(|label| ParamValue::from(label.as_ref()))
            .collect();
        Self::new(name, choices, default_value)
    }

    /// Permissible values in declaration order.
    pub fn choices(&self) -> &[ParamValue] {
        &self.choices
    }
}

/// Continuous range `[lower, upper]`, optionally sampled on a log scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformFloatHyperparameter {
    name: String,
    lower: f64,
    upper: f64,
    default_value: f64,
    #[serde(default)]
    log: bool,
}

impl UniformFloatHyperparameter {
    /// Creates a float range; bounds must be ordered and contain the default.
    pub fn new(
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        default_value: f64,
        log: bool,
    ) -> Result<Self, VarspaceError> {
        let name = name.into();
        check_name(&name)?;
        let representable =
            lower.is_finite() && upper.is_finite() && (upper - lower).is_finite();
        check_bounds(&name, lower, upper, default_value, log, representable, 0.0)?;
        Ok(Self {
            name,
            lower,
            upper,
            default_value,
            log,
        })
    }

    /// Lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Whether values are sampled uniformly in log space.
    pub fn log(&self) -> bool {
        self.log
    }
}

/// Integer range `[lower, upper]`, optionally sampled on a log scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformIntHyperparameter {
    name: String,
    lower: i64,
    upper: i64,
    default_value: i64,
    #[serde(default)]
    log: bool,
}

impl UniformIntHyperparameter {
    /// Creates an integer range; bounds must be ordered and contain the default.
    pub fn new(
        name: impl Into<String>,
        lower: i64,
        upper: i64,
        default_value: i64,
        log: bool,
    ) -> Result<Self, VarspaceError> {
        let name = name.into();
        check_name(&name)?;
        check_bounds(&name, lower, upper, default_value, log, true, 0)?;
        Ok(Self {
            name,
            lower,
            upper,
            default_value,
            log,
        })
    }

    /// Lower bound.
    pub fn lower(&self) -> i64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> i64 {
        self.upper
    }
}

/// Parameter pinned to a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantHyperparameter {
    name: String,
    value: ParamValue,
}

impl ConstantHyperparameter {
    /// Creates a constant parameter.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Result<Self, VarspaceError> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    /// The pinned value.
    pub fn value(&self) -> &ParamValue {
        &self.value
    }
}

/// `representable` is false when the range (or its width) overflows the
/// value type; sampling needs a finite width.
fn check_bounds<T>(
    name: &str,
    lower: T,
    upper: T,
    default_value: T,
    log: bool,
    representable: bool,
    zero: T,
) -> Result<(), VarspaceError>
where
    T: PartialOrd + Copy + fmt::Display,
{
    if !representable || lower >= upper {
        return Err(VarspaceError::Space(
            ErrorInfo::new(
                "varspace_space.invalid_bounds",
                "range bounds must be finite with lower < upper and a finite width",
            )
            .with_context("hyperparameter", name)
            .with_context("lower", lower.to_string())
            .with_context("upper", upper.to_string()),
        ));
    }
    if log && lower <= zero {
        return Err(VarspaceError::Space(
            ErrorInfo::new(
                "varspace_space.invalid_log_bounds",
                "log scaled ranges need a strictly positive lower bound",
            )
            .with_context("hyperparameter", name)
            .with_context("lower", lower.to_string()),
        ));
    }
    if !(lower..=upper).contains(&default_value) {
        return Err(VarspaceError::Space(
            ErrorInfo::new(
                "varspace_space.default_not_in_domain",
                "default value must lie within the range",
            )
            .with_context("hyperparameter", name)
            .with_context("default", default_value.to_string())
            .with_context("range", format!("[{lower}, {upper}]")),
        ));
    }
    Ok(())
}

/// A named, typed hyperparameter domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Hyperparameter {
    /// See [`CategoricalHyperparameter`].
    Categorical(CategoricalHyperparameter),
    /// See [`UniformFloatHyperparameter`].
    UniformFloat(UniformFloatHyperparameter),
    /// See [`UniformIntHyperparameter`].
    UniformInt(UniformIntHyperparameter),
    /// See [`ConstantHyperparameter`].
    Constant(ConstantHyperparameter),
}

impl Hyperparameter {
    /// Fully qualified parameter name.
    pub fn name(&self) -> &str {
        match self {
            Hyperparameter::Categorical(hp) => &hp.name,
            Hyperparameter::UniformFloat(hp) => &hp.name,
            Hyperparameter::UniformInt(hp) => &hp.name,
            Hyperparameter::Constant(hp) => &hp.name,
        }
    }

    /// Value used by the default configuration.
    pub fn default_value(&self) -> ParamValue {
        match self {
            Hyperparameter::Categorical(hp) => hp.default_value.clone(),
            Hyperparameter::UniformFloat(hp) => ParamValue::Float(hp.default_value),
            Hyperparameter::UniformInt(hp) => ParamValue::Int(hp.default_value),
            Hyperparameter::Constant(hp) => hp.value.clone(),
        }
    }

    /// Returns true when `value` is a legal assignment for this parameter.
    pub fn contains(&self, value: &ParamValue) -> bool {
        match self {
            Hyperparameter::Categorical(hp) => hp.choices.contains(value),
            Hyperparameter::UniformFloat(hp) => value
                .as_f64()
                .map_or(false, |v| (hp.lower..=hp.upper).contains(&v)),
            Hyperparameter::UniformInt(hp) => {
                matches!(value, ParamValue::Int(v) if (hp.lower..=hp.upper).contains(v))
            }
            Hyperparameter::Constant(hp) => hp.value == *value,
        }
    }

    /// Draws a value from the domain.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ParamValue {
        match self {
            Hyperparameter::Categorical(hp) => {
                hp.choices[rng.gen_range(0..hp.choices.len())].clone()
            }
            Hyperparameter::UniformFloat(hp) => {
                let value = if hp.log {
                    rng.gen_range(hp.lower.ln()..=hp.upper.ln()).exp()
                } else {
                    rng.gen_range(hp.lower..=hp.upper)
                };
                ParamValue::Float(value.clamp(hp.lower, hp.upper))
            }
            Hyperparameter::UniformInt(hp) => {
                let value = if hp.log {
                    let raw = rng
                        .gen_range((hp.lower as f64).ln()..=(hp.upper as f64).ln())
                        .exp()
                        .round() as i64;
                    raw.clamp(hp.lower, hp.upper)
                } else {
                    rng.gen_range(hp.lower..=hp.upper)
                };
                ParamValue::Int(value)
            }
            Hyperparameter::Constant(hp) => hp.value.clone(),
        }
    }

    /// Returns a copy living under `prefix`, i.e. named `<prefix>.<name>`.
    pub fn prefixed(&self, prefix: &str) -> Hyperparameter {
        let mut copy = self.clone();
        let name = format!("{prefix}{PATH_SEPARATOR}{}", self.name());
        match &mut copy {
            Hyperparameter::Categorical(hp) => hp.name = name,
            Hyperparameter::UniformFloat(hp) => hp.name = name,
            Hyperparameter::UniformInt(hp) => hp.name = name,
            Hyperparameter::Constant(hp) => hp.name = name,
        }
        copy
    }
}

impl From<CategoricalHyperparameter> for Hyperparameter {
    fn from(hp: CategoricalHyperparameter) -> Self {
        Hyperparameter::Categorical(hp)
    }
}

impl From<UniformFloatHyperparameter> for Hyperparameter {
    fn from(hp: UniformFloatHyperparameter) -> Self {
        Hyperparameter::UniformFloat(hp)
    }
}

impl From<UniformIntHyperparameter> for Hyperparameter {
    fn from(hp: UniformIntHyperparameter) -> Self {
        Hyperparameter::UniformInt(hp)
    }
}

impl From<ConstantHyperparameter> for Hyperparameter {
    fn from(hp: ConstantHyperparameter) -> Self {
        Hyperparameter::Constant(hp)
    }
}
