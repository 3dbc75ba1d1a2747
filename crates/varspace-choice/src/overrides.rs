//! Caller supplied search-space overrides and the top-level merge.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use varspace_core::{DatasetProperties, ErrorInfo, ParamValue, VarspaceError};
use varspace_space::{NestedOverrides, OverrideRecord, PATH_SEPARATOR};

use crate::registry::VariantSet;

/// Override key addressing the top-level choice parameter.
pub const CHOICE_KEY: &str = "";

/// Parsed override key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum OverridePath {
    /// The top-level choice (`""`).
    Choice,
    /// A parameter of one variant (`"<variant>.<parameter>"`).
    Nested {
        /// Variant name.
        variant: String,
        /// Parameter path inside the variant's sub-space.
        parameter: String,
    },
}

impl FromStr for OverridePath {
    type Err = VarspaceError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        if key == CHOICE_KEY {
            return Ok(OverridePath::Choice);
        }
        match key.split_once(PATH_SEPARATOR) {
            Some((variant, parameter)) if !variant.is_empty() && !parameter.is_empty() => {
                Ok(OverridePath::Nested {
                    variant: variant.to_string(),
                    parameter: parameter.to_string(),
                })
            }
            _ => Err(VarspaceError::InvalidOverrideDomain(
                ErrorInfo::new(
                    "varspace_choice.malformed_override_path",
                    "override keys are \"\" or \"<variant>.<parameter>\"",
                )
                .with_context("key", key),
            )),
        }
    }
}

impl fmt::Display for OverridePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverridePath::Choice => Ok(()),
            OverridePath::Nested { variant, parameter } => {
                write!(f, "{variant}{PATH_SEPARATOR}{parameter}")
            }
        }
    }
}

/// Override records keyed by dotted path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, OverrideRecord>",
    into = "BTreeMap<String, OverrideRecord>"
)]
pub struct SearchSpaceUpdates {
    records: BTreeMap<OverridePath, OverrideRecord>,
}

impl SearchSpaceUpdates {
    /// Creates an empty set of updates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the record for `key`.
    pub fn insert(&mut self, key: &str, record: OverrideRecord) -> Result<(), VarspaceError> {
        self.records.insert(key.parse()?, record);
        Ok(())
    }

    /// Builder style variant of [`SearchSpaceUpdates::insert`].
    pub fn with(mut self, key: &str, record: OverrideRecord) -> Result<Self, VarspaceError> {
        self.insert(key, record)?;
        Ok(self)
    }

    /// Override of the top-level choice, if any.
    pub fn choice(&self) -> Option<&OverrideRecord> {
        self.records.get(&OverridePath::Choice)
    }

    /// Records addressed to `variant`, keyed by parameter with the prefix stripped.
    pub fn nested_for(&self, variant: &str) -> NestedOverrides {
        self.records
            .iter()
            .filter_map(|(path, record)| match path {
                OverridePath::Nested {
                    variant: target,
                    parameter,
                } if target == variant => Some((parameter.clone(), record.clone())),
                _ => None,
            })
            .collect()
    }

    /// Variants addressed by at least one nested record.
    pub fn nested_variants(&self) -> Vec<&str> {
        let mut variants: Vec<&str> = self
            .records
            .keys()
            .filter_map(|path| match path {
                OverridePath::Nested { variant, .. } => Some(variant.as_str()),
                OverridePath::Choice => None,
            })
            .collect();
        variants.dedup();
        variants
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no override is set.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<BTreeMap<String, OverrideRecord>> for SearchSpaceUpdates {
    type Error = VarspaceError;

    fn try_from(raw: BTreeMap<String, OverrideRecord>) -> Result<Self, Self::Error> {
        let mut updates = SearchSpaceUpdates::new();
        for (key, record) in raw {
            updates.insert(&key, record)?;
        }
        Ok(updates)
    }
}

impl From<SearchSpaceUpdates> for BTreeMap<String, OverrideRecord> {
    fn from(updates: SearchSpaceUpdates) -> Self {
        updates
            .records
            .into_iter()
            .map(|(path, record)| (path.to_string(), record))
            .collect()
    }
}

/// Domain and default of the top-level choice parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDomain {
    /// Variant names in grafting order.
    pub names: Vec<String>,
    /// Default variant, a member of `names`.
    pub default: String,
}

/// Applies the top-level override, falling back to `computed` without one.
///
/// The override range must be a non-empty, duplicate free subset of
/// `available`; for datasets without numerical columns it must be exactly
/// the no-op variant; its default must lie within the range.
pub fn merge_top_level_override(
    available: &VariantSet,
    record: Option<&OverrideRecord>,
    properties: &DatasetProperties,
    no_op: &str,
    computed: impl FnOnce() -> Result<ChoiceDomain, VarspaceError>,
) -> Result<ChoiceDomain, VarspaceError> {
    let Some(record) = record else {
        return computed();
    };

    let names = record
        .labels()
        .filter(|labels| !labels.is_empty())
        .ok_or_else(|| {
            invalid_domain(
                available,
                record,
                "choice override must be a non-empty list of variant names",
            )
        })?;
    if names
        .iter()
        .enumerate()
        .any(|(idx, name)| names[..idx].contains(name))
    {
        return Err(invalid_domain(
            available,
            record,
            "choice override lists a variant twice",
        ));
    }
    let offending: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !available.contains(name))
        .collect();
    if !offending.is_empty() {
        return Err(VarspaceError::InvalidOverrideDomain(
            ErrorInfo::new(
                "varspace_choice.override_not_subset",
                "choice override must only name available variants",
            )
            .with_list("expected", available.names())
            .with_list("offending", &offending),
        ));
    }

    if !properties.has_numerical_columns() && names != [no_op] {
        return Err(VarspaceError::IncompatibleDatasetOverride(
            ErrorInfo::new(
                "varspace_choice.override_incompatible_dataset",
                "dataset has no numerical columns, so the choice override must be the no-op variant alone",
            )
            .with_list("value_range", &names)
            .with_context("expected", format!("[{no_op}]")),
        ));
    }

    let default = match &record.default_value {
        ParamValue::Str(default) if names.contains(&default.as_str()) => default.clone(),
        other => {
            return Err(VarspaceError::InvalidOverrideDefault(
                ErrorInfo::new(
                    "varspace_choice.override_default_out_of_range",
                    "choice override default must be one of its own values",
                )
                .with_context("default", other.to_string())
                .with_list("value_range", &names),
            ))
        }
    };

    debug!(domain = ?names, %default, "applied choice override");
    Ok(ChoiceDomain {
        names: names.into_iter().map(str::to_string).collect(),
        default,
    })
}

fn invalid_domain(available: &VariantSet, record: &OverrideRecord, message: &str) -> VarspaceError {
    VarspaceError::InvalidOverrideDomain(
        ErrorInfo::new("varspace_choice.invalid_choice_override", message)
            .with_list("expected", available.names())
            .with_list(
                "value_range",
                record.value_range.iter().map(ToString::to_string),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_parse_and_render() {
        assert_eq!("".parse::<OverridePath>().unwrap(), OverridePath::Choice);
        let nested: OverridePath = "RobustScaler.q_min".parse().unwrap();
        assert_eq!(nested.to_string(), "RobustScaler.q_min");
        assert!("RobustScaler".parse::<OverridePath>().is_err());
        assert!(".q_min".parse::<OverridePath>().is_err());
    }

    #[test]
    fn nested_records_are_scoped_to_their_variant() {
        let updates = SearchSpaceUpdates::new()
            .with("A.alpha", OverrideRecord::new([0.1, 0.2], 0.1))
            .unwrap()
            .with("B.beta", OverrideRecord::new(["x"], "x"))
            .unwrap()
            .with("", OverrideRecord::new(["A"], "A"))
            .unwrap();
        let nested = updates.nested_for("A");
        assert_eq!(nested.keys().collect::<Vec<_>>(), ["alpha"]);
        assert!(updates.nested_for("C").is_empty());
        assert_eq!(updates.nested_variants(), ["A", "B"]);
        assert!(updates.choice().is_some());
    }
}
