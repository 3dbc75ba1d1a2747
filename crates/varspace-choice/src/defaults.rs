use serde::{Deserialize, Serialize};
use varspace_core::{ErrorInfo, VarspaceError};

use crate::registry::VariantSet;

/// Variant-family specific knobs of the default resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicePolicy {
    /// Well-known variant names, most preferred first.
    pub preference: Vec<String>,
    /// Variant applying no transformation; the only choice for data without
    /// numerical columns.
    pub no_op: String,
}

impl ChoicePolicy {
    /// Creates a policy from a preference list and the no-op variant name.
    pub fn new<I, S>(preference: I, no_op: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preference: preference.into_iter().map(Into::into).collect(),
            no_op: no_op.into(),
        }
    }
}

/// Picks the default variant.
///
/// An explicit default is returned verbatim; membership in the domain is
/// checked when the choice parameter is built. Otherwise the first
/// preference that is available, not excluded and (when `include` is set)
/// included wins.
pub fn resolve_default(
    available: &VariantSet,
    explicit: Option<&str>,
    preference: &[String],
    include: &[String],
    exclude: &[String],
) -> Result<String, VarspaceError> {
    if let Some(explicit) = explicit {
        return Ok(explicit.to_string());
    }
    preference
        .iter()
        .filter(|name| available.contains(name))
        .filter(|name| include.is_empty() || include.contains(name))
        .find(|name| !exclude.contains(name))
        .cloned()
        .ok_or_else(|| {
            VarspaceError::NoDefaultFound(
                ErrorInfo::new(
                    "varspace_choice.no_default_found",
                    "no preferred variant is available and no default was given",
                )
                .with_list("preference", preference)
                .with_list("available", available.names())
                .with_hint("pass an explicit default or register a preferred variant"),
            )
        })
}

/// Default for datasets without numerical columns: always the no-op variant.
///
/// Fails with `IncompatibleDataset` when `include` leaves the no-op variant
/// out, or when it was excluded or never registered.
pub fn categorical_only_default(
    available: &VariantSet,
    no_op: &str,
    include: &[String],
) -> Result<String, VarspaceError> {
    if !include.is_empty() && !include.iter().any(|name| name == no_op) {
        return Err(VarspaceError::IncompatibleDataset(
            ErrorInfo::new(
                "varspace_choice.include_without_no_op",
                "dataset has no numerical columns, so only the no-op variant applies",
            )
            .with_list("include", include)
            .with_context("required", no_op),
        ));
    }
    if !available.contains(no_op) {
        return Err(VarspaceError::IncompatibleDataset(
            ErrorInfo::new(
                "varspace_choice.no_op_unavailable",
                "dataset has no numerical columns but the no-op variant is not available",
            )
            .with_list("available", available.names())
            .with_context("required", no_op),
        ));
    }
    Ok(no_op.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::FnVariant;

    fn available(names: &[&str]) -> VariantSet {
        names
            .iter()
            .map(|name| FnVariant::new(*name).shared())
            .collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn preference_scan_skips_excluded_and_missing() {
        let set = available(&["Minmax", "Noop"]);
        let preference = strings(&["Standard", "Minmax", "Noop"]);
        let default = resolve_default(&set, None, &preference, &[], &strings(&["Minmax"])).unwrap();
        assert_eq!(default, "Noop");
    }

    #[test]
    fn explicit_default_wins() {
        let set = available(&["Standard", "Noop"]);
        let preference = strings(&["Standard", "Noop"]);
        let default = resolve_default(&set, Some("Noop"), &preference, &[], &[]).unwrap();
        assert_eq!(default, "Noop");
    }

    #[test]
    fn exhausted_scan_fails() {
        let set = available(&["Custom"]);
        let err = resolve_default(&set, None, &strings(&["Standard"]), &[], &[]).unwrap_err();
        assert!(matches!(err, VarspaceError::NoDefaultFound(_)));
    }

    #[test]
    fn categorical_only_rejects_include_without_no_op() {
        let set = available(&["Standard", "Noop"]);
        let err = categorical_only_default(&set, "Noop", &strings(&["Standard"])).unwrap_err();
        assert!(matches!(err, VarspaceError::IncompatibleDataset(_)));
        assert_eq!(categorical_only_default(&set, "Noop", &[]).unwrap(), "Noop");
    }
}
