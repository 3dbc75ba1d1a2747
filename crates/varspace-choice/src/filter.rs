use tracing::debug;
use varspace_core::{DatasetProperties, ErrorInfo, VarspaceError};

use crate::registry::VariantSet;

/// Narrows `all` to the variants usable for `properties` right now.
///
/// A non-empty `include` restricts the result to exactly those names and
/// every included name must exist and be applicable. `exclude` removes names
/// unconditionally (unknown names are ignored). Remaining variants whose
/// predicate rejects the dataset are dropped silently.
pub fn filter_variants(
    all: &VariantSet,
    properties: &DatasetProperties,
    include: &[String],
    exclude: &[String],
) -> Result<VariantSet, VarspaceError> {
    if let Some(unknown) = include.iter().find(|name| !all.contains(name)) {
        return Err(VarspaceError::UnknownVariant(
            ErrorInfo::new(
                "varspace_choice.unknown_included_variant",
                "include names a variant that is not registered",
            )
            .with_context("variant", unknown.as_str())
            .with_list("registered", all.names()),
        ));
    }

    let mut available = all.clone();
    if !include.is_empty() {
        available.retain(|variant| include.iter().any(|name| name == variant.name()));
    }
    available.retain(|variant| !exclude.iter().any(|name| name == variant.name()));

    let mut rejected = None;
    available.retain(|variant| {
        if variant.is_applicable(properties) {
            return true;
        }
        if !include.is_empty() && rejected.is_none() {
            rejected = Some(variant.name().to_string());
        }
        debug!(variant = variant.name(), "variant not applicable to dataset");
        false
    });
    if let Some(name) = rejected {
        return Err(VarspaceError::NoApplicableVariant(
            ErrorInfo::new(
                "varspace_choice.included_variant_not_applicable",
                "an included variant does not apply to this dataset",
            )
            .with_context("variant", name),
        ));
    }

    if available.is_empty() {
        return Err(VarspaceError::NoApplicableVariant(
            ErrorInfo::new(
                "varspace_choice.no_applicable_variant",
                "no variant survives include/exclude and applicability filtering",
            )
            .with_list("registered", all.names())
            .with_list("include", include)
            .with_list("exclude", exclude)
            .with_hint("register a variant or relax include/exclude"),
        ));
    }
    Ok(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::FnVariant;

    fn registry() -> VariantSet {
        [
            FnVariant::new("A").shared(),
            FnVariant::new("B")
                .with_predicate(|props| props.is_sparse())
                .shared(),
            FnVariant::new("C").shared(),
        ]
        .into_iter()
        .collect()
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn inapplicable_variants_drop_silently() {
        let props = DatasetProperties::tabular(["x"], Vec::<&str>::new());
        let available = filter_variants(&registry(), &props, &[], &[]).unwrap();
        assert_eq!(available.names(), ["A", "C"]);
    }

    #[test]
    fn include_keeps_registry_order() {
        let props = DatasetProperties::tabular(["x"], Vec::<&str>::new());
        let available = filter_variants(&registry(), &props, &names(&["C", "A"]), &[]).unwrap();
        assert_eq!(available.names(), ["A", "C"]);
    }

    #[test]
    fn included_but_inapplicable_is_an_error() {
        let props = DatasetProperties::tabular(["x"], Vec::<&str>::new());
        let err = filter_variants(&registry(), &props, &names(&["B"]), &[]).unwrap_err();
        assert!(matches!(err, VarspaceError::NoApplicableVariant(_)));
    }

    #[test]
    fn unknown_exclude_is_ignored() {
        let props = DatasetProperties::tabular(["x"], Vec::<&str>::new());
        let available = filter_variants(&registry(), &props, &[], &names(&["Z", "A"])).unwrap();
        assert_eq!(available.names(), ["C"]);
    }
}
