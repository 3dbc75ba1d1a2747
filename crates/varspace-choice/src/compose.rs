use tracing::debug;
use varspace_core::{DatasetProperties, ErrorInfo, ParamValue, VarspaceError};
use varspace_space::{CategoricalHyperparameter, ConfigurationSpace};

use crate::overrides::{ChoiceDomain, SearchSpaceUpdates};
use crate::registry::VariantSet;

/// Name of the top-level categorical parameter.
pub const CHOICE_PARAMETER: &str = "choice";

/// Builds the `choice` parameter and grafts every chosen variant beneath it.
///
/// Sub-spaces are grafted in `domain` order so the resulting space (and its
/// canonical hash) is reproducible. Each variant only sees the nested
/// overrides addressed to it.
pub fn compose_space(
    available: &VariantSet,
    domain: &ChoiceDomain,
    properties: &DatasetProperties,
    updates: &SearchSpaceUpdates,
) -> Result<ConfigurationSpace, VarspaceError> {
    let choices = domain
        .names
        .iter()
        .map(|name| ParamValue::from(name.as_str()))
        .collect();
    let choice =
        CategoricalHyperparameter::new(CHOICE_PARAMETER, choices, domain.default.as_str())?;

    let mut space = ConfigurationSpace::new();
    space.add_hyperparameter(choice)?;
    for name in &domain.names {
        let variant = available.get(name).ok_or_else(|| {
            VarspaceError::NoApplicableVariant(
                ErrorInfo::new(
                    "varspace_choice.domain_variant_missing",
                    "choice domain names a variant that is not available",
                )
                .with_context("variant", name.as_str())
                .with_list("available", available.names()),
            )
        })?;
        let overrides = updates.nested_for(name);
        let sub_space = variant.build_sub_space(properties, &overrides)?;
        debug!(
            variant = name.as_str(),
            parameters = sub_space.len(),
            overrides = overrides.len(),
            "grafting variant sub-space"
        );
        space.add_configuration_space(name, &sub_space, CHOICE_PARAMETER, name.as_str())?;
    }

    for ignored in updates
        .nested_variants()
        .into_iter()
        .filter(|variant| !domain.names.iter().any(|name| name == variant))
    {
        debug!(variant = ignored, "nested overrides target a variant outside the domain");
    }
    Ok(space)
}
