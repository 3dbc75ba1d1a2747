use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use varspace_core::{check_dataset_properties, DatasetProperties, VarspaceError};
use varspace_space::ConfigurationSpace;

use crate::compose::compose_space;
use crate::defaults::{categorical_only_default, resolve_default, ChoicePolicy};
use crate::filter::filter_variants;
use crate::overrides::{merge_top_level_override, ChoiceDomain, SearchSpaceUpdates};
use crate::registry::{VariantRegistry, VariantSet};

/// Per-call narrowing of the variant pool.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceRequest {
    /// Explicit default variant.
    pub default: Option<String>,
    /// When non-empty, the only variants that may be chosen.
    pub include: Vec<String>,
    /// Variants that must not be chosen.
    pub exclude: Vec<String>,
}

impl ChoiceRequest {
    /// Sets the explicit default.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the include list.
    pub fn with_include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the exclude list.
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Composes "pick one variant, then its parameters" configuration spaces.
///
/// The engine keeps the most recent space and the dataset properties it was
/// built from. Properties passed to [`ChoiceEngine::compose`] are layered
/// over the cached ones, and the cache is only replaced on success.
#[derive(Debug)]
pub struct ChoiceEngine {
    registry: Arc<VariantRegistry>,
    policy: ChoicePolicy,
    updates: SearchSpaceUpdates,
    dataset_properties: DatasetProperties,
    configuration_space: Option<ConfigurationSpace>,
}

impl ChoiceEngine {
    /// Creates an engine over a shared registry.
    pub fn new(registry: Arc<VariantRegistry>, policy: ChoicePolicy) -> Self {
        Self {
            registry,
            policy,
            updates: SearchSpaceUpdates::new(),
            dataset_properties: DatasetProperties::new(),
            configuration_space: None,
        }
    }

    /// Sets the search-space updates applied on every composition.
    pub fn with_updates(mut self, updates: SearchSpaceUpdates) -> Self {
        self.updates = updates;
        self
    }

    /// Replaces the search-space updates.
    pub fn set_updates(&mut self, updates: SearchSpaceUpdates) {
        self.updates = updates;
    }

    /// Registry the engine reads from.
    pub fn registry(&self) -> &Arc<VariantRegistry> {
        &self.registry
    }

    /// Preference list and no-op variant.
    pub fn policy(&self) -> &ChoicePolicy {
        &self.policy
    }

    /// Variants usable for `properties` under `request`.
    pub fn available_variants(
        &self,
        properties: &DatasetProperties,
        request: &ChoiceRequest,
    ) -> Result<VariantSet, VarspaceError> {
        let properties = DatasetProperties::merged(&self.dataset_properties, properties);
        check_dataset_properties(&properties)?;
        filter_variants(
            &self.registry.all(),
            &properties,
            &request.include,
            &request.exclude,
        )
    }

    /// Builds the configuration space for `properties`.
    pub fn compose(
        &mut self,
        properties: &DatasetProperties,
        request: &ChoiceRequest,
    ) -> Result<ConfigurationSpace, VarspaceError> {
        let properties = DatasetProperties::merged(&self.dataset_properties, properties);
        check_dataset_properties(&properties)?;
        let all = self.registry.all();
        let available = filter_variants(&all, &properties, &request.include, &request.exclude)?;

        let domain = merge_top_level_override(
            &available,
            self.updates.choice(),
            &properties,
            &self.policy.no_op,
            || computed_domain(&available, &properties, request, &self.policy),
        )?;
        debug_assert!(
            properties.has_numerical_columns() || domain.names == [self.policy.no_op.as_str()],
            "categorical-only datasets compose a no-op-only domain"
        );

        let space = compose_space(&available, &domain, &properties, &self.updates)?;
        info!(
            domain = ?domain.names,
            default = %domain.default,
            parameters = space.len(),
            "composed choice configuration space"
        );
        self.configuration_space = Some(space.clone());
        self.dataset_properties = properties;
        Ok(space)
    }

    /// Most recently composed space.
    pub fn configuration_space(&self) -> Option<&ConfigurationSpace> {
        self.configuration_space.as_ref()
    }

    /// Dataset properties the most recent space was built from.
    pub fn dataset_properties(&self) -> &DatasetProperties {
        &self.dataset_properties
    }
}

fn computed_domain(
    available: &VariantSet,
    properties: &DatasetProperties,
    request: &ChoiceRequest,
    policy: &ChoicePolicy,
) -> Result<ChoiceDomain, VarspaceError> {
    if !properties.has_numerical_columns() {
        let default = categorical_only_default(available, &policy.no_op, &request.include)?;
        if let Some(explicit) = request.default.as_deref().filter(|name| *name != default) {
            warn!(
                requested = explicit,
                default = %default,
                "dataset has no numerical columns; ignoring explicit default"
            );
        }
        return Ok(ChoiceDomain {
            names: vec![default.clone()],
            default,
        });
    }
    let default = resolve_default(
        available,
        request.default.as_deref(),
        &policy.preference,
        &request.include,
        &request.exclude,
    )?;
    Ok(ChoiceDomain {
        names: available.names().into_iter().map(str::to_string).collect(),
        default,
    })
}
