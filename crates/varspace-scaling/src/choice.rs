use std::sync::Arc;

use varspace_choice::{
    ChoiceConfig, ChoiceEngine, ChoicePolicy, ChoiceRequest, SearchSpaceUpdates, SharedVariant,
    VariantRegistry, VariantSet,
};
use varspace_core::{DatasetProperties, VarspaceError};
use varspace_space::ConfigurationSpace;

use crate::scalers::BuiltinScaler;

/// The no-op scaler, the only choice for data without numerical columns.
pub const NO_SCALER: &str = "NoScaler";

/// Default scaler candidates, most preferred first.
pub const SCALER_PREFERENCE: [&str; 7] = [
    "StandardScaler",
    "Normalizer",
    "MinMaxScaler",
    "PowerTransformer",
    "QuantileTransformer",
    "RobustScaler",
    "NoScaler",
];

/// Preference list and no-op variant for scalers.
pub fn scaler_policy() -> ChoicePolicy {
    ChoicePolicy::new(SCALER_PREFERENCE, NO_SCALER)
}

/// Shared handles to every built-in scaler, in discovery order.
pub fn builtin_scalers() -> Vec<SharedVariant> {
    BuiltinScaler::ALL
        .into_iter()
        .map(|scaler| Arc::new(scaler) as SharedVariant)
        .collect()
}

/// Registry preloaded with the built-in scalers.
pub fn scaler_registry() -> Result<VariantRegistry, VarspaceError> {
    VariantRegistry::with_builtins(builtin_scalers())
}

/// Plugin hook: makes a third-party scaler available to every choice
/// composed from `registry`.
pub fn add_scaler(registry: &VariantRegistry, scaler: SharedVariant) -> Result<(), VarspaceError> {
    registry.register(scaler)
}

/// Chooses a scaler at runtime, then its parameters.
#[derive(Debug)]
pub struct ScalerChoice {
    engine: ChoiceEngine,
}

impl ScalerChoice {
    /// Scaler choice over a shared registry.
    pub fn new(registry: Arc<VariantRegistry>) -> Self {
        Self {
            engine: ChoiceEngine::new(registry, scaler_policy()),
        }
    }

    /// Scaler choice over a private registry holding the built-ins.
    pub fn with_builtins() -> Result<Self, VarspaceError> {
        Ok(Self::new(Arc::new(scaler_registry()?)))
    }

    /// Sets the search-space updates applied on every composition.
    pub fn with_updates(mut self, updates: SearchSpaceUpdates) -> Self {
        self.engine.set_updates(updates);
        self
    }

    /// Scalers usable for `properties` under `request`.
    pub fn available_scalers(
        &self,
        properties: &DatasetProperties,
        request: &ChoiceRequest,
    ) -> Result<VariantSet, VarspaceError> {
        self.engine.available_variants(properties, request)
    }

    /// Composes the scaler configuration space.
    pub fn search_space(
        &mut self,
        properties: &DatasetProperties,
        request: &ChoiceRequest,
    ) -> Result<ConfigurationSpace, VarspaceError> {
        self.engine.compose(properties, request)
    }

    /// Composes the space described by a loaded [`ChoiceConfig`].
    ///
    /// The configuration's updates replace the ones currently set.
    pub fn search_space_for_config(
        &mut self,
        properties: &DatasetProperties,
        config: &ChoiceConfig,
    ) -> Result<ConfigurationSpace, VarspaceError> {
        self.engine.set_updates(config.updates.clone());
        self.engine.compose(properties, &config.request)
    }

    /// Most recently composed space.
    pub fn configuration_space(&self) -> Option<&ConfigurationSpace> {
        self.engine.configuration_space()
    }

    /// Dataset properties the most recent space was built from.
    pub fn dataset_properties(&self) -> &DatasetProperties {
        self.engine.dataset_properties()
    }

    /// Underlying engine.
    pub fn engine(&self) -> &ChoiceEngine {
        &self.engine
    }
}
