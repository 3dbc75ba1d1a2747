use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use varspace_core::{ErrorInfo, VarspaceError};
use varspace_space::serde::{from_yaml_slice, to_yaml_string};

use crate::engine::ChoiceRequest;
use crate::overrides::SearchSpaceUpdates;

/// File-level description of one choice composition.
///
/// ```yaml
/// include: [StandardScaler, RobustScaler]
/// default: RobustScaler
/// updates:
///   "":
///     value_range: [RobustScaler]
///     default_value: RobustScaler
///   RobustScaler.q_min:
///     value_range: [0.1, 0.3]
///     default_value: 0.2
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChoiceConfig {
    /// Include/exclude/default narrowing.
    #[serde(flatten)]
    pub request: ChoiceRequest,
    /// Search-space overrides keyed by dotted path.
    #[serde(default)]
    pub updates: SearchSpaceUpdates,
}

impl ChoiceConfig {
    /// Renders the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, VarspaceError> {
        to_yaml_string(self)
    }
}

/// Loads a [`ChoiceConfig`] from a YAML file.
pub fn load_choice_config<P: AsRef<Path>>(path: P) -> Result<ChoiceConfig, VarspaceError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        VarspaceError::Serde(
            ErrorInfo::new("varspace_choice.config_read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    from_yaml_slice(&bytes).map_err(|err| match err {
        VarspaceError::Serde(info) => {
            VarspaceError::Serde(info.with_context("path", path.display().to_string()))
        }
        other => other,
    })
}
