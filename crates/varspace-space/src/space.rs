//! Hierarchical configuration spaces.

use rand::Rng;
use serde::{Deserialize, Serialize};
use varspace_core::{ErrorInfo, ParamValue, VarspaceError};

use crate::configuration::Configuration;
use crate::hyperparameter::Hyperparameter;
use crate::rng::SampleSeeds;
use crate::serde::canonical_sha256;
use crate::PATH_SEPARATOR;

/// Gates `child` so it is only active while `parent == value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualsCondition {
    child: String,
    parent: String,
    value: ParamValue,
}

impl EqualsCondition {
    /// Creates a new parent/child edge.
    pub fn new(
        child: impl Into<String>,
        parent: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
            value: value.into(),
        }
    }

    /// Name of the gated parameter.
    pub fn child(&self) -> &str {
        &self.child
    }

    /// Name of the gating parameter.
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Parent value activating the child.
    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    fn prefixed(&self, prefix: &str) -> EqualsCondition {
        EqualsCondition {
            child: format!("{prefix}{PATH_SEPARATOR}{}", self.child),
            parent: format!("{prefix}{PATH_SEPARATOR}{}", self.parent),
            value: self.value.clone(),
        }
    }
}

/// Ordered set of hyperparameters plus the conditions between them.
///
/// Insertion order is preserved everywhere (iteration, serialization and
/// therefore [`ConfigurationSpace::canonical_hash`]). Every condition's
/// parent is inserted before its child, which lets activity be decided in a
/// single forward pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigurationSpace {
    hyperparameters: Vec<Hyperparameter>,
    #[serde(default)]
    conditions: Vec<EqualsCondition>,
}

impl ConfigurationSpace {
    /// Creates an empty space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level hyperparameter.
    pub fn add_hyperparameter(
        &mut self,
        hyperparameter: impl Into<Hyperparameter>,
    ) -> Result<(), VarspaceError> {
        let hyperparameter = hyperparameter.into();
        if self.index_of(hyperparameter.name()).is_some() {
            return Err(duplicate(hyperparameter.name()));
        }
        self.hyperparameters.push(hyperparameter);
        Ok(())
    }

    /// Adds a parent/child condition between two existing parameters.
    pub fn add_condition(&mut self, condition: EqualsCondition) -> Result<(), VarspaceError> {
        self.check_condition(&condition)?;
        self.conditions.push(condition);
        Ok(())
    }

    /// Grafts `sub` beneath `parent == value`.
    ///
    /// Every parameter of `sub` is renamed to `<prefix>.<name>`. Root
    /// parameters of `sub` get a condition on `parent`; conditions inside
    /// `sub` are kept (renamed). Nothing is modified if any check fails.
    pub fn add_configuration_space(
        &mut self,
        prefix: &str,
        sub: &ConfigurationSpace,
        parent: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), VarspaceError> {
        let value = value.into();
        if prefix.is_empty() {
            return Err(VarspaceError::space(
                "varspace_space.empty_prefix",
                "grafted spaces need a non-empty prefix",
            ));
        }
        let parent_hp = self.get(parent).ok_or_else(|| missing(parent))?;
        if !parent_hp.contains(&value) {
            return Err(illegal_condition_value(parent, &value));
        }

        let mut staged = self.clone();
        for hyperparameter in &sub.hyperparameters {
            staged.add_hyperparameter(hyperparameter.prefixed(prefix))?;
            if sub.parent_condition(hyperparameter.name()).is_none() {
                let child = format!("{prefix}{PATH_SEPARATOR}{}", hyperparameter.name());
                staged.add_condition(EqualsCondition::new(child, parent, value.clone()))?;
            }
        }
        for condition in &sub.conditions {
            staged.add_condition(condition.prefixed(prefix))?;
        }
        *self = staged;
        Ok(())
    }

    /// Looks up a parameter by its fully qualified name.
    pub fn get(&self, name: &str) -> Option<&Hyperparameter> {
        self.hyperparameters.iter().find(|hp| hp.name() == name)
    }

    /// Parameters in insertion order.
    pub fn hyperparameters(&self) -> &[Hyperparameter] {
        &self.hyperparameters
    }

    /// Parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hyperparameters.iter().map(Hyperparameter::name)
    }

    /// Conditions in insertion order.
    pub fn conditions(&self) -> &[EqualsCondition] {
        &self.conditions
    }

    /// The condition gating `name`, if any.
    pub fn parent_condition(&self, name: &str) -> Option<&EqualsCondition> {
        self.conditions.iter().find(|cond| cond.child == name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.hyperparameters.len()
    }

    /// Returns true when the space has no parameters.
    pub fn is_empty(&self) -> bool {
        self.hyperparameters.is_empty()
    }

    /// Assignment made of every active parameter's default.
    pub fn default_configuration(&self) -> Configuration {
        self.fill(|hp| hp.default_value())
    }

    /// Draws one structurally valid configuration.
    pub fn sample_configuration<R: Rng + ?Sized>(&self, rng: &mut R) -> Configuration {
        self.fill(|hp| hp.sample(&mut *rng))
    }

    /// Draws `count` configurations, sample `i` seeded by [`SampleSeeds::seed_for`].
    pub fn sample_configurations(&self, count: usize, seed: u64) -> Vec<Configuration> {
        SampleSeeds::new(seed)
            .rngs(count)
            .map(|mut rng| self.sample_configuration(&mut rng))
            .collect()
    }

    /// Checks that exactly the active parameters are assigned legal values.
    pub fn check_configuration(&self, config: &Configuration) -> Result<(), VarspaceError> {
        if let Some((name, _)) = config.iter().find(|(name, _)| self.get(name).is_none()) {
            return Err(VarspaceError::Space(
                ErrorInfo::new(
                    "varspace_space.unknown_parameter",
                    "configuration assigns a parameter the space does not define",
                )
                .with_context("hyperparameter", name.as_str()),
            ));
        }
        for hyperparameter in &self.hyperparameters {
            let name = hyperparameter.name();
            let active = self.is_active(name, config);
            match (active, config.get(name)) {
                (true, None) => {
                    return Err(VarspaceError::Space(
                        ErrorInfo::new(
                            "varspace_space.missing_active",
                            "active parameter has no value",
                        )
                        .with_context("hyperparameter", name),
                    ))
                }
                (true, Some(value)) if !hyperparameter.contains(value) => {
                    return Err(VarspaceError::Space(
                        ErrorInfo::new(
                            "varspace_space.illegal_value",
                            "value lies outside the parameter domain",
                        )
                        .with_context("hyperparameter", name)
                        .with_context("value", value.to_string()),
                    ))
                }
                (false, Some(value)) => {
                    return Err(VarspaceError::Space(
                        ErrorInfo::new(
                            "varspace_space.inactive_assigned",
                            "inactive parameter must not be assigned",
                        )
                        .with_context("hyperparameter", name)
                        .with_context("value", value.to_string()),
                    ))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// SHA-256 of the canonical JSON form; order sensitive.
    pub fn canonical_hash(&self) -> Result<String, VarspaceError> {
        canonical_sha256(self)
    }

    fn fill(&self, mut pick: impl FnMut(&Hyperparameter) -> ParamValue) -> Configuration {
        let mut config = Configuration::new();
        for hyperparameter in &self.hyperparameters {
            if self.is_active(hyperparameter.name(), &config) {
                config.insert(hyperparameter.name(), pick(hyperparameter));
            }
        }
        config
    }

    fn is_active(&self, name: &str, config: &Configuration) -> bool {
        match self.parent_condition(name) {
            None => true,
            Some(condition) => config.get(&condition.parent) == Some(&condition.value),
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.hyperparameters.iter().position(|hp| hp.name() == name)
    }

    fn check_condition(&self, condition: &EqualsCondition) -> Result<(), VarspaceError> {
        let child = self
            .index_of(&condition.child)
            .ok_or_else(|| missing(&condition.child))?;
        let parent = self
            .index_of(&condition.parent)
            .ok_or_else(|| missing(&condition.parent))?;
        if parent >= child {
            return Err(VarspaceError::Space(
                ErrorInfo::new(
                    "varspace_space.parent_after_child",
                    "condition parent must be added before its child",
                )
                .with_context("child", condition.child.as_str())
                .with_context("parent", condition.parent.as_str()),
            ));
        }
        if !self.hyperparameters[parent].contains(&condition.value) {
            return Err(illegal_condition_value(&condition.parent, &condition.value));
        }
        if let Some(existing) = self.parent_condition(&condition.child) {
            return Err(VarspaceError::Space(
                ErrorInfo::new(
                    "varspace_space.multiple_parents",
                    "a parameter may only be gated by one condition",
                )
                .with_context("child", condition.child.as_str())
                .with_context("existing_parent", existing.parent.as_str()),
            ));
        }
        Ok(())
    }
}

fn duplicate(name: &str) -> VarspaceError {
    VarspaceError::Space(
        ErrorInfo::new(
            "varspace_space.duplicate_name",
            "hyperparameter names must be unique",
        )
        .with_context("hyperparameter", name),
    )
}

fn missing(name: &str) -> VarspaceError {
    VarspaceError::Space(
        ErrorInfo::new(
            "varspace_space.unknown_parameter",
            "condition refers to a parameter the space does not define",
        )
        .with_context("hyperparameter", name),
    )
}

fn illegal_condition_value(parent: &str, value: &ParamValue) -> VarspaceError {
    VarspaceError::Space(
        ErrorInfo::new(
            "varspace_space.illegal_condition_value",
            "condition value lies outside the parent domain",
        )
        .with_context("parent", parent)
        .with_context("value", value.to_string()),
    )
}
