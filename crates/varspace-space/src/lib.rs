#![deny(missing_docs)]
#![doc = "Hierarchical configuration spaces: typed hyperparameters, parent/child conditions, grafting, sampling and canonical hashing."]

mod configuration;
/// Hyperparameter domains.
pub mod hyperparameter;
/// Sampler seeding.
pub mod rng;
/// Default search ranges and range overrides.
pub mod search;
/// Canonical JSON, hashing and YAML serde helpers.
pub mod serde;
mod space;

/// Separator between a grafted sub-space prefix and its parameter names.
pub const PATH_SEPARATOR: char = '.';

pub use configuration::Configuration;
pub use hyperparameter::{
    CategoricalHyperparameter, ConstantHyperparameter, Hyperparameter,
    UniformFloatHyperparameter, UniformIntHyperparameter,
};
pub use rng::{seeded_rng, SampleSeeds};
pub use search::{resolve_space, NestedOverrides, OverrideRecord, ParamSpec};
pub use space::{ConfigurationSpace, EqualsCondition};
