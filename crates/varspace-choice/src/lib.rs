#![deny(missing_docs)]
#![doc = "Variant registry, applicability filtering, default resolution, override merging and choice-space composition."]

mod compose;
/// YAML configuration of a composition.
pub mod config;
mod defaults;
mod engine;
mod filter;
/// Search-space overrides.
pub mod overrides;
mod registry;
/// The variant contract.
pub mod variant;

pub use compose::{compose_space, CHOICE_PARAMETER};
pub use config::{load_choice_config, ChoiceConfig};
pub use defaults::{categorical_only_default, resolve_default, ChoicePolicy};
pub use engine::{ChoiceEngine, ChoiceRequest};
pub use filter::filter_variants;
pub use overrides::{
    merge_top_level_override, ChoiceDomain, OverridePath, SearchSpaceUpdates, CHOICE_KEY,
};
pub use registry::{VariantRegistry, VariantSet};
pub use variant::{validate_variant_name, FnVariant, SharedVariant, Variant};
