//! The contract every interchangeable variant fulfils.

use std::fmt;
use std::sync::Arc;

use varspace_core::{DatasetProperties, ErrorInfo, VarspaceError};
use varspace_space::{ConfigurationSpace, NestedOverrides, PATH_SEPARATOR};

/// An interchangeable algorithm implementation registered under a unique name.
pub trait Variant: Send + Sync {
    /// Registry key; also the prefix of the variant's parameters.
    fn name(&self) -> &str;

    /// Whether the variant may appear in the domain for this dataset.
    fn is_applicable(&self, properties: &DatasetProperties) -> bool;

    /// Builds the variant's own parameter sub-space.
    ///
    /// `overrides` only contains records addressed to this variant, keyed by
    /// bare parameter name.
    fn build_sub_space(
        &self,
        properties: &DatasetProperties,
        overrides: &NestedOverrides,
    ) -> Result<ConfigurationSpace, VarspaceError>;
}

/// Shared handle to a registered variant.
pub type SharedVariant = Arc<dyn Variant>;

type Predicate = dyn Fn(&DatasetProperties) -> bool + Send + Sync;
type SubSpaceBuilder =
    dyn Fn(&DatasetProperties, &NestedOverrides) -> Result<ConfigurationSpace, VarspaceError>
        + Send
        + Sync;

/// Variant assembled from closures, handy for third-party additions.
pub struct FnVariant {
    name: String,
    predicate: Box<Predicate>,
    builder: Box<SubSpaceBuilder>,
}

impl FnVariant {
    /// Always applicable variant with an empty sub-space.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            predicate: Box::new(|_| true),
            builder: Box::new(|_, _| Ok(ConfigurationSpace::new())),
        }
    }

    /// Replaces the applicability predicate.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&DatasetProperties) -> bool + Send + Sync + 'static,
    {
        self.predicate = Box::new(predicate);
        self
    }

    /// Replaces the sub-space constructor.
    pub fn with_sub_space<F>(mut self, builder: F) -> Self
    where
        F: Fn(&DatasetProperties, &NestedOverrides) -> Result<ConfigurationSpace, VarspaceError>
            + Send
            + Sync
            + 'static,
    {
        self.builder = Box::new(builder);
        self
    }

    /// Wraps the variant into a shareable handle.
    pub fn shared(self) -> SharedVariant {
        Arc::new(self)
    }
}

impl Variant for FnVariant {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_applicable(&self, properties: &DatasetProperties) -> bool {
        (self.predicate)(properties)
    }

    fn build_sub_space(
        &self,
        properties: &DatasetProperties,
        overrides: &NestedOverrides,
    ) -> Result<ConfigurationSpace, VarspaceError> {
        (self.builder)(properties, overrides)
    }
}

impl fmt::Debug for FnVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnVariant")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Rejects names that cannot serve as registry keys and parameter prefixes.
pub fn validate_variant_name(name: &str) -> Result<(), VarspaceError> {
    if name.trim().is_empty() {
        return Err(VarspaceError::Registration(ErrorInfo::new(
            "varspace_choice.empty_variant_name",
            "variant name must not be empty",
        )));
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(VarspaceError::Registration(
            ErrorInfo::new(
                "varspace_choice.variant_name_separator",
                "variant name must not contain the path separator",
            )
            .with_context("variant", name)
            .with_context("separator", PATH_SEPARATOR.to_string()),
        ));
    }
    Ok(())
}
