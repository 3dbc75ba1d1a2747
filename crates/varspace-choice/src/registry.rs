use std::fmt;

use parking_lot::RwLock;
use tracing::debug;
use varspace_core::{ErrorInfo, VarspaceError};

use crate::variant::{validate_variant_name, SharedVariant};

/// Name-ordered collection of variants.
///
/// Inserting an existing name replaces the variant in place, so the
/// position of the first insertion is kept.
#[derive(Clone, Default)]
pub struct VariantSet {
    variants: Vec<SharedVariant>,
}

impl VariantSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a variant by name; returns true on replacement.
    pub fn upsert(&mut self, variant: SharedVariant) -> bool {
        match self
            .variants
            .iter_mut()
            .find(|existing| existing.name() == variant.name())
        {
            Some(slot) => {
                *slot = variant;
                true
            }
            None => {
                self.variants.push(variant);
                false
            }
        }
    }

    /// Looks a variant up by name.
    pub fn get(&self, name: &str) -> Option<&SharedVariant> {
        self.variants.iter().find(|variant| variant.name() == name)
    }

    /// Returns true when `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Variant names in order.
    pub fn names(&self) -> Vec<&str> {
        self.variants.iter().map(|variant| variant.name()).collect()
    }

    /// Iterates over the variants in order.
    pub fn iter(&self) -> impl Iterator<Item = &SharedVariant> {
        self.variants.iter()
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns true when the set is empty.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&SharedVariant) -> bool) {
        self.variants.retain(keep);
    }
}

impl FromIterator<SharedVariant> for VariantSet {
    fn from_iter<T: IntoIterator<Item = SharedVariant>>(iter: T) -> Self {
        let mut set = VariantSet::new();
        for variant in iter {
            set.upsert(variant);
        }
        set
    }
}

impl fmt::Debug for VariantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Built-in variants plus lock-guarded third-party additions.
///
/// The registry is an explicit object handed to the engine; several engines
/// may share one registry behind an `Arc`.
pub struct VariantRegistry {
    builtins: VariantSet,
    addons: RwLock<VariantSet>,
}

impl VariantRegistry {
    /// Creates a registry without built-ins.
    pub fn new() -> Self {
        Self {
            builtins: VariantSet::new(),
            addons: RwLock::new(VariantSet::new()),
        }
    }

    /// Creates a registry whose built-ins are `variants`, in that order.
    pub fn with_builtins(
        variants: impl IntoIterator<Item = SharedVariant>,
    ) -> Result<Self, VarspaceError> {
        let mut builtins = VariantSet::new();
        for variant in variants {
            validate_variant_name(variant.name())?;
            let name = variant.name().to_string();
            if builtins.upsert(variant) {
                return Err(VarspaceError::Registration(
                    ErrorInfo::new(
                        "varspace_choice.duplicate_builtin",
                        "built-in variant names must be unique",
                    )
                    .with_context("variant", name),
                ));
            }
        }
        Ok(Self {
            builtins,
            addons: RwLock::new(VariantSet::new()),
        })
    }

    /// Adds or replaces a third-party variant; the last registration wins.
    pub fn register(&self, variant: SharedVariant) -> Result<(), VarspaceError> {
        validate_variant_name(variant.name())?;
        let name = variant.name().to_string();
        let replaced = self.addons.write().upsert(variant);
        debug!(variant = %name, replaced, "registered third-party variant");
        Ok(())
    }

    /// Consistent snapshot of built-ins overlaid with third-party additions.
    ///
    /// An addition sharing a built-in's name takes the built-in's position.
    pub fn all(&self) -> VariantSet {
        let addons = self.addons.read();
        let mut all = self.builtins.clone();
        for variant in addons.iter() {
            all.upsert(variant.clone());
        }
        all
    }

    /// Names of the built-in variants in discovery order.
    pub fn builtin_names(&self) -> Vec<&str> {
        self.builtins.names()
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantRegistry")
            .field("builtins", &self.builtins)
            .field("addons", &*self.addons.read())
            .finish()
    }
}
