//! Dataset property bag and its precondition check.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorInfo, Result, VarspaceError};

/// Key listing the numerical column identifiers.
pub const NUMERICAL_COLUMNS: &str = "numerical_columns";
/// Key listing the categorical column identifiers.
pub const CATEGORICAL_COLUMNS: &str = "categorical_columns";
/// Optional key flagging sparse input matrices.
pub const IS_SPARSE: &str = "issparse";

const REQUIRED_PROPERTIES: [&str; 2] = [NUMERICAL_COLUMNS, CATEGORICAL_COLUMNS];

/// Opaque mapping from property name to value describing a dataset.
///
/// Only the column listings (and the optional sparsity flag) are read by the
/// engine; every other key is carried through untouched to variant
/// sub-space constructors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetProperties {
    values: BTreeMap<String, Value>,
}

impl DatasetProperties {
    /// Creates an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tabular property bag with the two required column listings.
    pub fn tabular<N, C>(numerical: N, categorical: C) -> Self
    where
        N: IntoIterator,
        N::Item: Into<Value>,
        C: IntoIterator,
        C::Item: Into<Value>,
    {
        let mut props = Self::new();
        props.insert(
            NUMERICAL_COLUMNS,
            Value::Array(numerical.into_iter().map(Into::into).collect()),
        );
        props.insert(
            CATEGORICAL_COLUMNS,
            Value::Array(categorical.into_iter().map(Into::into).collect()),
        );
        props
    }

    /// Inserts or replaces a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder style variant of [`DatasetProperties::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns true when `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterates over all properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Numerical column identifiers; a non-sequence value counts as none.
    pub fn numerical_columns(&self) -> &[Value] {
        self.columns(NUMERICAL_COLUMNS)
    }

    /// Categorical column identifiers; a non-sequence value counts as none.
    pub fn categorical_columns(&self) -> &[Value] {
        self.columns(CATEGORICAL_COLUMNS)
    }

    /// Returns true when at least one numerical column is listed.
    pub fn has_numerical_columns(&self) -> bool {
        !self.numerical_columns().is_empty()
    }

    /// Returns the sparsity flag, defaulting to dense.
    pub fn is_sparse(&self) -> bool {
        self.get(IS_SPARSE)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Layers `overlay` over `base`; keys present in `overlay` win.
    pub fn merged(base: &DatasetProperties, overlay: &DatasetProperties) -> DatasetProperties {
        let mut values = base.values.clone();
        for (key, value) in &overlay.values {
            values.insert(key.clone(), value.clone());
        }
        DatasetProperties { values }
    }

    fn columns(&self, key: &str) -> &[Value] {
        match self.values.get(key) {
            Some(Value::Array(columns)) => columns,
            _ => &[],
        }
    }
}

/// Ensures the property bag carries the column listings the filter needs.
pub fn check_dataset_properties(props: &DatasetProperties) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_PROPERTIES
        .iter()
        .copied()
        .filter(|key| !props.contains_key(key))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(VarspaceError::MissingDatasetProperty(
        ErrorInfo::new(
            "varspace_core.missing_dataset_property",
            "dataset properties must describe the column types",
        )
        .with_list("missing", &missing)
        .with_list("required", REQUIRED_PROPERTIES)
        .with_hint("provide numerical_columns and categorical_columns, possibly empty"),
    ))
}
