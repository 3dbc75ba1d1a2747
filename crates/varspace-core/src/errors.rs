//! Structured error types shared across varspace crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`VarspaceError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (expected sets, offending values, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Adds a context entry rendering a list of names as `[a, b, c]`.
    pub fn with_list<I, S>(self, key: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rendered = items
            .into_iter()
            .map(|item| item.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.with_context(key, format!("[{rendered}]"))
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the varspace engine.
///
/// Every failure is a deterministic logical error: none of them are worth
/// retrying, and no partially composed space is ever handed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", content = "detail")]
pub enum VarspaceError {
    /// A required dataset property key is absent.
    #[error("missing dataset property: {0}")]
    MissingDatasetProperty(ErrorInfo),
    /// Name based narrowing or applicability left no variant.
    #[error("no applicable variant: {0}")]
    NoApplicableVariant(ErrorInfo),
    /// An include list names a variant the registry does not know.
    #[error("unknown variant: {0}")]
    UnknownVariant(ErrorInfo),
    /// The preference scan found no default and none was given.
    #[error("no default found: {0}")]
    NoDefaultFound(ErrorInfo),
    /// The include list conflicts with a purely categorical dataset.
    #[error("incompatible dataset: {0}")]
    IncompatibleDataset(ErrorInfo),
    /// An override range is malformed or not a subset of the legal values.
    #[error("invalid override domain: {0}")]
    InvalidOverrideDomain(ErrorInfo),
    /// An override range is impossible for the dataset at hand.
    #[error("incompatible dataset override: {0}")]
    IncompatibleDatasetOverride(ErrorInfo),
    /// An override default lies outside its own range.
    #[error("invalid override default: {0}")]
    InvalidOverrideDefault(ErrorInfo),
    /// A variant violates the registration contract.
    #[error("registration error: {0}")]
    Registration(ErrorInfo),
    /// Structural configuration space violations.
    #[error("space error: {0}")]
    Space(ErrorInfo),
    /// Serialization, schema and IO errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl VarspaceError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            VarspaceError::MissingDatasetProperty(info)
            | VarspaceError::NoApplicableVariant(info)
            | VarspaceError::UnknownVariant(info)
            | VarspaceError::NoDefaultFound(info)
            | VarspaceError::IncompatibleDataset(info)
            | VarspaceError::InvalidOverrideDomain(info)
            | VarspaceError::IncompatibleDatasetOverride(info)
            | VarspaceError::InvalidOverrideDefault(info)
            | VarspaceError::Registration(info)
            | VarspaceError::Space(info)
            | VarspaceError::Serde(info) => info,
        }
    }

    /// Shorthand for a structural configuration space error.
    pub fn space(code: &str, message: impl Into<String>) -> Self {
        VarspaceError::Space(ErrorInfo::new(code, message))
    }

    /// Shorthand for an IO or (de)serialization error.
    pub fn serde(code: &str, err: impl ToString) -> Self {
        VarspaceError::Serde(ErrorInfo::new(code, err.to_string()))
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T, E = VarspaceError> = std::result::Result<T, E>;
