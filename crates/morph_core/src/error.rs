//! Model error types

use thiserror::Error;

use crate::model::AttrType;

/// Errors raised by attribute models
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The attribute is not declared in the schema
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The value does not match the declared attribute type
    #[error("Type mismatch for '{name}': expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        name: String,
        expected: AttrType,
        actual: AttrType,
    },

    /// A required attribute has neither a value nor a default
    #[error("Missing required attribute: {0}")]
    MissingRequired(String),
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
