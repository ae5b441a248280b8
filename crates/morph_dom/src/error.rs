//! Document error types

use morph_core::NodeId;
use thiserror::Error;

/// Document-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    /// The node id does not belong to this document
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// The node is not an element
    #[error("Node is not an element: {0:?}")]
    NotAnElement(NodeId),

    /// Appending would make a node its own ancestor
    #[error("Cannot append {child:?} inside itself")]
    Hierarchy { child: NodeId },

    /// Markup could not be parsed
    #[error("Markup error at line {line}, column {column}: {message}")]
    Markup {
        line: usize,
        column: usize,
        message: String,
    },

    /// Selector could not be parsed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DomError>;
