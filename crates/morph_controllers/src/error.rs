//! Controller errors

use morph_animation::EasingParseError;
use morph_core::{ModelError, NodeId};
use morph_dom::DomError;
use thiserror::Error;

/// Errors raised while loading a [`TransformConfig`](crate::TransformConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid transform config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    InvalidEasing(#[from] EasingParseError),

    #[error("origin fallback must be finite, got {0}")]
    InvalidOriginFallback(f32),
}

/// Errors raised by the transform controller
#[derive(Debug, Error)]
pub enum TransformError {
    /// A node aliases a helper name that was never registered
    #[error("no transform helper named '{name}'")]
    HelperNotFound { name: String },

    /// A helper was registered without an explicit or attribute name
    #[error("transform helper on {node:?} has no name")]
    UnnamedHelper { node: NodeId },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by the optional controller
#[derive(Debug, Error)]
pub enum OptionalError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("template rendered no element into {parent:?}")]
    NothingMounted { parent: NodeId },
}

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, TransformError>;
