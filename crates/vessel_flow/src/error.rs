//! # Flow Error Types
//!
//! Errors only happen at the configuration boundary. Exchanges, stores and
//! limiters clamp instead of failing.

use thiserror::Error;

/// Errors that can occur while loading resource configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The configuration names a resource the model does not define.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// A capacity below zero was configured.
    #[error("negative capacity for resource {resource}")]
    NegativeCapacity {
        /// The offending resource name.
        resource: String,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("cannot read configuration {path}: {reason}")]
    ConfigRead {
        /// Path that was requested.
        path: String,
        /// Underlying IO error message.
        reason: String,
    },
}

/// Result type for flow configuration operations.
pub type FlowResult<T> = Result<T, FlowError>;
