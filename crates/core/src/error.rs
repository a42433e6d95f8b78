//! Error types for the Zenith AI backend.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, embedding and completion providers,
//! the relational store, and serialization.

use thiserror::Error;

/// Unified error type for the Zenith AI backend.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
///
/// The `Config` variant marks "not configured" conditions (a missing API key
/// or endpoint). Callers use it to skip work entirely rather than treat the
/// failure as transient, so keep it distinct from `Embedding`/`Llm`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing credentials, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding provider errors (network, auth, quota)
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Chat completion provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Relational data store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error means "not configured" rather than a transient
    /// failure. Automatic retries and re-index loops should bail on these.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
