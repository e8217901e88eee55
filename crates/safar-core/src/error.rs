//! Centralized error types for SAFAR.

use thiserror::Error;

use crate::broadcast::BroadcastError;

/// Main error type for SAFAR operations.
#[derive(Error, Debug)]
pub enum SafarError {
    #[error("Owner not found: {0}")]
    OwnerNotFound(String),

    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    #[error("Trip not found: {0}")]
    TripNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Broadcast(#[from] BroadcastError),

    #[error("Database error: {0}")]
    Database(#[from] safar_db::DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not initialized: {0}")]
    NotInitialized(String),
}

/// Result type for SAFAR operations.
pub type SafarResult<T> = Result<T, SafarError>;

impl SafarError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a not initialized error.
    pub fn not_initialized(msg: impl Into<String>) -> Self {
        Self::NotInitialized(msg.into())
    }

    /// Whether this error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::OwnerNotFound(_)
                | Self::DriverNotFound(_)
                | Self::TripNotFound(_)
                | Self::Database(safar_db::DbError::NotFound(_))
        )
    }
}
