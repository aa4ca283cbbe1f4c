//! Facade error type
//!
//! Client failures never surface as errors: they are normalized into an
//! `OperationResult`. `CompatError` only covers inputs the facade rejects
//! before any client call is made, and configuration files.

use kvcompat_core::Error as CoreError;
use thiserror::Error;

use crate::result::ResultCode;

/// Result type for facade input validation
pub type Result<T> = std::result::Result<T, CompatError>;

/// Input rejected by the facade
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompatError {
    /// A required collection was absent
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// A user key or digest could not address a record
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Configuration file could not be read, parsed or written
    #[error("config error: {0}")]
    Config(String),
}

impl CompatError {
    /// Legacy result code for this error
    pub fn result_code(&self) -> ResultCode {
        match self {
            CompatError::MissingParameter(_)
            | CompatError::InvalidKey(_)
            | CompatError::Config(_) => ResultCode::ParameterError,
        }
    }
}

impl From<CoreError> for CompatError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidKey(msg) => CompatError::InvalidKey(msg),
        }
    }
}
