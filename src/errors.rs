use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the engine, its services, and storage backends.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Operation not allowed: {0}")]
    InvalidOperation(String),
    #[error("Consistency failure: {0}")]
    Consistency(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type EngineResult<T> = StdResult<T, EngineError>;

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}
