//! Trigger error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Object URL not found: {0}")]
    ObjectUrlNotFound(String),
}
