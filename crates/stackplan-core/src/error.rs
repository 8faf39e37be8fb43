//! Error types for stackplan.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
