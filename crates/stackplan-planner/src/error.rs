//! Planning errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("configuration error: {0}")]
    Config(#[from] stackplan_config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] stackplan_core::Error),
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;
