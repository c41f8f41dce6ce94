//! Unified error types surfaced by the runtime API.
//!
//! Wraps kit rejections and repository failures so hosts can bubble them up
//! with consistent context.

use solar_core::{AbilityError, EntityId, ErrorSeverity, KitError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("entity {0} does not hold the solar capability")]
    NoCapability(EntityId),

    #[error("entity {0} already holds the solar capability")]
    AlreadyGranted(EntityId),

    #[error(transparent)]
    Ability(#[from] AbilityError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RuntimeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::NoCapability(_) | RuntimeError::AlreadyGranted(_) => {
                ErrorSeverity::Validation
            }
            RuntimeError::Ability(error) => error.severity(),
            RuntimeError::Repository(_) => ErrorSeverity::Internal,
        }
    }
}
