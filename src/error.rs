use thiserror::Error;

use crate::attachment::AttachmentError;
use crate::core::db::Status;
use crate::validation::ValidationError;

/// Failures a user-triggered action can end in. None of them are retried.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    #[error("Session expired")]
    SessionExpired,
    #[error("Cannot change status from {from} to {to}")]
    IllegalTransition { from: Status, to: Status },
    #[error("Admin role required to {0}")]
    Forbidden(&'static str),
    #[error(transparent)]
    Store(anyhow::Error),
}

impl From<anyhow::Error> for RegistryError {
    /// Unwraps registry errors raised inside the store so callers can match
    /// on them; anything else is a store failure.
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<RegistryError>() {
            Ok(registry) => registry,
            Err(other) => RegistryError::Store(other),
        }
    }
}
