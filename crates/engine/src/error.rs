//! The module contains the error the engine can throw.
//!
//! The errors are split along the lines callers react to: validation is
//! rejected before persistence, conflicts are recoverable by re-reading
//! state, authorization and not-found are terminal, and database errors
//! propagate for the caller to retry.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Event full: {0}")]
    EventFull(String),
    #[error("Event not open: {0}")]
    EventNotOpen(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::AlreadyRegistered(a), Self::AlreadyRegistered(b)) => a == b,
            (Self::EventFull(a), Self::EventFull(b)) => a == b,
            (Self::EventNotOpen(a), Self::EventNotOpen(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
