//! The module contains the error the engine can throw.
//!
//! Every error maps to a stable [`ErrorKind`] so callers can branch on it
//! without parsing messages:
//!
//! - [`KeyNotFound`] thrown when an item is absent *or* owned by someone else.
//! - [`InvalidAmount`], [`InvalidInput`] and [`InvalidId`] for malformed
//!   requests.
//! - [`ExistingKey`] and [`HasDependents`] for conflicts with stored state.
//! - [`Database`] for store failures (the surrounding unit of work is rolled
//!   back).
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`InvalidId`]: EngineError::InvalidId
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`HasDependents`]: EngineError::HasDependents
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Not found: {0}")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Cannot delete: {0}")]
    HasDependents(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Machine-checkable classification of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyNotFound(_) => ErrorKind::NotFound,
            Self::ExistingKey(_) | Self::HasDependents(_) => ErrorKind::Conflict,
            Self::InvalidAmount(_) | Self::InvalidInput(_) | Self::InvalidId(_) => {
                ErrorKind::BadRequest
            }
            Self::Database(_) => ErrorKind::Internal,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::HasDependents(a), Self::HasDependents(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
