//! Domain errors for the Lexicon translation store.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the Lexicon system.
///
/// Expected absences (a translation or tag that does not exist) are reported
/// as `None`/`false` by repositories and services. The `*NotFound` variants are
/// raised only by the outer surfaces that must turn an absence into a failure.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Translation not found: {0}")]
    TranslationNotFound(Uuid),

    #[error("Tag not found: {0}")]
    TagNotFound(Uuid),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::UniqueViolation(db.message().to_string())
            }
            _ => DomainError::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<crate::domain::ports::CacheError> for DomainError {
    fn from(err: crate::domain::ports::CacheError) -> Self {
        DomainError::CacheError(err.to_string())
    }
}
