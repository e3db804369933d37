use foodgram_db::DbError;
use foodgram_errors::FieldErrors;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Authentication credentials were not provided")]
    Unauthenticated,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    /// Relation toggle hit the wrong state (already present, not present, self).
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Single field error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        Self::Validation(errors)
    }
}

impl From<DbError> for DomainError {
    fn from(e: DbError) -> Self {
        Self::database(e.to_string())
    }
}

impl From<foodgram_auth::AuthError> for DomainError {
    fn from(e: foodgram_auth::AuthError) -> Self {
        match e {
            foodgram_auth::AuthError::Forbidden => Self::Forbidden,
            foodgram_auth::AuthError::Internal(msg) => Self::database(msg),
            _ => Self::Unauthenticated,
        }
    }
}
