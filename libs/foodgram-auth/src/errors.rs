use axum::response::{IntoResponse, Response};
use foodgram_errors::problems;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication credentials were not provided")]
    Unauthenticated,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                problems::unauthorized(self.to_string())
                    .with_code("UNAUTHENTICATED")
                    .into_response()
            }
            AuthError::Forbidden => problems::forbidden(self.to_string())
                .with_code("FORBIDDEN")
                .into_response(),
            AuthError::Internal(ref msg) => {
                tracing::error!(error = %msg, "auth internal error");
                problems::internal_error("Internal authentication error")
                    .with_code("INTERNAL")
                    .into_response()
            }
        }
    }
}
