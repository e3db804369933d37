use axum::http::StatusCode;
use foodgram_errors::{Problem, problems};

use crate::domain::error::DomainError;

/// Map a domain error to an RFC 9457 problem.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let problem = match e {
        DomainError::NotFound { .. } => problems::not_found("Not found.").with_code("NOT_FOUND"),
        DomainError::Unauthenticated => {
            problems::unauthorized("Authentication credentials were not provided.")
                .with_code("UNAUTHENTICATED")
        }
        DomainError::Forbidden => {
            problems::forbidden("You do not have permission to perform this action.")
                .with_code("FORBIDDEN")
        }
        DomainError::Validation(fields) => problems::bad_request("Validation failed")
            .with_code("VALIDATION")
            .with_field_errors(fields.clone()),
        DomainError::Conflict(message) => problems::bad_request(message.clone())
            .with_code("CONFLICT")
            .with_message(message.clone()),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal database error occurred",
            )
            .with_code("INTERNAL")
        }
    };

    let problem = problem.with_instance(instance);
    match trace_id {
        Some(id) => problem.with_trace_id(id),
        None => problem,
    }
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e, "/")
    }
}
