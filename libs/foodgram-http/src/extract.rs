//! Extractors whose rejections render as problems instead of plain text.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
};
use foodgram_errors::{Problem, problems};
use serde::de::DeserializeOwned;

/// JSON body extractor; malformed bodies become a 400 problem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_to_problem(&rejection)),
        }
    }
}

fn json_rejection_to_problem(rejection: &JsonRejection) -> Problem {
    tracing::debug!(error = %rejection.body_text(), "rejected JSON body");
    let detail = rejection.body_text();
    match rejection {
        JsonRejection::MissingJsonContentType(_) => Problem::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type",
            detail,
        )
        .with_code("UNSUPPORTED_MEDIA_TYPE"),
        JsonRejection::JsonSyntaxError(_) => {
            problems::bad_request(detail).with_code("MALFORMED_JSON")
        }
        _ => problems::bad_request(detail).with_code("INVALID_BODY"),
    }
}

/// Path extractor; unparsable ids are treated as missing resources.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "rejected path");
                Err(problems::not_found("Not found.").with_code("NOT_FOUND"))
            }
        }
    }
}
