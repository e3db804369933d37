//! Axum extractors and middleware for auth

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, Method, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{errors::AuthError, security_ctx::SecurityContext, traits::TokenValidator};

/// Extractor for [`SecurityContext`]; requires [`auth_optional`] to have run.
#[derive(Debug, Clone, Copy)]
pub struct Authz(pub SecurityContext);

impl<S> FromRequestParts<S> for Authz
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .copied()
            .map(Authz)
            .ok_or_else(|| {
                AuthError::Internal(
                    "SecurityContext not found - auth middleware not configured".to_owned(),
                )
            })
    }
}

#[derive(Clone)]
pub struct AuthState {
    validator: Arc<dyn TokenValidator>,
}

impl AuthState {
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }
}

/// Optional-auth middleware.
///
/// Every route accepts anonymous callers; per-operation access is decided by
/// the module. A valid bearer token attaches the user's context, a missing or
/// invalid one attaches an anonymous context.
pub async fn auth_optional(
    State(AuthState { validator }): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_preflight_request(request.method(), request.headers()) {
        return next.run(request).await;
    }

    let ctx = match extract_bearer_token(request.headers()) {
        Some(token) => match validator.validate_and_parse(token).await {
            Ok(claims) => match claims.user_id() {
                Ok(user_id) => {
                    request.extensions_mut().insert(claims);
                    SecurityContext::for_user(user_id)
                }
                Err(err) => {
                    tracing::debug!("Optional auth: invalid subject: {err}");
                    SecurityContext::anonymous()
                }
            },
            Err(err) => {
                tracing::debug!("Optional auth: invalid token: {err}");
                SecurityContext::anonymous()
            }
        },
        None => SecurityContext::anonymous(),
    };

    request.extensions_mut().insert(ctx);
    next.run(request).await
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
}

fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(axum::http::header::ORIGIN)
        && headers.contains_key(axum::http::header::ACCESS_CONTROL_REQUEST_METHOD)
}
