//! Authentication for the Foodgram API.
//!
//! Tokens are issued elsewhere; this crate only validates HS256 bearer tokens
//! and turns them into a [`SecurityContext`] attached to every request.

pub mod axum_ext;
pub mod claims;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod security_ctx;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use axum_ext::{AuthState, Authz, auth_optional};
pub use claims::Claims;
pub use config::AuthConfig;
pub use errors::AuthError;
pub use jwt::JwtValidator;
pub use security_ctx::SecurityContext;
pub use traits::TokenValidator;
