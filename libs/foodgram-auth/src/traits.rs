use async_trait::async_trait;

use crate::{claims::Claims, errors::AuthError};

/// Validates a raw bearer token and returns its claims.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError>;
}
