//! HS256 token validation backed by `jsonwebtoken`.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use secrecy::ExposeSecret;

use crate::{claims::Claims, config::AuthConfig, errors::AuthError, traits::TokenValidator};

pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    #[must_use]
    pub fn new(cfg: &AuthConfig) -> Self {
        let key = DecodingKey::from_secret(cfg.jwt_secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = cfg.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(iss) = &cfg.issuer {
            validation.set_issuer(&[iss]);
        }

        Self { key, validation }
    }

    /// Decode and verify a token.
    ///
    /// # Errors
    /// [`AuthError::TokenExpired`] for expired tokens, [`AuthError::InvalidToken`]
    /// for any other signature, format or claim failure.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        // Reject tokens whose subject is not a user id up front.
        data.claims.user_id()?;
        Ok(data.claims)
    }
}

#[async_trait]
impl TokenValidator for JwtValidator {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate(token)
    }
}
