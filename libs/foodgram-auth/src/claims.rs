use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id, as a string per RFC 7519.
    pub sub: String,
    /// Expiration as seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Parse the subject into a user id.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidToken`] when `sub` is not an integer.
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken(format!("subject '{}' is not a user id", self.sub)))
    }
}
