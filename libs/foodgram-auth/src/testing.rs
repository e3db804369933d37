//! Token minting for tests. Production tokens come from the external issuer.

#![allow(clippy::expect_used)]

use jsonwebtoken::{EncodingKey, Header, encode};
use time::OffsetDateTime;

use crate::claims::Claims;

/// Mint a one-hour HS256 token for `user_id`.
#[must_use]
pub fn mint_token(secret: &str, user_id: i64) -> String {
    mint_token_with(secret, &user_id.to_string(), 3600, None)
}

/// Mint a token with an explicit subject, lifetime offset and issuer.
#[must_use]
pub fn mint_token_with(secret: &str, sub: &str, ttl_seconds: i64, iss: Option<&str>) -> String {
    let claims = Claims {
        sub: sub.to_owned(),
        exp: OffsetDateTime::now_utc().unix_timestamp() + ttl_seconds,
        iss: iss.map(str::to_owned),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("HS256 encoding does not fail")
}
