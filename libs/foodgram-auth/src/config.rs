use secrecy::SecretString;
use serde::{Deserialize, Serialize, Serializer};

fn default_leeway_seconds() -> u64 {
    60
}

fn redact<S: Serializer>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("***")
}

/// Token validation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Shared HS256 secret of the token issuer.
    #[serde(serialize_with = "redact")]
    pub jwt_secret: SecretString,

    /// Expected `iss` claim; not checked when unset.
    #[serde(default)]
    pub issuer: Option<String>,

    /// Clock skew tolerated for `exp`.
    #[serde(default = "default_leeway_seconds")]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::from("change-me"),
            issuer: None,
            leeway_seconds: default_leeway_seconds(),
        }
    }
}
