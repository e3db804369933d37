use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

fn default_bind_addr() -> String {
    "127.0.0.1:8087".to_owned()
}

fn default_public_base_url() -> String {
    "http://localhost:8087".to_owned()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_body_limit_bytes() -> usize {
    16 * 1024 * 1024
}

/// HTTP server settings (`server` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Absolute base used for pagination links and recipe short links.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Recipe images and avatars travel inline as base64, so this is generous.
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,

    #[serde(default)]
    pub cors: Option<CorsConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_base_url: default_public_base_url(),
            request_timeout: default_request_timeout(),
            body_limit_bytes: default_body_limit_bytes(),
            cors: None,
        }
    }
}

impl HttpConfig {
    /// Parsed `public_base_url`, always ending with `/` so that joins keep the path.
    ///
    /// # Errors
    /// Returns the parse error for a malformed URL.
    pub fn public_base(&self) -> Result<Url, url::ParseError> {
        let raw = self.public_base_url.trim_end_matches('/');
        Url::parse(&format!("{raw}/"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub allowed_methods: Vec<String>,
    #[serde(default)]
    pub allowed_headers: Vec<String>,
    #[serde(default)]
    pub allow_credentials: bool,
    #[serde(default)]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
            allowed_methods: vec!["*".to_owned()],
            allowed_headers: vec!["*".to_owned()],
            allow_credentials: false,
            max_age_seconds: 600,
        }
    }
}
