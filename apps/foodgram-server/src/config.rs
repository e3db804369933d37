//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults, YAML file, `APP__*`
//! environment variables (`__` separates nesting), CLI overrides.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use foodgram::FoodgramConfig;
use foodgram_auth::AuthConfig;
use foodgram_db::DbConfig;
use foodgram_http::HttpConfig;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file does not exist: {0}")]
    MissingFile(PathBuf),

    #[error("failed to load configuration: {0}")]
    Load(Box<figment::Error>),

    #[error("server.public_base_url is not a valid URL: {0}")]
    PublicBase(#[from] url::ParseError),

    #[error("auth.jwt_secret must not be empty")]
    EmptySecret,

    #[error("failed to render configuration: {0}")]
    Render(#[from] serde_yaml::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Load(Box::new(e))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info,sqlx=warn`. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub database: DbConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub foodgram: FoodgramConfig,
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then the environment.
    ///
    /// # Errors
    /// Fails when the file is missing or any layer does not fit the schema.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `--port` and `--mock`.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>, mock: bool) {
        if let Some(port) = port {
            self.server.bind_addr = with_port(&self.server.bind_addr, port);
        }
        if mock {
            self.database = DbConfig::in_memory();
        }
    }

    /// # Errors
    /// Reports the first setting that cannot be used at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.public_base()?;
        if self.auth.jwt_secret.expose_secret().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(())
    }

    /// Effective configuration as YAML; the JWT secret is redacted.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Replace the port of `host:port`, keeping IPv6 brackets intact.
fn with_port(bind_addr: &str, port: u16) -> String {
    let host = match bind_addr.rsplit_once(':') {
        Some((host, tail)) if !tail.contains(']') => host,
        _ => bind_addr,
    };
    format!("{host}:{port}")
}
