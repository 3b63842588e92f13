//! Application configuration.
//!
//! Loaded from an optional YAML file, then overridden by environment
//! variables prefixed with `PARKAPI__` where `__` separates nesting levels
//! (`PARKAPI__AUTH__JWT__SECRET` sets `auth.jwt.secret`). Every field has a
//! default, so an empty configuration is valid.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, bail};
use auth::AuthConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "PARKAPI__";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    /// Admin account created at startup if the username does not exist yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub cors_enabled: bool,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            cors_enabled: false,
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins: `["*"]` means any
    pub allowed_origins: Vec<String>,
    /// Max age for preflight caching in seconds
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
            max_age_seconds: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `info,auth=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapAdminConfig {
    pub username: String,
    #[serde(
        deserialize_with = "auth::config::deserialize_secret",
        serialize_with = "auth::config::serialize_redacted"
    )]
    pub password: SecretString,
}

impl AppConfig {
    /// Load from `path` (if given) and the environment.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist or any source does not parse.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.exists() {
                bail!("configuration file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(&figment)
    }

    /// # Errors
    ///
    /// Fails if the merged sources do not match the configuration shape.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        figment
            .extract()
            .context("failed to parse configuration")
    }

    /// # Errors
    ///
    /// Fails on an unparsable bind address or invalid auth settings.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.bind_addr()?;
        self.auth.validate().context("invalid auth configuration")?;
        Ok(())
    }

    /// # Errors
    ///
    /// Fails if `server.bind_addr` is not a socket address.
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.server.bind_addr))
    }

    /// Pretty JSON with secrets replaced by a placeholder.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn to_redacted_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize configuration")
    }
}
