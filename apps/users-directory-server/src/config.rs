//! Layered server configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file given with
//! `--config`, `APP__*` environment variables (`__` separates nesting
//! levels), then command-line overrides.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use users_directory::UsersDirectoryConfig;
use users_directory::config::duration_serde;

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub users_directory: UsersDirectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Requests running longer than this are cancelled.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `users_directory=debug,info`.
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

fn default_bind_addr() -> String {
    "127.0.0.1:8087".to_owned()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl AppConfig {
    /// Defaults, then the optional YAML file, then `APP__*` environment variables.
    ///
    /// # Errors
    /// Fails on unreadable or malformed YAML, unknown keys, or values of the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to parse configuration")
    }

    /// Apply command-line overrides; these win over every other layer.
    pub fn apply_cli_overrides(&mut self, bind: Option<&str>) {
        if let Some(bind) = bind {
            self.server.bind_addr = bind.to_owned();
        }
    }

    /// # Errors
    /// Fails if `server.bind_addr` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid server.bind_addr '{}'", self.server.bind_addr))
    }

    /// Checks that cannot be expressed in the serde schema.
    ///
    /// # Errors
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        let ud = &self.users_directory;
        if ud.max_page_size == 0 {
            anyhow::bail!("users_directory.max_page_size must be positive");
        }
        if i32::try_from(ud.max_page_size).is_err() {
            anyhow::bail!("users_directory.max_page_size is too large");
        }
        if !(4..=31).contains(&ud.bcrypt_cost) {
            anyhow::bail!("users_directory.bcrypt_cost must be within 4..=31");
        }
        if ud.min_password_length == 0 {
            anyhow::bail!("users_directory.min_password_length must be positive");
        }
        Ok(())
    }

    /// # Errors
    /// Fails if the configuration cannot be serialized.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration as YAML")
    }
}
