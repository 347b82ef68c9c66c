use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_base_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}
fn default_token_key() -> String {
    "token".to_string()
}
fn default_login_path() -> String {
    "/login".to_string()
}
fn default_update_content_type() -> String {
    "application/json".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Session persistence and logout behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Credential store key holding the bearer token (defaults to `token`).
    #[serde(default = "default_token_key")]
    pub token_key: String,
    /// Where to navigate after an authorization failure (defaults to `/login`).
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: default_token_key(),
            login_path: default_login_path(),
        }
    }
}

/// Request client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Content type declared on `update` calls, including multipart ones.
    #[serde(default = "default_update_content_type")]
    pub update_content_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            update_content_type: default_update_content_type(),
        }
    }
}

/// Logging output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset (defaults to `info`).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Credential store location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `SQLite` database path (defaults to `~/.pitchside/session.db`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API root that resource locators are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session: SessionConfig::default(),
            client: ClientConfig::default(),
            log: LogConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Prefix for environment overrides; nested keys use `__`
/// (e.g. `PITCHSIDE_SESSION__LOGIN_PATH`).
const ENV_PREFIX: &str = "PITCHSIDE_";

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from a file path, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
    }

    /// Loads defaults, then the optional YAML file, then environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a source cannot be parsed.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}
