//! Ruleta configuration system.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! TOML file, environment variables, and finally CLI flags (applied by the
//! binary). The resulting struct is passed explicitly to every component.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RuletaError};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuletaConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
}

impl RuletaConfig {
    /// Load config from a TOML file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuletaError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| RuletaError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values count as unset.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("RULETA_HOST") {
            self.gateway.host = host;
        }
        if let Some(port) = var("RULETA_PORT").and_then(|v| parse_port("RULETA_PORT", &v)) {
            self.gateway.port = port;
        }
        if let Some(dir) = var("RULETA_FRONTEND_DIR") {
            self.gateway.frontend_dir = dir;
        }
        if let Some(dir) = var("RULETA_DATA_DIR") {
            self.storage.data_dir = dir;
        }
        if let Some(host) = var("SMTP_SERVER") {
            self.smtp.host = host;
        }
        if let Some(port) = var("SMTP_PORT").and_then(|v| parse_port("SMTP_PORT", &v)) {
            self.smtp.port = port;
        }
        if let Some(user) = var("SMTP_USER") {
            self.smtp.username = Some(user);
        }
        if let Some(password) = var("SMTP_PASSWORD") {
            self.smtp.password = Some(password);
        }
    }
}

fn parse_port(key: &str, value: &str) -> Option<u16> {
    value
        .trim()
        .parse()
        .map_err(|e| tracing::warn!("Invalid {key} value {value:?}: {e}"))
        .ok()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Build output of the frontend (contains `index.html` and `assets/`).
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8000 }
fn default_frontend_dir() -> String { "frontend/dist".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_dir: default_frontend_dir(),
            cors_origins: Vec::new(),
        }
    }
}

/// Flat-file storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_participants_file")]
    pub participants_file: String,
    #[serde(default = "default_history_file")]
    pub history_file: String,
}

fn default_data_dir() -> String { "data".into() }
fn default_participants_file() -> String { "participants.json".into() }
fn default_history_file() -> String { "assignments.json".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            participants_file: default_participants_file(),
            history_file: default_history_file(),
        }
    }
}

impl StorageConfig {
    pub fn participants_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.participants_file)
    }

    pub fn history_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.history_file)
    }
}

/// Outgoing mail relay. Without both username and password, email is disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,
}

fn default_smtp_host() -> String { "smtp.gmail.com".into() }
fn default_smtp_port() -> u16 { 587 }
fn default_smtp_timeout() -> u64 { 10 }

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
            timeout_secs: default_smtp_timeout(),
        }
    }
}

impl SmtpConfig {
    /// Username and password, if both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}
