//! Configuration management for Cofound
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{CofoundError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Cofound
///
/// This structure holds everything needed to reach the co-founder backend
/// and to tune the client-side reconciliation behavior. The list/board poll
/// cadence is deliberately not configurable here; it is a protocol constant
/// owned by the synchronizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote agent server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Session identity and reconciliation settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Remote agent server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the agent backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Session identity and reconciliation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Prefix for client-generated thread ids (`<prefix>-<millis>`)
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// How many accepted-but-inconsistent polls an optimistic mutation
    /// survives before the authoritative value shows through
    #[serde(default = "default_reconcile_poll_budget")]
    pub reconcile_poll_budget: u8,
}

fn default_id_prefix() -> String {
    "founder".to_string()
}

fn default_reconcile_poll_budget() -> u8 {
    3
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            reconcile_poll_budget: default_reconcile_poll_budget(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with file, environment, and CLI layering
    ///
    /// Precedence, lowest to highest: built-in defaults, config file,
    /// `COFOUND_*` environment variables, CLI flags.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                Self::from_file(&user_path.to_string_lossy())?
            } else {
                tracing::warn!("Config file not found at {}, using defaults", path);
                Self::default()
            }
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Default per-user config file location (`<config dir>/cofound/config.yaml`)
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cofound")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CofoundError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CofoundError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("COFOUND_SERVER_URL") {
            tracing::debug!(base_url = %base_url, "Env override: COFOUND_SERVER_URL");
            self.server.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("COFOUND_REQUEST_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(v) => self.server.request_timeout_seconds = v,
                Err(_) => tracing::warn!("Invalid COFOUND_REQUEST_TIMEOUT: {}", timeout),
            }
        }

        if let Ok(prefix) = std::env::var("COFOUND_ID_PREFIX") {
            tracing::debug!(prefix = %prefix, "Env override: COFOUND_ID_PREFIX");
            self.session.id_prefix = prefix;
        }

        if let Ok(budget) = std::env::var("COFOUND_RECONCILE_BUDGET") {
            match budget.parse::<u8>() {
                Ok(v) => self.session.reconcile_poll_budget = v,
                Err(_) => tracing::warn!("Invalid COFOUND_RECONCILE_BUDGET: {}", budget),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(server) = &cli.server {
            tracing::debug!(server = %server, "CLI override: --server");
            self.server.base_url = server.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error for an unparseable base URL, a zero timeout, an empty
    /// or malformed id prefix, or a zero reconciliation budget
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.server.base_url)
            .map_err(|e| CofoundError::Config(format!("Invalid server.base_url: {}", e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(CofoundError::Config(format!(
                "server.base_url must be http or https, got: {}",
                parsed.scheme()
            ))
            .into());
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(CofoundError::Config(
                "server.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.session.id_prefix.is_empty() {
            return Err(
                CofoundError::Config("session.id_prefix cannot be empty".to_string()).into(),
            );
        }

        if self
            .session
            .id_prefix
            .chars()
            .any(|c| c.is_whitespace() || c == '/')
        {
            return Err(CofoundError::Config(
                "session.id_prefix cannot contain whitespace or '/'".to_string(),
            )
            .into());
        }

        if self.session.reconcile_poll_budget == 0 {
            return Err(CofoundError::Config(
                "session.reconcile_poll_budget must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
