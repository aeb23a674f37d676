// crates/pulsegate-config/src/config.rs
// ============================================================================
// Module: Pulsegate Configuration
// Description: Configuration model, env overrides, and validation.
// Purpose: Resolve one validated configuration for every entry point.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! The configuration model covers the two concerns every front-end shares:
//! how to listen (`[server]`) and how to reach the monitoring backend
//! (`[gateway]`). All sections and fields are optional in the file; defaults
//! target local development. Environment overrides are applied after file
//! load so containerized deployments can keep secrets out of the file.
//!
//! ## Invariants
//! - `validate` rejects any configuration a server could not run with:
//!   unparseable base URLs, out-of-bounds timeouts and body limits, HTTP
//!   transport without a bind address, stdio transport without a service key.
//! - Files larger than [`MAX_CONFIG_FILE_SIZE`] are rejected before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "pulsegate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PULSEGATE_CONFIG";
/// Environment variable overriding the backend base URL.
pub const API_URL_ENV_VAR: &str = "PULSEGATE_API_URL";
/// Environment variable overriding the backend API key.
pub const API_KEY_ENV_VAR: &str = "PULSEGATE_API_KEY";
/// Environment variable overriding the HTTP bind address.
pub const BIND_ENV_VAR: &str = "PULSEGATE_BIND";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3200";
/// Default gateway request timeout in milliseconds.
pub const DEFAULT_GATEWAY_TIMEOUT_MS: u64 = 30_000;
/// Minimum allowed gateway timeout in milliseconds.
pub const MIN_GATEWAY_TIMEOUT_MS: u64 = 100;
/// Maximum allowed gateway timeout in milliseconds.
pub const MAX_GATEWAY_TIMEOUT_MS: u64 = 600_000;
/// Default maximum request body size in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Minimum allowed request body size in bytes.
pub const MIN_MAX_BODY_BYTES: usize = 1024;
/// Maximum allowed request body size in bytes.
pub const MAX_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Transport used to serve MCP requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerTransport {
    /// Framed JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC over an HTTP endpoint.
    Http,
}

impl ServerTransport {
    /// Returns the canonical label for the transport.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Transport used to serve requests.
    pub transport: ServerTransport,
    /// Bind address for the HTTP transport.
    pub bind: Option<String>,
    /// Maximum allowed request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            bind: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Backend gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Backend base URL.
    pub base_url: String,
    /// Static service-level API key.
    pub api_key: String,
    /// Default request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_ms: DEFAULT_GATEWAY_TIMEOUT_MS,
        }
    }
}

/// Pulsegate MCP configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PulsegateConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Backend gateway configuration.
    pub gateway: GatewaySettings,
}

impl PulsegateConfig {
    /// Loads configuration from an explicit path, the [`CONFIG_ENV_VAR`]
    /// override, or the default filename, then applies env overrides.
    ///
    /// A missing file is an error when its path was requested explicitly
    /// (argument or env var) and silently yields defaults otherwise.
    /// Validation is left to the consumer so command-line overrides can be
    /// applied first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);
        let (path, required) = match (explicit, env_path) {
            (Some(path), _) => (path.to_path_buf(), true),
            (None, Some(path)) => (path, true),
            (None, None) => (PathBuf::from(DEFAULT_CONFIG_NAME), false),
        };
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if required {
            return Err(ConfigError::Missing {
                path: path.display().to_string(),
            });
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is oversized, unreadable, or
    /// not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                path: path.display().to_string(),
                size: metadata.len(),
            });
        }
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
        toml::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies environment overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| env::var(name).ok());
    }

    /// Applies environment overrides from an arbitrary lookup.
    ///
    /// Empty values are ignored so `FOO=` does not clear a configured value.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(API_URL_ENV_VAR).filter(|value| !value.is_empty()) {
            self.gateway.base_url = base_url;
        }
        if let Some(api_key) = lookup(API_KEY_ENV_VAR).filter(|value| !value.is_empty()) {
            self.gateway.api_key = api_key;
        }
        if let Some(bind) = lookup(BIND_ENV_VAR).filter(|value| !value.is_empty()) {
            self.server.bind = Some(bind);
        }
    }

    /// Validates the configuration, failing closed on anything a server
    /// could not run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = Url::parse(&self.gateway.base_url).map_err(|err| {
            ConfigError::Invalid(format!("gateway.base_url does not parse: {err}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "gateway.base_url scheme must be http or https, got {}",
                base_url.scheme()
            )));
        }
        if !(MIN_GATEWAY_TIMEOUT_MS ..= MAX_GATEWAY_TIMEOUT_MS).contains(&self.gateway.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "gateway.timeout_ms must be within {MIN_GATEWAY_TIMEOUT_MS}..={MAX_GATEWAY_TIMEOUT_MS}"
            )));
        }
        if !(MIN_MAX_BODY_BYTES ..= MAX_MAX_BODY_BYTES).contains(&self.server.max_body_bytes) {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be within {MIN_MAX_BODY_BYTES}..={MAX_MAX_BODY_BYTES}"
            )));
        }
        match self.server.transport {
            ServerTransport::Http => {
                let bind = self.server.bind.as_ref().ok_or_else(|| {
                    ConfigError::Invalid(
                        "server.bind is required for the http transport".to_string(),
                    )
                })?;
                bind.parse::<SocketAddr>().map_err(|_| {
                    ConfigError::Invalid(format!("server.bind is not a socket address: {bind}"))
                })?;
            }
            ServerTransport::Stdio => {
                if self.gateway.api_key.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "gateway.api_key (or {API_KEY_ENV_VAR}) is required for the stdio \
                         transport"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A requested configuration file does not exist.
    #[error("config file not found: {path}")]
    Missing {
        /// Path that was requested.
        path: String,
    },
    /// The configuration file could not be read.
    #[error("config file unreadable: {path}: {detail}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying failure description.
        detail: String,
    },
    /// The configuration file exceeds the size limit.
    #[error("config file too large: {path} ({size} bytes)")]
    TooLarge {
        /// Path that was rejected.
        path: String,
        /// Observed file size in bytes.
        size: u64,
    },
    /// The configuration file is not valid TOML.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The configuration fails a validation rule.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
