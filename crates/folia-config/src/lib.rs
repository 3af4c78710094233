//! # Folia Configuration
//!
//! Typed configuration for the snapshot service: HTTP transport, the
//! record source, rebuild scheduling and logging.
//!
//! Values are layered: built-in defaults, then an optional TOML file,
//! then `FOLIA_*` environment variables.
//!
//! ```rust,no_run
//! use folia_config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load().expect("config");
//! println!("serving on {}:{}", config.http.bind_address, config.http.port);
//! ```

#![warn(clippy::all)]

pub mod components;
mod error;
mod loader;

pub use components::*;
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};

use serde::{Deserialize, Serialize};

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FoliaConfig {
    pub http: HttpConfig,
    pub source: SourceConfig,
    pub rebuild: RebuildConfig,
    pub logging: LoggingConfig,
}

impl FoliaConfig {
    /// Parse a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Socket address string for the HTTP listener.
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http.bind_address, self.http.port)
    }
}
