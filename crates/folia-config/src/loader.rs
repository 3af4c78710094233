//! Layered configuration loading.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{ConfigError, ConfigResult, FoliaConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FOLIA_CONFIG";

/// File looked up in the working directory and the user config dir.
pub const DEFAULT_CONFIG_FILE: &str = "folia.toml";

#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Defaults, then the first config file found, then environment overrides.
    pub fn load(&self) -> ConfigResult<FoliaConfig> {
        let mut config = match self.resolve_path() {
            Some(path) => Self::load_file(&path)?,
            None => {
                debug!("No config file found, using defaults");
                FoliaConfig::default()
            }
        };
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> ConfigResult<FoliaConfig> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        FoliaConfig::from_toml_str(&raw)
    }

    fn resolve_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("folia").join(DEFAULT_CONFIG_FILE))
            .filter(|path| path.is_file())
    }
}

/// Apply `FOLIA_*` overrides read through `lookup`.
pub(crate) fn apply_env_overrides<F>(config: &mut FoliaConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("FOLIA_HTTP_HOST") {
        config.http.bind_address = host;
    }
    if let Some(port) = lookup("FOLIA_HTTP_PORT") {
        config.http.port = parse_value("FOLIA_HTTP_PORT", &port)?;
    }
    if let Some(cors) = lookup("FOLIA_HTTP_CORS") {
        config.http.enable_cors = parse_value("FOLIA_HTTP_CORS", &cors)?;
    }
    if let Some(dir) = lookup("FOLIA_IMAGES_DIR") {
        config.http.images_dir = PathBuf::from(dir);
    }
    if let Some(dir) = lookup("FOLIA_DATA_DIR") {
        config.source.data_dir = PathBuf::from(dir);
    }
    if let Some(db) = lookup("FOLIA_DATABASE") {
        config.source.database = db;
    }
    if let Some(interval) = lookup("FOLIA_REBUILD_INTERVAL_SECS") {
        config.rebuild.interval_secs = parse_value("FOLIA_REBUILD_INTERVAL_SECS", &interval)?;
    }
    if let Some(level) = lookup("FOLIA_LOG_LEVEL") {
        config.logging.level = level;
    }
    Ok(())
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
