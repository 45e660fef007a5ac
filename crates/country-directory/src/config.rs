use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, Result};

pub const DIRECTORY_CONFIG_FILENAME: &str = "directory.json";

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_INITIAL_WINDOW: usize = 20;
pub const DEFAULT_WINDOW_STEP: usize = 20;
pub const DEFAULT_REST_BASE_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:4000/graphql";

const ENV_REST_URL: &str = "COUNTRY_DIRECTORY_REST_URL";
const ENV_GATEWAY_URL: &str = "COUNTRY_DIRECTORY_GATEWAY_URL";
const ENV_DEBOUNCE_MS: &str = "COUNTRY_DIRECTORY_DEBOUNCE_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub debounce_ms: u64,
    pub initial_window: usize,
    pub window_step: usize,
    pub rest_base_url: String,
    pub gateway_url: String,
    pub request_timeout_secs: u64,
    pub bus_capacity: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            initial_window: DEFAULT_INITIAL_WINDOW,
            window_step: DEFAULT_WINDOW_STEP,
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            request_timeout_secs: 15,
            bus_capacity: 64,
        }
    }
}

impl DirectoryConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Clamps sizes that would stall the loader or the bus.
    pub fn normalized(mut self) -> Self {
        self.initial_window = self.initial_window.max(1);
        self.window_step = self.window_step.max(1);
        self.bus_capacity = self.bus_capacity.max(1);
        self.rest_base_url = self.rest_base_url.trim_end_matches('/').to_string();
        self
    }

    /// Loads `.env` (if present) and applies `COUNTRY_DIRECTORY_*` overrides.
    pub fn apply_env_overrides(mut self) -> Self {
        let _ = dotenvy::dotenv();
        if let Ok(url) = std::env::var(ENV_REST_URL) {
            self.rest_base_url = url;
        }
        if let Ok(url) = std::env::var(ENV_GATEWAY_URL) {
            self.gateway_url = url;
        }
        if let Ok(raw) = std::env::var(ENV_DEBOUNCE_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.debounce_ms = ms,
                Err(error) => {
                    tracing::warn!("ignoring {ENV_DEBOUNCE_MS}={raw}: {error}");
                }
            }
        }
        self.normalized()
    }
}

pub fn load_or_create_config(dir: &Path) -> Result<DirectoryConfig> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(DIRECTORY_CONFIG_FILENAME);
    if !path.exists() {
        let config = DirectoryConfig::default();
        write_config(&path, &config)?;
        return Ok(config);
    }

    let data = std::fs::read_to_string(&path)?;
    let config: DirectoryConfig =
        serde_json::from_str(&data).map_err(|error| DirectoryError::Config {
            path: path.clone(),
            message: error.to_string(),
        })?;
    Ok(config.normalized())
}

pub fn write_config(path: &Path, config: &DirectoryConfig) -> Result<()> {
    let data = serde_json::to_string_pretty(config).map_err(|error| DirectoryError::Config {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_default_config_when_missing() {
        let dir = tempdir().expect("tempdir");
        let config = load_or_create_config(dir.path()).expect("config");
        assert_eq!(config, DirectoryConfig::default());
        assert!(dir.path().join(DIRECTORY_CONFIG_FILENAME).exists());
    }

    #[test]
    fn partial_config_fills_defaults_and_clamps() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(DIRECTORY_CONFIG_FILENAME),
            r#"{ "debounce_ms": 50, "window_step": 0, "rest_base_url": "http://local/v3.1/" }"#,
        )
        .expect("write");
        let config = load_or_create_config(dir.path()).expect("config");
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.window_step, 1);
        assert_eq!(config.initial_window, DEFAULT_INITIAL_WINDOW);
        assert_eq!(config.rest_base_url, "http://local/v3.1");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join(DIRECTORY_CONFIG_FILENAME), "{ not json").expect("write");
        let err = load_or_create_config(dir.path()).expect_err("malformed");
        assert!(matches!(err, DirectoryError::Config { .. }));
    }
}
