use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the heat-map document inside the storage root.
pub const HEAT_MAP_FILE: &str = "heat-map.json";

/// Subdirectory of the storage root holding one document per session.
pub const SESSIONS_DIR: &str = "sessions";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct HeattrailConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub heat: HeatConfig,
    pub retrieval: RetrievalConfig,
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub root_dir: String,
    /// Surface a corrupt heat-map document as an error instead of starting empty.
    pub strict_load: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HeatConfig {
    pub step_increment: f64,
    pub max_paths: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_heat_limit: usize,
    pub default_max_tokens: usize,
    pub tokens_per_step: usize,
    pub budget_stop_ratio: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub decay_factor: f64,
    pub prune_below: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 8719,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_heattrail_dir().to_string_lossy().into_owned(),
            strict_load: false,
        }
    }
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            step_increment: 0.1,
            max_paths: 1000,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_heat_limit: 10,
            default_max_tokens: 30_000,
            tokens_per_step: 500,
            budget_stop_ratio: 0.8,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            decay_factor: 0.95,
            prune_below: 0.01,
        }
    }
}

/// Returns `~/.heattrail/`, or `./.heattrail` when no home directory is known.
pub fn default_heattrail_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".heattrail")
}

/// Returns the default config file path: `~/.heattrail/config.toml`
pub fn default_config_path() -> PathBuf {
    default_heattrail_dir().join("config.toml")
}

impl HeattrailConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            HeattrailConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (HEATTRAIL_ROOT, HEATTRAIL_STRICT, HEATTRAIL_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HEATTRAIL_ROOT") {
            self.storage.root_dir = val;
        }
        if let Ok(val) = std::env::var("HEATTRAIL_STRICT") {
            self.storage.strict_load = matches!(val.as_str(), "1" | "true" | "yes");
        }
        if let Ok(val) = std::env::var("HEATTRAIL_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the storage root, expanding `~` if needed.
    pub fn resolved_root(&self) -> PathBuf {
        expand_tilde(&self.storage.root_dir)
    }

    pub fn heat_map_path(&self) -> PathBuf {
        self.resolved_root().join(HEAT_MAP_FILE)
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.resolved_root().join(SESSIONS_DIR)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
