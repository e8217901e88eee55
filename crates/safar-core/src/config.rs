//! Project configuration (`.safar/config.toml`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::broadcast::BroadcastOptions;
use crate::error::{SafarError, SafarResult};
use crate::trip::DEFAULT_RECENT_LIMIT;

/// Directory holding SAFAR state inside a project.
pub const STATE_DIR: &str = ".safar";

/// Config file name inside [`STATE_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Database file name inside [`STATE_DIR`].
pub const DB_FILE: &str = "safar.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafarConfig {
    pub web: WebConfig,
    pub broadcast: BroadcastOptions,
    pub trips: TripsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripsConfig {
    /// Number of trips on the dashboard's "recent" list.
    pub recent_limit: usize,
}

impl Default for TripsConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

pub fn state_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(STATE_DIR)
}

pub fn config_path(project_dir: &Path) -> PathBuf {
    state_dir(project_dir).join(CONFIG_FILE)
}

pub fn db_path(project_dir: &Path) -> PathBuf {
    state_dir(project_dir).join(DB_FILE)
}

impl SafarConfig {
    /// Load the project config. A missing file yields the defaults.
    pub fn load(project_dir: &Path) -> SafarResult<Self> {
        let path = config_path(project_dir);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> SafarResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SafarError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config, creating `.safar/` if needed.
    pub fn save(&self, project_dir: &Path) -> SafarResult<PathBuf> {
        let path = config_path(project_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SafarError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    fn validate(&self) -> SafarResult<()> {
        if self.trips.recent_limit == 0 {
            return Err(SafarError::Config(
                "trips.recent_limit must be at least 1".to_string(),
            ));
        }
        if self.broadcast.link_base.trim().is_empty() {
            return Err(SafarError::Config(
                "broadcast.link_base must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` the web server binds to.
    pub fn web_addr(&self) -> String {
        format!("{}:{}", self.web.host, self.web.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::StartMode;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SafarConfig::load(dir.path()).unwrap();
        assert_eq!(config, SafarConfig::default());
        assert_eq!(config.web_addr(), "127.0.0.1:3030");
        assert_eq!(config.broadcast.start_mode, StartMode::Armed);
        assert_eq!(config.trips.recent_limit, 5);
    }

    #[test]
    fn test_partial_file() {
        let config = SafarConfig::parse(
            r#"
            [broadcast]
            start_mode = "dispatch_first"

            [web]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.broadcast.start_mode, StartMode::DispatchFirst);
        assert_eq!(config.broadcast.link_base, "https://wa.me");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_values() {
        assert!(SafarConfig::parse("[trips]\nrecent_limit = 0").is_err());
        assert!(SafarConfig::parse("[broadcast]\nstart_mode = \"later\"").is_err());
        assert!(SafarConfig::parse("not toml at all [").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SafarConfig::default();
        config.trips.recent_limit = 10;

        let path = config.save(dir.path()).unwrap();
        assert!(path.ends_with(".safar/config.toml"));
        assert_eq!(SafarConfig::load(dir.path()).unwrap(), config);
    }
}
