//! config.rs
//! Processing configuration, persisted as JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Hysteresis bands applied to the flight-phase variants of parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HysteresisBands {
    /// Knots.
    pub airspeed: f64,
    /// Feet.
    pub altitude: f64,
    /// Feet per minute.
    pub vertical_speed: f64,
}

impl Default for HysteresisBands {
    fn default() -> Self {
        Self { airspeed: 10.0, altitude: 200.0, vertical_speed: 40.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub hysteresis: HysteresisBands,
    /// Airspeed above which the aircraft is considered fast (knots).
    pub fast_airspeed: f64,
    /// Differentiation window for vertical speed and rate of turn (seconds).
    pub rate_of_change_width: f64,
    /// Nodes that must be planned for a flight to be processed at all.
    pub required_nodes: Vec<String>,
    /// Size of the worker pool for batch processing; rayon's default when unset.
    pub worker_threads: Option<usize>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            hysteresis: HysteresisBands::default(),
            fast_airspeed: 80.0,
            rate_of_change_width: 2.0,
            required_nodes: Vec::new(),
            worker_threads: None,
        }
    }
}

impl ProcessConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        info!("Loaded processing config from {:?}", path);
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when it is missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!("Saved processing config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ProcessConfig::default();
        assert_eq!(config.hysteresis.airspeed, 10.0);
        assert_eq!(config.hysteresis.altitude, 200.0);
        assert_eq!(config.hysteresis.vertical_speed, 40.0);
        assert_eq!(config.fast_airspeed, 80.0);
        assert!(config.worker_threads.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = ProcessConfig::from_json_str(
            r#"{ "fast_airspeed": 60.0, "hysteresis": { "altitude": 100.0 }, "required_nodes": ["Pitch"] }"#,
        )
        .unwrap();
        assert_eq!(config.fast_airspeed, 60.0);
        assert_eq!(config.hysteresis.altitude, 100.0);
        assert_eq!(config.hysteresis.airspeed, 10.0);
        assert_eq!(config.required_nodes, vec!["Pitch".to_string()]);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("process.json");
        let config = ProcessConfig { worker_threads: Some(3), ..Default::default() };
        config.save(&path).unwrap();
        assert_eq!(ProcessConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_or_default_tolerates_bad_files() {
        let dir = tempdir().unwrap();
        assert_eq!(ProcessConfig::load_or_default(dir.path().join("absent.json")), ProcessConfig::default());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ProcessConfig::load(&path), Err(ConfigError::Parse(_))));
        assert_eq!(ProcessConfig::load_or_default(&path), ProcessConfig::default());
    }
}
