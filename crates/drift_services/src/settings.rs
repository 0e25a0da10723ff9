//! Settings management
//!
//! Settings are stored as JSON. Missing fields fall back to their defaults,
//! so a file only needs the values it wants to change.

use drift_core::config::{ConfigError, SimulationConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write settings to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings file {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid simulation settings")]
    Invalid(#[from] ConfigError),
}

/// Top-level settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Driftfield".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string without validating them.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate settings from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.simulation.validate()?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Load `path` if it exists, otherwise use defaults.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "no settings file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(SettingsError::Serialize)?;
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::config::Attraction;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("driftfield-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn defaults_match_reference_field() {
        let settings = Settings::default();
        assert_eq!(settings.window.width, 1280);
        assert_eq!(settings.simulation.sphere_count, 30);
        assert_eq!(settings.simulation.forces.max_speed, 20.0);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let settings = Settings::from_json(
            r#"{ "window": { "title": "calm" }, "simulation": { "sphere_count": 8 } }"#,
        )
        .unwrap();
        assert_eq!(settings.window.title, "calm");
        assert_eq!(settings.window.height, 720);
        assert_eq!(settings.simulation.sphere_count, 8);
        assert_eq!(
            settings.simulation.forces.attraction,
            Attraction::Constant { gain: 10.0 }
        );
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save");
        let mut settings = Settings::default();
        settings.simulation.seed = Some(99);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalid_values_are_rejected_on_load() {
        let path = temp_path("invalid");
        fs::write(&path, r#"{ "simulation": { "sphere_radius": -1.0 } }"#).unwrap();
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_json_reports_path() {
        let path = temp_path("malformed");
        fs::write(&path, "{ not json").unwrap();
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("driftfield-malformed"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load_or_default(temp_path("missing")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
