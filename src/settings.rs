//! Persisted application settings
//!
//! A small JSON key-value file kept between runs. Missing or unreadable
//! files are replaced with defaults; the database path intentionally has no
//! default and must be chosen on first run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Warn when the Moon is more illuminated than this, in percent
    pub moon_illumination_warning_percent: f64,
    /// Warn when the Moon is closer to a target than this, in degrees
    pub moon_angular_separation_warning_deg: f64,
    /// Observer latitude in degrees
    pub latitude: f64,
    /// Observer longitude in degrees
    pub longitude: f64,
    /// Path to the active database file; no default, chosen on first run
    pub database_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            moon_illumination_warning_percent: 75.0,
            moon_angular_separation_warning_deg: 60.0,
            latitude: 0.0,
            longitude: 0.0,
            database_path: None,
        }
    }
}

impl Settings {
    /// Default location of the settings file, under the platform config
    /// directory.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Settings("no config directory on this platform".to_string()))?;
        Ok(config_dir.join("obslog").join(SETTINGS_FILE))
    }

    /// Load settings from `path`, writing a fresh default file if it does
    /// not exist or cannot be parsed.
    pub fn load(path: &Path) -> Result<Settings> {
        if path.exists() {
            if let Ok(contents) = fs::read_to_string(path) {
                if let Ok(settings) = serde_json::from_str(&contents) {
                    return Ok(settings);
                }
            }
            log::warn!("settings file {} is unreadable, rewriting defaults", path.display());
        }
        let settings = Settings::default();
        settings.save(path)?;
        Ok(settings)
    }

    /// Save settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Settings(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Whether a session's moon illumination crosses the warning threshold.
    pub fn illumination_warns(&self, illumination_percent: f64) -> bool {
        illumination_percent >= self.moon_illumination_warning_percent
    }

    /// Whether a target-to-moon separation crosses the warning threshold.
    pub fn separation_warns(&self, separation_deg: f64) -> bool {
        separation_deg <= self.moon_angular_separation_warning_deg
    }
}
