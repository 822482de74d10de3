//! Game settings and preferences
//!
//! Stored as JSON next to the game; every field is optional in the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reading a settings or tuning file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Camera framing preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CameraMode {
    FirstPerson,
    #[default]
    ThirdPerson,
}

impl CameraMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMode::FirstPerson => "First person",
            CameraMode::ThirdPerson => "Third person",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "first" | "first-person" | "cockpit" => Some(CameraMode::FirstPerson),
            "third" | "third-person" => Some(CameraMode::ThirdPerson),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Text file holding every level grid
    pub level_file: PathBuf,

    // === Audio ===
    /// Play sound effects
    pub sound_enabled: bool,
    /// External player invoked once per sound (fire-and-forget)
    pub audio_command: String,
    /// Directory holding the .wav files
    pub sound_dir: PathBuf,

    // === View ===
    pub camera: CameraMode,
    /// Scene brightness multiplier (0.0 - 3.0)
    pub brightness: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level_file: PathBuf::from("levels/maze.txt"),

            sound_enabled: true,
            audio_command: "canberra-gtk-play".to_string(),
            sound_dir: PathBuf::from("sounds"),

            camera: CameraMode::ThirdPerson,
            brightness: 1.0,
        }
    }
}

impl Settings {
    /// Parse settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from disk
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, keeping defaults if the file is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e}; using default settings");
            Self::default()
        })
    }

    /// Save settings to disk
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
