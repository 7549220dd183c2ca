//! Editor settings management
//!
//! Persistent user preferences: dock style, window limits, logging and the
//! layout file location.

use crate::error::EditorError;
use dockspace::{DockStyle, DEFAULT_LOG_FILTER, DEFAULT_MAX_WINDOWS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main editor settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Docking appearance and gesture tuning
    #[serde(default)]
    pub dock: DockStyle,

    /// OS window settings
    #[serde(default)]
    pub windows: WindowSettings,

    /// `tracing` filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Where "Save Layout" writes by default
    #[serde(default = "default_layout_path")]
    pub layout_path: PathBuf,

    /// Settings version for future migration support
    #[serde(default)]
    pub version: u32,
}

/// OS window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Title of the main window
    pub title: String,
    /// Initial main window size in logical pixels
    pub size: (u32, u32),
    /// Upper bound on open windows, the main one included
    pub max_windows: usize,
    /// Size of windows spawned by dragging a panel out
    pub detached_size: (u32, u32),
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Scene Studio".to_string(),
            size: (1600, 900),
            max_windows: DEFAULT_MAX_WINDOWS,
            detached_size: (480, 360),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_layout_path() -> PathBuf {
    PathBuf::from("studio_layout.json")
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            dock: DockStyle::default(),
            windows: WindowSettings::default(),
            log_filter: default_log_filter(),
            layout_path: default_layout_path(),
            version: 1,
        }
    }
}

impl EditorSettings {
    /// Get the default path for the settings file
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("studio_settings.json")
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_or_default(Self::default_path())
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// cannot be parsed
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings file: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), EditorError> {
        self.save_to(Self::default_path())
    }

    /// Save settings to a specific path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), EditorError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!("Saved editor settings to {:?}", path.as_ref());
        Ok(())
    }

    /// Load settings from a specific path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings: Self = serde_json::from_str(&content)?;
        settings.dock = settings.dock.sanitized();
        settings.windows.max_windows = settings.windows.max_windows.max(1);
        info!("Loaded editor settings from {:?}", path.as_ref());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockspace::TitleBarMode;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.windows.max_windows, DEFAULT_MAX_WINDOWS);
        assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(settings.dock, DockStyle::default());
    }

    #[test]
    fn test_save_load_settings() {
        let mut settings = EditorSettings::default();
        settings.dock.title_bar = TitleBarMode::Hidden;
        settings.windows.max_windows = 3;
        settings.log_filter = "debug".to_string();

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let temp_path = temp_file.path();

        settings.save_to(temp_path).expect("Failed to save settings");
        let loaded = EditorSettings::load_from(temp_path).expect("Failed to load settings");

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), r#"{ "windows": { "max_windows": 0 } }"#).expect("Failed to write file");

        let loaded = EditorSettings::load_from(temp_file.path()).expect("Failed to load settings");
        assert_eq!(loaded.windows.max_windows, 1);
        assert_eq!(loaded.windows.title, "Scene Studio");
        assert_eq!(loaded.layout_path, PathBuf::from("studio_layout.json"));
    }

    #[test]
    fn test_invalid_json_fallback() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let temp_path = temp_file.path();
        std::fs::write(temp_path, "{ invalid json }").expect("Failed to write file");

        assert!(EditorSettings::load_from(temp_path).is_err());
        assert_eq!(EditorSettings::load_or_default(temp_path), EditorSettings::default());
    }
}
