//! Visual and interaction configuration for a dockspace

use crate::ui::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// How a leaf holding a single panel presents its header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TitleBarMode {
    /// Show a header with the panel title (draggable)
    #[default]
    Title,
    /// No header; single-panel leaves give their whole area to content
    Hidden,
}

/// Colours used when painting headers, tabs and drag feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockColors {
    pub background: Color,
    pub header: Color,
    pub tab: Color,
    pub tab_active: Color,
    pub tab_hovered: Color,
    pub text: Color,
    pub close: Color,
    pub splitter: Color,
    pub drop_preview: Color,
    pub drag_overlay: Color,
}

impl Default for DockColors {
    fn default() -> Self {
        Self {
            background: [0.10, 0.10, 0.11, 1.0],
            header: [0.14, 0.14, 0.16, 1.0],
            tab: [0.18, 0.18, 0.21, 1.0],
            tab_active: [0.26, 0.40, 0.62, 1.0],
            tab_hovered: [0.22, 0.28, 0.38, 1.0],
            text: [0.92, 0.92, 0.94, 1.0],
            close: [0.85, 0.45, 0.45, 1.0],
            splitter: [0.05, 0.05, 0.06, 1.0],
            drop_preview: [0.26, 0.59, 0.98, 0.35],
            drag_overlay: [0.20, 0.22, 0.26, 0.90],
        }
    }
}

/// Dockspace style and gesture tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockStyle {
    /// Height of the tab / title strip in pixels
    pub tab_height: f32,
    /// Header behaviour for single-panel leaves
    pub title_bar: TitleBarMode,
    /// Width of the grab band centred on each split boundary
    pub splitter_thickness: f32,
    /// Pointer travel in pixels before a pressed tab turns into a drag
    pub drag_threshold: f32,
    /// Fraction of a leaf (per axis) treated as the "drop as tab" centre zone
    pub drop_center_fraction: f32,
    /// Horizontal text padding inside tabs
    pub tab_padding: f32,
    pub colors: DockColors,
}

impl Default for DockStyle {
    fn default() -> Self {
        Self {
            tab_height: 22.0,
            title_bar: TitleBarMode::Title,
            splitter_thickness: 6.0,
            drag_threshold: 5.0,
            drop_center_fraction: 0.5,
            tab_padding: 6.0,
            colors: DockColors::default(),
        }
    }
}

impl DockStyle {
    /// Load a style from a JSON file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, crate::DockError> {
        let content = std::fs::read_to_string(&path)?;
        let style: Self = serde_json::from_str(&content)?;
        info!("Loaded dock style from {:?}", path.as_ref());
        Ok(style.sanitized())
    }

    /// Save the style as pretty-printed JSON
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), crate::DockError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!("Saved dock style to {:?}", path.as_ref());
        Ok(())
    }

    /// Clamp user-provided values into ranges the layout pass can work with
    pub fn sanitized(mut self) -> Self {
        let before = self.clone();
        self.tab_height = finite_or(self.tab_height, 22.0).max(0.0);
        self.splitter_thickness = finite_or(self.splitter_thickness, 6.0).max(0.0);
        self.drag_threshold = finite_or(self.drag_threshold, 5.0).max(0.0);
        self.drop_center_fraction = finite_or(self.drop_center_fraction, 0.5).clamp(0.0, 1.0);
        self.tab_padding = finite_or(self.tab_padding, 6.0).max(0.0);
        if before != self {
            debug!(style = ?self, "Dock style values clamped");
        }
        self
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_style() {
        let style = DockStyle::default();
        assert_eq!(style.tab_height, 22.0);
        assert_eq!(style.title_bar, TitleBarMode::Title);
        assert_eq!(style.drop_center_fraction, 0.5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let style: DockStyle =
            serde_json::from_str(r#"{ "tab_height": 30.0, "title_bar": "Hidden" }"#).unwrap();
        assert_eq!(style.tab_height, 30.0);
        assert_eq!(style.title_bar, TitleBarMode::Hidden);
        assert_eq!(style.splitter_thickness, 6.0);
        assert_eq!(style.colors, DockColors::default());
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let style = DockStyle {
            tab_height: -4.0,
            drop_center_fraction: 3.0,
            drag_threshold: f32::NAN,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(style.tab_height, 0.0);
        assert_eq!(style.drop_center_fraction, 1.0);
        assert_eq!(style.drag_threshold, 5.0);
    }

    #[test]
    fn test_save_load_style() {
        let style = DockStyle {
            tab_height: 26.0,
            ..Default::default()
        };

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        style.save_to(temp_file.path()).expect("Failed to save style");

        let loaded = DockStyle::load_from(temp_file.path()).expect("Failed to load style");
        assert_eq!(loaded, style);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(temp_file.path(), "{ not json").expect("Failed to write file");

        assert!(DockStyle::load_from(temp_file.path()).is_err());
    }
}
