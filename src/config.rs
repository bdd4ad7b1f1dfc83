//! Configuration persistence for schemview settings

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::{Point, Size, ZoomPivot};

/// Viewer configuration persisted between sessions
///
/// Only preferences live here; the view transform and selection are never
/// saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Viewport size in screen pixels
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Viewport top-left corner in client coordinates
    pub viewport_origin_x: f32,
    pub viewport_origin_y: f32,
    /// Zoom factor for one wheel notch towards the user (zoom in)
    pub wheel_zoom_in: f32,
    /// Zoom factor for one wheel notch away from the user (zoom out)
    pub wheel_zoom_out: f32,
    /// Zoom factor of the toolbar "+" button
    pub button_zoom_in: f32,
    /// Zoom factor of the toolbar "−" button
    pub button_zoom_out: f32,
    /// Where the toolbar buttons zoom around
    pub zoom_button_pivot: ZoomPivot,
    /// Whether clicking bare canvas closes the info panel
    pub clear_selection_on_empty_click: bool,
    /// Whether to draw the usage hint in the viewport corner
    pub show_hint: bool,
    /// Supersampling factor for PNG export (range 1-4)
    pub png_scale: u32,
    /// Directory for exports when no path is given (None = Pictures folder)
    pub output_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewport_width: 960.0,
            viewport_height: 480.0,
            viewport_origin_x: 0.0,
            viewport_origin_y: 0.0,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            button_zoom_in: 1.2,
            button_zoom_out: 0.83,
            zoom_button_pivot: ZoomPivot::TopLeft,
            clear_selection_on_empty_click: false,
            show_hint: true,
            png_scale: 1,
            output_dir: None,
        }
    }
}

impl ViewerConfig {
    /// Directory name under the user config dir
    pub const APP_DIR: &'static str = "schemview";
    const FILE_NAME: &'static str = "config.json";

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    /// Read and sanitize a config file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ViewerConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Save configuration to disk, replacing the file atomically
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        let json = serde_json::to_string_pretty(self)?;
        let mut file = tempfile::Builder::new()
            .prefix(".config-")
            .suffix(".json")
            .tempfile_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.persist(path)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Replace out-of-range values with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.viewport_width) || !positive(self.viewport_height) {
            log::warn!(
                "Invalid viewport {}x{}, using default",
                self.viewport_width,
                self.viewport_height
            );
            self.viewport_width = defaults.viewport_width;
            self.viewport_height = defaults.viewport_height;
        }
        if !self.viewport_origin_x.is_finite() || !self.viewport_origin_y.is_finite() {
            self.viewport_origin_x = defaults.viewport_origin_x;
            self.viewport_origin_y = defaults.viewport_origin_y;
        }
        for (value, default, name) in [
            (&mut self.wheel_zoom_in, defaults.wheel_zoom_in, "wheel_zoom_in"),
            (&mut self.wheel_zoom_out, defaults.wheel_zoom_out, "wheel_zoom_out"),
            (&mut self.button_zoom_in, defaults.button_zoom_in, "button_zoom_in"),
            (&mut self.button_zoom_out, defaults.button_zoom_out, "button_zoom_out"),
        ] {
            if !positive(*value) {
                log::warn!("Invalid {name} {value}, using {default}");
                *value = default;
            }
        }
        self.png_scale = self.png_scale.clamp(1, 4);
        self
    }

    pub fn viewport_size(&self) -> Size {
        Size::new(self.viewport_width, self.viewport_height)
    }

    pub fn viewport_origin(&self) -> Point {
        Point::new(self.viewport_origin_x, self.viewport_origin_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_toolbar_factors() {
        let config = ViewerConfig::default();
        assert_eq!(config.wheel_zoom_in, 1.1);
        assert_eq!(config.wheel_zoom_out, 0.9);
        assert_eq!(config.button_zoom_in, 1.2);
        assert_eq!(config.button_zoom_out, 0.83);
        assert_eq!(config.zoom_button_pivot, ZoomPivot::TopLeft);
        assert!(!config.clear_selection_on_empty_click);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = ViewerConfig {
            viewport_width: 1280.0,
            zoom_button_pivot: ZoomPivot::ViewportCenter,
            clear_selection_on_empty_click: true,
            png_scale: 2,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ViewerConfig::load_from(&path).unwrap(), config);
        assert_eq!(ViewerConfig::load(Some(path.as_path())), config);
    }

    #[test]
    fn test_missing_fields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"zoom_button_pivot": "viewport-center"}"#).unwrap();
        let config = ViewerConfig::load_from(&path).unwrap();
        assert_eq!(config.zoom_button_pivot, ZoomPivot::ViewportCenter);
        assert_eq!(config.viewport_width, 960.0);
    }

    #[test]
    fn test_invalid_values_are_sanitized() {
        let config = ViewerConfig {
            viewport_width: -5.0,
            wheel_zoom_in: 0.0,
            button_zoom_out: f32::NAN,
            png_scale: 12,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.viewport_width, 960.0);
        assert_eq!(config.wheel_zoom_in, 1.1);
        assert_eq!(config.button_zoom_out, 0.83);
        assert_eq!(config.png_scale, 4);
    }

    #[test]
    fn test_unreadable_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(ViewerConfig::load_from(&path).is_err());
        assert_eq!(ViewerConfig::load(Some(path.as_path())), ViewerConfig::default());
    }
}
