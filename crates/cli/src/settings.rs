use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tryon_core::shared::constants::{
    DEFAULT_CONTAINER_HEIGHT, DEFAULT_CONTAINER_WIDTH, DEFAULT_DISPLAY_HEIGHT,
    DEFAULT_DISPLAY_WIDTH, DEFAULT_REFERENCE_FACE_WIDTH,
};
use tryon_core::shared::geometry::Size;

/// Persisted defaults for command-line runs. Flags override every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_reference_face_width")]
    pub reference_face_width: f64,
    #[serde(default = "default_display")]
    pub display: Size,
    #[serde(default = "default_container")]
    pub container: Size,
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

fn default_reference_face_width() -> f64 {
    DEFAULT_REFERENCE_FACE_WIDTH
}

fn default_display() -> Size {
    Size::new(DEFAULT_DISPLAY_WIDTH, DEFAULT_DISPLAY_HEIGHT)
}

fn default_container() -> Size {
    Size::new(DEFAULT_CONTAINER_WIDTH, DEFAULT_CONTAINER_HEIGHT)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference_face_width: default_reference_face_width(),
            display: default_display(),
            container: default_container(),
            catalog: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("JewelryTryOn").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing or unreadable files yield the defaults.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            if let Err(e) = fs::write(path, json) {
                log::warn!("Could not save settings to {}: {e}", path.display());
            }
        }
    }
}
