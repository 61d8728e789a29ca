use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 5.0;
pub const DEFAULT_DISPLAY_ID_LEN: usize = 8;
pub const DEFAULT_TAGS: &[&str] = &[
    "bug",
    "feature",
    "improvement",
    "research",
    "design",
    "documentation",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Pointer travel (logical px) that turns a press into a drag.
    #[serde(default)]
    pub activation_distance: Option<f64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub display_id_len: Option<usize>,
    #[serde(default)]
    pub current_user: Option<Uuid>,
    #[serde(default)]
    pub display_names: HashMap<Uuid, String>,
}

impl BoardConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Loads the user config, falling back to defaults when absent or malformed.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn effective_activation_distance(&self) -> f64 {
        self.activation_distance
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(DEFAULT_ACTIVATION_DISTANCE)
    }

    pub fn effective_tags(&self) -> Vec<String> {
        match &self.tags {
            Some(tags) => tags.clone(),
            None => DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn effective_display_id_len(&self) -> usize {
        self.display_id_len
            .filter(|len| *len > 0)
            .unwrap_or(DEFAULT_DISPLAY_ID_LEN)
    }
}
