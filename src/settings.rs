//! Runner settings
//!
//! Read from a JSON file next to the binary. Missing or broken files fall back
//! to defaults so the hub always starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::AUTOPILOT_ACTIVATE_TICKS;

/// Hub settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the autopilot's thrust rhythm
    pub seed: u64,

    // === Autopilot ===
    /// Let the autopilot take over when the player is idle
    pub autopilot: bool,
    /// Idle ticks before the autopilot engages
    pub idle_threshold_ticks: i32,

    // === Content ===
    /// Optional JSON content set replacing the built-in map and doors
    pub content_path: Option<PathBuf>,
    /// Directory with `tiles.png`, `dude.png`, `carebears.png` and `chrome.png`;
    /// placeholders are drawn when unset
    pub assets_dir: Option<PathBuf>,

    // === Headless runner ===
    /// Ticks to simulate before exiting
    pub ticks: u64,
    /// Render and dump a frame every N ticks (0 disables frame dumps)
    pub frame_every: u64,
    /// Directory receiving PNG frame dumps
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed_cafe,

            autopilot: true,
            idle_threshold_ticks: AUTOPILOT_ACTIVATE_TICKS,

            content_path: None,
            assets_dir: None,

            ticks: 60 * 60 * 3,
            frame_every: 0,
            output_dir: PathBuf::from("frames"),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"seed": 7, "autopilot": false}"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.seed, 7);
        assert!(!settings.autopilot);
        assert_eq!(settings.idle_threshold_ticks, AUTOPILOT_ACTIVATE_TICKS);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            frame_every: 30,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_garbage_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
