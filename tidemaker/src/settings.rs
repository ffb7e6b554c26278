//! Tunable constants, loadable from a JSON file.
//!
//! Every field has a default so a settings file only needs the values it
//! overrides.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    /// Edge length of a canvas cell in pixels.
    pub tile_size: f32,
    /// Animation frames advanced per second.
    pub animation_speed: f32,
    pub editor: EditorSettings,
    pub player: PlayerSettings,
    pub tooth: ToothSettings,
    pub shell: ShellSettings,
    pub palm_trunk: TrunkSettings,
    pub audio: AudioSettings,
    /// Seed for enemy randomness. Unseeded runs use a fresh seed.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            tile_size: 64.0,
            animation_speed: 8.0,
            editor: EditorSettings::default(),
            player: PlayerSettings::default(),
            tooth: ToothSettings::default(),
            shell: ShellSettings::default(),
            palm_trunk: TrunkSettings::default(),
            audio: AudioSettings::default(),
            seed: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load the file when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Tidemaker".into(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub placement_cooldown_ms: u64,
    /// Pixels panned per scroll notch.
    pub scroll_step: f32,
    pub menu_size: f32,
    pub menu_margin: f32,
    pub button_margin: f32,
    /// Selection index when the editor opens.
    pub initial_selection: u8,
    /// Where the player marker starts, as a screen position of its center.
    pub player_start: (f32, f32),
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            placement_cooldown_ms: 400,
            scroll_step: 20.0,
            menu_size: 180.0,
            menu_margin: 6.0,
            button_margin: 5.0,
            initial_selection: 2,
            player_start: (200.0, 360.0),
        }
    }
}

impl EditorSettings {
    pub fn placement_cooldown(&self) -> Duration {
        Duration::from_millis(self.placement_cooldown_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub speed: f32,
    /// Added to the vertical direction every second.
    pub gravity: f32,
    /// Vertical direction set when jumping (negative is up).
    pub jump: f32,
    /// Subtracted from the vertical direction when taking damage.
    pub knockback: f32,
    /// Total width removed from the visual rect to form the hit-box.
    pub hitbox_inset: f32,
    pub floor_probe_height: f32,
    pub invulnerability_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            speed: 300.0,
            gravity: 4.0,
            jump: -2.0,
            knockback: 1.5,
            hitbox_inset: 50.0,
            floor_probe_height: 2.0,
            invulnerability_ms: 200,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToothSettings {
    pub speed: f32,
    /// How far below its feet a tooth looks for ground when spawned.
    pub ground_probe: f32,
}

impl Default for ToothSettings {
    fn default() -> Self {
        Self {
            speed: 150.0,
            ground_probe: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// Horizontal distance between centers within which a shell attacks.
    pub range: f32,
    pub cooldown_ms: u64,
    /// Attack animation frame on which the pearl is released.
    pub fire_frame: usize,
    pub pearl_speed: f32,
    pub pearl_lifetime_ms: u64,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            range: 500.0,
            cooldown_ms: 2000,
            fire_frame: 2,
            pearl_speed: 150.0,
            pearl_lifetime_ms: 6000,
        }
    }
}

/// Invisible collision block under a foreground palm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrunkSettings {
    pub width: f32,
    pub height: f32,
    /// Horizontal shift applied for the right-leaning palm.
    pub right_shift: f32,
}

impl Default for TrunkSettings {
    fn default() -> Self {
        Self {
            width: 76.0,
            height: 50.0,
            right_shift: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub music_volume: f32,
    pub effect_volume: f32,
    pub jump_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_volume: 0.4,
            effect_volume: 0.4,
            jump_volume: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_json(r#"{"tile_size": 32, "player": {"speed": 120}}"#).unwrap();
        assert_eq!(settings.tile_size, 32.0);
        assert_eq!(settings.player.speed, 120.0);
        assert_eq!(settings.player.gravity, 4.0);
        assert_eq!(settings.shell.cooldown_ms, 2000);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load_or_default("/definitely/not/here.json").unwrap();
        assert_eq!(settings, Settings::default());
    }
}
