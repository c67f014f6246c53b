//! Game settings and preferences
//!
//! Persisted as JSON next to the high score.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// How many players share the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerMode {
    Single,
    #[default]
    Duo,
}

impl PlayerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerMode::Single => "Single",
            PlayerMode::Duo => "Duo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "1" | "solo" => Some(PlayerMode::Single),
            "duo" | "2" | "coop" => Some(PlayerMode::Duo),
            _ => None,
        }
    }

    pub fn player_count(&self) -> usize {
        match self {
            PlayerMode::Single => 1,
            PlayerMode::Duo => 2,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player_mode: PlayerMode,

    // === Audio ===
    pub sfx_enabled: bool,
    pub music_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_mode: PlayerMode::Duo,

            sfx_enabled: true,
            music_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "close_corners_settings";

    /// Effective sound effect gain, zero when disabled
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_enabled {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective music gain, zero when disabled
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Using default settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_player_mode_from_str() {
        assert_eq!(PlayerMode::from_str("Single"), Some(PlayerMode::Single));
        assert_eq!(PlayerMode::from_str("DUO"), Some(PlayerMode::Duo));
        assert_eq!(PlayerMode::from_str("2"), Some(PlayerMode::Duo));
        assert_eq!(PlayerMode::from_str("trio"), None);
        assert_eq!(PlayerMode::Single.player_count(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            player_mode: PlayerMode::Single,
            sfx_enabled: false,
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, r#"{"player_mode":"Single"}"#).unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.player_mode, PlayerMode::Single);
        assert!(settings.music_enabled);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_effective_volumes() {
        let mut settings = Settings::default();
        assert!((settings.effective_sfx_volume() - 0.8).abs() < 1e-6);
        settings.music_enabled = false;
        assert_eq!(settings.effective_music_volume(), 0.0);
    }
}
