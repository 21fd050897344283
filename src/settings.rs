//! Player preferences
//!
//! The render mode keeps its own `"true"`/`"false"` key; everything else is
//! one JSON blob.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;
use crate::tuning::Tuning;

/// Which frontend draws the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RenderMode {
    #[default]
    Planar,
    Volumetric,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Planar => "2D",
            RenderMode::Volumetric => "3D",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Planar => RenderMode::Volumetric,
            RenderMode::Volumetric => RenderMode::Planar,
        }
    }

    /// Gameplay constants for this mode; the 2D canvas is sized from the viewport
    pub fn tuning(self, viewport_width: f32) -> Tuning {
        match self {
            RenderMode::Planar => Tuning::planar(viewport_width),
            RenderMode::Volumetric => Tuning::volumetric(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Not part of the JSON blob, see [`Settings::MODE_KEY`]
    #[serde(skip)]
    pub render_mode: RenderMode,

    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Planar,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
        }
    }
}

impl Settings {
    pub const MODE_KEY: &'static str = "medievalInvaders3D";
    pub const STORAGE_KEY: &'static str = "medievalInvadersSettings";

    /// Load settings, falling back to defaults for anything missing or corrupt
    pub fn load(storage: &dyn Storage) -> Self {
        let mut settings = match storage.get(Self::STORAGE_KEY) {
            Some(json) => serde_json::from_str::<Settings>(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt settings: {e}");
                Self::default()
            }),
            None => Self::default(),
        };

        settings.render_mode = match storage.get(Self::MODE_KEY).as_deref() {
            Some("true") => RenderMode::Volumetric,
            _ => RenderMode::Planar,
        };
        settings.clamp_volumes();

        log::info!("Loaded settings ({} mode)", settings.render_mode.as_str());
        settings
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        let volumetric = self.render_mode == RenderMode::Volumetric;
        storage.set(Self::MODE_KEY, if volumetric { "true" } else { "false" });
        if let Ok(json) = serde_json::to_string(self) {
            storage.set(Self::STORAGE_KEY, &json);
        }
    }

    fn clamp_volumes(&mut self) {
        for v in [&mut self.master_volume, &mut self.sfx_volume, &mut self.music_volume] {
            *v = if v.is_finite() { (*v).clamp(0.0, 1.0) } else { 0.0 };
        }
    }

    /// Effective gain for sound effects
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective gain for background music
    pub fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::tuning::Dimensions;

    #[test]
    fn test_defaults_when_empty() {
        let storage = MemoryStorage::new();
        let settings = Settings::load(&storage);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.render_mode, RenderMode::Planar);
    }

    #[test]
    fn test_render_mode_flag() {
        let mut storage = MemoryStorage::new();
        storage.set(Settings::MODE_KEY, "true");
        assert_eq!(Settings::load(&storage).render_mode, RenderMode::Volumetric);
        storage.set(Settings::MODE_KEY, "yes");
        assert_eq!(Settings::load(&storage).render_mode, RenderMode::Planar);
    }

    #[test]
    fn test_round_trip_keeps_mode_out_of_json() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            render_mode: RenderMode::Volumetric,
            music_volume: 0.25,
            muted: true,
            ..Default::default()
        };
        settings.save(&mut storage);

        assert_eq!(storage.get(Settings::MODE_KEY).as_deref(), Some("true"));
        let json = storage.get(Settings::STORAGE_KEY).unwrap();
        assert!(!json.contains("render_mode"));
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_corrupt_json_and_bad_volumes() {
        let mut storage = MemoryStorage::new();
        storage.set(Settings::STORAGE_KEY, "{not json");
        assert_eq!(Settings::load(&storage), Settings::default());

        storage.set(Settings::STORAGE_KEY, r#"{"master_volume": 3.0}"#);
        let settings = Settings::load(&storage);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 1.0);
    }

    #[test]
    fn test_gains() {
        let mut settings = Settings::default();
        assert!((settings.sfx_gain() - 0.8).abs() < 1e-6);
        assert!((settings.music_gain() - 0.4).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.sfx_gain(), 0.0);
    }

    #[test]
    fn test_mode_tuning() {
        assert_eq!(RenderMode::Volumetric.tuning(1024.0).playfield.dims, Dimensions::Volumetric);
        assert_eq!(RenderMode::Planar.toggled(), RenderMode::Volumetric);
    }
}
