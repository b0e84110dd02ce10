//! Game settings and preferences
//!
//! Persisted separately from scores in the key-value store.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{KeyValueStore, StorageError};

/// Board size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoardSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl BoardSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardSize::Small => "Small",
            BoardSize::Medium => "Medium",
            BoardSize::Large => "Large",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Some(BoardSize::Small),
            "medium" | "med" | "m" => Some(BoardSize::Medium),
            "large" | "l" => Some(BoardSize::Large),
            _ => None,
        }
    }

    /// Number of distinct pairs dealt
    pub fn pairs(&self) -> u32 {
        match self {
            BoardSize::Small => 6,
            BoardSize::Medium => 8,
            BoardSize::Large => 12,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board size preset
    pub board_size: BoardSize,

    // === Gameplay ===
    /// How long a mismatched pair stays face up (ms)
    pub mismatch_delay_ms: u32,
    /// Entries kept on the leaderboard
    pub leaderboard_size: usize,

    // === Audio ===
    /// Play flip/match cues
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Accessibility ===
    /// Reduced motion (skip the card flip animation)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: BoardSize::Medium,

            mismatch_delay_ms: MISMATCH_DELAY_MS,
            leaderboard_size: crate::leaderboard::DEFAULT_LEADERBOARD_SIZE,

            sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings for a board size preset
    pub fn from_board_size(board_size: BoardSize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    /// Face values dealt for the current board size
    pub fn face_values(&self) -> Vec<u32> {
        crate::sim::face_values(self.board_size.pairs())
    }

    /// Effective SFX volume (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if !self.sound {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Clamp out-of-range values loaded from storage
    fn sanitize(mut self) -> Self {
        self.mismatch_delay_ms = self
            .mismatch_delay_ms
            .clamp(MIN_MISMATCH_DELAY_MS, MAX_MISMATCH_DELAY_MS);
        self.leaderboard_size = self.leaderboard_size.clamp(1, MAX_LEADERBOARD_SIZE);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Storage key
    const STORAGE_KEY: &'static str = "memory_match_settings";

    /// Load settings, using defaults when missing or unreadable
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.sanitize();
                }
                Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_LEADERBOARD_SIZE, MISMATCH_DELAY_MS};
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.face_values(), (1..=8).collect::<Vec<_>>());
        assert_eq!(settings.mismatch_delay_ms, 1000);
        assert_eq!(settings.leaderboard_size, 3);
    }

    #[test]
    fn test_board_size_parse() {
        assert_eq!(BoardSize::parse("LARGE"), Some(BoardSize::Large));
        assert_eq!(BoardSize::parse("med"), Some(BoardSize::Medium));
        assert_eq!(BoardSize::parse("huge"), None);
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::from_board_size(BoardSize::Small);
        settings.sound = false;
        settings.save(&mut store).unwrap();

        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.effective_volume(), 0.0);
    }

    #[test]
    fn test_corrupt_settings_use_defaults() {
        let mut store = MemoryStore::new();
        store.set("memory_match_settings", "[1, 2").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut store = MemoryStore::new();
        store
            .set("memory_match_settings", r#"{"board_size":"Large","leaderboard_size":500}"#)
            .unwrap();
        let loaded = Settings::load(&store);
        assert_eq!(loaded.board_size, BoardSize::Large);
        assert_eq!(loaded.leaderboard_size, MAX_LEADERBOARD_SIZE);
        assert_eq!(loaded.mismatch_delay_ms, MISMATCH_DELAY_MS);
    }
}
