//! Memory Match - a card-pairing memory game
//!
//! Core modules:
//! - `sim`: Deterministic game logic (deck, flip/match state machine)
//! - `session`: Session controller tying a deal to scores and settings
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `view`: Board/summary view models for the DOM layer
//! - `audio`: Web Audio sound cues
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod best_score;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod view;

pub use best_score::BestScore;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use persistence::{KeyValueStore, MemoryStore, StorageError};
pub use session::{CompletionNotice, Session};
pub use settings::{BoardSize, Settings};

/// Game configuration constants
pub mod consts {
    /// How long a mismatched pair stays face up (ms)
    pub const MISMATCH_DELAY_MS: u32 = 1000;
    pub const MIN_MISMATCH_DELAY_MS: u32 = 250;
    pub const MAX_MISMATCH_DELAY_MS: u32 = 5000;

    /// Timer resolution (ms)
    pub const TICK_INTERVAL_MS: u32 = 1000;

    /// Upper bound for the configurable leaderboard size
    pub const MAX_LEADERBOARD_SIZE: usize = 10;
}
