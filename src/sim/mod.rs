//! Deterministic game logic
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - No timers, storage or DOM access
//! - Deferred effects are requested through returned events

pub mod deck;
pub mod state;

pub use deck::{Card, deal, face_values};
pub use state::{GameEvent, GamePhase, GameState, Generation};
