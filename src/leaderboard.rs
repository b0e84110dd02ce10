//! Leaderboard of fewest-move wins
//!
//! Persisted as a JSON array under the `leaderboard` key, keeps the top K
//! results.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Default number of entries to keep
pub const DEFAULT_LEADERBOARD_SIZE: usize = 3;

/// A single finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Pair attempts taken
    pub moves: u32,
    /// Seconds taken
    pub time: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Top-K leaderboard, ascending by moves
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(DEFAULT_LEADERBOARD_SIZE)
    }
}

impl Leaderboard {
    const STORAGE_KEY: &'static str = "leaderboard";

    /// Create an empty leaderboard keeping `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fewest moves on the board (if any)
    pub fn top_moves(&self) -> Option<u32> {
        self.entries.first().map(|e| e.moves)
    }

    /// Insert an entry, keeping the board sorted and bounded
    ///
    /// Ties go after existing entries with the same move count. Returns the
    /// 1-indexed rank, or None if the entry fell off the end.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        self.entries.push(entry);
        let new_index = self.entries.len() - 1;

        // Stable sort keeps insertion order among equal move counts, and the
        // new entry was pushed last so it lands after its ties
        let mut indexed: Vec<(usize, LeaderboardEntry)> =
            self.entries.drain(..).enumerate().collect();
        indexed.sort_by_key(|(_, e)| e.moves);
        indexed.truncate(self.capacity);

        let rank = indexed.iter().position(|(i, _)| *i == new_index).map(|p| p + 1);
        self.entries = indexed.into_iter().map(|(_, e)| e).collect();
        rank
    }

    /// Insert an entry and persist the truncated board
    pub fn record<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        entry: LeaderboardEntry,
    ) -> Result<Option<usize>, StorageError> {
        let rank = self.insert(entry);
        self.save(store)?;
        Ok(rank)
    }

    /// Change the number of kept entries, dropping any overflow
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.entries.truncate(capacity);
    }

    /// Load the leaderboard, falling back to empty on missing or corrupt data
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, capacity: usize) -> Self {
        let mut board = Self::new(capacity);

        let json = match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                return board;
            }
            Err(e) => {
                log::warn!("Failed to read leaderboard: {}", e);
                return board;
            }
        };

        match serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
            Ok(mut entries) => {
                entries.sort_by_key(|e| e.moves);
                entries.truncate(capacity);
                log::info!("Loaded {} leaderboard entries", entries.len());
                board.entries = entries;
            }
            Err(e) => log::warn!("Ignoring corrupt leaderboard: {}", e),
        }

        board
    }

    /// Persist the leaderboard
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.entries)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Format a timestamp as a relative date string
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    let now = js_sys::Date::now();
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
    format_relative(
        now - timestamp,
        (date.get_month() + 1, date.get_date(), date.get_full_year() % 100),
    )
}

/// Format a timestamp as a relative date string
#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(timestamp: f64) -> String {
    let now = crate::platform::now_ms();
    let days = (timestamp / 86_400_000.0).floor() as i64;
    format_relative(now - timestamp, civil_from_days(days))
}

/// Shared relative-date wording; `date` is (month, day, two-digit year)
fn format_relative(diff_ms: f64, date: (u32, u32, u32)) -> String {
    let diff_mins = diff_ms / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i32;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            format!("{}/{}/{}", date.0, date.1, date.2)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i32;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i32;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

/// Days since 1970-01-01 to (month, day, two-digit year), UTC
#[cfg(not(target_arch = "wasm32"))]
fn civil_from_days(days: i64) -> (u32, u32, u32) {
    // Howard Hinnant's days_from_civil inverse
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (month, day, year.rem_euclid(100) as u32)
}
