//! Board and summary view models
//!
//! Plain data derived from a session for the DOM layer to paint. Nothing in
//! here mutates game state.

use crate::leaderboard::{LeaderboardEntry, format_date};
use crate::persistence::KeyValueStore;
use crate::session::Session;
use crate::sim::GameState;

/// How one card should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardView {
    pub id: u32,
    /// Face is showing (flipped or matched)
    pub face_up: bool,
    pub matched: bool,
    /// Face value, only present when face up
    pub value: Option<u32>,
}

impl CardView {
    /// CSS class list for the card element
    pub fn class_name(&self) -> &'static str {
        match (self.face_up, self.matched) {
            (_, true) => "card flipped matched",
            (true, false) => "card flipped",
            (false, false) => "card",
        }
    }

    /// Text on the card: the value when face up, `?` otherwise
    pub fn label(&self) -> String {
        match self.value {
            Some(value) => value.to_string(),
            None => "?".to_string(),
        }
    }
}

/// Card views in deck order
pub fn board_view(state: &GameState) -> Vec<CardView> {
    state
        .deck
        .iter()
        .map(|card| {
            let matched = state.is_matched(card.id);
            let face_up = matched || state.is_flipped(card.id);
            CardView {
                id: card.id,
                face_up,
                matched,
                value: face_up.then_some(card.value),
            }
        })
        .collect()
}

/// Stats panel and leaderboard text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub moves: String,
    pub time: String,
    pub best: String,
    pub leaderboard: Vec<String>,
}

impl SummaryView {
    pub fn from_session<S: KeyValueStore>(session: &Session<S>) -> Self {
        let state = session.state();
        Self {
            moves: format!("Moves: {}", state.moves),
            time: format!("Time: {} seconds", state.elapsed_secs),
            best: format!("Best Score: {}", best_text(session.best_score().get())),
            leaderboard: session
                .leaderboard()
                .entries()
                .iter()
                .map(leaderboard_line)
                .collect(),
        }
    }
}

fn best_text(best: Option<u32>) -> String {
    match best {
        Some(moves) => moves.to_string(),
        None => "N/A".to_string(),
    }
}

/// One leaderboard row
pub fn leaderboard_line(entry: &LeaderboardEntry) -> String {
    format!(
        "Moves: {}, Time: {} sec, Date: {}",
        entry.moves,
        entry.time,
        format_date(entry.timestamp)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Card, Generation};

    fn state() -> GameState {
        let deck = vec![
            Card { id: 0, value: 1 },
            Card { id: 1, value: 2 },
            Card { id: 2, value: 1 },
            Card { id: 3, value: 2 },
        ];
        GameState::new(Generation(1), deck)
    }

    #[test]
    fn test_face_down_cards_hide_value() {
        let views = board_view(&state());
        assert!(views.iter().all(|v| !v.face_up && v.value.is_none()));
        assert_eq!(views[0].label(), "?");
        assert_eq!(views[0].class_name(), "card");
    }

    #[test]
    fn test_flipped_and_matched() {
        let mut state = state();
        state.select_card(0);
        state.select_card(2);
        state.select_card(1);

        let views = board_view(&state);
        assert!(views[0].matched && views[2].matched);
        assert_eq!(views[0].class_name(), "card flipped matched");
        assert_eq!(views[1].class_name(), "card flipped");
        assert_eq!(views[1].label(), "2");
        assert!(!views[3].face_up);
    }

    #[test]
    fn test_summary_without_best() {
        let session = Session::new(MemoryStore::new(), 1);
        let summary = SummaryView::from_session(&session);
        assert_eq!(summary.moves, "Moves: 0");
        assert_eq!(summary.time, "Time: 0 seconds");
        assert_eq!(summary.best, "Best Score: N/A");
        assert!(summary.leaderboard.is_empty());
    }

    #[test]
    fn test_leaderboard_line() {
        let entry = LeaderboardEntry {
            moves: 11,
            time: 42,
            timestamp: crate::platform::now_ms(),
        };
        assert_eq!(
            leaderboard_line(&entry),
            "Moves: 11, Time: 42 sec, Date: Just now"
        );
    }
}
