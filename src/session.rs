//! Game session controller
//!
//! Owns the current deal, the persisted leaderboard and best score, and the
//! generation counter that invalidates deferred callbacks from older deals.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::best_score::BestScore;
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::persistence::{KeyValueStore, StorageError};
use crate::platform;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Generation, deal};

/// Shown when a deal is won
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionNotice {
    pub moves: u32,
    pub elapsed_secs: u32,
    /// Beat the previous best score
    pub new_best: bool,
    /// Leaderboard position (1-indexed) if the result made the board
    pub rank: Option<usize>,
}

impl CompletionNotice {
    pub fn message(&self) -> String {
        format!(
            "You completed the game in {} moves and {} seconds!",
            self.moves, self.elapsed_secs
        )
    }
}

/// A player's session: one deal at a time plus everything that outlives it
pub struct Session<S: KeyValueStore> {
    store: S,
    settings: Settings,
    rng: Pcg32,
    generation: Generation,
    state: GameState,
    leaderboard: Leaderboard,
    best: BestScore,
    notice: Option<CompletionNotice>,
}

impl<S: KeyValueStore> Session<S> {
    /// Load persisted data from `store` and deal the first game
    pub fn new(store: S, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let leaderboard = Leaderboard::load(&store, settings.leaderboard_size);
        let best = BestScore::load(&store);

        let generation = Generation::default();
        let mut session = Self {
            store,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            generation,
            state: GameState::new(generation, Vec::new()),
            leaderboard,
            best,
            notice: None,
        };
        session.deal_new_game();
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn best_score(&self) -> BestScore {
        self.best
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn notice(&self) -> Option<&CompletionNotice> {
        self.notice.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn mismatch_delay_ms(&self) -> u32 {
        self.settings.mismatch_delay_ms
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shuffle a fresh deck and reset all per-deal state
    ///
    /// Anything scheduled under the previous generation becomes a no-op.
    pub fn deal_new_game(&mut self) -> Vec<GameEvent> {
        self.generation = self.generation.next();
        let deck = deal(&self.settings.face_values(), &mut self.rng);
        log::info!(
            "Dealt {} cards (generation {})",
            deck.len(),
            self.generation.0
        );

        self.state = GameState::new(self.generation, deck);
        self.notice = None;

        let mut events = Vec::new();
        if self.state.is_won() {
            // Nothing to match
            events.push(GameEvent::Won {
                moves: 0,
                elapsed_secs: 0,
            });
            self.finish();
        }
        events
    }

    /// Restart from the completion dialog
    pub fn play_again(&mut self) -> Vec<GameEvent> {
        self.deal_new_game()
    }

    /// Hide the completion dialog
    pub fn close_notice(&mut self) {
        self.notice = None;
    }

    /// Handle a click on card `id`
    pub fn select_card(&mut self, id: u32) -> Vec<GameEvent> {
        let events = self.state.select_card(id);
        if events.iter().any(|e| matches!(e, GameEvent::Won { .. })) {
            self.finish();
        }
        events
    }

    /// Deferred mismatch reset; stale generations are dropped
    pub fn resolve_mismatch(&mut self, generation: Generation) -> bool {
        if generation != self.generation {
            log::debug!(
                "Dropping stale mismatch reset (generation {} vs {})",
                generation.0,
                self.generation.0
            );
            return false;
        }
        self.state.resolve_mismatch(generation)
    }

    /// One-second timer tick; stale generations are dropped
    pub fn tick(&mut self, generation: Generation) -> bool {
        if generation != self.generation {
            log::debug!("Dropping stale tick (generation {})", generation.0);
            return false;
        }
        self.state.tick()
    }

    /// Replace settings and persist them
    ///
    /// Board size applies from the next deal.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), StorageError> {
        settings.save(&mut self.store)?;
        self.leaderboard.set_capacity(settings.leaderboard_size);
        self.settings = settings;
        Ok(())
    }

    /// Surface the completion notice and record the result
    fn finish(&mut self) {
        let moves = self.state.moves;
        let elapsed_secs = self.state.elapsed_secs;
        let mut notice = CompletionNotice {
            moves,
            elapsed_secs,
            new_best: false,
            rank: None,
        };

        // A deal won without a single move (empty deck) is not a result
        if moves > 0 {
            let entry = LeaderboardEntry {
                moves,
                time: elapsed_secs,
                timestamp: platform::now_ms(),
            };
            notice.rank = match self.leaderboard.record(&mut self.store, entry) {
                Ok(rank) => rank,
                Err(e) => {
                    log::warn!("Failed to save leaderboard: {}", e);
                    None
                }
            };
            notice.new_best = match self.best.update(&mut self.store, moves) {
                Ok(improved) => improved,
                Err(e) => {
                    log::warn!("Failed to save best score: {}", e);
                    false
                }
            };
        }

        log::info!("Game won in {} moves, {} seconds", moves, elapsed_secs);
        self.notice = Some(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::GamePhase;

    /// Click every pair in order of value, with perfect recall
    fn solve(session: &mut Session<MemoryStore>) -> Vec<GameEvent> {
        let mut by_value: Vec<(u32, u32)> = session
            .state()
            .deck
            .iter()
            .map(|c| (c.value, c.id))
            .collect();
        by_value.sort();

        let mut events = Vec::new();
        for (_, id) in by_value {
            events.extend(session.select_card(id));
        }
        events
    }

    /// Ids of the first two cards whose values differ
    fn mismatched_pair(state: &GameState) -> (u32, u32) {
        let first = state.deck[0];
        let other = state
            .deck
            .iter()
            .find(|c| c.value != first.value)
            .map(|c| c.id)
            .unwrap();
        (first.id, other)
    }

    #[test]
    fn test_new_session_deals() {
        let session = Session::new(MemoryStore::new(), 1);
        assert_eq!(session.state().deck.len(), 16);
        assert_eq!(session.generation(), Generation(1));
        assert!(session.state().active);
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_win_records_result() {
        let mut session = Session::new(MemoryStore::new(), 2);
        session.tick(session.generation());
        let events = solve(&mut session);

        assert!(events.contains(&GameEvent::Won {
            moves: 8,
            elapsed_secs: 1,
        }));
        let notice = session.notice().copied().unwrap();
        assert_eq!(notice.moves, 8);
        assert!(notice.new_best);
        assert_eq!(notice.rank, Some(1));
        assert_eq!(session.best_score().get(), Some(8));
        assert_eq!(session.leaderboard().entries().len(), 1);
        assert_eq!(session.leaderboard().entries()[0].time, 1);
    }

    #[test]
    fn test_worse_game_keeps_best() {
        let mut session = Session::new(MemoryStore::new(), 3);
        solve(&mut session);

        session.play_again();
        let (a, b) = mismatched_pair(session.state());
        session.select_card(a);
        session.select_card(b);
        session.resolve_mismatch(session.generation());
        solve(&mut session);

        let notice = session.notice().copied().unwrap();
        assert_eq!(notice.moves, 9);
        assert!(!notice.new_best);
        assert_eq!(notice.rank, Some(2));
        assert_eq!(session.best_score().get(), Some(8));
    }

    #[test]
    fn test_restart_invalidates_pending_mismatch() {
        let mut session = Session::new(MemoryStore::new(), 4);
        let (a, b) = mismatched_pair(session.state());
        session.select_card(a);
        let events = session.select_card(b);
        let stale = events
            .iter()
            .find_map(|e| match e {
                GameEvent::PairMismatched { generation, .. } => Some(*generation),
                _ => None,
            })
            .unwrap();

        session.deal_new_game();
        let id = session.state().deck[0].id;
        session.select_card(id);

        assert!(!session.resolve_mismatch(stale));
        assert_eq!(session.state().flipped, vec![id]);
        assert_eq!(session.state().phase, GamePhase::AwaitingSecondFlip);
    }

    #[test]
    fn test_restart_invalidates_old_ticks() {
        let mut session = Session::new(MemoryStore::new(), 5);
        let old = session.generation();
        session.tick(old);
        session.deal_new_game();

        assert!(!session.tick(old));
        assert_eq!(session.state().elapsed_secs, 0);
        assert!(session.tick(session.generation()));
        assert_eq!(session.state().elapsed_secs, 1);
    }

    #[test]
    fn test_timer_stops_after_win() {
        let mut session = Session::new(MemoryStore::new(), 6);
        solve(&mut session);
        assert!(!session.state().active);
        assert!(!session.tick(session.generation()));
    }

    #[test]
    fn test_restart_resets_state() {
        let mut session = Session::new(MemoryStore::new(), 7);
        solve(&mut session);
        session.deal_new_game();

        let state = session.state();
        assert!(state.flipped.is_empty());
        assert!(state.matched.is_empty());
        assert_eq!(state.moves, 0);
        assert_eq!(state.elapsed_secs, 0);
        assert!(state.active);
        assert!(!state.is_won());
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_close_notice() {
        let mut session = Session::new(MemoryStore::new(), 8);
        solve(&mut session);
        assert!(session.notice().is_some());
        session.close_notice();
        assert!(session.notice().is_none());
        // Closing the dialog does not restart
        assert!(session.state().is_won());
    }

    #[test]
    fn test_persisted_across_sessions() {
        let mut session = Session::new(MemoryStore::new(), 9);
        solve(&mut session);
        let store = session.store().clone();

        let next = Session::new(store, 10);
        assert_eq!(next.best_score().get(), Some(8));
        assert_eq!(next.leaderboard().entries().len(), 1);
    }

    #[test]
    fn test_empty_board_records_nothing() {
        let mut session = Session::new(MemoryStore::new(), 11);
        // Zero-pair deal is won on arrival
        session.state = GameState::new(session.generation, Vec::new());
        assert!(session.state().is_won());
        session.finish();

        let notice = session.notice().copied().unwrap();
        assert_eq!(notice.moves, 0);
        assert_eq!(notice.rank, None);
        assert!(!notice.new_best);
        assert!(session.leaderboard().is_empty());
        assert_eq!(session.best_score().get(), None);
    }

    #[test]
    fn test_board_size_applies_on_next_deal() {
        let mut session = Session::new(MemoryStore::new(), 12);
        let mut settings = session.settings().clone();
        settings.board_size = crate::settings::BoardSize::Large;
        session.update_settings(settings).unwrap();
        assert_eq!(session.state().deck.len(), 16);

        session.deal_new_game();
        assert_eq!(session.state().deck.len(), 24);
    }
}
