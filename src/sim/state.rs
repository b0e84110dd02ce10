//! Game state for a single deal
//!
//! `GameState` is the flip/compare/resolve state machine. It knows nothing
//! about timers, storage or the DOM: callers feed it clicks, ticks and
//! deferred mismatch resets, and react to the [`GameEvent`]s it returns.

use serde::{Deserialize, Serialize};

use super::deck::Card;

/// Session generation, bumped on every deal
///
/// Deferred effects carry the generation they were scheduled under so a
/// callback that outlives its deal can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Current phase of a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No cards face up (fresh deal, or after a pair resolved)
    AwaitingFirstFlip,
    /// One card face up
    AwaitingSecondFlip,
    /// Two unequal cards face up, waiting for the delayed reset
    Resolving,
    /// Every card matched
    Won,
}

/// Things that happened in response to an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A card was turned face up
    CardFlipped { id: u32 },
    /// Second flip matched the first
    PairMatched { first: u32, second: u32 },
    /// Second flip did not match; schedule `resolve_mismatch(generation)`
    PairMismatched {
        first: u32,
        second: u32,
        generation: Generation,
    },
    /// Last pair matched
    Won { moves: u32, elapsed_secs: u32 },
}

/// State of one deal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Deal this state belongs to
    pub generation: Generation,
    /// Shuffled cards (ids are positions)
    pub deck: Vec<Card>,
    /// Face-up, unresolved card ids in flip order (at most 2)
    pub flipped: Vec<u32>,
    /// Matched card ids in the order they were matched
    pub matched: Vec<u32>,
    /// Completed pair attempts
    pub moves: u32,
    /// Seconds since the deal
    pub elapsed_secs: u32,
    /// Whether the timer should be running
    pub active: bool,
    pub phase: GamePhase,
}

impl GameState {
    /// Start a deal with the given deck
    pub fn new(generation: Generation, deck: Vec<Card>) -> Self {
        let mut state = Self {
            generation,
            deck,
            flipped: Vec::with_capacity(2),
            matched: Vec::new(),
            moves: 0,
            elapsed_secs: 0,
            active: true,
            phase: GamePhase::AwaitingFirstFlip,
        };

        // An empty deck has nothing left to match
        state.check_won();

        state
    }

    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    pub fn is_flipped(&self, id: u32) -> bool {
        self.flipped.contains(&id)
    }

    pub fn is_matched(&self, id: u32) -> bool {
        self.matched.contains(&id)
    }

    fn card(&self, id: u32) -> Option<Card> {
        self.deck.get(id as usize).copied()
    }

    /// Handle a click on card `id`
    ///
    /// Returns an empty list when the click is ignored: a pair is waiting to
    /// be hidden, the deal is won, or the card is unknown, matched or already
    /// face up.
    pub fn select_card(&mut self, id: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if matches!(self.phase, GamePhase::Resolving | GamePhase::Won) {
            return events;
        }
        let Some(card) = self.card(id) else {
            return events;
        };
        if self.is_matched(id) || self.is_flipped(id) {
            return events;
        }

        self.flipped.push(id);
        events.push(GameEvent::CardFlipped { id });

        if self.flipped.len() < 2 {
            self.phase = GamePhase::AwaitingSecondFlip;
            return events;
        }

        // Second flip completes a pair attempt
        let first_id = self.flipped[0];
        self.moves += 1;
        let first_value = self.card(first_id).map(|c| c.value);

        if first_value == Some(card.value) {
            self.matched.push(first_id);
            self.matched.push(id);
            self.flipped.clear();
            self.phase = GamePhase::AwaitingFirstFlip;
            events.push(GameEvent::PairMatched {
                first: first_id,
                second: id,
            });
            if self.check_won() {
                events.push(GameEvent::Won {
                    moves: self.moves,
                    elapsed_secs: self.elapsed_secs,
                });
            }
        } else {
            self.phase = GamePhase::Resolving;
            events.push(GameEvent::PairMismatched {
                first: first_id,
                second: id,
                generation: self.generation,
            });
        }

        events
    }

    /// Hide a mismatched pair (deferred from `select_card`)
    ///
    /// Returns false if `generation` belongs to an older deal or nothing is
    /// pending.
    pub fn resolve_mismatch(&mut self, generation: Generation) -> bool {
        if generation != self.generation || self.phase != GamePhase::Resolving {
            return false;
        }
        self.flipped.clear();
        self.phase = GamePhase::AwaitingFirstFlip;
        true
    }

    /// One-second timer tick; returns whether the clock advanced
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed_secs += 1;
        true
    }

    /// Move to `Won` if every card is matched
    fn check_won(&mut self) -> bool {
        if self.matched.len() == self.deck.len() {
            self.phase = GamePhase::Won;
            self.active = false;
            self.flipped.clear();
            true
        } else {
            false
        }
    }
}
