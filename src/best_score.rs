//! Best (fewest-move) score
//!
//! Stored as decimal text under `bestScore`. Lower is better.

use crate::persistence::{KeyValueStore, StorageError};

/// Best move count so far; `None` until a game has been won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore(Option<u32>);

impl BestScore {
    const STORAGE_KEY: &'static str = "bestScore";

    pub fn unset() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<u32> {
        self.0
    }

    /// Whether `candidate` would beat the current best
    pub fn improves(&self, candidate: u32) -> bool {
        self.0.is_none_or(|best| candidate < best)
    }

    /// Take `candidate` if it improves on the best and persist it
    ///
    /// Returns whether the best changed. Nothing is written otherwise.
    pub fn update<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        candidate: u32,
    ) -> Result<bool, StorageError> {
        if !self.improves(candidate) {
            return Ok(false);
        }
        store.set(Self::STORAGE_KEY, &candidate.to_string())?;
        self.0 = Some(candidate);
        log::info!("New best score: {} moves", candidate);
        Ok(true)
    }

    /// Load the best score; missing or malformed data reads as unset
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(text)) => match text.trim().parse::<u32>() {
                Ok(best) => Self(Some(best)),
                Err(_) => {
                    log::warn!("Ignoring corrupt best score {:?}", text);
                    Self::unset()
                }
            },
            Ok(None) => Self::unset(),
            Err(e) => {
                log::warn!("Failed to read best score: {}", e);
                Self::unset()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_unset_by_default() {
        let store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).get(), None);
    }

    #[test]
    fn test_first_result_sets_best() {
        let mut store = MemoryStore::new();
        let mut best = BestScore::unset();
        assert!(best.update(&mut store, 9).unwrap());
        assert_eq!(store.get("bestScore").unwrap().as_deref(), Some("9"));
    }

    #[test]
    fn test_never_increases() {
        let mut store = MemoryStore::new();
        store.set("bestScore", "4").unwrap();
        let mut best = BestScore::load(&store);

        assert!(!best.update(&mut store, 6).unwrap());
        assert_eq!(best.get(), Some(4));
        assert_eq!(store.get("bestScore").unwrap().as_deref(), Some("4"));

        assert!(!best.update(&mut store, 4).unwrap());

        assert!(best.update(&mut store, 2).unwrap());
        assert_eq!(best.get(), Some(2));
        assert_eq!(BestScore::load(&store).get(), Some(2));
    }

    #[test]
    fn test_zero_is_a_real_score() {
        let mut store = MemoryStore::new();
        store.set("bestScore", "0").unwrap();
        assert_eq!(BestScore::load(&store).get(), Some(0));
    }

    #[test]
    fn test_corrupt_is_unset() {
        let mut store = MemoryStore::new();
        store.set("bestScore", "1.7976931348623157e+308").unwrap();
        assert_eq!(BestScore::load(&store).get(), None);

        store.set("bestScore", "lots").unwrap();
        assert_eq!(BestScore::load(&store).get(), None);
    }
}
