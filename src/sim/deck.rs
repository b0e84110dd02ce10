//! Deck generation
//!
//! Every deal is a fresh permutation: card ids are positions in the shuffled
//! deck, not stable identities of a logical card.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A single card in the current deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Position in the shuffled deck (0..deck length)
    pub id: u32,
    /// Face value; each value appears exactly twice per deck
    pub value: u32,
}

/// Default face values for a board of `pairs` pairs (1..=pairs)
pub fn face_values(pairs: u32) -> Vec<u32> {
    (1..=pairs).collect()
}

/// Deal a shuffled deck containing each distinct value twice
///
/// Repeated entries in `values` are collapsed (first occurrence wins) so the
/// result always holds exactly two cards per value.
pub fn deal<R: Rng + ?Sized>(values: &[u32], rng: &mut R) -> Vec<Card> {
    let mut distinct: Vec<u32> = Vec::with_capacity(values.len());
    for &value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }

    let mut faces: Vec<u32> = distinct.iter().chain(distinct.iter()).copied().collect();
    faces.shuffle(rng);

    faces
        .into_iter()
        .enumerate()
        .map(|(i, value)| Card {
            id: i as u32,
            value,
        })
        .collect()
}
