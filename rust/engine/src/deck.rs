use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// Ordered cards consumed from the front as they are dealt.
///
/// The deck is part of every table snapshot, so it holds no RNG of its own:
/// shuffling happens once when the deck is built for a new hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    /// All 52 cards in a uniformly random order.
    pub fn new_shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = full_deck();
        // Fisher-Yates from the last index down.
        cards.shuffle(rng);
        Self { cards, position: 0 }
    }

    /// Reproducible shuffle for a given seed.
    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::new_shuffled(&mut rng)
    }

    /// A deck in a caller-chosen order, used to stage exact deals.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards, position: 0 }
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Removes and returns the next `n` cards, or fails without consuming any.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        let drawn = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Ok(drawn)
    }

    pub fn burn_card(&mut self) -> Result<(), GameError> {
        self.draw(1).map(|_| ())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::from_cards(full_deck())
    }
}
