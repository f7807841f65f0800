use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

impl HandStrength {
    /// Packs category and kickers into one integer: 4 bits per kicker below
    /// the category, so numeric order equals hand order.
    pub fn score(&self) -> u32 {
        self.kickers
            .iter()
            .fold(self.category as u32, |acc, &k| (acc << 4) | k as u32)
    }
}

/// Result of [`evaluate`]: a comparable score plus a display name.
///
/// `category` is `None` when fewer than five cards are known; such an
/// evaluation is for display only and must not be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandEvaluation {
    pub score: u32,
    pub category: Option<Category>,
    pub name: &'static str,
}

impl HandEvaluation {
    pub fn is_complete(&self) -> bool {
        self.category.is_some()
    }
}

/// Scores hole cards plus community cards.
///
/// Pure function of its input: identical cards always give identical scores.
/// With five or more cards the best five-card hand is ranked.
///
/// ```
/// use holdem_engine::cards::{Card, Rank, Suit};
/// use holdem_engine::hand::evaluate;
///
/// let hole = [Card::new(Rank::Ace, Suit::Hearts), Card::new(Rank::Two, Suit::Clubs)];
/// let board = [
///     Card::new(Rank::Three, Suit::Diamonds),
///     Card::new(Rank::Four, Suit::Spades),
///     Card::new(Rank::Five, Suit::Hearts),
///     Card::new(Rank::King, Suit::Clubs),
///     Card::new(Rank::Nine, Suit::Diamonds),
/// ];
/// assert_eq!(evaluate(&hole, &board).name, "Straight");
/// ```
pub fn evaluate(hole: &[Card], community: &[Card]) -> HandEvaluation {
    let mut cards = Vec::with_capacity(hole.len() + community.len());
    cards.extend_from_slice(hole);
    cards.extend_from_slice(community);

    if cards.len() < 5 {
        return HandEvaluation {
            score: 0,
            category: None,
            name: if cards.is_empty() { "Waiting" } else { "Incomplete" },
        };
    }

    let strength = evaluate_hand(&cards);
    HandEvaluation {
        score: strength.score(),
        category: Some(strength.category),
        name: strength.category.name(),
    }
}

/// Ranks the best five-card hand among `cards` (five to seven cards).
pub fn evaluate_hand(cards: &[Card]) -> HandStrength {
    debug_assert!(cards.len() >= 5, "need at least five cards");

    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut suit_counts = [0u8; 4];
    let mut by_suit_mask = [0u16; 4];
    let mut rank_mask = 0u16;
    for &c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        let s = suit_index(c.suit);
        suit_counts[s] += 1;
        by_suit_mask[s] |= 1 << r;
        rank_mask |= 1 << r;
    }

    let flush_suit = suit_counts.iter().position(|&count| count >= 5);

    // Straight flush must come from the flush suit alone.
    if let Some(s) = flush_suit {
        if let Some(high) = straight_high_from_mask(by_suit_mask[s]) {
            return HandStrength {
                category: Category::StraightFlush,
                kickers: [high, 0, 0, 0, 0],
            };
        }
    }

    if let Some((quad, kicker)) = detect_quads(&rank_counts) {
        return HandStrength {
            category: Category::FourOfAKind,
            kickers: [quad, kicker, 0, 0, 0],
        };
    }

    if let Some((trip, pair)) = detect_full_house(&rank_counts) {
        return HandStrength {
            category: Category::FullHouse,
            kickers: [trip, pair, 0, 0, 0],
        };
    }

    if let Some(s) = flush_suit {
        let mut k = [0u8; 5];
        let mut ranks = (2..=14u8).rev().filter(|r| by_suit_mask[s] & (1 << r) != 0);
        for item in k.iter_mut() {
            *item = ranks.next().unwrap_or(0);
        }
        return HandStrength {
            category: Category::Flush,
            kickers: k,
        };
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return HandStrength {
            category: Category::Straight,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    let (trips, pairs, singles) = classify_multiples(&rank_counts);
    if let Some(&t) = trips.first() {
        let mut k = [t, 0, 0, 0, 0];
        fill_kickers(&mut k[1..3], &singles);
        return HandStrength {
            category: Category::ThreeOfAKind,
            kickers: k,
        };
    }
    if pairs.len() >= 2 {
        let (high, low) = (pairs[0], pairs[1]);
        // A third pair still plays as a kicker.
        let mut rest: Vec<u8> = pairs[2..].iter().chain(singles.iter()).copied().collect();
        rest.sort_unstable_by(|a, b| b.cmp(a));
        let mut k = [high, low, 0, 0, 0];
        fill_kickers(&mut k[2..3], &rest);
        return HandStrength {
            category: Category::TwoPair,
            kickers: k,
        };
    }
    if let Some(&p) = pairs.first() {
        let mut k = [p, 0, 0, 0, 0];
        fill_kickers(&mut k[1..4], &singles);
        return HandStrength {
            category: Category::OnePair,
            kickers: k,
        };
    }

    let mut k = [0u8; 5];
    fill_kickers(&mut k, &singles);
    HandStrength {
        category: Category::HighCard,
        kickers: k,
    }
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Hearts => 0,
        Suit::Diamonds => 1,
        Suit::Clubs => 2,
        Suit::Spades => 3,
    }
}

fn fill_kickers(slots: &mut [u8], sorted_desc: &[u8]) {
    for (slot, &r) in slots.iter_mut().zip(sorted_desc) {
        *slot = r;
    }
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    // Ace also plays low for the wheel.
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    (5..=14u8).rev().find(|&high| {
        let window = 0b1_1111u16 << (high - 4);
        (m & window) == window
    })
}

fn detect_quads(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let quad = (2..=14u8).rev().find(|&r| rank_counts[r as usize] == 4)?;
    let kicker = (2..=14u8)
        .rev()
        .find(|&r| r != quad && rank_counts[r as usize] > 0)
        .unwrap_or(0);
    Some((quad, kicker))
}

fn detect_full_house(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let mut trips: Vec<u8> = vec![];
    let mut pairs: Vec<u8> = vec![];
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            _ => {}
        }
    }
    let &t = trips.first()?;
    // The pair part may come from a second set of trips.
    let pair = trips.get(1).copied().into_iter().chain(pairs.first().copied()).max()?;
    Some((t, pair))
}

/// Ranks with exactly three, two and one copies, each sorted high to low.
fn classify_multiples(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut trips = vec![];
    let mut pairs = vec![];
    let mut singles = vec![];
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }
    (trips, pairs, singles)
}
