//! Local rule-based policies.
//!
//! [`BaselinePolicy`] plays by hand strength and pot odds. [`FallbackPolicy`]
//! is the conservative policy the driver substitutes whenever another
//! policy fails. Both are deterministic: the same snapshot always yields the
//! same decision.

use async_trait::async_trait;
use holdem_engine::cards::Card;
use holdem_engine::game::{Phase, TableState};
use holdem_engine::hand::{Category, evaluate_hand};
use holdem_engine::player::{PlayerAction, SeatId};

use crate::{Decision, DecisionPolicy, PolicyError};

/// Hand-strength policy on a 0-10 scale.
///
/// **Preflop:** pairs and big cards rate high, suited connectors medium,
/// offsuit junk low.
///
/// **Postflop:** the made hand's category sets the rating, with a point for
/// a queen-or-better top card.
///
/// Strong hands raise, medium hands call when the price is right, weak
/// hands check or fold. There are no bluffs.
///
/// # Example
///
/// ```rust
/// use holdem_ai::baseline::BaselinePolicy;
/// use holdem_engine::engine::{apply_action, start_hand};
/// use holdem_engine::game::{TableConfig, TableState};
/// use holdem_engine::player::Seat;
/// use rand::SeedableRng;
///
/// let seats = (0..3).map(|i| Seat::new(i, format!("Bot{i}"), 2000, true)).collect();
/// let table = TableState::new(TableConfig::default(), seats).unwrap();
/// let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(42);
/// let state = start_hand(&table, &mut rng).unwrap();
///
/// let seat = state.current_seat().unwrap();
/// let decision = BaselinePolicy::new().choose(&state, seat);
/// assert!(apply_action(&state, seat, decision.action).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaselinePolicy;

impl BaselinePolicy {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of [`DecisionPolicy::decide`].
    pub fn choose(&self, state: &TableState, seat: SeatId) -> Decision {
        let Some(s) = state.seat(seat) else {
            return Decision::new(PlayerAction::Fold, "unknown seat");
        };
        let to_call = state.to_call(seat);
        let hole = match s.hole_cards.as_slice() {
            [a, b] => [*a, *b],
            _ => {
                let action = if to_call == 0 {
                    PlayerAction::Check
                } else {
                    PlayerAction::Fold
                };
                return Decision::new(action, "no cards to play");
            }
        };

        let strength = if state.phase() == Phase::PreFlop {
            preflop_strength(hole)
        } else {
            postflop_strength(hole, state.community_cards()).unwrap_or_else(|| preflop_strength(hole))
        };
        let action = decide_action(strength, to_call, state.min_raise(), s.stack, state.pot());
        let odds = pot_odds(state.pot(), to_call);
        Decision::new(
            action,
            format!("strength {strength}/10, {to_call} to call, pot odds {odds:.2}"),
        )
    }
}

#[async_trait]
impl DecisionPolicy for BaselinePolicy {
    async fn decide(&self, state: &TableState, seat: SeatId) -> Result<Decision, PolicyError> {
        Ok(self.choose(state, seat))
    }

    fn name(&self) -> &str {
        "BaselinePolicy"
    }
}

/// Conservative policy used when another policy fails: check when free,
/// call when the price is under 30% of the resulting pot, otherwise fold.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPolicy;

impl FallbackPolicy {
    pub fn choose(&self, state: &TableState, seat: SeatId) -> Decision {
        let to_call = state.to_call(seat);
        if to_call == 0 {
            return Decision::new(PlayerAction::Check, "Checking while my read is unavailable.");
        }
        let price = to_call as f32 / (state.pot() + to_call) as f32;
        if price < 0.3 {
            Decision::new(PlayerAction::Call, "Cheap enough to call.")
        } else {
            Decision::new(PlayerAction::Fold, "Too expensive without a read.")
        }
    }
}

#[async_trait]
impl DecisionPolicy for FallbackPolicy {
    async fn decide(&self, state: &TableState, seat: SeatId) -> Result<Decision, PolicyError> {
        Ok(self.choose(state, seat))
    }

    fn name(&self) -> &str {
        "FallbackPolicy"
    }
}

/// Preflop rating: 9-10 premium, 7-8 strong, 5-6 medium, 3-4 marginal,
/// 0-2 weak.
fn preflop_strength(hole: [Card; 2]) -> u8 {
    let (a, b) = (hole[0].rank.value(), hole[1].rank.value());
    let (high, low) = (a.max(b), a.min(b));
    let suited = hole[0].suit == hole[1].suit;

    if high == low {
        return match high {
            13..=14 => 10,
            11..=12 => 9,
            10 => 8,
            9 => 7,
            8 => 6,
            7 => 5,
            _ => 4,
        };
    }

    // (offsuit, suited)
    let (offsuit, suited_rating) = match (high, low) {
        (14, 13) => (8, 10),
        (14, 12) => (7, 8),
        (14, 11) | (13, 12) => (6, 7),
        (14, 10) | (13, 11) | (12, 11) => (5, 6),
        (14, _) | (13, 10) | (12, 10) => (4, 5),
        _ if suited && high - low <= 2 => return if high >= 9 { 5 } else { 4 },
        _ if high >= 11 && low >= 9 => return 4,
        _ => return 2,
    };
    if suited { suited_rating } else { offsuit }
}

/// Postflop rating from the made hand, `None` before the flop.
fn postflop_strength(hole: [Card; 2], board: &[Card]) -> Option<u8> {
    if board.len() < 3 {
        return None;
    }
    let mut cards = hole.to_vec();
    cards.extend_from_slice(board);
    let strength = evaluate_hand(&cards);

    let base = match strength.category {
        Category::HighCard => 1,
        Category::OnePair => 3,
        Category::TwoPair => 5,
        Category::ThreeOfAKind => 6,
        Category::Straight => 7,
        Category::Flush => 8,
        Category::FullHouse => 9,
        Category::FourOfAKind | Category::StraightFlush => 10,
    };
    let top_card_bonus = u8::from(strength.kickers[0] >= 12);
    Some((base + top_card_bonus).min(10))
}

/// Share of the final pot already in it: pot / (pot + call).
fn pot_odds(pot: u32, to_call: u32) -> f32 {
    if to_call == 0 {
        return 1.0;
    }
    pot as f32 / (pot + to_call) as f32
}

fn decide_action(strength: u8, to_call: u32, min_raise: u32, stack: u32, pot: u32) -> PlayerAction {
    if to_call == 0 {
        return decide_unopened(strength, min_raise, stack, pot);
    }
    if to_call >= stack {
        return if strength >= 7 {
            PlayerAction::AllIn
        } else {
            PlayerAction::Fold
        };
    }

    let odds = pot_odds(pot, to_call);
    match strength {
        9..=10 if stack > to_call + min_raise => {
            PlayerAction::Raise((pot / 2).max(min_raise).min(stack - to_call))
        }
        7..=10 => PlayerAction::Call,
        5..=6 if odds >= 0.3 || to_call <= pot / 4 => PlayerAction::Call,
        3..=4 if odds >= 0.4 || to_call <= pot / 6 => PlayerAction::Call,
        _ => PlayerAction::Fold,
    }
}

/// Nothing to call: value-bet strong hands, check everything else.
fn decide_unopened(strength: u8, min_raise: u32, stack: u32, pot: u32) -> PlayerAction {
    if stack < min_raise {
        return PlayerAction::Check;
    }
    match strength {
        9..=10 => PlayerAction::Raise((pot * 2 / 3).max(min_raise).min(stack)),
        7..=8 => PlayerAction::Raise((pot / 2).max(min_raise).min(stack)),
        _ => PlayerAction::Check,
    }
}
