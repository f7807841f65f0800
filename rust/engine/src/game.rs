use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::HandEvaluation;
use crate::player::{PlayerAction, Seat, SeatId};
use crate::pot::Payout;
use crate::rules;

pub const MAX_SEATS: usize = 8;
pub const MIN_SEATS: usize = 2;

/// Stage of a hand. Betting happens on the four streets only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl Phase {
    pub fn is_betting(self) -> bool {
        matches!(self, Phase::PreFlop | Phase::Flop | Phase::Turn | Phase::River)
    }

    /// Community cards revealed on entering the street that follows.
    pub(crate) fn next_street(self) -> Option<(Phase, usize)> {
        match self {
            Phase::PreFlop => Some((Phase::Flop, 3)),
            Phase::Flop => Some((Phase::Turn, 1)),
            Phase::Turn => Some((Phase::River, 1)),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::PreFlop => "Pre-Flop",
            Phase::Flop => "Flop",
            Phase::Turn => "Turn",
            Phase::River => "River",
            Phase::Showdown => "Showdown",
            Phase::Complete => "Complete",
        })
    }
}

/// Stakes for a table. Fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub small_blind: u32,
    pub big_blind: u32,
    /// Smallest raise increment at the start of each street.
    pub min_bet: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 25,
            big_blind: 50,
            min_bet: 50,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.small_blind == 0 {
            return Err(GameError::InvalidConfig("small blind must be positive".into()));
        }
        if self.big_blind < self.small_blind {
            return Err(GameError::InvalidConfig(format!(
                "big blind {} is below small blind {}",
                self.big_blind, self.small_blind
            )));
        }
        if self.min_bet == 0 {
            return Err(GameError::InvalidConfig("minimum bet must be positive".into()));
        }
        Ok(())
    }
}

/// Immutable snapshot of the whole table.
///
/// Snapshots are only produced by [`crate::engine::start_hand`] and
/// [`crate::engine::apply_action`]; both return a fresh value and leave
/// their input untouched, so observers can hold any snapshot safely.
///
/// Chips are conserved: the sum of all stacks plus `pot` never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub(crate) config: TableConfig,
    pub(crate) hand_number: u64,
    pub(crate) deck: Deck,
    pub(crate) community_cards: Vec<Card>,
    pub(crate) pot: u32,
    pub(crate) phase: Phase,
    pub(crate) current_seat: Option<SeatId>,
    pub(crate) dealer: Option<SeatId>,
    pub(crate) seats: Vec<Seat>,
    pub(crate) min_raise: u32,
    /// Maximum bet set by the last full raise this street.
    pub(crate) last_full_raise: u32,
    pub(crate) message: String,
    pub(crate) winners: Vec<SeatId>,
    pub(crate) payouts: Vec<Payout>,
    pub(crate) revealed: Vec<(SeatId, HandEvaluation)>,
}

impl TableState {
    /// An empty table between hands. Seat ids are reassigned to match their
    /// positions.
    ///
    /// Every chip count at the table is a `u32`, so the combined stacks must
    /// fit in one.
    pub fn new(config: TableConfig, seats: Vec<Seat>) -> Result<Self, GameError> {
        config.validate()?;
        if seats.len() < MIN_SEATS || seats.len() > MAX_SEATS {
            return Err(GameError::InvalidConfig(format!(
                "table needs {MIN_SEATS} to {MAX_SEATS} seats, got {}",
                seats.len()
            )));
        }
        seats
            .iter()
            .try_fold(0u32, |total, seat| total.checked_add(seat.stack))
            .ok_or_else(|| {
                GameError::InvalidConfig(format!("total chips exceed {}", u32::MAX))
            })?;
        let seats = seats
            .into_iter()
            .enumerate()
            .map(|(id, mut seat)| {
                seat.id = id;
                seat
            })
            .collect();
        Ok(Self {
            config,
            hand_number: 0,
            deck: Deck::default(),
            community_cards: Vec::with_capacity(5),
            pot: 0,
            phase: Phase::Complete,
            current_seat: None,
            dealer: None,
            seats,
            min_raise: config.min_bet,
            last_full_raise: 0,
            message: String::from("Waiting for the first hand"),
            winners: Vec::new(),
            payouts: Vec::new(),
            revealed: Vec::new(),
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }
    pub fn deck(&self) -> &Deck {
        &self.deck
    }
    pub fn community_cards(&self) -> &[Card] {
        &self.community_cards
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    /// Seat whose turn it is; `None` once no one can act.
    pub fn current_seat(&self) -> Option<SeatId> {
        self.current_seat
    }
    pub fn dealer(&self) -> Option<SeatId> {
        self.dealer
    }
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.seats.get(id)
    }
    pub fn min_bet(&self) -> u32 {
        self.config.min_bet
    }
    /// Smallest legal raise increment right now.
    pub fn min_raise(&self) -> u32 {
        self.min_raise
    }
    pub fn message(&self) -> &str {
        &self.message
    }
    /// Seats that won a contested pot in the last completed hand.
    pub fn winners(&self) -> &[SeatId] {
        &self.winners
    }
    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }
    /// Hands shown down at the end of the last hand, empty after a fold-out.
    pub fn revealed(&self) -> &[(SeatId, HandEvaluation)] {
        &self.revealed
    }
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// No seat but one holds chips; no further hand can start.
    pub fn is_game_over(&self) -> bool {
        self.seats.iter().filter(|s| s.stack > 0).count() < 2
    }

    pub fn max_bet(&self) -> u32 {
        rules::max_bet(&self.seats)
    }

    /// Chips `seat` must add to match the current maximum bet.
    pub fn to_call(&self, seat: SeatId) -> u32 {
        self.seats
            .get(seat)
            .map(|s| self.max_bet().saturating_sub(s.current_bet))
            .unwrap_or(0)
    }

    /// Total chips at the table: every stack plus the pot.
    pub fn total_chips(&self) -> u32 {
        self.seats.iter().map(|s| s.stack).sum::<u32>() + self.pot
    }

    /// Whether `seat` may still raise this street. A seat that already acted
    /// gets the option back only after a full raise; a short all-in leaves it
    /// to call or fold.
    pub fn can_raise(&self, seat: SeatId) -> bool {
        self.seats
            .get(seat)
            .is_some_and(|s| rules::betting_reopened(s, self.last_full_raise))
    }

    /// Actions `seat` may take right now. Empty unless it is that seat's
    /// turn. A raise is listed at the current minimum increment, and only
    /// while the seat may still raise.
    pub fn legal_actions(&self, seat: SeatId) -> Vec<PlayerAction> {
        if self.current_seat != Some(seat) || !self.phase.is_betting() {
            return Vec::new();
        }
        let Some(s) = self.seats.get(seat) else {
            return Vec::new();
        };
        let to_call = self.to_call(seat);
        let mut actions = vec![PlayerAction::Fold];
        if to_call == 0 {
            actions.push(PlayerAction::Check);
        } else {
            actions.push(PlayerAction::Call);
        }
        let may_raise = self.can_raise(seat);
        if may_raise && s.stack > to_call.saturating_add(self.min_raise) {
            actions.push(PlayerAction::Raise(self.min_raise));
        }
        // Shoving more than the call is a raise.
        if may_raise || s.stack <= to_call {
            actions.push(PlayerAction::AllIn);
        }
        actions
    }

    /// Copy of this snapshot with a free-text rationale on `seat`.
    pub fn with_rationale(&self, seat: SeatId, rationale: Option<String>) -> Self {
        let mut next = self.clone();
        if let Some(s) = next.seats.get_mut(seat) {
            s.rationale = rationale;
        }
        next
    }
}
