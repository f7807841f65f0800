use crate::cards::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a seat in the fixed seating order.
pub type SeatId = usize;

/// An action submitted by a seat during a betting street.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (only valid with nothing to call)
    Check,
    /// Match the current maximum bet, or as much of it as the stack allows
    Call,
    /// Raise by this increment above the current maximum bet
    Raise(u32),
    /// Commit the whole remaining stack
    AllIn,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => write!(f, "fold"),
            PlayerAction::Check => write!(f, "check"),
            PlayerAction::Call => write!(f, "call"),
            PlayerAction::Raise(amount) => write!(f, "raise {amount}"),
            PlayerAction::AllIn => write!(f, "all-in"),
        }
    }
}

/// What a seat last did this street, as shown to observers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LastAction {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

impl LastAction {
    pub fn label(self) -> &'static str {
        match self {
            LastAction::Fold => "Fold",
            LastAction::Check => "Check",
            LastAction::Call => "Call",
            LastAction::Raise => "Raise",
            LastAction::AllIn => "All-In",
        }
    }
}

impl fmt::Display for LastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One seat at the table.
///
/// Seats are owned by the table state and change only through betting
/// operations and street resets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub name: String,
    /// Decisions come from a policy rather than a person.
    pub is_automated: bool,
    /// Empty before the deal and for seats sitting out.
    pub hole_cards: Vec<Card>,
    pub stack: u32,
    /// Chips put in during the current street.
    pub current_bet: u32,
    /// Chips put in during the whole hand.
    pub committed: u32,
    pub has_folded: bool,
    pub is_all_in: bool,
    pub is_dealer: bool,
    pub last_action: Option<LastAction>,
    /// Free text explaining an automated decision, for observers only.
    pub rationale: Option<String>,
}

impl Seat {
    pub fn new(id: SeatId, name: impl Into<String>, stack: u32, is_automated: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_automated,
            hole_cards: Vec::with_capacity(2),
            stack,
            current_bet: 0,
            committed: 0,
            has_folded: false,
            is_all_in: false,
            is_dealer: false,
            last_action: None,
            rationale: None,
        }
    }

    /// Still holding cards in this hand.
    pub fn in_hand(&self) -> bool {
        !self.has_folded
    }

    /// Can still be asked to act.
    pub fn can_act(&self) -> bool {
        !self.has_folded && !self.is_all_in
    }

    /// Moves up to `amount` chips from the stack into the current bet and
    /// returns the chips actually moved. Emptying the stack makes the seat
    /// all-in.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.current_bet += paid;
        self.committed += paid;
        if self.stack == 0 {
            self.is_all_in = true;
        }
        paid
    }

    /// Clears per-hand state, keeping the stack.
    pub(crate) fn reset_for_hand(&mut self) {
        self.hole_cards.clear();
        self.current_bet = 0;
        self.committed = 0;
        self.has_folded = self.stack == 0;
        self.is_all_in = false;
        self.is_dealer = false;
        self.last_action = None;
        self.rationale = None;
    }

    pub(crate) fn reset_for_street(&mut self) {
        self.current_bet = 0;
        self.last_action = None;
    }
}
