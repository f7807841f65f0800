use thiserror::Error;

use crate::player::SeatId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Seat {seat} cannot act now (expected {expected:?})")]
    IllegalActor {
        seat: SeatId,
        expected: Option<SeatId>,
    },
    #[error("Illegal action by seat {seat}: {reason}")]
    IllegalAction { seat: SeatId, reason: String },
    #[error("Deck exhausted: requested {requested}, {remaining} remaining")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Hand already complete")]
    HandComplete,
    #[error("A hand is still in progress")]
    HandInProgress,
    #[error("Need at least two seats with chips to start a hand")]
    NotEnoughPlayers,
    #[error("Unknown seat {0}")]
    UnknownSeat(SeatId),
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    pub(crate) fn illegal(seat: SeatId, reason: impl Into<String>) -> Self {
        GameError::IllegalAction {
            seat,
            reason: reason.into(),
        }
    }
}
