use crate::errors::GameError;
use crate::player::{PlayerAction as A, Seat, SeatId};

/// An action checked against the seat's stack, with the chips it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Pays the full outstanding amount.
    Call(u32),
    /// Pays the outstanding amount plus a legal raise increment.
    Raise(u32),
    /// Pays the whole stack; may be a short call or a short raise.
    AllIn(u32),
}

impl ValidatedAction {
    /// Chips moved from the stack into the pot.
    pub fn paid(self) -> u32 {
        match self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(n) | ValidatedAction::Raise(n) | ValidatedAction::AllIn(n) => n,
        }
    }
}

/// Validates a seat's action according to betting rules and stack size.
///
/// Converts a [`crate::player::PlayerAction`] into a [`ValidatedAction`].
/// `Raise(n)` is an increment above the table's current maximum bet; any
/// action the stack cannot fully cover becomes an all-in.
///
/// # Arguments
///
/// * `seat` - Seat submitting the action, used for error reporting
/// * `stack` - Seat's remaining chip stack
/// * `to_call` - Amount needed to match the current maximum bet
/// * `min_raise` - Smallest legal raise increment
/// * `action` - The action the seat wishes to perform
///
/// # Errors
///
/// [`GameError::IllegalAction`] when checking with chips to call or raising
/// by less than `min_raise` with chips to spare.
///
/// # Examples
///
/// ```
/// use holdem_engine::rules::{validate_action, ValidatedAction};
/// use holdem_engine::player::PlayerAction;
///
/// let result = validate_action(0, 1000, 50, 50, PlayerAction::Call);
/// assert_eq!(result, Ok(ValidatedAction::Call(50)));
///
/// // Not enough chips for the full raise
/// let result = validate_action(0, 80, 50, 50, PlayerAction::Raise(100));
/// assert_eq!(result, Ok(ValidatedAction::AllIn(80)));
///
/// assert!(validate_action(0, 1000, 50, 50, PlayerAction::Check).is_err());
/// ```
pub fn validate_action(
    seat: SeatId,
    stack: u32,
    to_call: u32,
    min_raise: u32,
    action: A,
) -> Result<ValidatedAction, GameError> {
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::illegal(
                    seat,
                    format!("cannot check facing {to_call} to call"),
                ))
            }
        }
        A::Call => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else if stack <= to_call {
                Ok(ValidatedAction::AllIn(stack))
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        A::Raise(amount) => {
            if amount == 0 {
                return Err(GameError::illegal(seat, "raise must be positive"));
            }
            if to_call.saturating_add(amount) >= stack {
                Ok(ValidatedAction::AllIn(stack))
            } else if amount < min_raise {
                Err(GameError::illegal(
                    seat,
                    format!("raise of {amount} is below the minimum {min_raise}"),
                ))
            } else {
                Ok(ValidatedAction::Raise(to_call + amount))
            }
        }
        A::AllIn => Ok(ValidatedAction::AllIn(stack)),
    }
}

/// A seat may raise until it has acted, and again only once a full raise
/// lifts the bet above what it last matched.
pub fn betting_reopened(seat: &Seat, last_full_raise: u32) -> bool {
    seat.last_action.is_none() || last_full_raise > seat.current_bet
}

/// Largest current-street bet among seats still in the hand.
pub fn max_bet(seats: &[Seat]) -> u32 {
    seats
        .iter()
        .filter(|s| s.in_hand())
        .map(|s| s.current_bet)
        .max()
        .unwrap_or(0)
}

/// Checks whether the current betting street is settled.
///
/// Every seat that can still act must have matched the maximum bet and
/// acted at least once. All-in seats are settled whatever they bet. A lone
/// seat that owes nothing has no one left to bet against, so it is settled
/// too; with no seat able to act the street is trivially complete.
pub fn is_street_complete(seats: &[Seat]) -> bool {
    let max = max_bet(seats);
    let actors: Vec<&Seat> = seats.iter().filter(|s| s.can_act()).collect();
    match actors.as_slice() {
        [] => true,
        [only] => only.current_bet == max,
        _ => actors
            .iter()
            .all(|s| s.current_bet == max && s.last_action.is_some()),
    }
}

/// First seat after `from` in seating order, wrapping, that can still act.
/// A full cycle ends back on `from` itself.
pub fn next_actor(seats: &[Seat], from: SeatId) -> Option<SeatId> {
    let n = seats.len();
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&idx| seats[idx].can_act())
}

/// First seat after `from`, wrapping, that holds chips. Used for the button
/// and the blinds, which skip seats sitting out.
pub fn next_with_chips(seats: &[Seat], from: Option<SeatId>) -> Option<SeatId> {
    let n = seats.len();
    let start = from.unwrap_or(n.saturating_sub(1));
    (1..=n)
        .map(|step| (start + step) % n)
        .find(|&idx| seats[idx].stack > 0)
}
