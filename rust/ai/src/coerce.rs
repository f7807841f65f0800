use holdem_engine::game::TableState;
use holdem_engine::player::{PlayerAction, SeatId};

/// Rewrites a policy's action into one the engine will accept for `seat`.
///
/// - Check while facing a bet becomes Fold.
/// - Fold with nothing to call becomes Check.
/// - A raise increment is clamped to `[min_raise, stack]`; one the stack
///   cannot cover is left for the engine to turn into an all-in.
/// - Once betting is closed to the seat, a raise or an all-in for more than
///   the call becomes Call.
///
/// Returns the legal action and whether it differs from the input.
///
/// ```
/// use holdem_ai::coerce::coerce;
/// use holdem_engine::engine::start_hand;
/// use holdem_engine::game::{TableConfig, TableState};
/// use holdem_engine::player::{PlayerAction, Seat};
/// use rand::SeedableRng;
///
/// let seats = (0..3).map(|i| Seat::new(i, format!("Bot{i}"), 1000, true)).collect();
/// let table = TableState::new(TableConfig::default(), seats).unwrap();
/// let state = start_hand(&table, &mut rand_chacha::ChaCha20Rng::seed_from_u64(1)).unwrap();
///
/// // Seat 0 faces the big blind.
/// assert_eq!(coerce(&state, 0, PlayerAction::Check), (PlayerAction::Fold, true));
/// assert_eq!(coerce(&state, 0, PlayerAction::Raise(1)), (PlayerAction::Raise(50), true));
/// ```
pub fn coerce(state: &TableState, seat: SeatId, action: PlayerAction) -> (PlayerAction, bool) {
    let to_call = state.to_call(seat);
    let stack = state.seat(seat).map(|s| s.stack).unwrap_or(0);
    let floor = state.min_raise().max(1);
    let closed = !state.can_raise(seat);

    let legal = match action {
        PlayerAction::Check if to_call > 0 => PlayerAction::Fold,
        PlayerAction::Fold if to_call == 0 => PlayerAction::Check,
        PlayerAction::Raise(_) if closed => PlayerAction::Call,
        PlayerAction::AllIn if closed && stack > to_call => PlayerAction::Call,
        PlayerAction::Raise(amount) => PlayerAction::Raise(amount.clamp(floor, stack.max(floor))),
        other => other,
    };
    (legal, legal != action)
}
