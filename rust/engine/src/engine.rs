//! Round state machine: the only code that produces new [`TableState`]s.

use rand::Rng;
use tracing::{debug, error, info};

use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::{Phase, TableState};
use crate::hand::{evaluate, HandEvaluation};
use crate::player::{LastAction, PlayerAction, Seat, SeatId};
use crate::pot::{Payout, PotManager};
use crate::rules::{self, ValidatedAction};

/// Starts the next hand from a finished table.
///
/// Rotates the button to the next seat holding chips, shuffles a fresh
/// deck, deals two hole cards to every seat still in play, and posts the
/// blinds. Seats with an empty stack sit the hand out.
///
/// # Errors
///
/// [`GameError::HandInProgress`] when `previous` is mid-hand and
/// [`GameError::NotEnoughPlayers`] when fewer than two seats hold chips.
///
/// # Examples
///
/// ```
/// use holdem_engine::engine::start_hand;
/// use holdem_engine::game::{Phase, TableConfig, TableState};
/// use holdem_engine::player::Seat;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let seats = (0..3).map(|i| Seat::new(i, format!("P{i}"), 1000, false)).collect();
/// let table = TableState::new(TableConfig::default(), seats).unwrap();
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
///
/// let hand = start_hand(&table, &mut rng).unwrap();
/// assert_eq!(hand.phase(), Phase::PreFlop);
/// assert_eq!(hand.dealer(), Some(0));
/// assert_eq!(hand.pot(), 75);
/// assert_eq!(hand.current_seat(), Some(0));
/// ```
pub fn start_hand<R: Rng + ?Sized>(
    previous: &TableState,
    rng: &mut R,
) -> Result<TableState, GameError> {
    start_hand_with_deck(previous, Deck::new_shuffled(rng))
}

/// Like [`start_hand`] but deals from a caller-supplied deck.
pub fn start_hand_with_deck(previous: &TableState, deck: Deck) -> Result<TableState, GameError> {
    if previous.phase != Phase::Complete {
        return Err(GameError::HandInProgress);
    }

    let mut next = previous.clone();
    for seat in &mut next.seats {
        seat.reset_for_hand();
    }
    let dealer =
        rules::next_with_chips(&next.seats, previous.dealer).ok_or(GameError::NotEnoughPlayers)?;
    let small = rules::next_with_chips(&next.seats, Some(dealer)).ok_or(GameError::NotEnoughPlayers)?;
    if small == dealer {
        return Err(GameError::NotEnoughPlayers);
    }
    let big = rules::next_with_chips(&next.seats, Some(small)).ok_or(GameError::NotEnoughPlayers)?;

    next.hand_number += 1;
    next.deck = deck;
    next.community_cards.clear();
    next.pot = 0;
    next.phase = Phase::PreFlop;
    next.dealer = Some(dealer);
    next.min_raise = next.config.min_bet;
    next.winners.clear();
    next.payouts.clear();
    next.revealed.clear();
    next.seats[dealer].is_dealer = true;

    deal_hole_cards(&mut next, dealer)?;

    let sb_paid = next.seats[small].commit(next.config.small_blind);
    let bb_paid = next.seats[big].commit(next.config.big_blind);
    next.pot = sb_paid + bb_paid;
    next.last_full_raise = next.max_bet();

    info!(
        hand = next.hand_number,
        dealer,
        small_blind = small,
        big_blind = big,
        pot = next.pot,
        "hand started"
    );

    next.current_seat = rules::next_actor(&next.seats, big);
    if let Some(seat) = next.current_seat {
        next.message = format!("Pre-Flop: {} to act.", next.seats[seat].name);
    }
    settle_street(&mut next, big)?;
    Ok(next)
}

fn deal_hole_cards(state: &mut TableState, dealer: SeatId) -> Result<(), GameError> {
    let n = state.seats.len();
    for _ in 0..2 {
        for step in 1..=n {
            let idx = (dealer + step) % n;
            if !state.seats[idx].in_hand() {
                continue;
            }
            let card = state.deck.draw(1).inspect_err(|e| {
                error!(hand = state.hand_number, error = %e, "deal aborted");
            })?;
            state.seats[idx].hole_cards.extend(card);
        }
    }
    Ok(())
}

/// Applies one seat's action and returns the resulting snapshot.
///
/// `Raise(n)` raises by `n` above the current maximum bet. Every accepted
/// action records the seat's last action; if it closes the street the
/// next street is dealt, running out the board when no further betting is
/// possible, and the hand settles at fold-out or showdown.
///
/// # Errors
///
/// Out-of-turn and illegal actions are rejected and `state` is unchanged.
/// A [`GameError::DeckExhausted`] aborts the transition the same way.
pub fn apply_action(
    state: &TableState,
    seat: SeatId,
    action: PlayerAction,
) -> Result<TableState, GameError> {
    if !state.phase.is_betting() {
        return Err(GameError::HandComplete);
    }
    let Some(actor) = state.seats.get(seat) else {
        return Err(GameError::UnknownSeat(seat));
    };
    if state.current_seat != Some(seat) || !actor.can_act() {
        return Err(GameError::IllegalActor {
            seat,
            expected: state.current_seat,
        });
    }

    let max_before = state.max_bet();
    let to_call = max_before.saturating_sub(actor.current_bet);
    let validated = rules::validate_action(seat, actor.stack, to_call, state.min_raise, action)?;
    if validated.paid() > to_call && !rules::betting_reopened(actor, state.last_full_raise) {
        return Err(GameError::illegal(
            seat,
            "betting was not reopened by a full raise; call or fold",
        ));
    }

    let mut next = state.clone();
    let s = &mut next.seats[seat];
    let paid = s.commit(validated.paid());
    next.pot += paid;
    s.last_action = Some(match validated {
        ValidatedAction::Fold => {
            s.has_folded = true;
            LastAction::Fold
        }
        ValidatedAction::Check => LastAction::Check,
        ValidatedAction::Call(_) => LastAction::Call,
        ValidatedAction::Raise(_) => LastAction::Raise,
        ValidatedAction::AllIn(_) => LastAction::AllIn,
    });

    // Only a full raise resets the minimum; a short all-in does not reopen it.
    let increment = s.current_bet.saturating_sub(max_before);
    if increment >= next.min_raise {
        next.min_raise = increment;
        next.last_full_raise = next.seats[seat].current_bet;
    }

    debug!(
        hand = next.hand_number,
        seat,
        action = %action,
        paid,
        pot = next.pot,
        "action applied"
    );
    next.message = format!("{} {}", next.seats[seat].name, describe(validated));

    settle_street(&mut next, seat)?;
    Ok(next)
}

/// Moves the hand forward after `from` acted: picks the next actor, deals
/// further streets, or settles the pot.
fn settle_street(state: &mut TableState, from: SeatId) -> Result<(), GameError> {
    if state.seats.iter().filter(|s| s.in_hand()).count() == 1 {
        finish_by_fold(state);
        return Ok(());
    }
    if !rules::is_street_complete(&state.seats) {
        state.current_seat = rules::next_actor(&state.seats, from);
        if let Some(seat) = state.current_seat {
            debug!(hand = state.hand_number, seat, "next to act");
        }
        return Ok(());
    }
    advance_streets(state)
}

fn advance_streets(state: &mut TableState) -> Result<(), GameError> {
    let dealer = state.dealer.unwrap_or(0);
    loop {
        let Some((phase, count)) = state.phase.next_street() else {
            showdown(state);
            return Ok(());
        };

        let dealt = state.deck.burn_card().and_then(|()| state.deck.draw(count));
        let cards = dealt.inspect_err(|e| {
            error!(hand = state.hand_number, ?phase, error = %e, "street deal aborted");
        })?;
        state.community_cards.extend(cards);

        state.phase = phase;
        state.min_raise = state.config.min_bet;
        state.last_full_raise = 0;
        for seat in &mut state.seats {
            if seat.in_hand() {
                seat.reset_for_street();
            } else {
                seat.current_bet = 0;
            }
        }
        state.current_seat = rules::next_actor(&state.seats, dealer);
        info!(
            hand = state.hand_number,
            ?phase,
            board = state.community_cards.len(),
            "street dealt"
        );

        if !rules::is_street_complete(&state.seats) {
            state.message = format!("{phase} dealt.");
            return Ok(());
        }
    }
}

fn finish_by_fold(state: &mut TableState) {
    let Some(winner) = state.seats.iter().position(|s| s.in_hand()) else {
        return;
    };
    let amount = state.pot;
    state.seats[winner].stack += amount;
    state.pot = 0;
    state.payouts = vec![Payout {
        seat: winner,
        amount,
    }];
    state.winners = vec![winner];
    state.revealed.clear();
    state.current_seat = None;
    state.phase = Phase::Complete;
    state.message = format!("{} wins {}", state.seats[winner].name, amount);
    info!(hand = state.hand_number, winner, amount, "hand won uncontested");
}

fn showdown(state: &mut TableState) {
    state.phase = Phase::Showdown;
    state.current_seat = None;

    let revealed: Vec<(SeatId, HandEvaluation)> = state
        .seats
        .iter()
        .filter(|s| s.in_hand())
        .map(|s| (s.id, evaluate(&s.hole_cards, &state.community_cards)))
        .collect();
    let score = |seat: SeatId| {
        revealed
            .iter()
            .find(|(id, _)| *id == seat)
            .map(|(_, ev)| ev.score)
            .unwrap_or(0)
    };

    let pots = PotManager::from_seats(&state.seats);
    let n = state.seats.len();
    let dealer = state.dealer.unwrap_or(0);
    let odd_chip_order: Vec<SeatId> = (1..=n).map(|step| (dealer + step) % n).collect();
    let payouts = pots.settle(score, &odd_chip_order);
    let winners = pots.contested_winners(score);

    for p in &payouts {
        state.seats[p.seat].stack += p.amount;
    }
    state.pot -= payouts.iter().map(|p| p.amount).sum::<u32>();

    state.message = showdown_message(&state.seats, &winners, &revealed);
    info!(
        hand = state.hand_number,
        winners = ?winners,
        pots = pots.pots().len(),
        "showdown settled"
    );

    state.winners = winners;
    state.payouts = payouts;
    state.revealed = revealed;
    state.phase = Phase::Complete;
}

/// Winners holding the same hand split; winners of different side pots are
/// named with their own hands.
fn showdown_message(
    seats: &[Seat],
    winners: &[SeatId],
    revealed: &[(SeatId, HandEvaluation)],
) -> String {
    let shown: Vec<(&str, &HandEvaluation)> = winners
        .iter()
        .filter_map(|w| {
            let (_, ev) = revealed.iter().find(|(id, _)| id == w)?;
            Some((seats[*w].name.as_str(), ev))
        })
        .collect();
    match shown.as_slice() {
        [] => "Showdown settled.".to_string(),
        [(name, ev)] => format!("{name} wins with {}!", ev.name),
        [(_, first), rest @ ..] if rest.iter().all(|(_, ev)| ev.score == first.score) => {
            format!("Split Pot! {} players have {}.", shown.len(), first.name)
        }
        many => many
            .iter()
            .map(|(name, ev)| format!("{name} wins with {}", ev.name))
            .collect::<Vec<_>>()
            .join("; ")
            + ".",
    }
}

fn describe(action: ValidatedAction) -> String {
    match action {
        ValidatedAction::Fold => "folds".to_string(),
        ValidatedAction::Check => "checks".to_string(),
        ValidatedAction::Call(n) => format!("calls {n}"),
        ValidatedAction::Raise(n) => format!("raises, putting in {n}"),
        ValidatedAction::AllIn(n) => format!("is all-in for {n}"),
    }
}
