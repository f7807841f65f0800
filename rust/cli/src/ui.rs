//! Terminal rendering of table snapshots.

use std::io::Write;

use holdem_ai::TableObserver;
use holdem_engine::cards::Card;
use holdem_engine::game::{Phase, TableState};
use holdem_engine::player::{PlayerAction, SeatId};

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

pub fn format_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "-".to_string();
    }
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line per seat: name, stack, and the seat's bet this street.
pub fn render_seats(out: &mut dyn Write, state: &TableState) -> std::io::Result<()> {
    for seat in state.seats() {
        let mut flags = String::new();
        if seat.is_dealer {
            flags.push_str(" (D)");
        }
        if seat.is_all_in {
            flags.push_str(" [all-in]");
        } else if seat.has_folded {
            flags.push_str(" [out]");
        }
        writeln!(
            out,
            "  {}{}: stack {}, bet {}",
            seat.name, flags, seat.stack, seat.current_bet
        )?;
    }
    Ok(())
}

/// The action prompt for `seat`, listing what the engine will accept.
pub fn render_prompt(out: &mut dyn Write, state: &TableState, seat: SeatId) -> std::io::Result<()> {
    let Some(me) = state.seat(seat) else {
        return Ok(());
    };
    writeln!(
        out,
        "{} | Board: {} | Pot: {} | Your hand: {} | Stack: {} | To call: {}",
        state.phase(),
        format_cards(state.community_cards()),
        state.pot(),
        format_cards(&me.hole_cards),
        me.stack,
        state.to_call(seat)
    )?;
    let legal: Vec<String> = state.legal_actions(seat).iter().map(|a| a.to_string()).collect();
    writeln!(out, "Legal: {}", legal.join(", "))?;
    write!(out, "> ")?;
    out.flush()
}

/// Prints what happens at the table as the driver publishes snapshots.
///
/// Hole cards are only shown for `viewer` until a showdown reveals them.
pub struct TableView<W: Write> {
    out: W,
    viewer: Option<SeatId>,
    pending: Option<(SeatId, PlayerAction)>,
    board_len: usize,
}

impl<W: Write> TableView<W> {
    pub fn new(out: W, viewer: Option<SeatId>) -> Self {
        Self {
            out,
            viewer,
            pending: None,
            board_len: 0,
        }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Announces a freshly dealt hand.
    pub fn hand_started(&mut self, state: &TableState) -> std::io::Result<()> {
        self.board_len = 0;
        self.pending = None;
        writeln!(self.out, "Hand {}", state.hand_number())?;
        render_seats(&mut self.out, state)?;
        if let Some(me) = self.viewer.and_then(|id| state.seat(id)) {
            writeln!(self.out, "Your hand: {}", format_cards(&me.hole_cards))?;
        }
        Ok(())
    }

    fn render(&mut self, state: &TableState) -> std::io::Result<()> {
        if let Some((seat, action)) = self.pending.take()
            && let Some(actor) = state.seat(seat)
        {
            match actor.rationale.as_deref().filter(|_| Some(seat) != self.viewer) {
                Some(why) => writeln!(self.out, "{}: {} ({})", actor.name, action, why)?,
                None => writeln!(self.out, "{}: {}", actor.name, action)?,
            }
        }

        let board = state.community_cards();
        if board.len() > self.board_len {
            let street = match board.len() {
                3 => Phase::Flop,
                4 => Phase::Turn,
                _ => Phase::River,
            };
            writeln!(self.out, "*** {} *** {}", street, format_cards(board))?;
            self.board_len = board.len();
        }

        if state.is_complete() {
            for (seat, hand) in state.revealed() {
                if let Some(s) = state.seat(*seat) {
                    writeln!(
                        self.out,
                        "  {} shows {} ({})",
                        s.name,
                        format_cards(&s.hole_cards),
                        hand.name
                    )?;
                }
            }
            writeln!(self.out, "{}", state.message())?;
            for payout in state.payouts() {
                if let Some(s) = state.seat(payout.seat) {
                    writeln!(self.out, "  {} collects {}", s.name, payout.amount)?;
                }
            }
        }
        Ok(())
    }
}

impl<W: Write> TableObserver for TableView<W> {
    fn on_snapshot(&mut self, state: &TableState) {
        if let Err(e) = self.render(state) {
            tracing::warn!(error = %e, "failed to render table");
        }
    }

    fn on_action(&mut self, seat: SeatId, _phase: Phase, action: PlayerAction) {
        self.pending = Some((seat, action));
    }
}
