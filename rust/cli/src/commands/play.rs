//! # Play Command
//!
//! Interactive hands at a table of baseline bots. The player always sits in
//! seat 0 and types actions at a prompt; bots act on their own, paced by the
//! configured AI delay.
//!
//! Illegal or unreadable input is reported on stderr and the prompt repeats.
//! `q` ends the session cleanly; closing stdin in the middle of a hand
//! interrupts it.

use std::io::{BufRead, Write};

use holdem_ai::driver::Pause;
use holdem_engine::engine::start_hand;
use holdem_engine::player::SeatId;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::commands::{bot_driver, new_table, runtime};
use crate::config::Config;
use crate::error::CliError;
use crate::io_utils::read_stdin_line;
use crate::ui::{self, TableView};
use crate::validation::{ParseResult, parse_player_action};

const HUMAN_SEAT: SeatId = 0;

/// Command-line overrides for `play`.
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub seats: Option<usize>,
    pub hands: u32,
    pub seed: Option<u64>,
    pub stack: Option<u32>,
}

pub fn handle_play_command(
    opts: PlayOptions,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    if opts.hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }

    let seats = opts.seats.unwrap_or(config.seats);
    let seed = opts.seed.or(config.seed).unwrap_or_else(rand::random);
    let mut table = new_table(
        config,
        seats,
        opts.stack.unwrap_or(config.starting_stack),
        Some(HUMAN_SEAT),
    )?;
    let driver = bot_driver(config.driver_config(), &table);
    let runtime = runtime()?;
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    writeln!(out, "play: seats={} hands={} seed={}", seats, opts.hands, seed)?;
    writeln!(
        out,
        "Blinds: SB={} BB={}",
        config.small_blind, config.big_blind
    )?;

    let mut played = 0u32;
    {
        let mut view = TableView::new(&mut *out, Some(HUMAN_SEAT));
        'hands: for _ in 0..opts.hands {
            if table.is_game_over() {
                writeln!(view.out(), "Only one seat has chips left.")?;
                break;
            }

            let mut state = start_hand(&table, &mut rng)?;
            view.hand_started(&state)?;

            loop {
                let (next, pause) = runtime.block_on(driver.run_until_pause(state, &mut view))?;
                state = next;
                let Pause::Human(seat) = pause else {
                    break;
                };

                ui::render_prompt(view.out(), &state, seat)?;
                let Some(line) = read_stdin_line(stdin) else {
                    writeln!(view.out())?;
                    return Err(CliError::Interrupted(format!(
                        "input closed during hand {}",
                        state.hand_number()
                    )));
                };
                match parse_player_action(&line) {
                    ParseResult::Quit => {
                        writeln!(view.out(), "Hand {} abandoned.", state.hand_number())?;
                        break 'hands;
                    }
                    ParseResult::Invalid(msg) => ui::write_error(err, &msg)?,
                    ParseResult::Action(action) => {
                        match driver.submit(&state, seat, action, &mut view) {
                            Ok(next) => state = next,
                            Err(e) => ui::write_error(err, &e.to_string())?,
                        }
                    }
                }
            }

            debug!(hand = state.hand_number(), result = state.message(), "hand finished");
            played += 1;
            table = state;
        }
    }

    writeln!(out, "Hands played: {}", played)?;
    for seat in table.seats() {
        writeln!(out, "  {}: {}", seat.name, seat.stack)?;
    }
    Ok(())
}
