//! Simulation command handler.
//!
//! Seats a table of baseline bots and plays hands back to back without
//! pacing. With `--output`, every hand is appended to a JSONL hand history
//! as a [`HandRecord`]. The session is reproducible from its seed.

use std::io::Write;
use std::time::Duration;

use holdem_ai::TableObserver;
use holdem_ai::driver::{DriverConfig, Pause};
use holdem_engine::engine::start_hand;
use holdem_engine::game::{Phase, TableState};
use holdem_engine::logger::{HandLogger, HandRecord};
use holdem_engine::player::{PlayerAction, SeatId};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::commands::{bot_driver, new_table, runtime};
use crate::config::Config;
use crate::error::CliError;
use crate::ui;

/// Command-line overrides for `sim`.
#[derive(Debug, Clone, Default)]
pub struct SimOptions {
    pub hands: u32,
    pub seats: Option<usize>,
    pub seed: Option<u64>,
    pub output: Option<String>,
}

/// Collects the actions of the hand being played.
#[derive(Default)]
struct HandRecorder {
    record: Option<HandRecord>,
}

impl TableObserver for HandRecorder {
    fn on_snapshot(&mut self, _state: &TableState) {}

    fn on_action(&mut self, seat: SeatId, phase: Phase, action: PlayerAction) {
        if let Some(record) = &mut self.record {
            record.push_action(seat, phase, action);
        }
    }
}

pub fn handle_sim_command(
    opts: SimOptions,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if opts.hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }

    let seats = opts.seats.unwrap_or(config.seats);
    let seed = opts.seed.or(config.seed).unwrap_or_else(rand::random);
    let mut table = new_table(config, seats, config.starting_stack, None)?;
    let driver = bot_driver(
        DriverConfig {
            min_delay: Duration::ZERO,
            ..config.driver_config()
        },
        &table,
    );
    let runtime = runtime()?;
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut logger = opts.output.as_deref().map(HandLogger::create).transpose()?;

    let mut played = 0u32;
    for index in 0..opts.hands {
        if table.is_game_over() {
            ui::display_warning(
                err,
                &format!("stopped after {} hands: only one seat has chips", played),
            )?;
            break;
        }

        let state = start_hand(&table, &mut rng)?;
        let mut recorder = HandRecorder {
            record: logger
                .as_mut()
                .map(|l| HandRecord::begin(l.next_id(), Some(seed), &state)),
        };
        let (state, pause) = runtime.block_on(driver.run_until_pause(state, &mut recorder))?;
        if let Pause::Human(seat) = pause {
            return Err(CliError::Config(format!("seat {seat} has no decision policy")));
        }

        if let (Some(logger), Some(mut record)) = (logger.as_mut(), recorder.record.take()) {
            record.meta = Some(serde_json::json!({ "hand_index": index }));
            record.finish(&state);
            logger.write(&record)?;
        }

        debug!(hand = state.hand_number(), result = state.message(), "hand finished");
        played += 1;
        table = state;
    }

    info!(hands = played, seed, seats, "simulation finished");
    writeln!(out, "Simulated: {} hands (seed {})", played, seed)?;
    for seat in table.seats() {
        writeln!(out, "  {}: {}", seat.name, seat.stack)?;
    }
    Ok(())
}
