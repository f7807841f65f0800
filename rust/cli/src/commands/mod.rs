//! Command handler modules for the holdem CLI.
//!
//! Each command lives in its own module and exposes a
//! `handle_COMMAND_command(...) -> Result<(), CliError>` function. Output
//! streams (`&mut dyn Write`) and player input are passed in, so handlers
//! can be driven from tests with in-memory buffers.

pub mod cfg;
pub mod play;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use play::{PlayOptions, handle_play_command};
pub use sim::{SimOptions, handle_sim_command};

use holdem_ai::baseline::BaselinePolicy;
use holdem_ai::driver::{DriverConfig, HandDriver};
use holdem_engine::game::{MAX_SEATS, MIN_SEATS, TableState};
use holdem_engine::player::{Seat, SeatId};
use tokio::runtime::{Builder, Runtime};

use crate::config::Config;
use crate::error::CliError;

/// Seats the table: `human` (if any) is called "You", everyone else is a bot.
pub(crate) fn new_table(
    config: &Config,
    seats: usize,
    stack: u32,
    human: Option<SeatId>,
) -> Result<TableState, CliError> {
    if !(MIN_SEATS..=MAX_SEATS).contains(&seats) {
        return Err(CliError::InvalidInput(format!(
            "seats must be between {MIN_SEATS} and {MAX_SEATS}"
        )));
    }
    if stack == 0 {
        return Err(CliError::InvalidInput("stack must be >0".to_string()));
    }
    let seats = (0..seats)
        .map(|id| {
            if Some(id) == human {
                Seat::new(id, "You", stack, false)
            } else {
                Seat::new(id, format!("Bot{id}"), stack, true)
            }
        })
        .collect();
    Ok(TableState::new(config.table_config(), seats)?)
}

/// A driver with a baseline policy on every automated seat of `table`.
pub(crate) fn bot_driver(config: DriverConfig, table: &TableState) -> HandDriver {
    table
        .seats()
        .iter()
        .filter(|s| s.is_automated)
        .fold(HandDriver::new(config), |driver, s| {
            driver.with_policy(s.id, Box::new(BaselinePolicy::new()))
        })
}

/// Decisions are awaited one at a time, so a single-threaded runtime is enough.
pub(crate) fn runtime() -> Result<Runtime, CliError> {
    Ok(Builder::new_current_thread().enable_time().build()?)
}
