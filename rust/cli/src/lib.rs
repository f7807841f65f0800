//! # holdem CLI Library
//!
//! Terminal front end for the holdem engine.
//!
//! ## Main Entry Point
//!
//! [`run`] parses command-line arguments, resolves the layered
//! configuration, and executes the subcommand. The `holdem` binary is a thin
//! wrapper that installs logging and calls it with the process streams.
//!
//! ## Available Subcommands
//!
//! - `play`: Play hands from seat 0 against baseline bots
//! - `sim`: Play automated hands, optionally writing a JSONL hand history
//! - `cfg`: Display the resolved configuration and each value's source
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["holdem", "sim", "--hands", "100", "--seed", "7"];
//! let code = holdem_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
mod macros;
pub mod ui;
pub mod validation;

use cli::{Commands, HoldemCli};
use commands::{
    PlayOptions, SimOptions, handle_cfg_command, handle_play_command, handle_sim_command,
};

pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Returns the process exit code: [`exit_code::SUCCESS`],
/// [`exit_code::ERROR`], or [`exit_code::INTERRUPTED`] when play input ends
/// in the middle of a hand.
///
/// ```
/// use std::io;
/// let args = vec!["holdem", "--help"];
/// let mut out = Vec::new();
/// let code = holdem_cli::run(args, &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().contains("sim"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    const COMMANDS: &[&str] = &["play", "sim", "cfg"];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match HoldemCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "Usage: holdem <command> [options]\n");
                    write_or_exit!(err, "Commands:");
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: holdem --help");
                    exit_code::ERROR
                }
            };
        }
    };

    let resolved = match config::load_with_sources() {
        Ok(resolved) => resolved,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            return exit_code::ERROR;
        }
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(&resolved, out),
        Commands::Play {
            seats,
            hands,
            seed,
            stack,
        } => {
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            let opts = PlayOptions {
                seats: seats.map(usize::from),
                hands,
                seed,
                stack,
            };
            handle_play_command(opts, &resolved.config, out, err, &mut stdin_lock)
        }
        Commands::Sim {
            hands,
            seats,
            seed,
            output,
        } => {
            let opts = SimOptions {
                hands,
                seats: seats.map(usize::from),
                seed,
                output,
            };
            handle_sim_command(opts, &resolved.config, out, err)
        }
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e @ CliError::Interrupted(_)) => {
            write_or_exit!(err, "{}", e);
            exit_code::INTERRUPTED
        }
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}
