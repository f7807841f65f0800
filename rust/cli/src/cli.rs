//! Command-line argument types.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "holdem",
    version,
    about = "Multi-seat Texas Hold'em at the terminal"
)]
pub struct HoldemCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play hands against baseline bots from seat 0
    Play {
        /// Number of seats at the table, you included
        #[arg(long, value_parser = clap::value_parser!(u8).range(2..=8))]
        seats: Option<u8>,
        #[arg(long, default_value_t = 1)]
        hands: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Starting stack for every seat
        #[arg(long)]
        stack: Option<u32>,
    },
    /// Play automated hands and optionally record them as JSONL
    Sim {
        #[arg(long)]
        hands: u32,
        #[arg(long, value_parser = clap::value_parser!(u8).range(2..=8))]
        seats: Option<u8>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the resolved configuration and where each value came from
    Cfg,
}
