//! Configuration command handler.
//!
//! Prints every setting with the layer it came from:
//!
//! ```json
//! {
//!   "seats": {
//!     "value": 8,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config::ConfigResolved;
use crate::error::CliError;
use std::io::Write;

pub fn handle_cfg_command(resolved: &ConfigResolved, out: &mut dyn Write) -> Result<(), CliError> {
    let ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "seats": {
            "value": config.seats,
            "source": sources.seats,
        },
        "starting_stack": {
            "value": config.starting_stack,
            "source": sources.starting_stack,
        },
        "small_blind": {
            "value": config.small_blind,
            "source": sources.small_blind,
        },
        "big_blind": {
            "value": config.big_blind,
            "source": sources.big_blind,
        },
        "ai_delay_ms": {
            "value": config.ai_delay_ms,
            "source": sources.ai_delay_ms,
        },
        "ai_timeout_ms": {
            "value": config.ai_timeout_ms,
            "source": sources.ai_timeout_ms,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
