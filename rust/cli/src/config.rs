//! Layered CLI configuration: defaults, then a TOML file named by
//! `HOLDEM_CONFIG`, then `HOLDEM_*` environment variables.

use std::time::Duration;

use holdem_ai::driver::DriverConfig;
use holdem_engine::errors::GameError;
use holdem_engine::game::{MAX_SEATS, MIN_SEATS, TableConfig};
use serde::{Deserialize, Serialize};

use crate::io_utils::read_text;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub seats: usize,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub ai_delay_ms: u64,
    pub ai_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            seats: MAX_SEATS,
            starting_stack: 2000,
            small_blind: 25,
            big_blind: 50,
            ai_delay_ms: 600,
            ai_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Blinds as the engine sees them; the minimum bet is one big blind.
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            min_bet: self.big_blind,
        }
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            min_delay: Duration::from_millis(self.ai_delay_ms),
            decision_timeout: Duration::from_millis(self.ai_timeout_ms),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.seats) {
            return Err(ConfigError::Invalid(format!(
                "seats must be between {MIN_SEATS} and {MAX_SEATS}, got {}",
                self.seats
            )));
        }
        if self.starting_stack == 0 {
            return Err(ConfigError::Invalid("starting_stack must be >0".into()));
        }
        let total = u32::try_from(self.seats)
            .ok()
            .and_then(|seats| seats.checked_mul(self.starting_stack));
        if total.is_none() {
            return Err(ConfigError::Invalid(format!(
                "{} seats of {} chips exceed {} total chips",
                self.seats,
                self.starting_stack,
                u32::MAX
            )));
        }
        if self.ai_timeout_ms == 0 {
            return Err(ConfigError::Invalid("ai_timeout_ms must be >0".into()));
        }
        self.table_config().validate().map_err(|e| match e {
            GameError::InvalidConfig(msg) => ConfigError::Invalid(msg),
            other => ConfigError::Invalid(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub seats: ValueSource,
    pub starting_stack: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub ai_delay_ms: ValueSource,
    pub ai_timeout_ms: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            seats: ValueSource::Default,
            starting_stack: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            ai_delay_ms: ValueSource::Default,
            ai_timeout_ms: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    seats: Option<usize>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    ai_delay_ms: Option<u64>,
    #[serde(default)]
    ai_timeout_ms: Option<u64>,
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("HOLDEM_CONFIG")
        && !path.is_empty()
    {
        let f: FileConfig = toml::from_str(&read_text(&path)?)?;
        macro_rules! from_file {
            ($field:ident) => {
                if let Some(v) = f.$field {
                    cfg.$field = v;
                    sources.$field = ValueSource::File;
                }
            };
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        from_file!(seats);
        from_file!(starting_stack);
        from_file!(small_blind);
        from_file!(big_blind);
        from_file!(ai_delay_ms);
        from_file!(ai_timeout_ms);
    }

    if let Some(seed) = env_value::<u64>("HOLDEM_SEED")? {
        cfg.seed = Some(seed);
        sources.seed = ValueSource::Env;
    }
    macro_rules! from_env {
        ($field:ident, $var:literal) => {
            if let Some(v) = env_value($var)? {
                cfg.$field = v;
                sources.$field = ValueSource::Env;
            }
        };
    }
    from_env!(seats, "HOLDEM_SEATS");
    from_env!(starting_stack, "HOLDEM_STARTING_STACK");
    from_env!(small_blind, "HOLDEM_SMALL_BLIND");
    from_env!(big_blind, "HOLDEM_BIG_BLIND");
    from_env!(ai_delay_ms, "HOLDEM_AI_DELAY_MS");
    from_env!(ai_timeout_ms, "HOLDEM_AI_TIMEOUT_MS");

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

/// Reads and parses `var`; unset and empty both mean "not given".
fn env_value<T: std::str::FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{var}={raw:?} is not a valid value"))),
        _ => Ok(None),
    }
}
