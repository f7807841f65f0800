//! # holdem-ai: Decision Policies for Automated Seats
//!
//! Automated seats are driven by a [`DecisionPolicy`]: given a table
//! snapshot and a seat, it returns a [`Decision`] some time later, or fails.
//! The [`driver::HandDriver`] asks policies for decisions, recovers from
//! their failures with a deterministic local policy, coerces the answer
//! into a legal action, and publishes every new snapshot to a
//! [`TableObserver`].
//!
//! ## Core Components
//!
//! - [`DecisionPolicy`] - Async interface for choosing an action
//! - [`baseline`] - Deterministic hand-strength policy and the conservative fallback
//! - [`coerce`] - Turns any decision into a legal action
//! - [`model`] - Policy backed by an injected text-completion client
//! - [`prompt`] - Prompt rendering and reply parsing for that client
//! - [`driver`] - Async hand driver with pacing and timeouts
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_ai::{DecisionPolicy, create_policy};
//!
//! let policy = create_policy("baseline").expect("known policy");
//! assert_eq!(policy.name(), "BaselinePolicy");
//! assert!(create_policy("oracle").is_none());
//! ```

use std::time::Duration;

use async_trait::async_trait;
use holdem_engine::game::{Phase, TableState};
use holdem_engine::player::{PlayerAction, SeatId};
use thiserror::Error;

pub mod baseline;
pub mod coerce;
pub mod driver;
pub mod model;
pub mod prompt;

/// What a policy wants to do, with an optional explanation for observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: PlayerAction,
    pub rationale: Option<String>,
}

impl Decision {
    pub fn new(action: PlayerAction, rationale: impl Into<String>) -> Self {
        Self {
            action,
            rationale: Some(rationale.into()),
        }
    }
}

/// Ways a policy can fail to produce a usable decision. The driver recovers
/// from all of them; none reaches an observer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Decision request failed: {0}")]
    Transport(String),
    #[error("Decision timed out after {0:?}")]
    Timeout(Duration),
    #[error("Unparseable decision: {0}")]
    Unparseable(String),
    #[error("Implausible decision: {0}")]
    Implausible(String),
}

/// Chooses actions for automated seats.
///
/// Implementations see the full snapshot, including other seats' hole
/// cards; fair policies only read the acting seat's own cards.
///
/// # Example Implementation
///
/// ```rust
/// use async_trait::async_trait;
/// use holdem_ai::{Decision, DecisionPolicy, PolicyError};
/// use holdem_engine::game::TableState;
/// use holdem_engine::player::{PlayerAction, SeatId};
///
/// struct AlwaysCall;
///
/// #[async_trait]
/// impl DecisionPolicy for AlwaysCall {
///     async fn decide(&self, _state: &TableState, _seat: SeatId) -> Result<Decision, PolicyError> {
///         Ok(Decision::new(PlayerAction::Call, "calling station"))
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysCall"
///     }
/// }
/// ```
#[async_trait]
pub trait DecisionPolicy: Send + Sync {
    async fn decide(&self, state: &TableState, seat: SeatId) -> Result<Decision, PolicyError>;

    fn name(&self) -> &str;
}

/// Receives every snapshot the driver produces, in order.
pub trait TableObserver {
    fn on_snapshot(&mut self, state: &TableState);

    /// Called before the snapshot that results from `action`.
    fn on_action(&mut self, _seat: SeatId, _phase: Phase, _action: PlayerAction) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TableObserver for NullObserver {
    fn on_snapshot(&mut self, _state: &TableState) {}
}

/// Builds a local policy by name: `"baseline"` or `"fallback"`.
///
/// Model-backed policies need a client and are built with
/// [`model::ModelPolicy::new`] instead.
pub fn create_policy(kind: &str) -> Option<Box<dyn DecisionPolicy>> {
    match kind {
        "baseline" => Some(Box::new(baseline::BaselinePolicy::new())),
        "fallback" => Some(Box::new(baseline::FallbackPolicy)),
        _ => None,
    }
}
