//! Async loop that plays automated seats until a person must act.

use std::collections::BTreeMap;
use std::time::Duration;

use holdem_engine::engine::apply_action;
use holdem_engine::errors::GameError;
use holdem_engine::game::TableState;
use holdem_engine::player::{PlayerAction, SeatId};
use tokio::time::{Instant, sleep, timeout};

use crate::baseline::FallbackPolicy;
use crate::coerce::coerce;
use crate::{Decision, DecisionPolicy, PolicyError, TableObserver};

/// Pacing and patience for automated decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Every automated decision takes at least this long.
    pub min_delay: Duration,
    /// A policy that has not answered by then is replaced by the fallback.
    pub decision_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(600),
            decision_timeout: Duration::from_secs(10),
        }
    }
}

impl DriverConfig {
    /// No pacing, for simulations and tests.
    pub fn instant() -> Self {
        Self {
            min_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Why the driver handed control back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// A seat without a policy must act.
    Human(SeatId),
    /// No seat can act: the hand is over.
    HandOver,
}

/// Solicits decisions for automated seats, one at a time.
///
/// Seats with a registered policy are automated; any other seat is treated
/// as a person and returned to the caller as [`Pause::Human`]. At most one
/// decision is in flight, so a round never sees concurrent actions.
pub struct HandDriver {
    config: DriverConfig,
    policies: BTreeMap<SeatId, Box<dyn DecisionPolicy>>,
    fallback: FallbackPolicy,
}

impl HandDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            policies: BTreeMap::new(),
            fallback: FallbackPolicy,
        }
    }

    pub fn with_policy(mut self, seat: SeatId, policy: Box<dyn DecisionPolicy>) -> Self {
        self.policies.insert(seat, policy);
        self
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn is_automated(&self, seat: SeatId) -> bool {
        self.policies.contains_key(&seat)
    }

    /// Applies `action` for `seat` and publishes the result.
    ///
    /// Illegal actions are returned as errors and nothing is published, so
    /// the caller can re-prompt.
    pub fn submit(
        &self,
        state: &TableState,
        seat: SeatId,
        action: PlayerAction,
        observer: &mut dyn TableObserver,
    ) -> Result<TableState, GameError> {
        let phase = state.phase();
        let next = apply_action(state, seat, action)?;
        observer.on_action(seat, phase, action);
        observer.on_snapshot(&next);
        Ok(next)
    }

    /// Asks `seat`'s policy for a legal action.
    ///
    /// Never fails: policy errors, timeouts and implausible answers fall back
    /// to [`FallbackPolicy`], and the result is always coerced to a legal
    /// action. The call lasts at least `min_delay`.
    pub async fn decide(&self, state: &TableState, seat: SeatId) -> Decision {
        let started = Instant::now();
        let outcome = match self.policies.get(&seat) {
            Some(policy) => match timeout(self.config.decision_timeout, policy.decide(state, seat)).await {
                Ok(result) => result,
                Err(_) => Err(PolicyError::Timeout(self.config.decision_timeout)),
            },
            None => Err(PolicyError::Transport(format!("no policy for seat {seat}"))),
        };

        let decision = match outcome {
            Ok(decision) => decision,
            Err(error) => {
                tracing::warn!(
                    hand = state.hand_number(),
                    seat,
                    error = %error,
                    "policy failed, using fallback"
                );
                self.fallback.choose(state, seat)
            }
        };

        let (action, changed) = coerce(state, seat, decision.action);
        if changed {
            tracing::debug!(
                seat,
                requested = %decision.action,
                coerced = %action,
                "decision coerced to a legal action"
            );
        }

        let elapsed = started.elapsed();
        if elapsed < self.config.min_delay {
            sleep(self.config.min_delay - elapsed).await;
        }

        Decision {
            action,
            rationale: decision.rationale,
        }
    }

    /// Plays automated seats until a person must act or the hand ends.
    pub async fn run_until_pause(
        &self,
        mut state: TableState,
        observer: &mut dyn TableObserver,
    ) -> Result<(TableState, Pause), GameError> {
        loop {
            let Some(seat) = state.current_seat() else {
                return Ok((state, Pause::HandOver));
            };
            if !self.is_automated(seat) {
                return Ok((state, Pause::Human(seat)));
            }

            let decision = self.decide(&state, seat).await;
            tracing::debug!(
                hand = state.hand_number(),
                seat,
                action = %decision.action,
                "automated seat acts"
            );
            let annotated = state.with_rationale(seat, decision.rationale);
            state = self.submit(&annotated, seat, decision.action, observer).inspect_err(|e| {
                tracing::error!(seat, error = %e, "coerced action rejected");
            })?;
        }
    }
}
