use async_trait::async_trait;
use holdem_engine::game::TableState;
use holdem_engine::player::SeatId;
use tracing::debug;

use crate::prompt::{SYSTEM_PROMPT, parse_reply, render_prompt};
use crate::{Decision, DecisionPolicy, PolicyError};

/// A text-completion backend, e.g. a hosted chat model.
///
/// No implementation ships with this crate; hosts inject their own.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, PolicyError>;
}

/// Policy that asks a [`CompletionClient`] and parses its reply.
pub struct ModelPolicy<C> {
    client: C,
    name: String,
}

impl<C: CompletionClient> ModelPolicy<C> {
    pub fn new(client: C, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

#[async_trait]
impl<C: CompletionClient> DecisionPolicy for ModelPolicy<C> {
    async fn decide(&self, state: &TableState, seat: SeatId) -> Result<Decision, PolicyError> {
        let prompt = render_prompt(state, seat);
        let reply = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        debug!(policy = %self.name, seat, reply = %reply, "model replied");
        parse_reply(&reply)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
