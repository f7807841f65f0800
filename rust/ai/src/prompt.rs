//! Text protocol between the table and a completion model.

use std::fmt;

use holdem_engine::cards::Card;
use holdem_engine::game::TableState;
use holdem_engine::player::{PlayerAction, Seat, SeatId};
use serde::Deserialize;

use crate::{Decision, PolicyError};

/// Instruction sent alongside every prompt.
pub const SYSTEM_PROMPT: &str =
    "You are a poker AI assistant. Always respond with valid JSON only, no markdown or extra text.";

fn card_list(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "None".to_string();
    }
    cards.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}

/// Describes the table from `seat`'s point of view. Other seats' hole cards
/// are never included.
pub fn render_prompt(state: &TableState, seat: SeatId) -> String {
    state
        .seat(seat)
        .map(|me| PromptView { state, me }.to_string())
        .unwrap_or_default()
}

struct PromptView<'a> {
    state: &'a TableState,
    me: &'a Seat,
}

impl fmt::Display for PromptView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { state, me } = *self;
        let active: Vec<&Seat> = state.seats().iter().filter(|s| s.in_hand()).collect();
        let position = active.iter().position(|s| s.id == me.id).unwrap_or(0) + 1;

        writeln!(
            f,
            "You are playing Texas Hold'em Poker at a table with {} players.",
            state.seats().len()
        )?;
        writeln!(f, "You are {}.", me.name)?;
        writeln!(f)?;
        writeln!(f, "Current Game State:")?;
        writeln!(f, "- Phase: {}", state.phase())?;
        writeln!(f, "- Pot Size: {}", state.pot())?;
        writeln!(f, "- Community Cards: {}", card_list(state.community_cards()))?;
        writeln!(f, "- Your Hand: {}", card_list(&me.hole_cards))?;
        writeln!(f, "- Your Chips: {}", me.stack)?;
        writeln!(f, "- Cost to Call: {}", state.to_call(me.id))?;
        writeln!(f, "- Minimum Raise: {}", state.min_raise())?;
        writeln!(f, "- Players Active: {} / {}", active.len(), state.seats().len())?;
        writeln!(f, "- Your Position: {} of {} active players", position, active.len())?;
        writeln!(f)?;
        writeln!(f, "Opponent Summary (Active):")?;
        for opp in active.iter().filter(|s| s.id != me.id) {
            let last = opp.last_action.map(|a| a.label()).unwrap_or("None");
            writeln!(
                f,
                "- {}: Stack {}, Bet {}, Last Action: {}",
                opp.name, opp.stack, opp.current_bet, last
            )?;
        }
        writeln!(f)?;
        f.write_str(
            "Decide your move:\n\
             1. FOLD: If chances are low or bet is too high.\n\
             2. CHECK: If cost to call is 0.\n\
             3. CALL: To match the highest bet.\n\
             4. RAISE: To increase the stakes (specify amount).\n\n\
             Return ONLY a JSON object with this exact format, no other text:\n\
             {\"action\": \"FOLD|CHECK|CALL|RAISE\", \"amount\": number_or_null, \"reasoning\": \"brief explanation\"}\n",
        )
    }
}

#[derive(Debug, Deserialize)]
struct Reply {
    action: String,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Strips an optional Markdown code fence around a reply.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses a model reply into a [`Decision`].
///
/// The action is not checked against the table; the driver coerces it.
///
/// ```
/// use holdem_ai::prompt::parse_reply;
/// use holdem_engine::player::PlayerAction;
///
/// let d = parse_reply("```json\n{\"action\":\"raise\",\"amount\":120,\"reasoning\":\"top pair\"}\n```").unwrap();
/// assert_eq!(d.action, PlayerAction::Raise(120));
/// assert_eq!(d.rationale.as_deref(), Some("top pair"));
/// ```
pub fn parse_reply(text: &str) -> Result<Decision, PolicyError> {
    let body = strip_fences(text);
    let reply: Reply =
        serde_json::from_str(body).map_err(|e| PolicyError::Unparseable(e.to_string()))?;

    let action = match reply.action.trim().to_ascii_uppercase().as_str() {
        "FOLD" => PlayerAction::Fold,
        "CHECK" => PlayerAction::Check,
        "CALL" => PlayerAction::Call,
        "ALLIN" | "ALL-IN" | "ALL_IN" => PlayerAction::AllIn,
        "RAISE" => {
            let amount = reply.amount.unwrap_or(0.0);
            if !amount.is_finite() || amount < 0.0 {
                return Err(PolicyError::Implausible(format!("raise amount {amount}")));
            }
            PlayerAction::Raise(amount.round().min(u32::MAX as f64) as u32)
        }
        other => return Err(PolicyError::Unparseable(format!("unknown action {other:?}"))),
    };

    Ok(Decision {
        action,
        rationale: Some(
            reply
                .reasoning
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "Strategic play".to_string()),
        ),
    })
}
