//! Parsing of what the player types at the action prompt.

use holdem_engine::player::PlayerAction;

/// Outcome of parsing one line of player input.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Action(PlayerAction),
    /// `q` or `quit`
    Quit,
    /// Unusable input, with a message for the player
    Invalid(String),
}

/// Parses a prompt line into an action (case-insensitive).
///
/// - `f`, `fold`
/// - `k`, `check`
/// - `c`, `call`
/// - `r N`, `raise N` where N is the increment over the current bet
/// - `a`, `allin`, `all-in`
/// - `q`, `quit`
///
/// Whether the action is legal is left to the engine.
///
/// ```rust
/// # use holdem_cli::validation::{ParseResult, parse_player_action};
/// use holdem_engine::player::PlayerAction;
///
/// assert_eq!(parse_player_action("fold"), ParseResult::Action(PlayerAction::Fold));
/// assert_eq!(parse_player_action("raise 100"), ParseResult::Action(PlayerAction::Raise(100)));
/// assert_eq!(parse_player_action("q"), ParseResult::Quit);
///
/// match parse_player_action("bet 100") {
///     ParseResult::Invalid(msg) => assert!(msg.contains("Unrecognized")),
///     _ => panic!("Expected Invalid"),
/// }
/// ```
pub fn parse_player_action(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&command) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match command {
        "q" | "quit" => ParseResult::Quit,
        "f" | "fold" => ParseResult::Action(PlayerAction::Fold),
        "k" | "check" => ParseResult::Action(PlayerAction::Check),
        "c" | "call" => ParseResult::Action(PlayerAction::Call),
        "a" | "allin" | "all-in" => ParseResult::Action(PlayerAction::AllIn),
        "r" | "raise" => {
            let Some(amount) = parts.get(1) else {
                return ParseResult::Invalid(
                    "Raise requires an amount (e.g., 'raise 50')".to_string(),
                );
            };
            match amount.parse::<u32>() {
                Ok(amount) if amount > 0 => ParseResult::Action(PlayerAction::Raise(amount)),
                Ok(_) => ParseResult::Invalid("Raise amount must be positive".to_string()),
                Err(_) => ParseResult::Invalid("Invalid raise amount".to_string()),
            }
        }
        other => ParseResult::Invalid(format!(
            "Unrecognized action '{}'. Valid actions: fold, check, call, raise <amount>, allin, q",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_forms() {
        assert_eq!(parse_player_action("F"), ParseResult::Action(PlayerAction::Fold));
        assert_eq!(parse_player_action("k"), ParseResult::Action(PlayerAction::Check));
        assert_eq!(parse_player_action(" c "), ParseResult::Action(PlayerAction::Call));
        assert_eq!(parse_player_action("r 75"), ParseResult::Action(PlayerAction::Raise(75)));
        assert_eq!(parse_player_action("ALL-IN"), ParseResult::Action(PlayerAction::AllIn));
        assert_eq!(parse_player_action("quit"), ParseResult::Quit);
    }

    #[test]
    fn raise_amount_problems() {
        for input in ["raise", "raise 0", "raise -5", "raise lots"] {
            assert!(
                matches!(parse_player_action(input), ParseResult::Invalid(_)),
                "{input}"
            );
        }
    }

    #[test]
    fn empty_input_is_invalid() {
        assert_eq!(
            parse_player_action("   "),
            ParseResult::Invalid("Empty input".to_string())
        );
    }
}
