//! Human readable rendering of bets

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{get_bet_type_by_id, BetSubmission, BetType};

/// Extra data needed to render some bets, e.g. player names for scorer bets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayContext {
    /// Name of the player the bet is about, takes precedence over `players`
    #[serde(default)]
    pub player_name: Option<String>,
    /// Player id to player name
    #[serde(default)]
    pub players: HashMap<String, String>,
}

/// Render a bet as "{bet type name}: {value}".
///
/// Works on the raw value and never fails: unknown types render the value as
/// is, and unexpected values of known types pass through unformatted.
pub fn format_bet_for_display(submission: &BetSubmission, extra: &DisplayContext) -> String {
    let Some(descriptor) = get_bet_type_by_id(&submission.bet_type) else {
        return submission.value.clone();
    };
    let value = submission.value.as_str();

    let formatted = match descriptor.bet_type {
        BetType::MatchResult => match value {
            "home" => "1 (Victoria Local)".to_string(),
            "draw" => "X (Empate)".to_string(),
            "away" => "2 (Victoria Visitante)".to_string(),
            other => other.to_string(),
        },
        BetType::CorrectMinute => format!("{value}'"),
        BetType::BothTeamsScore => {
            if value == "yes" {
                "Sí".to_string()
            } else {
                "No".to_string()
            }
        }
        BetType::Scorer | BetType::FirstScorer => extra
            .player_name
            .as_deref()
            .or_else(|| extra.players.get(value).map(String::as_str))
            .unwrap_or(value)
            .to_string(),
        BetType::ExactScore | BetType::TotalGoals | BetType::ScoreAtHalf => value.to_string(),
    };

    format!("{}: {}", descriptor.name, formatted)
}
