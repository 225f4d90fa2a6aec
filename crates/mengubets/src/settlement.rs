//! Settlement of finished matches
//!
//! A match file holds the authoritative report for one match and every bet
//! placed on it. Settling scores each bet with the server's multiplier and
//! ranks the users across all settled matches.

use std::{collections::HashMap, fs, path::Path};

use log::{debug, info, warn};
use mengubets_core::{
    calculate_bet_result, format_bet_for_display, server_multiplier, BetSubmission, BetType,
    CoreError, DisplayContext, MatchReport, ScoredOutcome, SettledBet, Standings,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ScoringSettings;

#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("failed to read match file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse match file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("match {match_id} on server {server_id}: {source}")]
    Multiplier {
        match_id: String,
        server_id: String,
        #[source]
        source: CoreError,
    },
}

/// One match and the bets placed on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchFile {
    pub match_id: String,
    /// Discord server the bets were placed in
    pub server_id: String,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    pub report: MatchReport,
    /// Player id to display name
    #[serde(default)]
    pub players: HashMap<String, String>,
    #[serde(default)]
    pub bets: Vec<PlacedBet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedBet {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub submission: BetSubmission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetOutcome {
    pub bet_id: String,
    pub user_id: String,
    pub bet_type: BetType,
    pub display: String,
    pub outcome: ScoredOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedBet {
    pub bet_id: String,
    pub user_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSettlement {
    pub match_id: String,
    pub server_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team: Option<String>,
    pub server_multiplier: f64,
    pub outcomes: Vec<BetOutcome>,
    pub rejected: Vec<RejectedBet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub matches: Vec<MatchSettlement>,
    pub standings: Standings,
}

pub fn load_match_file(path: &Path) -> Result<MatchFile, SettlementError> {
    let content = fs::read_to_string(path).map_err(|source| SettlementError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SettlementError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Score every bet of a match.
///
/// Bets that cannot be scored (unknown type, invalid value, nothing in the
/// report to score them against) are rejected individually; the rest of the
/// match still settles.
pub fn settle_match(
    match_file: &MatchFile,
    scoring: &ScoringSettings,
) -> Result<MatchSettlement, SettlementError> {
    let multiplier = server_multiplier(Some(scoring.multiplier_for(&match_file.server_id)))
        .map_err(|source| SettlementError::Multiplier {
            match_id: match_file.match_id.clone(),
            server_id: match_file.server_id.clone(),
            source,
        })?;

    info!(
        "Settling match {} ({} vs {}) on server {}: {} bets, multiplier {}",
        match_file.match_id,
        match_file.home_team.as_deref().unwrap_or("?"),
        match_file.away_team.as_deref().unwrap_or("?"),
        match_file.server_id,
        match_file.bets.len(),
        multiplier
    );

    let display_context = DisplayContext {
        player_name: None,
        players: match_file.players.clone(),
    };

    let mut outcomes = Vec::with_capacity(match_file.bets.len());
    let mut rejected = Vec::new();

    for bet in &match_file.bets {
        match score_bet(bet, &match_file.report, multiplier) {
            Ok((bet_type, outcome)) => {
                debug!(
                    "Bet {} by {} scored {} points: {}",
                    bet.id, bet.user_id, outcome.points, outcome.explanation
                );
                outcomes.push(BetOutcome {
                    bet_id: bet.id.clone(),
                    user_id: bet.user_id.clone(),
                    bet_type,
                    display: format_bet_for_display(&bet.submission, &display_context),
                    outcome,
                });
            }
            Err(e) => {
                warn!(
                    "Rejecting bet {} by {} on match {}: {}",
                    bet.id, bet.user_id, match_file.match_id, e
                );
                rejected.push(RejectedBet {
                    bet_id: bet.id.clone(),
                    user_id: bet.user_id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(MatchSettlement {
        match_id: match_file.match_id.clone(),
        server_id: match_file.server_id.clone(),
        home_team: match_file.home_team.clone(),
        away_team: match_file.away_team.clone(),
        server_multiplier: multiplier,
        outcomes,
        rejected,
    })
}

fn score_bet(
    bet: &PlacedBet,
    report: &MatchReport,
    multiplier: f64,
) -> Result<(BetType, ScoredOutcome), CoreError> {
    let bet_type: BetType = bet.submission.bet_type.parse()?;
    let result = report.result_for(bet_type)?;
    // The server's configured multiplier wins over whatever the client sent
    let submission = bet.submission.clone().with_server_multiplier(multiplier);
    let outcome = calculate_bet_result(&submission, &result)?;
    Ok((bet_type, outcome))
}

/// Settle matches in order and rank users over all of them.
pub fn settle_matches(
    match_files: &[MatchFile],
    scoring: &ScoringSettings,
) -> Result<Settlement, SettlementError> {
    let matches = match_files
        .iter()
        .map(|match_file| settle_match(match_file, scoring))
        .collect::<Result<Vec<_>, _>>()?;

    let settled: Vec<SettledBet> = matches
        .iter()
        .flat_map(|settlement| settlement.outcomes.iter())
        .map(|outcome| SettledBet {
            user_id: outcome.user_id.clone(),
            outcome: outcome.outcome.clone(),
        })
        .collect();
    let standings = Standings::from_settled(&settled, &scoring.standings_config());

    info!(
        "Settled {} matches: {} ranked users, {} unranked",
        matches.len(),
        standings.ranked.len(),
        standings.unranked.len()
    );

    Ok(Settlement { matches, standings })
}
