//! Server leaderboard built from settled bets

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::ScoredOutcome;

/// A scored bet attributed to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettledBet {
    pub user_id: String,
    pub outcome: ScoredOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakMark {
    Win,
    Loss,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsConfig {
    /// Bets a user needs before appearing in the ranking
    pub minimum_bets: u32,
    /// How many recent results to keep per user
    pub streak_length: usize,
}

impl Default for StandingsConfig {
    fn default() -> Self {
        Self {
            minimum_bets: 5,
            streak_length: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based rank, 0 while the user is unranked
    pub position: u32,
    pub user_id: String,
    pub points: u64,
    pub total_bets: u32,
    pub won_bets: u32,
    pub partial_bets: u32,
    /// Percentage of full successes, 0-100
    pub win_rate: u32,
    /// Oldest first
    pub streak: Vec<StreakMark>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub ranked: Vec<LeaderboardEntry>,
    /// Users below the minimum bet count
    pub unranked: Vec<LeaderboardEntry>,
}

#[derive(Default)]
struct Tally {
    points: u64,
    total: u32,
    won: u32,
    partial: u32,
    marks: Vec<StreakMark>,
}

impl Standings {
    /// Aggregate bets, given in settlement order, into a ranking.
    ///
    /// Only full successes count as wins. Partial successes keep their points
    /// but count as losses for win rate and streak. Ties on points are broken
    /// by win rate, then by user id.
    pub fn from_settled<'a, I>(bets: I, config: &StandingsConfig) -> Self
    where
        I: IntoIterator<Item = &'a SettledBet>,
    {
        let mut tallies: HashMap<&str, Tally> = HashMap::new();
        for bet in bets {
            let tally = tallies.entry(bet.user_id.as_str()).or_default();
            tally.points += u64::from(bet.outcome.points);
            tally.total += 1;
            if bet.outcome.success {
                tally.won += 1;
                tally.marks.push(StreakMark::Win);
            } else {
                if bet.outcome.partial_success.is_some() {
                    tally.partial += 1;
                }
                tally.marks.push(StreakMark::Loss);
            }
        }

        let (ranked, unranked): (Vec<_>, Vec<_>) = tallies
            .into_iter()
            .map(|(user_id, tally)| to_entry(user_id, tally, config.streak_length))
            .partition(|entry| entry.total_bets >= config.minimum_bets);

        let ranked = ranked
            .into_iter()
            .sorted_by(|a, b| {
                b.points
                    .cmp(&a.points)
                    .then(b.win_rate.cmp(&a.win_rate))
                    .then_with(|| a.user_id.cmp(&b.user_id))
            })
            .enumerate()
            .map(|(index, entry)| LeaderboardEntry {
                position: index as u32 + 1,
                ..entry
            })
            .collect();

        let unranked = unranked
            .into_iter()
            .sorted_by(|a, b| a.user_id.cmp(&b.user_id))
            .collect();

        Self { ranked, unranked }
    }
}

fn to_entry(user_id: &str, tally: Tally, streak_length: usize) -> LeaderboardEntry {
    let win_rate = if tally.total == 0 {
        0
    } else {
        (f64::from(tally.won) * 100.0 / f64::from(tally.total)).round() as u32
    };
    let skip = tally.marks.len().saturating_sub(streak_length);

    LeaderboardEntry {
        position: 0,
        user_id: user_id.to_string(),
        points: tally.points,
        total_bets: tally.total,
        won_bets: tally.won,
        partial_bets: tally.partial,
        win_rate,
        streak: tally.marks.into_iter().skip(skip).collect(),
    }
}
