//! Shared types between the CLI and the WASM client

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Every prediction format a server can offer on a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    ExactScore,
    MatchResult,
    TotalGoals,
    Scorer,
    CorrectMinute,
    FirstScorer,
    ScoreAtHalf,
    BothTeamsScore,
}

impl BetType {
    pub const ALL: [BetType; 8] = [
        BetType::ExactScore,
        BetType::MatchResult,
        BetType::TotalGoals,
        BetType::Scorer,
        BetType::CorrectMinute,
        BetType::FirstScorer,
        BetType::ScoreAtHalf,
        BetType::BothTeamsScore,
    ];

    /// Canonical lowercase token, also the serialized form
    pub fn id(self) -> &'static str {
        match self {
            BetType::ExactScore => "exact_score",
            BetType::MatchResult => "match_result",
            BetType::TotalGoals => "total_goals",
            BetType::Scorer => "scorer",
            BetType::CorrectMinute => "correct_minute",
            BetType::FirstScorer => "first_scorer",
            BetType::ScoreAtHalf => "score_at_half",
            BetType::BothTeamsScore => "both_teams_score",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Who a scoreline favours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Home,
    Draw,
    Away,
}

/// A "H-A" scoreline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Parse `^\d+-\d+$`. Returns `None` for anything else, including sides
    /// too large to count.
    pub fn parse(value: &str) -> Option<Self> {
        let (home, away) = value.split_once('-')?;
        Some(Self {
            home: parse_digits(home)?,
            away: parse_digits(away)?,
        })
    }

    pub fn direction(&self) -> Direction {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Direction::Home,
            std::cmp::Ordering::Less => Direction::Away,
            std::cmp::Ordering::Equal => Direction::Draw,
        }
    }

    pub fn total_goals(&self) -> u64 {
        u64::from(self.home) + u64::from(self.away)
    }

    pub fn both_scored(&self) -> bool {
        self.home > 0 && self.away > 0
    }
}

fn parse_digits(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

impl TryFrom<String> for Score {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Score::parse(&value)
            .ok_or_else(|| CoreError::MalformedResult(format!("invalid score: {value}")))
    }
}

impl From<Score> for String {
    fn from(score: Score) -> Self {
        score.to_string()
    }
}

/// Side of a total goals line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalSide {
    Over,
    Under,
}

/// A parsed "Over 2.5" / "Under 3" line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalLine {
    pub side: GoalSide,
    pub threshold: f64,
    /// Threshold as the user typed it, kept for explanations
    pub threshold_text: String,
}

impl fmt::Display for GoalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            GoalSide::Over => "Over",
            GoalSide::Under => "Under",
        };
        write!(f, "{} {}", side, self.threshold_text)
    }
}

/// A validated prediction, one variant per bet type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Prediction {
    ExactScore(Score),
    MatchResult(Direction),
    TotalGoals(GoalLine),
    Scorer(String),
    CorrectMinute(u8),
    FirstScorer(String),
    ScoreAtHalf(Score),
    BothTeamsScore(bool),
}

impl Prediction {
    pub fn bet_type(&self) -> BetType {
        match self {
            Prediction::ExactScore(_) => BetType::ExactScore,
            Prediction::MatchResult(_) => BetType::MatchResult,
            Prediction::TotalGoals(_) => BetType::TotalGoals,
            Prediction::Scorer(_) => BetType::Scorer,
            Prediction::CorrectMinute(_) => BetType::CorrectMinute,
            Prediction::FirstScorer(_) => BetType::FirstScorer,
            Prediction::ScoreAtHalf(_) => BetType::ScoreAtHalf,
            Prediction::BothTeamsScore(_) => BetType::BothTeamsScore,
        }
    }
}

/// A bet as entered by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetSubmission {
    /// Bet type token, matched case-insensitively
    #[serde(rename = "type")]
    pub bet_type: String,
    pub value: String,
    /// Free text, never validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Server scoring multiplier, 1 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_multiplier: Option<f64>,
}

impl BetSubmission {
    pub fn new(bet_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            bet_type: bet_type.into(),
            value: value.into(),
            note: None,
            server_multiplier: None,
        }
    }

    pub fn with_server_multiplier(mut self, multiplier: f64) -> Self {
        self.server_multiplier = Some(multiplier);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Outcome of validating a raw prediction value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Only set when `valid` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Ground truth a prediction is scored against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AuthoritativeResult {
    /// Full time score
    Score(Score),
    /// Every player who scored
    Scorers(Vec<String>),
    /// Minute of every goal
    GoalMinutes(Vec<u16>),
    FirstScorer(String),
    HalfTime(Score),
}

/// A result as the browser hands it over: a score or player id string, a
/// list of minutes, or a list of player ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    Text(String),
    Minutes(Vec<u16>),
    Ids(Vec<String>),
}

impl ResultPayload {
    /// Interpret the payload in the shape `bet_type` is scored against.
    pub fn into_result(self, bet_type: BetType) -> Result<AuthoritativeResult, CoreError> {
        match (bet_type, self) {
            (
                BetType::ExactScore
                | BetType::MatchResult
                | BetType::TotalGoals
                | BetType::BothTeamsScore,
                ResultPayload::Text(text),
            ) => Score::try_from(text).map(AuthoritativeResult::Score),
            (BetType::ScoreAtHalf, ResultPayload::Text(text)) => {
                Score::try_from(text).map(AuthoritativeResult::HalfTime)
            }
            (BetType::FirstScorer, ResultPayload::Text(id)) => {
                Ok(AuthoritativeResult::FirstScorer(id))
            }
            (BetType::Scorer, ResultPayload::Ids(ids)) => Ok(AuthoritativeResult::Scorers(ids)),
            // `[]` deserializes as minutes first
            (BetType::Scorer, ResultPayload::Minutes(minutes)) if minutes.is_empty() => {
                Ok(AuthoritativeResult::Scorers(Vec::new()))
            }
            (BetType::CorrectMinute, ResultPayload::Minutes(minutes)) => {
                Ok(AuthoritativeResult::GoalMinutes(minutes))
            }
            (BetType::CorrectMinute, ResultPayload::Ids(values)) => values
                .iter()
                .map(|value| {
                    value.trim().parse::<u16>().map_err(|_| {
                        CoreError::MalformedResult(format!("invalid goal minute: {value}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(AuthoritativeResult::GoalMinutes),
            (bet_type, payload) => Err(CoreError::MalformedResult(format!(
                "{payload:?} is not a result for {bet_type}"
            ))),
        }
    }
}

/// Everything known about a finished match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub final_score: Score,
    #[serde(default)]
    pub half_time_score: Option<Score>,
    /// Scorer ids in goal order, repeated for braces
    #[serde(default)]
    pub scorers: Vec<String>,
    /// Defaults to the first entry of `scorers`
    #[serde(default)]
    pub first_scorer: Option<String>,
    #[serde(default)]
    pub goal_minutes: Vec<u16>,
}

impl MatchReport {
    pub fn new(final_score: Score) -> Self {
        Self {
            final_score,
            half_time_score: None,
            scorers: Vec::new(),
            first_scorer: None,
            goal_minutes: Vec::new(),
        }
    }

    /// Project the report into the result a bet type is scored against.
    pub fn result_for(&self, bet_type: BetType) -> Result<AuthoritativeResult, CoreError> {
        match bet_type {
            BetType::ExactScore
            | BetType::MatchResult
            | BetType::TotalGoals
            | BetType::BothTeamsScore => Ok(AuthoritativeResult::Score(self.final_score)),
            BetType::Scorer => Ok(AuthoritativeResult::Scorers(self.scorers.clone())),
            BetType::CorrectMinute => Ok(AuthoritativeResult::GoalMinutes(
                self.goal_minutes.clone(),
            )),
            BetType::FirstScorer => self
                .first_scorer
                .as_ref()
                .or_else(|| self.scorers.first())
                .cloned()
                .map(AuthoritativeResult::FirstScorer)
                .ok_or_else(|| {
                    CoreError::MalformedResult("match report has no first scorer".into())
                }),
            BetType::ScoreAtHalf => self
                .half_time_score
                .map(AuthoritativeResult::HalfTime)
                .ok_or_else(|| {
                    CoreError::MalformedResult("match report has no half time score".into())
                }),
        }
    }
}

/// Named weaker criterion met by a prediction that missed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialSuccess {
    /// Right winner or draw, wrong score
    Direction,
    /// Goal minute within five minutes
    Close,
}

/// Comparator output, before any multiplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_success: Option<PartialSuccess>,
    /// Base points
    pub points: u32,
    pub explanation: String,
}

impl ComparisonResult {
    pub fn hit(points: u32, explanation: impl Into<String>) -> Self {
        Self {
            success: true,
            partial_success: None,
            points,
            explanation: explanation.into(),
        }
    }

    pub fn partial(kind: PartialSuccess, points: u32, explanation: impl Into<String>) -> Self {
        Self {
            success: false,
            partial_success: Some(kind),
            points,
            explanation: explanation.into(),
        }
    }

    pub fn miss(explanation: impl Into<String>) -> Self {
        Self {
            success: false,
            partial_success: None,
            points: 0,
            explanation: explanation.into(),
        }
    }
}

/// Final, scaled result of a bet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_success: Option<PartialSuccess>,
    pub points: u32,
    pub explanation: String,
}

impl ScoredOutcome {
    /// What the browser gets back for a bet whose type is not registered
    pub fn invalid_type() -> Self {
        Self {
            success: false,
            partial_success: None,
            points: 0,
            explanation: "Tipo de apuesta no válido".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_parse() {
        assert_eq!(Score::parse("2-1"), Some(Score::new(2, 1)));
        assert_eq!(Score::parse("0-0"), Some(Score::new(0, 0)));
        assert_eq!(Score::parse("10-12"), Some(Score::new(10, 12)));
        assert_eq!(Score::parse("2 - 1"), None);
        assert_eq!(Score::parse("-1"), None);
        assert_eq!(Score::parse("2-"), None);
        assert_eq!(Score::parse("2-1-0"), None);
        assert_eq!(Score::parse("+2-1"), None);
        assert_eq!(Score::parse("a-b"), None);
    }

    #[test]
    fn test_score_direction() {
        assert_eq!(Score::new(3, 0).direction(), Direction::Home);
        assert_eq!(Score::new(1, 1).direction(), Direction::Draw);
        assert_eq!(Score::new(0, 2).direction(), Direction::Away);
    }

    #[test]
    fn test_score_serializes_as_string() {
        let json = serde_json::to_string(&Score::new(2, 1)).unwrap();
        assert_eq!(json, "\"2-1\"");

        let score: Score = serde_json::from_str("\"4-2\"").unwrap();
        assert_eq!(score, Score::new(4, 2));

        assert!(serde_json::from_str::<Score>("\"four-two\"").is_err());
    }

    #[test]
    fn test_result_payload_shapes() {
        let payload: ResultPayload = serde_json::from_str("\"2-1\"").unwrap();
        assert_eq!(
            payload.into_result(BetType::ExactScore).unwrap(),
            AuthoritativeResult::Score(Score::new(2, 1))
        );

        let payload: ResultPayload = serde_json::from_str("[12, 50]").unwrap();
        assert_eq!(
            payload.into_result(BetType::CorrectMinute).unwrap(),
            AuthoritativeResult::GoalMinutes(vec![12, 50])
        );

        let payload: ResultPayload = serde_json::from_str("[\"p9\", \"p10\"]").unwrap();
        assert_eq!(
            payload.into_result(BetType::Scorer).unwrap(),
            AuthoritativeResult::Scorers(vec!["p9".into(), "p10".into()])
        );

        let payload: ResultPayload = serde_json::from_str("[]").unwrap();
        assert_eq!(
            payload.into_result(BetType::Scorer).unwrap(),
            AuthoritativeResult::Scorers(vec![])
        );
    }

    #[test]
    fn test_result_payload_wrong_shape() {
        let payload = ResultPayload::Ids(vec!["p9".into()]);
        assert!(matches!(
            payload.into_result(BetType::ExactScore),
            Err(CoreError::MalformedResult(_))
        ));

        let payload = ResultPayload::Text("two-one".into());
        assert!(matches!(
            payload.into_result(BetType::MatchResult),
            Err(CoreError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_match_report_projection() {
        let report = MatchReport {
            final_score: Score::new(2, 1),
            half_time_score: Some(Score::new(1, 0)),
            scorers: vec!["p9".into(), "p4".into(), "p9".into()],
            first_scorer: None,
            goal_minutes: vec![12, 55, 80],
        };

        assert_eq!(
            report.result_for(BetType::FirstScorer).unwrap(),
            AuthoritativeResult::FirstScorer("p9".into())
        );
        assert_eq!(
            report.result_for(BetType::ScoreAtHalf).unwrap(),
            AuthoritativeResult::HalfTime(Score::new(1, 0))
        );
        assert_eq!(
            report.result_for(BetType::TotalGoals).unwrap(),
            AuthoritativeResult::Score(Score::new(2, 1))
        );
    }

    #[test]
    fn test_match_report_missing_half_time() {
        let report = MatchReport::new(Score::new(0, 0));
        assert!(matches!(
            report.result_for(BetType::ScoreAtHalf),
            Err(CoreError::MalformedResult(_))
        ));
        assert!(matches!(
            report.result_for(BetType::FirstScorer),
            Err(CoreError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_submission_deserializes_from_browser_shape() {
        let submission: BetSubmission = serde_json::from_str(
            r#"{"type": "exact_score", "value": "2-1", "serverMultiplier": 2}"#,
        )
        .unwrap();
        assert_eq!(submission.bet_type, "exact_score");
        assert_eq!(submission.server_multiplier, Some(2.0));
        assert!(submission.note.is_none());
    }
}
