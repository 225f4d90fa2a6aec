//! Validation of raw prediction values
//!
//! A raw value is parsed into a [`Prediction`] exactly once, here. Comparators
//! only ever see parsed predictions.

use crate::{
    get_bet_type_by_id, BetSubmission, BetType, CoreError, Direction, GoalLine, GoalSide,
    Prediction, Score, ValidationError, ValidationResult,
};

const SCORE_FORMAT: &str = "El formato debe ser n-n (ej: 2-1)";
const MATCH_RESULT_VALUES: &str =
    "El resultado debe ser victoria local, empate o victoria visitante";
const TOTAL_GOALS_FORMAT: &str = "El formato debe ser \"Over/Under n.n\" (ej: Over 2.5)";
const PLAYER_REQUIRED: &str = "Debe seleccionar un jugador";
const BOTH_TEAMS_SCORE_VALUES: &str = "El valor debe ser \"sí\" o \"no\"";

pub const MIN_GOAL_MINUTE: u8 = 1;
pub const MAX_GOAL_MINUTE: u8 = 120;

/// Parse a raw value into the prediction for `bet_type`.
pub fn parse_prediction(bet_type: BetType, value: &str) -> Result<Prediction, ValidationError> {
    match bet_type {
        BetType::ExactScore => parse_score(value).map(Prediction::ExactScore),
        BetType::MatchResult => parse_direction(value).map(Prediction::MatchResult),
        BetType::TotalGoals => parse_goal_line(value).map(Prediction::TotalGoals),
        BetType::Scorer => parse_player(value).map(Prediction::Scorer),
        BetType::CorrectMinute => parse_minute(value).map(Prediction::CorrectMinute),
        BetType::FirstScorer => parse_player(value).map(Prediction::FirstScorer),
        BetType::ScoreAtHalf => parse_score(value).map(Prediction::ScoreAtHalf),
        BetType::BothTeamsScore => match value {
            "yes" => Ok(Prediction::BothTeamsScore(true)),
            "no" => Ok(Prediction::BothTeamsScore(false)),
            _ => Err(ValidationError::InvalidEnum(BOTH_TEAMS_SCORE_VALUES)),
        },
    }
}

/// Validate a submission against its bet type's rules.
///
/// An unregistered type is an error, not an invalid result: callers must be
/// able to tell "fix your input" apart from "this bet cannot exist".
pub fn validate_bet(submission: &BetSubmission) -> Result<ValidationResult, CoreError> {
    let descriptor = get_bet_type_by_id(&submission.bet_type)
        .ok_or_else(|| CoreError::UnknownBetType(submission.bet_type.clone()))?;
    Ok(descriptor.validate(&submission.value))
}

fn parse_score(value: &str) -> Result<Score, ValidationError> {
    Score::parse(value).ok_or(ValidationError::InvalidFormat(SCORE_FORMAT))
}

fn parse_direction(value: &str) -> Result<Direction, ValidationError> {
    match value {
        "home" => Ok(Direction::Home),
        "draw" => Ok(Direction::Draw),
        "away" => Ok(Direction::Away),
        _ => Err(ValidationError::InvalidEnum(MATCH_RESULT_VALUES)),
    }
}

// ^(Over|Under) \d+(\.\d+)?$
fn parse_goal_line(value: &str) -> Result<GoalLine, ValidationError> {
    let invalid = ValidationError::InvalidFormat(TOTAL_GOALS_FORMAT);
    let (side, threshold_text) = value.split_once(' ').ok_or(invalid.clone())?;
    let side = match side {
        "Over" => GoalSide::Over,
        "Under" => GoalSide::Under,
        _ => return Err(invalid),
    };

    let (whole, fraction) = match threshold_text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (threshold_text, None),
    };
    if !is_digits(whole) || fraction.is_some_and(|fraction| !is_digits(fraction)) {
        return Err(invalid);
    }
    let threshold = threshold_text.parse::<f64>().map_err(|_| invalid)?;

    Ok(GoalLine {
        side,
        threshold,
        threshold_text: threshold_text.to_string(),
    })
}

fn parse_player(value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(PLAYER_REQUIRED));
    }
    Ok(value.to_string())
}

// Reads the leading integer and ignores the rest, so "45'" and "45.5" are 45.
fn parse_minute(value: &str) -> Result<u8, ValidationError> {
    let out_of_range = ValidationError::OutOfRange {
        min: MIN_GOAL_MINUTE,
        max: MAX_GOAL_MINUTE,
    };
    let value = value.trim_start();
    let sign_len = usize::from(value.starts_with(['+', '-']));
    let digits_len = value[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return Err(out_of_range);
    }

    // Overflowing digit runs are far outside the range anyway
    let minute = value[..sign_len + digits_len]
        .parse::<i64>()
        .map_err(|_| out_of_range.clone())?;
    if minute < i64::from(MIN_GOAL_MINUTE) || minute > i64::from(MAX_GOAL_MINUTE) {
        return Err(out_of_range);
    }
    u8::try_from(minute).map_err(|_| out_of_range)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
