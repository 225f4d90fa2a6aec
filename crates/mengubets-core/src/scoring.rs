//! Point calculation for bets
//!
//! Comparators award base points; [`calculate_bet_result`] scales them by the
//! bet type's multiplier and the server's multiplier.

use crate::{
    get_bet_type_by_id, parse_prediction, AuthoritativeResult, BetSubmission, BetType,
    ComparisonResult, CoreError, Direction, GoalLine, GoalSide, PartialSuccess, Prediction,
    ScoredOutcome, Score,
};

/// Largest distance, in minutes, that still earns partial credit
pub const CLOSE_MINUTE_MARGIN: u16 = 5;

/// Compare a parsed prediction with the authoritative result.
///
/// Fails with [`CoreError::MalformedResult`] when the result is not the shape
/// the prediction's type is scored against.
pub fn compare(
    prediction: &Prediction,
    result: &AuthoritativeResult,
) -> Result<ComparisonResult, CoreError> {
    let comparison = match (prediction, result) {
        (Prediction::ExactScore(bet), AuthoritativeResult::Score(actual)) => {
            compare_exact_score(bet, actual)
        }
        (Prediction::MatchResult(bet), AuthoritativeResult::Score(actual)) => {
            compare_match_result(*bet, actual)
        }
        (Prediction::TotalGoals(line), AuthoritativeResult::Score(actual)) => {
            compare_total_goals(line, actual)
        }
        (Prediction::Scorer(player), AuthoritativeResult::Scorers(scorers)) => {
            if scorers.contains(player) {
                ComparisonResult::hit(2, "Acertó el goleador")
            } else {
                ComparisonResult::miss("No acertó el goleador")
            }
        }
        (Prediction::CorrectMinute(minute), AuthoritativeResult::GoalMinutes(minutes)) => {
            compare_minute(*minute, minutes)
        }
        (Prediction::FirstScorer(player), AuthoritativeResult::FirstScorer(first)) => {
            if player == first {
                ComparisonResult::hit(3, "Acertó el primer goleador")
            } else {
                ComparisonResult::miss("No acertó el primer goleador")
            }
        }
        // Same format as exact score, but no credit for the direction
        (Prediction::ScoreAtHalf(bet), AuthoritativeResult::HalfTime(actual)) => {
            if bet == actual {
                ComparisonResult::hit(3, "Acertó el resultado al descanso")
            } else {
                ComparisonResult::miss("No acertó el resultado al descanso")
            }
        }
        (Prediction::BothTeamsScore(bet), AuthoritativeResult::Score(actual)) => {
            compare_both_teams_score(*bet, actual)
        }
        (prediction, result) => {
            return Err(CoreError::MalformedResult(format!(
                "{} cannot be scored against {:?}",
                prediction.bet_type(),
                result
            )))
        }
    };
    Ok(comparison)
}

fn compare_exact_score(bet: &Score, actual: &Score) -> ComparisonResult {
    if bet == actual {
        return ComparisonResult::hit(3, "Resultado exacto acertado");
    }
    if bet.direction() == actual.direction() {
        return ComparisonResult::partial(
            PartialSuccess::Direction,
            1,
            "Acertó la tendencia del partido (victoria/empate)",
        );
    }
    ComparisonResult::miss("Resultado no acertado")
}

fn compare_match_result(bet: Direction, actual: &Score) -> ComparisonResult {
    if bet == actual.direction() {
        ComparisonResult::hit(2, "Acertó el resultado del partido")
    } else {
        ComparisonResult::miss("No acertó el resultado")
    }
}

// Strict on both sides: a total equal to an integer line loses either way.
fn compare_total_goals(line: &GoalLine, actual: &Score) -> ComparisonResult {
    let total = actual.total_goals();
    let total_value = total as f64;
    match line.side {
        GoalSide::Over if total_value > line.threshold => ComparisonResult::hit(
            2,
            format!(
                "Acertó: hubo más de {} goles ({})",
                line.threshold_text, total
            ),
        ),
        GoalSide::Under if total_value < line.threshold => ComparisonResult::hit(
            2,
            format!(
                "Acertó: hubo menos de {} goles ({})",
                line.threshold_text, total
            ),
        ),
        _ => ComparisonResult::miss(format!("No acertó: hubo {} goles y apostó {}", total, line)),
    }
}

fn compare_minute(minute: u8, goal_minutes: &[u16]) -> ComparisonResult {
    let minute = u16::from(minute);
    if goal_minutes.contains(&minute) {
        return ComparisonResult::hit(3, format!("Acertó el minuto exacto del gol ({minute}')"));
    }
    if goal_minutes
        .iter()
        .any(|goal| goal.abs_diff(minute) <= CLOSE_MINUTE_MARGIN)
    {
        return ComparisonResult::partial(
            PartialSuccess::Close,
            1,
            "Acertó un minuto aproximado (±5 minutos)",
        );
    }
    ComparisonResult::miss("No acertó el minuto de gol")
}

fn compare_both_teams_score(bet: bool, actual: &Score) -> ComparisonResult {
    let both_scored = actual.both_scored();
    match (bet == both_scored, both_scored) {
        (true, true) => ComparisonResult::hit(2, "Acertó: ambos equipos marcaron"),
        (true, false) => ComparisonResult::hit(2, "Acertó: al menos un equipo no marcó"),
        (false, true) => ComparisonResult::miss("No acertó: ambos equipos marcaron"),
        (false, false) => ComparisonResult::miss("No acertó: al menos un equipo no marcó"),
    }
}

/// Resolve an optional server multiplier.
///
/// Missing, zero and NaN all mean 1. Negative and infinite multipliers are
/// rejected.
pub fn server_multiplier(multiplier: Option<f64>) -> Result<f64, CoreError> {
    match multiplier {
        None => Ok(1.0),
        Some(m) if m == 0.0 || m.is_nan() => Ok(1.0),
        Some(m) if m.is_finite() && m > 0.0 => Ok(m),
        Some(m) => Err(CoreError::InvalidMultiplier(m)),
    }
}

/// `round(base * type multiplier * server multiplier)`, halves rounding up
pub fn scale_points(base_points: u32, type_multiplier: f64, server_multiplier: f64) -> u32 {
    let scaled = f64::from(base_points) * type_multiplier * server_multiplier;
    // `as` saturates, and the inputs are never negative
    scaled.round() as u32
}

/// Score an already parsed prediction.
pub fn score_prediction(
    prediction: &Prediction,
    result: &AuthoritativeResult,
    server_multiplier: f64,
) -> Result<ScoredOutcome, CoreError> {
    let bet_type: BetType = prediction.bet_type();
    let comparison = compare(prediction, result)?;
    Ok(ScoredOutcome {
        success: comparison.success,
        partial_success: comparison.partial_success,
        points: scale_points(
            comparison.points,
            bet_type.descriptor().multiplier,
            server_multiplier,
        ),
        explanation: comparison.explanation,
    })
}

/// Score a submitted bet against the authoritative result.
///
/// Errors, in the order they are checked:
/// - [`CoreError::UnknownBetType`] if the type is not registered
/// - [`CoreError::InvalidMultiplier`] for a negative or infinite server multiplier
/// - [`CoreError::Validation`] if the value does not pass its validator
/// - [`CoreError::MalformedResult`] if `result` has the wrong shape
pub fn calculate_bet_result(
    submission: &BetSubmission,
    result: &AuthoritativeResult,
) -> Result<ScoredOutcome, CoreError> {
    let descriptor = get_bet_type_by_id(&submission.bet_type)
        .ok_or_else(|| CoreError::UnknownBetType(submission.bet_type.clone()))?;
    let server_multiplier = server_multiplier(submission.server_multiplier)?;
    let prediction = parse_prediction(descriptor.bet_type, &submission.value)?;

    score_prediction(&prediction, result, server_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_score(home: u32, away: u32) -> AuthoritativeResult {
        AuthoritativeResult::Score(Score::new(home, away))
    }

    fn score(bet_type: &str, value: &str, result: &AuthoritativeResult) -> ScoredOutcome {
        calculate_bet_result(&BetSubmission::new(bet_type, value), result).unwrap()
    }

    #[test]
    fn test_exact_score_hit() {
        let outcome = score("exact_score", "2-1", &final_score(2, 1));
        assert!(outcome.success);
        assert_eq!(outcome.partial_success, None);
        // 3 * 1.5 = 4.5
        assert_eq!(outcome.points, 5);
    }

    #[test]
    fn test_exact_score_direction() {
        let outcome = score("exact_score", "3-0", &final_score(2, 0));
        assert!(!outcome.success);
        assert_eq!(outcome.partial_success, Some(PartialSuccess::Direction));
        // 1 * 1.5 = 1.5
        assert_eq!(outcome.points, 2);

        let outcome = score("exact_score", "0-0", &final_score(2, 2));
        assert_eq!(outcome.partial_success, Some(PartialSuccess::Direction));
    }

    #[test]
    fn test_exact_score_miss() {
        let outcome = score("exact_score", "0-1", &final_score(2, 0));
        assert!(!outcome.success);
        assert_eq!(outcome.partial_success, None);
        assert_eq!(outcome.points, 0);
    }

    #[test]
    fn test_scores_compare_as_numbers() {
        let outcome = score("exact_score", "02-1", &final_score(2, 1));
        assert!(outcome.success);
        assert_eq!(outcome.points, 5);

        let half_time = AuthoritativeResult::HalfTime(Score::new(1, 0));
        let outcome = score("score_at_half", "01-00", &half_time);
        assert!(outcome.success);
        assert_eq!(outcome.points, 4);
    }

    #[test]
    fn test_match_result() {
        let outcome = score("match_result", "draw", &final_score(1, 1));
        assert!(outcome.success);
        assert_eq!(outcome.points, 2);

        let outcome = score("match_result", "away", &final_score(0, 3));
        assert!(outcome.success);

        let outcome = score("match_result", "home", &final_score(0, 3));
        assert!(!outcome.success);
        assert_eq!(outcome.points, 0);
    }

    #[test]
    fn test_total_goals() {
        let outcome = score("total_goals", "Over 2.5", &final_score(2, 1));
        assert!(outcome.success);
        assert_eq!(outcome.points, 2);
        assert_eq!(outcome.explanation, "Acertó: hubo más de 2.5 goles (3)");

        let outcome = score("total_goals", "Under 2.5", &final_score(1, 1));
        assert!(outcome.success);

        let outcome = score("total_goals", "Under 2.5", &final_score(2, 1));
        assert!(!outcome.success);
        assert_eq!(outcome.explanation, "No acertó: hubo 3 goles y apostó Under 2.5");
    }

    #[test]
    fn test_total_goals_integer_line_push_loses() {
        let result = final_score(1, 1);
        assert!(!score("total_goals", "Over 2", &result).success);
        assert!(!score("total_goals", "Under 2", &result).success);
    }

    #[test]
    fn test_scorer() {
        let scorers = AuthoritativeResult::Scorers(vec!["p9".into(), "p4".into()]);
        let outcome = score("scorer", "p4", &scorers);
        assert!(outcome.success);
        // 2 * 1.2 = 2.4
        assert_eq!(outcome.points, 2);

        let outcome = score("scorer", "p7", &scorers);
        assert!(!outcome.success);
        assert_eq!(outcome.points, 0);

        let no_goals = AuthoritativeResult::Scorers(vec![]);
        assert!(!score("scorer", "p4", &no_goals).success);
    }

    #[test]
    fn test_correct_minute() {
        let minutes = AuthoritativeResult::GoalMinutes(vec![50]);

        let outcome = score("correct_minute", "50", &minutes);
        assert!(outcome.success);
        // 3 * 1.8 = 5.4
        assert_eq!(outcome.points, 5);
        assert_eq!(outcome.explanation, "Acertó el minuto exacto del gol (50')");

        let outcome = score("correct_minute", "45", &minutes);
        assert!(!outcome.success);
        assert_eq!(outcome.partial_success, Some(PartialSuccess::Close));
        // 1 * 1.8 = 1.8
        assert_eq!(outcome.points, 2);

        let outcome = score("correct_minute", "55", &minutes);
        assert_eq!(outcome.partial_success, Some(PartialSuccess::Close));
        assert_eq!(outcome.points, 2);

        let outcome = score("correct_minute", "56", &minutes);
        assert_eq!(outcome.partial_success, None);
        assert_eq!(outcome.points, 0);

        let outcome = score("correct_minute", "44", &minutes);
        assert_eq!(outcome.partial_success, None);
        assert_eq!(outcome.points, 0);
    }

    #[test]
    fn test_correct_minute_exact_beats_close() {
        let minutes = AuthoritativeResult::GoalMinutes(vec![10, 12]);
        let outcome = score("correct_minute", "12", &minutes);
        assert!(outcome.success);
        assert_eq!(outcome.partial_success, None);
    }

    #[test]
    fn test_first_scorer() {
        let first = AuthoritativeResult::FirstScorer("p9".into());
        let outcome = score("first_scorer", "p9", &first);
        assert!(outcome.success);
        // 3 * 1.5 = 4.5
        assert_eq!(outcome.points, 5);

        assert!(!score("first_scorer", "p4", &first).success);
    }

    #[test]
    fn test_score_at_half_has_no_direction_credit() {
        let half_time = AuthoritativeResult::HalfTime(Score::new(1, 0));

        let outcome = score("score_at_half", "1-0", &half_time);
        assert!(outcome.success);
        // 3 * 1.4 = 4.2
        assert_eq!(outcome.points, 4);

        let outcome = score("score_at_half", "2-0", &half_time);
        assert!(!outcome.success);
        assert_eq!(outcome.partial_success, None);
        assert_eq!(outcome.points, 0);
    }

    #[test]
    fn test_both_teams_score() {
        let outcome = score("both_teams_score", "yes", &final_score(2, 1));
        assert!(outcome.success);
        // 2 * 1.1 = 2.2
        assert_eq!(outcome.points, 2);
        assert_eq!(outcome.explanation, "Acertó: ambos equipos marcaron");

        let outcome = score("both_teams_score", "no", &final_score(2, 0));
        assert!(outcome.success);
        assert_eq!(outcome.explanation, "Acertó: al menos un equipo no marcó");

        let outcome = score("both_teams_score", "no", &final_score(1, 1));
        assert!(!outcome.success);
        assert_eq!(outcome.explanation, "No acertó: ambos equipos marcaron");
    }

    #[test]
    fn test_server_multiplier() {
        let submission = BetSubmission::new("match_result", "home").with_server_multiplier(2.5);
        let outcome = calculate_bet_result(&submission, &final_score(1, 0)).unwrap();
        assert_eq!(outcome.points, 5);

        let submission = BetSubmission::new("exact_score", "1-0").with_server_multiplier(2.0);
        let outcome = calculate_bet_result(&submission, &final_score(1, 0)).unwrap();
        // 3 * 1.5 * 2 = 9
        assert_eq!(outcome.points, 9);
    }

    #[test]
    fn test_unset_server_multiplier_scales_like_one() {
        for multiplier in [0.0, -0.0, f64::NAN] {
            let submission =
                BetSubmission::new("match_result", "home").with_server_multiplier(multiplier);
            let outcome = calculate_bet_result(&submission, &final_score(1, 0)).unwrap();
            assert!(outcome.success);
            assert_eq!(outcome.points, 2);
        }
        assert_eq!(server_multiplier(None).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_server_multiplier() {
        for multiplier in [-1.0, -0.5, f64::INFINITY, f64::NEG_INFINITY] {
            let submission =
                BetSubmission::new("match_result", "home").with_server_multiplier(multiplier);
            assert!(matches!(
                calculate_bet_result(&submission, &final_score(1, 0)),
                Err(CoreError::InvalidMultiplier(_))
            ));
        }
    }

    #[test]
    fn test_unknown_type() {
        let submission = BetSubmission::new("corners", "Over 9.5");
        assert!(matches!(
            calculate_bet_result(&submission, &final_score(1, 0)),
            Err(CoreError::UnknownBetType(_))
        ));
    }

    #[test]
    fn test_invalid_value() {
        let submission = BetSubmission::new("exact_score", "two-one");
        assert!(matches!(
            calculate_bet_result(&submission, &final_score(2, 1)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_mismatched_result_shape() {
        let submission = BetSubmission::new("scorer", "p9");
        assert!(matches!(
            calculate_bet_result(&submission, &final_score(2, 1)),
            Err(CoreError::MalformedResult(_))
        ));

        let submission = BetSubmission::new("score_at_half", "1-0");
        assert!(matches!(
            calculate_bet_result(&submission, &final_score(1, 0)),
            Err(CoreError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let submission = BetSubmission::new("exact_score", "3-0").with_note("corazonada");
        let result = final_score(2, 0);
        let first = calculate_bet_result(&submission, &result).unwrap();
        let second = calculate_bet_result(&submission, &result).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scale_points_rounding() {
        assert_eq!(scale_points(1, 1.5, 1.0), 2);
        assert_eq!(scale_points(3, 1.4, 1.0), 4);
        assert_eq!(scale_points(0, 1.8, 3.0), 0);
        assert_eq!(scale_points(2, 1.0, 0.25), 1);
    }
}
