use anyhow::{anyhow, Context};
use log::{info, warn};
use mengubets_core::{
    bet_types, calculate_bet_result, validate_bet, BetSubmission, BetType, MatchReport, Score,
};
use serde::Serialize;

use crate::{load_match_file, settle_matches, Command, ScoreArgs, Settings};

pub fn run(settings: &Settings, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Types => {
            for descriptor in bet_types() {
                println!(
                    "{} {:<18} {:<24} x{}",
                    descriptor.icon, descriptor.id, descriptor.name, descriptor.multiplier
                );
            }
            Ok(())
        }
        Command::Validate { bet_type, value } => {
            let submission = BetSubmission::new(bet_type, value);
            let result = validate_bet(&submission)?;
            if !result.valid {
                warn!(
                    "Invalid {} prediction {:?}",
                    submission.bet_type, submission.value
                );
            }
            print_json(&result)
        }
        Command::Score(args) => {
            let outcome = score(settings, args)?;
            print_json(&outcome)
        }
        Command::Settle { files } => {
            let match_files = files
                .iter()
                .map(|path| load_match_file(path))
                .collect::<Result<Vec<_>, _>>()?;
            let settlement = settle_matches(&match_files, &settings.scoring)?;
            print_json(&settlement)
        }
    }
}

fn score(settings: &Settings, args: ScoreArgs) -> anyhow::Result<mengubets_core::ScoredOutcome> {
    let bet_type: BetType = args.bet_type.parse()?;
    let report = MatchReport {
        final_score: parse_score(&args.final_score).context("--final-score")?,
        half_time_score: args
            .half_time
            .as_deref()
            .map(parse_score)
            .transpose()
            .context("--half-time")?,
        scorers: args.scorers,
        first_scorer: args.first_scorer,
        goal_minutes: args.minutes,
    };
    let result = report.result_for(bet_type)?;

    let multiplier = args
        .server_multiplier
        .unwrap_or(settings.scoring.default_server_multiplier);
    let submission =
        BetSubmission::new(args.bet_type, args.value).with_server_multiplier(multiplier);
    let outcome = calculate_bet_result(&submission, &result)?;

    info!(
        "{} {:?} scored {} points",
        bet_type, submission.value, outcome.points
    );
    Ok(outcome)
}

fn parse_score(value: &str) -> anyhow::Result<Score> {
    Score::parse(value).ok_or_else(|| anyhow!("expected a H-A score, got {:?}", value))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
