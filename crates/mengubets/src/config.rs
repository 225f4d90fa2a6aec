use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use mengubets_core::StandingsConfig;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    env,
    fs::File,
    io::Read,
    path::PathBuf,
};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to Settings.toml file holding configuration options
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level to run with (default: info)
    #[arg(short, long)]
    pub level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List every bet type with its multiplier
    Types,
    /// Check a prediction value against its bet type's rules
    Validate {
        /// Bet type token, e.g. exact_score
        #[arg(short = 't', long)]
        bet_type: String,
        /// Raw prediction value, e.g. 2-1
        #[arg(short, long)]
        value: String,
    },
    /// Score a single prediction against a match result
    Score(ScoreArgs),
    /// Score every bet in one or more match files and rank the users
    Settle {
        /// JSON match files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[arg(short = 't', long)]
    pub bet_type: String,
    #[arg(short, long)]
    pub value: String,
    /// Full time score, e.g. 2-1
    #[arg(long)]
    pub final_score: String,
    /// Half time score, e.g. 1-0
    #[arg(long)]
    pub half_time: Option<String>,
    /// Player id of a goal scorer, repeat once per goal
    #[arg(long = "scorer")]
    pub scorers: Vec<String>,
    /// Defaults to the first --scorer
    #[arg(long)]
    pub first_scorer: Option<String>,
    /// Minute of a goal, repeat once per goal
    #[arg(long = "minute")]
    pub minutes: Vec<u16>,
    /// Overrides the configured default server multiplier
    #[arg(long)]
    pub server_multiplier: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Settings {
    pub level: Option<String>,
    #[serde(default)]
    pub scoring: ScoringSettings,
}

impl ConfigurableSettings for Settings {
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings) {
        if let Some(level) = &cli_settings.level {
            self.level = Some(level.clone());
        }
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/local.toml")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Multiplier for servers without their own entry in `server_multipliers`
    pub default_server_multiplier: f64,
    /// Bets a user needs before showing up in the ranking
    pub minimum_bets: u32,
    /// Number of recent results shown as a user's streak
    pub streak_length: usize,
    /// Discord server id to that server's point multiplier
    #[serde(default)]
    pub server_multipliers: HashMap<String, f64>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        ScoringSettings {
            default_server_multiplier: 1.0,
            minimum_bets: 5,
            streak_length: 5,
            server_multipliers: HashMap::new(),
        }
    }
}

impl ScoringSettings {
    pub fn multiplier_for(&self, server_id: &str) -> f64 {
        self.server_multipliers
            .get(server_id)
            .copied()
            .unwrap_or(self.default_server_multiplier)
    }

    pub fn standings_config(&self) -> StandingsConfig {
        StandingsConfig {
            minimum_bets: self.minimum_bets,
            streak_length: self.streak_length,
        }
    }
}

pub struct CliSettings {
    pub config: Option<String>,
    pub level: Option<String>,
}

impl From<&Cli> for CliSettings {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            level: cli.level.clone(),
        }
    }
}

pub trait ConfigurableSettings: Serialize + for<'de> Deserialize<'de> + Default {
    /// Apply CLI settings after loading from file
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings);

    /// Get the default config file path
    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/settings.toml")
    }
}

pub fn get_settings_with_cli<T: ConfigurableSettings>(
    cli_settings: CliSettings,
) -> Result<T, anyhow::Error> {
    let mut settings = if let Some(config_path) = cli_settings.config.clone() {
        let path = PathBuf::from(config_path);

        let absolute_path = if path.is_absolute() {
            path
        } else {
            env::current_dir()?.join(path)
        };

        match File::open(absolute_path) {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)
                    .map_err(|e| anyhow!("Failed to read config: {}", e))?;
                toml::from_str(&content)
                    .map_err(|e| anyhow!("Failed to map config to settings: {}", e))?
            }
            Err(err) => return Err(anyhow!("Failed to find file: {}", err)),
        }
    } else {
        let default_path = T::default_config_path();
        match File::open(&default_path) {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)
                    .map_err(|e| anyhow!("Failed to read default config: {}", e))?;
                toml::from_str(&content)
                    .map_err(|e| anyhow!("Failed to parse default config: {}", e))?
            }
            // One-shot commands run anywhere, so nothing is written back
            Err(_) => T::default(),
        }
    };

    settings.apply_cli_overrides(&cli_settings);

    Ok(settings)
}

/// Logs go to stderr, stdout carries command output
pub fn setup_logger(
    level: Option<String>,
    filter_targets: Vec<String>,
) -> Result<(), fern::InitError> {
    let rust_log = get_log_level(level);
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_else(|_| String::from("-"));
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .level(rust_log)
        .filter(move |metadata| {
            !filter_targets
                .iter()
                .any(|filter| metadata.target().starts_with(filter))
        })
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

pub fn get_log_level(level: Option<String>) -> LevelFilter {
    let level = level.unwrap_or_else(|| env::var("RUST_LOG").unwrap_or_default());
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}
