use clap::Parser;
use mengubets::{get_settings_with_cli, run, setup_logger, Cli, Settings};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings: Settings = get_settings_with_cli((&cli).into())?;
    setup_logger(settings.level.clone(), vec![])?;

    run(&settings, cli.command)
}
