// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ar_cli::settings::Settings;
use ar_cli::{Cli, Commands, Parser};
use ar_logging::CliLogLevel;
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let sets: Vec<&str> = cli.set.iter().map(String::as_str).collect();

    if let Commands::Config { subcommand } = &cli.command {
        cli.logging.init("arscm", CliLogLevel::Warn)?;
        return subcommand.run(cli.config.as_deref(), &sets);
    }

    let settings = Settings::load(cli.config.as_deref(), &sets)?;
    let default_level = settings.log_level().unwrap_or(CliLogLevel::Warn);
    cli.logging.init("arscm", default_level)?;

    match cli.command {
        Commands::Discover(args) => args.run(settings).await,
        Commands::Probe(args) => args.run(&settings),
        Commands::Build(args) => args.run(&settings),
        Commands::Config { .. } => Ok(()),
    }
}
