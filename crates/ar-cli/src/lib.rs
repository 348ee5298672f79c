// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ar_logging::CliLoggingArgs;
use clap::Subcommand;

pub mod build;
pub mod config_commands;
pub mod discover;
pub mod probe;
pub mod settings;

pub use clap::Parser;

#[derive(clap::Parser)]
#[command(
    name = "arscm",
    about = "Discover buildable AccuRev streams and snapshots",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Extra configuration file, layered above the user file
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override a configuration value (`key.path=value`)
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    pub set: Vec<String>,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the heads of one or more depots
    Discover(discover::DiscoverArgs),
    /// Inspect files of a stream or snapshot
    Probe(probe::ProbeArgs),
    /// Print the checkout descriptor for a head
    Build(build::BuildArgs),
    Config {
        #[command(subcommand)]
        subcommand: config_commands::ConfigCommands,
    },
}

/// Options selecting one head of the configured depot
#[derive(clap::Args, Clone, Debug)]
pub struct HeadArgs {
    /// Stream or snapshot name
    #[arg(long)]
    pub stream: String,
    /// Treat the name as a snapshot
    #[arg(long)]
    pub snapshot: bool,
}

impl HeadArgs {
    pub fn head(&self) -> ar_scm::Head {
        if self.snapshot {
            ar_scm::Head::snapshot(&self.stream)
        } else {
            ar_scm::Head::stream(&self.stream)
        }
    }
}
