// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

//! `arscm build`

use anyhow::Result;
use ar_client::AccurevClient;
use ar_scm::{AccurevSource, ClientRevisionResolver, RevisionResolver, ScmBuilder, ScmConfig};

use crate::settings::Settings;
use crate::HeadArgs;

#[derive(clap::Args, Clone, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub head: HeadArgs,
    /// Pin this transaction
    #[arg(long)]
    pub transaction: Option<u64>,
    /// Resolve and pin the latest transaction
    #[arg(long, conflicts_with = "transaction")]
    pub latest: bool,
}

impl BuildArgs {
    pub fn run(&self, settings: &Settings) -> Result<()> {
        let config = if self.latest {
            let client = settings.client()?;
            self.config_for(settings.source(), Some(&client))?
        } else {
            self.config_for(settings.source(), None)?
        };
        println!("{}", serde_json::to_string_pretty(&config)?);
        Ok(())
    }

    pub fn config_for(
        &self,
        source: &AccurevSource,
        client: Option<&dyn AccurevClient>,
    ) -> Result<ScmConfig> {
        let head = self.head.head();
        let mut builder = ScmBuilder::new(source, head.clone(), None);
        if let Some(transaction) = self.transaction {
            builder = builder.pin_transaction(transaction);
        } else if let Some(client) = client.filter(|_| self.latest) {
            let revision = ClientRevisionResolver::new(client, source.depot()).resolve(&head)?;
            builder = builder.with_revision(revision);
        }
        Ok(builder.build()?)
    }
}
