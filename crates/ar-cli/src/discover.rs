// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

//! `arscm discover`

use anyhow::{Context, Result};
use ar_client::AccurevClient;
use ar_scm::{
    AccurevSource, CollectingObserver, FileExistsCriteria, Head, Revision, SourceCriteria,
    StderrListener, TaskListener,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::settings::Settings;

#[derive(clap::Args, Clone, Debug)]
pub struct DiscoverArgs {
    /// Depot to scan; repeat for several (default: the configured depot)
    #[arg(long)]
    pub depot: Vec<String>,
    /// Only report heads containing this file
    #[arg(long, value_name = "PATH")]
    pub require_file: Option<String>,
    /// Stop each depot after this many heads
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One reported head
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscoveredHead {
    pub depot: String,
    pub kind: String,
    pub name: String,
    pub transaction: u64,
    pub last_modified: DateTime<Utc>,
}

impl DiscoveredHead {
    fn new(depot: &str, head: &Head, revision: &Revision) -> Self {
        Self {
            depot: depot.to_string(),
            kind: head.pronoun().to_lowercase(),
            name: head.name().to_string(),
            transaction: revision.transaction(),
            last_modified: revision.last_modified(),
        }
    }
}

impl DiscoverArgs {
    /// One pass per depot, each on its own blocking task with its own state
    pub async fn run(self, settings: Settings) -> Result<()> {
        let client = Arc::new(settings.client()?);
        let depots = if self.depot.is_empty() {
            vec![settings.source().depot().to_string()]
        } else {
            self.depot.clone()
        };

        let mut tasks = Vec::with_capacity(depots.len());
        for depot in depots {
            let source = settings.source().with_depot(depot);
            let client = Arc::clone(&client);
            let args = self.clone();
            tasks.push(tokio::task::spawn_blocking(move || {
                args.discover_depot(client.as_ref(), &source, &mut StderrListener)
            }));
        }

        let mut found = Vec::new();
        for task in tasks {
            found.extend(task.await.context("discovery task panicked")??);
        }
        info!(heads = found.len(), "Discovery finished");

        if self.json {
            println!("{}", serde_json::to_string_pretty(&found)?);
        } else {
            for head in &found {
                println!("{}", format_row(head));
            }
        }
        Ok(())
    }

    pub fn discover_depot(
        &self,
        client: &dyn AccurevClient,
        source: &AccurevSource,
        listener: &mut dyn TaskListener,
    ) -> Result<Vec<DiscoveredHead>> {
        let criteria = self.require_file.as_deref().map(FileExistsCriteria::new);
        let mut observer = CollectingObserver::new();
        if let Some(limit) = self.limit {
            observer = observer.with_limit(limit);
        }

        source
            .retrieve(
                client,
                criteria.as_ref().map(|c| c as &dyn SourceCriteria),
                &mut observer,
                None,
                listener,
            )
            .with_context(|| format!("discovering heads in depot {}", source.depot()))?;

        Ok(observer
            .into_results()
            .iter()
            .map(|(head, revision)| DiscoveredHead::new(source.depot(), head, revision))
            .collect())
    }
}

pub fn format_row(head: &DiscoveredHead) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        head.depot,
        head.kind,
        head.name,
        head.transaction,
        head.last_modified.to_rfc3339()
    )
}
