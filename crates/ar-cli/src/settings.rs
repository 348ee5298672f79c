// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Resolved settings shared by every command

use anyhow::{Context, Result};
use ar_client::{AccurevClient, CliAccurevClient};
use ar_logging::{redact, CliLogLevel};
use ar_scm::{resolve_credentials, AccurevSource};
use config_core::{env, extract, load_all, paths, SchemaRoot};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Split `--set` arguments into key/value pairs
pub fn parse_sets<'a>(sets: &[&'a str]) -> Result<Vec<(&'a str, &'a str)>> {
    sets.iter()
        .map(|raw| {
            env::parse_flag(raw).with_context(|| format!("invalid --set '{raw}', expected KEY=VALUE"))
        })
        .collect()
}

pub struct Settings {
    root: SchemaRoot,
    source: AccurevSource,
}

impl Settings {
    /// Load every configuration layer and validate the source section
    pub fn load(config: Option<&str>, sets: &[&str]) -> Result<Self> {
        let flags = parse_sets(sets)?;
        let paths = paths::discover_paths(config.map(Path::new));
        let resolved = load_all(&paths, &flags).context("loading configuration")?;
        Self::from_json(&resolved.json)
    }

    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let root: SchemaRoot = extract::get(json)?;
        let section = root.source.clone().unwrap_or_default();
        let source = AccurevSource::from_config(&section).context("invalid [source] configuration")?;
        Ok(Self { root, source })
    }

    pub fn source(&self) -> &AccurevSource {
        &self.source
    }

    pub fn tool(&self) -> Option<PathBuf> {
        self.root.tool.as_ref().map(PathBuf::from)
    }

    /// The `log-level` configuration value, when it names a level
    pub fn log_level(&self) -> Option<CliLogLevel> {
        self.root.log_level.as_deref().and_then(|level| level.parse().ok())
    }

    /// Locate the executable and log in when credentials are configured
    pub fn client(&self) -> Result<CliAccurevClient> {
        let credentials = resolve_credentials(
            self.source.credentials_id(),
            &self.root.credentials,
            |variable| std::env::var(variable).ok(),
        )?;
        let tool = CliAccurevClient::locate_tool(self.tool().as_deref())
            .context("locating the accurev executable")?;
        let client = CliAccurevClient::new(tool, self.source.server_address()?);

        if let Some(credentials) = credentials {
            debug!(
                username = %credentials.username,
                password = %redact(&credentials.password),
                "Logging in"
            );
            client
                .login(&credentials)
                .with_context(|| format!("logging in as {}", credentials.username))?;
        }
        Ok(client)
    }
}
