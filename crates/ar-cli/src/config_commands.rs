// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

//! Configuration inspection commands

use anyhow::Result;
use clap::Subcommand;
use config_core::{load_all, paths, provenance::Provenance, Resolved};
use std::path::Path;

use crate::settings::parse_sets;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show resolved configuration values
    Show {
        /// Show a single dotted key
        key: Option<String>,
        /// Show which scope supplied each value and the values it overrode
        #[arg(long)]
        explain: bool,
    },
}

impl ConfigCommands {
    pub fn run(&self, config: Option<&str>, sets: &[&str]) -> Result<()> {
        let flags = parse_sets(sets)?;
        let paths = paths::discover_paths(config.map(Path::new));
        let resolved = load_all(&paths, &flags)?;
        match self {
            ConfigCommands::Show { key, explain } => {
                print!("{}", render(&resolved, key.as_deref(), *explain));
            }
        }
        Ok(())
    }
}

/// `key=value` lines, optionally with provenance
pub fn render(resolved: &Resolved, key: Option<&str>, explain: bool) -> String {
    let mut out = String::new();
    match key {
        Some(key) => match get_nested_value(&resolved.json, key) {
            Some(value) => render_value(&mut out, key, value, explain, &resolved.provenance),
            None => out.push_str(&format!("Configuration key '{key}' not found\n")),
        },
        None => render_value(&mut out, "", &resolved.json, explain, &resolved.provenance),
    }
    out
}

fn get_nested_value<'a>(json: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.').try_fold(json, |current, part| current.get(part))
}

fn render_value(
    out: &mut String,
    prefix: &str,
    json: &serde_json::Value,
    explain: bool,
    provenance: &Provenance,
) {
    if let serde_json::Value::Object(obj) = json {
        for (key, value) in obj {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            render_value(out, &full_key, value, explain, provenance);
        }
        return;
    }

    out.push_str(&format!("{prefix}={json}"));
    if explain {
        if let Some((scope, history)) = provenance.explain(prefix) {
            out.push_str(&format!(" (from {scope})"));
            for (earlier, value) in history.iter().rev().skip(1) {
                out.push_str(&format!("\n    overrides {value} from {earlier}"));
            }
        }
    }
    out.push('\n');
}
