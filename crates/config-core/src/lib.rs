// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Layered configuration engine with schema validation, merging, and provenance tracking.
//!
//! File layers are TOML, converted to `serde_json::Value` and validated
//! against the schema generated from [`SchemaRoot`]. Environment variables
//! and `--set` flags become JSON overlays. Everything is merged in
//! precedence order and typed views are extracted afterwards.

pub mod env;
pub mod error;
pub mod extract;
pub mod loader;
pub mod merge;
pub mod paths;
pub mod provenance;
pub mod schema;

pub use error::{ConfigError, Result};
pub use provenance::{Provenance, Scope};
pub use schema::SchemaRoot;

use serde_json::Value as J;

/// Final resolved configuration with provenance information
#[derive(Debug)]
pub struct Resolved {
    /// Final merged JSON configuration
    pub json: J,
    /// Provenance tracking for all configuration values
    pub provenance: Provenance,
}

/// Load and merge all configuration layers.
///
/// Precedence order: user < cli-config < env < flags. A file layer that is
/// missing is skipped; one that exists but fails to parse or validate is an
/// error.
pub fn load_all(paths: &paths::Paths, flag_sets: &[(&str, &str)]) -> Result<Resolved> {
    load_with_env(paths, env::env_overlay()?, flag_sets)
}

/// [`load_all`] with an explicit environment overlay
pub fn load_with_env(paths: &paths::Paths, env_layer: J, flag_sets: &[(&str, &str)]) -> Result<Resolved> {
    use Scope::*;

    let user_layer = match &paths.user {
        Some(p) if p.exists() => Some(loader::read_layer_from_file(p, User)?),
        _ => None,
    };
    let cli_config_layer = match &paths.cli_config {
        Some(p) => Some(loader::read_layer_from_file(p, CliConfig)?),
        None => None,
    };
    let flags_layer = env::flags_overlay(flag_sets);

    let layers = [
        (user_layer.as_ref().map(|l| &l.json), User),
        (cli_config_layer.as_ref().map(|l| &l.json), CliConfig),
        (Some(&env_layer), Env),
        (Some(&flags_layer), Flags),
    ];

    let mut prov = Provenance::default();
    let mut json = serde_json::json!({});
    for (layer, scope) in layers {
        if let Some(layer) = layer {
            merge::merge_two_json(&mut json, layer.clone());
            provenance::record_layer(layer, scope, &mut prov, "");
        }
    }

    Ok(Resolved {
        json,
        provenance: prov,
    })
}
