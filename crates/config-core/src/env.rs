// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Environment variable and flag overlays

use serde_json::Value as J;

use crate::error::Result;

pub const ENV_PREFIX: &str = "ARSCM";

/// Create JSON overlay from ARSCM_* environment variables.
///
/// `ARSCM_HOME` locates the user file and is not a configuration key.
pub fn env_overlay() -> Result<J> {
    let vars: config::Map<String, String> = std::env::vars()
        .filter(|(key, _)| !key.eq_ignore_ascii_case(crate::paths::HOME_VAR))
        .collect();
    env_overlay_from(Some(vars))
}

/// Overlay from an explicit variable map instead of the process environment.
///
/// `ARSCM_SOURCE__SERVER_URL` becomes `source.server-url`: `__` nests and the
/// remaining underscores turn into kebab case.
pub fn env_overlay_from(vars: Option<config::Map<String, String>>) -> Result<J> {
    let built = config::Config::builder()
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .convert_case(config::Case::Kebab)
                .source(vars),
        )
        .build()?;

    Ok(serde_json::to_value(
        built.try_deserialize::<serde_json::Map<String, J>>()?,
    )?)
}

/// Create JSON overlay from CLI flag key=value pairs
pub fn flags_overlay(kv_pairs: &[(&str, &str)]) -> J {
    let mut root = serde_json::json!({});
    for (k, v) in kv_pairs {
        crate::merge::insert_dotted(&mut root, k, J::String(v.to_string()));
    }
    root
}

/// Split `key=value` flag arguments
pub fn parse_flag(raw: &str) -> Option<(&str, &str)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some((key, value))
}
