// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Provenance tracking for configuration values

use serde_json::Value as J;
use std::collections::BTreeMap;
use std::fmt;

/// Configuration scope precedence order
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Scope {
    User,
    CliConfig,
    Env,
    Flags,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::User => "user",
            Scope::CliConfig => "cli-config",
            Scope::Env => "env",
            Scope::Flags => "flags",
        })
    }
}

/// Provenance information for configuration values
#[derive(Default, Clone, Debug)]
pub struct Provenance {
    /// Maps dotted key paths to the winning scope
    pub winner: BTreeMap<String, Scope>,
    /// Maps dotted key paths to change history [(scope, value)]
    pub changes: BTreeMap<String, Vec<(Scope, J)>>,
}

impl Provenance {
    fn record(&mut self, key: &str, scope: Scope, value: &J) {
        self.winner.insert(key.to_string(), scope);
        self.changes
            .entry(key.to_string())
            .or_default()
            .push((scope, value.clone()));
    }

    /// Winning scope and value history for one dotted key
    pub fn explain(&self, key: &str) -> Option<(Scope, &[(Scope, J)])> {
        let scope = *self.winner.get(key)?;
        let history = self.changes.get(key).map(Vec::as_slice).unwrap_or_default();
        Some((scope, history))
    }
}

/// Record every leaf a layer sets. Arrays count as leaves.
pub fn record_layer(layer: &J, scope: Scope, prov: &mut Provenance, prefix: &str) {
    match layer {
        J::Object(obj) => {
            for (k, v) in obj {
                let pfx = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                record_layer(v, scope, prov, &pfx);
            }
        }
        J::Null => {}
        _ => prov.record(prefix, scope, layer),
    }
}
