// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Branch source configuration: server, depot and discovery traits

use serde::{Deserialize, Serialize};

/// The `[source]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct SourceSection {
    /// AccuRev server as `host[:port]`, optionally prefixed with `accurev://`
    #[serde(alias = "server_url")]
    pub server_url: Option<String>,
    /// Depot whose streams are discovered
    pub depot: Option<String>,
    /// Key into the `[credentials]` table
    #[serde(alias = "credentials_id")]
    pub credentials_id: Option<String>,
    /// Ordered discovery traits; defaults to stream discovery only
    pub traits: Option<Vec<TraitRule>>,
}

impl SourceSection {
    /// Configured traits, or the default rule set when none are configured
    pub fn effective_traits(&self) -> Vec<TraitRule> {
        match &self.traits {
            Some(rules) => rules.clone(),
            None => vec![TraitRule::enabled(TraitKind::Streams)],
        }
    }
}

/// One user-toggled discovery trait
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct TraitRule {
    pub kind: TraitKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl TraitRule {
    pub fn enabled(kind: TraitKind) -> Self {
        Self { kind, enabled: true }
    }

    pub fn disabled(kind: TraitKind) -> Self {
        Self {
            kind,
            enabled: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TraitKind {
    /// Discover normal and gated streams
    Streams,
    /// Discover snapshots
    Snapshots,
}
