// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Schema root definition for configuration validation.
//!
//! The canonical shape of the whole configuration. Used for schema
//! generation and validation; callers read typed sections through
//! [`crate::extract`].

use ar_config_types::{CredentialEntry, SourceSection};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct SchemaRoot {
    /// Path of the `accurev` executable; looked up on PATH when unset
    pub tool: Option<String>,

    pub log_level: Option<String>,

    pub source: Option<SourceSection>,

    /// Named credential entries referenced by `source.credentials-id`
    #[serde(default)]
    pub credentials: BTreeMap<String, CredentialEntry>,
}
