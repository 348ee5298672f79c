// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Credential references

use serde::{Deserialize, Serialize};

/// An entry of the `[credentials.<id>]` table.
///
/// Passwords are never stored in configuration; the entry names the
/// environment variable holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CredentialEntry {
    pub username: String,
    #[serde(alias = "password_env")]
    pub password_env: Option<String>,
}

impl CredentialEntry {
    /// Environment variable holding the password, `ACCUREV_PASSWORD` by default
    pub fn password_variable(&self) -> &str {
        self.password_env.as_deref().unwrap_or("ACCUREV_PASSWORD")
    }
}
