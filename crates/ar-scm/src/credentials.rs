// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ar_client::Credentials;
use ar_config_types::CredentialEntry;
use std::collections::BTreeMap;

use crate::error::{ScmError, ScmResult};

/// Turn a credential reference into a username and password.
///
/// `lookup` reads environment variables; it is a parameter so callers decide
/// where secrets come from. No reference means an anonymous session.
pub fn resolve_credentials<F>(
    id: Option<&str>,
    entries: &BTreeMap<String, CredentialEntry>,
    lookup: F,
) -> ScmResult<Option<Credentials>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(id) = id else {
        return Ok(None);
    };
    let entry = entries
        .get(id)
        .ok_or_else(|| ScmError::Configuration(format!("unknown credentials id '{id}'")))?;
    let variable = entry.password_variable();
    let password = lookup(variable).ok_or_else(|| {
        ScmError::Configuration(format!(
            "password variable {variable} for credentials '{id}' is not set"
        ))
    })?;
    Ok(Some(Credentials {
        username: entry.username.clone(),
        password,
    }))
}
