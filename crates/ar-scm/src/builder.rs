// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Checkout descriptors for discovered heads

use serde::{Deserialize, Serialize};

use crate::error::{ScmError, ScmResult};
use crate::head::Head;
use crate::revision::Revision;
use crate::source::AccurevSource;

/// Everything a build needs to check out one head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScmConfig {
    pub server_url: String,
    pub depot: String,
    pub stream: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_id: Option<String>,
}

pub struct ScmBuilder<'s> {
    source: &'s AccurevSource,
    head: Head,
    revision: Option<Revision>,
    pinned: Option<u64>,
}

impl<'s> ScmBuilder<'s> {
    pub fn new(source: &'s AccurevSource, head: Head, revision: Option<Revision>) -> Self {
        Self {
            source,
            head,
            revision,
            pinned: None,
        }
    }

    /// Pin an explicit transaction instead of the revision's
    pub fn pin_transaction(mut self, transaction: u64) -> Self {
        self.pinned = Some(transaction);
        self
    }

    pub fn with_revision(mut self, revision: Revision) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Snapshots never pin a transaction; streams pin the revision when given
    pub fn build(&self) -> ScmResult<ScmConfig> {
        let server_url = self.source.server_address()?;
        if self.source.depot().trim().is_empty() {
            return Err(ScmError::Configuration("depot is not set".to_string()));
        }
        if let Some(revision) = &self.revision {
            if revision.head() != &self.head {
                return Err(ScmError::Configuration(format!(
                    "revision {} belongs to {} {}, not {}",
                    revision,
                    revision.head().pronoun().to_lowercase(),
                    revision.head(),
                    self.head
                )));
            }
        }
        let transaction = if self.head.is_snapshot() {
            None
        } else {
            self.pinned
                .or_else(|| self.revision.as_ref().map(Revision::transaction))
        };
        Ok(ScmConfig {
            server_url,
            depot: self.source.depot().to_string(),
            stream: self.head.name().to_string(),
            kind: self.head.pronoun().to_lowercase(),
            transaction,
            credentials_id: self.source.credentials_id().map(str::to_string),
        })
    }
}
