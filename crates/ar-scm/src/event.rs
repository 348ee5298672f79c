// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Change notifications that narrow a discovery pass

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::head::Head;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadEventKind {
    Created,
    Updated,
    Removed,
}

/// An external notice that some heads changed.
///
/// When a pass runs on behalf of an event, candidates the event does not
/// mention are skipped before any transaction is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadEvent {
    kind: HeadEventKind,
    heads: BTreeSet<Head>,
}

impl HeadEvent {
    pub fn new(kind: HeadEventKind, heads: impl IntoIterator<Item = Head>) -> Self {
        Self {
            kind,
            heads: heads.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> HeadEventKind {
        self.kind
    }

    pub fn heads(&self) -> &BTreeSet<Head> {
        &self.heads
    }

    pub fn mentions(&self, head: &Head) -> bool {
        self.heads.contains(head)
    }
}
