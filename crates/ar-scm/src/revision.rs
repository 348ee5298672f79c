// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ar_client::Transaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::head::Head;

/// Point-in-time state of one head.
///
/// Identity is the pair (transaction, head): the same transaction observed
/// through two different heads yields two distinct revisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    head: Head,
    transaction: u64,
    last_modified: DateTime<Utc>,
}

impl Revision {
    pub fn new(head: Head, transaction: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            head,
            transaction,
            last_modified,
        }
    }

    pub fn from_transaction(head: Head, transaction: &Transaction) -> Self {
        Self::new(head, transaction.id, transaction.time)
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn transaction(&self) -> u64 {
        self.transaction
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }
}

impl PartialEq for Revision {
    fn eq(&self, other: &Self) -> bool {
        self.transaction == other.transaction && self.head == other.head
    }
}

impl Eq for Revision {}

impl Hash for Revision {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.transaction.hash(state);
        self.head.hash(state);
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.transaction)
    }
}
