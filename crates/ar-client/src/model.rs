// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Value types describing what the AccuRev server reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level container of streams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depot {
    pub number: u32,
    pub name: String,
    pub case_sensitive: bool,
}

/// Classification the server assigns to a stream.
///
/// The kind is read once from `show streams` output and never changes within
/// a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Normal,
    Gated,
    Snapshot,
    Workspace,
    Passthrough,
    Staging,
    Other(String),
}

impl StreamKind {
    /// Parse the `type` attribute, case-insensitively
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "normal" => StreamKind::Normal,
            "gated" => StreamKind::Gated,
            "snapshot" => StreamKind::Snapshot,
            "workspace" => StreamKind::Workspace,
            "passthrough" | "pass-through" => StreamKind::Passthrough,
            "staging" => StreamKind::Staging,
            _ => StreamKind::Other(raw.to_string()),
        }
    }

    /// Normal and gated streams are the ones discovered as stream heads
    pub fn is_stream_head(&self) -> bool {
        matches!(self, StreamKind::Normal | StreamKind::Gated)
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, StreamKind::Snapshot)
    }

    pub fn as_str(&self) -> &str {
        match self {
            StreamKind::Normal => "normal",
            StreamKind::Gated => "gated",
            StreamKind::Snapshot => "snapshot",
            StreamKind::Workspace => "workspace",
            StreamKind::Passthrough => "passthrough",
            StreamKind::Staging => "staging",
            StreamKind::Other(raw) => raw,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A branch-like entity within a depot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub name: String,
    pub number: Option<u64>,
    pub depot: String,
    pub basis_name: Option<String>,
    pub basis_number: Option<u64>,
    pub dynamic: bool,
    pub kind: StreamKind,
    pub time: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
}

impl Stream {
    /// Minimal stream, mostly useful for fakes and tests
    pub fn new(depot: impl Into<String>, name: impl Into<String>, kind: StreamKind) -> Self {
        Self {
            name: name.into(),
            number: None,
            depot: depot.into(),
            basis_name: None,
            basis_number: None,
            dynamic: true,
            kind,
            time: None,
            start_time: None,
        }
    }
}

/// One promote/keep/etc. recorded by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub action: String,
    pub time: DateTime<Utc>,
    pub user: Option<String>,
    pub comment: Option<String>,
    pub affected_paths: Vec<String>,
}

impl Transaction {
    pub fn new(id: u64, time: DateTime<Utc>) -> Self {
        Self {
            id,
            action: String::new(),
            time,
            user: None,
            comment: None,
            affected_paths: Vec::new(),
        }
    }
}

/// An `<element>` entry of `files`/`stat` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Normalized location, see [`crate::clean_path`]
    pub location: String,
    pub status: String,
    #[serde(default)]
    pub is_dir: bool,
}

impl Element {
    pub fn new(location: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            status: status.into(),
            is_dir: false,
        }
    }

    pub fn directory(location: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            is_dir: true,
            ..Self::new(location, status)
        }
    }

    /// Last path segment of the location
    pub fn file_name(&self) -> &str {
        self.location.rsplit('/').next().unwrap_or(&self.location)
    }

    /// Parent directory of the location ("" for top-level entries)
    pub fn parent(&self) -> &str {
        match self.location.rfind('/') {
            Some(idx) => &self.location[..idx],
            None => "",
        }
    }
}

/// Username/password pair used for `accurev login`
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
