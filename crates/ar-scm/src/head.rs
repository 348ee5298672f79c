// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Buildable heads and the categories they are grouped into

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping of heads used by traits to accept or reject what was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadCategory {
    /// Plain branches (normal and gated streams)
    Uncategorized,
    /// Short-lived work (workspaces, staging streams)
    ChangeRequest,
    /// Immutable points in history (snapshots)
    Tag,
}

impl HeadCategory {
    pub const ALL: [HeadCategory; 3] = [
        HeadCategory::Uncategorized,
        HeadCategory::ChangeRequest,
        HeadCategory::Tag,
    ];

    pub fn is_uncategorized(self) -> bool {
        self == HeadCategory::Uncategorized
    }
}

/// A category as presented to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDescriptor {
    pub category: HeadCategory,
    pub display_name: &'static str,
}

/// Categories as the server groups its stream types
pub const CATEGORY_DESCRIPTORS: [CategoryDescriptor; 5] = [
    CategoryDescriptor {
        category: HeadCategory::Uncategorized,
        display_name: "Streams",
    },
    CategoryDescriptor {
        category: HeadCategory::ChangeRequest,
        display_name: "Workspaces",
    },
    CategoryDescriptor {
        category: HeadCategory::Uncategorized,
        display_name: "Gated Streams",
    },
    CategoryDescriptor {
        category: HeadCategory::ChangeRequest,
        display_name: "Staging Streams",
    },
    CategoryDescriptor {
        category: HeadCategory::Tag,
        display_name: "Snapshots",
    },
];

/// A named reference that can be built
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Head {
    /// A normal or gated stream
    Stream(String),
    /// A snapshot (AccuRev's tag)
    Snapshot(String),
}

impl Head {
    pub fn stream(name: impl Into<String>) -> Self {
        Head::Stream(name.into())
    }

    pub fn snapshot(name: impl Into<String>) -> Self {
        Head::Snapshot(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Head::Stream(name) | Head::Snapshot(name) => name,
        }
    }

    pub fn pronoun(&self) -> &'static str {
        match self {
            Head::Stream(_) => "Stream",
            Head::Snapshot(_) => "Snapshot",
        }
    }

    pub fn category(&self) -> HeadCategory {
        match self {
            Head::Stream(_) => HeadCategory::Uncategorized,
            Head::Snapshot(_) => HeadCategory::Tag,
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, Head::Snapshot(_))
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
