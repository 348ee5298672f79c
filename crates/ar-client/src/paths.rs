// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Path and timestamp conversions for AccuRev output

use chrono::{DateTime, Utc};

/// Normalize an element location reported by AccuRev.
///
/// Backslashes become forward slashes and the depot-relative `/./` prefix is
/// removed, so `\.\src\main.rs` becomes `src/main.rs`.
pub fn clean_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    match path.strip_prefix("/./") {
        Some(rest) => rest.to_string(),
        None => path,
    }
}

/// Convert a workspace-style relative path into the depot-relative form the
/// tool expects on its command line. The empty path denotes the depot root.
pub fn depot_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        "/.".to_string()
    } else {
        format!("/./{}", trimmed)
    }
}

/// Convert an AccuRev timestamp (seconds since the epoch) into a UTC time.
pub fn convert_timestamp(seconds: &str) -> Option<DateTime<Utc>> {
    let seconds = seconds.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0)
}
