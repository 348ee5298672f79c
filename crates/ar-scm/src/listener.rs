// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Human-readable progress sinks.
//!
//! A listener only receives text for whoever started the pass; nothing in the
//! pipeline reads it back.

use std::io::Write;

pub trait TaskListener {
    fn line(&mut self, message: &str);
}

/// Writes progress lines to standard error
#[derive(Debug, Default)]
pub struct StderrListener;

impl TaskListener for StderrListener {
    fn line(&mut self, message: &str) {
        let _ = writeln!(std::io::stderr(), "{message}");
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullListener;

impl TaskListener for NullListener {
    fn line(&mut self, _message: &str) {}
}

impl TaskListener for Vec<String> {
    fn line(&mut self, message: &str) {
        self.push(message.to_string());
    }
}
