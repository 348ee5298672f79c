// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

#![allow(dead_code)]

use ar_client::{
    AccurevClient, ClientError, ClientResult, Depot, Element, Stream, StreamKind, Transaction,
};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const DEPOT: &str = "Sample";

pub fn time(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

/// In-memory server for one depot with call accounting
#[derive(Default)]
pub struct FakeClient {
    pub depots: Vec<String>,
    pub streams: Vec<Stream>,
    pub transactions: HashMap<String, u64>,
    pub unreachable: HashSet<String>,
    pub files: HashMap<String, Vec<String>>,
    pub dirs: HashMap<String, Vec<String>>,
    pub listing_error: Option<fn() -> ClientError>,
    calls: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            depots: vec![DEPOT.to_string()],
            ..Default::default()
        }
    }

    /// Add a stream whose latest transaction is `txn`
    pub fn stream(mut self, name: &str, kind: StreamKind, txn: u64) -> Self {
        self.streams.push(Stream::new(DEPOT, name, kind));
        self.transactions.insert(name.to_string(), txn);
        self
    }

    /// Add a stream that is listed but has since disappeared
    pub fn vanished(mut self, name: &str) -> Self {
        self.streams.push(Stream::new(DEPOT, name, StreamKind::Normal));
        self
    }

    pub fn unreachable(mut self, name: &str) -> Self {
        self.unreachable.insert(name.to_string());
        self
    }

    pub fn file(mut self, stream: &str, path: &str) -> Self {
        self.files
            .entry(stream.to_string())
            .or_default()
            .push(path.to_string());
        self
    }

    pub fn dir(mut self, stream: &str, path: &str) -> Self {
        self.dirs
            .entry(stream.to_string())
            .or_default()
            .push(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// `hist` calls for exactly this stream
    pub fn transaction_calls(&self, stream: &str) -> usize {
        let call = format!("hist {stream}");
        self.calls().iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_depot(&self, depot: &str) -> ClientResult<()> {
        if let Some(error) = self.listing_error {
            return Err(error());
        }
        if self.depots.iter().any(|d| d == depot) {
            Ok(())
        } else {
            Err(ClientError::NotFound(format!("Unknown depot: {depot}")))
        }
    }
}

impl AccurevClient for FakeClient {
    fn fetch_depot(&self, name: &str) -> ClientResult<Option<Depot>> {
        self.record(format!("depot {name}"));
        Ok(self.depots.iter().position(|d| d == name).map(|i| Depot {
            number: i as u32 + 1,
            name: name.to_string(),
            case_sensitive: false,
        }))
    }

    /// Returns every stream regardless of kind so the request's own filter is exercised
    fn list_streams(&self, depot: &str) -> ClientResult<Vec<Stream>> {
        self.record(format!("streams {depot}"));
        self.check_depot(depot)?;
        Ok(self.streams.clone())
    }

    fn list_snapshots(&self, depot: &str) -> ClientResult<Vec<Stream>> {
        self.record(format!("snapshots {depot}"));
        self.check_depot(depot)?;
        Ok(self
            .streams
            .iter()
            .filter(|s| s.kind.is_snapshot())
            .cloned()
            .collect())
    }

    fn fetch_transaction(&self, _depot: &str, stream: &str) -> ClientResult<Transaction> {
        self.record(format!("hist {stream}"));
        if self.unreachable.contains(stream) {
            return Err(ClientError::Connection(format!("lost connection while reading {stream}")));
        }
        match self.transactions.get(stream) {
            Some(&id) => Ok(Transaction::new(id, time(1_600_000_000 + id as i64))),
            None => Err(ClientError::NotFound(format!("Unknown stream: {stream}"))),
        }
    }

    fn stat_element(
        &self,
        _depot: &str,
        stream: &str,
        path: &str,
        at: Option<u64>,
    ) -> ClientResult<Option<Element>> {
        self.record(format!("stat {stream} {path} {at:?}"));
        let listed = |entries: &HashMap<String, Vec<String>>| {
            entries
                .get(stream)
                .is_some_and(|paths| paths.iter().any(|p| p == path))
        };
        if listed(&self.dirs) {
            return Ok(Some(Element::directory(path, "(backed)")));
        }
        Ok(listed(&self.files).then(|| Element::new(path, "(backed)")))
    }

    fn list_children(
        &self,
        _depot: &str,
        stream: &str,
        dir: &str,
        _at: Option<u64>,
    ) -> ClientResult<Vec<Element>> {
        self.record(format!("children {stream} {dir}"));
        Ok(self
            .files
            .get(stream)
            .map(|files| {
                files
                    .iter()
                    .filter(|f| dir.is_empty() && !f.contains('/'))
                    .map(|f| Element::new(f.as_str(), "(backed)"))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn cat_file(
        &self,
        _depot: &str,
        stream: &str,
        path: &str,
        _at: Option<u64>,
    ) -> ClientResult<Vec<u8>> {
        self.record(format!("cat {stream} {path}"));
        Ok(format!("{stream}:{path}").into_bytes())
    }
}
