// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The narrow interface discovery code depends on

use crate::error::ClientResult;
use crate::model::{Credentials, Depot, Element, Stream, Transaction};

/// Synchronous access to one AccuRev server.
///
/// Every method is one blocking round-trip. Implementations must be usable
/// from several threads because independent discovery passes may share one
/// client while owning their own per-pass state.
pub trait AccurevClient: Send + Sync {
    /// Look up a depot by name; `None` when the server does not know it
    fn fetch_depot(&self, name: &str) -> ClientResult<Option<Depot>>;

    /// All normal and gated streams of a depot, in the order the server lists them
    fn list_streams(&self, depot: &str) -> ClientResult<Vec<Stream>>;

    /// All snapshot streams of a depot, in the order the server lists them
    fn list_snapshots(&self, depot: &str) -> ClientResult<Vec<Stream>>;

    /// Most recent transaction visible in `stream`
    fn fetch_transaction(&self, depot: &str, stream: &str) -> ClientResult<Transaction>;

    /// Status of one element in `stream`, optionally as of a transaction
    fn stat_element(
        &self,
        depot: &str,
        stream: &str,
        path: &str,
        at: Option<u64>,
    ) -> ClientResult<Option<Element>>;

    /// Immediate children of directory `dir` (the empty string is the root)
    fn list_children(
        &self,
        depot: &str,
        stream: &str,
        dir: &str,
        at: Option<u64>,
    ) -> ClientResult<Vec<Element>>;

    /// Raw content of a file element
    fn cat_file(
        &self,
        depot: &str,
        stream: &str,
        path: &str,
        at: Option<u64>,
    ) -> ClientResult<Vec<u8>>;

    /// Establish a session for subsequent commands
    fn login(&self, _credentials: &Credentials) -> ClientResult<()> {
        Ok(())
    }
}
