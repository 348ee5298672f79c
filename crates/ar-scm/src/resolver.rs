// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ar_client::AccurevClient;
use tracing::debug;

use crate::error::ScmResult;
use crate::head::Head;
use crate::revision::Revision;

/// Maps a head to its current revision with one blocking round-trip.
///
/// Implementations do not cache; the discovery request memoizes results for
/// the duration of one pass.
#[cfg_attr(test, mockall::automock)]
pub trait RevisionResolver {
    fn resolve(&self, head: &Head) -> ScmResult<Revision>;
}

/// Resolves heads through the latest transaction of their stream
pub struct ClientRevisionResolver<'a> {
    client: &'a dyn AccurevClient,
    depot: &'a str,
}

impl<'a> ClientRevisionResolver<'a> {
    pub fn new(client: &'a dyn AccurevClient, depot: &'a str) -> Self {
        Self { client, depot }
    }
}

impl RevisionResolver for ClientRevisionResolver<'_> {
    fn resolve(&self, head: &Head) -> ScmResult<Revision> {
        debug!(depot = self.depot, head = %head, "Fetching latest transaction");
        let transaction = self.client.fetch_transaction(self.depot, head.name())?;
        Ok(Revision::from_transaction(head.clone(), &transaction))
    }
}
