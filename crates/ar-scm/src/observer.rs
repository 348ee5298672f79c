// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::collections::BTreeSet;

use crate::head::Head;
use crate::revision::Revision;

/// Receives qualifying heads from a discovery pass.
///
/// `is_observing` is polled once before each candidate; returning `false`
/// stops the pass after the candidate currently being processed.
pub trait HeadObserver {
    fn observe(&mut self, head: Head, revision: Revision);

    fn is_observing(&self) -> bool {
        true
    }

    /// Restrict the pass to these heads; `None` accepts every head
    fn includes(&self) -> Option<&BTreeSet<Head>> {
        None
    }
}

/// Collects observed heads in order, optionally stopping after `limit`
#[derive(Debug, Default, Clone)]
pub struct CollectingObserver {
    results: Vec<(Head, Revision)>,
    limit: Option<usize>,
    includes: Option<BTreeSet<Head>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_includes(mut self, heads: impl IntoIterator<Item = Head>) -> Self {
        self.includes = Some(heads.into_iter().collect());
        self
    }

    pub fn results(&self) -> &[(Head, Revision)] {
        &self.results
    }

    pub fn heads(&self) -> impl Iterator<Item = &Head> {
        self.results.iter().map(|(head, _)| head)
    }

    pub fn into_results(self) -> Vec<(Head, Revision)> {
        self.results
    }
}

impl HeadObserver for CollectingObserver {
    fn observe(&mut self, head: Head, revision: Revision) {
        self.results.push((head, revision));
    }

    fn is_observing(&self) -> bool {
        self.limit.map_or(true, |limit| self.results.len() < limit)
    }

    fn includes(&self) -> Option<&BTreeSet<Head>> {
        self.includes.as_ref()
    }
}
