// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! One discovery pass.
//!
//! A [`DiscoveryRequest`] lists the candidates its context asked for, then
//! pushes each one through exclusion, resolution, criteria and observation
//! in listing order. It is released when dropped, whatever way the pass
//! ended.

use ar_client::{AccurevClient, ErrorKind, Stream};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::criteria::SourceCriteria;
use crate::error::{ScmError, ScmResult};
use crate::event::HeadEvent;
use crate::head::{Head, HeadCategory};
use crate::listener::TaskListener;
use crate::observer::HeadObserver;
use crate::probe::{LazyProbe, Probe, ScmFileSystem};
use crate::resolver::RevisionResolver;
use crate::revision::Revision;
use crate::source::AccurevSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Created,
    StreamsFetched,
    SnapshotsFetched,
    Completed,
}

pub struct DiscoveryRequest<'a> {
    source: &'a AccurevSource,
    client: &'a dyn AccurevClient,
    criteria: Option<&'a dyn SourceCriteria>,
    observer: &'a mut dyn HeadObserver,
    event: Option<&'a HeadEvent>,
    listener: &'a mut dyn TaskListener,
    fetch_streams: bool,
    fetch_snapshots: bool,
    included: BTreeSet<HeadCategory>,
    state: RequestState,
    streams: Vec<Stream>,
    snapshots: Vec<Stream>,
    resolved: HashMap<Head, Revision>,
    observed: HashSet<Head>,
}

impl<'a> DiscoveryRequest<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        source: &'a AccurevSource,
        client: &'a dyn AccurevClient,
        criteria: Option<&'a dyn SourceCriteria>,
        observer: &'a mut dyn HeadObserver,
        event: Option<&'a HeadEvent>,
        listener: &'a mut dyn TaskListener,
        fetch_streams: bool,
        fetch_snapshots: bool,
        included: BTreeSet<HeadCategory>,
    ) -> Self {
        Self {
            source,
            client,
            criteria,
            observer,
            event,
            listener,
            fetch_streams,
            fetch_snapshots,
            included,
            state: RequestState::Created,
            streams: Vec::new(),
            snapshots: Vec::new(),
            resolved: HashMap::new(),
            observed: HashSet::new(),
        }
    }

    pub fn is_fetch_streams(&self) -> bool {
        self.fetch_streams
    }

    pub fn is_fetch_snapshots(&self) -> bool {
        self.fetch_snapshots
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn snapshots(&self) -> &[Stream] {
        &self.snapshots
    }

    pub fn resolved(&self, head: &Head) -> Option<&Revision> {
        self.resolved.get(head)
    }

    pub fn listener(&mut self) -> &mut dyn TaskListener {
        &mut *self.listener
    }

    /// Whether the head is ruled out before any resolution happens
    pub fn is_excluded(&self, head: &Head) -> bool {
        if !self.included.contains(&head.category()) {
            return true;
        }
        if let Some(includes) = self.observer.includes() {
            if !includes.contains(head) {
                return true;
            }
        }
        self.event.is_some_and(|event| !event.mentions(head))
    }

    /// Run one candidate through the pipeline.
    ///
    /// Returns `true` once the observer no longer wants candidates. Failures
    /// specific to the candidate are reported and swallowed; configuration
    /// failures end the pass. A head is handed to the observer at most once
    /// per pass.
    pub fn process(&mut self, head: Head, resolver: &dyn RevisionResolver) -> ScmResult<bool> {
        if !self.observer.is_observing() {
            return Ok(true);
        }
        if self.is_excluded(&head) {
            debug!(head = %head, "Excluded");
            return Ok(false);
        }
        if self.observed.contains(&head) {
            debug!(head = %head, "Already observed");
            return Ok(false);
        }
        self.listener
            .line(&format!("Checking {} {}", head.pronoun().to_lowercase(), head));

        let revision = match self.resolved.get(&head) {
            Some(revision) => revision.clone(),
            None => match resolver.resolve(&head) {
                Ok(revision) => {
                    self.resolved.insert(head.clone(), revision.clone());
                    revision
                }
                Err(e) => return self.skip(&head, e),
            },
        };

        if let Some(criteria) = self.criteria {
            let client = self.client;
            let source: &'a AccurevSource = self.source;
            let probe_head = head.clone();
            let probe_revision = revision.clone();
            let probe = LazyProbe::new(move || {
                Ok(Box::new(ScmFileSystem::new(
                    client,
                    source.depot(),
                    probe_head.clone(),
                    Some(probe_revision.clone()),
                )) as Box<dyn Probe + '_>)
            });
            match criteria.is_head(&head, &revision, &probe, &mut *self.listener) {
                Ok(true) => self.listener.line("    Met criteria"),
                Ok(false) => {
                    self.listener.line("    Does not meet criteria");
                    return Ok(!self.observer.is_observing());
                }
                Err(e) => return self.skip(&head, e),
            }
        }

        debug!(head = %head, revision = %revision, "Observed");
        self.observed.insert(head.clone());
        self.observer.observe(head, revision);
        Ok(!self.observer.is_observing())
    }

    fn skip(&mut self, head: &Head, error: ScmError) -> ScmResult<bool> {
        if error.is_configuration() {
            return Err(error);
        }
        warn!(head = %head, "Skipping {}: {}", head.pronoun().to_lowercase(), error);
        self.listener
            .line(&format!("    Skipping {} {}: {}", head.pronoun().to_lowercase(), head, error));
        Ok(!self.observer.is_observing())
    }

    /// List candidates of one kind; a depot that vanished yields none
    fn list(&mut self, snapshots: bool) -> ScmResult<Vec<Stream>> {
        let source = self.source;
        let depot = source.depot();
        let listed = if snapshots {
            self.client.list_snapshots(depot)
        } else {
            self.client.list_streams(depot)
        };
        match listed {
            Ok(streams) => Ok(streams
                .into_iter()
                .filter(|stream| {
                    if snapshots {
                        stream.kind.is_snapshot()
                    } else {
                        stream.kind.is_stream_head()
                    }
                })
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(depot, "Listing failed: {}", e);
                self.listener.line(&format!("  {e}"));
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch what the context asked for and process every candidate in order
    pub fn run(&mut self, resolver: &dyn RevisionResolver) -> ScmResult<()> {
        let mut stopped = false;

        if self.fetch_streams {
            self.listener.line("Checking streams...");
            self.streams = self.list(false)?;
            self.state = RequestState::StreamsFetched;
            let candidates: Vec<Head> = self.streams.iter().map(|s| Head::stream(&s.name)).collect();
            let count = candidates.len();
            for head in candidates {
                if self.process(head, resolver)? {
                    stopped = true;
                    break;
                }
            }
            self.listener
                .line(&format!("  {count} streams were processed"));
        }

        if self.fetch_snapshots && !stopped {
            self.listener.line("Checking snapshots...");
            self.snapshots = self.list(true)?;
            self.state = RequestState::SnapshotsFetched;
            let candidates: Vec<Head> =
                self.snapshots.iter().map(|s| Head::snapshot(&s.name)).collect();
            let count = candidates.len();
            for head in candidates {
                if self.process(head, resolver)? {
                    break;
                }
            }
            self.listener
                .line(&format!("  {count} snapshots were processed"));
        }

        Ok(())
    }

    /// Release everything the pass holds. Later calls do nothing.
    pub fn close(&mut self) {
        if self.state == RequestState::Completed {
            return;
        }
        self.state = RequestState::Completed;
        self.streams.clear();
        self.snapshots.clear();
        self.resolved.clear();
        self.observed.clear();
        info!(depot = self.source.depot(), "Discovery pass finished");
        self.listener
            .line(&format!("Finished examining {}", self.source.depot()));
    }
}

impl Drop for DiscoveryRequest<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DiscoveryContext;
    use crate::discovery_traits::{SnapshotDiscoveryTrait, StreamDiscoveryTrait};
    use crate::observer::CollectingObserver;
    use crate::resolver::MockRevisionResolver;
    use ar_client::{ClientError, ClientResult, Depot, Element, Transaction};
    use chrono::Utc;
    use mockall::predicate::eq;

    /// Client that must not be reached
    struct Offline;

    impl AccurevClient for Offline {
        fn fetch_depot(&self, _: &str) -> ClientResult<Option<Depot>> {
            panic!("offline")
        }
        fn list_streams(&self, _: &str) -> ClientResult<Vec<Stream>> {
            panic!("offline")
        }
        fn list_snapshots(&self, _: &str) -> ClientResult<Vec<Stream>> {
            panic!("offline")
        }
        fn fetch_transaction(&self, _: &str, _: &str) -> ClientResult<Transaction> {
            panic!("offline")
        }
        fn stat_element(&self, _: &str, _: &str, _: &str, _: Option<u64>) -> ClientResult<Option<Element>> {
            panic!("offline")
        }
        fn list_children(&self, _: &str, _: &str, _: &str, _: Option<u64>) -> ClientResult<Vec<Element>> {
            panic!("offline")
        }
        fn cat_file(&self, _: &str, _: &str, _: &str, _: Option<u64>) -> ClientResult<Vec<u8>> {
            panic!("offline")
        }
    }

    #[test]
    fn test_excluded_category_never_resolved() {
        let source = AccurevSource::new("localhost", "Sample");
        let mut observer = CollectingObserver::new();
        let mut lines: Vec<String> = Vec::new();
        let mut resolver = MockRevisionResolver::new();
        resolver.expect_resolve().never();

        let mut context = DiscoveryContext::new(None, &mut observer);
        context.with_trait(&StreamDiscoveryTrait);
        let mut request = context.new_request(&source, &Offline, &mut lines);
        assert!(request.is_excluded(&Head::snapshot("Sample_1.0")));
        assert!(!request.process(Head::snapshot("Sample_1.0"), &resolver).unwrap());
    }

    #[test]
    fn test_configuration_failure_escapes() {
        let source = AccurevSource::new("localhost", "Sample");
        let mut observer = CollectingObserver::new();
        let mut lines: Vec<String> = Vec::new();
        let mut resolver = MockRevisionResolver::new();
        resolver
            .expect_resolve()
            .with(eq(Head::snapshot("Sample_1.0")))
            .times(1)
            .returning(|_| Err(ClientError::ToolNotFound("accurev".into()).into()));

        let mut context = DiscoveryContext::new(None, &mut observer);
        context.with_trait(&SnapshotDiscoveryTrait);
        let mut request = context.new_request(&source, &Offline, &mut lines);
        let err = request.process(Head::snapshot("Sample_1.0"), &resolver).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_stopped_observer_short_circuits() {
        let source = AccurevSource::new("localhost", "Sample");
        let mut observer = CollectingObserver::new().with_limit(0);
        let mut lines: Vec<String> = Vec::new();
        let mut resolver = MockRevisionResolver::new();
        resolver.expect_resolve().never();

        let mut context = DiscoveryContext::new(None, &mut observer);
        context.with_trait(&StreamDiscoveryTrait);
        let mut request = context.new_request(&source, &Offline, &mut lines);
        assert!(request.process(Head::stream("Sample"), &resolver).unwrap());
    }

    /// Rejects every head without looking at its files
    struct RejectAll;

    impl SourceCriteria for RejectAll {
        fn is_head(
            &self,
            _head: &Head,
            _revision: &Revision,
            _probe: &LazyProbe<'_>,
            _listener: &mut dyn TaskListener,
        ) -> ScmResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_resolution_memoized() {
        let source = AccurevSource::new("localhost", "Sample");
        let mut observer = CollectingObserver::new();
        let mut lines: Vec<String> = Vec::new();
        let mut resolver = MockRevisionResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|head| Ok(Revision::new(head.clone(), 5, Utc::now())));

        let criteria = RejectAll;
        let mut context = DiscoveryContext::new(Some(&criteria), &mut observer);
        context.with_trait(&StreamDiscoveryTrait);
        let mut request = context.new_request(&source, &Offline, &mut lines);
        request.process(Head::stream("Sample"), &resolver).unwrap();
        request.process(Head::stream("Sample"), &resolver).unwrap();
        assert_eq!(request.resolved(&Head::stream("Sample")).map(Revision::transaction), Some(5));
    }

    #[test]
    fn test_observed_head_emitted_once() {
        let source = AccurevSource::new("localhost", "Sample");
        let mut observer = CollectingObserver::new();
        let mut lines: Vec<String> = Vec::new();
        let mut resolver = MockRevisionResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|head| Ok(Revision::new(head.clone(), 5, Utc::now())));

        {
            let mut context = DiscoveryContext::new(None, &mut observer);
            context.with_trait(&StreamDiscoveryTrait);
            let mut request = context.new_request(&source, &Offline, &mut lines);
            for _ in 0..3 {
                assert!(!request.process(Head::stream("Sample"), &resolver).unwrap());
            }
        }
        assert_eq!(observer.results().len(), 1);
    }
}
