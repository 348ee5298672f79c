// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ar_client::AccurevClient;
use std::collections::BTreeSet;

use crate::criteria::SourceCriteria;
use crate::discovery_traits::SourceTrait;
use crate::event::HeadEvent;
use crate::head::HeadCategory;
use crate::listener::TaskListener;
use crate::observer::HeadObserver;
use crate::request::DiscoveryRequest;
use crate::source::AccurevSource;

/// Accumulates what one discovery pass has to fetch.
///
/// Wants only ever turn on: every setter ORs into the current value. The
/// context is consumed by [`DiscoveryContext::new_request`], so the request
/// sees a frozen copy of whatever the rules declared.
pub struct DiscoveryContext<'a> {
    criteria: Option<&'a dyn SourceCriteria>,
    observer: &'a mut dyn HeadObserver,
    event: Option<&'a HeadEvent>,
    want_streams: bool,
    want_snapshots: bool,
    included: BTreeSet<HeadCategory>,
}

impl<'a> DiscoveryContext<'a> {
    pub fn new(criteria: Option<&'a dyn SourceCriteria>, observer: &'a mut dyn HeadObserver) -> Self {
        Self {
            criteria,
            observer,
            event: None,
            want_streams: false,
            want_snapshots: false,
            included: BTreeSet::new(),
        }
    }

    pub fn want_streams(&mut self, want: bool) -> &mut Self {
        self.want_streams |= want;
        self
    }

    pub fn want_snapshots(&mut self, want: bool) -> &mut Self {
        self.want_snapshots |= want;
        self
    }

    pub fn is_want_streams(&self) -> bool {
        self.want_streams
    }

    pub fn is_want_snapshots(&self) -> bool {
        self.want_snapshots
    }

    pub fn include_category(&mut self, category: HeadCategory) -> &mut Self {
        self.included.insert(category);
        self
    }

    pub fn is_category_included(&self, category: HeadCategory) -> bool {
        self.included.contains(&category)
    }

    pub fn with_event(&mut self, event: &'a HeadEvent) -> &mut Self {
        self.event = Some(event);
        self
    }

    /// Apply one rule: let it declare its fetches and record the categories it accepts
    pub fn with_trait<T: SourceTrait + ?Sized>(&mut self, source_trait: &T) -> &mut Self {
        source_trait.decorate_context(self);
        for category in HeadCategory::ALL {
            if source_trait.include_category(category) {
                self.included.insert(category);
            }
        }
        self
    }

    pub fn with_traits<'t, T>(&mut self, traits: impl IntoIterator<Item = &'t T>) -> &mut Self
    where
        T: SourceTrait + ?Sized + 't,
    {
        for source_trait in traits {
            self.with_trait(source_trait);
        }
        self
    }

    pub fn new_request(
        self,
        source: &'a AccurevSource,
        client: &'a dyn AccurevClient,
        listener: &'a mut dyn TaskListener,
    ) -> DiscoveryRequest<'a> {
        DiscoveryRequest::new(
            source,
            client,
            self.criteria,
            self.observer,
            self.event,
            listener,
            self.want_streams,
            self.want_snapshots,
            self.included,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery_traits::{SnapshotDiscoveryTrait, StreamDiscoveryTrait};
    use crate::observer::CollectingObserver;

    #[test]
    fn test_wants_are_monotonic() {
        let mut observer = CollectingObserver::new();
        let mut context = DiscoveryContext::new(None, &mut observer);
        context.want_streams(true).want_streams(false);
        assert!(context.is_want_streams());
        assert!(!context.is_want_snapshots());
        context.want_snapshots(false);
        assert!(!context.is_want_snapshots());
    }

    #[test]
    fn test_stream_trait_idempotent() {
        let mut observer = CollectingObserver::new();
        let mut once = DiscoveryContext::new(None, &mut observer);
        once.with_trait(&StreamDiscoveryTrait);
        let once_wants = (once.is_want_streams(), once.is_want_snapshots());
        drop(once);

        let mut observer = CollectingObserver::new();
        let mut twice = DiscoveryContext::new(None, &mut observer);
        twice.with_trait(&StreamDiscoveryTrait).with_trait(&StreamDiscoveryTrait);
        assert_eq!(once_wants, (twice.is_want_streams(), twice.is_want_snapshots()));
        assert_eq!(once_wants, (true, false));
    }

    #[test]
    fn test_traits_record_categories() {
        let mut observer = CollectingObserver::new();
        let mut context = DiscoveryContext::new(None, &mut observer);
        let traits: [&dyn SourceTrait; 2] = [&StreamDiscoveryTrait, &SnapshotDiscoveryTrait];
        context.with_traits(traits);
        assert!(context.is_category_included(HeadCategory::Uncategorized));
        assert!(context.is_category_included(HeadCategory::Tag));
        assert!(!context.is_category_included(HeadCategory::ChangeRequest));
        assert!(context.is_want_snapshots());
    }
}
