// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configurable discovery rules.
//!
//! Each rule declares what it needs fetched by decorating a
//! [`DiscoveryContext`] and which head categories it accepts afterwards.
//! Rules are resolved from configuration through [`trait_for`].

use ar_config_types::{TraitKind, TraitRule};
use std::fmt;

use crate::context::DiscoveryContext;
use crate::head::HeadCategory;

pub trait SourceTrait: fmt::Debug + Send + Sync {
    fn id(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// Declare the fetches this rule needs. Must be safe to apply repeatedly.
    fn decorate_context(&self, context: &mut DiscoveryContext<'_>);

    fn include_category(&self, category: HeadCategory) -> bool;
}

/// Discovers normal and gated streams
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamDiscoveryTrait;

impl SourceTrait for StreamDiscoveryTrait {
    fn id(&self) -> &'static str {
        "streams"
    }

    fn display_name(&self) -> &'static str {
        "Discover streams"
    }

    fn decorate_context(&self, context: &mut DiscoveryContext<'_>) {
        context.want_streams(true);
    }

    fn include_category(&self, category: HeadCategory) -> bool {
        category.is_uncategorized()
    }
}

/// Discovers snapshots as tags
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotDiscoveryTrait;

impl SourceTrait for SnapshotDiscoveryTrait {
    fn id(&self) -> &'static str {
        "snapshots"
    }

    fn display_name(&self) -> &'static str {
        "Discover snapshots"
    }

    fn decorate_context(&self, context: &mut DiscoveryContext<'_>) {
        context.want_snapshots(true);
    }

    fn include_category(&self, category: HeadCategory) -> bool {
        category == HeadCategory::Tag
    }
}

pub fn trait_for(kind: TraitKind) -> Box<dyn SourceTrait> {
    match kind {
        TraitKind::Streams => Box::new(StreamDiscoveryTrait),
        TraitKind::Snapshots => Box::new(SnapshotDiscoveryTrait),
    }
}

/// Enabled rules in configured order
pub fn traits_from_rules(rules: &[TraitRule]) -> Vec<Box<dyn SourceTrait>> {
    rules
        .iter()
        .filter(|rule| rule.enabled)
        .map(|rule| trait_for(rule.kind))
        .collect()
}
