// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! AccuRev branch source.
//!
//! Discovers buildable heads (streams and snapshots) of a depot, resolves each
//! to its latest transaction, optionally inspects its files through a lazy
//! [`Probe`], and reports qualifying heads to a caller-supplied observer.
//!
//! One discovery pass is sequential and owns all of its state:
//! [`AccurevSource::retrieve`] folds the configured [`SourceTrait`]s into a
//! [`DiscoveryContext`], turns it into a [`DiscoveryRequest`] and runs it.

pub mod builder;
pub mod context;
pub mod credentials;
pub mod criteria;
pub mod discovery_traits;
pub mod error;
pub mod event;
pub mod head;
pub mod listener;
pub mod observer;
pub mod probe;
pub mod request;
pub mod resolver;
pub mod revision;
pub mod source;

pub use builder::{ScmBuilder, ScmConfig};
pub use context::DiscoveryContext;
pub use credentials::resolve_credentials;
pub use criteria::{FileExistsCriteria, SourceCriteria};
pub use discovery_traits::{SnapshotDiscoveryTrait, SourceTrait, StreamDiscoveryTrait};
pub use error::{ScmError, ScmResult};
pub use event::{HeadEvent, HeadEventKind};
pub use head::{CategoryDescriptor, Head, HeadCategory, CATEGORY_DESCRIPTORS};
pub use listener::{NullListener, StderrListener, TaskListener};
pub use observer::{CollectingObserver, HeadObserver};
pub use probe::{ChildEntry, Children, FileType, LazyProbe, Probe, ScmFile, ScmFileSystem};
pub use request::{DiscoveryRequest, RequestState};
pub use resolver::{ClientRevisionResolver, RevisionResolver};
pub use revision::Revision;
pub use source::{parse_server_url, AccurevSource};
