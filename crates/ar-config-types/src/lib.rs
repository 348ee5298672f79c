// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed configuration sections.
//!
//! These are the strongly-typed views extracted from the merged configuration
//! JSON; `config-core` also uses them to generate the validation schema.

pub mod credentials;
pub mod source;

pub use credentials::CredentialEntry;
pub use source::{SourceSection, TraitKind, TraitRule};
