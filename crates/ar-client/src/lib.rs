// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! AccuRev client facade.
//!
//! This crate provides the narrow, synchronous interface the discovery code
//! talks to ([`AccurevClient`]), a process-backed implementation driving the
//! `accurev` command-line tool ([`CliAccurevClient`]), and the XML parsers for
//! the tool's `-fx` output.

pub mod cli;
pub mod client;
pub mod error;
pub mod model;
pub mod paths;
pub mod xml;

pub use cli::CliAccurevClient;
pub use client::AccurevClient;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use model::{Credentials, Depot, Element, Stream, StreamKind, Transaction};
pub use paths::{clean_path, convert_timestamp, depot_path};
