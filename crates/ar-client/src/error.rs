// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for AccuRev client operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Coarse classification used by callers to decide whether a failure is
/// fatal for a whole discovery pass or only for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The depot, stream or element does not exist (any more)
    NotFound,
    /// Transport or process failure while talking to the server
    Connection,
    /// Missing or invalid server URL, tool path or credentials
    Configuration,
    /// The operation does not apply to its target, such as reading a directory
    Unsupported,
}

/// Errors that can occur while running AccuRev commands
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("AccuRev executable not found: {0}")]
    ToolNotFound(PathBuf),

    #[error("accurev {command} failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Unexpected command output: {0}")]
    Parse(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Configuration(_) | ClientError::ToolNotFound(_) => {
                ErrorKind::Configuration
            }
            ClientError::Connection(_)
            | ClientError::CommandFailed { .. }
            | ClientError::Parse(_)
            | ClientError::Xml(_)
            | ClientError::Io(_) => ErrorKind::Connection,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for ClientError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ClientError::Xml(err.into())
    }
}
