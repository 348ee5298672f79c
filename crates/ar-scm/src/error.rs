// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for discovery and probing

use ar_client::{ClientError, ErrorKind};
use thiserror::Error;

/// Result type alias for branch source operations
pub type ScmResult<T> = std::result::Result<T, ScmError>;

#[derive(Debug, Error)]
pub enum ScmError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ScmError {
    /// Whether the failure concerns the whole pass or a single candidate
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScmError::NotFound(_) => ErrorKind::NotFound,
            ScmError::Connection(_) => ErrorKind::Connection,
            ScmError::Configuration(_) => ErrorKind::Configuration,
            ScmError::Unsupported(_) => ErrorKind::Unsupported,
            ScmError::Client(e) => e.kind(),
        }
    }

    /// Only configuration failures end a discovery pass
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_only_configuration_is_pass_fatal() {
        assert!(ScmError::Configuration("depot is not set".into()).is_configuration());
        assert!(ScmError::Client(ClientError::ToolNotFound(PathBuf::from("accurev"))).is_configuration());

        let directory = ScmError::Unsupported("src is a directory".into());
        assert_eq!(directory.kind(), ErrorKind::Unsupported);
        assert!(!directory.is_configuration());
        assert!(!ScmError::NotFound("gone".into()).is_configuration());
        assert!(!ScmError::Connection("reset".into()).is_configuration());
    }
}
