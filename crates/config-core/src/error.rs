// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("converting configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config schema validation failed:\n  - {}", .0.join("\n  - "))]
    Schema(Vec<String>),

    #[error("Path '{path}' extraction failed: {message}")]
    Extract { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}
