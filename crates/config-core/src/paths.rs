// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration file path discovery

use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "accurev-scm";
pub const HOME_VAR: &str = "ARSCM_HOME";

/// Configuration file paths for the file-backed scopes
#[derive(Debug, Clone, Default)]
pub struct Paths {
    pub user: Option<PathBuf>,
    pub cli_config: Option<PathBuf>,
}

/// Discover configuration file paths for the current environment
pub fn discover_paths(cli_config: Option<&Path>) -> Paths {
    Paths {
        user: user_config_path(std::env::var_os(HOME_VAR).map(PathBuf::from)),
        cli_config: cli_config.map(Path::to_path_buf),
    }
}

/// `$ARSCM_HOME/config.toml`, else the platform config directory
fn user_config_path(home_override: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(home) = home_override.filter(|h| !h.as_os_str().is_empty()) {
        return Some(home.join("config.toml"));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}
