// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed extraction of configuration sections

use serde::de::DeserializeOwned;
use serde_json::Value as J;

use crate::error::{ConfigError, Result};

/// Extract the entire root configuration as a typed value
pub fn get<T: DeserializeOwned>(root: &J) -> Result<T> {
    serde_path_to_error::deserialize(root.clone()).map_err(|e| ConfigError::Extract {
        path: String::new(),
        message: e.to_string(),
    })
}

/// Extract a subsection at a dotted path; `None` when the path is absent
pub fn get_at<T: DeserializeOwned>(root: &J, dotted: &str) -> Result<Option<T>> {
    let mut cur = root;
    for p in dotted.split('.') {
        match cur.get(p) {
            Some(next) => cur = next,
            None => return Ok(None),
        }
    }
    serde_path_to_error::deserialize(cur.clone())
        .map(Some)
        .map_err(|e| ConfigError::Extract {
            path: dotted.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_config_types::{SourceSection, TraitKind, TraitRule};

    #[test]
    fn test_typed_extraction() {
        let json = serde_json::json!({
            "source": {
                "server-url": "accurev.example.com:5050",
                "depot": "Sample",
                "traits": [{"kind": "snapshots"}]
            }
        });
        let source: SourceSection = get_at(&json, "source").unwrap().unwrap();
        assert_eq!(source.depot.as_deref(), Some("Sample"));
        assert_eq!(source.effective_traits(), vec![TraitRule::enabled(TraitKind::Snapshots)]);

        assert!(get_at::<SourceSection>(&json, "missing").unwrap().is_none());
    }

    #[test]
    fn test_extraction_error_names_path() {
        let json = serde_json::json!({"source": {"traits": [{"kind": 3}]}});
        let err = get_at::<SourceSection>(&json, "source").unwrap_err();
        assert!(err.to_string().contains("traits[0].kind"), "{err}");
    }
}
