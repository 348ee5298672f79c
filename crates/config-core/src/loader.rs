// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! TOML loading and JSON validation functionality

use jsonschema::{Draft, JSONSchema};
use serde_json::Value as J;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{ConfigError, Result};
use crate::Scope;

/// Parse TOML string to JSON value for schema validation
pub fn parse_toml_to_json(toml_str: &str) -> Result<J> {
    let toml: toml::Value = toml::from_str(toml_str)?;
    Ok(serde_json::to_value(toml)?)
}

/// JSON schema generated from [`crate::SchemaRoot`]
pub fn schema_json() -> &'static J {
    static SCHEMA: OnceLock<J> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let rs = schemars::schema_for!(crate::schema::SchemaRoot);
        serde_json::to_value(rs).unwrap_or(J::Null)
    })
}

/// Validate JSON against the configuration schema
pub fn validate_against_schema(v: &J) -> Result<()> {
    static VALIDATOR: OnceLock<std::result::Result<JSONSchema, String>> = OnceLock::new();
    let validator = VALIDATOR
        .get_or_init(|| {
            JSONSchema::options()
                .with_draft(Draft::Draft202012)
                .compile(schema_json())
                .map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| ConfigError::Invalid(format!("schema compilation failed: {e}")))?;

    if let Err(errors) = validator.validate(v) {
        return Err(ConfigError::Schema(errors.map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Represents a loaded configuration layer
#[derive(Debug, Clone)]
pub struct Layer {
    pub scope: Scope,
    pub json: J,
}

/// Load and validate a configuration layer from file
pub fn read_layer_from_file(path: &Path, scope: Scope) -> Result<Layer> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let json = parse_toml_to_json(&content)?;
    validate_against_schema(&json)?;

    Ok(Layer { scope, json })
}
