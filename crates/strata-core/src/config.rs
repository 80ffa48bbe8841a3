//! Configuration file loading for strata.
//!
//! Reads a JSON document listing the root packages to analyse and the
//! contracts to check. Contract options stay untyped here; each contract
//! type deserializes its own options when it is built.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level strata configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub root_packages: Vec<String>,
    #[serde(default)]
    pub contracts: Vec<ContractSpec>,
}

/// One configured contract: a name, a registry key, and type-specific options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl ContractSpec {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            options: Map::new(),
        }
    }

    /// Builder-style option setter.
    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    /// The options as a JSON object, ready for typed deserialization.
    pub fn options_value(&self) -> Value {
        Value::Object(self.options.clone())
    }
}

/// What to do when an `ignore_imports` entry matches nothing in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedAlerting {
    /// Treat it as a configuration error.
    #[default]
    Error,
    /// Report a warning alongside the contract result.
    Warn,
    None,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse config {path}: {reason}")]
    Parse { path: String, reason: String },
}

impl StrataConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigLoadError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
