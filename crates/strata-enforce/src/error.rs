use std::fmt;

/// A problem with a contract's configuration, found before any check runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Contract '{contract}': unknown contract type '{kind}'")]
    UnknownContractType { contract: String, kind: String },

    #[error("Duplicate contract name '{0}'")]
    DuplicateContractName(String),

    #[error("Contract '{contract}': invalid options: {reason}")]
    InvalidOptions { contract: String, reason: String },

    #[error("Contract '{contract}': malformed entry in {field}: {reason}")]
    MalformedEntry {
        contract: String,
        field: String,
        reason: String,
    },

    #[error("Contract '{contract}': module '{module}' in {field} is not in the graph")]
    ModuleNotInGraph {
        contract: String,
        field: String,
        module: String,
    },

    #[error("Contract '{contract}': ignored import '{expression}' matched no import in the graph")]
    UnmatchedIgnoreImport { contract: String, expression: String },

    #[error("Contract '{contract}': '{first}' and '{second}' in {field} overlap")]
    OverlappingModules {
        contract: String,
        field: String,
        first: String,
        second: String,
    },

    #[error("Contract '{contract}': {field} needs at least {min} entries, found {found}")]
    TooFewModules {
        contract: String,
        field: String,
        min: usize,
        found: usize,
    },

    #[error("No contract named '{0}' is configured")]
    UnknownContractName(String),
}

/// Every configuration error of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl ConfigErrors {
    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}
