//! Maps contract type names to constructors.

use std::collections::BTreeMap;
use std::fmt;

use strata_core::config::ContractSpec;

use crate::contract::Contract;
use crate::error::ConfigError;
use crate::forbidden::ForbiddenContract;
use crate::independence::IndependenceContract;
use crate::layers::LayersContract;

/// Builds a contract from its configuration.
pub type ContractConstructor =
    Box<dyn Fn(&ContractSpec) -> Result<Box<dyn Contract>, ConfigError> + Send + Sync>;

/// Contract types known to an engine, keyed by the `type` field of a contract spec.
///
/// `ContractRegistry::default()` knows `forbidden`, `independence` and
/// `layers`; further types are added with [`register`](Self::register).
pub struct ContractRegistry {
    constructors: BTreeMap<String, ContractConstructor>,
}

impl ContractRegistry {
    /// A registry without any contract type.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Register `kind`, replacing any previous constructor for it.
    pub fn register<F>(&mut self, kind: &str, constructor: F)
    where
        F: Fn(&ContractSpec) -> Result<Box<dyn Contract>, ConfigError> + Send + Sync + 'static,
    {
        self.constructors.insert(kind.to_string(), Box::new(constructor));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, kind: &str, constructor: F) -> Self
    where
        F: Fn(&ContractSpec) -> Result<Box<dyn Contract>, ConfigError> + Send + Sync + 'static,
    {
        self.register(kind, constructor);
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered type names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn build(&self, spec: &ContractSpec) -> Result<Box<dyn Contract>, ConfigError> {
        let constructor =
            self.constructors
                .get(&spec.kind)
                .ok_or_else(|| ConfigError::UnknownContractType {
                    contract: spec.name.clone(),
                    kind: spec.kind.clone(),
                })?;
        constructor(spec)
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::empty()
            .with(ForbiddenContract::KIND, build_forbidden)
            .with(IndependenceContract::KIND, build_independence)
            .with(LayersContract::KIND, build_layers)
    }
}

fn build_forbidden(spec: &ContractSpec) -> Result<Box<dyn Contract>, ConfigError> {
    Ok(Box::new(ForbiddenContract::from_spec(spec)?))
}

fn build_independence(spec: &ContractSpec) -> Result<Box<dyn Contract>, ConfigError> {
    Ok(Box::new(IndependenceContract::from_spec(spec)?))
}

fn build_layers(spec: &ContractSpec) -> Result<Box<dyn Contract>, ConfigError> {
    Ok(Box::new(LayersContract::from_spec(spec)?))
}

impl fmt::Debug for ContractRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
