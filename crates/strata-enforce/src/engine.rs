use std::collections::HashSet;

use rayon::prelude::*;

use strata_core::config::ContractSpec;
use strata_core::graph::ModuleGraph;

use crate::contract::Contract;
use crate::error::{ConfigError, ConfigErrors};
use crate::registry::ContractRegistry;
use crate::types::{ContractReport, Report};

/// Builds, validates and checks the configured contracts against a graph.
///
/// A run either reports every configuration problem at once, or checks every
/// contract; it never returns a partial report.
#[derive(Debug, Default)]
pub struct ContractEngine {
    registry: ContractRegistry,
    limit: Vec<String>,
}

impl ContractEngine {
    pub fn new(registry: ContractRegistry) -> Self {
        Self {
            registry,
            limit: Vec::new(),
        }
    }

    /// Only check the named contracts. Every contract is still built and
    /// validated; an empty list checks them all.
    pub fn with_limit<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.limit = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    /// Build and validate every spec. Returns the contracts to check, in
    /// configuration order, or all configuration errors found.
    pub fn configure(
        &self,
        graph: &ModuleGraph,
        specs: &[ContractSpec],
    ) -> Result<Vec<Box<dyn Contract>>, ConfigErrors> {
        let mut errors = Vec::new();
        let mut contracts = Vec::new();
        for spec in specs {
            match self.registry.build(spec) {
                Ok(contract) => contracts.push(contract),
                Err(e) => errors.push(e),
            }
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for spec in specs {
            if !seen.insert(spec.name.as_str()) && reported.insert(spec.name.as_str()) {
                errors.push(ConfigError::DuplicateContractName(spec.name.clone()));
            }
        }

        for name in &self.limit {
            if !seen.contains(name.as_str()) {
                errors.push(ConfigError::UnknownContractName(name.clone()));
            }
        }

        for contract in &contracts {
            errors.extend(contract.validate(graph));
        }

        if !errors.is_empty() {
            return Err(ConfigErrors(errors));
        }

        if !self.limit.is_empty() {
            contracts.retain(|c| self.limit.iter().any(|name| name == c.name()));
        }
        Ok(contracts)
    }

    /// Check already configured contracts in parallel. Reports keep the
    /// order of `contracts`.
    pub fn check_all(&self, graph: &ModuleGraph, contracts: &[Box<dyn Contract>]) -> Report {
        let reports: Vec<ContractReport> = contracts
            .par_iter()
            .map(|contract| {
                let check = contract.check(graph);
                ContractReport {
                    name: contract.name().to_string(),
                    kind: contract.kind().to_string(),
                    kept: check.kept(),
                    violations: check.violations,
                    warnings: check.warnings,
                }
            })
            .collect();
        Report { contracts: reports }
    }

    pub fn run(&self, graph: &ModuleGraph, specs: &[ContractSpec]) -> Result<Report, ConfigErrors> {
        let contracts = self.configure(graph, specs)?;
        Ok(self.check_all(graph, &contracts))
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
