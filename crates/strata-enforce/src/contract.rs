//! The contract abstraction and helpers shared by the built-in contract types.

use std::collections::{BTreeSet, HashSet};

use serde::de::DeserializeOwned;

use strata_core::config::{ContractSpec, UnmatchedAlerting};
use strata_core::expression::{ImportExpression, ModuleExpression};
use strata_core::graph::ModuleGraph;
use strata_core::types::{overlaps, DirectImport};

use crate::error::ConfigError;
use crate::types::Violation;

/// A configured architectural rule.
///
/// Contracts are built from a [`ContractSpec`] by the registry, validated
/// against the graph, then checked. `check` may assume `validate` returned
/// no errors. Both only read the graph, so contracts can be checked from
/// several threads at once.
pub trait Contract: Send + Sync {
    fn name(&self) -> &str;

    /// Registry key of the contract type.
    fn kind(&self) -> &str;

    /// Configuration problems that only show up against a concrete graph.
    fn validate(&self, graph: &ModuleGraph) -> Vec<ConfigError>;

    fn check(&self, graph: &ModuleGraph) -> ContractCheck;
}

/// Result of checking one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractCheck {
    pub violations: Vec<Violation>,
    pub warnings: Vec<String>,
}

impl ContractCheck {
    pub fn kept(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Deserialize a contract's options into its typed option struct.
pub(crate) fn parse_options<T: DeserializeOwned>(spec: &ContractSpec) -> Result<T, ConfigError> {
    serde_json::from_value(spec.options_value()).map_err(|e| ConfigError::InvalidOptions {
        contract: spec.name.clone(),
        reason: e.to_string(),
    })
}

pub(crate) fn parse_module_expression(
    contract: &str,
    field: &str,
    entry: &str,
) -> Result<ModuleExpression, ConfigError> {
    ModuleExpression::parse(entry).map_err(|e| ConfigError::MalformedEntry {
        contract: contract.to_string(),
        field: field.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn require_entries(
    contract: &str,
    field: &str,
    found: usize,
    min: usize,
) -> Result<(), ConfigError> {
    if found < min {
        return Err(ConfigError::TooFewModules {
            contract: contract.to_string(),
            field: field.to_string(),
            min,
            found,
        });
    }
    Ok(())
}

/// `None` for an unscoped contract, otherwise one scope per container.
pub(crate) fn scopes(containers: &[String]) -> Vec<Option<&str>> {
    if containers.is_empty() {
        vec![None]
    } else {
        containers.iter().map(|c| Some(c.as_str())).collect()
    }
}

/// Absolute name of a module referenced relative to a container.
pub(crate) fn qualify(container: Option<&str>, name: &str) -> String {
    match container {
        Some(container) => format!("{}.{}", container, name),
        None => name.to_string(),
    }
}

/// True if the module is in the graph or is the namespace of some module that is.
pub(crate) fn module_exists(graph: &ModuleGraph, module: &str) -> bool {
    graph.contains_module(module) || !graph.find_descendants(module).is_empty()
}

/// Containers missing from the graph, and containers listed twice or nested in one another.
pub(crate) fn container_errors(
    contract: &str,
    graph: &ModuleGraph,
    containers: &[String],
) -> Vec<ConfigError> {
    let mut errors: Vec<ConfigError> = containers
        .iter()
        .filter(|container| !module_exists(graph, container))
        .map(|container| ConfigError::ModuleNotInGraph {
            contract: contract.to_string(),
            field: "containers".to_string(),
            module: container.clone(),
        })
        .collect();
    errors.extend(overlap_errors(contract, "containers", containers));
    errors
}

/// Resolve expressions to graph modules, keeping first-seen order.
///
/// Returns the modules and the expressions that matched nothing.
pub(crate) fn resolve_modules<'e>(
    graph: &ModuleGraph,
    expressions: &'e [ModuleExpression],
) -> (Vec<String>, Vec<&'e ModuleExpression>) {
    let mut modules = Vec::new();
    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    for expression in expressions {
        let resolved: Vec<String> = if expression.has_wildcard() {
            expression.resolve(graph).into_iter().collect()
        } else if module_exists(graph, expression.as_str()) {
            vec![expression.as_str().to_string()]
        } else {
            Vec::new()
        };
        if resolved.is_empty() {
            missing.push(expression);
        }
        for module in resolved {
            if seen.insert(module.clone()) {
                modules.push(module);
            }
        }
    }
    (modules, missing)
}

pub(crate) fn missing_module_errors(
    contract: &str,
    field: &str,
    missing: &[&ModuleExpression],
) -> Vec<ConfigError> {
    missing
        .iter()
        .map(|expression| ConfigError::ModuleNotInGraph {
            contract: contract.to_string(),
            field: field.to_string(),
            module: expression.to_string(),
        })
        .collect()
}

/// Every pair of listed modules where one is, or contains, the other.
pub(crate) fn overlap_errors(contract: &str, field: &str, modules: &[String]) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    for (i, first) in modules.iter().enumerate() {
        for second in &modules[i + 1..] {
            if overlaps(first, second) {
                errors.push(ConfigError::OverlappingModules {
                    contract: contract.to_string(),
                    field: field.to_string(),
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
    }
    errors
}

/// A contract's `ignore_imports` entries.
#[derive(Debug, Clone)]
pub struct IgnoredImports {
    expressions: Vec<ImportExpression>,
    alerting: UnmatchedAlerting,
}

impl IgnoredImports {
    pub fn parse(
        contract: &str,
        entries: &[String],
        alerting: UnmatchedAlerting,
    ) -> Result<Self, ConfigError> {
        let expressions = entries
            .iter()
            .map(|entry| {
                ImportExpression::parse(entry).map_err(|e| ConfigError::MalformedEntry {
                    contract: contract.to_string(),
                    field: "ignore_imports".to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            expressions,
            alerting,
        })
    }

    /// Imports matched in `graph`, plus the expressions that matched nothing.
    pub fn resolve(&self, graph: &ModuleGraph) -> (BTreeSet<DirectImport>, Vec<&ImportExpression>) {
        let mut imports = BTreeSet::new();
        let mut unmatched = Vec::new();
        for expression in &self.expressions {
            let matched = expression.resolve(graph);
            if matched.is_empty() {
                unmatched.push(expression);
            }
            imports.extend(matched);
        }
        (imports, unmatched)
    }

    pub fn validate(&self, contract: &str, graph: &ModuleGraph) -> Vec<ConfigError> {
        if self.alerting != UnmatchedAlerting::Error {
            return Vec::new();
        }
        let (_, unmatched) = self.resolve(graph);
        unmatched
            .into_iter()
            .map(|expression| ConfigError::UnmatchedIgnoreImport {
                contract: contract.to_string(),
                expression: expression.to_string(),
            })
            .collect()
    }

    /// Imports to skip during a check, and warnings for unmatched entries.
    pub fn for_check(&self, graph: &ModuleGraph) -> (BTreeSet<DirectImport>, Vec<String>) {
        let (imports, unmatched) = self.resolve(graph);
        let warnings = match self.alerting {
            UnmatchedAlerting::Warn => unmatched
                .into_iter()
                .map(|expression| format!("No matches for ignored import {}.", expression))
                .collect(),
            UnmatchedAlerting::Error | UnmatchedAlerting::None => Vec::new(),
        };
        (imports, warnings)
    }
}
