//! Forbidden contract: importer modules must not import forbidden modules.

use std::collections::BTreeSet;

use serde::Deserialize;

use strata_core::chain::ChainFinder;
use strata_core::config::{ContractSpec, UnmatchedAlerting};
use strata_core::expression::ModuleExpression;
use strata_core::graph::ModuleGraph;
use strata_core::types::{overlaps, Chain};

use crate::contract::{
    container_errors, missing_module_errors, parse_module_expression, parse_options, qualify,
    require_entries, resolve_modules, scopes, Contract, ContractCheck, IgnoredImports,
};
use crate::error::ConfigError;
use crate::types::{ChainEvidence, Violation};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ForbiddenOptions {
    #[serde(alias = "source_modules")]
    importer_modules: Vec<String>,
    forbidden_modules: Vec<String>,
    #[serde(default)]
    allow_indirect_imports: bool,
    #[serde(default = "default_true")]
    as_packages: bool,
    #[serde(default)]
    containers: Vec<String>,
    #[serde(default)]
    ignore_imports: Vec<String>,
    #[serde(default)]
    unmatched_ignore_imports_alerting: UnmatchedAlerting,
}

fn default_true() -> bool {
    true
}

#[derive(Debug)]
struct ForbiddenScope {
    importers: Vec<ModuleExpression>,
    forbidden: Vec<ModuleExpression>,
}

/// Checks that no importer module imports any forbidden module.
///
/// With `allow_indirect_imports` off only direct imports count; with it on
/// any chain of imports counts. With `as_packages` (the default) a module
/// stands for its whole subtree on both sides.
#[derive(Debug)]
pub struct ForbiddenContract {
    name: String,
    containers: Vec<String>,
    scopes: Vec<ForbiddenScope>,
    allow_indirect_imports: bool,
    as_packages: bool,
    ignored: IgnoredImports,
}

impl ForbiddenContract {
    pub const KIND: &'static str = "forbidden";

    pub fn from_spec(spec: &ContractSpec) -> Result<Self, ConfigError> {
        let options: ForbiddenOptions = parse_options(spec)?;
        require_entries(&spec.name, "importer_modules", options.importer_modules.len(), 1)?;
        require_entries(&spec.name, "forbidden_modules", options.forbidden_modules.len(), 1)?;

        let parse_all = |field: &str, entries: &[String], scope: Option<&str>| {
            entries
                .iter()
                .map(|entry| parse_module_expression(&spec.name, field, &qualify(scope, entry.trim())))
                .collect::<Result<Vec<_>, _>>()
        };
        let mut contract_scopes = Vec::new();
        for scope in scopes(&options.containers) {
            contract_scopes.push(ForbiddenScope {
                importers: parse_all("importer_modules", options.importer_modules.as_slice(), scope)?,
                forbidden: parse_all("forbidden_modules", options.forbidden_modules.as_slice(), scope)?,
            });
        }

        Ok(Self {
            name: spec.name.clone(),
            containers: options.containers,
            scopes: contract_scopes,
            allow_indirect_imports: options.allow_indirect_imports,
            as_packages: options.as_packages,
            ignored: IgnoredImports::parse(
                &spec.name,
                &options.ignore_imports,
                options.unmatched_ignore_imports_alerting,
            )?,
        })
    }

    fn members(&self, graph: &ModuleGraph, module: &str) -> BTreeSet<String> {
        if self.as_packages {
            graph.subtree(module)
        } else {
            [module.to_string()].into()
        }
    }

    fn conflicts(&self, importer: &str, forbidden: &str) -> bool {
        if self.as_packages {
            overlaps(importer, forbidden)
        } else {
            importer == forbidden
        }
    }

    /// Direct imports from the importer side to the forbidden side, as two-module chains.
    fn direct_chains(&self, finder: &ChainFinder<'_>, importer: &str, forbidden: &str) -> Vec<Chain> {
        let squashed: Vec<&str> = if self.as_packages {
            vec![importer, forbidden]
        } else {
            Vec::new()
        };
        finder
            .graph()
            .squash(&squashed)
            .imports_between(importer, forbidden)
            .into_iter()
            .filter(|import| !finder.is_ignored(&import.importer, &import.importee))
            .map(|import| Chain::new(vec![import.importer, import.importee]))
            .collect()
    }

    fn indirect_chain(&self, finder: &ChainFinder<'_>, importer: &str, forbidden: &str) -> Option<Chain> {
        let graph = finder.graph();
        finder.find_shortest_chain(&self.members(graph, importer), &self.members(graph, forbidden))
    }
}

impl Contract for ForbiddenContract {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        Self::KIND
    }

    fn validate(&self, graph: &ModuleGraph) -> Vec<ConfigError> {
        let mut errors = self.ignored.validate(&self.name, graph);
        errors.extend(container_errors(&self.name, graph, &self.containers));
        for scope in &self.scopes {
            let (importers, missing) = resolve_modules(graph, &scope.importers);
            errors.extend(missing_module_errors(&self.name, "importer_modules", &missing));
            let (forbidden, missing) = resolve_modules(graph, &scope.forbidden);
            errors.extend(missing_module_errors(&self.name, "forbidden_modules", &missing));

            for importer in &importers {
                for target in &forbidden {
                    if self.conflicts(importer, target) {
                        errors.push(ConfigError::OverlappingModules {
                            contract: self.name.clone(),
                            field: "importer_modules/forbidden_modules".to_string(),
                            first: importer.clone(),
                            second: target.clone(),
                        });
                    }
                }
            }
        }
        errors
    }

    fn check(&self, graph: &ModuleGraph) -> ContractCheck {
        let (ignored, warnings) = self.ignored.for_check(graph);
        let finder = ChainFinder::new(graph).ignoring(&ignored);

        let mut violations = Vec::new();
        for scope in &self.scopes {
            let (importers, _) = resolve_modules(graph, &scope.importers);
            let (forbidden, _) = resolve_modules(graph, &scope.forbidden);
            for importer in &importers {
                for target in &forbidden {
                    if self.conflicts(importer, target) {
                        continue;
                    }
                    let chains: Vec<Chain> = if self.allow_indirect_imports {
                        self.indirect_chain(&finder, importer, target).into_iter().collect()
                    } else {
                        self.direct_chains(&finder, importer, target)
                    };
                    if chains.is_empty() {
                        continue;
                    }
                    violations.push(Violation::ForbiddenImport {
                        importer: importer.clone(),
                        forbidden: target.clone(),
                        chains: chains
                            .into_iter()
                            .map(|chain| ChainEvidence::from_graph(graph, chain))
                            .collect(),
                    });
                }
            }
        }

        ContractCheck {
            violations,
            warnings,
        }
    }
}
