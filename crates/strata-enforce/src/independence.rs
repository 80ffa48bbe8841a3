//! Independence contract: a set of module groups must not depend on each other.

use std::collections::BTreeSet;

use serde::Deserialize;

use strata_core::chain::ChainFinder;
use strata_core::config::{ContractSpec, UnmatchedAlerting};
use strata_core::expression::ModuleExpression;
use strata_core::graph::ModuleGraph;
use strata_core::types::overlaps;

use crate::contract::{
    container_errors, missing_module_errors, parse_module_expression, parse_options, qualify,
    require_entries, resolve_modules, scopes, Contract, ContractCheck, IgnoredImports,
};
use crate::error::ConfigError;
use crate::types::{ChainEvidence, Violation};

const FIELD: &str = "independent_modules";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IndependenceOptions {
    #[serde(alias = "modules")]
    independent_modules: Vec<GroupEntry>,
    #[serde(default)]
    containers: Vec<String>,
    #[serde(default)]
    ignore_imports: Vec<String>,
    #[serde(default)]
    unmatched_ignore_imports_alerting: UnmatchedAlerting,
}

/// A single module (each wildcard match is its own group) or a set of
/// modules forming one group.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupEntry {
    Module(String),
    Set(Vec<String>),
}

#[derive(Debug)]
enum GroupSpec {
    Module(ModuleExpression),
    Set(Vec<ModuleExpression>),
}

/// A resolved group: its label and every module it covers.
#[derive(Debug)]
struct Group {
    label: String,
    roots: Vec<String>,
    members: BTreeSet<String>,
}

/// Checks that no group reaches any other group, in either direction.
#[derive(Debug)]
pub struct IndependenceContract {
    name: String,
    containers: Vec<String>,
    scopes: Vec<Vec<GroupSpec>>,
    ignored: IgnoredImports,
}

impl IndependenceContract {
    pub const KIND: &'static str = "independence";

    pub fn from_spec(spec: &ContractSpec) -> Result<Self, ConfigError> {
        let options: IndependenceOptions = parse_options(spec)?;
        require_entries(&spec.name, FIELD, options.independent_modules.len(), 1)?;

        let parse = |entry: &str, scope: Option<&str>| {
            parse_module_expression(&spec.name, FIELD, &qualify(scope, entry.trim()))
        };
        let mut contract_scopes = Vec::new();
        for scope in scopes(&options.containers) {
            let mut groups = Vec::new();
            for entry in &options.independent_modules {
                groups.push(match entry {
                    GroupEntry::Module(module) => GroupSpec::Module(parse(module.as_str(), scope)?),
                    GroupEntry::Set(modules) => {
                        require_entries(&spec.name, FIELD, modules.len(), 1)?;
                        GroupSpec::Set(
                            modules
                                .iter()
                                .map(|m| parse(m.as_str(), scope))
                                .collect::<Result<Vec<_>, _>>()?,
                        )
                    }
                });
            }
            contract_scopes.push(groups);
        }

        Ok(Self {
            name: spec.name.clone(),
            containers: options.containers,
            scopes: contract_scopes,
            ignored: IgnoredImports::parse(
                &spec.name,
                &options.ignore_imports,
                options.unmatched_ignore_imports_alerting,
            )?,
        })
    }

    /// Resolve group specs against the graph; unmatched expressions are returned too.
    fn resolve_groups<'s>(
        &self,
        graph: &ModuleGraph,
        specs: &'s [GroupSpec],
    ) -> (Vec<Group>, Vec<&'s ModuleExpression>) {
        let mut groups = Vec::new();
        let mut missing = Vec::new();
        for spec in specs {
            match spec {
                GroupSpec::Module(expression) => {
                    let (modules, unmatched) = resolve_modules(graph, std::slice::from_ref(expression));
                    missing.extend(unmatched);
                    for module in modules {
                        groups.push(Group {
                            label: module.clone(),
                            members: graph.subtree(&module),
                            roots: vec![module],
                        });
                    }
                }
                GroupSpec::Set(expressions) => {
                    let (modules, unmatched) = resolve_modules(graph, expressions);
                    missing.extend(unmatched);
                    if modules.is_empty() {
                        continue;
                    }
                    let members = modules.iter().flat_map(|m| graph.subtree(m)).collect();
                    groups.push(Group {
                        label: format!("[{}]", modules.join(", ")),
                        roots: modules,
                        members,
                    });
                }
            }
        }
        (groups, missing)
    }
}

impl Contract for IndependenceContract {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        Self::KIND
    }

    fn validate(&self, graph: &ModuleGraph) -> Vec<ConfigError> {
        let mut errors = self.ignored.validate(&self.name, graph);
        errors.extend(container_errors(&self.name, graph, &self.containers));
        for specs in &self.scopes {
            let (groups, missing) = self.resolve_groups(graph, specs);
            errors.extend(missing_module_errors(&self.name, FIELD, &missing));
            if !missing.is_empty() {
                continue;
            }
            if let Err(e) = require_entries(&self.name, FIELD, groups.len(), 2) {
                errors.push(e);
            }
            for (i, first) in groups.iter().enumerate() {
                for second in &groups[i + 1..] {
                    for a in &first.roots {
                        for b in second.roots.iter().filter(|b| overlaps(a, b)) {
                            errors.push(ConfigError::OverlappingModules {
                                contract: self.name.clone(),
                                field: FIELD.to_string(),
                                first: a.clone(),
                                second: b.clone(),
                            });
                        }
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
        for specs in &self.scopes {
            let (groups, _) = self.resolve_groups(graph, specs);
            if groups.len() < 2 {
                continue;
            }
            // One search per group covers every ordered pair starting at it.
            for (i, source) in groups.iter().enumerate() {
                let others: Vec<&Group> = groups
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, group)| group)
                    .collect();
                let targets: Vec<&BTreeSet<String>> = others.iter().map(|g| &g.members).collect();
                let chains = finder.find_chains_to_groups(&source.members, &targets, &[]);
                for (target, chain) in others.iter().zip(chains) {
                    if let Some(chain) = chain {
                        violations.push(Violation::IndependenceBreach {
                            importer: source.label.clone(),
                            importee: target.label.clone(),
                            evidence: ChainEvidence::from_graph(graph, chain),
                        });
                    }
                }
            }
        }

        ContractCheck {
            violations,
            warnings,
        }
    }
}
