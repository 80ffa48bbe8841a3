//! Layers contract: higher layers may import lower ones, never the reverse.
//!
//! Layers are listed highest first. A layer may hold several sibling
//! modules; independent siblings must not import each other either. With
//! `containers` the same layering is checked inside each container, and
//! layer names are relative to it.

use std::collections::BTreeSet;

use serde::Deserialize;

use strata_core::chain::ChainFinder;
use strata_core::config::{ContractSpec, UnmatchedAlerting};
use strata_core::graph::ModuleGraph;

use crate::contract::{
    container_errors, module_exists, overlap_errors, parse_module_expression, parse_options,
    qualify, require_entries, scopes, Contract, ContractCheck, IgnoredImports,
};
use crate::error::ConfigError;
use crate::types::{ChainEvidence, Violation};

const FIELD: &str = "layers";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayersOptions {
    layers: Vec<LayerEntry>,
    #[serde(default)]
    containers: Vec<String>,
    #[serde(default)]
    ignore_imports: Vec<String>,
    #[serde(default)]
    exhaustive: bool,
    #[serde(default)]
    exhaustive_ignores: Vec<String>,
    #[serde(default)]
    unmatched_ignore_imports_alerting: UnmatchedAlerting,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayerEntry {
    /// `"a"`, `"a | b"` or `"a : b"`.
    Expression(String),
    Siblings(Vec<String>),
    Detailed(DetailedLayer),
}

/// `{ "modules": [...], "independent": bool }`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedLayer {
    modules: Vec<String>,
    #[serde(default = "default_true")]
    independent: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LayerModule {
    name: String,
    /// May be absent from a container.
    optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Layer {
    modules: Vec<LayerModule>,
    independent: bool,
}

impl Layer {
    fn parse(contract: &str, entry: &LayerEntry) -> Result<Self, ConfigError> {
        let (names, independent): (Vec<&str>, bool) = match entry {
            LayerEntry::Expression(text) => {
                let independent_split = text.contains('|');
                if independent_split && text.contains(':') {
                    return Err(malformed(
                        contract,
                        format!("layer '{}' mixes '|' and ':' separators", text.trim()),
                    ));
                }
                if independent_split {
                    (text.split('|').collect(), true)
                } else {
                    (text.split(':').collect(), false)
                }
            }
            LayerEntry::Siblings(names) => (names.iter().map(String::as_str).collect(), true),
            LayerEntry::Detailed(detailed) => (
                detailed.modules.iter().map(String::as_str).collect(),
                detailed.independent,
            ),
        };
        require_entries(contract, FIELD, names.len(), 1)?;

        let modules = names
            .into_iter()
            .map(|name| LayerModule::parse(contract, name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            modules,
            independent,
        })
    }
}

impl LayerModule {
    fn parse(contract: &str, text: &str) -> Result<Self, ConfigError> {
        let text = text.trim();
        let (name, optional) = match text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            Some(inner) => (inner.trim(), true),
            None => (text, false),
        };
        let expression = parse_module_expression(contract, FIELD, name)?;
        if expression.has_wildcard() {
            return Err(malformed(
                contract,
                format!("wildcards are not supported in layer '{}'", name),
            ));
        }
        Ok(Self {
            name: expression.as_str().to_string(),
            optional,
        })
    }
}

fn malformed(contract: &str, reason: String) -> ConfigError {
    ConfigError::MalformedEntry {
        contract: contract.to_string(),
        field: FIELD.to_string(),
        reason,
    }
}

/// A layer module present in the graph, with every module it covers.
struct Present {
    name: String,
    members: BTreeSet<String>,
}

/// Checks that no lower layer reaches a higher one, and that independent
/// siblings of a layer do not reach each other.
#[derive(Debug)]
pub struct LayersContract {
    name: String,
    layers: Vec<Layer>,
    containers: Vec<String>,
    exhaustive: bool,
    exhaustive_ignores: Vec<String>,
    ignored: IgnoredImports,
}

impl LayersContract {
    pub const KIND: &'static str = "layers";

    pub fn from_spec(spec: &ContractSpec) -> Result<Self, ConfigError> {
        let options: LayersOptions = parse_options(spec)?;
        require_entries(&spec.name, FIELD, options.layers.len(), 1)?;
        if options.exhaustive && options.containers.is_empty() {
            return Err(ConfigError::InvalidOptions {
                contract: spec.name.clone(),
                reason: "exhaustive layers need at least one container".to_string(),
            });
        }
        let layers = options
            .layers
            .iter()
            .map(|entry| Layer::parse(&spec.name, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: spec.name.clone(),
            layers,
            containers: options.containers,
            exhaustive: options.exhaustive,
            exhaustive_ignores: options
                .exhaustive_ignores
                .iter()
                .map(|m| m.trim().to_string())
                .collect(),
            ignored: IgnoredImports::parse(
                &spec.name,
                &options.ignore_imports,
                options.unmatched_ignore_imports_alerting,
            )?,
        })
    }

    /// Layer modules of one scope that exist in the graph, grouped by rank.
    fn present(&self, graph: &ModuleGraph, scope: Option<&str>) -> Vec<Vec<Present>> {
        self.layers
            .iter()
            .map(|layer| {
                layer
                    .modules
                    .iter()
                    .map(|module| qualify(scope, &module.name))
                    .filter(|name| module_exists(graph, name))
                    .map(|name| Present {
                        members: graph.subtree(&name),
                        name,
                    })
                    .collect()
            })
            .collect()
    }

    /// Children of `container` that no layer or exhaustive ignore declares.
    fn undeclared_children(&self, graph: &ModuleGraph, container: &str) -> Vec<String> {
        let declared: BTreeSet<String> = self
            .layers
            .iter()
            .flat_map(|layer| layer.modules.iter().map(|m| m.name.as_str()))
            .chain(self.exhaustive_ignores.iter().map(String::as_str))
            .map(|name| qualify(Some(container), name))
            .collect();
        graph
            .find_children(container)
            .into_iter()
            .filter(|child| !declared.contains(child))
            .collect()
    }
}

impl Contract for LayersContract {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        Self::KIND
    }

    fn validate(&self, graph: &ModuleGraph) -> Vec<ConfigError> {
        let mut errors = self.ignored.validate(&self.name, graph);
        errors.extend(container_errors(&self.name, graph, &self.containers));
        for scope in scopes(&self.containers) {
            let mut declared = Vec::new();
            for module in self.layers.iter().flat_map(|layer| &layer.modules) {
                let name = qualify(scope, &module.name);
                if module_exists(graph, &name) {
                    declared.push(name);
                } else if !module.optional {
                    errors.push(ConfigError::ModuleNotInGraph {
                        contract: self.name.clone(),
                        field: FIELD.to_string(),
                        module: name,
                    });
                }
            }
            errors.extend(overlap_errors(&self.name, FIELD, &declared));
        }
        errors
    }

    fn check(&self, graph: &ModuleGraph) -> ContractCheck {
        let (ignored, mut warnings) = self.ignored.for_check(graph);
        let finder = ChainFinder::new(graph).ignoring(&ignored);

        let mut violations = Vec::new();
        for scope in scopes(&self.containers) {
            let container = scope.map(String::from);
            let ranks = self.present(graph, scope);

            for (rank, layer) in ranks.iter().enumerate() {
                let higher: Vec<&Present> = ranks[..rank].iter().flatten().collect();
                let higher_members: Vec<&BTreeSet<String>> =
                    higher.iter().map(|p| &p.members).collect();

                for (i, lower) in layer.iter().enumerate() {
                    // Same-rank and lower modules other than `lower` are off limits,
                    // so every chain runs straight between the two layers.
                    let excluded: Vec<&BTreeSet<String>> = layer
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, p)| &p.members)
                        .chain(ranks[rank + 1..].iter().flatten().map(|p| &p.members))
                        .collect();

                    if !higher.is_empty() {
                        let chains =
                            finder.find_chains_to_groups(&lower.members, &higher_members, &excluded);
                        for (target, chain) in higher.iter().zip(chains) {
                            if let Some(chain) = chain {
                                violations.push(Violation::LayerBreach {
                                    container: container.clone(),
                                    higher: target.name.clone(),
                                    lower: lower.name.clone(),
                                    evidence: ChainEvidence::from_graph(graph, chain),
                                });
                            }
                        }
                    }

                    if self.layers[rank].independent && layer.len() > 1 {
                        let siblings: Vec<&Present> = layer
                            .iter()
                            .enumerate()
                            .filter(|(j, _)| *j != i)
                            .map(|(_, p)| p)
                            .collect();
                        let sibling_members: Vec<&BTreeSet<String>> =
                            siblings.iter().map(|p| &p.members).collect();
                        let outside: Vec<&BTreeSet<String>> = ranks
                            .iter()
                            .enumerate()
                            .filter(|(r, _)| *r != rank)
                            .flat_map(|(_, modules)| modules.iter().map(|p| &p.members))
                            .collect();
                        let chains =
                            finder.find_chains_to_groups(&lower.members, &sibling_members, &outside);
                        for (target, chain) in siblings.iter().zip(chains) {
                            if let Some(chain) = chain {
                                violations.push(Violation::SiblingBreach {
                                    container: container.clone(),
                                    importer: lower.name.clone(),
                                    importee: target.name.clone(),
                                    evidence: ChainEvidence::from_graph(graph, chain),
                                });
                            }
                        }
                    }
                }
            }

            if self.exhaustive {
                if let Some(container) = scope {
                    for child in self.undeclared_children(graph, container) {
                        warnings.push(format!(
                            "Container {} has a module that is not declared in any layer: {}",
                            container, child
                        ));
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

#[cfg(test)]
#[path = "layers_tests.rs"]
mod tests;
