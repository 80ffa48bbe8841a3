//! Read-time projection of a graph where whole subtrees act as single nodes.

use std::collections::BTreeSet;

use crate::graph::ModuleGraph;
use crate::types::{is_ancestor, DirectImport};

/// A view of a [`ModuleGraph`] in which every squashed container absorbs its
/// descendants. Imports touching a descendant are seen as touching the
/// container; imports inside one container disappear. The graph itself is
/// never modified.
#[derive(Debug, Clone)]
pub struct SquashedView<'g> {
    graph: &'g ModuleGraph,
    containers: Vec<String>,
}

impl<'g> SquashedView<'g> {
    pub(crate) fn new(graph: &'g ModuleGraph, containers: &[&str]) -> Self {
        let mut requested: Vec<String> = containers.iter().map(|c| c.to_string()).collect();
        requested.sort();
        requested.dedup();
        // A container nested in another one folds into the outer container.
        let containers = requested
            .iter()
            .filter(|c| !requested.iter().any(|outer| is_ancestor(outer, c)))
            .cloned()
            .collect();
        Self { graph, containers }
    }

    pub fn containers(&self) -> &[String] {
        &self.containers
    }

    /// The projected node a module belongs to.
    pub fn representative<'a>(&'a self, module: &'a str) -> &'a str {
        self.containers
            .iter()
            .find(|c| c.as_str() == module || is_ancestor(c, module))
            .map(String::as_str)
            .unwrap_or(module)
    }

    /// All projected nodes.
    pub fn modules(&self) -> BTreeSet<String> {
        self.graph
            .modules()
            .map(|m| self.representative(m).to_string())
            .collect()
    }

    /// All projected imports, excluding those internal to a container.
    pub fn imports(&self) -> BTreeSet<DirectImport> {
        self.graph
            .imports()
            .into_iter()
            .filter_map(|import| {
                let importer = self.representative(&import.importer);
                let importee = self.representative(&import.importee);
                (importer != importee).then(|| DirectImport::new(importer, importee))
            })
            .collect()
    }

    /// The underlying imports that project onto `importer -> importee`, sorted.
    pub fn imports_between(&self, importer: &str, importee: &str) -> Vec<DirectImport> {
        if importer == importee {
            return Vec::new();
        }
        let mut imports = Vec::new();
        for source in self.members(importer) {
            for target in self.graph.imports_of(&source) {
                if self.representative(target) == importee {
                    imports.push(DirectImport::new(source.as_str(), target));
                }
            }
        }
        imports.sort();
        imports
    }

    pub fn direct_import_exists(&self, importer: &str, importee: &str) -> bool {
        !self.imports_between(importer, importee).is_empty()
    }

    /// Graph modules that project onto `node`.
    fn members(&self, node: &str) -> BTreeSet<String> {
        if self.representative(node) != node {
            return BTreeSet::new();
        }
        if self.containers.iter().any(|c| c == node) {
            self.graph.subtree(node)
        } else if self.graph.contains_module(node) {
            [node.to_string()].into()
        } else {
            BTreeSet::new()
        }
    }
}
