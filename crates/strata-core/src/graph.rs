//! In-memory module import graph.
//!
//! Modules are petgraph nodes keyed by their dotted name. A sorted name
//! index backs the hierarchical queries: every descendant of `a.b` shares
//! the prefix `a.b.`, so descendants form one contiguous range of the index.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::squash::SquashedView;
use crate::types::{Chain, ChainLink, DirectImport, ImportDetail};

/// Directed graph of modules and the imports between them.
///
/// Each (importer, importee) pair is stored as one edge; imports of the same
/// pair from several source lines accumulate as [`ImportDetail`]s on it.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    graph: DiGraph<String, BTreeSet<ImportDetail>>,
    index: BTreeMap<String, NodeIndex>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. Adding an existing module is a no-op.
    pub fn add_module(&mut self, name: &str) {
        self.ensure_module(name);
    }

    /// Add an import edge without line metadata, creating missing endpoints.
    pub fn add_import(&mut self, importer: &str, importee: &str) {
        self.edge_details_mut(importer, importee);
    }

    /// Add an import edge annotated with the line that produced it.
    pub fn add_import_with_detail(
        &mut self,
        importer: &str,
        importee: &str,
        line_number: u32,
        line_contents: &str,
    ) {
        self.edge_details_mut(importer, importee).insert(ImportDetail {
            line_number,
            line_contents: line_contents.to_string(),
        });
    }

    /// All module names in lexical order.
    pub fn modules(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    pub fn contains_module(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct (importer, importee) pairs.
    pub fn import_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Every import edge, sorted by importer then importee.
    pub fn imports(&self) -> Vec<DirectImport> {
        let mut imports: Vec<DirectImport> = self
            .graph
            .edge_references()
            .map(|e| DirectImport::new(self.name(e.source()), self.name(e.target())))
            .collect();
        imports.sort();
        imports
    }

    pub fn direct_import_exists(&self, importer: &str, importee: &str) -> bool {
        match (self.node(importer), self.node(importee)) {
            (Some(from), Some(to)) => self.has_edge(from, to),
            _ => false,
        }
    }

    /// Line metadata of the direct import `importer -> importee`, if any.
    pub fn get_import_details(&self, importer: &str, importee: &str) -> Vec<ImportDetail> {
        let (Some(from), Some(to)) = (self.node(importer), self.node(importee)) else {
            return Vec::new();
        };
        self.graph
            .find_edge(from, to)
            .map(|edge| self.graph[edge].iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Modules directly imported by `module`, in lexical order.
    pub fn imports_of(&self, module: &str) -> Vec<&str> {
        self.neighbor_names(module, Direction::Outgoing)
    }

    /// Modules that directly import `module`, in lexical order.
    pub fn importers_of(&self, module: &str) -> Vec<&str> {
        self.neighbor_names(module, Direction::Incoming)
    }

    /// All modules below `module` in the namespace, in lexical order.
    pub fn find_descendants(&self, module: &str) -> Vec<&str> {
        let prefix = format!("{module}.");
        self.index
            .range(prefix.clone()..)
            .map(|(name, _)| name.as_str())
            .take_while(|name| name.starts_with(&prefix))
            .collect()
    }

    /// Direct children of `module`.
    ///
    /// A child is reported even when only its own descendants are present in
    /// the graph (`a.b.c` alone implies the child `a.b` of `a`).
    pub fn find_children(&self, module: &str) -> BTreeSet<String> {
        self.find_descendants(module)
            .into_iter()
            .filter_map(|name| name[module.len() + 1..].split('.').next())
            .map(|segment| format!("{module}.{segment}"))
            .collect()
    }

    /// The module itself (when present) plus all of its descendants.
    pub fn subtree(&self, module: &str) -> BTreeSet<String> {
        let mut modules: BTreeSet<String> = self
            .find_descendants(module)
            .into_iter()
            .map(String::from)
            .collect();
        if self.contains_module(module) {
            modules.insert(module.to_string());
        }
        modules
    }

    /// A read-only projection in which each container stands for its whole subtree.
    pub fn squash<'g>(&'g self, containers: &[&str]) -> SquashedView<'g> {
        SquashedView::new(self, containers)
    }

    /// Line numbers behind each link of `chain`.
    pub fn chain_links(&self, chain: &Chain) -> Vec<ChainLink> {
        chain
            .imports()
            .map(|import| {
                let line_numbers = self
                    .get_import_details(&import.importer, &import.importee)
                    .into_iter()
                    .map(|d| d.line_number)
                    .collect();
                ChainLink {
                    importer: import.importer,
                    importee: import.importee,
                    line_numbers,
                }
            })
            .collect()
    }

    // -- Crate-internal index access --

    pub(crate) fn node(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub(crate) fn name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    pub(crate) fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.find_edge(from, to).is_some()
    }

    /// Neighbours of a node ordered by module name.
    pub(crate) fn sorted_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbors.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        neighbors.dedup();
        neighbors
    }

    fn neighbor_names(&self, module: &str, direction: Direction) -> Vec<&str> {
        self.node(module)
            .map(|idx| {
                self.sorted_neighbors(idx, direction)
                    .into_iter()
                    .map(|n| self.name(n))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn ensure_module(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn edge_details_mut(&mut self, importer: &str, importee: &str) -> &mut BTreeSet<ImportDetail> {
        let from = self.ensure_module(importer);
        let to = self.ensure_module(importee);
        let edge = match self.graph.find_edge(from, to) {
            Some(edge) => edge,
            None => self.graph.add_edge(from, to, BTreeSet::new()),
        };
        &mut self.graph[edge]
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
