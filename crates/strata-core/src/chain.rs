//! Shortest-chain search shared by every contract type.
//!
//! A search starts from every module of the `from` set at once (multi-source
//! BFS) and stops at the first module of a target set. Sources are seeded and
//! neighbours visited in lexical order, and the first discovery of a module
//! fixes its predecessor, so the chain chosen among equally short ones is the
//! same on every run.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use petgraph::graph::NodeIndex;
use petgraph::Direction;

use crate::graph::ModuleGraph;
use crate::types::{Chain, DirectImport};

/// Finds import chains in a graph, skipping a fixed set of ignored imports.
pub struct ChainFinder<'g> {
    graph: &'g ModuleGraph,
    ignored: HashSet<(NodeIndex, NodeIndex)>,
}

impl<'g> ChainFinder<'g> {
    pub fn new(graph: &'g ModuleGraph) -> Self {
        Self {
            graph,
            ignored: HashSet::new(),
        }
    }

    /// Exclude the given imports from traversal. Imports absent from the graph are skipped.
    pub fn ignoring<'a, I>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = &'a DirectImport>,
    {
        for import in imports {
            if let (Some(from), Some(to)) = (
                self.graph.node(&import.importer),
                self.graph.node(&import.importee),
            ) {
                self.ignored.insert((from, to));
            }
        }
        self
    }

    pub fn graph(&self) -> &'g ModuleGraph {
        self.graph
    }

    pub fn is_ignored(&self, importer: &str, importee: &str) -> bool {
        match (self.graph.node(importer), self.graph.node(importee)) {
            (Some(from), Some(to)) => self.ignored.contains(&(from, to)),
            _ => false,
        }
    }

    /// One shortest chain from any module in `from` to any module in `to`.
    pub fn find_shortest_chain(&self, from: &BTreeSet<String>, to: &BTreeSet<String>) -> Option<Chain> {
        self.find_chains_to_groups(from, &[to], &[]).pop().flatten()
    }

    /// Search from `from` towards several target groups in one pass.
    ///
    /// Returns, per group, a shortest chain reaching it. Target modules end a
    /// chain and are never expanded, so no chain passes through another
    /// group. A module listed in several groups belongs to the first one.
    /// Modules in any `excluded` set are never entered.
    pub fn find_chains_to_groups(
        &self,
        from: &BTreeSet<String>,
        groups: &[&BTreeSet<String>],
        excluded: &[&BTreeSet<String>],
    ) -> Vec<Option<Chain>> {
        let mut found: Vec<Option<Chain>> = vec![None; groups.len()];

        let mut target_of: HashMap<NodeIndex, usize> = HashMap::new();
        for (group, modules) in groups.iter().enumerate() {
            for idx in modules.iter().filter_map(|m| self.graph.node(m)) {
                target_of.entry(idx).or_insert(group);
            }
        }
        let mut remaining = target_of.values().collect::<HashSet<_>>().len();
        if remaining == 0 {
            return found;
        }

        let blocked: HashSet<NodeIndex> = excluded
            .iter()
            .flat_map(|modules| modules.iter())
            .filter_map(|m| self.graph.node(m))
            .collect();

        let mut parents: HashMap<NodeIndex, Option<NodeIndex>> = HashMap::new();
        let mut queue = VecDeque::new();
        for idx in from.iter().filter_map(|m| self.graph.node(m)) {
            if target_of.contains_key(&idx) || blocked.contains(&idx) {
                continue;
            }
            parents.insert(idx, None);
            queue.push_back(idx);
        }

        while let Some(current) = queue.pop_front() {
            for next in self.graph.sorted_neighbors(current, Direction::Outgoing) {
                if parents.contains_key(&next)
                    || blocked.contains(&next)
                    || self.ignored.contains(&(current, next))
                {
                    continue;
                }
                parents.insert(next, Some(current));
                match target_of.get(&next) {
                    Some(&group) => {
                        if found[group].is_none() {
                            found[group] = Some(self.build_chain(&parents, next));
                            remaining -= 1;
                            if remaining == 0 {
                                return found;
                            }
                        }
                    }
                    None => queue.push_back(next),
                }
            }
        }

        found
    }

    /// True if `chain` is a simple path of at least one import, none of them ignored.
    pub fn is_valid_chain(&self, chain: &Chain) -> bool {
        chain.len() >= 2
            && chain.is_simple()
            && chain.imports().all(|import| {
                match (
                    self.graph.node(&import.importer),
                    self.graph.node(&import.importee),
                ) {
                    (Some(from), Some(to)) => {
                        self.graph.has_edge(from, to) && !self.ignored.contains(&(from, to))
                    }
                    _ => false,
                }
            })
    }

    fn build_chain(&self, parents: &HashMap<NodeIndex, Option<NodeIndex>>, end: NodeIndex) -> Chain {
        let mut path = vec![end];
        let mut cursor = end;
        while let Some(&Some(previous)) = parents.get(&cursor) {
            path.push(previous);
            cursor = previous;
        }
        path.reverse();

        let chain: Chain = path.into_iter().map(|idx| self.graph.name(idx)).collect();
        assert!(
            self.is_valid_chain(&chain),
            "chain {chain} is not a simple path of live imports"
        );
        chain
    }
}
