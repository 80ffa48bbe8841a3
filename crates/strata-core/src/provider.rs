//! Graph providers: where a [`ModuleGraph`] comes from.
//!
//! Scanning source code is not strata's job. A provider hands over a fully
//! built graph; [`SnapshotProvider`] reads one from a JSON snapshot.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::graph::ModuleGraph;
use crate::types::{is_ancestor, validate_module_name, GraphError};

/// Supplies a populated module graph for a set of root packages.
pub trait GraphProvider {
    fn build_graph(&self, root_packages: &[String]) -> Result<ModuleGraph, GraphError>;
}

/// Serialized form of a module graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub imports: Vec<SnapshotImport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotImport {
    pub importer: String,
    pub importee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_contents: Option<String>,
}

impl GraphSnapshot {
    pub fn from_graph(graph: &ModuleGraph) -> Self {
        let modules = graph.modules().map(String::from).collect();
        let mut imports = Vec::new();
        for import in graph.imports() {
            let details = graph.get_import_details(&import.importer, &import.importee);
            if details.is_empty() {
                imports.push(SnapshotImport {
                    importer: import.importer.clone(),
                    importee: import.importee.clone(),
                    line_number: None,
                    line_contents: None,
                });
            }
            for detail in details {
                imports.push(SnapshotImport {
                    importer: import.importer.clone(),
                    importee: import.importee.clone(),
                    line_number: Some(detail.line_number),
                    line_contents: Some(detail.line_contents),
                });
            }
        }
        Self { modules, imports }
    }

    /// Build a graph, keeping only modules inside `root_packages`.
    ///
    /// An empty root list keeps everything. Imports with an endpoint outside
    /// the roots are dropped.
    pub fn into_graph(self, root_packages: &[String]) -> Result<ModuleGraph, GraphError> {
        let in_scope = |module: &str| {
            root_packages.is_empty()
                || root_packages
                    .iter()
                    .any(|root| root == module || is_ancestor(root, module))
        };

        let mut graph = ModuleGraph::new();
        for module in &self.modules {
            validate_module_name(module)?;
            if in_scope(module.as_str()) {
                graph.add_module(module);
            }
        }
        for import in &self.imports {
            validate_module_name(&import.importer)?;
            validate_module_name(&import.importee)?;
            if !in_scope(import.importer.as_str()) || !in_scope(import.importee.as_str()) {
                continue;
            }
            match import.line_number {
                Some(line) => graph.add_import_with_detail(
                    &import.importer,
                    &import.importee,
                    line,
                    import.line_contents.as_deref().unwrap_or(""),
                ),
                None => graph.add_import(&import.importer, &import.importee),
            }
        }
        Ok(graph)
    }
}

/// Reads a [`GraphSnapshot`] from a JSON file.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    path: PathBuf,
}

impl SnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphProvider for SnapshotProvider {
    fn build_graph(&self, root_packages: &[String]) -> Result<ModuleGraph, GraphError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| GraphError::SnapshotRead {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let snapshot: GraphSnapshot =
            serde_json::from_str(&content).map_err(|e| GraphError::SnapshotParse {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        snapshot.into_graph(root_packages)
    }
}
