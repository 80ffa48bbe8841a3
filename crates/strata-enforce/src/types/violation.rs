use serde::{Deserialize, Serialize};

use strata_core::graph::ModuleGraph;
use strata_core::types::{Chain, ChainLink};

/// A chain together with the source lines behind each of its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEvidence {
    pub chain: Chain,
    pub links: Vec<ChainLink>,
}

impl ChainEvidence {
    pub fn from_graph(graph: &ModuleGraph, chain: Chain) -> Self {
        let links = graph.chain_links(&chain);
        Self { chain, links }
    }

    /// `a -> b (l.3) -> c (l.7, l.9)` style rendering.
    pub fn describe(&self) -> String {
        let mut out = self.chain.importer().unwrap_or_default().to_string();
        for link in &self.links {
            out.push_str(" -> ");
            out.push_str(&link.importee);
            if !link.line_numbers.is_empty() {
                let lines: Vec<String> =
                    link.line_numbers.iter().map(|l| format!("l.{}", l)).collect();
                out.push_str(&format!(" ({})", lines.join(", ")));
            }
        }
        out
    }
}

/// Evidence that a contract's rule was broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// `importer` reaches `forbidden`; one chain per offending import.
    ForbiddenImport {
        importer: String,
        forbidden: String,
        chains: Vec<ChainEvidence>,
    },
    /// Group `importer` reaches group `importee` of an independence contract.
    IndependenceBreach {
        importer: String,
        importee: String,
        evidence: ChainEvidence,
    },
    /// Lower layer reaches a higher one.
    LayerBreach {
        container: Option<String>,
        higher: String,
        lower: String,
        evidence: ChainEvidence,
    },
    /// Two independent modules of the same layer depend on each other.
    SiblingBreach {
        container: Option<String>,
        importer: String,
        importee: String,
        evidence: ChainEvidence,
    },
}

impl Violation {
    /// Deterministic one-line description.
    pub fn describe(&self) -> String {
        let chains: Vec<String> = self.evidence().into_iter().map(ChainEvidence::describe).collect();
        format!("{}: {}", self.headline(), chains.join("; "))
    }

    /// What was broken, without the evidence.
    pub fn headline(&self) -> String {
        match self {
            Violation::ForbiddenImport {
                importer,
                forbidden,
                ..
            } => format!("{} is not allowed to import {}", importer, forbidden),
            Violation::IndependenceBreach {
                importer,
                importee,
                ..
            } => format!("{} is not allowed to import {}", importer, importee),
            Violation::LayerBreach {
                container,
                higher,
                lower,
                ..
            } => format!(
                "{} is not allowed to import {}{}",
                lower,
                higher,
                scope_suffix(container)
            ),
            Violation::SiblingBreach {
                container,
                importer,
                importee,
                ..
            } => format!(
                "{} is not allowed to import its independent sibling {}{}",
                importer,
                importee,
                scope_suffix(container)
            ),
        }
    }

    pub fn evidence(&self) -> Vec<&ChainEvidence> {
        match self {
            Violation::ForbiddenImport { chains, .. } => chains.iter().collect(),
            Violation::IndependenceBreach { evidence, .. }
            | Violation::LayerBreach { evidence, .. }
            | Violation::SiblingBreach { evidence, .. } => vec![evidence],
        }
    }

    /// The chains carried as evidence.
    pub fn chains(&self) -> Vec<&Chain> {
        self.evidence().into_iter().map(|e| &e.chain).collect()
    }

    pub fn container(&self) -> Option<&str> {
        match self {
            Violation::LayerBreach { container, .. } | Violation::SiblingBreach { container, .. } => {
                container.as_deref()
            }
            _ => None,
        }
    }
}

fn scope_suffix(container: &Option<String>) -> String {
    match container {
        Some(container) => format!(" (in {})", container),
        None => String::new(),
    }
}
