//! Module and import expressions with segment wildcards.
//!
//! `*` stands for exactly one name segment, `**` for one or more:
//! `app.*.models` matches `app.blog.models`, `app.**.models` also matches
//! `app.blog.admin.models`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::graph::ModuleGraph;
use crate::types::DirectImport;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    #[error("Empty module expression")]
    Empty,

    #[error("Invalid module expression '{expression}': {reason}")]
    InvalidModule { expression: String, reason: String },

    #[error("Import expression '{0}' must have the form 'importer -> importee'")]
    MissingArrow(String),
}

/// A module name, possibly containing wildcard segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleExpression {
    expression: String,
}

impl ModuleExpression {
    pub fn parse(expression: &str) -> Result<Self, ExpressionError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(ExpressionError::Empty);
        }
        for segment in expression.split('.') {
            let reason = if segment.is_empty() {
                Some("empty name segment")
            } else if segment.chars().any(char::is_whitespace) {
                Some("whitespace inside a module name")
            } else if segment.contains('*') && segment != "*" && segment != "**" {
                Some("wildcards must span a whole segment")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ExpressionError::InvalidModule {
                    expression: expression.to_string(),
                    reason: reason.to_string(),
                });
            }
        }
        Ok(Self {
            expression: expression.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.expression
    }

    pub fn has_wildcard(&self) -> bool {
        self.expression.split('.').any(|s| s == "*" || s == "**")
    }

    pub fn matches(&self, module: &str) -> bool {
        let pattern: Vec<&str> = self.expression.split('.').collect();
        let name: Vec<&str> = module.split('.').collect();
        match_segments(&pattern, &name)
    }

    /// Modules of `graph` named by this expression, sorted.
    pub fn resolve(&self, graph: &ModuleGraph) -> BTreeSet<String> {
        if !self.has_wildcard() {
            return if graph.contains_module(&self.expression) {
                [self.expression.clone()].into()
            } else {
                BTreeSet::new()
            };
        }
        graph
            .modules()
            .filter(|m| self.matches(m))
            .map(String::from)
            .collect()
    }
}

fn match_segments(pattern: &[&str], name: &[&str]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some((&"**", rest)) => (1..=name.len()).any(|taken| match_segments(rest, &name[taken..])),
        Some((&"*", rest)) => !name.is_empty() && match_segments(rest, &name[1..]),
        Some((segment, rest)) => {
            name.first() == Some(segment) && match_segments(rest, &name[1..])
        }
    }
}

impl fmt::Display for ModuleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl FromStr for ModuleExpression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An `importer -> importee` pair of module expressions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImportExpression {
    pub importer: ModuleExpression,
    pub importee: ModuleExpression,
}

impl ImportExpression {
    pub fn parse(expression: &str) -> Result<Self, ExpressionError> {
        let (importer, importee) = expression
            .split_once("->")
            .ok_or_else(|| ExpressionError::MissingArrow(expression.trim().to_string()))?;
        Ok(Self {
            importer: ModuleExpression::parse(importer)?,
            importee: ModuleExpression::parse(importee)?,
        })
    }

    pub fn has_wildcard(&self) -> bool {
        self.importer.has_wildcard() || self.importee.has_wildcard()
    }

    /// Direct imports of `graph` matched by this expression.
    pub fn resolve(&self, graph: &ModuleGraph) -> BTreeSet<DirectImport> {
        let mut imports = BTreeSet::new();
        for importer in self.importer.resolve(graph) {
            for importee in graph.imports_of(&importer) {
                if self.importee.matches(importee) {
                    imports.insert(DirectImport::new(importer.as_str(), importee));
                }
            }
        }
        imports
    }
}

impl fmt::Display for ImportExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.importer, self.importee)
    }
}

impl FromStr for ImportExpression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
