use std::fmt;

use serde::{Deserialize, Serialize};

/// Line-level metadata for a single import statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImportDetail {
    pub line_number: u32,
    #[serde(default)]
    pub line_contents: String,
}

/// A directed import between two modules, without line metadata.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DirectImport {
    pub importer: String,
    pub importee: String,
}

impl DirectImport {
    pub fn new(importer: impl Into<String>, importee: impl Into<String>) -> Self {
        Self {
            importer: importer.into(),
            importee: importee.into(),
        }
    }
}

impl fmt::Display for DirectImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.importer, self.importee)
    }
}

/// An ordered path of modules where each module imports the next.
///
/// The first module is the importer side of whatever rule found the chain,
/// the last one the importee side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chain(Vec<String>);

impl Chain {
    pub fn new(modules: Vec<String>) -> Self {
        Chain(modules)
    }

    pub fn modules(&self) -> &[String] {
        &self.0
    }

    /// Number of modules in the chain (one more than the number of imports).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn importer(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn importee(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The imports making up the chain, in order.
    pub fn imports(&self) -> impl Iterator<Item = DirectImport> + '_ {
        self.0
            .windows(2)
            .map(|pair| DirectImport::new(pair[0].as_str(), pair[1].as_str()))
    }

    /// True if no module appears twice.
    pub fn is_simple(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.0.len());
        self.0.iter().all(|m| seen.insert(m.as_str()))
    }
}

impl<S: Into<String>> FromIterator<S> for Chain {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Chain(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" -> "))
    }
}

/// One link of a chain with the source lines that produce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub importer: String,
    pub importee: String,
    pub line_numbers: Vec<u32>,
}

/// True when `module` sits strictly below `ancestor` in the dotted namespace.
pub fn is_ancestor(ancestor: &str, module: &str) -> bool {
    module.len() > ancestor.len()
        && module.starts_with(ancestor)
        && module.as_bytes()[ancestor.len()] == b'.'
}

pub fn is_descendant(module: &str, ancestor: &str) -> bool {
    is_ancestor(ancestor, module)
}

/// True when the two modules are the same or one contains the other.
pub fn overlaps(a: &str, b: &str) -> bool {
    a == b || is_ancestor(a, b) || is_ancestor(b, a)
}

/// Check that a name is a well-formed dotted module path.
pub fn validate_module_name(name: &str) -> Result<(), GraphError> {
    let malformed = name.is_empty()
        || name
            .split('.')
            .any(|segment| segment.is_empty() || segment.chars().any(char::is_whitespace));
    if malformed {
        return Err(GraphError::InvalidModuleName(name.to_string()));
    }
    Ok(())
}

/// Errors raised while building or querying a module graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid module name: {0:?}")]
    InvalidModuleName(String),

    #[error("Failed to read graph snapshot {path}: {reason}")]
    SnapshotRead { path: String, reason: String },

    #[error("Failed to parse graph snapshot {path}: {reason}")]
    SnapshotParse { path: String, reason: String },
}
