use serde::{Deserialize, Serialize};

use super::Violation;

pub const EXIT_KEPT: i32 = 0;
pub const EXIT_BROKEN: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Outcome of checking every configured contract, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Report {
    pub contracts: Vec<ContractReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractReport {
    pub name: String,
    pub kind: String,
    pub kept: bool,
    pub violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Report {
    /// True when every contract was kept.
    pub fn is_success(&self) -> bool {
        self.contracts.iter().all(|c| c.kept)
    }

    pub fn kept_count(&self) -> usize {
        self.contracts.iter().filter(|c| c.kept).count()
    }

    pub fn broken_count(&self) -> usize {
        self.contracts.len() - self.kept_count()
    }

    pub fn violation_count(&self) -> usize {
        self.contracts.iter().map(|c| c.violations.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.contracts.iter().map(|c| c.warnings.len()).sum()
    }

    pub fn contract(&self, name: &str) -> Option<&ContractReport> {
        self.contracts.iter().find(|c| c.name == name)
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            EXIT_KEPT
        } else {
            EXIT_BROKEN
        }
    }
}
