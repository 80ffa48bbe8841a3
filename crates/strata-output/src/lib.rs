//! Output formatters for strata results.
//!
//! Provides two output modes:
//! - **Human** (default): Sectioned, readable terminal output
//! - **JSON** (`--json`): Machine-readable structured output

pub mod human;
pub(crate) mod human_helpers;
pub mod json;

use strata_enforce::error::ConfigErrors;
use strata_enforce::types::Report;

pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> String;
    fn format_config_errors(&self, errors: &ConfigErrors) -> String;
}
