use serde::Serialize;

use crate::OutputFormatter;
use strata_enforce::error::ConfigErrors;
use strata_enforce::types::{ContractReport, Report};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'static str,
    kept: usize,
    broken: usize,
    contracts: &'a [ContractReport],
}

#[derive(Serialize)]
struct JsonConfigErrors {
    status: &'static str,
    errors: Vec<String>,
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> String {
        let output = JsonReport {
            status: if report.is_success() { "kept" } else { "broken" },
            kept: report.kept_count(),
            broken: report.broken_count(),
            contracts: &report.contracts,
        };
        serde_json::to_string_pretty(&output).unwrap_or_default()
    }

    fn format_config_errors(&self, errors: &ConfigErrors) -> String {
        let output = JsonConfigErrors {
            status: "config_error",
            errors: errors.errors().iter().map(|e| e.to_string()).collect(),
        };
        serde_json::to_string_pretty(&output).unwrap_or_default()
    }
}
