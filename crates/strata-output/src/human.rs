use crate::human_helpers::{format_status_line, format_violation_human, heading};
use crate::OutputFormatter;
use strata_enforce::error::ConfigErrors;
use strata_enforce::types::Report;

pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_report(&self, report: &Report) -> String {
        let mut out = heading("Contracts");
        for contract in &report.contracts {
            out.push_str(&format_status_line(contract));
        }
        out.push_str(&format!(
            "\nContracts: {} kept, {} broken.\n",
            report.kept_count(),
            report.broken_count(),
        ));

        if !report.is_success() {
            out.push('\n');
            out.push_str(&heading("Broken contracts"));
            for contract in report.contracts.iter().filter(|c| !c.kept) {
                out.push_str(&heading(&contract.name));
                for v in &contract.violations {
                    out.push_str(&format_violation_human(v));
                    out.push('\n');
                }
            }
        }

        if report.warning_count() > 0 {
            if report.is_success() {
                out.push('\n');
            }
            out.push_str(&heading("Warnings"));
            for contract in &report.contracts {
                for warning in &contract.warnings {
                    out.push_str(&format!("{}: {}\n", contract.name, warning));
                }
            }
        }

        out
    }

    fn format_config_errors(&self, errors: &ConfigErrors) -> String {
        let mut out = heading("Configuration errors");
        for error in errors.errors() {
            out.push_str(&format!("  - {}\n", error));
        }
        out.push_str(&format!("\n{} configuration error(s); no contract was checked.\n", errors.len()));
        out
    }
}
