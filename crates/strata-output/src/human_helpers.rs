use strata_enforce::types::{ContractReport, Violation};

pub(crate) fn heading(title: &str) -> String {
    format!("{}\n{}\n\n", title, "-".repeat(title.len()))
}

pub(crate) fn format_status_line(contract: &ContractReport) -> String {
    let status = if contract.kept { "KEPT" } else { "BROKEN" };
    format!("{} [{}] {}\n", contract.name, contract.kind, status)
}

/// Headline, then one indented line per chain.
pub(crate) fn format_violation_human(v: &Violation) -> String {
    let mut out = format!("{}:\n", v.headline());
    for evidence in v.evidence() {
        out.push_str(&format!("    {}\n", evidence.describe()));
    }
    out
}
