use std::path::Path;
use std::time::Instant;

use strata_core::config::StrataConfig;
use strata_core::provider::{GraphProvider, SnapshotProvider};
use strata_enforce::engine::ContractEngine;
use strata_enforce::types::EXIT_CONFIG_ERROR;
use strata_output::OutputFormatter;

/// Run `strata check`: check every configured contract against a graph snapshot.
pub fn run(
    formatter: &dyn OutputFormatter,
    verbose: bool,
    config_path: &Path,
    graph_path: &Path,
    contracts: Vec<String>,
) -> i32 {
    let config = match StrataConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("strata check: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };
    if config.contracts.is_empty() {
        eprintln!(
            "strata check: no contracts configured in {}",
            config_path.display()
        );
    }

    let start = Instant::now();
    let graph = match SnapshotProvider::new(graph_path).build_graph(&config.root_packages) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("strata check: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };
    if verbose {
        eprintln!(
            "strata check: loaded {} modules and {} imports in {:?}",
            graph.module_count(),
            graph.import_count(),
            start.elapsed()
        );
    }

    let engine = ContractEngine::default().with_limit(contracts);
    let start = Instant::now();
    match engine.run(&graph, &config.contracts) {
        Ok(report) => {
            if verbose {
                eprintln!(
                    "strata check: checked {} contract(s) in {:?}, {} violation(s)",
                    report.contracts.len(),
                    start.elapsed(),
                    report.violation_count()
                );
            }
            println!("{}", formatter.format_report(&report));
            report.exit_code()
        }
        Err(errors) => {
            if verbose {
                eprintln!("strata check: {}", errors);
            }
            println!("{}", formatter.format_config_errors(&errors));
            EXIT_CONFIG_ERROR
        }
    }
}
