// Tests that results depend only on the graph and the contracts.

use serde_json::json;
use strata_core::config::ContractSpec;
use strata_core::graph::ModuleGraph;

use super::common::{forbidden_spec, independence_spec, layers_spec, run, shop_graph};

fn specs() -> Vec<ContractSpec> {
    vec![
        layers_spec("layered", json!(["shop.ui", "shop.services", "shop.db"])),
        independence_spec("plugins", json!(["shop.plugins.*"])),
        forbidden_spec("ui skips db", &["shop.ui"], &["shop.db"]).with_option("allow_indirect_imports", true),
    ]
}

/// The shop graph with imports added in reverse order.
fn shop_graph_reversed() -> ModuleGraph {
    let original = shop_graph();
    let mut graph = ModuleGraph::new();
    for import in original.imports().into_iter().rev() {
        for detail in original.get_import_details(&import.importer, &import.importee) {
            graph.add_import_with_detail(&import.importer, &import.importee, detail.line_number, &detail.line_contents);
        }
        graph.add_import(&import.importer, &import.importee);
    }
    graph
}

#[test]
fn test_repeated_runs_are_identical() {
    let graph = shop_graph();
    let first = serde_json::to_string(&run(&graph, &specs())).unwrap();
    for _ in 0..10 {
        assert_eq!(serde_json::to_string(&run(&graph, &specs())).unwrap(), first);
    }
}

#[test]
fn test_insertion_order_does_not_matter() {
    let forward = run(&shop_graph(), &specs());
    let reversed = run(&shop_graph_reversed(), &specs());
    assert_eq!(forward, reversed);
}

#[test]
fn test_reported_chains_exist_in_graph() {
    let graph = shop_graph();
    let report = run(&graph, &specs());
    for contract in &report.contracts {
        for violation in &contract.violations {
            for chain in violation.chains() {
                assert!(chain.len() >= 2);
                assert!(chain.is_simple());
                for import in chain.imports() {
                    assert!(
                        graph.direct_import_exists(&import.importer, &import.importee),
                        "{} is not an import",
                        import
                    );
                }
            }
        }
    }
}

#[test]
fn test_adding_an_ignored_import_again_changes_nothing() {
    let spec = layers_spec("layered", json!(["shop.ui", "shop.services", "shop.db"]))
        .with_option("ignore_imports", vec!["shop.db.models -> shop.ui.views"]);
    let mut graph = shop_graph();
    let before = run(&graph, &[spec.clone()]);
    assert!(before.is_success());

    graph.add_import_with_detail("shop.db.models", "shop.ui.views", 14, "from shop.ui import views");
    graph.add_import("shop.db.models", "shop.ui.views");
    assert_eq!(graph.import_count(), 7);
    assert_eq!(run(&graph, &[spec]), before);
}
