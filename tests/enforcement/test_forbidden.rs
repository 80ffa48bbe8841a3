// Tests for the forbidden contract type.

use strata_enforce::types::Violation;

use super::common::{forbidden_spec, graph_of, run, shop_graph};

#[test]
fn test_direct_only_by_default() {
    let graph = shop_graph();
    let report = run(&graph, &[forbidden_spec("ui skips db", &["shop.ui"], &["shop.db"])]);
    assert!(report.is_success());
}

#[test]
fn test_indirect_chain_when_allowed() {
    let graph = shop_graph();
    let spec = forbidden_spec("ui skips db", &["shop.ui"], &["shop.db"])
        .with_option("allow_indirect_imports", true);
    let report = run(&graph, &[spec]);
    let contract = &report.contracts[0];
    assert!(!contract.kept);
    assert_eq!(
        contract.violations[0].describe(),
        "shop.ui is not allowed to import shop.db: \
         shop.ui.forms -> shop.services.users -> shop.db.session"
    );
}

#[test]
fn test_direct_import_reported_with_line_numbers() {
    let graph = shop_graph();
    let report = run(&graph, &[forbidden_spec("db skips ui", &["shop.db"], &["shop.ui"])]);
    let violation = &report.contracts[0].violations[0];
    match violation {
        Violation::ForbiddenImport { chains, .. } => {
            assert_eq!(chains.len(), 1);
            assert_eq!(chains[0].links[0].line_numbers, vec![14]);
        }
        other => panic!("unexpected violation {:?}", other),
    }
}

#[test]
fn test_one_violation_per_importer_forbidden_pair() {
    let graph = graph_of(&[("app.a", "lib.x"), ("app.b", "lib.x"), ("app.b", "lib.y")]);
    let report = run(
        &graph,
        &[forbidden_spec("no lib", &["app.a", "app.b"], &["lib.x", "lib.y"])],
    );
    let described: Vec<String> = report.contracts[0].violations.iter().map(|v| v.describe()).collect();
    assert_eq!(
        described,
        vec![
            "app.a is not allowed to import lib.x: app.a -> lib.x",
            "app.b is not allowed to import lib.x: app.b -> lib.x",
            "app.b is not allowed to import lib.y: app.b -> lib.y",
        ]
    );
}

#[test]
fn test_wildcard_importers() {
    let graph = graph_of(&[("plugins.a.api", "core.secret"), ("plugins.b.api", "core.public")]);
    let report = run(
        &graph,
        &[forbidden_spec("no secrets", &["plugins.*.api"], &["core.secret"])],
    );
    assert_eq!(report.contracts[0].violations.len(), 1);
}
