// Tests for JSON graph snapshots and the snapshot provider.

use std::fs;

use strata_core::provider::{GraphProvider, GraphSnapshot, SnapshotProvider};
use strata_core::types::GraphError;
use tempfile::TempDir;

use super::common::shop_graph;

#[test]
fn test_snapshot_preserves_graph() {
    let graph = shop_graph();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    fs::write(&path, serde_json::to_string(&GraphSnapshot::from_graph(&graph)).unwrap()).unwrap();

    let loaded = SnapshotProvider::new(&path).build_graph(&[]).unwrap();
    assert_eq!(loaded.imports(), graph.imports());
    assert_eq!(loaded.module_count(), graph.module_count());
    assert_eq!(
        loaded.get_import_details("shop.db.models", "shop.ui.views"),
        graph.get_import_details("shop.db.models", "shop.ui.views")
    );
}

#[test]
fn test_root_packages_filter_modules() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    let snapshot = serde_json::json!({
        "modules": ["shop.ui", "shopping.cart", "requests"],
        "imports": [
            {"importer": "shop.ui", "importee": "requests"},
            {"importer": "shopping.cart", "importee": "shop.ui", "line_number": 2}
        ]
    });
    fs::write(&path, snapshot.to_string()).unwrap();

    let graph = SnapshotProvider::new(&path)
        .build_graph(&["shop".to_string()])
        .unwrap();
    assert_eq!(graph.modules().collect::<Vec<_>>(), vec!["shop.ui"]);
    assert_eq!(graph.import_count(), 0);
}

#[test]
fn test_malformed_snapshot_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    fs::write(&path, "{\"modules\": [1, 2]}").unwrap();
    let err = SnapshotProvider::new(&path).build_graph(&[]).unwrap_err();
    assert!(matches!(err, GraphError::SnapshotParse { .. }));

    let err = SnapshotProvider::new(dir.path().join("absent.json"))
        .build_graph(&[])
        .unwrap_err();
    assert!(matches!(err, GraphError::SnapshotRead { .. }));
}
