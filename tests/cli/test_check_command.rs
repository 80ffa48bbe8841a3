// Tests for `strata check` exit codes and output, run against the built binary.

use std::process::{Command, Output};

use serde_json::json;
use tempfile::TempDir;

use super::common::{shop_graph, strata_bin, write_project};

fn layered_config() -> serde_json::Value {
    json!({
        "root_packages": ["shop"],
        "contracts": [
            {"name": "Layered shop", "type": "layers", "layers": ["shop.ui", "shop.services", "shop.db"]},
            {"name": "Plugins", "type": "independence", "independent_modules": ["shop.plugins.*"],
             "ignore_imports": ["shop.utils -> shop.plugins.ship"]}
        ]
    })
}

fn strata_check(dir: &TempDir, config: serde_json::Value, extra: &[&str]) -> Output {
    let (config_path, graph_path) = write_project(dir.path(), &shop_graph(), config);
    Command::new(strata_bin())
        .arg("check")
        .arg("--config")
        .arg(&config_path)
        .arg("--graph")
        .arg(&graph_path)
        .args(extra)
        .output()
        .expect("Failed to run strata")
}

#[test]
fn test_broken_contract_exits_one() {
    let dir = TempDir::new().unwrap();
    let out = strata_check(&dir, layered_config(), &[]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Layered shop [layers] BROKEN"));
    assert!(stdout.contains("Plugins [independence] KEPT"));
    assert!(stdout.contains("shop.db.models -> shop.ui.views (l.14)"));
}

#[test]
fn test_kept_contracts_exit_zero() {
    let dir = TempDir::new().unwrap();
    let out = strata_check(&dir, layered_config(), &["--contract", "Plugins"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(!stdout.contains("Layered shop"));
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let out = strata_check(&dir, layered_config(), &["--json"]);
    assert_eq!(out.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(value["status"], "broken");
    assert_eq!(value["contracts"][0]["violations"][0]["kind"], "layer_breach");
    assert_eq!(value["contracts"][0]["violations"][0]["evidence"]["links"][0]["line_numbers"][0], 14);
}

#[test]
fn test_configuration_error_exits_two() {
    let dir = TempDir::new().unwrap();
    let config = json!({
        "contracts": [{"name": "bad", "type": "layers", "layers": ["shop.ui", "shop.missing"]}]
    });
    let out = strata_check(&dir, config, &["--json"]);
    assert_eq!(out.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(value["status"], "config_error");
    assert_eq!(
        value["errors"][0],
        "Contract 'bad': module 'shop.missing' in layers is not in the graph"
    );
}

#[test]
fn test_missing_graph_exits_two() {
    let dir = TempDir::new().unwrap();
    let (config_path, _) = write_project(dir.path(), &shop_graph(), layered_config());
    let out = Command::new(strata_bin())
        .args(["check", "--graph"])
        .arg(dir.path().join("nope.json"))
        .arg("--config")
        .arg(&config_path)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("strata check:"), "stderr: {}", stderr);
}

#[test]
fn test_verbose_reports_progress_on_stderr() {
    let dir = TempDir::new().unwrap();
    let out = strata_check(&dir, layered_config(), &["--verbose"]);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("strata check: loaded 9 modules and 7 imports"));
    assert!(stderr.contains("strata check: checked 2 contract(s)"));
    assert!(stderr.contains(", 1 violation(s)"));
}
