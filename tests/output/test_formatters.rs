// Tests for human and JSON rendering of real engine reports.

use serde_json::json;
use strata_enforce::engine::ContractEngine;
use strata_enforce::types::Report;
use strata_output::human::HumanFormatter;
use strata_output::json::JsonFormatter;
use strata_output::OutputFormatter;

use super::common::{independence_spec, layers_spec, run, shop_graph};

fn shop_report() -> Report {
    run(
        &shop_graph(),
        &[
            layers_spec("layered", json!(["shop.ui", "shop.services", "shop.db"])),
            independence_spec("plugins", json!(["shop.plugins.*"])),
        ],
    )
}

#[test]
fn test_human_report_sections() {
    let out = HumanFormatter.format_report(&shop_report());
    let expected = "\
Contracts
---------

layered [layers] BROKEN
plugins [independence] BROKEN

Contracts: 0 kept, 2 broken.

Broken contracts
----------------

layered
-------

shop.db is not allowed to import shop.ui:
    shop.db.models -> shop.ui.views (l.14)

plugins
-------

shop.plugins.pay is not allowed to import shop.plugins.ship:
    shop.plugins.pay -> shop.utils -> shop.plugins.ship

";
    assert_eq!(out, expected);
}

#[test]
fn test_json_report_round_trips_into_report() {
    let report = shop_report();
    let out = JsonFormatter.format_report(&report);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["kept"], 0);
    assert_eq!(value["broken"], 2);
    let contracts: Report = serde_json::from_value(json!({ "contracts": value["contracts"] })).unwrap();
    assert_eq!(contracts, report);
}

#[test]
fn test_config_errors_in_both_formats() {
    let errors = ContractEngine::default()
        .run(&shop_graph(), &[layers_spec("layered", json!(["shop.nope"]))])
        .unwrap_err();

    let human = HumanFormatter.format_config_errors(&errors);
    assert!(human.starts_with("Configuration errors\n--------------------\n"));
    assert!(human.contains("module 'shop.nope' in layers is not in the graph"));

    let value: serde_json::Value = serde_json::from_str(&JsonFormatter.format_config_errors(&errors)).unwrap();
    assert_eq!(value["errors"].as_array().map(|a| a.len()), Some(1));
}
