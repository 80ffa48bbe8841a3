// Tests for the contract engine: configuration errors, limits and custom types.

use serde_json::json;
use strata_core::config::{ContractSpec, StrataConfig};
use strata_core::graph::ModuleGraph;
use strata_enforce::contract::{Contract, ContractCheck};
use strata_enforce::engine::ContractEngine;
use strata_enforce::error::ConfigError;
use strata_enforce::registry::ContractRegistry;
use strata_enforce::types::{EXIT_BROKEN, EXIT_KEPT};

use super::common::{forbidden_spec, layers_spec, shop_graph};

/// Broken whenever the graph has more than `max` modules.
struct MaxModules {
    name: String,
    max: usize,
}

impl Contract for MaxModules {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "max_modules"
    }

    fn validate(&self, _graph: &ModuleGraph) -> Vec<ConfigError> {
        Vec::new()
    }

    fn check(&self, graph: &ModuleGraph) -> ContractCheck {
        let mut check = ContractCheck::default();
        if graph.module_count() > self.max {
            check.warnings.push(format!("{} modules", graph.module_count()));
            check.violations.push(strata_enforce::types::Violation::ForbiddenImport {
                importer: "*".to_string(),
                forbidden: "*".to_string(),
                chains: vec![],
            });
        }
        check
    }
}

fn max_modules(spec: &ContractSpec) -> Result<Box<dyn Contract>, ConfigError> {
    let max = spec
        .options
        .get("max")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| ConfigError::InvalidOptions {
            contract: spec.name.clone(),
            reason: "missing field `max`".to_string(),
        })?;
    Ok(Box::new(MaxModules {
        name: spec.name.clone(),
        max: max as usize,
    }))
}

#[test]
fn test_config_file_drives_the_engine() {
    let config: StrataConfig = serde_json::from_value(json!({
        "root_packages": ["shop"],
        "contracts": [
            {"name": "layered", "type": "layers", "layers": ["shop.ui", "shop.services", "shop.db"]},
            {"name": "plugins", "type": "independence", "modules": ["shop.plugins.*"],
             "ignore_imports": ["shop.utils -> shop.plugins.ship"]}
        ]
    }))
    .unwrap();
    let report = ContractEngine::default()
        .run(&shop_graph(), &config.contracts)
        .unwrap();
    assert_eq!(report.kept_count(), 1);
    assert!(report.contract("plugins").unwrap().kept);
    assert_eq!(report.exit_code(), EXIT_BROKEN);
}

#[test]
fn test_every_configuration_error_is_collected() {
    let specs = vec![
        ContractSpec::new("a", "cycles"),
        layers_spec("b", json!(["shop.ui", "shop.nope"])),
        forbidden_spec("c", &["shop.ui"], &["shop.ui.views"]),
        layers_spec("b", json!(["shop.ui", "shop.db"])),
        ContractSpec::new("d", "forbidden").with_option("forbidden_modules", vec!["shop.db"]),
    ];
    let errors = ContractEngine::default()
        .run(&shop_graph(), &specs)
        .unwrap_err();
    let kinds: Vec<&str> = errors
        .errors()
        .iter()
        .map(|e| match e {
            ConfigError::UnknownContractType { .. } => "unknown type",
            ConfigError::InvalidOptions { .. } => "invalid options",
            ConfigError::DuplicateContractName(_) => "duplicate",
            ConfigError::ModuleNotInGraph { .. } => "missing module",
            ConfigError::OverlappingModules { .. } => "overlap",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["unknown type", "invalid options", "duplicate", "missing module", "overlap"]
    );
    assert!(errors.to_string().starts_with("5 configuration error(s)"));
}

#[test]
fn test_custom_contract_type_through_registry() {
    let mut registry = ContractRegistry::default();
    registry.register("max_modules", max_modules);
    let engine = ContractEngine::new(registry);

    let small = ContractSpec::new("small", "max_modules").with_option("max", 5);
    let large = ContractSpec::new("large", "max_modules").with_option("max", 50);
    let report = engine.run(&shop_graph(), &[small, large]).unwrap();
    assert!(!report.contracts[0].kept);
    assert_eq!(report.contracts[0].warnings, vec!["9 modules"]);
    assert!(report.contracts[1].kept);

    let err = engine
        .run(&shop_graph(), &[ContractSpec::new("bad", "max_modules")])
        .unwrap_err();
    assert!(matches!(err.errors()[0], ConfigError::InvalidOptions { .. }));
}

#[test]
fn test_limit_to_named_contracts() {
    let specs = vec![
        layers_spec("layered", json!(["shop.ui", "shop.services", "shop.db"])),
        forbidden_spec("ui skips db", &["shop.ui"], &["shop.db"]),
    ];
    let report = ContractEngine::default()
        .with_limit(["ui skips db"])
        .run(&shop_graph(), &specs)
        .unwrap();
    assert_eq!(report.contracts.len(), 1);
    assert_eq!(report.exit_code(), EXIT_KEPT);
}

#[test]
fn test_repeated_containers_rejected_for_every_contract_type() {
    let graph = super::common::graph_of(&[("pkg.low", "pkg.high")]);
    let specs = vec![
        layers_spec("layered", json!(["high", "low"])),
        forbidden_spec("forbidden", &["low"], &["high"]),
        super::common::independence_spec("independence", json!(["low", "high"])),
    ];
    for spec in specs {
        let name = spec.name.clone();
        let errors = ContractEngine::default()
            .run(&graph, &[spec.with_option("containers", vec!["pkg", "pkg"])])
            .unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ConfigError::OverlappingModules {
                contract: name,
                field: "containers".to_string(),
                first: "pkg".to_string(),
                second: "pkg".to_string(),
            }]
        );
    }
}
