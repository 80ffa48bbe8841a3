/// Graph generators for benchmarks and large-scale tests.
use strata_core::graph::ModuleGraph;

/// A layered application: `layers` layers under `app`, each holding
/// `packages` packages of `modules` modules.
///
/// Every module imports two modules of the layer directly below it, so all
/// imports point downwards. Names are `app.l{layer}.p{package}.m{module}`.
#[allow(dead_code)]
pub fn layered_graph(layers: usize, packages: usize, modules: usize) -> ModuleGraph {
    let mut graph = ModuleGraph::new();
    for layer in 0..layers {
        for package in 0..packages {
            for module in 0..modules {
                let name = format!("app.l{layer}.p{package}.m{module}");
                graph.add_module(&name);
                if layer + 1 < layers {
                    for offset in 0..2 {
                        let target = format!(
                            "app.l{}.p{}.m{}",
                            layer + 1,
                            (package + offset) % packages,
                            (module * 7 + offset) % modules
                        );
                        graph.add_import(&name, &target);
                    }
                }
            }
        }
    }
    graph
}

/// Layer names of [`layered_graph`], highest first, relative to `app`.
#[allow(dead_code)]
pub fn layer_names(layers: usize) -> Vec<String> {
    (0..layers).map(|layer| format!("l{layer}")).collect()
}
