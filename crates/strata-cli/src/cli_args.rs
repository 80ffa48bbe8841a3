use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Architectural import contracts for module graphs")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as structured JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Print progress and timing details to stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Check every configured contract against a graph snapshot
    Check {
        /// Configuration file listing root packages and contracts
        #[arg(long, env = "STRATA_CONFIG", default_value = ".strata.json")]
        config: PathBuf,
        /// JSON graph snapshot to check
        #[arg(long, env = "STRATA_GRAPH")]
        graph: PathBuf,
        /// Only check the named contract (repeatable)
        #[arg(long = "contract", value_name = "NAME")]
        contracts: Vec<String>,
    },
}

#[cfg(test)]
#[path = "cli_args_tests.rs"]
mod tests;
