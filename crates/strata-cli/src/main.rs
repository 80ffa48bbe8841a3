//! strata CLI: architectural import contracts for dotted module graphs.
//!
//! This binary provides the `strata` command. `strata check` loads a
//! configuration and a graph snapshot, checks every contract, and exits
//! 0 (all kept), 1 (some contract broken) or 2 (configuration error).

use clap::Parser;

mod cli_args;
mod commands;

use cli_args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let formatter: Box<dyn strata_output::OutputFormatter> = if cli.json {
        Box::new(strata_output::json::JsonFormatter)
    } else {
        Box::new(strata_output::human::HumanFormatter)
    };

    let exit_code = match cli.command {
        Commands::Check {
            config,
            graph,
            contracts,
        } => commands::check::run(&*formatter, cli.verbose, &config, &graph, contracts),
    };

    std::process::exit(exit_code);
}
