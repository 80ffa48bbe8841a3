//! Core graph types and configuration for strata.
//!
//! This crate provides the data structures every contract works against:
//! - [`graph`]: The in-memory [`ModuleGraph`](graph::ModuleGraph)
//! - [`chain`]: Shortest import-chain search with ignored imports
//! - [`squash`]: Non-destructive container-as-one-node projection
//! - [`expression`]: Module and import expressions with wildcards
//! - [`config`]: Configuration loading and contract specs
//! - [`provider`]: The [`GraphProvider`](provider::GraphProvider) seam and JSON snapshots
//! - [`types`]: Imports, chains, and graph errors

pub mod chain;
pub mod config;
pub mod expression;
pub mod graph;
pub mod provider;
pub mod squash;
pub mod types;
