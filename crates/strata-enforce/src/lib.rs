//! Contract enforcement for strata.
//!
//! Turns contract specs into checkable contracts and runs them over a
//! module graph:
//! - `forbidden`: importer modules must not import forbidden modules
//! - `independence`: groups of modules must not import each other
//! - `layers`: lower layers must not import higher layers
//!
//! The [`engine::ContractEngine`] builds contracts through a
//! [`registry::ContractRegistry`], collects every configuration error before
//! checking anything, and checks contracts in parallel.

pub mod contract;
pub mod engine;
pub mod error;
pub mod forbidden;
pub mod independence;
pub mod layers;
pub mod registry;
pub mod types;
