//! UAM CLI - headless runner for vertiport network scenarios.
//!
//! The `uam-sim` binary loads a JSON scenario, feeds passenger demand into
//! the core simulation tick by tick and prints a report.

pub mod config;
pub mod demand;
pub mod report;
pub mod scenario;

pub use config::Config;
pub use demand::DemandSpawner;
pub use scenario::{DemandDef, ScenarioFile};
