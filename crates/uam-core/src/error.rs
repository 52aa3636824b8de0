//! Error types for network construction and VTOL creation.

use thiserror::Error;

/// Reasons a configuration entry is rejected.
///
/// None of these are raised once the simulation is ticking; runtime
/// contention is expressed as VTOL state (hovering, holds), not as errors.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown vertiport '{0}'")]
    UnknownVertiport(String),

    #[error("vertiport '{0}' is defined more than once")]
    DuplicateVertiport(String),

    #[error("vertiport '{vertiport}' has invalid capacity {capacity}")]
    InvalidCapacity { vertiport: String, capacity: u32 },

    #[error("edge '{from}' -> '{to}' has invalid weight {weight}")]
    InvalidWeight { from: String, to: String, weight: f64 },

    #[error("invalid operating rules: {0}")]
    InvalidRules(String),

    #[error("route for '{vtol}' has {stops} stop(s), at least 2 are required")]
    RouteTooShort { vtol: String, stops: usize },

    #[error("no path from '{origin}' to '{destination}'")]
    NoPath { origin: String, destination: String },

    #[error("VTOL '{0}' already exists")]
    DuplicateVtol(String),

    #[error("VTOL '{vtol}' requested {requested} passengers but has {seats} seats")]
    TooManyPassengers {
        vtol: String,
        requested: u32,
        seats: u32,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),
}
