//! Configuration definitions consumed by the core and snapshots it exposes.

use crate::error::SimError;
use crate::rules::OperatingRules;
use crate::spatial::Position;
use crate::vtol::VtolState;
use serde::{Deserialize, Serialize};

// ========== INPUT DEFINITIONS ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertiportDef {
    pub id: String,
    pub capacity: u32,
    pub x: f64,
    pub y: f64,
}

/// Directed link between two vertiports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDef {
    pub from: String,
    pub to: String,
    /// Defaults to the Euclidean distance between the endpoints
    #[serde(default)]
    pub weight: Option<f64>,
    /// Also add the reverse edge with the same weight
    #[serde(default)]
    pub bidirectional: bool,
}

/// Persistent circulating route for one VTOL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDef {
    pub vtol_id: String,
    pub route: Vec<String>,
}

/// One-shot origin to destination journey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub vtol_id: String,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub departure_time: u64,
    #[serde(default, alias = "passengers")]
    pub passenger_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerSpawn {
    pub origin: String,
    pub destination: String,
}

/// Complete structured input for a simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub vertiports: Vec<VertiportDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    #[serde(default)]
    pub routes: Vec<RouteDef>,
    #[serde(default)]
    pub dispatches: Vec<DispatchRequest>,
    #[serde(default)]
    pub rules: OperatingRules,
}

impl ScenarioConfig {
    pub fn from_json(data: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(data)?)
    }
}

// ========== SNAPSHOTS ==========

/// Coarse status used for aggregate counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VtolStatus {
    /// On the ground or holding, not yet done with its current step
    Waiting,
    /// Taking off, cruising or on final approach
    Flying,
    /// Parked between planned legs, or journey complete
    Landed,
    /// Mission abandoned (hover abort or unrecoverable journey)
    Aborted,
}

/// Per-tick view of one VTOL.
#[derive(Debug, Clone, Serialize)]
pub struct VtolSnapshot {
    pub id: String,
    pub state: VtolState,
    pub status: VtolStatus,
    pub position: Position,
    pub current_vertiport: Option<String>,
    pub destination: Option<String>,
    pub onboard_passengers: usize,
}

/// Per-tick view of one vertiport.
#[derive(Debug, Clone, Serialize)]
pub struct VertiportSnapshot {
    pub id: String,
    pub capacity: u32,
    pub occupied: usize,
    pub hovering: usize,
    pub passengers_waiting: usize,
    pub passengers_arrived: usize,
}

/// Diagnostics for one VTOL.
#[derive(Debug, Clone, Serialize)]
pub struct VtolDetail {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub current_vertiport: Option<String>,
    pub status: VtolStatus,
    pub hover_count: u32,
    pub hover_events: u32,
    pub departure_holds: u32,
    pub route: Vec<String>,
    pub is_planned_route: bool,
}

/// Aggregate results of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResults {
    pub current_time: u64,
    pub total_vtols: usize,
    pub landed_vtols: usize,
    pub flying_vtols: usize,
    pub waiting_vtols: usize,
    pub aborted_vtols: usize,
    pub passengers_delivered: usize,
    pub vtol_details: Vec<VtolDetail>,
}
