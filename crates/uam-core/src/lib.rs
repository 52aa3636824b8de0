pub mod backoff;
pub mod error;
pub mod models;
pub mod network;
pub mod passenger;
pub mod route;
pub mod rules;
pub mod simulation;
pub mod spatial;
pub mod vertiport;
pub mod vtol;

pub use backoff::Backoff;
pub use error::SimError;
pub use models::{
    DispatchRequest, EdgeDef, PassengerSpawn, RouteDef, ScenarioConfig, SimulationResults,
    VertiportDef, VertiportSnapshot, VtolDetail, VtolSnapshot, VtolStatus,
};
pub use network::{Edge, Network, VertiportId, VertiportNode};
pub use passenger::{Passenger, PassengerId, PassengerState};
pub use route::{PlannedRoute, RouteKind};
pub use rules::OperatingRules;
pub use simulation::Simulation;
pub use spatial::{ticks_to_cover, Position};
pub use vertiport::{OccupancyInfo, Vertiport};
pub use vtol::{DispatchMode, Journey, Leg, Outcome, Vtol, VtolId, VtolState};
