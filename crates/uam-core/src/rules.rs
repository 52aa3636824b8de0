//! Operating parameters for the VTOL state machine.

use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Timers, thresholds and performance figures shared by every VTOL.
///
/// All durations are in simulation ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingRules {
    /// Ticks spent climbing out before cruise
    pub takeoff_ticks: u32,
    /// Ticks spent descending before the landing commit
    pub landing_ticks: u32,
    /// Distance covered per tick while flying
    pub speed: f64,
    /// Initial hover re-check interval (backoff base)
    pub hover_recheck_ticks: u32,
    /// Upper bound for the hover re-check interval
    pub hover_recheck_max_ticks: u32,
    /// Failed hover re-checks before the mission is aborted
    pub max_hover_count: u32,
    /// Ground time between legs of a planned route
    pub dwell_ticks: u32,
    /// Ground time after which a stuck VTOL is forced to re-evaluate
    pub max_landed_dwell: u32,
    /// Capacity holds a one-shot VTOL accepts before departing anyway
    pub max_departure_holds: u32,
    /// Default seat count for new VTOLs
    pub max_passengers: u32,
}

impl Default for OperatingRules {
    fn default() -> Self {
        Self {
            takeoff_ticks: 30,
            landing_ticks: 30,
            speed: 4.0,
            hover_recheck_ticks: 60,
            hover_recheck_max_ticks: 240,
            max_hover_count: 10,
            dwell_ticks: 15,
            max_landed_dwell: 600,
            max_departure_holds: 10,
            max_passengers: 4,
        }
    }
}

impl OperatingRules {
    /// Reject parameters that would leave a VTOL stuck in flight.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(SimError::InvalidRules(format!(
                "speed must be positive, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}
