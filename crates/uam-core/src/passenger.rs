//! Passengers moving between vertiports.

use crate::network::VertiportId;
use crate::vtol::VtolId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassengerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerState {
    /// Queued at the origin vertiport
    Waiting,
    /// Handed to a departing VTOL
    Boarding,
    /// Onboard and airborne
    InTransit,
    /// Delivered; terminal
    Arrived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: PassengerId,
    pub origin: VertiportId,
    pub destination: VertiportId,
    pub state: PassengerState,
    /// Carrier while onboard
    pub vtol: Option<VtolId>,
}

impl Passenger {
    pub fn new(id: PassengerId, origin: VertiportId, destination: VertiportId) -> Self {
        Self {
            id,
            origin,
            destination,
            state: PassengerState::Waiting,
            vtol: None,
        }
    }

    pub(crate) fn embark(&mut self, vtol: VtolId) {
        self.state = PassengerState::InTransit;
        self.vtol = Some(vtol);
    }

    pub(crate) fn arrive(&mut self) {
        self.state = PassengerState::Arrived;
        self.vtol = None;
    }
}
