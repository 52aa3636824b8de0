//! Vertiport admission control and passenger queues.
//!
//! Landing is a two-phase protocol. [`Vertiport::request_landing`] is
//! advisory: it never takes a slot, it only enqueues the caller when the pad
//! is full. [`Vertiport::land`] is the commit and re-checks capacity, so a
//! VTOL that lost a same-tick race gets `false` and goes back to hovering.
//!
//! Hovering VTOLs never count against `occupied`.

use crate::network::VertiportId;
use crate::passenger::{Passenger, PassengerState};
use crate::vtol::VtolId;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone)]
pub struct Vertiport {
    pub id: VertiportId,
    pub name: String,
    capacity: u32,
    occupied: Vec<VtolId>,
    hovering_queue: VecDeque<VtolId>,
    /// Queue head released by the last takeoff, cleared when it checks in
    woken: Option<VtolId>,
    passengers_waiting: BTreeMap<VertiportId, VecDeque<Passenger>>,
    passengers_arrived: Vec<Passenger>,
}

/// Point-in-time occupancy figures for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct OccupancyInfo {
    pub capacity: u32,
    pub occupied: usize,
    pub available: usize,
    pub hovering_count: usize,
    pub occupancy_rate: f64,
}

impl Vertiport {
    pub fn new(id: VertiportId, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            occupied: Vec::new(),
            hovering_queue: VecDeque::new(),
            woken: None,
            passengers_waiting: BTreeMap::new(),
            passengers_arrived: Vec::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupied(&self) -> &[VtolId] {
        &self.occupied
    }

    pub fn hovering_queue(&self) -> impl Iterator<Item = VtolId> + '_ {
        self.hovering_queue.iter().copied()
    }

    pub fn hovering_count(&self) -> usize {
        self.hovering_queue.len()
    }

    pub fn is_occupied_by(&self, vtol: VtolId) -> bool {
        self.occupied.contains(&vtol)
    }

    pub fn is_queued(&self, vtol: VtolId) -> bool {
        self.hovering_queue.contains(&vtol)
    }

    /// Free slots right now; hovering VTOLs are not subtracted.
    pub fn available(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.occupied.len())
    }

    pub fn can_land(&self, _vtol: VtolId) -> bool {
        self.occupied.len() < self.capacity as usize
    }

    /// Ask for a landing slot without taking it.
    ///
    /// Returns `true` if a slot is free now; the caller must still [`land`]
    /// to commit. Otherwise the VTOL is appended to the hovering queue (at
    /// most once) and `false` is returned.
    ///
    /// [`land`]: Vertiport::land
    pub fn request_landing(&mut self, vtol: VtolId) -> bool {
        if self.can_land(vtol) {
            return true;
        }
        if !self.hovering_queue.contains(&vtol) {
            self.hovering_queue.push_back(vtol);
            tracing::debug!(
                vertiport = %self.name,
                vtol = vtol.0,
                queued = self.hovering_queue.len(),
                "Landing denied, VTOL queued"
            );
        }
        false
    }

    /// Commit a landing. Fails if the last slot was taken since the request.
    pub fn land(&mut self, vtol: VtolId) -> bool {
        if !self.can_land(vtol) {
            return false;
        }
        if !self.occupied.contains(&vtol) {
            self.occupied.push(vtol);
        }
        self.hovering_queue.retain(|v| *v != vtol);
        if self.woken == Some(vtol) {
            self.woken = None;
        }
        true
    }

    /// Vacate the slot held by `vtol` and wake the head of the hovering queue.
    ///
    /// The wake is a one-shot hint to re-check early, not a reservation.
    pub fn takeoff(&mut self, vtol: VtolId) -> bool {
        let Some(pos) = self.occupied.iter().position(|v| *v == vtol) else {
            return false;
        };
        self.occupied.remove(pos);
        if let Some(head) = self.hovering_queue.front().copied() {
            self.woken = Some(head);
            tracing::debug!(vertiport = %self.name, vtol = head.0, "Woke hovering VTOL");
        }
        true
    }

    /// Consume the wake flag if it was raised for `vtol`.
    pub fn take_wake(&mut self, vtol: VtolId) -> bool {
        if self.woken == Some(vtol) {
            self.woken = None;
            true
        } else {
            false
        }
    }

    /// Remove `vtol` from the hovering queue once it is cleared to land.
    pub fn leave_queue(&mut self, vtol: VtolId) -> bool {
        let before = self.hovering_queue.len();
        self.hovering_queue.retain(|v| *v != vtol);
        if self.woken == Some(vtol) {
            self.woken = None;
        }
        self.hovering_queue.len() != before
    }

    /// Give up on landing here after a mission abort.
    pub fn abandon(&mut self, vtol: VtolId) -> bool {
        let left = self.leave_queue(vtol);
        if left {
            tracing::debug!(vertiport = %self.name, vtol = vtol.0, "VTOL abandoned hold");
        }
        left
    }

    pub fn add_passenger(&mut self, mut passenger: Passenger) {
        passenger.state = PassengerState::Waiting;
        passenger.vtol = None;
        self.passengers_waiting
            .entry(passenger.destination)
            .or_default()
            .push_back(passenger);
    }

    pub fn passengers_waiting(&self) -> usize {
        self.passengers_waiting.values().map(VecDeque::len).sum()
    }

    pub fn passengers_waiting_for(&self, destination: VertiportId) -> usize {
        self.passengers_waiting
            .get(&destination)
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    pub fn passengers_arrived(&self) -> &[Passenger] {
        &self.passengers_arrived
    }

    /// Remove up to `max_count` passengers bound for `destination`, oldest first.
    pub fn get_passengers_for_destination(
        &mut self,
        destination: VertiportId,
        max_count: usize,
    ) -> Vec<Passenger> {
        let Some(queue) = self.passengers_waiting.get_mut(&destination) else {
            return Vec::new();
        };
        let take = max_count.min(queue.len());
        let boarding: Vec<Passenger> = queue
            .drain(..take)
            .map(|mut p| {
                p.state = PassengerState::Boarding;
                p
            })
            .collect();
        if queue.is_empty() {
            self.passengers_waiting.remove(&destination);
        }
        boarding
    }

    pub fn receive_passenger(&mut self, mut passenger: Passenger) {
        passenger.arrive();
        self.passengers_arrived.push(passenger);
    }

    pub fn occupancy_info(&self) -> OccupancyInfo {
        let occupied = self.occupied.len();
        OccupancyInfo {
            capacity: self.capacity,
            occupied,
            available: self.available(),
            hovering_count: self.hovering_queue.len(),
            occupancy_rate: if self.capacity > 0 {
                occupied as f64 / self.capacity as f64
            } else {
                0.0
            },
        }
    }
}
