//! VTOL agent and its tick-driven state machine.
//!
//! Lifecycle of one leg:
//!
//! 1. LANDED: parked at `current_vertiport`, dwelling until the next leg.
//! 2. TAKING_OFF: boards passengers, vacates the pad, climbs for a fixed timer.
//! 3. FLYING: follows the leg's waypoint path one step per tick.
//! 4. LANDING: slot was free on arrival; the commit happens when the timer ends.
//! 5. HOVERING: pad was full or the commit lost a race; re-checks with backoff.
//!
//! Nothing here blocks. Waiting is always an explicit state re-evaluated on
//! the next tick.

use crate::backoff::Backoff;
use crate::models::VtolStatus;
use crate::network::{Network, VertiportId};
use crate::passenger::Passenger;
use crate::route::PlannedRoute;
use crate::rules::OperatingRules;
use crate::spatial::Position;
use crate::vertiport::Vertiport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VtolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VtolState {
    Landed,
    TakingOff,
    Flying,
    Landing,
    Hovering,
}

impl std::fmt::Display for VtolState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VtolState::Landed => write!(f, "LANDED"),
            VtolState::TakingOff => write!(f, "TAKING_OFF"),
            VtolState::Flying => write!(f, "FLYING"),
            VtolState::Landing => write!(f, "LANDING"),
            VtolState::Hovering => write!(f, "HOVERING"),
        }
    }
}

/// Terminal outcome; a VTOL with an outcome is removable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// One-shot journey reached its final destination
    Completed,
    /// Hover-abort threshold exceeded
    Aborted,
    /// One-shot journey could not continue
    Failed,
}

/// Fixed one-shot itinerary. Every hop of `path` is a landing.
#[derive(Debug, Clone, Serialize)]
pub struct Journey {
    pub origin: VertiportId,
    pub destination: VertiportId,
    pub path: Vec<VertiportId>,
    pub departure_time: u64,
    holds: u32,
}

impl Journey {
    pub fn new(path: Vec<VertiportId>, departure_time: u64) -> Option<Self> {
        let origin = *path.first()?;
        let destination = *path.last()?;
        Some(Self {
            origin,
            destination,
            path,
            departure_time,
            holds: 0,
        })
    }

    /// Hop after `current`, or `None` at the end or off the path.
    pub fn next_hop(&self, current: VertiportId) -> Option<VertiportId> {
        let pos = self.path.iter().position(|v| *v == current)?;
        self.path.get(pos + 1).copied()
    }

    pub fn holds(&self) -> u32 {
        self.holds
    }
}

/// How a VTOL picks its legs, fixed at construction.
#[derive(Debug, Clone, Serialize)]
pub enum DispatchMode {
    OneShot(Journey),
    Planned(PlannedRoute),
}

/// Active airborne leg.
#[derive(Debug, Clone, Serialize)]
pub struct Leg {
    pub destination: VertiportId,
    /// Origin first, destination last
    pub path: Vec<VertiportId>,
    /// Index into `path` of the waypoint being flown to
    pub waypoint: usize,
}

/// Shared world a VTOL acts on during a tick.
pub struct Airspace<'a> {
    pub network: &'a Network,
    pub vertiports: &'a mut [Vertiport],
    pub rules: &'a OperatingRules,
    pub now: u64,
}

#[derive(Debug, Clone)]
pub struct Vtol {
    pub id: VtolId,
    pub name: String,
    state: VtolState,
    position: Position,
    current_vertiport: Option<VertiportId>,
    leg: Option<Leg>,
    mode: DispatchMode,
    /// Countdown for TAKING_OFF, LANDING and HOVERING
    timer: u32,
    /// Remaining ground time before the next leg may be scheduled
    dwell_timer: u32,
    /// Ticks spent landed while eligible to leave
    landed_dwell: u32,
    /// Failed re-checks in the current hold
    hover_count: u32,
    /// Times the VTOL entered HOVERING
    hover_events: u32,
    backoff: Backoff,
    onboard: Vec<Passenger>,
    max_passengers: u32,
    outcome: Option<Outcome>,
}

impl Vtol {
    pub(crate) fn new(
        id: VtolId,
        name: impl Into<String>,
        mode: DispatchMode,
        at: VertiportId,
        position: Position,
        rules: &OperatingRules,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            state: VtolState::Landed,
            position,
            current_vertiport: Some(at),
            leg: None,
            mode,
            timer: 0,
            dwell_timer: 0,
            landed_dwell: 0,
            hover_count: 0,
            hover_events: 0,
            backoff: Backoff::new(rules.hover_recheck_ticks, rules.hover_recheck_max_ticks),
            onboard: Vec::new(),
            max_passengers: rules.max_passengers,
            outcome: None,
        }
    }

    pub fn state(&self) -> VtolState {
        self.state
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Vertiport the VTOL is parked at; `None` while airborne.
    pub fn current_vertiport(&self) -> Option<VertiportId> {
        self.current_vertiport
    }

    /// Destination of the active leg; `None` while landed.
    pub fn destination(&self) -> Option<VertiportId> {
        self.leg.as_ref().map(|leg| leg.destination)
    }

    pub fn leg(&self) -> Option<&Leg> {
        self.leg.as_ref()
    }

    pub fn mode(&self) -> &DispatchMode {
        &self.mode
    }

    pub fn is_planned_route(&self) -> bool {
        matches!(self.mode, DispatchMode::Planned(_))
    }

    pub fn hover_count(&self) -> u32 {
        self.hover_count
    }

    pub fn hover_events(&self) -> u32 {
        self.hover_events
    }

    pub fn landed_dwell(&self) -> u32 {
        self.landed_dwell
    }

    pub fn onboard(&self) -> &[Passenger] {
        &self.onboard
    }

    pub fn max_passengers(&self) -> u32 {
        self.max_passengers
    }

    pub fn free_seats(&self) -> usize {
        (self.max_passengers as usize).saturating_sub(self.onboard.len())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn status(&self) -> VtolStatus {
        match self.outcome {
            Some(Outcome::Completed) => VtolStatus::Landed,
            Some(Outcome::Aborted | Outcome::Failed) => VtolStatus::Aborted,
            None => match self.state {
                VtolState::TakingOff | VtolState::Flying | VtolState::Landing => VtolStatus::Flying,
                VtolState::Hovering => VtolStatus::Waiting,
                VtolState::Landed => match self.mode {
                    DispatchMode::OneShot(_) => VtolStatus::Waiting,
                    DispatchMode::Planned(_) => VtolStatus::Landed,
                },
            },
        }
    }

    /// Seat passengers before the first departure, bypassing vertiport queues.
    pub(crate) fn preboard(&mut self, passengers: Vec<Passenger>) {
        for mut p in passengers {
            p.embark(self.id);
            self.onboard.push(p);
        }
    }

    /// Decide the next leg if idle on the ground.
    ///
    /// `available` is the tick's capacity snapshot, consulted only for
    /// one-shot departure gating.
    pub(crate) fn dispatch(&mut self, air: &mut Airspace<'_>, available: &mut [usize]) {
        if self.is_finished() || self.state != VtolState::Landed {
            return;
        }
        match self.mode {
            DispatchMode::Planned(_) => {
                if self.dwell_timer == 0 {
                    self.advance_route(air);
                }
            }
            DispatchMode::OneShot(_) => {
                if self.dwell_timer == 0 {
                    self.depart_journey(air, Some(available));
                }
            }
        }
    }

    /// Advance the state machine by one tick.
    pub(crate) fn step(&mut self, air: &mut Airspace<'_>) {
        if self.is_finished() {
            return;
        }
        match self.state {
            VtolState::Landed => self.step_landed(air),
            VtolState::TakingOff => {
                self.timer = self.timer.saturating_sub(1);
                if self.timer == 0 {
                    self.state = VtolState::Flying;
                    tracing::debug!(vtol = %self.name, "Climb complete, cruising");
                }
            }
            VtolState::Flying => self.step_flying(air),
            VtolState::Landing => {
                self.timer = self.timer.saturating_sub(1);
                if self.timer == 0 {
                    self.commit_landing(air);
                }
            }
            VtolState::Hovering => self.step_hovering(air),
        }
    }

    fn step_landed(&mut self, air: &mut Airspace<'_>) {
        self.dwell_timer = self.dwell_timer.saturating_sub(1);

        let eligible = match &self.mode {
            DispatchMode::Planned(_) => true,
            DispatchMode::OneShot(journey) => air.now >= journey.departure_time,
        };
        if !eligible {
            return;
        }

        self.landed_dwell += 1;
        if self.landed_dwell < air.rules.max_landed_dwell {
            return;
        }

        tracing::warn!(
            vtol = %self.name,
            at = %self.current_name(air.network),
            dwell = self.landed_dwell,
            "VTOL stuck on the ground, forcing next leg"
        );
        self.landed_dwell = 0;
        match self.mode {
            DispatchMode::Planned(_) => {
                self.advance_route(air);
            }
            DispatchMode::OneShot(_) => self.depart_journey(air, None),
        }
    }

    fn step_flying(&mut self, air: &mut Airspace<'_>) {
        let Some(leg) = self.leg.as_mut() else {
            tracing::warn!(vtol = %self.name, "Flying without a leg");
            return;
        };

        if let Some(waypoint) = leg.path.get(leg.waypoint).copied() {
            let target = air.network.position(waypoint);
            self.position = self.position.step_towards(target, air.rules.speed);
            if self.position == target {
                leg.waypoint += 1;
            }
        }

        if leg.waypoint >= leg.path.len() {
            self.attempt_landing(air);
        }
    }

    fn step_hovering(&mut self, air: &mut Airspace<'_>) {
        let Some(dest) = self.destination() else {
            return;
        };
        self.timer = self.timer.saturating_sub(1);

        let vertiport = &mut air.vertiports[dest.0];
        let woken = vertiport.take_wake(self.id);
        if !woken && self.timer > 0 {
            return;
        }

        if vertiport.can_land(self.id) {
            tracing::debug!(vtol = %self.name, at = %vertiport.name, woken, "Slot free, landing");
            vertiport.leave_queue(self.id);
            self.backoff.reset();
            self.state = VtolState::Landing;
            self.timer = air.rules.landing_ticks;
            return;
        }

        self.hover_count += 1;
        if self.hover_count >= air.rules.max_hover_count {
            vertiport.abandon(self.id);
            self.outcome = Some(Outcome::Aborted);
            tracing::warn!(
                vtol = %self.name,
                at = %vertiport.name,
                hover_count = self.hover_count,
                "Hover limit reached, mission aborted"
            );
            return;
        }

        vertiport.request_landing(self.id);
        self.timer = self.backoff.fail();
    }

    fn attempt_landing(&mut self, air: &mut Airspace<'_>) {
        let Some(dest) = self.destination() else {
            return;
        };
        if air.vertiports[dest.0].request_landing(self.id) {
            self.state = VtolState::Landing;
            self.timer = air.rules.landing_ticks;
            tracing::debug!(vtol = %self.name, at = %air.network.name(dest), "Cleared to land");
        } else {
            self.start_hovering(air.network);
        }
    }

    fn start_hovering(&mut self, network: &Network) {
        self.state = VtolState::Hovering;
        self.timer = self.backoff.current();
        self.hover_events += 1;
        if let Some(dest) = self.destination() {
            tracing::debug!(vtol = %self.name, at = %network.name(dest), "Pad full, hovering");
        }
    }

    fn commit_landing(&mut self, air: &mut Airspace<'_>) {
        let Some(dest) = self.destination() else {
            return;
        };
        let vertiport = &mut air.vertiports[dest.0];

        if !vertiport.land(self.id) {
            tracing::debug!(vtol = %self.name, at = %vertiport.name, "Lost landing race");
            vertiport.request_landing(self.id);
            self.start_hovering(air.network);
            return;
        }

        self.state = VtolState::Landed;
        self.position = air.network.position(dest);
        self.current_vertiport = Some(dest);
        self.leg = None;
        self.hover_count = 0;
        self.backoff.reset();
        self.landed_dwell = 0;
        self.dwell_timer = air.rules.dwell_ticks;

        let (arriving, staying): (Vec<_>, Vec<_>) = std::mem::take(&mut self.onboard)
            .into_iter()
            .partition(|p| p.destination == dest);
        self.onboard = staying;
        let delivered = arriving.len();
        for p in arriving {
            vertiport.receive_passenger(p);
        }

        tracing::debug!(vtol = %self.name, at = %vertiport.name, delivered, "Landed");

        if let DispatchMode::OneShot(journey) = &self.mode {
            if journey.destination == dest {
                // Hand the pad back; a finished aircraft leaves the network.
                vertiport.takeoff(self.id);
                self.outcome = Some(Outcome::Completed);
                tracing::info!(vtol = %self.name, at = %vertiport.name, "Journey complete");
            }
        }
    }

    /// Move a planned-route VTOL to its next stop.
    fn advance_route(&mut self, air: &mut Airspace<'_>) -> bool {
        let Some(current) = self.current_vertiport else {
            return false;
        };
        let DispatchMode::Planned(route) = &mut self.mode else {
            return false;
        };
        let next = route.advance();

        if next == current {
            self.dwell_timer = air.rules.dwell_ticks;
            self.landed_dwell = 0;
            return true;
        }

        let path = air.network.shortest_path(current, next);
        if path.is_empty() {
            tracing::warn!(
                vtol = %self.name,
                from = %air.network.name(current),
                to = %air.network.name(next),
                "No path to next stop, skipping"
            );
            self.dwell_timer = air.rules.dwell_ticks;
            return false;
        }

        self.begin_takeoff(air, next, path);
        true
    }

    /// Depart toward the next hop of a one-shot journey.
    ///
    /// With a capacity snapshot the departure is held while the next hop
    /// looks full, up to `max_departure_holds` times. Without one (forced
    /// advance) it departs unconditionally or fails.
    fn depart_journey(&mut self, air: &mut Airspace<'_>, available: Option<&mut [usize]>) {
        let Some(current) = self.current_vertiport else {
            return;
        };
        let DispatchMode::OneShot(journey) = &mut self.mode else {
            return;
        };
        if air.now < journey.departure_time {
            return;
        }

        let Some(next_hop) = journey.next_hop(current) else {
            self.fail(air, "not on journey path");
            return;
        };

        if let Some(available) = available {
            let free = available.get(next_hop.0).copied().unwrap_or(0);
            if free == 0 && journey.holds < air.rules.max_departure_holds {
                journey.holds += 1;
                tracing::debug!(
                    vtol = %self.name,
                    next = %air.network.name(next_hop),
                    holds = journey.holds,
                    "Next hop full, holding departure"
                );
                return;
            }
            if let Some(slot) = available.get_mut(next_hop.0) {
                *slot = slot.saturating_sub(1);
            }
        }

        let path = air.network.shortest_path(current, next_hop);
        if path.is_empty() {
            self.fail(air, "no path to next hop");
            return;
        }
        self.begin_takeoff(air, next_hop, path);
    }

    fn fail(&mut self, air: &mut Airspace<'_>, reason: &str) {
        if let Some(current) = self.current_vertiport {
            air.vertiports[current.0].takeoff(self.id);
        }
        self.outcome = Some(Outcome::Failed);
        tracing::warn!(
            vtol = %self.name,
            at = %self.current_name(air.network),
            reason,
            "Journey failed"
        );
    }

    fn begin_takeoff(
        &mut self,
        air: &mut Airspace<'_>,
        destination: VertiportId,
        path: Vec<VertiportId>,
    ) {
        let Some(current) = self.current_vertiport else {
            return;
        };
        let vertiport = &mut air.vertiports[current.0];

        let boarding = vertiport.get_passengers_for_destination(destination, self.free_seats());
        let boarded = boarding.len();
        self.preboard(boarding);
        vertiport.takeoff(self.id);

        tracing::debug!(
            vtol = %self.name,
            from = %vertiport.name,
            to = %air.network.name(destination),
            boarded,
            hops = path.len().saturating_sub(1),
            "Taking off"
        );

        self.state = VtolState::TakingOff;
        self.timer = air.rules.takeoff_ticks;
        self.current_vertiport = None;
        self.leg = Some(Leg {
            destination,
            path,
            waypoint: 1,
        });
        self.landed_dwell = 0;
        self.dwell_timer = 0;
        if let DispatchMode::OneShot(journey) = &mut self.mode {
            journey.holds = 0;
        }
    }

    fn current_name<'n>(&self, network: &'n Network) -> &'n str {
        self.current_vertiport
            .map(|id| network.name(id))
            .unwrap_or("airborne")
    }
}
