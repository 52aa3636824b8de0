//! Simulation orchestrator.
//!
//! Owns the network, the vertiport arena and every VTOL, and advances the
//! world one discrete tick at a time. VTOLs are processed in creation order;
//! admission state is mutated synchronously, so earlier VTOLs win contested
//! slots within a tick.

use crate::error::SimError;
use crate::models::{
    DispatchRequest, PassengerSpawn, ScenarioConfig, SimulationResults, VertiportSnapshot,
    VtolDetail, VtolSnapshot, VtolStatus,
};
use crate::network::{Network, VertiportId};
use crate::passenger::{Passenger, PassengerId};
use crate::route::PlannedRoute;
use crate::rules::OperatingRules;
use crate::vertiport::Vertiport;
use crate::vtol::{Airspace, DispatchMode, Journey, Vtol, VtolId};

pub struct Simulation {
    network: Network,
    vertiports: Vec<Vertiport>,
    vtols: Vec<Vtol>,
    rules: OperatingRules,
    now: u64,
    next_vtol_id: u32,
    next_passenger_id: u64,
    /// Free slots per vertiport at the start of the tick, for one-shot gating
    available_capacity: Vec<usize>,
}

impl Simulation {
    /// Rules that fail [`OperatingRules::validate`] fall back to the default speed.
    pub fn new(network: Network, mut rules: OperatingRules) -> Self {
        if let Err(err) = rules.validate() {
            tracing::warn!("{}, using default speed", err);
            rules.speed = OperatingRules::default().speed;
        }
        let vertiports: Vec<Vertiport> = network
            .ids()
            .filter_map(|id| {
                network
                    .node(id)
                    .map(|node| Vertiport::new(id, node.name.clone(), node.capacity))
            })
            .collect();
        let available_capacity = vertiports.iter().map(Vertiport::available).collect();
        Self {
            network,
            vertiports,
            vtols: Vec::new(),
            rules,
            now: 0,
            next_vtol_id: 1,
            next_passenger_id: 1,
            available_capacity,
        }
    }

    /// Build a simulation and create every configured VTOL.
    ///
    /// Invalid rules and network errors are fatal. Individual route or dispatch entries that
    /// fail validation are logged and skipped.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, SimError> {
        config.rules.validate()?;
        let network = Network::new(&config.vertiports, &config.edges)?;
        let mut sim = Self::new(network, config.rules.clone());

        for route in &config.routes {
            if let Err(err) = sim.add_planned_route(&route.vtol_id, &route.route) {
                tracing::warn!(vtol = %route.vtol_id, "Skipping planned route: {}", err);
            }
        }
        for request in &config.dispatches {
            if let Err(err) = sim.add_journey(request) {
                tracing::warn!(vtol = %request.vtol_id, "Skipping dispatch: {}", err);
            }
        }

        tracing::info!(
            vertiports = sim.network.len(),
            edges = sim.network.edge_count(),
            vtols = sim.vtols.len(),
            "Simulation ready"
        );
        Ok(sim)
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn rules(&self) -> &OperatingRules {
        &self.rules
    }

    /// Ticks elapsed so far.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn vtols(&self) -> &[Vtol] {
        &self.vtols
    }

    pub fn vtol(&self, id: VtolId) -> Option<&Vtol> {
        self.vtols.iter().find(|v| v.id == id)
    }

    pub fn vtol_by_name(&self, name: &str) -> Option<&Vtol> {
        self.vtols.iter().find(|v| v.name == name)
    }

    pub fn vertiports(&self) -> &[Vertiport] {
        &self.vertiports
    }

    pub fn vertiport(&self, id: VertiportId) -> Option<&Vertiport> {
        self.vertiports.get(id.0)
    }

    pub fn vertiport_by_name(&self, name: &str) -> Option<&Vertiport> {
        self.network.lookup(name).and_then(|id| self.vertiport(id))
    }

    fn resolve(&self, name: &str) -> Result<VertiportId, SimError> {
        self.network
            .lookup(name)
            .ok_or_else(|| SimError::UnknownVertiport(name.to_string()))
    }

    fn check_unique(&self, name: &str) -> Result<(), SimError> {
        if self.vtol_by_name(name).is_some() {
            return Err(SimError::DuplicateVtol(name.to_string()));
        }
        Ok(())
    }

    /// Place a new VTOL on its starting pad and register it.
    fn park(&mut self, mode: DispatchMode, name: &str, at: VertiportId) -> Vtol {
        let id = VtolId(self.next_vtol_id);
        self.next_vtol_id += 1;

        if !self.vertiports[at.0].land(id) {
            tracing::warn!(
                vtol = %name,
                at = %self.network.name(at),
                "Starting vertiport full, VTOL staged off-pad"
            );
        }
        Vtol::new(id, name, mode, at, self.network.position(at), &self.rules)
    }

    /// Create a persistent VTOL circulating over `stops`.
    ///
    /// The route is circular when its first and last stops match, ping-pong
    /// otherwise. The VTOL starts landed at the first stop.
    pub fn add_planned_route<S: AsRef<str>>(
        &mut self,
        vtol_name: &str,
        stops: &[S],
    ) -> Result<VtolId, SimError> {
        self.check_unique(vtol_name)?;
        let ids = stops
            .iter()
            .map(|s| self.resolve(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let route = PlannedRoute::new(ids).ok_or_else(|| SimError::RouteTooShort {
            vtol: vtol_name.to_string(),
            stops: stops.len(),
        })?;

        let at = route.current_stop();
        let kind = route.kind();
        let vtol = self.park(DispatchMode::Planned(route), vtol_name, at);
        let id = vtol.id;
        self.vtols.push(vtol);

        tracing::info!(vtol = %vtol_name, ?kind, stops = stops.len(), "Planned-route VTOL created");
        Ok(id)
    }

    /// Create a one-shot VTOL that lands at every hop of the shortest path
    /// from origin to destination, then completes.
    pub fn add_journey(&mut self, request: &DispatchRequest) -> Result<VtolId, SimError> {
        self.check_unique(&request.vtol_id)?;
        let origin = self.resolve(&request.origin)?;
        let destination = self.resolve(&request.destination)?;

        let path = self.network.shortest_path(origin, destination);
        let journey = Journey::new(path, request.departure_time)
            .filter(|j| j.path.len() >= 2)
            .ok_or_else(|| SimError::NoPath {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
            })?;

        let seats = self.rules.max_passengers;
        if request.passenger_count > seats {
            return Err(SimError::TooManyPassengers {
                vtol: request.vtol_id.clone(),
                requested: request.passenger_count,
                seats,
            });
        }

        let hops = journey.path.len() - 1;
        let mut vtol = self.park(DispatchMode::OneShot(journey), &request.vtol_id, origin);
        let booked: Vec<Passenger> = (0..request.passenger_count)
            .map(|_| Passenger::new(self.next_passenger(), origin, destination))
            .collect();
        vtol.preboard(booked);
        let id = vtol.id;
        self.vtols.push(vtol);

        tracing::info!(
            vtol = %request.vtol_id,
            origin = %request.origin,
            destination = %request.destination,
            hops,
            departure = request.departure_time,
            "One-shot VTOL created"
        );
        Ok(id)
    }

    fn next_passenger(&mut self) -> PassengerId {
        let id = PassengerId(self.next_passenger_id);
        self.next_passenger_id += 1;
        id
    }

    /// Queue a new passenger at the spawn's origin.
    pub fn spawn_passenger(&mut self, spawn: &PassengerSpawn) -> Result<PassengerId, SimError> {
        let from = self.resolve(&spawn.origin)?;
        let to = self.resolve(&spawn.destination)?;
        let id = self.next_passenger();
        self.vertiports[from.0].add_passenger(Passenger::new(id, from, to));
        tracing::debug!(
            passenger = id.0,
            origin = %spawn.origin,
            destination = %spawn.destination,
            "Passenger spawned"
        );
        Ok(id)
    }

    fn refresh_capacity(&mut self) {
        self.available_capacity.clear();
        self.available_capacity.extend(
            self.vertiports
                .iter()
                .map(|vp| vp.available().saturating_sub(vp.hovering_count())),
        );
    }

    /// Advance every VTOL by exactly one tick.
    pub fn tick(&mut self) {
        self.now += 1;
        self.refresh_capacity();

        let Self {
            network,
            vertiports,
            vtols,
            rules,
            now,
            available_capacity,
            ..
        } = self;
        let mut air = Airspace {
            network,
            vertiports,
            rules,
            now: *now,
        };

        for vtol in vtols.iter_mut() {
            vtol.dispatch(&mut air, available_capacity.as_mut_slice());
        }
        for vtol in vtols.iter_mut() {
            vtol.step(&mut air);
        }

        debug_assert!(self
            .vertiports
            .iter()
            .all(|vp| vp.occupied().len() <= vp.capacity() as usize));
    }

    /// Tick until every VTOL has finished or `max_ticks` have elapsed.
    pub fn run(&mut self, max_ticks: u64) -> SimulationResults {
        for _ in 0..max_ticks {
            self.tick();
            if !self.vtols.is_empty() && self.vtols.iter().all(Vtol::is_finished) {
                tracing::info!(tick = self.now, "All VTOLs finished");
                break;
            }
        }
        self.results()
    }

    /// Drop finished VTOLs and return them.
    pub fn remove_finished(&mut self) -> Vec<Vtol> {
        let (finished, active): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.vtols).into_iter().partition(Vtol::is_finished);
        self.vtols = active;
        finished
    }

    fn opt_name(&self, id: Option<VertiportId>) -> Option<String> {
        id.map(|id| self.network.name(id).to_string())
    }

    pub fn vtol_snapshots(&self) -> Vec<VtolSnapshot> {
        self.vtols
            .iter()
            .map(|vtol| VtolSnapshot {
                id: vtol.name.clone(),
                state: vtol.state(),
                status: vtol.status(),
                position: vtol.position(),
                current_vertiport: self.opt_name(vtol.current_vertiport()),
                destination: self.opt_name(vtol.destination()),
                onboard_passengers: vtol.onboard().len(),
            })
            .collect()
    }

    pub fn vertiport_snapshots(&self) -> Vec<VertiportSnapshot> {
        self.vertiports
            .iter()
            .map(|vp| VertiportSnapshot {
                id: vp.name.clone(),
                capacity: vp.capacity(),
                occupied: vp.occupied().len(),
                hovering: vp.hovering_count(),
                passengers_waiting: vp.passengers_waiting(),
                passengers_arrived: vp.passengers_arrived().len(),
            })
            .collect()
    }

    fn detail(&self, vtol: &Vtol) -> VtolDetail {
        let names = |ids: &[VertiportId]| -> Vec<String> {
            ids.iter().map(|id| self.network.name(*id).to_string()).collect()
        };
        let (route, departure_holds) = match vtol.mode() {
            DispatchMode::Planned(route) => (names(route.stops()), 0),
            DispatchMode::OneShot(journey) => (names(&journey.path), journey.holds()),
        };
        VtolDetail {
            id: vtol.name.clone(),
            origin: route.first().cloned().unwrap_or_default(),
            destination: route.last().cloned().unwrap_or_default(),
            current_vertiport: self.opt_name(vtol.current_vertiport()),
            status: vtol.status(),
            hover_count: vtol.hover_count(),
            hover_events: vtol.hover_events(),
            departure_holds,
            route,
            is_planned_route: vtol.is_planned_route(),
        }
    }

    pub fn results(&self) -> SimulationResults {
        let count = |status: VtolStatus| self.vtols.iter().filter(|v| v.status() == status).count();
        SimulationResults {
            current_time: self.now,
            total_vtols: self.vtols.len(),
            landed_vtols: count(VtolStatus::Landed),
            flying_vtols: count(VtolStatus::Flying),
            waiting_vtols: count(VtolStatus::Waiting),
            aborted_vtols: count(VtolStatus::Aborted),
            passengers_delivered: self
                .vertiports
                .iter()
                .map(|vp| vp.passengers_arrived().len())
                .sum(),
            vtol_details: self.vtols.iter().map(|v| self.detail(v)).collect(),
        }
    }
}
