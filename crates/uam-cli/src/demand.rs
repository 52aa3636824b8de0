//! Seeded passenger demand.

use crate::scenario::DemandDef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uam_core::{PassengerSpawn, Simulation};

/// Chance that one unit of demand produces a passenger on a given tick.
pub const SPAWN_PROBABILITY: f64 = 0.1;

/// Spawns passengers from demand rows. Deterministic for a fixed seed.
pub struct DemandSpawner {
    /// Spawn event and attempts per tick
    demand: Vec<(PassengerSpawn, u32)>,
    rng: StdRng,
    spawned: u64,
}

impl DemandSpawner {
    pub fn new(demand: Vec<DemandDef>, seed: u64) -> Self {
        let demand = demand
            .into_iter()
            .map(|row| {
                let spawn = PassengerSpawn {
                    origin: row.origin,
                    destination: row.destination,
                };
                (spawn, row.rate)
            })
            .collect();
        Self {
            demand,
            rng: StdRng::seed_from_u64(seed),
            spawned: 0,
        }
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Roll every demand unit once and queue the resulting passengers.
    pub fn spawn(&mut self, sim: &mut Simulation) -> usize {
        let mut count = 0;
        for (spawn, rate) in &self.demand {
            for _ in 0..*rate {
                if !self.rng.random_bool(SPAWN_PROBABILITY) {
                    continue;
                }
                match sim.spawn_passenger(spawn) {
                    Ok(_) => count += 1,
                    Err(e) => {
                        tracing::warn!(
                            origin = %spawn.origin,
                            destination = %spawn.destination,
                            "Demand row rejected: {}",
                            e
                        );
                        break;
                    }
                }
            }
        }
        self.spawned += count as u64;
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uam_core::ScenarioConfig;

    fn sim() -> Simulation {
        let config = ScenarioConfig::from_json(
            r#"{"vertiports": [
                {"id": "A", "capacity": 1, "x": 0, "y": 0},
                {"id": "B", "capacity": 1, "x": 10, "y": 0}
            ]}"#,
        )
        .unwrap();
        Simulation::from_config(&config).unwrap()
    }

    fn row(origin: &str, destination: &str, rate: u32) -> DemandDef {
        DemandDef {
            origin: origin.to_string(),
            destination: destination.to_string(),
            rate,
        }
    }

    fn run(seed: u64, ticks: usize) -> u64 {
        let mut sim = sim();
        let mut spawner = DemandSpawner::new(vec![row("A", "B", 2), row("B", "A", 1)], seed);
        for _ in 0..ticks {
            spawner.spawn(&mut sim);
            sim.tick();
        }
        spawner.spawned()
    }

    #[test]
    fn test_same_seed_same_demand() {
        assert_eq!(run(42, 200), run(42, 200));
    }

    #[test]
    fn test_demand_reaches_vertiport_queues() {
        let mut sim = sim();
        let mut spawner = DemandSpawner::new(vec![row("A", "B", 5)], 1);
        let mut total = 0;
        for _ in 0..100 {
            total += spawner.spawn(&mut sim);
        }
        assert!(total > 0);
        assert_eq!(sim.vertiport_by_name("A").unwrap().passengers_waiting(), total);
    }

    #[test]
    fn test_unknown_vertiport_spawns_nothing() {
        let mut sim = sim();
        let mut spawner = DemandSpawner::new(vec![row("A", "MISSING", 10)], 3);
        for _ in 0..50 {
            assert_eq!(spawner.spawn(&mut sim), 0);
        }
    }
}
