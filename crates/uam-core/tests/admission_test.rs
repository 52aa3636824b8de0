//! Vertiport admission and contention tests.
//!
//! Drives whole simulations headless and checks the capacity invariants on
//! every tick.

use uam_core::{OperatingRules, ScenarioConfig, Simulation, Vertiport, VertiportId, VtolState};

/// Star network: hub `C` at the origin, spokes at equal distance.
fn star(spokes: &[(&str, f64, f64)], speed: f64) -> Simulation {
    let mut vertiports = vec![serde_json::json!({"id": "C", "capacity": 1, "x": 0.0, "y": 0.0})];
    let mut edges = Vec::new();
    for (id, x, y) in spokes {
        vertiports.push(serde_json::json!({"id": id, "capacity": 1, "x": x, "y": y}));
        edges.push(serde_json::json!({"from": id, "to": "C", "bidirectional": true}));
    }
    let config: ScenarioConfig = serde_json::from_value(serde_json::json!({
        "vertiports": vertiports,
        "edges": edges,
        "rules": {"speed": speed},
    }))
    .unwrap();
    Simulation::from_config(&config).unwrap()
}

fn assert_invariants(sim: &Simulation) {
    for vp in sim.vertiports() {
        assert!(
            vp.occupied().len() <= vp.capacity() as usize,
            "{} over capacity at tick {}",
            vp.name,
            sim.now()
        );
        for id in vp.occupied() {
            assert!(!vp.is_queued(*id), "{:?} both landed and queued at {}", id, vp.name);
        }
    }
}

fn hub(sim: &Simulation) -> &Vertiport {
    sim.vertiport_by_name("C").unwrap()
}

#[test]
fn test_capacity_one_admits_one_of_three_and_wakes_next() {
    let mut sim = star(&[("A", 100.0, 0.0), ("B", -100.0, 0.0), ("D", 0.0, 100.0)], 60.0);
    let first = sim.add_planned_route("R1", &["A", "C"]).unwrap();
    let second = sim.add_planned_route("R2", &["B", "C"]).unwrap();
    let third = sim.add_planned_route("R3", &["D", "C"]).unwrap();

    while hub(&sim).occupied().is_empty() {
        sim.tick();
        assert_invariants(&sim);
        assert!(sim.now() < 1_000);
    }

    assert_eq!(hub(&sim).occupied(), &[first]);
    assert_eq!(hub(&sim).hovering_queue().collect::<Vec<_>>(), vec![second, third]);
    assert_eq!(sim.vtol(second).unwrap().state(), VtolState::Hovering);
    assert_eq!(sim.vtol(third).unwrap().state(), VtolState::Hovering);

    // The admitted VTOL dwells, then leaves; the queue head is woken.
    while hub(&sim).is_occupied_by(first) {
        sim.tick();
        assert_invariants(&sim);
    }
    assert_eq!(sim.vtol(second).unwrap().state(), VtolState::Landing);
    assert_eq!(sim.vtol(third).unwrap().state(), VtolState::Hovering);

    while sim.vtol(second).unwrap().state() == VtolState::Landing {
        sim.tick();
        assert_invariants(&sim);
    }
    assert_eq!(hub(&sim).occupied(), &[second]);
    assert_eq!(hub(&sim).hovering_queue().collect::<Vec<_>>(), vec![third]);
}

#[test]
fn test_two_vtols_contending_for_one_pad() {
    let mut sim = star(&[("A", -100.0, -100.0), ("B", 100.0, -100.0)], 100.0);
    let first = sim.add_planned_route("R1", &["A", "C"]).unwrap();
    let second = sim.add_planned_route("R2", &["B", "C"]).unwrap();

    while hub(&sim).occupied().is_empty() {
        sim.tick();
    }
    let contested_at = sim.now();
    assert!(hub(&sim).is_occupied_by(first));
    assert_eq!(sim.vtol(second).unwrap().state(), VtolState::Hovering);
    assert_eq!(sim.vtol(second).unwrap().hover_events(), 1);

    let mut first_left_at = None;
    let mut second_landed_at = None;
    for _ in 0..500 {
        sim.tick();
        assert_invariants(&sim);
        if first_left_at.is_none() && !hub(&sim).is_occupied_by(first) {
            first_left_at = Some(sim.now());
        }
        if hub(&sim).is_occupied_by(second) {
            second_landed_at = Some(sim.now());
            break;
        }
    }

    let left = first_left_at.unwrap();
    let landed = second_landed_at.unwrap();
    assert!(left > contested_at);
    assert!(landed > left);
    assert_eq!(
        landed - left,
        sim.rules().landing_ticks as u64,
        "second VTOL should start landing on the takeoff tick"
    );
}

#[test]
fn test_occupancy_invariants_hold_under_load() {
    let config = ScenarioConfig::from_json(
        r#"{
            "vertiports": [
                {"id": "N", "capacity": 1, "x": 0, "y": 80},
                {"id": "E", "capacity": 2, "x": 80, "y": 0},
                {"id": "S", "capacity": 1, "x": 0, "y": -80},
                {"id": "W", "capacity": 1, "x": -80, "y": 0}
            ],
            "edges": [
                {"from": "N", "to": "E", "bidirectional": true},
                {"from": "E", "to": "S", "bidirectional": true},
                {"from": "S", "to": "W", "bidirectional": true},
                {"from": "W", "to": "N", "bidirectional": true}
            ],
            "routes": [
                {"vtol_id": "R1", "route": ["N", "E", "S", "W", "N"]},
                {"vtol_id": "R2", "route": ["E", "S", "W", "N", "E"]},
                {"vtol_id": "R3", "route": ["W", "E"]},
                {"vtol_id": "R4", "route": ["S", "N"]}
            ],
            "dispatches": [
                {"vtol_id": "J1", "origin": "N", "destination": "S", "departure_time": 40},
                {"vtol_id": "J2", "origin": "W", "destination": "E", "departure_time": 90}
            ],
            "rules": {"max_hover_count": 50}
        }"#,
    )
    .unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();
    assert_eq!(sim.vtols().len(), 6);

    for _ in 0..3_000 {
        sim.tick();
        assert_invariants(&sim);
    }
}

#[test]
fn test_staged_vtol_does_not_exceed_capacity() {
    let mut sim = star(&[("A", 50.0, 0.0)], 10.0);
    sim.add_planned_route("R1", &["A", "C"]).unwrap();
    let staged = sim.add_planned_route("R2", &["A", "C"]).unwrap();

    let a = sim.vertiport_by_name("A").unwrap();
    assert_eq!(a.occupied().len(), 1);
    assert!(!a.is_occupied_by(staged));
    assert_eq!(sim.vtol(staged).unwrap().current_vertiport(), Some(VertiportId(1)));

    for _ in 0..500 {
        sim.tick();
        assert_invariants(&sim);
    }
}

#[test]
fn test_hovering_vtol_aborts_when_pad_never_frees() {
    let config = ScenarioConfig::from_json(
        r#"{
            "vertiports": [
                {"id": "A", "capacity": 1, "x": 0, "y": 0},
                {"id": "B", "capacity": 1, "x": 40, "y": 0}
            ],
            "edges": [{"from": "A", "to": "B"}]
        }"#,
    )
    .unwrap();
    let rules = OperatingRules {
        max_hover_count: 2,
        max_landed_dwell: 100_000,
        ..config.rules.clone()
    };
    let network = uam_core::Network::new(&config.vertiports, &config.edges).unwrap();
    let mut sim = Simulation::new(network, rules);

    // Parked on B with no way out: B has no outgoing edge, so it never leaves.
    let blocker = sim.add_planned_route("BLOCK", &["B", "A"]).unwrap();
    let vtol = sim.add_planned_route("R1", &["A", "B"]).unwrap();

    let results = sim.run(5_000);
    let r1 = sim.vtol(vtol).unwrap();
    assert!(r1.is_finished());
    assert_eq!(r1.hover_count(), 2);
    assert_eq!(results.aborted_vtols, 1);
    let b = sim.vertiport_by_name("B").unwrap();
    assert!(b.is_occupied_by(blocker));
    assert_eq!(b.hovering_count(), 0);
}
