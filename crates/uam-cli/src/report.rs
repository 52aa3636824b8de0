//! Run summary output.

use std::fmt::Write;
use uam_core::{SimulationResults, VertiportSnapshot};

/// Serializable bundle printed with `--json`.
#[derive(Debug, serde::Serialize)]
pub struct Report<'a> {
    pub results: &'a SimulationResults,
    pub vertiports: &'a [VertiportSnapshot],
    pub passengers_spawned: u64,
}

impl Report<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let r = self.results;
        let mut out = String::new();

        let _ = writeln!(out, "=== Simulation report (tick {}) ===", r.current_time);
        let _ = writeln!(
            out,
            "VTOLs: {} total, {} landed, {} flying, {} waiting, {} aborted",
            r.total_vtols, r.landed_vtols, r.flying_vtols, r.waiting_vtols, r.aborted_vtols
        );
        let _ = writeln!(
            out,
            "Passengers: {} spawned, {} delivered",
            self.passengers_spawned, r.passengers_delivered
        );

        let _ = writeln!(
            out,
            "\n{:<10} {:<8} {:<10} {:>6} {:>7} {:>6}  route",
            "vtol", "status", "at", "hovers", "events", "holds"
        );
        for d in &r.vtol_details {
            let _ = writeln!(
                out,
                "{:<10} {:<8} {:<10} {:>6} {:>7} {:>6}  {}",
                d.id,
                format!("{:?}", d.status).to_lowercase(),
                d.current_vertiport.as_deref().unwrap_or("-"),
                d.hover_count,
                d.hover_events,
                d.departure_holds,
                d.route.join(" > "),
            );
        }

        let _ = writeln!(
            out,
            "\n{:<10} {:>8} {:>8} {:>8} {:>8}",
            "vertiport", "occupied", "hovering", "waiting", "arrived"
        );
        for v in self.vertiports {
            let _ = writeln!(
                out,
                "{:<10} {:>8} {:>8} {:>8} {:>8}",
                v.id,
                format!("{}/{}", v.occupied, v.capacity),
                v.hovering,
                v.passengers_waiting,
                v.passengers_arrived,
            );
        }
        out
    }
}
