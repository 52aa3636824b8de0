//! uam-sim - run a vertiport network scenario headless and print a report.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uam_cli::report::Report;
use uam_cli::{Config, DemandSpawner, ScenarioFile};
use uam_core::Simulation;

/// Headless vertiport network simulator
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Tick budget (overrides UAM_TICKS)
    #[arg(long)]
    ticks: Option<u64>,

    /// Demand RNG seed (overrides UAM_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Keep ticking after every VTOL has finished
    #[arg(long, default_value_t = false)]
    full: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("uam_core=info".parse()?))
        .init();

    let args = Args::parse();
    let config = Config::from_env().with_overrides(args.ticks, args.seed);
    let file = ScenarioFile::load(&args.scenario)?;

    let mut sim = Simulation::from_config(&file.config)
        .with_context(|| format!("Cannot build network from {}", args.scenario.display()))?;
    let mut spawner = DemandSpawner::new(file.demand, config.seed);

    tracing::info!(ticks = config.ticks, seed = config.seed, "Running scenario");

    for _ in 0..config.ticks {
        spawner.spawn(&mut sim);
        sim.tick();
        if !args.full && !sim.vtols().is_empty() && sim.vtols().iter().all(|v| v.is_finished()) {
            tracing::info!(tick = sim.now(), "All VTOLs finished");
            break;
        }
    }

    let results = sim.results();
    let vertiports = sim.vertiport_snapshots();
    let report = Report {
        results: &results,
        vertiports: &vertiports,
        passengers_spawned: spawner.spawned(),
    };

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["uam-sim", "s.json", "--ticks", "90", "--json"]).unwrap();
        assert_eq!(args.scenario, PathBuf::from("s.json"));
        assert_eq!(args.ticks, Some(90));
        assert_eq!(args.seed, None);
        assert!(args.json);
        assert!(!args.full);
    }

    #[test]
    fn test_scenario_path_is_required() {
        assert!(Args::try_parse_from(["uam-sim"]).is_err());
    }
}
