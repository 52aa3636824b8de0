//! Scenario file loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uam_core::ScenarioConfig;

/// Passenger demand between two vertiports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandDef {
    pub origin: String,
    pub destination: String,
    /// Spawn attempts per tick
    #[serde(default = "default_rate")]
    pub rate: u32,
}

fn default_rate() -> u32 {
    1
}

/// On-disk scenario: the core configuration plus runner-only demand rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(flatten)]
    pub config: ScenarioConfig,
    #[serde(default)]
    pub demand: Vec<DemandDef>,
}

impl ScenarioFile {
    pub fn parse(data: &str) -> Result<Self> {
        serde_json::from_str(data).context("Failed to parse scenario JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("Invalid scenario {}", path.display()))
    }
}
