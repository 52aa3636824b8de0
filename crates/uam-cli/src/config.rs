//! Runner configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Tick budget for a run
    pub ticks: u64,
    /// Seed for the passenger demand RNG
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self { ticks: 500, seed: 7 }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            ticks: lookup("UAM_TICKS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.ticks),
            seed: lookup("UAM_SEED")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.seed),
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, ticks: Option<u64>, seed: Option<u64>) -> Self {
        if let Some(ticks) = ticks {
            self.ticks = ticks;
        }
        if let Some(seed) = seed {
            self.seed = seed;
        }
        self
    }
}
