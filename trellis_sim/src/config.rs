// trellis_sim/src/config.rs

//! Scenario configuration: built-in defaults, optionally overridden by a TOML
//! file, then by command-line flags.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use trellis_core::estimation::{DegeneratePolicy, FilterConfig};

use crate::error::{Result, SimError};
use crate::simulator::SimulatorParams;

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// The root of a scenario TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    pub simulation: Simulation,
    pub training: Training,
    pub simulator: SimulatorParams,
    pub filter: FilterConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            simulation: Simulation::default(),
            training: Training::default(),
            simulator: SimulatorParams::default(),
            // A noisy reading the training corpus never produced must not stop a run.
            filter: FilterConfig {
                on_degenerate: DegeneratePolicy::FallBackToPrediction,
                ..FilterConfig::default()
            },
        }
    }
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

/// The run being tracked and scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Simulation {
    /// Optional seed for the pseudo-random number generator for determinism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub width: usize,
    pub height: usize,
    pub frames: usize,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            seed: None,
            width: 20,
            height: 20,
            frames: 100,
        }
    }
}

/// Where the empirical models learn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Training {
    /// Number of simulated trajectories when no corpus directory is given.
    pub trajectories: usize,
    pub frames_per_trajectory: usize,
    /// A directory of saved `.sim` files used instead of fresh simulations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus_dir: Option<PathBuf>,
}

impl Default for Training {
    fn default() -> Self {
        Self {
            trajectories: 50,
            frames_per_trajectory: 20_000,
            corpus_dir: None,
        }
    }
}

impl ScenarioConfig {
    /// Defaults merged with the file at `path`, if one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Self::defaults();
        if let Some(path) = path {
            if !path.is_file() {
                return Err(SimError::Usage(format!(
                    "config file {:?} does not exist",
                    path
                )));
            }
            info!("Loading scenario from: {:?}", path);
            figment = figment.merge(Toml::file(path));
        }
        Ok(figment.extract()?)
    }

    /// Defaults merged with an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(Self::defaults().merge(Toml::string(toml)).extract()?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(ScenarioConfig::default()))
    }
}
