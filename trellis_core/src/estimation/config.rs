// trellis_core/src/estimation/config.rs

use serde::{Deserialize, Serialize};

/// How the transition model is compiled before filtering starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelStrategy {
    /// Dense up to `dense_limit` states, sparse above.
    #[default]
    Auto,
    /// Always store the full `S x S` matrix.
    Dense,
    /// Always store per-source lists of nonzero successors.
    Sparse,
}

/// What `ingest` does when no state can explain an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Return `DegenerateDistribution` and leave belief and timestep untouched.
    #[default]
    Reject,
    /// Commit the normalized prediction (no sensor update) and advance the timestep.
    FallBackToPrediction,
}

/// Per-filter settings, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub kernel: KernelStrategy,
    /// Largest state count for which `Auto` picks the dense kernel.
    pub dense_limit: usize,
    pub on_degenerate: DegeneratePolicy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kernel: KernelStrategy::Auto,
            dense_limit: 64,
            on_degenerate: DegeneratePolicy::Reject,
        }
    }
}
