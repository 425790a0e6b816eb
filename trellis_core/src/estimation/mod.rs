// trellis_core/src/estimation/mod.rs

use crate::distribution::Distribution;
use crate::error::Result;
use crate::types::Timestep;

/// The contract for anything that tracks a belief over a hidden state from a
/// stream of observations.
pub trait BeliefEstimator<O>: Send + Sync {
    /// Folds one observation into the belief and advances the timestep.
    fn ingest(&mut self, observation: &O) -> Result<&Distribution>;

    /// The committed belief and the number of observations behind it.
    fn current_distribution(&self) -> (&Distribution, Timestep);

    /// The belief at `target` assuming no further evidence. Never mutates.
    fn predict_at(&self, target: Timestep) -> Result<Distribution>;
}

pub mod config;
pub mod filters;
pub mod kernel;
pub mod predictor;

pub use config::{DegeneratePolicy, FilterConfig, KernelStrategy};
pub use filters::ForwardFilter;
pub use kernel::TransitionKernel;
pub use predictor::Predictor;
