// trellis_core/src/estimation/predictor.rs

use crate::distribution::Distribution;
use crate::error::{FilterError, Result};
use crate::estimation::kernel::TransitionKernel;
use crate::types::Timestep;

/// Answers "what is the belief at timestep T" without any new evidence.
///
/// Works on a private copy of the belief, so querying a future horizon never
/// commits anything to the filter it was taken from.
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a> {
    kernel: &'a TransitionKernel,
    belief: &'a Distribution,
    timestep: Timestep,
}

impl<'a> Predictor<'a> {
    pub fn new(kernel: &'a TransitionKernel, belief: &'a Distribution, timestep: Timestep) -> Self {
        Self {
            kernel,
            belief,
            timestep,
        }
    }

    /// The belief `target - timestep` transition-only steps ahead.
    ///
    /// `target == timestep` returns the current belief unchanged. Each step is
    /// renormalized; a step that loses all mass (a row with no successors in an
    /// empirical model) yields `DegenerateDistribution`.
    pub fn predict_at(&self, target: Timestep) -> Result<Distribution> {
        if target < self.timestep {
            return Err(FilterError::InvalidTimestep {
                requested: target,
                current: self.timestep,
            });
        }
        let mut current = self.belief.clone();
        for step in (self.timestep + 1)..=target {
            current = Distribution::from_weights(self.kernel.propagate(current.values()), step)?;
        }
        Ok(current)
    }
}
