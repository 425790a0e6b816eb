// trellis_core/src/distribution.rs

use crate::error::{FilterError, Result};
use crate::space::{GridSpace, StateSpace};
use crate::types::{Belief, GridFrame, StateIndex, Timestep};

/// A normalized probability vector over a finite state space.
///
/// Index `i` holds the probability of state `i`. Every constructor either
/// produces values summing to one or fails, so a `Distribution` is always valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    values: Belief,
}

impl Distribution {
    /// `1/len` for every state.
    pub fn uniform(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(FilterError::InvalidConfiguration(
                "a distribution needs at least one state".to_string(),
            ));
        }
        Ok(Self {
            values: Belief::from_element(len, 1.0 / len as f64),
        })
    }

    /// Normalizes a vector of non-negative weights.
    ///
    /// `timestep` is only used to label the error when the weights carry no mass.
    pub fn from_weights(weights: Belief, timestep: Timestep) -> Result<Self> {
        if weights.is_empty() {
            return Err(FilterError::InvalidConfiguration(
                "a distribution needs at least one state".to_string(),
            ));
        }
        if weights.iter().any(|w| *w < 0.0 || w.is_nan()) {
            return Err(FilterError::DegenerateDistribution { timestep });
        }
        let total = weights.sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(FilterError::DegenerateDistribution { timestep });
        }
        Ok(Self {
            values: weights / total,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn probability(&self, index: StateIndex) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(FilterError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    pub fn values(&self) -> &Belief {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        self.values.as_slice()
    }

    pub fn into_values(self) -> Belief {
        self.values
    }

    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    /// The most probable state and its probability. Ties go to the lowest index.
    pub fn most_likely(&self) -> (StateIndex, f64) {
        self.values
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, p)| {
                if *p > best.1 {
                    (i, *p)
                } else {
                    best
                }
            })
    }

    /// Reshapes the belief into a `width x height` frame, entry `(x, y)`.
    pub fn to_grid(&self, space: &GridSpace) -> Result<GridFrame> {
        if space.len() != self.len() {
            return Err(FilterError::InvalidConfiguration(format!(
                "distribution has {} states but the grid has {}",
                self.len(),
                space.len()
            )));
        }
        // Index = x * height + y, which is row-major over (x, y).
        Ok(GridFrame::from_row_slice(
            space.width(),
            space.height(),
            self.values.as_slice(),
        ))
    }
}
