// trellis_core/src/types.rs

use nalgebra::{DMatrix, DVector};

// --- Core Type Aliases ---
/// A dense vector of per-state weights, indexed by flat state index.
pub type Belief = DVector<f64>;
/// A `width x height` frame of per-cell values, entry `(x, y)`.
pub type GridFrame = DMatrix<f64>;
/// Flat index into a state space, `0..len`.
pub type StateIndex = usize;
/// Number of observations a filter has ingested.
pub type Timestep = u64;
