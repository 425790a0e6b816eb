// trellis_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::estimation::BeliefEstimator;
pub use crate::models::{SensorModel, TransitionModel};
pub use crate::space::StateSpace;

// --- Core Data Structures ---
pub use crate::distribution::Distribution;
pub use crate::error::FilterError;
pub use crate::space::{GridCoord, GridSpace, IndexSpace};
pub use crate::types::{Belief, GridFrame, StateIndex, Timestep};

// --- Estimation Algorithms ---
pub use crate::estimation::{
    DegeneratePolicy, FilterConfig, ForwardFilter, KernelStrategy, Predictor, TransitionKernel,
};

// --- Concrete Model Implementations ---
pub use crate::models::demo::{DemoHmm, DemoModel, LetterAlphabet, MatrixTransitionModel};
pub use crate::models::empirical::{EmpiricalEstimator, EmpiricalModel};
