// trellis_sim/src/prelude.rs

// Re-export the entire trellis_core prelude so you can easily access
// pure types like `GridCoord`, `ForwardFilter`, `Distribution`, etc.
pub use trellis_core::prelude::*;

// Re-export common harness types.
pub use crate::config::ScenarioConfig;
pub use crate::error::SimError;
pub use crate::evaluator::{EvaluationReport, FrameTracker};
pub use crate::prng::SimulationRng;
pub use crate::simulator::{SimulatorParams, TouchFrame, TouchscreenSimulator};
pub use crate::touchscreen::TouchscreenTracker;
