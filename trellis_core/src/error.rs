// trellis_core/src/error.rs

use thiserror::Error;

use crate::types::Timestep;

/// Every way a filtering, prediction or mapping call can fail.
///
/// All of these are raised before any internal state is mutated, so a caller
/// can always decide to skip the offending input and keep going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Bad construction parameters (empty state space, mismatched prior, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The weighted belief summed to zero or to a non-finite value.
    /// The observation is inconsistent with every state under the current models.
    #[error("degenerate distribution at timestep {timestep}: no state explains the evidence")]
    DegenerateDistribution { timestep: Timestep },

    /// `predict_at` was asked for a timestep that is already in the past.
    #[error("cannot predict timestep {requested}, filter is already at {current}")]
    InvalidTimestep {
        requested: Timestep,
        current: Timestep,
    },

    #[error("state index {index} out of range for a space of {len} states")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    InvalidCoordinate {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
}

pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestep_errors_carry_filter_timesteps() {
        let current: Timestep = 7;
        let err = FilterError::InvalidTimestep {
            requested: current - 2,
            current,
        };
        assert_eq!(
            err.to_string(),
            "cannot predict timestep 5, filter is already at 7"
        );
        let degenerate = FilterError::DegenerateDistribution { timestep: current };
        assert!(degenerate.to_string().contains("timestep 7"));
    }
}
