// trellis_core/src/space/mod.rs

//! Bidirectional mappings between flat state indices and the states the
//! models reason about.

use crate::error::{FilterError, Result};
use crate::types::StateIndex;
use std::fmt::Debug;

/// A finite, enumerable state space with a fixed index bijection.
///
/// The filter only ever works with flat indices; models receive the mapped
/// states. Implementations must not change their mapping after construction.
pub trait StateSpace: Debug + Clone + Send + Sync {
    /// The semantic state handed to transition and sensor models.
    type State: Debug + Clone + PartialEq + Send + Sync;

    /// Total number of states `S`.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maps a flat index to its state. Fails with `IndexOutOfRange`.
    fn state_at(&self, index: StateIndex) -> Result<Self::State>;

    /// Maps a state back to its flat index.
    fn index_of(&self, state: &Self::State) -> Result<StateIndex>;

    /// All states in index order.
    fn states(&self) -> Result<Vec<Self::State>> {
        (0..self.len()).map(|i| self.state_at(i)).collect()
    }
}

/// The plain integer space `0..len`, used by the generic HMM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpace {
    len: usize,
}

impl IndexSpace {
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(FilterError::InvalidConfiguration(
                "state count must be positive".to_string(),
            ));
        }
        Ok(Self { len })
    }
}

impl StateSpace for IndexSpace {
    type State = usize;

    fn len(&self) -> usize {
        self.len
    }

    fn state_at(&self, index: StateIndex) -> Result<usize> {
        if index < self.len {
            Ok(index)
        } else {
            Err(FilterError::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    fn index_of(&self, state: &usize) -> Result<StateIndex> {
        self.state_at(*state)
    }
}

mod grid;

pub use grid::{GridCoord, GridSpace};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_space_rejects_zero_states() {
        assert!(matches!(
            IndexSpace::new(0),
            Err(FilterError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn index_space_is_identity() {
        let space = IndexSpace::new(4).unwrap();
        assert_eq!(space.states().unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(space.index_of(&3).unwrap(), 3);
        assert_eq!(
            space.state_at(4),
            Err(FilterError::IndexOutOfRange { index: 4, len: 4 })
        );
    }
}
