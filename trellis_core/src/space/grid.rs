// trellis_core/src/space/grid.rs

use serde::{Deserialize, Serialize};

use super::StateSpace;
use crate::error::{FilterError, Result};
use crate::types::StateIndex;

/// A cell on the touchscreen grid. Signed so that off-screen positions can
/// be represented (and rejected) instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i64,
    pub y: i64,
}

impl GridCoord {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Grid distance where a diagonal step counts as one.
    pub fn chebyshev_distance(&self, other: &GridCoord) -> u64 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }
}

/// A `width x height` grid. Index `i` maps to `(i / height, i % height)`,
/// i.e. `index = x * height + y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpace {
    width: usize,
    height: usize,
}

impl GridSpace {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, coord: &GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u64) < self.width as u64
            && (coord.y as u64) < self.height as u64
    }

    /// Snaps an arbitrary coordinate onto the nearest cell of the grid.
    pub fn clamp(&self, coord: GridCoord) -> GridCoord {
        GridCoord {
            x: coord.x.clamp(0, self.width as i64 - 1),
            y: coord.y.clamp(0, self.height as i64 - 1),
        }
    }
}

impl StateSpace for GridSpace {
    type State = GridCoord;

    fn len(&self) -> usize {
        self.width * self.height
    }

    fn state_at(&self, index: StateIndex) -> Result<GridCoord> {
        if index >= self.len() {
            return Err(FilterError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(GridCoord {
            x: (index / self.height) as i64,
            y: (index % self.height) as i64,
        })
    }

    fn index_of(&self, state: &GridCoord) -> Result<StateIndex> {
        if !self.contains(state) {
            return Err(FilterError::InvalidCoordinate {
                x: state.x,
                y: state.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(state.x as usize * self.height + state.y as usize)
    }
}
