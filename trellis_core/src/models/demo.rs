// trellis_core/src/models/demo.rs

//! Hand-built models for the generic four-state HMM exercise.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{SensorModel, TransitionModel};
use crate::error::{FilterError, Result};

/// The transition matrix shared by both demonstration models.
const DEMO_TRANSITIONS: [[f64; 4]; 4] = [
    [0.5, 0.2, 0.1, 0.2],
    [0.2, 0.5, 0.2, 0.1],
    [0.1, 0.2, 0.5, 0.2],
    [0.2, 0.1, 0.2, 0.5],
];

/// Rows are states, columns are the letters 'A', 'B', 'C'.
const SIMPLE_SENSOR: [[f64; 3]; 4] = [
    [0.5, 0.2, 0.3],
    [0.4, 0.5, 0.1],
    [0.1, 0.2, 0.7],
    [0.1, 0.9, 0.0],
];

/// An ordered set of letter observations, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterAlphabet {
    letters: Vec<char>,
}

impl LetterAlphabet {
    /// 'A' through 'Z'.
    pub fn full() -> Self {
        Self {
            letters: ('A'..='Z').collect(),
        }
    }

    /// The first `count` letters of the alphabet.
    pub fn first(count: usize) -> Self {
        Self {
            letters: ('A'..='Z').take(count).collect(),
        }
    }

    pub fn index_of(&self, letter: char) -> Option<usize> {
        let upper = letter.to_ascii_uppercase();
        self.letters.iter().position(|l| *l == upper)
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }
}

/// A transition model backed by an explicit `S x S` matrix, row = source.
#[derive(Debug, Clone)]
pub struct MatrixTransitionModel {
    matrix: DMatrix<f64>,
}

impl MatrixTransitionModel {
    pub fn new(matrix: DMatrix<f64>) -> Result<Self> {
        if matrix.is_empty() || !matrix.is_square() {
            return Err(FilterError::InvalidConfiguration(format!(
                "transition matrix must be square and non-empty, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        Ok(Self { matrix })
    }

    /// Every state moves to every state with equal probability.
    pub fn uniform(state_count: usize) -> Result<Self> {
        if state_count == 0 {
            return Err(FilterError::InvalidConfiguration(
                "state count must be positive".to_string(),
            ));
        }
        Self::new(DMatrix::from_element(
            state_count,
            state_count,
            1.0 / state_count as f64,
        ))
    }

    pub fn state_count(&self) -> usize {
        self.matrix.nrows()
    }
}

impl TransitionModel<usize> for MatrixTransitionModel {
    fn probability(&self, from: &usize, to: &usize) -> f64 {
        self.matrix.get((*from, *to)).copied().unwrap_or(0.0)
    }

    fn successors(&self, from: &usize) -> Option<Vec<(usize, f64)>> {
        if *from >= self.matrix.nrows() {
            return Some(Vec::new());
        }
        Some(
            self.matrix
                .row(*from)
                .iter()
                .enumerate()
                .filter(|(_, p)| **p != 0.0)
                .map(|(to, p)| (to, *p))
                .collect(),
        )
    }
}

/// A letter sensor whose reading is centered on `2 * state` with spread 3.
///
/// Letters outside the alphabet have likelihood 0.
#[derive(Debug, Clone)]
pub struct GaussianLetterSensor {
    alphabet: LetterAlphabet,
}

impl GaussianLetterSensor {
    pub fn new(alphabet: LetterAlphabet) -> Self {
        Self { alphabet }
    }
}

impl SensorModel<char, usize> for GaussianLetterSensor {
    fn likelihood(&self, observation: &char, state: &usize) -> f64 {
        let Some(index) = self.alphabet.index_of(*observation) else {
            return 0.0;
        };
        let y = (index as f64 - 2.0 * *state as f64) / 3.0;
        (-(y * y) / 2.0).exp() / (2.0 * PI).sqrt()
    }
}

/// A sensor given as an explicit `state x letter` table.
#[derive(Debug, Clone)]
pub struct TableSensorModel {
    alphabet: LetterAlphabet,
    weights: DMatrix<f64>,
}

impl TableSensorModel {
    pub fn new(alphabet: LetterAlphabet, weights: DMatrix<f64>) -> Result<Self> {
        if weights.ncols() != alphabet.letters().len() {
            return Err(FilterError::InvalidConfiguration(format!(
                "sensor table has {} columns for an alphabet of {} letters",
                weights.ncols(),
                alphabet.letters().len()
            )));
        }
        Ok(Self { alphabet, weights })
    }
}

impl SensorModel<char, usize> for TableSensorModel {
    fn likelihood(&self, observation: &char, state: &usize) -> f64 {
        self.alphabet
            .index_of(*observation)
            .and_then(|col| self.weights.get((*state, col)).copied())
            .unwrap_or(0.0)
    }
}

/// Selects which hand-built model feeds the generic HMM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoModel {
    /// Gaussian letter sensor over 'A'..='Z'.
    #[default]
    Supplied,
    /// Table sensor over 'A'..='C', easy to follow by hand.
    Simple,
}

/// Everything needed to build a filter for one of the demonstration models.
#[derive(Clone)]
pub struct DemoHmm {
    pub state_count: usize,
    pub transition: Box<dyn TransitionModel<usize>>,
    pub sensor: Box<dyn SensorModel<char, usize>>,
    pub alphabet: LetterAlphabet,
}

impl DemoModel {
    pub fn build(self) -> Result<DemoHmm> {
        let transition = MatrixTransitionModel::new(DMatrix::from_fn(4, 4, |r, c| {
            DEMO_TRANSITIONS[r][c]
        }))?;
        let (alphabet, sensor): (LetterAlphabet, Box<dyn SensorModel<char, usize>>) = match self
        {
            DemoModel::Supplied => {
                let alphabet = LetterAlphabet::full();
                (
                    alphabet.clone(),
                    Box::new(GaussianLetterSensor::new(alphabet)),
                )
            }
            DemoModel::Simple => {
                let alphabet = LetterAlphabet::first(3);
                let table = DMatrix::from_fn(4, 3, |r, c| SIMPLE_SENSOR[r][c]);
                (
                    alphabet.clone(),
                    Box::new(TableSensorModel::new(alphabet, table)?),
                )
            }
        };
        Ok(DemoHmm {
            state_count: transition.state_count(),
            transition: Box::new(transition),
            sensor,
            alphabet,
        })
    }
}
