// trellis_core/src/models/empirical/mod.rs

//! Transition and sensor models estimated from sampled trajectories.
//!
//! Probabilities are plain relative frequencies. Anything the corpus never
//! showed has probability 0, so coverage degrades as the state space grows
//! relative to the corpus size. No smoothing is applied.

use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use super::{SensorModel, TransitionModel};
use crate::distribution::Distribution;
use crate::error::Result;
use crate::space::StateSpace;
use crate::types::Belief;

mod table;

pub use table::{CountTable, ProbabilityTable};

/// Accumulates counts from `(observation, actual_state)` trajectories.
#[derive(Debug, Clone)]
pub struct EmpiricalEstimator<O, S> {
    transitions: CountTable<S, S>,
    observations: CountTable<S, O>,
    /// The "no prior state" row: where each trajectory starts.
    initial: CountTable<(), S>,
    trajectory_count: usize,
    sample_count: usize,
}

impl<O, S> Default for EmpiricalEstimator<O, S> {
    fn default() -> Self {
        Self {
            transitions: CountTable::default(),
            observations: CountTable::default(),
            initial: CountTable::default(),
            trajectory_count: 0,
            sample_count: 0,
        }
    }
}

impl<O, S> EmpiricalEstimator<O, S>
where
    O: Eq + Hash + Clone,
    S: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one independent trajectory of `(observed, actual)` pairs.
    ///
    /// The first state has no predecessor; it is attributed to the initial
    /// row and never chained onto the previous trajectory.
    pub fn record_trajectory(&mut self, trajectory: &[(O, S)]) {
        let Some((_, first)) = trajectory.first() else {
            return;
        };
        self.initial.increment((), first.clone());

        for pair in trajectory.windows(2) {
            self.transitions.increment(pair[0].1.clone(), pair[1].1.clone());
        }
        for (observed, actual) in trajectory {
            self.observations.increment(actual.clone(), observed.clone());
        }

        self.trajectory_count += 1;
        self.sample_count += trajectory.len();
    }

    /// Counts a whole corpus and freezes it in one go.
    pub fn estimate_from_trajectories<I, T>(trajectories: I) -> EmpiricalModel<O, S>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[(O, S)]>,
    {
        let mut estimator = Self::new();
        for trajectory in trajectories {
            estimator.record_trajectory(trajectory.as_ref());
        }
        estimator.finalize()
    }

    pub fn trajectory_count(&self) -> usize {
        self.trajectory_count
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Turns the counts into conditional probabilities.
    pub fn finalize(self) -> EmpiricalModel<O, S> {
        debug!(
            trajectories = self.trajectory_count,
            samples = self.sample_count,
            transition_rows = self.transitions.row_count(),
            sensor_rows = self.observations.row_count(),
            "finalizing empirical model"
        );
        EmpiricalModel {
            transitions: Arc::new(self.transitions.normalize()),
            observations: Arc::new(self.observations.normalize()),
            initial: self.initial.normalize(),
            trajectory_count: self.trajectory_count,
            sample_count: self.sample_count,
        }
    }
}

/// The frozen output of an [`EmpiricalEstimator`].
#[derive(Debug, Clone)]
pub struct EmpiricalModel<O, S> {
    transitions: Arc<ProbabilityTable<S, S>>,
    observations: Arc<ProbabilityTable<S, O>>,
    initial: ProbabilityTable<(), S>,
    trajectory_count: usize,
    sample_count: usize,
}

impl<O, S> EmpiricalModel<O, S>
where
    O: Eq + Hash + Clone + Send + Sync + 'static,
    S: Eq + Hash + Clone + Send + Sync + 'static,
{
    /// `P(to | from)`.
    pub fn transition_probability(&self, from: &S, to: &S) -> f64 {
        self.transitions.probability(from, to)
    }

    /// `P(observation | state)`.
    pub fn observation_probability(&self, observation: &O, state: &S) -> f64 {
        self.observations.probability(state, observation)
    }

    pub fn transition_model(&self) -> EmpiricalTransitionModel<S> {
        EmpiricalTransitionModel {
            table: Arc::clone(&self.transitions),
        }
    }

    pub fn sensor_model(&self) -> EmpiricalSensorModel<O, S> {
        EmpiricalSensorModel {
            table: Arc::clone(&self.observations),
        }
    }

    /// Where trajectories tend to start, as a distribution over `space`.
    ///
    /// `None` when no trajectory was recorded. Fails if the corpus holds a
    /// state the space cannot map.
    pub fn initial_distribution<Sp>(&self, space: &Sp) -> Result<Option<Distribution>>
    where
        Sp: StateSpace<State = S>,
    {
        if self.trajectory_count == 0 {
            return Ok(None);
        }
        let mut weights = Belief::zeros(space.len());
        for (state, p) in self.initial.row(&()) {
            weights[space.index_of(state)?] += p;
        }
        Distribution::from_weights(weights, 0).map(Some)
    }

    pub fn trajectory_count(&self) -> usize {
        self.trajectory_count
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }
}

/// Transition lookups into a shared empirical table.
#[derive(Debug, Clone)]
pub struct EmpiricalTransitionModel<S> {
    table: Arc<ProbabilityTable<S, S>>,
}

impl<S> TransitionModel<S> for EmpiricalTransitionModel<S>
where
    S: Eq + Hash + Clone + Send + Sync,
{
    fn probability(&self, from: &S, to: &S) -> f64 {
        self.table.probability(from, to)
    }

    fn successors(&self, from: &S) -> Option<Vec<(S, f64)>> {
        Some(
            self.table
                .row(from)
                .map(|(to, p)| (to.clone(), p))
                .collect(),
        )
    }
}

/// Sensor lookups into a shared empirical table.
#[derive(Debug, Clone)]
pub struct EmpiricalSensorModel<O, S> {
    table: Arc<ProbabilityTable<S, O>>,
}

impl<O, S> SensorModel<O, S> for EmpiricalSensorModel<O, S>
where
    O: Eq + Hash + Clone + Send + Sync,
    S: Eq + Hash + Clone + Send + Sync,
{
    fn likelihood(&self, observation: &O, state: &S) -> f64 {
        self.table.probability(state, observation)
    }
}
