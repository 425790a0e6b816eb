// trellis_core/src/estimation/filters/forward.rs

use tracing::{trace, warn};

use crate::distribution::Distribution;
use crate::error::{FilterError, Result};
use crate::estimation::config::{DegeneratePolicy, FilterConfig};
use crate::estimation::kernel::TransitionKernel;
use crate::estimation::predictor::Predictor;
use crate::estimation::BeliefEstimator;
use crate::models::{SensorModel, TransitionModel};
use crate::space::StateSpace;
use crate::types::{Belief, Timestep};

/// Exact forward filtering over a discrete hidden state.
///
/// Owns its belief exclusively. `ingest` needs `&mut self`, so a single
/// instance cannot be advanced from two threads at once; separate instances
/// share nothing writable.
#[derive(Clone)]
pub struct ForwardFilter<Sp: StateSpace, O> {
    space: Sp,
    /// `states[i]` is `space.state_at(i)`, resolved once.
    states: Vec<Sp::State>,
    kernel: TransitionKernel,
    sensor: Box<dyn SensorModel<O, Sp::State>>,
    belief: Distribution,
    timestep: Timestep,
    config: FilterConfig,
}

impl<Sp: StateSpace, O> ForwardFilter<Sp, O> {
    /// Creates a filter with a uniform belief at timestep 0.
    pub fn new(
        space: Sp,
        transition: &dyn TransitionModel<Sp::State>,
        sensor: Box<dyn SensorModel<O, Sp::State>>,
        config: FilterConfig,
    ) -> Result<Self> {
        let prior = Distribution::uniform(space.len())?;
        Self::with_prior(space, transition, sensor, config, prior)
    }

    /// Creates a filter starting from an explicit prior instead of uniform.
    pub fn with_prior(
        space: Sp,
        transition: &dyn TransitionModel<Sp::State>,
        sensor: Box<dyn SensorModel<O, Sp::State>>,
        config: FilterConfig,
        prior: Distribution,
    ) -> Result<Self> {
        if space.is_empty() {
            return Err(FilterError::InvalidConfiguration(
                "state count must be positive".to_string(),
            ));
        }
        if prior.len() != space.len() {
            return Err(FilterError::InvalidConfiguration(format!(
                "prior has {} states but the space has {}",
                prior.len(),
                space.len()
            )));
        }

        let states = space.states()?;
        let kernel = TransitionKernel::compile(
            &space,
            &states,
            transition,
            config.kernel,
            config.dense_limit,
        )?;

        Ok(Self {
            space,
            states,
            kernel,
            sensor,
            belief: prior,
            timestep: 0,
            config,
        })
    }

    /// One predict-update step conditioned on `observation`.
    ///
    /// On success the timestep advances by exactly one. When the weighted
    /// belief has no mass, the configured [`DegeneratePolicy`] decides between
    /// rejecting the observation and committing the bare prediction.
    pub fn ingest(&mut self, observation: &O) -> Result<&Distribution> {
        let next = self.timestep + 1;

        // 1. Predict
        let predicted = self.kernel.propagate(self.belief.values());

        // 2. Update
        let weighted = Belief::from_iterator(
            predicted.len(),
            predicted
                .iter()
                .zip(&self.states)
                .map(|(p, state)| p * self.sensor.likelihood(observation, state)),
        );

        // 3. Normalize
        let belief = match Distribution::from_weights(weighted, next) {
            Ok(belief) => belief,
            Err(FilterError::DegenerateDistribution { .. })
                if self.config.on_degenerate == DegeneratePolicy::FallBackToPrediction =>
            {
                warn!(
                    timestep = next,
                    "observation has zero likelihood everywhere, keeping the prediction"
                );
                Distribution::from_weights(predicted, next)?
            }
            Err(e) => return Err(e),
        };

        // 4. Commit
        self.belief = belief;
        self.timestep = next;
        trace!(timestep = self.timestep, "ingested observation");
        Ok(&self.belief)
    }

    pub fn current_distribution(&self) -> (&Distribution, Timestep) {
        (&self.belief, self.timestep)
    }

    /// The belief at a future `target` timestep, without committing it.
    pub fn predict_at(&self, target: Timestep) -> Result<Distribution> {
        self.predictor().predict_at(target)
    }

    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(&self.kernel, &self.belief, self.timestep)
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    pub fn space(&self) -> &Sp {
        &self.space
    }

    pub fn kernel(&self) -> &TransitionKernel {
        &self.kernel
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl<Sp: StateSpace, O> BeliefEstimator<O> for ForwardFilter<Sp, O> {
    fn ingest(&mut self, observation: &O) -> Result<&Distribution> {
        ForwardFilter::ingest(self, observation)
    }

    fn current_distribution(&self) -> (&Distribution, Timestep) {
        ForwardFilter::current_distribution(self)
    }

    fn predict_at(&self, target: Timestep) -> Result<Distribution> {
        ForwardFilter::predict_at(self, target)
    }
}
