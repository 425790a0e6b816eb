// trellis_core/src/models/mod.rs

use dyn_clone::DynClone;

// --- TRANSITION MODEL TRAIT ---
// P(next | prev). Conceptually a row-stochastic matrix over the state space.
/// The probability of moving from one state to another in one timestep.
///
/// For every fixed `from`, probabilities over all `to` must sum to 1. This is a
/// caller contract; the filter does not check it.
pub trait TransitionModel<S>: DynClone + Send + Sync {
    fn probability(&self, from: &S, to: &S) -> f64;

    /// The nonzero destinations of `from`, if the model can list them without
    /// sweeping the whole state space. Returning `None` makes the filter
    /// evaluate `probability` against every state once when it compiles its
    /// kernel.
    fn successors(&self, from: &S) -> Option<Vec<(S, f64)>> {
        let _ = from;
        None
    }
}

dyn_clone::clone_trait_object!(<S> TransitionModel<S>);

// --- SENSOR MODEL TRAIT ---
// P(observation | state). A likelihood, not a distribution over states.
/// The likelihood of an observation given the hidden state.
///
/// Only ever used as a multiplicative weight; values for a fixed observation
/// need not sum to 1 across states.
pub trait SensorModel<O, S>: DynClone + Send + Sync {
    fn likelihood(&self, observation: &O, state: &S) -> f64;
}

dyn_clone::clone_trait_object!(<O, S> SensorModel<O, S>);

// Plain closures are the most common way to hand a model to the filter.
impl<S, F> TransitionModel<S> for F
where
    F: Fn(&S, &S) -> f64 + Clone + Send + Sync,
{
    fn probability(&self, from: &S, to: &S) -> f64 {
        self(from, to)
    }
}

impl<O, S, F> SensorModel<O, S> for F
where
    F: Fn(&O, &S) -> f64 + Clone + Send + Sync,
{
    fn likelihood(&self, observation: &O, state: &S) -> f64 {
        self(observation, state)
    }
}

pub mod demo;
pub mod empirical;
