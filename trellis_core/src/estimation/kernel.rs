// trellis_core/src/estimation/kernel.rs

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{FilterError, Result};
use crate::estimation::config::KernelStrategy;
use crate::models::TransitionModel;
use crate::space::StateSpace;
use crate::types::{Belief, StateIndex};

/// A transition model compiled against a fixed state space.
///
/// Both variants compute `predicted[d] = sum_s belief[s] * T(s, d)` and agree
/// up to floating-point rounding.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionKernel {
    /// Row `s`, column `d` holds `T(s, d)`.
    Dense(DMatrix<f64>),
    /// Entry `s` lists every `(d, T(s, d))` with a nonzero probability.
    Sparse(Vec<Vec<(StateIndex, f64)>>),
}

impl TransitionKernel {
    /// Evaluates `model` once over `states` and stores the result.
    ///
    /// `states` must be `space.states()`, i.e. every state in index order.
    pub fn compile<Sp>(
        space: &Sp,
        states: &[Sp::State],
        model: &dyn TransitionModel<Sp::State>,
        strategy: KernelStrategy,
        dense_limit: usize,
    ) -> Result<Self>
    where
        Sp: StateSpace,
    {
        if states.len() != space.len() {
            return Err(FilterError::InvalidConfiguration(format!(
                "{} resolved states for a space of {}",
                states.len(),
                space.len()
            )));
        }
        let kernel = match strategy {
            KernelStrategy::Dense => Self::dense(states, model),
            KernelStrategy::Sparse => Self::sparse(space, states, model)?,
            KernelStrategy::Auto if states.len() <= dense_limit => Self::dense(states, model),
            KernelStrategy::Auto => Self::sparse(space, states, model)?,
        };
        debug!(
            states = states.len(),
            nonzero = kernel.nonzero_count(),
            dense = matches!(kernel, TransitionKernel::Dense(_)),
            "compiled transition kernel"
        );
        Ok(kernel)
    }

    fn dense<S>(states: &[S], model: &dyn TransitionModel<S>) -> Self {
        let n = states.len();
        Self::Dense(DMatrix::from_fn(n, n, |from, to| {
            model.probability(&states[from], &states[to])
        }))
    }

    fn sparse<Sp>(
        space: &Sp,
        states: &[Sp::State],
        model: &dyn TransitionModel<Sp::State>,
    ) -> Result<Self>
    where
        Sp: StateSpace,
    {
        let mut rows = Vec::with_capacity(states.len());
        for from in states {
            let row = match model.successors(from) {
                Some(successors) => {
                    let mut row = Vec::with_capacity(successors.len());
                    for (to, p) in successors {
                        if p != 0.0 {
                            row.push((space.index_of(&to)?, p));
                        }
                    }
                    // Fixed summation order in `propagate`, whatever order the model listed.
                    row.sort_unstable_by_key(|(d, _)| *d);
                    row
                }
                // No cheap enumeration: sweep every destination once.
                None => states
                    .iter()
                    .enumerate()
                    .filter_map(|(d, to)| {
                        let p = model.probability(from, to);
                        (p != 0.0).then_some((d, p))
                    })
                    .collect(),
            };
            rows.push(row);
        }
        Ok(Self::Sparse(rows))
    }

    pub fn state_count(&self) -> usize {
        match self {
            Self::Dense(matrix) => matrix.nrows(),
            Self::Sparse(rows) => rows.len(),
        }
    }

    pub fn nonzero_count(&self) -> usize {
        match self {
            Self::Dense(matrix) => matrix.iter().filter(|p| **p != 0.0).count(),
            Self::Sparse(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    /// One transition-only step. The result is not normalized.
    pub fn propagate(&self, belief: &Belief) -> Belief {
        match self {
            Self::Dense(matrix) => matrix.tr_mul(belief),
            Self::Sparse(rows) => {
                let mut predicted = Belief::zeros(rows.len());
                for (from, row) in rows.iter().enumerate() {
                    let mass = belief[from];
                    if mass == 0.0 {
                        continue;
                    }
                    for (to, p) in row {
                        predicted[*to] += mass * p;
                    }
                }
                predicted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demo::MatrixTransitionModel;
    use crate::space::{GridCoord, GridSpace, IndexSpace};
    use approx::assert_relative_eq;

    fn demo_matrix() -> DMatrix<f64> {
        DMatrix::from_row_slice(
            3,
            3,
            &[0.7, 0.3, 0.0, 0.0, 0.5, 0.5, 0.25, 0.0, 0.75],
        )
    }

    #[test]
    fn dense_and_sparse_agree() {
        let space = IndexSpace::new(3).unwrap();
        let states = space.states().unwrap();
        let model = MatrixTransitionModel::new(demo_matrix()).unwrap();
        let dense = TransitionKernel::compile(&space, &states, &model, KernelStrategy::Dense, 0).unwrap();
        let sparse = TransitionKernel::compile(&space, &states, &model, KernelStrategy::Sparse, 0).unwrap();
        assert_eq!(sparse.nonzero_count(), 6);

        let belief = Belief::from_vec(vec![0.2, 0.5, 0.3]);
        let a = dense.propagate(&belief);
        let b = sparse.propagate(&belief);
        for i in 0..3 {
            assert_relative_eq!(a[i], b[i], max_relative = 1e-12);
        }
        assert_relative_eq!(a[0], 0.2 * 0.7 + 0.3 * 0.25, max_relative = 1e-12);
    }

    #[test]
    fn auto_switches_on_the_dense_limit() {
        let space = IndexSpace::new(3).unwrap();
        let states = space.states().unwrap();
        let model = MatrixTransitionModel::new(demo_matrix()).unwrap();
        let small = TransitionKernel::compile(&space, &states, &model, KernelStrategy::Auto, 3).unwrap();
        let large = TransitionKernel::compile(&space, &states, &model, KernelStrategy::Auto, 2).unwrap();
        assert!(matches!(small, TransitionKernel::Dense(_)));
        assert!(matches!(large, TransitionKernel::Sparse(_)));
    }

    #[test]
    fn sweeps_models_without_successor_lists() {
        let space = GridSpace::new(3, 3).unwrap();
        let states = space.states().unwrap();
        // Stay put with probability 1.
        let stay = |from: &GridCoord, to: &GridCoord| if from == to { 1.0 } else { 0.0 };
        let kernel = TransitionKernel::compile(&space, &states, &stay, KernelStrategy::Sparse, 0).unwrap();
        assert_eq!(kernel.nonzero_count(), 9);
        assert_eq!(kernel.state_count(), 9);

        let belief = Belief::from_fn(9, |i, _| i as f64);
        assert_eq!(kernel.propagate(&belief), belief);
    }

    #[test]
    fn states_must_cover_the_space() {
        let space = IndexSpace::new(3).unwrap();
        let model = MatrixTransitionModel::new(demo_matrix()).unwrap();
        let result = TransitionKernel::compile(&space, &[0, 1], &model, KernelStrategy::Dense, 0);
        assert!(matches!(result, Err(FilterError::InvalidConfiguration(_))));
    }
}
