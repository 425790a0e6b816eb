// trellis_sim/src/touchscreen.rs

use tracing::info;

use trellis_core::estimation::{FilterConfig, ForwardFilter};
use trellis_core::models::empirical::EmpiricalEstimator;
use trellis_core::space::{GridCoord, GridSpace};
use trellis_core::types::GridFrame;

use crate::error::{Result, SimError};
use crate::evaluator::FrameTracker;
use crate::simulator::TouchFrame;

/// Tracks a finger on a `width x height` screen with models learned from
/// simulated touches.
#[derive(Clone)]
pub struct TouchscreenTracker {
    filter: ForwardFilter<GridSpace, GridCoord>,
}

impl TouchscreenTracker {
    pub fn train(
        width: usize,
        height: usize,
        corpus: &[Vec<TouchFrame>],
        config: FilterConfig,
    ) -> Result<Self> {
        let space = GridSpace::new(width, height)?;

        let mut estimator = EmpiricalEstimator::<GridCoord, GridCoord>::new();
        for trajectory in corpus {
            let pairs: Vec<_> = trajectory.iter().map(TouchFrame::as_pair).collect();
            estimator.record_trajectory(&pairs);
        }
        if estimator.sample_count() == 0 {
            return Err(SimError::InvalidParameters(
                "training corpus has no frames".to_string(),
            ));
        }
        let model = estimator.finalize();
        info!(
            "Trained touchscreen models on {} frames from {} trajectories",
            model.sample_count(),
            model.trajectory_count()
        );

        let filter: ForwardFilter<GridSpace, GridCoord> = ForwardFilter::new(
            space,
            &model.transition_model(),
            Box::new(model.sensor_model()),
            config,
        )?;
        Ok(Self { filter })
    }

    /// Folds one noisy reading into the belief and returns it as a
    /// `width x height` frame indexed `[(x, y)]`.
    pub fn filter_noisy_data(&mut self, noisy: &GridCoord) -> Result<GridFrame> {
        let space = *self.filter.space();
        let belief = self.filter.ingest(noisy)?;
        Ok(belief.to_grid(&space)?)
    }

    pub fn filter(&self) -> &ForwardFilter<GridSpace, GridCoord> {
        &self.filter
    }
}

impl FrameTracker for TouchscreenTracker {
    fn filter_noisy_data(&mut self, noisy: &GridCoord) -> Result<GridFrame> {
        TouchscreenTracker::filter_noisy_data(self, noisy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use crate::simulator::{SimulatorParams, TouchscreenSimulator};
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use trellis_core::estimation::{DegeneratePolicy, TransitionKernel};

    fn config() -> FilterConfig {
        FilterConfig {
            on_degenerate: DegeneratePolicy::FallBackToPrediction,
            ..FilterConfig::default()
        }
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(matches!(
            TouchscreenTracker::train(4, 4, &[], config()),
            Err(SimError::InvalidParameters(_))
        ));
        assert!(matches!(
            TouchscreenTracker::train(4, 4, &[Vec::new()], config()),
            Err(SimError::InvalidParameters(_))
        ));
    }

    #[test]
    fn trained_tracker_beats_the_raw_sensor() {
        let simulator = TouchscreenSimulator::new(
            10,
            10,
            SimulatorParams {
                momentum: 0.8,
                noise_stddev: 1.0,
            },
        )
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let corpus = simulator.create_simulations(&mut rng, 40, 2_000);
        let mut tracker = TouchscreenTracker::train(10, 10, &corpus, config()).unwrap();
        assert!(matches!(tracker.filter().kernel(), TransitionKernel::Sparse(_)));

        let test_run = simulator.run(&mut rng, 200);
        let frame = tracker.filter_noisy_data(&test_run[0].noisy).unwrap();
        assert_eq!(frame.shape(), (10, 10));
        assert_relative_eq!(frame.sum(), 1.0, max_relative = 1e-9);

        let report = evaluate(simulator.space(), &test_run[1..], &mut tracker).unwrap();
        assert!(report.accuracy_score > report.noisy_score);
        assert!(report.missed_frames < report.noisy_missed_frames);
    }
}
