// trellis_sim/src/simulator.rs

//! A finger dragged across a touchscreen, and the jittery sensor that reports it.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use trellis_core::space::{GridCoord, GridSpace};

use crate::error::{Result, SimError};

/// Tunables for the finger motion and the sensor noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorParams {
    /// Probability of keeping the current velocity for one more frame.
    pub momentum: f64,
    /// Standard deviation (in cells) of the per-axis sensor offset.
    pub noise_stddev: f64,
}

impl Default for SimulatorParams {
    fn default() -> Self {
        Self {
            momentum: 0.8,
            noise_stddev: 1.0,
        }
    }
}

/// One simulated frame: where the sensor says the finger is, and where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchFrame {
    pub noisy: GridCoord,
    pub actual: GridCoord,
}

impl TouchFrame {
    /// `(observation, hidden state)`, the shape the estimator learns from.
    pub fn as_pair(&self) -> (GridCoord, GridCoord) {
        (self.noisy, self.actual)
    }
}

#[derive(Debug, Clone)]
pub struct TouchscreenSimulator {
    space: GridSpace,
    params: SimulatorParams,
    noise: Normal<f64>,
}

impl TouchscreenSimulator {
    pub fn new(width: usize, height: usize, params: SimulatorParams) -> Result<Self> {
        let space = GridSpace::new(width, height)?;
        if !(0.0..=1.0).contains(&params.momentum) {
            return Err(SimError::InvalidParameters(format!(
                "momentum must be in [0, 1], got {}",
                params.momentum
            )));
        }
        if !params.noise_stddev.is_finite() {
            return Err(SimError::InvalidParameters(format!(
                "noise_stddev must be finite, got {}",
                params.noise_stddev
            )));
        }
        let noise = Normal::new(0.0, params.noise_stddev)
            .map_err(|e| SimError::InvalidParameters(format!("noise_stddev: {e}")))?;
        Ok(Self {
            space,
            params,
            noise,
        })
    }

    pub fn space(&self) -> &GridSpace {
        &self.space
    }

    pub fn params(&self) -> &SimulatorParams {
        &self.params
    }

    /// Simulates one continuous touch lasting `frames` frames.
    pub fn run(&self, rng: &mut ChaCha8Rng, frames: usize) -> Vec<TouchFrame> {
        let width = self.space.width() as i64;
        let height = self.space.height() as i64;

        let mut position = GridCoord::new(rng.gen_range(0..width), rng.gen_range(0..height));
        let mut velocity = random_velocity(rng);
        let mut out = Vec::with_capacity(frames);

        for _ in 0..frames {
            out.push(TouchFrame {
                noisy: self.observe(rng, position),
                actual: position,
            });

            if !rng.gen_bool(self.params.momentum) {
                velocity = random_velocity(rng);
            }
            // Bounce: reverse any axis that would leave the screen.
            if !(0..width).contains(&(position.x + velocity.x)) {
                velocity.x = -velocity.x;
            }
            if !(0..height).contains(&(position.y + velocity.y)) {
                velocity.y = -velocity.y;
            }
            position = self.space.clamp(GridCoord::new(
                position.x + velocity.x,
                position.y + velocity.y,
            ));
        }

        debug!(frames, "simulated touch trajectory");
        out
    }

    /// `count` independent touches, e.g. as a training corpus.
    pub fn create_simulations(
        &self,
        rng: &mut ChaCha8Rng,
        count: usize,
        frames: usize,
    ) -> Vec<Vec<TouchFrame>> {
        (0..count).map(|_| self.run(rng, frames)).collect()
    }

    fn observe(&self, rng: &mut ChaCha8Rng, actual: GridCoord) -> GridCoord {
        let dx = self.noise.sample(rng).round() as i64;
        let dy = self.noise.sample(rng).round() as i64;
        self.space.clamp(GridCoord::new(
            actual.x.saturating_add(dx),
            actual.y.saturating_add(dy),
        ))
    }
}

fn random_velocity(rng: &mut ChaCha8Rng) -> GridCoord {
    GridCoord::new(rng.gen_range(-1..=1), rng.gen_range(-1..=1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn simulator(params: SimulatorParams) -> TouchscreenSimulator {
        TouchscreenSimulator::new(8, 5, params).unwrap()
    }

    #[test]
    fn frames_stay_on_screen() {
        let sim = simulator(SimulatorParams {
            momentum: 0.9,
            noise_stddev: 3.0,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let frames = sim.run(&mut rng, 500);
        assert_eq!(frames.len(), 500);
        for frame in &frames {
            assert!(sim.space().contains(&frame.actual));
            assert!(sim.space().contains(&frame.noisy));
        }
    }

    #[test]
    fn huge_noise_is_clamped_to_the_screen() {
        let sim = simulator(SimulatorParams {
            momentum: 0.8,
            noise_stddev: 1e30,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for frame in sim.run(&mut rng, 50) {
            assert!(sim.space().contains(&frame.noisy));
        }
    }

    #[test]
    fn finger_moves_at_most_one_cell_per_frame() {
        let sim = simulator(SimulatorParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let frames = sim.run(&mut rng, 300);
        for pair in frames.windows(2) {
            assert!(pair[0].actual.chebyshev_distance(&pair[1].actual) <= 1);
        }
    }

    #[test]
    fn zero_noise_reports_the_true_position() {
        let sim = simulator(SimulatorParams {
            momentum: 0.5,
            noise_stddev: 0.0,
        });
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(sim.run(&mut rng, 50).iter().all(|f| f.noisy == f.actual));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let sim = simulator(SimulatorParams::default());
        let a = sim.create_simulations(&mut ChaCha8Rng::seed_from_u64(9), 3, 40);
        let b = sim.create_simulations(&mut ChaCha8Rng::seed_from_u64(9), 3, 40);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.iter().all(|t| t.len() == 40));
    }

    #[test]
    fn bad_parameters_are_rejected() {
        let bad_momentum = SimulatorParams {
            momentum: 1.5,
            ..SimulatorParams::default()
        };
        assert!(matches!(
            TouchscreenSimulator::new(4, 4, bad_momentum),
            Err(SimError::InvalidParameters(_))
        ));
        let bad_noise = SimulatorParams {
            noise_stddev: -1.0,
            ..SimulatorParams::default()
        };
        assert!(matches!(
            TouchscreenSimulator::new(4, 4, bad_noise),
            Err(SimError::InvalidParameters(_))
        ));
        let infinite_noise = SimulatorParams {
            noise_stddev: f64::INFINITY,
            ..SimulatorParams::default()
        };
        assert!(matches!(
            TouchscreenSimulator::new(4, 4, infinite_noise),
            Err(SimError::InvalidParameters(_))
        ));
        assert!(matches!(
            TouchscreenSimulator::new(0, 4, SimulatorParams::default()),
            Err(SimError::Filter(_))
        ));
    }
}
