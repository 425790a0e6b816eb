// trellis_sim/src/evaluator.rs

//! Scores a touchscreen tracker against a simulation, relative to the score
//! of simply trusting the noisy sensor.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use trellis_core::space::{GridCoord, GridSpace, StateSpace};
use trellis_core::types::GridFrame;

use crate::error::{Result, SimError};
use crate::simulator::TouchFrame;

/// Anything that turns one noisy touch reading into a belief frame.
pub trait FrameTracker {
    fn filter_noisy_data(&mut self, noisy: &GridCoord) -> Result<GridFrame>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Scaled score of the tracker's estimates, 0..=100-ish.
    pub accuracy_score: f64,
    /// The same score for the raw sensor reading.
    pub noisy_score: f64,
    /// Out of 35: how much of the gap between the sensor and perfect the tracker closes.
    pub rubric_1: f64,
    /// Frames where the tracker gave the true cell no more than uniform mass.
    pub missed_frames: usize,
    pub noisy_missed_frames: usize,
    /// Out of 15: reduction in missed frames relative to the sensor.
    pub rubric_2: f64,
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "accuracy_score: {:.3}", self.accuracy_score)?;
        writeln!(f, "noisy_score: {:.3}", self.noisy_score)?;
        writeln!(f, "rubric_1: {:.1}/35", self.rubric_1)?;
        writeln!(f, "missed_frames: {}", self.missed_frames)?;
        writeln!(f, "noisy_missed_frames: {}", self.noisy_missed_frames)?;
        write!(f, "rubric_2: {:.1}/15", self.rubric_2)
    }
}

/// A frame with all mass on `coord`.
pub fn one_hot(space: &GridSpace, coord: &GridCoord) -> Result<GridFrame> {
    space.index_of(coord)?;
    let mut frame = GridFrame::zeros(space.width(), space.height());
    frame[(coord.x as usize, coord.y as usize)] = 1.0;
    Ok(frame)
}

/// `(1 + 2<a,e> - <e,e>) / 2`, or 0 when `estimate` is not a distribution.
pub fn frame_score(actual: &GridFrame, estimate: &GridFrame) -> f64 {
    if actual.shape() != estimate.shape() {
        warn!(
            "Estimated frame has shape {:?}, expected {:?}",
            estimate.shape(),
            actual.shape()
        );
        return 0.0;
    }
    let total = estimate.sum();
    if estimate.iter().any(|p| *p < -0.001) || !(0.999..=1.001).contains(&total) {
        warn!("Estimated frame is not a probability distribution (sum {total})");
        return 0.0;
    }
    (1.0 + 2.0 * actual.dot(estimate) - estimate.dot(estimate)) / 2.0
}

/// True when the estimate puts more than uniform mass on the actual cell.
pub fn is_consistent(actual: &GridCoord, estimate: &GridFrame) -> bool {
    let cells = estimate.len();
    if cells == 0 || actual.x < 0 || actual.y < 0 {
        return false;
    }
    estimate
        .get((actual.x as usize, actual.y as usize))
        .map_or(false, |p| *p > 1.0 / cells as f64)
}

/// Maps raw scores in roughly `(0.2, 0.65)` onto `(0, 100)`.
pub fn scale_score(score: f64) -> f64 {
    if score > 0.2 {
        (score - 0.2) * 223.0
    } else {
        0.0
    }
}

pub fn evaluate<T: FrameTracker + ?Sized>(
    space: &GridSpace,
    frames: &[TouchFrame],
    tracker: &mut T,
) -> Result<EvaluationReport> {
    evaluate_with(space, frames, tracker, |_, _, _| {})
}

/// Like `evaluate`, calling `inspect(t, frame, estimate)` after every frame.
pub fn evaluate_with<T, F>(
    space: &GridSpace,
    frames: &[TouchFrame],
    tracker: &mut T,
    mut inspect: F,
) -> Result<EvaluationReport>
where
    T: FrameTracker + ?Sized,
    F: FnMut(usize, &TouchFrame, &GridFrame),
{
    if frames.is_empty() {
        return Err(SimError::InvalidParameters(
            "cannot evaluate an empty simulation".to_string(),
        ));
    }
    info!("Evaluating touchscreen tracker over {} frames", frames.len());

    let mut score = 0.0;
    let mut noisy_score = 0.0;
    let mut perfect_score = 0.0;
    let mut missed = 0;
    let mut noisy_missed = 0;

    for (t, frame) in frames.iter().enumerate() {
        let actual = one_hot(space, &frame.actual)?;
        let noisy = one_hot(space, &frame.noisy)?;
        let estimate = tracker.filter_noisy_data(&frame.noisy)?;

        score += frame_score(&actual, &estimate);
        noisy_score += frame_score(&actual, &noisy);
        perfect_score += frame_score(&actual, &actual);

        if !is_consistent(&frame.actual, &estimate) {
            missed += 1;
        }
        if !is_consistent(&frame.actual, &noisy) {
            noisy_missed += 1;
        }
        inspect(t, frame, &estimate);
    }

    let accuracy_score = round_to(scale_score(score / perfect_score), 3);
    let noisy_score = round_to(scale_score(noisy_score / perfect_score), 3);

    let headroom = 100.0 - noisy_score;
    let gain = if headroom > 0.0 {
        (accuracy_score - noisy_score) / headroom
    } else {
        0.0
    };
    let rubric_1 = (gain.max(0.0).sqrt() * 35.0).min(35.0);

    let rubric_2 = if noisy_missed == 0 {
        0.0
    } else {
        let reduction = (noisy_missed as f64 - missed as f64) / noisy_missed as f64;
        (reduction * 15.0).clamp(0.0, 15.0)
    };

    let report = EvaluationReport {
        accuracy_score,
        noisy_score,
        rubric_1,
        missed_frames: missed,
        noisy_missed_frames: noisy_missed,
        rubric_2,
    };
    info!(
        accuracy = report.accuracy_score,
        noisy = report.noisy_score,
        missed = report.missed_frames,
        "evaluation finished"
    );
    Ok(report)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Reports the sensor reading as certain.
    struct TrustTheSensor(GridSpace);

    impl FrameTracker for TrustTheSensor {
        fn filter_noisy_data(&mut self, noisy: &GridCoord) -> Result<GridFrame> {
            one_hot(&self.0, noisy)
        }
    }

    /// Knows the true trajectory in advance.
    struct Oracle {
        space: GridSpace,
        truth: std::vec::IntoIter<GridCoord>,
    }

    impl FrameTracker for Oracle {
        fn filter_noisy_data(&mut self, _: &GridCoord) -> Result<GridFrame> {
            let next = self.truth.next().unwrap();
            one_hot(&self.space, &next)
        }
    }

    fn frames() -> Vec<TouchFrame> {
        let noisy_offsets = [(0, 0), (1, 0), (0, 1), (2, 2), (0, 0), (1, 1)];
        noisy_offsets
            .iter()
            .enumerate()
            .map(|(i, (dx, dy))| {
                let actual = GridCoord::new(i as i64, 2);
                TouchFrame {
                    actual,
                    noisy: GridCoord::new(actual.x + dx, actual.y + dy),
                }
            })
            .collect()
    }

    #[test]
    fn frame_score_rewards_mass_on_the_true_cell() {
        let space = GridSpace::new(3, 3).unwrap();
        let actual = one_hot(&space, &GridCoord::new(1, 1)).unwrap();
        assert_abs_diff_eq!(frame_score(&actual, &actual), 1.0);

        let uniform = GridFrame::from_element(3, 3, 1.0 / 9.0);
        // (1 + 2/9 - 1/9) / 2
        assert_abs_diff_eq!(frame_score(&actual, &uniform), 5.0 / 9.0, epsilon = 1e-12);

        let elsewhere = one_hot(&space, &GridCoord::new(0, 0)).unwrap();
        assert_abs_diff_eq!(frame_score(&actual, &elsewhere), 0.0);
    }

    #[test]
    fn non_distributions_score_zero() {
        let space = GridSpace::new(2, 2).unwrap();
        let actual = one_hot(&space, &GridCoord::new(0, 0)).unwrap();
        let too_heavy = GridFrame::from_element(2, 2, 0.5);
        assert_eq!(frame_score(&actual, &too_heavy), 0.0);

        let negative = GridFrame::from_row_slice(2, 2, &[1.5, -0.5, 0.0, 0.0]);
        assert_eq!(frame_score(&actual, &negative), 0.0);

        let wrong_shape = GridFrame::from_element(1, 4, 0.25);
        assert_eq!(frame_score(&actual, &wrong_shape), 0.0);
    }

    #[test]
    fn consistency_needs_more_than_uniform_mass() {
        let uniform = GridFrame::from_element(2, 2, 0.25);
        assert!(!is_consistent(&GridCoord::new(1, 1), &uniform));

        let peaked = GridFrame::from_row_slice(2, 2, &[0.1, 0.1, 0.1, 0.7]);
        assert!(is_consistent(&GridCoord::new(1, 1), &peaked));
        assert!(!is_consistent(&GridCoord::new(0, 0), &peaked));
        assert!(!is_consistent(&GridCoord::new(-1, 0), &peaked));
    }

    #[test]
    fn scale_score_is_zero_below_the_floor() {
        assert_eq!(scale_score(0.1), 0.0);
        assert_eq!(scale_score(0.2), 0.0);
        assert_abs_diff_eq!(scale_score(0.65), 100.35, epsilon = 1e-9);
    }

    #[test]
    fn trusting_the_sensor_earns_no_rubric_points() {
        let space = GridSpace::new(8, 5).unwrap();
        let frames = frames();
        let report = evaluate(&space, &frames, &mut TrustTheSensor(space)).unwrap();
        assert_eq!(report.accuracy_score, report.noisy_score);
        assert_eq!(report.missed_frames, report.noisy_missed_frames);
        assert_eq!(report.noisy_missed_frames, 4);
        assert_eq!(report.rubric_1, 0.0);
        assert_eq!(report.rubric_2, 0.0);
    }

    #[test]
    fn a_perfect_tracker_earns_full_marks() {
        let space = GridSpace::new(8, 5).unwrap();
        let frames = frames();
        let mut oracle = Oracle {
            space,
            truth: frames
                .iter()
                .map(|f| f.actual)
                .collect::<Vec<_>>()
                .into_iter(),
        };
        let mut seen = 0;
        let report = evaluate_with(&space, &frames, &mut oracle, |t, _, _| {
            assert_eq!(t, seen);
            seen += 1;
        })
        .unwrap();
        assert_eq!(seen, frames.len());
        assert_eq!(report.missed_frames, 0);
        assert_abs_diff_eq!(report.accuracy_score, 178.4, epsilon = 1e-9);
        assert_abs_diff_eq!(report.rubric_1, 35.0);
        assert_abs_diff_eq!(report.rubric_2, 15.0);
    }

    #[test]
    fn empty_simulations_cannot_be_scored() {
        let space = GridSpace::new(2, 2).unwrap();
        assert!(matches!(
            evaluate(&space, &[], &mut TrustTheSensor(space)),
            Err(SimError::InvalidParameters(_))
        ));
    }
}
