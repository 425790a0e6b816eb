// trellis_sim/src/app.rs

//! Runs a parsed command line: the REPL, a touchscreen session, or a config dump.

use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use trellis_core::models::demo::DemoModel;
use trellis_core::space::GridSpace;

use crate::cli::{Cli, Command, TouchscreenArgs};
use crate::config::ScenarioConfig;
use crate::corpus;
use crate::error::{Result, SimError};
use crate::evaluator::{evaluate_with, EvaluationReport};
use crate::prng::SimulationRng;
use crate::render::render_frame;
use crate::repl::run_repl;
use crate::simulator::{TouchFrame, TouchscreenSimulator};
use crate::touchscreen::TouchscreenTracker;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Repl { simple, steps } => {
            let model = if simple {
                DemoModel::Simple
            } else {
                DemoModel::Supplied
            };
            let stdin = io::stdin();
            run_repl(model, steps, stdin.lock(), &mut io::stdout())?;
            Ok(())
        }
        Command::Touchscreen(args) => {
            let mut out = io::stdout().lock();
            if let Some(report) = run_touchscreen(&args, &mut out)? {
                writeln!(out, "Score:\n{report}")?;
            }
            Ok(())
        }
        Command::Config { config } => {
            let config = ScenarioConfig::load(config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// One touchscreen session. Returns the score when `--evaluate` was given.
pub fn run_touchscreen<W: Write>(
    args: &TouchscreenArgs,
    out: &mut W,
) -> Result<Option<EvaluationReport>> {
    args.validate()?;
    let mut config = ScenarioConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    let mut rng = SimulationRng::new(config.simulation.seed);

    let (space, frames) = match &args.load_file {
        Some(path) => {
            let loaded = corpus::load_simulation_file(path)?;
            if (loaded.width, loaded.height)
                != (config.simulation.width, config.simulation.height)
            {
                info!(
                    "Using the {}x{} screen recorded in {:?}",
                    loaded.width, loaded.height, path
                );
            }
            (GridSpace::new(loaded.width, loaded.height)?, loaded.frames)
        }
        None => {
            info!("Running simulation.");
            let simulator = TouchscreenSimulator::new(
                config.simulation.width,
                config.simulation.height,
                config.simulator,
            )?;
            let frames = simulator.run(&mut rng.0, config.simulation.frames);
            (*simulator.space(), frames)
        }
    };

    if let Some(path) = &args.save_file {
        corpus::save_simulation_file(path, space.width(), space.height(), &frames)?;
    }

    if args.evaluate {
        let corpus = training_corpus(&config, &space, &mut rng)?;
        let mut tracker =
            TouchscreenTracker::train(space.width(), space.height(), &corpus, config.filter)?;

        let mut draw_error = None;
        let report = evaluate_with(&space, &frames, &mut tracker, |t, frame, estimate| {
            if args.show && draw_error.is_none() {
                if let Err(e) = write!(out, "{}", render_frame(&space, t, frame, Some(estimate))) {
                    draw_error = Some(e);
                }
            }
        })?;
        if let Some(e) = draw_error {
            return Err(e.into());
        }
        return Ok(Some(report));
    }

    if args.show {
        for (t, frame) in frames.iter().enumerate() {
            write!(out, "{}", render_frame(&space, t, frame, None))?;
        }
    }
    Ok(None)
}

/// Saved trajectories from `training.corpus_dir`, or fresh simulations.
fn training_corpus(
    config: &ScenarioConfig,
    space: &GridSpace,
    rng: &mut SimulationRng,
) -> Result<Vec<Vec<TouchFrame>>> {
    match &config.training.corpus_dir {
        Some(dir) => load_training_dir(dir, space),
        None => {
            let training = &config.training;
            info!(
                "Simulating {} training trajectories of {} frames",
                training.trajectories, training.frames_per_trajectory
            );
            let simulator =
                TouchscreenSimulator::new(space.width(), space.height(), config.simulator)?;
            Ok(simulator.create_simulations(
                &mut rng.0,
                training.trajectories,
                training.frames_per_trajectory,
            ))
        }
    }
}

fn load_training_dir(dir: &Path, space: &GridSpace) -> Result<Vec<Vec<TouchFrame>>> {
    let mut corpus = Vec::new();
    for loaded in corpus::load_corpus_dir(dir)? {
        if (loaded.width, loaded.height) != (space.width(), space.height()) {
            return Err(SimError::InvalidParameters(format!(
                "training file is {}x{} but the screen is {}x{}",
                loaded.width,
                loaded.height,
                space.width(),
                space.height()
            )));
        }
        corpus.push(loaded.frames);
    }
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("scenario.toml");
        std::fs::write(
            &path,
            r#"
            [simulation]
            seed = 3
            width = 6
            height = 6
            frames = 30

            [training]
            trajectories = 20
            frames_per_trajectory = 500
            "#,
        )
        .unwrap();
        path
    }

    #[test]
    fn save_then_evaluate_the_saved_run() {
        let dir = std::env::temp_dir().join(format!("trellis_app_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = scenario(&dir);
        let saved = dir.join("run.sim");

        let save = TouchscreenArgs {
            config: Some(config.clone()),
            save_file: Some(saved.clone()),
            show: true,
            ..TouchscreenArgs::default()
        };
        let mut shown = Vec::new();
        assert!(run_touchscreen(&save, &mut shown).unwrap().is_none());
        assert_eq!(String::from_utf8(shown).unwrap().matches("frame ").count(), 30);

        let load = TouchscreenArgs {
            config: Some(config),
            load_file: Some(saved.clone()),
            evaluate: true,
            ..TouchscreenArgs::default()
        };
        let mut sink = Vec::new();
        let report = run_touchscreen(&load, &mut sink).unwrap().unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(report.rubric_1 >= 0.0 && report.rubric_1 <= 35.0);
        assert!(report.rubric_2 >= 0.0 && report.rubric_2 <= 15.0);
        assert!(sink.is_empty());
    }

    #[test]
    fn training_dir_must_match_the_screen() {
        let dir = std::env::temp_dir().join(format!("trellis_train_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let frame = TouchFrame {
            noisy: trellis_core::space::GridCoord::new(0, 0),
            actual: trellis_core::space::GridCoord::new(0, 0),
        };
        corpus::save_simulation_file(&dir.join("small.sim"), 2, 2, &[frame]).unwrap();

        let space = GridSpace::new(4, 4).unwrap();
        let result = load_training_dir(&dir, &space);
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(result, Err(SimError::InvalidParameters(_))));
    }
}
