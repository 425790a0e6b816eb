// trellis_sim/tests/session.rs

use std::io::Cursor;

use trellis_sim::corpus::{load_simulation, save_simulation};
use trellis_sim::evaluator::evaluate;
use trellis_sim::prelude::*;

#[test]
fn seeded_sessions_score_identically() {
    let config = ScenarioConfig::from_toml_str(
        r#"
        [simulation]
        seed = 21
        width = 8
        height = 8
        frames = 60
        "#,
    )
    .unwrap();

    let score = || {
        let mut rng = SimulationRng::new(config.simulation.seed);
        let simulator = TouchscreenSimulator::new(
            config.simulation.width,
            config.simulation.height,
            config.simulator,
        )
        .unwrap();
        let run = simulator.run(&mut rng.0, config.simulation.frames);
        let corpus = simulator.create_simulations(&mut rng.0, 30, 1_000);
        let mut tracker =
            TouchscreenTracker::train(8, 8, &corpus, config.filter).unwrap();
        evaluate(simulator.space(), &run, &mut tracker).unwrap()
    };

    let first = score();
    assert_eq!(first, score());
    assert!(first.accuracy_score >= first.noisy_score);
}

#[test]
fn a_saved_run_replays_through_the_tracker() {
    let simulator = TouchscreenSimulator::new(5, 7, SimulatorParams::default()).unwrap();
    let mut rng = SimulationRng::new(Some(4));
    let run = simulator.run(&mut rng.0, 25);

    let mut buffer = Vec::new();
    save_simulation(&mut buffer, 5, 7, &run).unwrap();
    let loaded = load_simulation(Cursor::new(buffer)).unwrap();
    assert_eq!(loaded.frames, run);

    let corpus = simulator.create_simulations(&mut rng.0, 10, 500);
    let mut tracker = TouchscreenTracker::train(
        loaded.width,
        loaded.height,
        &corpus,
        ScenarioConfig::default().filter,
    )
    .unwrap();
    for frame in &loaded.frames {
        let belief = tracker.filter_noisy_data(&frame.noisy).unwrap();
        assert_eq!(belief.shape(), (5, 7));
    }
    assert_eq!(tracker.filter().timestep(), 25);
}
