// trellis_sim/src/lib.rs

// This prelude is for convenience for other files WITHIN the trellis_sim crate.
pub mod prelude;

// The pieces of a touchscreen session, from simulated touches to a score.
pub mod corpus;
pub mod evaluator;
pub mod render;
pub mod simulator;
pub mod touchscreen;

// Configuration, randomness and the command-line surface.
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod prng;
pub mod repl;
