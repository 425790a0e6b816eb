// trellis_sim/src/main.rs

//! The `trellis` command-line tool.
//!
//! `cargo run --bin trellis -- touchscreen --evaluate --seed 1`

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use trellis_sim::app;
use trellis_sim::cli::Cli;

/// A good filter for focusing on our crates' logs during development.
const DEFAULT_LOG_FILTER: &str = "info,trellis_core=info,trellis_sim=debug";

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // Logs go to stderr so stdout carries only beliefs, frames and scores.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = app::run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}
