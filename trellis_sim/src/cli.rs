// trellis_sim/src/cli.rs

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ScenarioConfig;
use crate::error::{Result, SimError};
use crate::repl::DEFAULT_MAX_STEPS;

/// Trellis: exact forward filtering for discrete hidden Markov models.
///
/// This struct defines the command-line arguments of the `trellis` binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Type letters into a small demonstration HMM and watch the belief update.
    Repl {
        /// Use the three-letter model, which is easier to follow by hand.
        #[arg(long, default_value_t = false)]
        simple: bool,

        /// Number of observations to accept before exiting.
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        steps: usize,
    },

    /// Simulate a finger on a touchscreen and track it from noisy readings.
    Touchscreen(TouchscreenArgs),

    /// Print the fully resolved scenario configuration as TOML.
    Config {
        /// The path to the scenario TOML file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct TouchscreenArgs {
    /// The path to the scenario TOML file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The width of the touchscreen.
    #[arg(long)]
    pub width: Option<usize>,

    /// The height of the touchscreen.
    #[arg(long)]
    pub height: Option<usize>,

    /// The number of frames to simulate.
    #[arg(long)]
    pub frames: Option<usize>,

    /// Seed for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Train a tracker and score it against the simulation.
    #[arg(long, default_value_t = false)]
    pub evaluate: bool,

    /// Draw every frame to the terminal.
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Save the simulation to a file.
    #[arg(long, conflicts_with = "load_file")]
    pub save_file: Option<PathBuf>,

    /// Load the simulation from a file instead of running one.
    #[arg(long)]
    pub load_file: Option<PathBuf>,
}

impl TouchscreenArgs {
    /// Rejects flag combinations that leave nothing to do.
    pub fn validate(&self) -> Result<()> {
        if self.save_file.is_some() && self.load_file.is_some() {
            return Err(SimError::Usage(
                "both --save-file and --load-file were given".to_string(),
            ));
        }
        if self.load_file.is_some() && !self.show && !self.evaluate {
            return Err(SimError::Usage(
                "nothing to do for loaded simulation: --show and --evaluate were false"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Command-line values take precedence over the scenario file.
    pub fn apply(&self, config: &mut ScenarioConfig) {
        if let Some(width) = self.width {
            config.simulation.width = width;
        }
        if let Some(height) = self.height {
            config.simulation.height = height;
        }
        if let Some(frames) = self.frames {
            config.simulation.frames = frames;
        }
        if self.seed.is_some() {
            config.simulation.seed = self.seed;
        }
    }
}
