// trellis_sim/src/error.rs

use std::path::PathBuf;

use thiserror::Error;
use trellis_core::error::FilterError;

/// Failures of the harness around the filter: files, config, arguments.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A simulation file that does not follow the `w h frames` + frame-lines format.
    #[error("malformed simulation data at line {line}: {reason}")]
    Corpus { line: usize, reason: String },

    #[error("failed to walk corpus directory {path:?}: {reason}")]
    CorpusDir { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),

    /// Simulator, training or evaluation parameters that cannot produce a run.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid arguments: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
