// trellis_sim/src/corpus.rs

//! Plain-text simulation files.
//!
//! The first line holds `width height frames`; every following line holds one
//! frame as `noisy_x noisy_y actual_x actual_y`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use trellis_core::space::{GridCoord, GridSpace};

use crate::error::{Result, SimError};
use crate::simulator::TouchFrame;

/// File extension of simulation files picked up by `load_corpus_dir`.
pub const SIMULATION_EXTENSION: &str = "sim";

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSimulation {
    pub width: usize,
    pub height: usize,
    pub frames: Vec<TouchFrame>,
}

pub fn save_simulation<W: Write>(
    writer: &mut W,
    width: usize,
    height: usize,
    frames: &[TouchFrame],
) -> Result<()> {
    writeln!(writer, "{} {} {}", width, height, frames.len())?;
    for frame in frames {
        writeln!(
            writer,
            "{} {} {} {}",
            frame.noisy.x, frame.noisy.y, frame.actual.x, frame.actual.y
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_simulation<R: BufRead>(reader: R) -> Result<LoadedSimulation> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(corpus_error(1, "missing `width height frames` header")),
        }
    };
    let [width, height, expected] = parse_fields::<usize, 3>(&header, 1)?;
    let space = GridSpace::new(width, height).map_err(|e| corpus_error(1, e))?;

    let mut frames = Vec::new();
    for (index, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;
        let [nx, ny, ax, ay] = parse_fields::<i64, 4>(&line, number)?;
        let frame = TouchFrame {
            noisy: GridCoord::new(nx, ny),
            actual: GridCoord::new(ax, ay),
        };
        if !space.contains(&frame.noisy) || !space.contains(&frame.actual) {
            return Err(corpus_error(
                number,
                format!("frame is outside the {width}x{height} screen"),
            ));
        }
        frames.push(frame);
    }

    if frames.len() != expected {
        return Err(corpus_error(
            frames.len() + 2,
            format!("header promises {expected} frames, found {}", frames.len()),
        ));
    }

    Ok(LoadedSimulation {
        width,
        height,
        frames,
    })
}

pub fn save_simulation_file(
    path: &Path,
    width: usize,
    height: usize,
    frames: &[TouchFrame],
) -> Result<()> {
    info!("Saving simulation to {:?}", path);
    let mut writer = BufWriter::new(File::create(path)?);
    save_simulation(&mut writer, width, height, frames)
}

pub fn load_simulation_file(path: &Path) -> Result<LoadedSimulation> {
    info!("Loading saved simulation from {:?}", path);
    load_simulation(BufReader::new(File::open(path)?))
}

/// Loads every `*.sim` file under `dir` (recursively, in file-name order),
/// one trajectory per file.
pub fn load_corpus_dir(dir: &Path) -> Result<Vec<LoadedSimulation>> {
    if !dir.is_dir() {
        return Err(SimError::CorpusDir {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let mut corpus = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| SimError::CorpusDir {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if entry.file_type().is_dir()
            || path.extension().map_or(true, |ext| ext != SIMULATION_EXTENSION)
        {
            continue;
        }
        corpus.push(load_simulation_file(path)?);
    }

    if corpus.is_empty() {
        warn!("No .{} files found under {:?}", SIMULATION_EXTENSION, dir);
    } else {
        info!("Loaded {} trajectories from {:?}", corpus.len(), dir);
    }
    Ok(corpus)
}

fn parse_fields<T: std::str::FromStr, const N: usize>(line: &str, number: usize) -> Result<[T; N]> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != N {
        return Err(corpus_error(
            number,
            format!("expected {N} fields, found {}", fields.len()),
        ));
    }
    let mut values = Vec::with_capacity(N);
    for field in fields {
        let value = field
            .parse::<T>()
            .map_err(|_| corpus_error(number, format!("`{field}` is not a valid number")))?;
        values.push(value);
    }
    values
        .try_into()
        .map_err(|_| corpus_error(number, "field count changed while parsing"))
}

fn corpus_error(line: usize, reason: impl ToString) -> SimError {
    SimError::Corpus {
        line,
        reason: reason.to_string(),
    }
}
