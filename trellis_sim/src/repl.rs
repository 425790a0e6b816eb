// trellis_sim/src/repl.rs

//! Feed letters to one of the demonstration HMMs by hand and watch the belief.

use std::io::{BufRead, Write};

use tracing::warn;

use trellis_core::distribution::Distribution;
use trellis_core::estimation::{FilterConfig, ForwardFilter};
use trellis_core::models::demo::DemoModel;
use trellis_core::space::IndexSpace;

use crate::error::Result;

pub const DEFAULT_MAX_STEPS: usize = 10;

/// Runs the prompt loop until `max_steps` observations were accepted or
/// `input` is exhausted. Returns the filter in its final state.
pub fn run_repl<R: BufRead, W: Write>(
    model: DemoModel,
    max_steps: usize,
    input: R,
    output: &mut W,
) -> Result<ForwardFilter<IndexSpace, char>> {
    let hmm = model.build()?;
    let mut filter = ForwardFilter::new(
        IndexSpace::new(hmm.state_count)?,
        hmm.transition.as_ref(),
        hmm.sensor,
        FilterConfig::default(),
    )?;
    let alphabet = hmm.alphabet;

    writeln!(output, "Model: {:?}", model)?;
    let mut lines = input.lines();
    while (filter.timestep() as usize) < max_steps {
        let (belief, t) = filter.current_distribution();
        writeln!(output, "[t={}] {}", t, format_belief(belief))?;
        write!(output, "[t={}] Enter an observation: ", t)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            return Ok(filter);
        };
        let line = line?;
        let entry = line.trim();

        let mut chars = entry.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if alphabet.index_of(c).is_some() => c.to_ascii_uppercase(),
            _ => {
                let valid: String = alphabet.letters().iter().collect();
                writeln!(output, "Invalid observation {:?}: expected one of {}", entry, valid)?;
                continue;
            }
        };

        if let Err(e) = filter.ingest(&letter) {
            warn!("Observation {:?} rejected: {}", letter, e);
            writeln!(output, "Observation {:?} rejected: {}", letter, e)?;
        }
    }

    let (belief, t) = filter.current_distribution();
    writeln!(output, "[t={}] {}", t, format_belief(belief))?;
    Ok(filter)
}

pub fn format_belief(belief: &Distribution) -> String {
    let entries: Vec<String> = belief.as_slice().iter().map(|p| format!("{:.4}", p)).collect();
    format!("[{}]", entries.join(", "))
}
