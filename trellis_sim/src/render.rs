// trellis_sim/src/render.rs

//! Terminal drawing of touchscreen frames. Rows follow the first (`x`) index,
//! columns the second (`y`), the same layout as a `GridFrame`.

use trellis_core::space::GridSpace;
use trellis_core::types::GridFrame;

use crate::simulator::TouchFrame;

const SHADES: &[u8] = b" .:-=+*#%@";

fn screen_cell(frame: &TouchFrame, x: i64, y: i64) -> char {
    let noisy = frame.noisy.x == x && frame.noisy.y == y;
    let actual = frame.actual.x == x && frame.actual.y == y;
    match (noisy, actual) {
        (true, true) => 'X',
        (false, true) => 'A',
        (true, false) => 'n',
        (false, false) => '.',
    }
}

/// Shade relative to the frame's peak so diffuse beliefs stay visible.
fn belief_cell(estimate: &GridFrame, x: usize, y: usize, peak: f64) -> char {
    let p = estimate.get((x, y)).copied().unwrap_or(0.0);
    if peak <= 0.0 || p <= 0.0 {
        return ' ';
    }
    let level = ((p / peak) * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[level.min(SHADES.len() - 1)] as char
}

/// The screen with the actual (`A`) and noisy (`n`) positions, `X` where they
/// coincide, and the tracker's belief beside it when one is given.
pub fn render_frame(
    space: &GridSpace,
    t: usize,
    frame: &TouchFrame,
    estimate: Option<&GridFrame>,
) -> String {
    let peak = estimate.map_or(0.0, |e| e.max());
    let mut out = format!("frame {t}\n");
    for x in 0..space.width() {
        for y in 0..space.height() {
            out.push(screen_cell(frame, x as i64, y as i64));
        }
        if let Some(estimate) = estimate {
            out.push_str("   |");
            for y in 0..space.height() {
                out.push(belief_cell(estimate, x, y, peak));
            }
            out.push('|');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::space::GridCoord;

    #[test]
    fn marks_noisy_and_actual_positions() {
        let space = GridSpace::new(2, 3).unwrap();
        let frame = TouchFrame {
            noisy: GridCoord::new(1, 2),
            actual: GridCoord::new(0, 0),
        };
        assert_eq!(render_frame(&space, 4, &frame, None), "frame 4\nA..\n..n\n");

        let same = TouchFrame {
            noisy: GridCoord::new(0, 1),
            actual: GridCoord::new(0, 1),
        };
        assert_eq!(render_frame(&space, 0, &same, None), "frame 0\n.X.\n...\n");
    }

    #[test]
    fn belief_is_shaded_against_its_peak() {
        let space = GridSpace::new(1, 3).unwrap();
        let frame = TouchFrame {
            noisy: GridCoord::new(0, 0),
            actual: GridCoord::new(0, 0),
        };
        let estimate = GridFrame::from_row_slice(1, 3, &[0.8, 0.2, 0.0]);
        let drawn = render_frame(&space, 1, &frame, Some(&estimate));
        assert_eq!(drawn, "frame 1\nX..   |@: |\n");
    }
}
