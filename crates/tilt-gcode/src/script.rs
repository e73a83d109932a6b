//! Extruder position tracking through user scripts.

use std::num::ParseFloatError;

use crate::warning::EmitWarning;

/// Extruder position after running `lines`, starting from `current`.
///
/// Only absolute set directives are understood: `G92 E<v>` and `G0`/`G1`
/// moves carrying an `E` word. Anything after `;` is ignored. Lines with an
/// unreadable `E` word leave the position unchanged and yield a warning.
pub fn track_extruder<S: AsRef<str>>(
    lines: &[S],
    current: f64,
    warnings: &mut Vec<EmitWarning>,
) -> f64 {
    let mut position = current;
    for line in lines {
        let line = line.as_ref();
        match extruder_word(line) {
            Some(Ok(e)) => position = e,
            Some(Err(_)) => warnings.push(EmitWarning::UnparsableExtruderValue {
                line: line.to_string(),
            }),
            None => {}
        }
    }
    position
}

/// The E value a line sets, if it sets one.
fn extruder_word(line: &str) -> Option<Result<f64, ParseFloatError>> {
    let code = line.split(';').next().unwrap_or_default().to_ascii_uppercase();
    let mut words = code.split_whitespace();

    if !matches!(words.next()?, "G92" | "G0" | "G00" | "G1" | "G01") {
        return None;
    }

    let value = words.find_map(|w| w.strip_prefix('E'))?;
    Some(value.parse::<f64>())
}
