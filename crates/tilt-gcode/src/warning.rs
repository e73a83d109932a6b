//! Non-fatal diagnostics collected during motion emission.

use thiserror::Error;

/// A problem absorbed while emitting motion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmitWarning {
    /// A script referenced an unknown placeholder and was emitted unexpanded.
    #[error("{script} script: unknown placeholder {{{name}}}; emitted unexpanded")]
    UnresolvedPlaceholder {
        /// Which script.
        script: &'static str,
        /// Placeholder name.
        name: String,
    },

    /// A script had unbalanced braces and was emitted unexpanded.
    #[error("{script} script: {reason}; emitted unexpanded")]
    MalformedTemplate {
        /// Which script.
        script: &'static str,
        /// Parser message.
        reason: String,
    },

    /// A setup carried a WCS index with no work offset.
    #[error("setup {setup}: WCS index {index} is not valid; no offset activated")]
    InvalidWcsIndex {
        /// 1-based setup number.
        setup: usize,
        /// The offending index.
        index: u32,
    },

    /// A path had fewer than two points and was not printed.
    #[error("setup {setup}, layer {layer}, path {path}: fewer than two points; skipped")]
    DegeneratePath {
        /// 1-based setup number.
        setup: usize,
        /// 1-based layer number.
        layer: usize,
        /// 1-based path number.
        path: usize,
    },

    /// A script line carried an extruder word that is not a number.
    #[error("could not parse extruder value in script line '{line}'")]
    UnparsableExtruderValue {
        /// The script line.
        line: String,
    },
}
