//! Machine commands and their text form.

use std::fmt;

use tilt_math::Point3;

/// Work offset selection word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOffset {
    /// One of `G54` to `G59`.
    Standard(u32),
    /// Extended offset `G54.1 P<n>`.
    Extended(u32),
}

impl WorkOffset {
    /// Offset for a 1-based WCS index: 1 to 6 map to `G54`..`G59`, 7 and up
    /// to `G54.1 P1`, `P2`, ... Index 0 has no offset.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => None,
            1..=6 => Some(Self::Standard(53 + index)),
            n => Some(Self::Extended(n - 6)),
        }
    }
}

impl fmt::Display for WorkOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(g) => write!(f, "G{g}"),
            Self::Extended(p) => write!(f, "G54.1 P{p}"),
        }
    }
}

/// A single machine instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionCommand {
    /// Comment-only line.
    Comment(String),
    /// Verbatim line from a user script.
    RawScript(String),
    /// Rapid move to a point.
    Travel {
        /// Target.
        to: Point3,
        /// Feed rate.
        feed: f64,
    },
    /// Vertical move between paths.
    ZHop {
        /// Target Z.
        z: f64,
        /// Feed rate.
        feed: f64,
    },
    /// Rotary positioning.
    Rotate {
        /// Tilt axis word letter.
        a_axis: String,
        /// Tilt angle (degrees).
        a_deg: f64,
        /// Rotation axis word letter.
        c_axis: String,
        /// Rotation angle (degrees).
        c_deg: f64,
        /// Feed rate.
        feed: f64,
    },
    /// Store a work offset origin (`G10 L2`).
    SetWcs {
        /// 1-based WCS index.
        index: u32,
        /// Origin in machine coordinates.
        origin: Point3,
    },
    /// Select a work offset.
    ActivateWcs(WorkOffset),
    /// Printing move with absolute extruder position.
    Extrude {
        /// Target.
        to: Point3,
        /// Absolute extruder position after the move.
        e: f64,
        /// Feed rate.
        feed: f64,
    },
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(text) => write!(f, "; {text}"),
            Self::RawScript(line) => f.write_str(line),
            Self::Travel { to, feed } => {
                write!(f, "G0 X{:.4} Y{:.4} Z{:.4} F{:.0}", to.x, to.y, to.z, feed)
            }
            Self::ZHop { z, feed } => write!(f, "G1 Z{z:.4} F{feed:.0}"),
            Self::Rotate {
                a_axis,
                a_deg,
                c_axis,
                c_deg,
                feed,
            } => write!(f, "G0 {a_axis}{a_deg:.4} {c_axis}{c_deg:.4} F{feed:.0}"),
            Self::SetWcs { index, origin } => write!(
                f,
                "G10 L2 P{index} X{:.4} Y{:.4} Z{:.4}",
                origin.x, origin.y, origin.z
            ),
            Self::ActivateWcs(offset) => write!(f, "{offset}"),
            Self::Extrude { to, e, feed } => write!(
                f,
                "G1 X{:.4} Y{:.4} Z{:.4} E{:.5} F{:.0}",
                to.x, to.y, to.z, e, feed
            ),
        }
    }
}

/// A command with an optional trailing comment.
#[derive(Debug, Clone, PartialEq)]
pub struct GcodeLine {
    /// The instruction.
    pub command: MotionCommand,
    /// Appended as ` ; comment`.
    pub comment: Option<String>,
}

impl GcodeLine {
    /// A line without trailing comment.
    pub fn new(command: MotionCommand) -> Self {
        Self {
            command,
            comment: None,
        }
    }

    /// A line with trailing comment.
    pub fn with_comment(command: MotionCommand, comment: impl Into<String>) -> Self {
        Self {
            command,
            comment: Some(comment.into()),
        }
    }
}

impl fmt::Display for GcodeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        match &self.comment {
            Some(comment) if !comment.is_empty() => write!(f, " ; {comment}"),
            _ => Ok(()),
        }
    }
}
