//! Error types for maze construction, generation and import/export.

use std::fmt;
use std::path::PathBuf;

use crate::maze::{Coord, Direction};

/// Main error type for all maze operations
#[derive(Debug)]
pub enum MazeError {
    /// A maze needs at least one cell in each dimension
    InvalidDimensions {
        /// Requested width in cells
        width: usize,
        /// Requested height in cells
        height: usize,
    },

    /// A generator parameter failed validation
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A generator was run without a parameter it cannot do without
    MissingParameter {
        /// Name of the generator
        generator: &'static str,
        /// Name of the missing parameter
        parameter: &'static str,
    },

    /// A sub-maze rectangle does not fit inside its parent
    SubMazeOutOfBounds {
        /// Top-left corner of the sub-maze in the parent
        offset: Coord,
        /// Size of the sub-maze (width, height)
        size: (usize, usize),
        /// Size of the parent (width, height)
        parent: (usize, usize),
    },

    /// A sub-maze rectangle overlaps one spliced before it
    SubMazeOverlap {
        /// Top-left corner of the rejected sub-maze
        offset: Coord,
        /// Size of the rejected sub-maze (width, height)
        size: (usize, usize),
    },

    /// A sub-maze override points out of the parent grid
    OverrideWithoutNeighbor {
        /// Parent coordinate of the overridden cell
        position: Coord,
        /// Direction without a neighbor
        direction: Direction,
    },

    /// A bit grid cannot describe a valid maze
    MalformedBits {
        /// Description of what is wrong
        reason: String,
    },

    /// File system operation failure
    Io {
        /// Path involved in the operation
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid maze dimensions {width}x{height}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::MissingParameter {
                generator,
                parameter,
            } => {
                write!(f, "{generator} needs the '{parameter}' parameter")
            }
            Self::SubMazeOutOfBounds {
                offset,
                size,
                parent,
            } => {
                write!(
                    f,
                    "Sub-maze of size {}x{} at {offset:?} does not fit in a {}x{} maze",
                    size.0, size.1, parent.0, parent.1
                )
            }
            Self::SubMazeOverlap { offset, size } => {
                write!(
                    f,
                    "Sub-maze of size {}x{} at {offset:?} overlaps another sub-maze",
                    size.0, size.1
                )
            }
            Self::OverrideWithoutNeighbor {
                position,
                direction,
            } => {
                write!(f, "Cell {position:?} has no neighbor to the {direction}")
            }
            Self::MalformedBits { reason } => {
                write!(f, "Malformed maze bits: {reason}")
            }
            Self::Io { path, source } => {
                write!(f, "I/O error on '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for MazeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for maze results
pub type Result<T> = std::result::Result<T, MazeError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl fmt::Debug,
    reason: &impl ToString,
) -> MazeError {
    MazeError::InvalidParameter {
        parameter,
        value: format!("{value:?}"),
        reason: reason.to_string(),
    }
}

/// Create a malformed bits error
pub fn malformed_bits(reason: impl Into<String>) -> MazeError {
    MazeError::MalformedBits {
        reason: reason.into(),
    }
}
