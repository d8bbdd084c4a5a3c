//! Grid maze generation: perfect, braided, spiral, composite and single-path mazes.

pub mod config;
pub mod error;
pub mod generators;
pub mod maze;

pub use error::{MazeError, Result};
