//! Defaults used by the command-line front end

/// Maze width in cells
pub const DEFAULT_WIDTH: usize = 20;
/// Maze height in cells
pub const DEFAULT_HEIGHT: usize = 12;

/// Share of dead ends removed by the braid generator
pub const DEFAULT_BRAID_PERCENTAGE: f64 = 0.5;

/// File the bit grid is written to when `--export` is given without a path
pub const DEFAULT_EXPORT_FILE: &str = "maze.txt";

// The terminal is taken by the maze drawing, logs go to a file
pub const DEFAULT_LOG_DIR: &str = ".";
pub const DEFAULT_LOG_FILE: &str = "mazeweave.log";
