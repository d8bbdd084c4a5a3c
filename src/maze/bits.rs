//! 4-bit cell encoding of a maze: bit0 = left open, bit1 = up, bit2 = right, bit3 = down.

use std::path::Path;

use super::{Direction, Maze, Mode};
use crate::error::{MazeError, Result, malformed_bits};

impl Maze {
    /// One 4-bit value per cell, indexed `[y][x]`.
    pub fn export_to_bits(&self) -> Vec<Vec<u8>> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        self.open_directions((x, y))
                            .fold(0u8, |value, direction| value | direction.bit())
                    })
                    .collect()
            })
            .collect()
    }

    /// Rebuilds a maze from its bit grid.
    ///
    /// # Errors
    /// `MalformedBits` if the grid is empty or ragged, a value does not fit in 4 bits,
    /// a bit points out of the grid, or two neighbors disagree about their shared link.
    pub fn from_bits(rows: &[Vec<u8>]) -> Result<Maze> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(malformed_bits("the grid has no cell"));
        }
        if let Some(y) = rows.iter().position(|row| row.len() != width) {
            return Err(malformed_bits(format!(
                "row {y} has {} cells instead of {width}",
                rows[y].len()
            )));
        }

        let mut maze = Maze::new(width, height, Mode::Carving);
        for (x, y) in maze.cells() {
            let value = rows[y][x];
            if value > 0b1111 {
                return Err(malformed_bits(format!(
                    "cell ({x}, {y}) has value {value}, above 15"
                )));
            }
            for direction in Direction::ALL {
                if value & direction.bit() == 0 {
                    continue;
                }
                let Some((nx, ny)) = maze.neighbor((x, y), direction) else {
                    return Err(malformed_bits(format!(
                        "cell ({x}, {y}) is open to the {direction} on the border"
                    )));
                };
                if rows[ny][nx] & direction.opposite().bit() == 0 {
                    return Err(malformed_bits(format!(
                        "cell ({x}, {y}) is open to the {direction} but ({nx}, {ny}) is closed"
                    )));
                }
                maze.open((x, y), direction);
            }
        }
        Ok(maze)
    }

    /// The bit grid as text: whitespace separated values, one row per line.
    pub fn to_bits_text(&self) -> String {
        let mut text = String::with_capacity(self.width * self.height * 3);
        for row in self.export_to_bits() {
            for value in row {
                text.push_str(&value.to_string());
                text.push(' ');
            }
            text.push('\n');
        }
        text
    }

    /// Parses the text form produced by [`Maze::to_bits_text`].
    ///
    /// # Errors
    /// `MalformedBits` if a token is not a number or the grid is invalid.
    pub fn parse_bits_text(text: &str) -> Result<Maze> {
        let rows = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(y, line)| {
                line.split_whitespace()
                    .map(|token| {
                        token.parse::<u8>().map_err(|e| {
                            malformed_bits(format!("invalid value '{token}' on row {y}: {e}"))
                        })
                    })
                    .collect::<Result<Vec<u8>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Maze::from_bits(&rows)
    }

    /// Writes the bit grid text to `path`.
    ///
    /// # Errors
    /// `Io` if the file cannot be written.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bits_text()).map_err(|source| MazeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Exported {}x{} maze to {}", self.width, self.height, path.display());
        Ok(())
    }

    /// Reads a maze previously written by [`Maze::export`].
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `MalformedBits` if its content is invalid.
    pub fn import(path: impl AsRef<Path>) -> Result<Maze> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MazeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Maze::parse_bits_text(&text)
    }
}
