use crossterm::{
    QueueableCommand,
    style::{self, Color, Stylize},
};
use std::{fmt, io::Write};

use super::{Direction, Maze};

/// One position of the doubled-resolution grid: a cell, a passage or a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Space,
    Wall,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const TILE_WIDTH: usize = 2;
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Space => "  ".with(Color::Reset),
            Tile::Wall => "⬜".with(Color::White),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::TILE_WIDTH,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

impl Maze {
    /// Doubled-resolution grid of `(2 * height + 1)` rows of `(2 * width + 1)` values.
    ///
    /// Odd/odd positions are cell centers, even/even positions are pillars, and the
    /// remaining positions hold `space` only where the link between the two cells is open.
    pub fn export_to_full_grid<T: Clone>(&self, space: T, wall: T) -> Vec<Vec<T>> {
        let mut grid = vec![vec![wall; 2 * self.width + 1]; 2 * self.height + 1];
        for (x, y) in self.cells() {
            let (gx, gy) = (2 * x + 1, 2 * y + 1);
            grid[gy][gx] = space.clone();
            if self.is_open((x, y), Direction::Right) {
                grid[gy][gx + 1] = space.clone();
            }
            if self.is_open((x, y), Direction::Down) {
                grid[gy + 1][gx] = space.clone();
            }
        }
        grid
    }

    /// Writes the full grid to `out`, one line per row.
    pub fn write_tiles(&self, out: &mut impl Write) -> std::io::Result<()> {
        for row in self.export_to_full_grid(Tile::Space, Tile::Wall) {
            for tile in row {
                out.queue(style::Print(tile))?;
            }
            out.queue(style::Print("\r\n"))?;
        }
        out.flush()
    }

    /// Renders the maze to the terminal.
    pub fn render(&self) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        self.write_tiles(&mut stdout)
    }
}
