mod bits;
pub mod direction;
pub mod grid;
mod marks;

pub use direction::Direction;
pub use grid::Tile;
pub use marks::Marks;

use crate::error::{MazeError, Result};

/// Cell coordinate `(x, y)`, with `(0, 0)` the top-left cell.
pub type Coord = (usize, usize);

/// Initial state of every link of a freshly built maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// All links closed, passages get carved open.
    #[default]
    Carving,
    /// All links open, walls get added.
    Room,
}

impl Mode {
    fn initial_link(self) -> Link {
        match self {
            Mode::Carving => Link::Closed,
            Mode::Room => Link::Open,
        }
    }
}

/// Wall/passage state of the edge between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Open,
    Closed,
}

/// Slot of a link in the arena: (cell index, 0 for its right edge / 1 for its down edge).
type LinkSlot = (usize, usize);

/// A rectangular grid of cells connected by links.
///
/// Every internal edge is stored exactly once, on the cell at its left or top end,
/// so both endpoints always observe the same open/closed state. Cells on the border
/// simply have no neighbor on their outer side.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    width: usize,
    height: usize,
    mode: Mode,
    links: Box<[[Link; 2]]>,
}

impl Maze {
    /// Creates a new maze with the given width and height, every link in the mode's initial state.
    pub fn new(width: usize, height: usize, mode: Mode) -> Self {
        let link = mode.initial_link();
        Maze {
            width,
            height,
            mode,
            links: vec![[link; 2]; width * height].into_boxed_slice(),
        }
    }

    /// Builds a maze and splices the given sub-mazes into it, in order.
    ///
    /// Each sub-maze keeps its internal links and visited marks. Links crossing the
    /// boundary of its rectangle are replaced with fresh links in this maze's mode.
    /// Overrides of all sub-mazes are applied once every sub-maze has been spliced.
    ///
    /// # Errors
    /// * `SubMazeOutOfBounds` if a sub-maze does not fit in the maze
    /// * `SubMazeOverlap` if a sub-maze overlaps a previously spliced one
    /// * `InvalidParameter` if an override names a cell outside its sub-maze
    /// * `OverrideWithoutNeighbor` if an override points out of the maze
    pub fn compose(
        width: usize,
        height: usize,
        mode: Mode,
        sub_mazes: Vec<SubMaze>,
    ) -> Result<Carved> {
        let mut carved = Carved::new(width, height, mode);
        let mut placed: Vec<(Coord, (usize, usize))> = Vec::with_capacity(sub_mazes.len());
        let mut overrides = Vec::new();

        for sub_maze in sub_mazes {
            let SubMaze {
                carved: sub,
                offset,
                overrides: sub_overrides,
            } = sub_maze;
            let size = (sub.maze.width(), sub.maze.height());

            let fits = offset.0.checked_add(size.0).is_some_and(|r| r <= width)
                && offset.1.checked_add(size.1).is_some_and(|b| b <= height);
            if !fits {
                return Err(MazeError::SubMazeOutOfBounds {
                    offset,
                    size,
                    parent: (width, height),
                });
            }
            let overlaps = placed.iter().any(|&(other, other_size)| {
                offset.0 < other.0 + other_size.0
                    && other.0 < offset.0 + size.0
                    && offset.1 < other.1 + other_size.1
                    && other.1 < offset.1 + size.1
            });
            if overlaps {
                return Err(MazeError::SubMazeOverlap { offset, size });
            }

            tracing::debug!(
                "[compose] splicing {}x{} sub-maze at {:?}",
                size.0,
                size.1,
                offset
            );
            carved.splice(sub, offset);
            placed.push((offset, size));
            overrides.extend(sub_overrides.into_iter().map(|o| (offset, size, o)));
        }

        for (offset, size, o) in overrides {
            if o.x >= size.0 || o.y >= size.1 {
                return Err(crate::error::invalid_parameter(
                    "override",
                    &(o.x, o.y),
                    &format!("outside of its {}x{} sub-maze", size.0, size.1),
                ));
            }
            let position = (offset.0 + o.x, offset.1 + o.y);
            if !carved.maze.has_neighbor(position, o.direction) {
                return Err(MazeError::OverrideWithoutNeighbor {
                    position,
                    direction: o.direction,
                });
            }
            carved.maze.set_link(position, o.direction, o.open);
        }

        Ok(carved)
    }

    /// Returns the height of the maze in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the width of the maze in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    /// All cell coordinates, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Read-only view of the cell at `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` is out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> Cell<'_> {
        self.get(x, y).unwrap_or_else(|| {
            panic!(
                "Cell ({x}, {y}) is out of bounds for a {}x{} maze",
                self.width, self.height
            )
        })
    }

    /// Read-only view of the cell at `(x, y)`, if it exists.
    pub fn get(&self, x: usize, y: usize) -> Option<Cell<'_>> {
        self.contains((x, y)).then_some(Cell { maze: self, x, y })
    }

    /// Coordinate of the neighbor of `from` in `direction`, if there is one.
    pub fn neighbor(&self, from: Coord, direction: Direction) -> Option<Coord> {
        if !self.contains(from) {
            return None;
        }
        let (dx, dy) = direction.offset();
        let x = from.0.checked_add_signed(dx)?;
        let y = from.1.checked_add_signed(dy)?;
        self.contains((x, y)).then_some((x, y))
    }

    pub fn has_neighbor(&self, from: Coord, direction: Direction) -> bool {
        self.neighbor(from, direction).is_some()
    }

    fn ravel_index(&self, (x, y): Coord) -> usize {
        y * self.width + x
    }

    fn link_slot(&self, from: Coord, direction: Direction) -> Option<LinkSlot> {
        let to = self.neighbor(from, direction)?;
        Some(match direction {
            Direction::Right => (self.ravel_index(from), 0),
            Direction::Down => (self.ravel_index(from), 1),
            Direction::Left => (self.ravel_index(to), 0),
            Direction::Up => (self.ravel_index(to), 1),
        })
    }

    fn expect_slot(&self, from: Coord, direction: Direction) -> LinkSlot {
        self.link_slot(from, direction).unwrap_or_else(|| {
            panic!(
                "Cell {from:?} has no neighbor to the {direction} in a {}x{} maze",
                self.width, self.height
            )
        })
    }

    /// Checks whether the link from `from` in `direction` is open.
    /// A missing neighbor is never open.
    pub fn is_open(&self, from: Coord, direction: Direction) -> bool {
        self.link_slot(from, direction)
            .is_some_and(|(idx, axis)| self.links[idx][axis] == Link::Open)
    }

    /// Opens the link between `from` and its neighbor in `direction`.
    ///
    /// # Panics
    /// If `from` has no neighbor in `direction`.
    pub fn open(&mut self, from: Coord, direction: Direction) {
        self.set_link(from, direction, true);
    }

    /// Closes the link between `from` and its neighbor in `direction`.
    ///
    /// # Panics
    /// If `from` has no neighbor in `direction`.
    pub fn close(&mut self, from: Coord, direction: Direction) {
        self.set_link(from, direction, false);
    }

    /// Sets the link between `from` and its neighbor in `direction` open or closed.
    ///
    /// # Panics
    /// If `from` has no neighbor in `direction`.
    pub fn set_link(&mut self, from: Coord, direction: Direction, open: bool) {
        let (idx, axis) = self.expect_slot(from, direction);
        self.links[idx][axis] = if open { Link::Open } else { Link::Closed };
    }

    /// Directions in which `from` is linked open to a neighbor.
    pub fn open_directions(&self, from: Coord) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |&d| self.is_open(from, d))
    }

    /// Number of open links around `from`.
    pub fn degree(&self, from: Coord) -> usize {
        self.open_directions(from).count()
    }

    /// Total number of open internal links.
    pub fn open_link_count(&self) -> usize {
        self.cells()
            .map(|c| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter(|&d| self.is_open(c, d))
                    .count()
            })
            .sum()
    }
}

/// Read-only view of one cell of a [`Maze`].
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    maze: &'a Maze,
    x: usize,
    y: usize,
}

impl<'a> Cell<'a> {
    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn coord(&self) -> Coord {
        (self.x, self.y)
    }

    pub fn has_neighbor(&self, direction: Direction) -> bool {
        self.maze.has_neighbor(self.coord(), direction)
    }

    pub fn get_neighbor(&self, direction: Direction) -> Option<Cell<'a>> {
        let (x, y) = self.maze.neighbor(self.coord(), direction)?;
        Some(Cell {
            maze: self.maze,
            x,
            y,
        })
    }

    pub fn is_open(&self, direction: Direction) -> bool {
        self.maze.is_open(self.coord(), direction)
    }
}

/// A maze together with the visited marks of the run(s) that carved it.
#[derive(Debug, Clone, PartialEq)]
pub struct Carved {
    pub maze: Maze,
    pub visited: Marks<bool>,
}

impl Carved {
    /// A fresh maze with no visited cell.
    pub fn new(width: usize, height: usize, mode: Mode) -> Self {
        Carved {
            maze: Maze::new(width, height, mode),
            visited: Marks::new(width, height, false),
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.count(|&v| v)
    }

    /// Moves the cells of `sub` into the rectangle starting at `offset`.
    /// The caller guarantees the rectangle fits.
    fn splice(&mut self, sub: Carved, offset: Coord) {
        let fresh = self.maze.mode.initial_link();
        for (sx, sy) in sub.maze.cells() {
            let pos = (offset.0 + sx, offset.1 + sy);
            self.visited[pos] = sub.visited[(sx, sy)];

            for (axis, direction) in [(0, Direction::Right), (1, Direction::Down)] {
                let Some((idx, _)) = self.maze.link_slot(pos, direction) else {
                    continue;
                };
                self.maze.links[idx][axis] = match sub.maze.link_slot((sx, sy), direction) {
                    Some((sub_idx, _)) => sub.maze.links[sub_idx][axis],
                    None => fresh,
                };
            }
            // Edges entering the rectangle from the left or from above
            if sx == 0 {
                if let Some((idx, axis)) = self.maze.link_slot(pos, Direction::Left) {
                    self.maze.links[idx][axis] = fresh;
                }
            }
            if sy == 0 {
                if let Some((idx, axis)) = self.maze.link_slot(pos, Direction::Up) {
                    self.maze.links[idx][axis] = fresh;
                }
            }
        }
    }
}

/// Forced state of one link of a sub-maze cell, applied after splicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Override {
    /// Sub-maze local x
    pub x: usize,
    /// Sub-maze local y
    pub y: usize,
    pub direction: Direction,
    pub open: bool,
}

/// A previously carved maze to be spliced into a larger one.
#[derive(Debug, Clone)]
pub struct SubMaze {
    pub carved: Carved,
    /// Top-left corner of the sub-maze in the parent
    pub offset: Coord,
    pub overrides: Vec<Override>,
}

impl SubMaze {
    pub fn new(carved: Carved, offset: Coord) -> Self {
        SubMaze {
            carved,
            offset,
            overrides: Vec::new(),
        }
    }

    /// Adds an override forcing the link of local cell `(x, y)` in `direction`.
    pub fn with_override(mut self, x: usize, y: usize, direction: Direction, open: bool) -> Self {
        self.overrides.push(Override {
            x,
            y,
            direction,
            open,
        });
        self
    }
}
