use rand::{Rng, seq::SliceRandom};
use std::fmt;

/// One of the four compass directions between adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// All directions, in the order used by deterministic scans and the bit layout.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }

    /// The two directions orthogonal to this one.
    pub fn perpendiculars(self) -> [Direction; 2] {
        match self {
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
        }
    }

    /// The three directions different from this one.
    pub fn others(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| d != self)
    }

    /// Coordinate delta (dx, dy) of one step in this direction. Y grows downwards.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    /// Bit flag of this direction in the exported 4-bit cell encoding.
    pub fn bit(self) -> u8 {
        match self {
            Direction::Left => 1,
            Direction::Up => 2,
            Direction::Right => 4,
            Direction::Down => 8,
        }
    }

    /// All four directions in uniformly random order.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> [Direction; 4] {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        directions
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Up => write!(f, "up"),
            Direction::Right => write!(f, "right"),
            Direction::Down => write!(f, "down"),
        }
    }
}
