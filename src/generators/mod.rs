use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::{Arc, atomic::AtomicBool};

mod braid;
mod even_backtrack;
mod frontier;
mod hunt_and_kill;
mod labyrinth;
mod long_path;
mod passage;
mod random_set;
mod recur_backtrack;
mod room;
mod spiral;

pub use braid::braid;
pub use even_backtrack::even_backtrack;
pub use frontier::frontier;
pub use hunt_and_kill::hunt_and_kill;
pub use labyrinth::labyrinth;
pub use long_path::{LongPathOutcome, long_path};
pub use passage::passage;
pub use random_set::RandomSet;
pub use recur_backtrack::recursive_backtrack;
pub use room::room;
pub use spiral::spiral;

use crate::error::{MazeError, Result, invalid_parameter};
use crate::maze::{Carved, Coord, Direction, Marks, Maze, Mode};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Cell a generator starts carving from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Random,
    Center,
    At(Coord),
}

impl Origin {
    fn resolve<R: Rng + ?Sized>(self, maze: &Maze, rng: &mut R) -> Result<Coord> {
        match self {
            Origin::Random => Ok((
                rng.random_range(0..maze.width()),
                rng.random_range(0..maze.height()),
            )),
            Origin::Center => Ok((maze.width() / 2, maze.height() / 2)),
            Origin::At(coord) if maze.contains(coord) => Ok(coord),
            Origin::At(coord) => Err(invalid_parameter(
                "origin",
                &coord,
                &format!("outside of the {}x{} maze", maze.width(), maze.height()),
            )),
        }
    }
}

/// Optional inputs shared by the generators.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Existing maze to carve into instead of a fresh one. Its dimensions take
    /// precedence over the requested ones, and its visited cells are left alone.
    pub target: Option<Carved>,
    pub origin: Origin,
}

impl Params {
    pub fn with_target(target: Carved, origin: Origin) -> Self {
        Params {
            target: Some(target),
            origin,
        }
    }
}

/// Available maze generators, with their algorithm-specific arguments.
#[derive(Debug, Clone)]
pub enum Generator {
    RecurBacktrack,
    HuntAndKill,
    Labyrinth,
    Room,
    Passage {
        start: Option<Coord>,
        end: Option<Coord>,
    },
    Spiral {
        exits: Vec<Coord>,
        clockwise: bool,
    },
    Frontier,
    Braid {
        base: Box<Generator>,
        percentage: f64,
    },
    LongPath {
        cancel: Option<Arc<AtomicBool>>,
    },
    EvenBacktrack,
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::RecurBacktrack => write!(f, "Recursive Backtracker"),
            Generator::HuntAndKill => write!(f, "Hunt and Kill"),
            Generator::Labyrinth => write!(f, "Greedy Labyrinth"),
            Generator::Room => write!(f, "Empty Room"),
            Generator::Passage { .. } => write!(f, "Passage"),
            Generator::Spiral { clockwise, .. } => {
                let rotation = if *clockwise { "Clockwise" } else { "Counter-Clockwise" };
                write!(f, "{rotation} Spiral")
            }
            Generator::Frontier => write!(f, "Randomized Frontier Flood"),
            Generator::Braid { base, percentage } => {
                write!(f, "Braid ({:.0}% of dead ends) over {base}", percentage * 100.0)
            }
            Generator::LongPath { .. } => write!(f, "Parity Long Path"),
            Generator::EvenBacktrack => write!(f, "Even Backtracker"),
        }
    }
}

/// Runs `generator` on a fresh `width` x `height` maze, or on `params.target`.
///
/// A cancelled or stuck [`Generator::LongPath`] still returns its partial maze here
/// and only logs a warning; call [`long_path`] directly to get the completion flag.
pub fn generate_maze<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    generator: &Generator,
    params: Params,
    rng: &mut R,
) -> Result<Carved> {
    tracing::info!("[generate] {} on a {}x{} maze", generator, width, height);
    let carved = match generator {
        Generator::RecurBacktrack => recursive_backtrack(width, height, params, rng)?,
        Generator::HuntAndKill => hunt_and_kill(width, height, params, rng)?,
        Generator::Labyrinth => labyrinth(width, height, params, rng)?,
        Generator::Room => room(width, height, params)?,
        Generator::Passage { start, end } => {
            passage(width, height, *start, *end, params, rng)?
        }
        Generator::Spiral { exits, clockwise } => {
            spiral(width, height, exits, *clockwise, params)?
        }
        Generator::Frontier => frontier(width, height, params, rng)?,
        Generator::Braid { base, percentage } => {
            braid(width, height, base, *percentage, params, rng)?
        }
        Generator::LongPath { cancel } => {
            let outcome = long_path(width, height, params, cancel.as_deref(), rng)?;
            if !outcome.complete {
                tracing::warn!(
                    "[generate] long path stopped early with {} of {} cells visited",
                    outcome.carved.visited_count(),
                    width * height
                );
            }
            outcome.carved
        }
        Generator::EvenBacktrack => even_backtrack(width, height, params, rng)?,
    };
    tracing::info!(
        "[generate] done: {} cells visited, {} open links",
        carved.visited_count(),
        carved.maze.open_link_count()
    );
    Ok(carved)
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(MazeError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// For generators that always start from their own fixed cells.
fn reject_origin(origin: Origin, reason: &str) -> Result<()> {
    if origin != Origin::Random {
        return Err(invalid_parameter("origin", &origin, &reason));
    }
    Ok(())
}

/// The target maze, or a fresh carving-mode maze of the requested size.
fn target_or_fresh(width: usize, height: usize, target: Option<Carved>) -> Result<Carved> {
    let carved = match target {
        Some(target) => target,
        None => Carved::new(width, height, Mode::Carving),
    };
    check_dimensions(carved.maze.width(), carved.maze.height())?;
    Ok(carved)
}

/// Resolves the maze to carve and the origin cell.
fn prepare<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    params: Params,
    rng: &mut R,
) -> Result<(Carved, Coord)> {
    let carved = target_or_fresh(width, height, params.target)?;
    let origin = params.origin.resolve(&carved.maze, rng)?;
    Ok((carved, origin))
}

/// Neighbor of `from` in `direction`, if it exists and has not been visited yet.
fn unvisited_neighbor(
    maze: &Maze,
    visited: &Marks<bool>,
    from: Coord,
    direction: Direction,
) -> Option<Coord> {
    maze.neighbor(from, direction).filter(|&n| !visited[n])
}

/// Checks if `cell` still has an unvisited neighbor.
fn has_unvisited_neighbor(maze: &Maze, visited: &Marks<bool>, cell: Coord) -> bool {
    Direction::ALL
        .into_iter()
        .any(|d| unvisited_neighbor(maze, visited, cell, d).is_some())
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::collections::VecDeque;

    use crate::maze::{Coord, Marks, Maze};

    /// Cells reachable from `start` through open links.
    pub fn reachable(maze: &Maze, start: Coord) -> Marks<bool> {
        let mut seen = Marks::new(maze.width(), maze.height(), false);
        seen[start] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for direction in maze.open_directions(cell).collect::<Vec<_>>() {
                if let Some(next) = maze.neighbor(cell, direction) {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    /// Checks that the open links form a tree spanning exactly the cells reachable from `start`.
    pub fn is_tree_from(maze: &Maze, start: Coord) -> bool {
        let count = reachable(maze, start).count(|&r| r);
        maze.open_link_count() == count - 1
    }

    /// Checks that the open links form a spanning tree of the whole grid.
    pub fn is_perfect(maze: &Maze) -> bool {
        is_tree_from(maze, (0, 0))
            && reachable(maze, (0, 0)).count(|&r| r) == maze.width() * maze.height()
    }
}
