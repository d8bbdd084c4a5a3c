use rand::Rng;

use crate::{
    error::Result,
    generators::{Params, RandomSet, prepare, unvisited_neighbor},
    maze::{Carved, Coord, Direction, Marks, Maze},
};

/// Variation of Hunt and Kill: when a walk dies, the next one starts from a random
/// cell of the part already built instead of scanning from a corner.
pub fn hunt_and_kill<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    params: Params,
    rng: &mut R,
) -> Result<Carved> {
    let (mut carved, origin) = prepare(width, height, params, rng)?;
    let Carved { maze, visited } = &mut carved;

    // Cells that may still have an unvisited neighbor
    let mut starts = RandomSet::new();
    let mut walks = 1usize;
    walk(maze, visited, origin, &mut starts, rng);
    while let Some(next) = starts.pop_random(rng) {
        walk(maze, visited, next, &mut starts, rng);
        walks += 1;
    }
    tracing::debug!("[hunt and kill] {} walks", walks);

    Ok(carved)
}

/// Random walk through unvisited cells until stuck. The dead end is dropped from `starts`,
/// every other cell of the walk stays in it.
fn walk<R: Rng + ?Sized>(
    maze: &mut Maze,
    visited: &mut Marks<bool>,
    start: Coord,
    starts: &mut RandomSet,
    rng: &mut R,
) {
    let mut cell = start;
    loop {
        visited[cell] = true;
        starts.insert(cell);
        let step = Direction::shuffled(rng).into_iter().find_map(|direction| {
            unvisited_neighbor(maze, visited, cell, direction).map(|n| (direction, n))
        });
        match step {
            Some((direction, neighbor)) => {
                maze.open(cell, direction);
                cell = neighbor;
            }
            None => {
                starts.remove(cell);
                return;
            }
        }
    }
}
