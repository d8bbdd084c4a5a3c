use rand::Rng;

use crate::{
    error::Result,
    generators::{Params, prepare, unvisited_neighbor},
    maze::{Carved, Direction},
};

/// One greedy walk without backtracking: always take the first direction, in fixed
/// order, that leads to an unvisited cell. Pockets the walk cuts off stay untouched.
pub fn labyrinth<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    params: Params,
    rng: &mut R,
) -> Result<Carved> {
    let (mut carved, origin) = prepare(width, height, params, rng)?;
    let Carved { maze, visited } = &mut carved;

    let mut cell = origin;
    visited[cell] = true;
    let mut length = 1usize;
    while let Some((direction, next)) = Direction::ALL
        .into_iter()
        .find_map(|d| unvisited_neighbor(maze, visited, cell, d).map(|n| (d, n)))
    {
        maze.open(cell, direction);
        visited[next] = true;
        cell = next;
        length += 1;
    }
    tracing::debug!("[labyrinth] path of {} cells ends at {:?}", length, cell);

    Ok(carved)
}
