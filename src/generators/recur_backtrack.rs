use rand::Rng;

use crate::{
    error::Result,
    generators::{Params, prepare, unvisited_neighbor},
    maze::{Carved, Coord, Direction, Marks, Maze},
};

/// One pending depth-first call: the cell and the directions it still has to try.
struct Frame {
    cell: Coord,
    directions: [Direction; 4],
    next: usize,
}

pub fn recursive_backtrack<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    params: Params,
    rng: &mut R,
) -> Result<Carved> {
    let (mut carved, origin) = prepare(width, height, params, rng)?;
    carve(&mut carved.maze, &mut carved.visited, origin, rng);
    Ok(carved)
}

/// Randomized depth-first carving from `origin`. Cells already visited are never entered,
/// so this can resume on a maze that already holds sub-mazes.
fn carve<R: Rng + ?Sized>(maze: &mut Maze, visited: &mut Marks<bool>, origin: Coord, rng: &mut R) {
    visited[origin] = true;
    // The stack keeps the whole current path, it can grow to the number of cells
    let mut stack = vec![Frame {
        cell: origin,
        directions: Direction::shuffled(rng),
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(&direction) = frame.directions.get(frame.next) else {
            // Every direction tried, backtrack
            stack.pop();
            continue;
        };
        frame.next += 1;
        let cell = frame.cell;

        if let Some(neighbor) = unvisited_neighbor(maze, visited, cell, direction) {
            maze.open(cell, direction);
            visited[neighbor] = true;
            stack.push(Frame {
                cell: neighbor,
                directions: Direction::shuffled(rng),
                next: 0,
            });
        }
    }
}
