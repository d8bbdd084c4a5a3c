use rand::Rng;

use crate::{
    error::Result,
    generators::{Params, prepare, unvisited_neighbor},
    maze::{Carved, Coord, Direction, Marks, Maze},
};

struct Frame {
    cell: Coord,
    directions: [Direction; 4],
    len: usize,
    next: usize,
    depth: usize,
}

impl Frame {
    /// A frame may only turn on even depths; otherwise it has to keep going straight.
    fn new<R: Rng + ?Sized>(
        cell: Coord,
        last: Option<Direction>,
        depth: usize,
        rng: &mut R,
    ) -> Self {
        let (directions, len) = match last {
            Some(last) if depth % 2 == 1 => ([last; 4], 1),
            _ => (Direction::shuffled(rng), 4),
        };
        Frame {
            cell,
            directions,
            len,
            next: 0,
            depth,
        }
    }
}

/// Depth-first carving that only ever moves two cells at a time, so the corridors
/// sit on every other row and column and leave walls one cell thick between them.
///
/// A step is refused if the cell it enters already touches the carved part, except
/// through the cell it came from.
pub fn even_backtrack<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    params: Params,
    rng: &mut R,
) -> Result<Carved> {
    let (mut carved, origin) = prepare(width, height, params, rng)?;
    carve(&mut carved.maze, &mut carved.visited, origin, rng);
    Ok(carved)
}

fn carve<R: Rng + ?Sized>(maze: &mut Maze, visited: &mut Marks<bool>, origin: Coord, rng: &mut R) {
    visited[origin] = true;
    let mut stack = vec![Frame::new(origin, None, 0, rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.len {
            stack.pop();
            continue;
        }
        let direction = frame.directions[frame.next];
        frame.next += 1;
        let (cell, depth) = (frame.cell, frame.depth);

        let Some(neighbor) = unvisited_neighbor(maze, visited, cell, direction) else {
            continue;
        };
        let touches_carved = direction
            .opposite()
            .others()
            .filter_map(|d| maze.neighbor(neighbor, d))
            .any(|n| visited[n]);
        if !touches_carved {
            maze.open(cell, direction);
            visited[neighbor] = true;
            stack.push(Frame::new(neighbor, Some(direction), depth + 1, rng));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Origin, get_rng, test_utils::is_tree_from};

    #[test]
    fn test_even_backtrack_is_sparse_tree() {
        let mut rng = get_rng(Some(12));
        for (width, height) in [(1, 1), (5, 5), (9, 7), (31, 21)] {
            let carved = even_backtrack(width, height, Params::default(), &mut rng).unwrap();
            let maze = &carved.maze;
            let start = carved
                .visited
                .iter()
                .find(|(_, v)| **v)
                .map(|(c, _)| c)
                .unwrap();
            assert!(is_tree_from(maze, start));
            assert_eq!(maze.open_link_count() + 1, carved.visited_count());
            // Carved cells only ever touch through an open link
            for cell in maze.cells().filter(|&c| carved.visited[c]) {
                for direction in [Direction::Right, Direction::Down] {
                    if let Some(n) = maze.neighbor(cell, direction) {
                        if carved.visited[n] {
                            assert!(maze.is_open(cell, direction), "{cell:?} {direction}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_even_backtrack_from_corner_fills_lattice() {
        let mut rng = get_rng(Some(4));
        let params = Params {
            target: None,
            origin: Origin::At((0, 0)),
        };
        let carved = even_backtrack(9, 9, params, &mut rng).unwrap();
        // Every even-even cell is a junction of the lattice and gets reached
        for y in (0..9).step_by(2) {
            for x in (0..9).step_by(2) {
                assert!(carved.visited[(x, y)], "({x}, {y})");
            }
        }
        // Odd-odd cells are always wall
        for y in (1..9).step_by(2) {
            for x in (1..9).step_by(2) {
                assert!(!carved.visited[(x, y)], "({x}, {y})");
            }
        }
    }
}
