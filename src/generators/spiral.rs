use crate::{
    error::{MazeError, Result, invalid_parameter},
    generators::{
        Params, has_unvisited_neighbor, reject_origin, target_or_fresh, unvisited_neighbor,
    },
    maze::{Carved, Coord, Direction},
};

/// Head of one spiral arm: its current cell and index in the rotation order.
#[derive(Debug, Clone, Copy)]
struct Arm {
    cell: Coord,
    heading: usize,
}

const CLOCKWISE: [Direction; 4] = [
    Direction::Left,
    Direction::Up,
    Direction::Right,
    Direction::Down,
];
const COUNTER_CLOCKWISE: [Direction; 4] = [
    Direction::Left,
    Direction::Down,
    Direction::Right,
    Direction::Up,
];

/// A spiral with one to four arms starting from corners of the maze.
///
/// Every arm moves straight while it can, turns when blocked, and once it has nowhere
/// left to go it opens into whatever is in front of it so the arms join up.
pub fn spiral(
    width: usize,
    height: usize,
    exits: &[Coord],
    clockwise: bool,
    params: Params,
) -> Result<Carved> {
    if exits.is_empty() {
        return Err(MazeError::MissingParameter {
            generator: "Spiral",
            parameter: "exits",
        });
    }
    reject_origin(params.origin, "spirals always start from their exits")?;
    let mut carved = target_or_fresh(width, height, params.target)?;
    let (right, bottom) = (carved.maze.width() - 1, carved.maze.height() - 1);
    let order = if clockwise { CLOCKWISE } else { COUNTER_CLOCKWISE };

    // Each arm first runs along the border, away from its corner
    let mut arms = Vec::with_capacity(exits.len());
    for &exit in exits {
        let heading = match (exit, clockwise) {
            ((0, 0), true) => 2,
            ((0, 0), false) => 1,
            ((0, y), true) if y == bottom => 1,
            ((0, y), false) if y == bottom => 2,
            ((x, y), true) if x == right && y == bottom => 0,
            ((x, y), false) if x == right && y == bottom => 3,
            ((x, 0), true) if x == right => 3,
            ((x, 0), false) if x == right => 0,
            _ => {
                return Err(invalid_parameter(
                    "exits",
                    &exit,
                    &"an exit must be one of the four corners",
                ));
            }
        };
        arms.push(Arm {
            cell: exit,
            heading,
        });
    }

    let Carved { maze, visited } = &mut carved;
    for arm in &arms {
        visited[arm.cell] = true;
    }

    while !arms.is_empty() {
        let mut next_arms = Vec::with_capacity(arms.len());
        for Arm { cell, heading } in arms {
            let direction = order[heading];
            if let Some(next) = unvisited_neighbor(maze, visited, cell, direction) {
                maze.open(cell, direction);
                visited[next] = true;
                next_arms.push(Arm {
                    cell: next,
                    heading,
                });
            } else if has_unvisited_neighbor(maze, visited, cell) {
                next_arms.push(Arm {
                    cell,
                    heading: (heading + 1) % order.len(),
                });
            } else if exits.len() > 1 && maze.has_neighbor(cell, direction) {
                maze.open(cell, direction);
            }
        }
        arms = next_arms;
    }

    Ok(carved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{
        Origin,
        test_utils::{is_tree_from, reachable},
    };

    #[test]
    fn test_single_arm_spiral_is_one_path() {
        let carved = spiral(6, 5, &[(0, 0)], true, Params::default()).unwrap();
        let maze = &carved.maze;
        assert_eq!(carved.visited_count(), 30);
        assert!(is_tree_from(maze, (0, 0)));
        assert!(maze.cells().all(|c| maze.degree(c) <= 2));
        // Clockwise from the top-left corner: along the top row first
        for x in 0..5 {
            assert!(maze.is_open((x, 0), Direction::Right));
        }
        assert!(maze.is_open((5, 0), Direction::Down));
        assert!(!maze.is_open((0, 0), Direction::Down));
    }

    #[test]
    fn test_counter_clockwise_goes_down_first() {
        let carved = spiral(4, 4, &[(0, 0)], false, Params::default()).unwrap();
        for y in 0..3 {
            assert!(carved.maze.is_open((0, y), Direction::Down));
        }
        assert!(!carved.maze.is_open((0, 0), Direction::Right));
    }

    #[test]
    fn test_four_arms_join() {
        let size = 15;
        let corners = [(0, 0), (0, size - 1), (size - 1, size - 1), (size - 1, 0)];
        for clockwise in [true, false] {
            let carved = spiral(size, size, &corners, clockwise, Params::default()).unwrap();
            assert_eq!(carved.visited_count(), size * size);
            let connected = reachable(&carved.maze, (0, 0));
            for corner in corners {
                assert!(connected[corner], "{corner:?} is not joined");
            }
        }
    }

    #[test]
    fn test_exit_must_be_a_corner() {
        let err = spiral(5, 5, &[(0, 0), (2, 0)], true, Params::default()).unwrap_err();
        assert!(matches!(err, MazeError::InvalidParameter { parameter: "exits", .. }));
        let err = spiral(5, 5, &[], true, Params::default()).unwrap_err();
        assert!(matches!(err, MazeError::MissingParameter { .. }));
    }

    #[test]
    fn test_spiral_rejects_origin() {
        let params = Params {
            target: None,
            origin: Origin::Center,
        };
        let err = spiral(5, 5, &[(0, 0)], true, params).unwrap_err();
        assert!(matches!(err, MazeError::InvalidParameter { parameter: "origin", .. }));
    }
}
