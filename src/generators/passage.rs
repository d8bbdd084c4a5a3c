use rand::Rng;

use crate::{
    error::{MazeError, Result, invalid_parameter},
    generators::{Params, reject_origin, target_or_fresh},
    maze::{Carved, Coord, Direction},
};

/// Carves a monotonic random passage from `start` to `end`.
///
/// Only the directions pointing towards `end` are candidates. A candidate is dropped
/// for good once it stops being useful: the passage has reached `end` along its axis,
/// or the border is in the way.
pub fn passage<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    start: Option<Coord>,
    end: Option<Coord>,
    params: Params,
    rng: &mut R,
) -> Result<Carved> {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        (None, _) => {
            return Err(MazeError::MissingParameter {
                generator: "Passage",
                parameter: "start",
            });
        }
        (_, None) => {
            return Err(MazeError::MissingParameter {
                generator: "Passage",
                parameter: "end",
            });
        }
    };

    reject_origin(params.origin, "a passage starts from its `start` cell")?;
    let mut carved = target_or_fresh(width, height, params.target)?;
    for (name, coord) in [("start", start), ("end", end)] {
        if !carved.maze.contains(coord) {
            return Err(invalid_parameter(
                name,
                &coord,
                &format!(
                    "outside of the {}x{} maze",
                    carved.maze.width(),
                    carved.maze.height()
                ),
            ));
        }
    }

    let mut directions = Vec::with_capacity(2);
    match start.0.cmp(&end.0) {
        std::cmp::Ordering::Less => directions.push(Direction::Right),
        std::cmp::Ordering::Greater => directions.push(Direction::Left),
        std::cmp::Ordering::Equal => {}
    }
    match start.1.cmp(&end.1) {
        std::cmp::Ordering::Less => directions.push(Direction::Down),
        std::cmp::Ordering::Greater => directions.push(Direction::Up),
        std::cmp::Ordering::Equal => {}
    }

    let Carved { maze, visited } = &mut carved;
    let mut cell = start;
    visited[cell] = true;
    while cell != end {
        let idx = rng.random_range(0..directions.len());
        let direction = directions[idx];
        let reached = match direction {
            Direction::Left | Direction::Right => cell.0 == end.0,
            Direction::Up | Direction::Down => cell.1 == end.1,
        };
        match maze.neighbor(cell, direction) {
            Some(next) if !reached => {
                maze.open(cell, direction);
                visited[next] = true;
                cell = next;
            }
            _ => {
                directions.swap_remove(idx);
            }
        }
    }

    Ok(carved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Origin, get_rng, test_utils::reachable};

    #[test]
    fn test_passage_connects_endpoints_monotonically() {
        let mut rng = get_rng(Some(4));
        for (start, end) in [((0, 0), (9, 7)), ((9, 0), (2, 5)), ((3, 7), (3, 1)), ((8, 4), (0, 4))] {
            let carved =
                passage(10, 8, Some(start), Some(end), Params::default(), &mut rng).unwrap();
            let maze = &carved.maze;
            assert!(reachable(maze, start)[end], "{start:?} -> {end:?}");

            let steps = start.0.abs_diff(end.0) + start.1.abs_diff(end.1);
            assert_eq!(maze.open_link_count(), steps);
            // Nothing is opened against the general heading
            for cell in maze.cells() {
                if start.0 <= end.0 {
                    assert!(!maze.is_open(cell, Direction::Left) || cell.0 > start.0);
                }
                if start.1 >= end.1 {
                    assert!(!maze.is_open(cell, Direction::Down) || cell.1 < start.1);
                }
            }
        }
    }

    #[test]
    fn test_passage_to_itself() {
        let mut rng = get_rng(Some(4));
        let carved =
            passage(3, 3, Some((1, 1)), Some((1, 1)), Params::default(), &mut rng).unwrap();
        assert_eq!(carved.maze.open_link_count(), 0);
        assert_eq!(carved.visited_count(), 1);
    }

    #[test]
    fn test_passage_parameter_errors() {
        let mut rng = get_rng(Some(4));
        let err = passage(3, 3, None, Some((1, 1)), Params::default(), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            MazeError::MissingParameter {
                parameter: "start",
                ..
            }
        ));
        let err = passage(3, 3, Some((0, 0)), None, Params::default(), &mut rng).unwrap_err();
        assert!(matches!(err, MazeError::MissingParameter { parameter: "end", .. }));
        let err =
            passage(3, 3, Some((0, 0)), Some((3, 0)), Params::default(), &mut rng).unwrap_err();
        assert!(matches!(err, MazeError::InvalidParameter { parameter: "end", .. }));

        let params = Params {
            target: None,
            origin: Origin::At((2, 2)),
        };
        let err = passage(3, 3, Some((0, 0)), Some((1, 1)), params, &mut rng).unwrap_err();
        assert!(matches!(err, MazeError::InvalidParameter { parameter: "origin", .. }));
    }
}
