use rand::{Rng, seq::IndexedRandom};

use crate::{
    error::{Result, invalid_parameter},
    generators::{Generator, Params, RandomSet, generate_maze},
    maze::{Carved, Coord, Direction, Marks, Maze},
};

/// Removes a `percentage` of the dead ends of a maze.
///
/// The maze is `params.target` when given, otherwise it is generated by `base` from
/// the same origin. Each dead end that is picked gets one more link, straight through
/// if possible.
pub fn braid<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    base: &Generator,
    percentage: f64,
    params: Params,
    rng: &mut R,
) -> Result<Carved> {
    // Also rejects NaN
    if !(0.0..=1.0).contains(&percentage) {
        return Err(invalid_parameter(
            "percentage",
            &percentage,
            &"must be between 0 and 1",
        ));
    }

    let mut carved = match params.target {
        Some(target) => target,
        None => generate_maze(
            width,
            height,
            base,
            Params {
                target: None,
                origin: params.origin,
            },
            rng,
        )?,
    };

    let maze = &mut carved.maze;
    let mut seen = Marks::new(maze.width(), maze.height(), false);
    let mut pending = RandomSet::new();
    pending.insert((0, 0));
    let mut removed = 0usize;

    while let Some(cell) = pending.pop_random(rng) {
        seen[cell] = true;
        if maze.degree(cell) <= 1 && rng.random_bool(percentage) {
            if let Some(direction) = carve_direction(maze, cell, rng) {
                maze.open(cell, direction);
                removed += 1;
            }
        }
        for direction in Direction::ALL {
            if let Some(neighbor) = maze.neighbor(cell, direction) {
                if !seen[neighbor] {
                    pending.insert(neighbor);
                }
            }
        }
    }
    tracing::debug!("[braid] {} dead ends removed", removed);

    carved.visited = seen;
    Ok(carved)
}

/// Direction to carve from a dead end or an isolated cell.
fn carve_direction<R: Rng + ?Sized>(maze: &Maze, cell: Coord, rng: &mut R) -> Option<Direction> {
    let candidates: Vec<Direction> = match maze.open_directions(cell).next() {
        Some(open) => {
            let straight = open.opposite();
            if maze.has_neighbor(cell, straight) {
                return Some(straight);
            }
            open.perpendiculars().to_vec()
        }
        None => Direction::ALL.to_vec(),
    };
    let candidates: Vec<Direction> = candidates
        .into_iter()
        .filter(|&d| maze.has_neighbor(cell, d))
        .collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MazeError;
    use crate::generators::{get_rng, recursive_backtrack};
    use crate::maze::Mode;

    #[test]
    fn test_full_braid_has_no_dead_ends() {
        let mut rng = get_rng(Some(17));
        for (width, height) in [(2, 2), (8, 6), (21, 13)] {
            let carved = braid(
                width,
                height,
                &Generator::RecurBacktrack,
                1.0,
                Params::default(),
                &mut rng,
            )
            .unwrap();
            let maze = &carved.maze;
            assert!(maze.cells().all(|c| maze.degree(c) >= 2));
            assert_eq!(carved.visited_count(), width * height);
        }
    }

    #[test]
    fn test_zero_braid_keeps_base() {
        let braided = braid(
            12,
            9,
            &Generator::RecurBacktrack,
            0.0,
            Params::default(),
            &mut get_rng(Some(5)),
        )
        .unwrap();
        let base = recursive_backtrack(12, 9, Params::default(), &mut get_rng(Some(5))).unwrap();
        assert_eq!(braided.maze.export_to_bits(), base.maze.export_to_bits());
    }

    #[test]
    fn test_braid_on_target_skips_base() {
        let mut rng = get_rng(Some(9));
        // Nothing carved: every cell is isolated and gets one link
        let target = Carved::new(4, 3, Mode::Carving);
        let carved = braid(
            4,
            3,
            &Generator::RecurBacktrack,
            1.0,
            Params::with_target(target, Default::default()),
            &mut rng,
        )
        .unwrap();
        let maze = &carved.maze;
        assert!(maze.cells().all(|c| maze.degree(c) >= 1));
        assert!(maze.open_link_count() <= 12);
    }

    #[test]
    fn test_single_cell_is_left_alone() {
        let mut rng = get_rng(Some(9));
        let carved = braid(1, 1, &Generator::HuntAndKill, 1.0, Params::default(), &mut rng).unwrap();
        assert_eq!(carved.maze.open_link_count(), 0);
    }

    #[test]
    fn test_invalid_percentage() {
        let mut rng = get_rng(Some(9));
        for percentage in [-0.1, 1.5, f64::NAN] {
            let err = braid(
                3,
                3,
                &Generator::RecurBacktrack,
                percentage,
                Params::default(),
                &mut rng,
            )
            .unwrap_err();
            assert!(matches!(
                err,
                MazeError::InvalidParameter {
                    parameter: "percentage",
                    ..
                }
            ));
        }
    }
}
