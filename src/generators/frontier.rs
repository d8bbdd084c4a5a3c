use rand::Rng;

use crate::{
    error::Result,
    generators::{Params, RandomSet, prepare, unvisited_neighbor},
    maze::{Carved, Direction},
};

/// Randomly floods the space, one frontier generation at a time.
///
/// Every frontier cell grows into a random subset of its unvisited neighbors. The
/// neighbors it skipped go to the tank, and once a generation dies out the tank is
/// drained: any tank cell still unvisited gets attached to a visited neighbor and
/// starts a new frontier.
///
/// Tank cells can attach to anything already visited, including sub-mazes of a
/// composite target.
pub fn frontier<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    params: Params,
    rng: &mut R,
) -> Result<Carved> {
    let (mut carved, origin) = prepare(width, height, params, rng)?;
    let Carved { maze, visited } = &mut carved;

    visited[origin] = true;
    let mut frontier = vec![origin];
    let mut tank = RandomSet::new();
    let mut generations = 0usize;
    let mut reattached = 0usize;

    while !frontier.is_empty() || !tank.is_empty() {
        while frontier.is_empty() {
            let Some(cell) = tank.pop_random(rng) else {
                break;
            };
            if visited[cell] {
                continue;
            }
            let attach = Direction::shuffled(rng).into_iter().find(|&direction| {
                maze.neighbor(cell, direction)
                    .is_some_and(|neighbor| visited[neighbor])
            });
            if let Some(direction) = attach {
                maze.open(cell, direction);
                visited[cell] = true;
                frontier.push(cell);
                reattached += 1;
            }
        }

        let mut next_frontier = Vec::new();
        while !frontier.is_empty() {
            let cell = frontier.swap_remove(rng.random_range(0..frontier.len()));
            let directions = Direction::shuffled(rng);
            let (chosen, skipped) = directions.split_at(rng.random_range(0..=directions.len()));
            for &direction in chosen {
                if let Some(neighbor) = unvisited_neighbor(maze, visited, cell, direction) {
                    maze.open(cell, direction);
                    visited[neighbor] = true;
                    next_frontier.push(neighbor);
                }
            }
            for &direction in skipped {
                if let Some(neighbor) = unvisited_neighbor(maze, visited, cell, direction) {
                    tank.insert(neighbor);
                }
            }
        }
        frontier = next_frontier;
        generations += 1;
    }
    tracing::debug!(
        "[frontier] {} generations, {} cells reattached from the tank",
        generations,
        reattached
    );

    Ok(carved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Origin, get_rng, test_utils::is_perfect};
    use crate::maze::Mode;

    #[test]
    fn test_frontier_is_perfect() {
        let mut rng = get_rng(Some(31));
        for (width, height) in [(1, 1), (2, 1), (1, 7), (6, 6), (23, 11), (64, 64)] {
            let carved = frontier(width, height, Params::default(), &mut rng).unwrap();
            assert_eq!(carved.visited_count(), width * height);
            assert!(is_perfect(&carved.maze), "{width}x{height} is not perfect");
        }
    }

    #[test]
    fn test_frontier_stops_at_visited_cells() {
        let mut rng = get_rng(Some(2));
        let mut target = Carved::new(5, 5, Mode::Carving);
        // A visited column splits the grid in two
        for y in 0..5 {
            target.visited[(2, y)] = true;
        }
        let params = Params::with_target(target, Origin::At((0, 0)));
        let carved = frontier(5, 5, params, &mut rng).unwrap();
        let maze = &carved.maze;

        // Left side fully grown, one link per newly visited cell. Tank cells may have
        // attached to the column, so connectivity is not guaranteed.
        assert_eq!(maze.open_link_count(), 9);
        for y in 0..5 {
            assert!(carved.visited[(0, y)] && carved.visited[(1, y)]);
            assert!(!carved.visited[(3, y)] && !carved.visited[(4, y)]);
            assert!(!maze.is_open((2, y), Direction::Right));
        }
        assert_eq!(carved.visited_count(), 15);
    }
}
