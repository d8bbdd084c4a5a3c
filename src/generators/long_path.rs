use std::sync::atomic::{AtomicBool, Ordering};

use rand::{Rng, seq::IndexedRandom};

use crate::{
    error::{MazeError, Result, invalid_parameter},
    generators::{Params, RandomSet, check_dimensions, has_unvisited_neighbor, reject_origin},
    maze::{Carved, Coord, Direction, Marks, Maze},
};

/// Result of [`long_path`]. `complete` is `false` when the run was cancelled or got
/// stuck before covering the whole grid; `carved` is still consistent in that case.
#[derive(Debug, Clone)]
pub struct LongPathOutcome {
    pub carved: Carved,
    pub complete: bool,
}

/// Grows a single path without branches until it covers an even-sized grid.
///
/// The path starts as a straight line from the top-left corner. It then keeps
/// pushing one of its segments sideways: the link between two path cells is replaced
/// by a detour through the two unvisited cells next to them. A detour is only taken
/// when it cannot cut off a region that would be impossible to fill later.
///
/// `cancel` is polled between detours, never in the middle of one.
pub fn long_path<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    params: Params,
    cancel: Option<&AtomicBool>,
    rng: &mut R,
) -> Result<LongPathOutcome> {
    check_dimensions(width, height)?;
    if width % 2 != 0 || height % 2 != 0 {
        return Err(invalid_parameter(
            "dimensions",
            &(width, height),
            &"both width and height must be even",
        ));
    }
    if params.target.is_some() {
        return Err(invalid_parameter(
            "target",
            &"Some(..)",
            &"the long path is always built on a fresh maze",
        ));
    }
    reject_origin(
        params.origin,
        "the long path always starts from the top-left corner",
    )?;

    let mut carved = Carved::new(width, height, Default::default());
    let Carved { maze, visited } = &mut carved;

    let frontier = initial_path(maze, visited, rng)?;
    let complete = grow(maze, visited, frontier, cancel, rng);

    let complete = complete && carved.visited_count() == width * height;
    tracing::debug!(
        "[long path] {} of {} cells visited",
        carved.visited_count(),
        width * height
    );
    Ok(LongPathOutcome { carved, complete })
}

/// Straight line from the top-left corner to the opposite border. Returns all of its
/// cells as the starting frontier.
fn initial_path<R: Rng + ?Sized>(
    maze: &mut Maze,
    visited: &mut Marks<bool>,
    rng: &mut R,
) -> Result<RandomSet> {
    let mut cell = (0, 0);
    let directions: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&d| maze.has_neighbor(cell, d))
        .collect();
    let &direction = directions
        .choose(rng)
        .ok_or(MazeError::InvalidDimensions {
            width: maze.width(),
            height: maze.height(),
        })?;

    let mut frontier = RandomSet::new();
    visited[cell] = true;
    frontier.insert(cell);
    while let Some(next) = maze.neighbor(cell, direction) {
        maze.open(cell, direction);
        cell = next;
        visited[cell] = true;
        frontier.insert(cell);
    }
    Ok(frontier)
}

/// Keeps detouring links of the path until neither the frontier nor the tank has a
/// cell left. Returns `false` when cancelled or when a whole pass over the tank found
/// nothing to expand.
fn grow<R: Rng + ?Sized>(
    maze: &mut Maze,
    visited: &mut Marks<bool>,
    mut frontier: RandomSet,
    cancel: Option<&AtomicBool>,
    rng: &mut R,
) -> bool {
    let mut tank = RandomSet::new();
    let mut expansions = 0usize;
    let mut progress = true;

    loop {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            tracing::debug!("[long path] cancelled after {} expansions", expansions);
            return false;
        }
        if frontier.is_empty() {
            if tank.is_empty() {
                tracing::debug!("[long path] done after {} expansions", expansions);
                return true;
            }
            // A whole pass over the tank without any expansion would loop forever
            if !progress {
                tracing::debug!("[long path] no expansion left for {} cells", tank.len());
                return false;
            }
            for cell in tank.drain() {
                frontier.insert(cell);
            }
            progress = false;
        }

        let Some(cell) = frontier.choose(rng) else {
            continue;
        };
        match find_expansion(maze, visited, cell, rng) {
            Some(expansion) => {
                expansion.commit(maze, visited);
                expansions += 1;
                progress = true;
                for touched in expansion.cells() {
                    if has_unvisited_neighbor(maze, visited, touched) {
                        frontier.insert(touched);
                    } else {
                        frontier.remove(touched);
                        tank.remove(touched);
                    }
                }
            }
            None => {
                frontier.remove(cell);
                if has_unvisited_neighbor(maze, visited, cell) {
                    tank.insert(cell);
                }
            }
        }
    }
}

/// First feasible expansion at `origin`, trying directions and their perpendiculars
/// in random order.
fn find_expansion<R: Rng + ?Sized>(
    maze: &Maze,
    visited: &Marks<bool>,
    origin: Coord,
    rng: &mut R,
) -> Option<Expansion> {
    for direction in Direction::shuffled(rng) {
        let mut perpendiculars = direction.perpendiculars();
        if rng.random_bool(0.5) {
            perpendiculars.swap(0, 1);
        }
        for perpendicular in perpendiculars {
            let expansion = Expansion::resolve(maze, visited, origin, direction, perpendicular);
            if expansion.is_some() {
                return expansion;
            }
        }
    }
    None
}

/// Detour of the path link `origin -> paired` (in `direction`) through the two
/// unvisited cells on their `perpendicular` side:
///
/// ```text
///   origin ---- paired          origin      paired
///                        =>       |           |
///   o_exp       p_exp           o_exp ----- p_exp
/// ```
#[derive(Debug, Clone, Copy)]
struct Expansion {
    direction: Direction,
    perpendicular: Direction,
    origin: Coord,
    paired: Coord,
    origin_expanded: Coord,
    paired_expanded: Coord,
}

impl Expansion {
    fn resolve(
        maze: &Maze,
        visited: &Marks<bool>,
        origin: Coord,
        direction: Direction,
        perpendicular: Direction,
    ) -> Option<Self> {
        let paired = maze
            .neighbor(origin, direction)
            .filter(|&n| visited[n] && maze.is_open(origin, direction))?;
        let origin_expanded = maze
            .neighbor(origin, perpendicular)
            .filter(|&n| !visited[n])?;
        let paired_expanded = maze
            .neighbor(paired, perpendicular)
            .filter(|&n| !visited[n])?;

        let expansion = Expansion {
            direction,
            perpendicular,
            origin,
            paired,
            origin_expanded,
            paired_expanded,
        };
        expansion
            .is_feasible(maze, visited)
            .then_some(expansion)
    }

    /// Whether the detour keeps every remaining region fillable.
    fn is_feasible(&self, maze: &Maze, visited: &Marks<bool>) -> bool {
        let back = self.direction.opposite();
        let origin_side = run_length(maze, visited, self.origin_expanded, back);
        let paired_side = run_length(maze, visited, self.paired_expanded, self.direction);

        // Enclosed on both ends
        if origin_side == 0 && paired_side == 0 {
            return true;
        }

        // Hugging a wall, closing a corridor on at least one end
        let origin_ahead = run_length(maze, visited, self.origin_expanded, self.perpendicular);
        let paired_ahead = run_length(maze, visited, self.paired_expanded, self.perpendicular);
        if origin_ahead == 0 && paired_ahead == 0 && (origin_side == 0 || paired_side == 0) {
            return true;
        }

        origin_side % 2 == 0 && paired_side % 2 == 0 && origin_ahead % 2 == paired_ahead % 2
    }

    fn commit(&self, maze: &mut Maze, visited: &mut Marks<bool>) {
        maze.close(self.origin, self.direction);
        maze.open(self.origin, self.perpendicular);
        maze.open(self.paired, self.perpendicular);
        maze.open(self.origin_expanded, self.direction);
        visited[self.origin_expanded] = true;
        visited[self.paired_expanded] = true;
    }

    fn cells(&self) -> [Coord; 4] {
        [
            self.origin,
            self.paired,
            self.origin_expanded,
            self.paired_expanded,
        ]
    }
}

/// Number of consecutive unvisited cells after `cell` going in `direction`.
fn run_length(maze: &Maze, visited: &Marks<bool>, mut cell: Coord, direction: Direction) -> usize {
    let mut count = 0;
    while let Some(next) = maze.neighbor(cell, direction).filter(|&n| !visited[n]) {
        count += 1;
        cell = next;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Origin, get_rng, test_utils::is_tree_from};
    use crate::maze::Mode;
    use rand::{RngCore, rngs::StdRng};

    /// Raises `cancel` once `draws_left` values have been drawn.
    struct CancellingRng<'a> {
        inner: StdRng,
        cancel: &'a AtomicBool,
        draws_left: usize,
    }

    impl CancellingRng<'_> {
        fn draw(&mut self) {
            match self.draws_left.checked_sub(1) {
                Some(left) => self.draws_left = left,
                None => self.cancel.store(true, Ordering::Relaxed),
            }
        }
    }

    impl RngCore for CancellingRng<'_> {
        fn next_u32(&mut self) -> u32 {
            self.draw();
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draw();
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            self.draw();
            self.inner.fill_bytes(dst)
        }
    }

    fn assert_single_path(carved: &Carved) {
        let maze = &carved.maze;
        assert!(is_tree_from(maze, (0, 0)));
        assert_eq!(maze.open_link_count() + 1, carved.visited_count());
        assert!(maze.cells().all(|c| maze.degree(c) <= 2));
        for cell in maze.cells() {
            assert_eq!(carved.visited[cell], maze.degree(cell) > 0 || cell == (0, 0));
        }
    }

    #[test]
    fn test_long_path_covers_grid() {
        for (width, height) in [(2, 2), (4, 4), (6, 6), (4, 8)] {
            for seed in 0..20 {
                let mut rng = get_rng(Some(seed));
                let outcome = long_path(width, height, Params::default(), None, &mut rng).unwrap();
                assert!(outcome.complete, "{width}x{height} with seed {seed}");
                assert_eq!(outcome.carved.visited_count(), width * height);
                assert_eq!(outcome.carved.maze.open_link_count(), width * height - 1);
                assert_single_path(&outcome.carved);
            }
        }
    }

    #[test]
    fn test_cancelled_long_path_is_consistent() {
        let mut rng = get_rng(Some(3));
        let cancel = AtomicBool::new(true);
        let outcome = long_path(8, 8, Params::default(), Some(&cancel), &mut rng).unwrap();
        assert!(!outcome.complete);
        // Only the initial straight line was carved
        assert_eq!(outcome.carved.visited_count(), 8);
        assert_single_path(&outcome.carved);
    }

    #[test]
    fn test_long_path_cancelled_mid_run() {
        for seed in 0..10 {
            let cancel = AtomicBool::new(false);
            let mut rng = CancellingRng {
                inner: get_rng(Some(seed)),
                cancel: &cancel,
                draws_left: 200,
            };
            let outcome = long_path(16, 16, Params::default(), Some(&cancel), &mut rng).unwrap();
            assert!(cancel.load(Ordering::Relaxed));
            assert!(!outcome.complete);

            let carved = &outcome.carved;
            // Some detours were committed on top of the initial line
            assert!(carved.visited_count() > 16, "seed {seed}");
            assert!(carved.visited_count() < 16 * 16, "seed {seed}");
            assert_single_path(carved);
            for cell in carved.maze.cells().filter(|&c| carved.visited[c]) {
                assert!(carved.maze.degree(cell) >= 1, "{cell:?} with seed {seed}");
            }
        }
    }

    #[test]
    fn test_growth_stalls_without_feasible_expansion() {
        // A two-cell segment in the middle of the top row: any detour would leave a
        // single unvisited cell on each side of it
        let mut maze = Maze::new(4, 4, Mode::Carving);
        let mut visited = Marks::new(4, 4, false);
        maze.open((1, 0), Direction::Right);
        visited[(1, 0)] = true;
        visited[(2, 0)] = true;
        let mut frontier = RandomSet::new();
        frontier.insert((1, 0));
        frontier.insert((2, 0));

        let mut rng = get_rng(Some(5));
        assert!(!grow(&mut maze, &mut visited, frontier, None, &mut rng));
        assert_eq!(maze.open_link_count(), 1);
        assert_eq!(visited.count(|&v| v), 2);
    }

    #[test]
    fn test_expansion_detours_link() {
        let mut maze = Maze::new(2, 2, Mode::Carving);
        let mut visited = Marks::new(2, 2, false);
        maze.open((0, 0), Direction::Right);
        visited[(0, 0)] = true;
        visited[(1, 0)] = true;

        let expansion =
            Expansion::resolve(&maze, &visited, (0, 0), Direction::Right, Direction::Down).unwrap();
        expansion.commit(&mut maze, &mut visited);
        assert!(!maze.is_open((0, 0), Direction::Right));
        assert!(maze.is_open((0, 0), Direction::Down));
        assert!(maze.is_open((1, 0), Direction::Down));
        assert!(maze.is_open((0, 1), Direction::Right));
        assert!(visited[(0, 1)] && visited[(1, 1)]);

        // Nothing left to detour into
        assert!(Expansion::resolve(&maze, &visited, (0, 1), Direction::Right, Direction::Up).is_none());
    }

    #[test]
    fn test_parity_rejects_stranding_expansion() {
        // Path along the top row of a 4x4 grid; detouring the middle link leaves a single
        // unvisited cell on each side of the new segment
        let mut maze = Maze::new(4, 4, Mode::Carving);
        let mut visited = Marks::new(4, 4, false);
        for x in 0..3 {
            maze.open((x, 0), Direction::Right);
        }
        for x in 0..4 {
            visited[(x, 0)] = true;
        }
        assert!(Expansion::resolve(&maze, &visited, (1, 0), Direction::Right, Direction::Down).is_none());
        assert!(Expansion::resolve(&maze, &visited, (0, 0), Direction::Right, Direction::Down).is_some());
    }

    #[test]
    fn test_long_path_rejects_bad_input() {
        let mut rng = get_rng(Some(1));
        for (width, height) in [(3, 4), (4, 5), (1, 1)] {
            let err = long_path(width, height, Params::default(), None, &mut rng).unwrap_err();
            assert!(matches!(err, MazeError::InvalidParameter { .. }));
        }
        let err = long_path(0, 4, Params::default(), None, &mut rng).unwrap_err();
        assert!(matches!(err, MazeError::InvalidDimensions { .. }));

        let params = Params::with_target(Carved::new(4, 4, Mode::Carving), Origin::Random);
        assert!(long_path(4, 4, params, None, &mut rng).is_err());
        let params = Params {
            target: None,
            origin: Origin::Center,
        };
        assert!(long_path(4, 4, params, None, &mut rng).is_err());
    }
}
