use rand::{Rng, seq::IndexedRandom};
use rand_set::RandSetDefault;

use crate::maze::Coord;

/// Cell set whose random picks are driven by a caller-supplied RNG, so a seeded run
/// always reproduces the same maze.
#[derive(Debug, Clone, Default)]
pub struct RandomSet {
    set: RandSetDefault<Coord>,
}

impl RandomSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn contains(&self, cell: Coord) -> bool {
        self.set.contains(&cell)
    }

    /// Returns `false` if the cell was already in the set.
    pub fn insert(&mut self, cell: Coord) -> bool {
        self.set.insert(cell)
    }

    /// Returns `false` if the cell was not in the set.
    pub fn remove(&mut self, cell: Coord) -> bool {
        self.set.remove(&cell)
    }

    /// A uniformly random member, left in the set.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        self.set.iter().as_slice().choose(rng).copied()
    }

    /// Removes and returns a uniformly random member.
    pub fn pop_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Coord> {
        let cell = self.choose(rng)?;
        self.set.remove(&cell);
        Some(cell)
    }

    /// Removes every member, in insertion-dependent order.
    pub fn drain(&mut self) -> impl Iterator<Item = Coord> + use<> {
        let cells = self.set.iter().copied().collect::<Vec<_>>();
        self.set.clear();
        cells.into_iter()
    }
}
