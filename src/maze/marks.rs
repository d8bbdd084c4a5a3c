use super::Coord;

/// Per-cell marker array owned by an algorithm run.
///
/// Algorithms keep their transient per-cell state (usually a visited flag) here
/// instead of on the maze, so the same maze can be scanned by several algorithms
/// without reset passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Marks<T> {
    data: Box<[T]>,
    width: usize,
    height: usize,
}

impl<T: Clone> Marks<T> {
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Marks {
            data: vec![value; width * height].into_boxed_slice(),
            width,
            height,
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Marks<T> {
    fn ravel_index(&self, (x, y): Coord) -> usize {
        assert!(
            x < self.width && y < self.height,
            "Coordinate ({x}, {y}) is out of bounds for {}x{} marks",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Iterates over all marks with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, mark)| ((i % width, i / width), mark))
    }

    /// Number of marks satisfying `pred`.
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.data.iter().filter(|mark| pred(mark)).count()
    }
}

impl<T> std::ops::Index<Coord> for Marks<T> {
    type Output = T;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.data[self.ravel_index(index)]
    }
}

impl<T> std::ops::IndexMut<Coord> for Marks<T> {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        let idx = self.ravel_index(index);
        &mut self.data[idx]
    }
}
