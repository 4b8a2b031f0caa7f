//! The pencil-mark state of a board: one [`ValueSet`] per cell.
//!
//! A [`Puzzle`] is mutated exclusively through [`retain_candidates`] and
//! [`remove_candidates`], which report exactly what they eliminated as
//! [`Variation`] records. The solver builds its step transcripts from those
//! records, and the guessing search relies on [`Puzzle::clone`] being a deep
//! copy.
//!
//! [`retain_candidates`]: Puzzle::retain_candidates
//! [`remove_candidates`]: Puzzle::remove_candidates

use crate::{Cell, Grid, House, Value, ValueSet};

/// The values eliminated from one cell by a single mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variation {
    /// The cell that changed.
    pub cell: Cell,
    /// The values removed from it. Never empty.
    pub removed: ValueSet,
}

/// A board of candidate sets.
///
/// # Examples
///
/// ```
/// use deduku_core::{Cell, Grid, Puzzle, ValueSet};
///
/// let grid = Grid::new(3, 3)?;
/// let mut puzzle = Puzzle::new(grid);
/// assert_eq!(puzzle.candidates(Cell::new(0, 0)).len(), 9);
///
/// puzzle.assign(Cell::new(0, 0), 4);
/// assert_eq!(puzzle.value_of(Cell::new(0, 0)), Some(4));
/// assert!(!puzzle.fulfilled());
/// # Ok::<(), deduku_core::GeometryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    grid: Grid,
    cells: Vec<ValueSet>,
}

impl Puzzle {
    /// Creates a puzzle in which every cell still admits every value.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        let n = usize::from(grid.size());
        Self {
            grid,
            cells: vec![ValueSet::full(grid.size()); n * n],
        }
    }

    /// The grid geometry.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// The candidates of `cell`.
    #[inline]
    #[must_use]
    pub fn candidates(&self, cell: Cell) -> ValueSet {
        self.cells[self.grid.cell_index(cell)]
    }

    /// The solved value of `cell`, if its candidate set is a singleton.
    #[inline]
    #[must_use]
    pub fn value_of(&self, cell: Cell) -> Option<Value> {
        let candidates = self.candidates(cell);
        if candidates.len() == 1 {
            candidates.peek()
        } else {
            None
        }
    }

    /// Restricts `cell` to the single candidate `value`. Boundary helper for
    /// puzzle loading; equivalent to retaining `{value}`.
    pub fn assign(&mut self, cell: Cell, value: Value) {
        self.retain_candidates(ValueSet::single(value), [cell]);
    }

    /// Keeps only `values` in each of `cells`, collecting the non-empty
    /// per-cell differences.
    pub fn retain_candidates<I>(&mut self, values: ValueSet, cells: I) -> Vec<Variation>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut variations = Vec::new();
        for cell in cells {
            let index = self.grid.cell_index(cell);
            let removed = self.cells[index].retain(values);
            if !removed.is_empty() {
                variations.push(Variation { cell, removed });
            }
        }
        variations
    }

    /// Removes `values` from each of `cells`, collecting the non-empty
    /// per-cell differences.
    pub fn remove_candidates<I>(&mut self, values: ValueSet, cells: I) -> Vec<Variation>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut variations = Vec::new();
        for cell in cells {
            let index = self.grid.cell_index(cell);
            let removed = self.cells[index].remove(values);
            if !removed.is_empty() {
                variations.push(Variation { cell, removed });
            }
        }
        variations
    }

    /// The in-house positions of the cells of `house` whose candidates
    /// contain `value`.
    #[must_use]
    pub fn positions_in(&self, house: House, value: Value) -> ValueSet {
        let mut positions = ValueSet::EMPTY;
        for i in 0..self.grid.size() {
            if self.candidates(self.grid.cell_in_house(house, i)).contains(value) {
                positions.insert(i);
            }
        }
        positions
    }

    /// Returns `true` if every cell is solved to a single candidate.
    #[must_use]
    pub fn fulfilled(&self) -> bool {
        self.cells.iter().all(|set| set.len() == 1)
    }

    /// Returns `true` if some cell has no candidate left, or some house holds
    /// two solved cells with the same value.
    #[must_use]
    pub fn paradoxical(&self) -> bool {
        if self.cells.iter().any(|set| set.is_empty()) {
            return true;
        }
        for house in self.grid.houses() {
            let mut seen = ValueSet::EMPTY;
            for cell in self.grid.house_cells(house) {
                if let Some(value) = self.value_of(cell) {
                    if !seen.insert(value) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Returns `true` if the puzzle is fulfilled and consistent.
    #[must_use]
    pub fn solved(&self) -> bool {
        self.fulfilled() && !self.paradoxical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle() -> Puzzle {
        Puzzle::new(Grid::new(3, 3).unwrap())
    }

    #[test]
    fn test_fresh_puzzle_full() {
        let puzzle = puzzle();
        assert_eq!(puzzle.candidates(Cell::new(4, 7)), ValueSet::full(9));
        assert!(!puzzle.fulfilled());
        assert!(!puzzle.paradoxical());
        assert_eq!(puzzle.value_of(Cell::new(0, 0)), None);
    }

    #[test]
    fn test_mutations_report_exact_diffs() {
        let mut puzzle = puzzle();
        let cells = [Cell::new(0, 0), Cell::new(0, 1)];

        let variations =
            puzzle.retain_candidates(ValueSet::from_iter([1, 2]), cells.iter().copied());
        assert_eq!(variations.len(), 2);
        assert_eq!(variations[0].cell, Cell::new(0, 0));
        assert_eq!(
            variations[0].removed,
            ValueSet::full(9) - ValueSet::from_iter([1, 2])
        );

        // Retaining again changes nothing, so no variation is reported.
        let variations =
            puzzle.retain_candidates(ValueSet::from_iter([1, 2]), cells.iter().copied());
        assert!(variations.is_empty());

        let variations = puzzle.remove_candidates(ValueSet::single(1), [Cell::new(0, 0)]);
        assert_eq!(variations.len(), 1);
        assert_eq!(variations[0].removed, ValueSet::single(1));
        assert_eq!(puzzle.value_of(Cell::new(0, 0)), Some(2));
    }

    #[test]
    fn test_positions_in() {
        let mut puzzle = puzzle();
        let row = House::new(crate::HouseKind::Row, 0);
        assert_eq!(puzzle.positions_in(row, 3), ValueSet::full(9));

        puzzle.remove_candidates(
            ValueSet::single(3),
            (2..9).map(|col| Cell::new(0, col)),
        );
        assert_eq!(puzzle.positions_in(row, 3), ValueSet::from_iter([0, 1]));
    }

    #[test]
    fn test_paradoxical_on_empty_cell() {
        let mut puzzle = puzzle();
        puzzle.retain_candidates(ValueSet::EMPTY, [Cell::new(3, 3)]);
        assert!(puzzle.paradoxical());
        assert!(!puzzle.solved());
    }

    #[test]
    fn test_paradoxical_on_duplicate_in_house() {
        let mut puzzle = puzzle();
        puzzle.assign(Cell::new(2, 0), 5);
        assert!(!puzzle.paradoxical());
        puzzle.assign(Cell::new(2, 8), 5);
        assert!(puzzle.paradoxical());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut puzzle = puzzle();
        let copy = puzzle.clone();
        puzzle.assign(Cell::new(0, 0), 0);
        assert_eq!(copy.candidates(Cell::new(0, 0)), ValueSet::full(9));
    }
}
