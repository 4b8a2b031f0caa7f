//! Pure grid geometry: cells, houses and their intersections.
//!
//! A [`Grid`] is a value type describing a board whose side length is
//! `block_height * block_width`. It owns no cell state; the candidate data
//! lives in [`Puzzle`](crate::Puzzle). Everything here is side-effect free,
//! so the solver can copy grids around and iterate houses without borrowing
//! puzzle state.
//!
//! Blocks tile the board in bands of `block_height` rows: block `b` covers
//! rows `block_height * (b / blocks_per_row)..+block_height` and columns
//! `block_width * (b % blocks_per_row)..+block_width`, with
//! `blocks_per_row == block_height`.

use std::fmt;

use crate::{error::GeometryError, ValueSet};

/// One square of the board.
///
/// Ordering is lexicographic `(row, col)`, which matches the row-major
/// iteration order used throughout the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    /// Row, `0..N`.
    pub row: u8,
    /// Column, `0..N`.
    pub col: u8,
}

impl Cell {
    /// Creates a cell at `(row, col)`.
    #[inline]
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row + 1, self.col + 1)
    }
}

/// The three kinds of house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HouseKind {
    /// A full row.
    Row,
    /// A full column.
    Column,
    /// A `block_height x block_width` rectangle.
    Block,
}

impl HouseKind {
    /// All kinds, in house iteration order.
    pub const ALL: [Self; 3] = [Self::Row, Self::Column, Self::Block];

    /// Returns the orthogonal line kind: Row for Column and vice versa.
    ///
    /// # Panics
    ///
    /// Panics for [`HouseKind::Block`], which is not a line.
    #[must_use]
    pub fn orthogonal(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
            Self::Block => panic!("a block has no orthogonal kind"),
        }
    }
}

impl fmt::Display for HouseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::Block => "block",
        };
        f.write_str(name)
    }
}

/// A row, column or block, identified by kind and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct House {
    kind: HouseKind,
    index: u8,
}

impl House {
    /// Creates a house of the given kind and index.
    #[inline]
    #[must_use]
    pub const fn new(kind: HouseKind, index: u8) -> Self {
        Self { kind, index }
    }

    /// The house kind.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> HouseKind {
        self.kind
    }

    /// The house index, `0..N`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.index
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.index + 1)
    }
}

/// Board geometry for a side length of `block_height * block_width`.
///
/// # Examples
///
/// ```
/// use deduku_core::{Cell, Grid, HouseKind};
///
/// let grid = Grid::new(2, 3)?;
/// assert_eq!(grid.size(), 6);
/// assert_eq!(grid.block_index(Cell::new(3, 4)), 3);
/// assert_eq!(grid.houses_of_kind(HouseKind::Row).count(), 6);
/// # Ok::<(), deduku_core::GeometryError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    block_height: u8,
    block_width: u8,
    size: u8,
}

impl Grid {
    /// The largest supported side length. A [`ValueSet`] must be able to hold
    /// one bit per value and one bit per in-house position.
    pub const MAX_SIZE: u8 = 35;

    /// Creates a grid with blocks of `block_height` rows by `block_width`
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if either dimension is zero or the resulting
    /// side length exceeds [`Grid::MAX_SIZE`].
    pub fn new(block_height: u8, block_width: u8) -> Result<Self, GeometryError> {
        if block_height == 0 || block_width == 0 {
            return Err(GeometryError::ZeroBlock);
        }
        let size = u16::from(block_height) * u16::from(block_width);
        if size > u16::from(Self::MAX_SIZE) {
            return Err(GeometryError::TooLarge { size });
        }
        Ok(Self {
            block_height,
            block_width,
            size: size as u8,
        })
    }

    /// The side length `N`.
    #[inline]
    #[must_use]
    pub const fn size(self) -> u8 {
        self.size
    }

    /// Rows per block.
    #[inline]
    #[must_use]
    pub const fn block_height(self) -> u8 {
        self.block_height
    }

    /// Columns per block.
    #[inline]
    #[must_use]
    pub const fn block_width(self) -> u8 {
        self.block_width
    }

    /// Blocks in one band of rows (`N / block_width`).
    #[inline]
    #[must_use]
    pub const fn blocks_per_row(self) -> u8 {
        self.block_height
    }

    /// The linear index `row * N + col`.
    #[inline]
    #[must_use]
    pub fn cell_index(self, cell: Cell) -> usize {
        usize::from(cell.row) * usize::from(self.size) + usize::from(cell.col)
    }

    /// The index of the block containing `cell`.
    #[inline]
    #[must_use]
    pub fn block_index(self, cell: Cell) -> u8 {
        self.blocks_per_row() * (cell.row / self.block_height) + cell.col / self.block_width
    }

    /// The house of the given kind containing `cell`.
    #[must_use]
    pub fn house_of(self, cell: Cell, kind: HouseKind) -> House {
        let index = match kind {
            HouseKind::Row => cell.row,
            HouseKind::Column => cell.col,
            HouseKind::Block => self.block_index(cell),
        };
        House::new(kind, index)
    }

    /// The three houses containing `cell`, in kind order.
    #[must_use]
    pub fn houses_of(self, cell: Cell) -> [House; 3] {
        HouseKind::ALL.map(|kind| self.house_of(cell, kind))
    }

    /// The position of `cell` inside its house of the given kind: the column
    /// for a row, the row for a column, and `block_width * (row % block_height)
    /// + col % block_width` for a block.
    #[must_use]
    pub fn index_in_house(self, cell: Cell, kind: HouseKind) -> u8 {
        match kind {
            HouseKind::Row => cell.col,
            HouseKind::Column => cell.row,
            HouseKind::Block => {
                self.block_width * (cell.row % self.block_height) + cell.col % self.block_width
            }
        }
    }

    /// The `i`-th cell of `house`, in row-major order.
    #[must_use]
    pub fn cell_in_house(self, house: House, i: u8) -> Cell {
        debug_assert!(i < self.size, "in-house index {i} out of range");
        match house.kind() {
            HouseKind::Row => Cell::new(house.index(), i),
            HouseKind::Column => Cell::new(i, house.index()),
            HouseKind::Block => {
                let first_row = self.block_height * (house.index() / self.blocks_per_row());
                let first_col = self.block_width * (house.index() % self.blocks_per_row());
                Cell::new(first_row + i / self.block_width, first_col + i % self.block_width)
            }
        }
    }

    /// The cell where line `(kind, index)` meets the orthogonal line at
    /// `orth_index`.
    ///
    /// # Panics
    ///
    /// Panics for [`HouseKind::Block`], which is not a line.
    #[must_use]
    pub fn intersect_cell(self, kind: HouseKind, index: u8, orth_index: u8) -> Cell {
        match kind {
            HouseKind::Row => Cell::new(index, orth_index),
            HouseKind::Column => Cell::new(orth_index, index),
            HouseKind::Block => panic!("a block has no line intersection"),
        }
    }

    /// All cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let n = self.size;
        (0..n).flat_map(move |row| (0..n).map(move |col| Cell::new(row, col)))
    }

    /// The cells of `house`, in row-major order.
    pub fn house_cells(self, house: House) -> impl Iterator<Item = Cell> {
        (0..self.size).map(move |i| self.cell_in_house(house, i))
    }

    /// The cells of `house` whose in-house position is not in `excluded`.
    pub fn house_cells_excluding(
        self,
        house: House,
        excluded: ValueSet,
    ) -> impl Iterator<Item = Cell> {
        (0..self.size)
            .filter(move |&i| !excluded.contains(i))
            .map(move |i| self.cell_in_house(house, i))
    }

    /// All houses: rows by index, then columns, then blocks.
    pub fn houses(self) -> impl Iterator<Item = House> {
        HouseKind::ALL
            .into_iter()
            .flat_map(move |kind| self.houses_of_kind(kind))
    }

    /// The houses of one kind, by index.
    pub fn houses_of_kind(self, kind: HouseKind) -> impl Iterator<Item = House> {
        (0..self.size).map(move |index| House::new(kind, index))
    }

    /// The house of the given kind containing every cell of `cells`, if any.
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn common_house(self, cells: &[Cell], kind: HouseKind) -> Option<House> {
        let (&first, rest) = cells.split_first()?;
        let house = self.house_of(first, kind);
        rest.iter()
            .all(|&cell| self.house_of(cell, kind) == house)
            .then_some(house)
    }

    /// The houses containing every cell of `cells`, at most one per kind, in
    /// kind order. A kind equal to `exclude` is not considered.
    pub fn common_houses<'a>(
        self,
        cells: &'a [Cell],
        exclude: Option<HouseKind>,
    ) -> impl Iterator<Item = House> + 'a {
        HouseKind::ALL
            .into_iter()
            .filter(move |&kind| Some(kind) != exclude)
            .filter_map(move |kind| self.common_house(cells, kind))
    }

    /// The in-house positions of `cells` within `house`, as a set. Intended
    /// for building exclusion masks; cells outside the house are the caller's
    /// bug.
    #[must_use]
    pub fn positions_of(self, house: House, cells: &[Cell]) -> ValueSet {
        cells
            .iter()
            .map(|&cell| self.index_in_house(cell, house.kind()))
            .collect()
    }
}
