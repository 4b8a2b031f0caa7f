//! Core data model for the deduku sudoku engine.
//!
//! This crate holds everything below the solver: the [`ValueSet`] candidate
//! bitmask, the [`Grid`] geometry with its houses and intersections, the
//! [`Puzzle`] pencil-mark state with diff-reporting mutations, and the text
//! format used to load and print puzzles.
//!
//! Boards are square with side length `N = block_height * block_width`,
//! `N <= 35`, so non-square blocks such as 2x3 or 3x4 are first-class.

pub mod error;
pub mod grid;
pub mod mark;
pub mod puzzle;
pub mod text;
pub mod value_set;

pub use self::{
    error::{GeometryError, ParseError},
    grid::{Cell, Grid, House, HouseKind},
    mark::Marks,
    puzzle::{Puzzle, Variation},
    value_set::{Value, ValueSet},
};
