//! Deductive solving engine for deduku.
//!
//! The engine converges a [`Puzzle`](deduku_core::Puzzle) to a fixpoint by
//! applying three rule families (naked, hidden and linked), each
//! parameterised by a level `k`, then falls back to depth-first guessing
//! when deduction stalls. Progress is exposed as a stream of
//! [`SolvingStep`] values delivered to a [`StepSink`]; a paradox aborts the
//! stream as [`SolverError::Paradox`].
//!
//! # Examples
//!
//! ```
//! use deduku_core::{Grid, Marks, Puzzle, text};
//! use deduku_solver::{CollectedSteps, Solver};
//!
//! let grid = Grid::new(2, 2)?;
//! let marks = Marks::default();
//! let mut puzzle = text::parse_puzzle(grid, &marks, "123*\n3*12\n23*1\n*123")?;
//!
//! let solver = Solver::new();
//! let mut sink = CollectedSteps::new();
//! let report = solver.solve(&mut puzzle, &mut sink)?;
//! assert!(report.deduction.fulfilled);
//! assert!(puzzle.solved());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod combin;
mod deduce;
mod error;
pub mod evidence;
mod search;
pub mod sink;
mod solver;
pub mod testing;

pub use self::{
    combin::Combinations,
    error::SolverError,
    evidence::{Evidence, Rule, SolvingStep, StepDisplay},
    sink::{CollectedSteps, DiscardSteps, StepSink},
    solver::{DeduceOutcome, LevelLimit, SearchOutcome, SolveReport, SolveStats, Solver},
};
