//! Test utilities for the deduction rules.
//!
//! [`DeduceTester`] builds a pencil-mark state, runs a configured solver
//! over it, and offers `#[track_caller]` assertions about the outcome. All
//! builder and assertion methods chain.
//!
//! # Example
//!
//! ```
//! use deduku_solver::{testing::DeduceTester, LevelLimit, Solver};
//!
//! let mut solver = Solver::new();
//! solver.max_hidden_level = LevelLimit::Disabled;
//! solver.max_linked_level = LevelLimit::Disabled;
//!
//! DeduceTester::classic()
//!     .restrict((0, 0), &[3])
//!     .deduce_with(&solver)
//!     .assert_no_paradox()
//!     .assert_solved_cell((0, 0), 3)
//!     .assert_missing((0, 5), &[3]);
//! ```

use deduku_core::{Cell, Grid, Marks, Puzzle, Value, ValueSet};

use crate::{CollectedSteps, Rule, Solver, SolverError, SolvingStep};

/// A fluent harness around one puzzle and one deduction run.
#[derive(Debug)]
pub struct DeduceTester {
    puzzle: Puzzle,
    marks: Marks,
    steps: Vec<SolvingStep>,
    paradox: Option<SolverError>,
}

impl DeduceTester {
    /// Creates a tester over a fresh puzzle of the given geometry.
    ///
    /// # Panics
    ///
    /// Panics on invalid geometry.
    #[must_use]
    pub fn new(block_height: u8, block_width: u8) -> Self {
        let grid = Grid::new(block_height, block_width).expect("valid test geometry");
        Self {
            puzzle: Puzzle::new(grid),
            marks: Marks::default(),
            steps: Vec::new(),
            paradox: None,
        }
    }

    /// Creates a tester over a fresh classic 9x9 puzzle.
    #[must_use]
    pub fn classic() -> Self {
        Self::new(3, 3)
    }

    /// Creates a tester from puzzle text.
    ///
    /// # Panics
    ///
    /// Panics if the text does not parse.
    #[track_caller]
    #[must_use]
    pub fn from_text(block_height: u8, block_width: u8, text: &str) -> Self {
        let grid = Grid::new(block_height, block_width).expect("valid test geometry");
        let marks = Marks::default();
        let puzzle =
            deduku_core::text::parse_puzzle(grid, &marks, text).expect("valid puzzle text");
        Self {
            puzzle,
            marks,
            steps: Vec::new(),
            paradox: None,
        }
    }

    /// Restricts a cell to the given candidates.
    pub fn restrict(mut self, (row, col): (u8, u8), values: &[Value]) -> Self {
        let keep: ValueSet = values.iter().copied().collect();
        self.puzzle.retain_candidates(keep, [Cell::new(row, col)]);
        self
    }

    /// Removes the given candidates from a cell.
    pub fn remove(mut self, (row, col): (u8, u8), values: &[Value]) -> Self {
        let gone: ValueSet = values.iter().copied().collect();
        self.puzzle.remove_candidates(gone, [Cell::new(row, col)]);
        self
    }

    /// Read access to the current puzzle state.
    #[must_use]
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Runs a full deduction with `solver`, collecting steps. A paradox is
    /// recorded, not propagated; assert on it with [`assert_paradox`].
    ///
    /// [`assert_paradox`]: DeduceTester::assert_paradox
    pub fn deduce_with(mut self, solver: &Solver) -> Self {
        let mut sink = CollectedSteps::new();
        match solver.deduce(&mut self.puzzle, &mut sink) {
            Ok(_) => {}
            Err(error) => self.paradox = Some(error),
        }
        self.steps = sink.into_steps();
        self
    }

    /// The steps of the last run.
    #[must_use]
    pub fn steps(&self) -> &[SolvingStep] {
        &self.steps
    }

    /// The transcript of the last run.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(&step.display(&self.marks).to_string());
            out.push('\n');
        }
        out
    }

    /// Asserts the last run ended without a paradox.
    #[track_caller]
    pub fn assert_no_paradox(self) -> Self {
        assert!(
            self.paradox.is_none(),
            "unexpected paradox: {:?}\ntranscript:\n{}",
            self.paradox,
            self.transcript()
        );
        self
    }

    /// Asserts the last run raised a paradox blamed on the given rule.
    #[track_caller]
    pub fn assert_paradox(self, rule: Rule) -> Self {
        match &self.paradox {
            Some(SolverError::Paradox(evidence)) => assert_eq!(
                evidence.rule(),
                rule,
                "paradox blamed on the wrong rule: {evidence:?}"
            ),
            None => panic!("expected a paradox, got none\ntranscript:\n{}", self.transcript()),
        }
        // The final step mirrors the error.
        let last = self.steps.last().expect("paradox emits a step");
        assert!(last.paradox, "last step is not a paradox step");
        assert!(last.mutations.is_empty(), "paradox step carries mutations");
        self
    }

    /// Asserts a cell is solved to `value`.
    #[track_caller]
    pub fn assert_solved_cell(self, (row, col): (u8, u8), value: Value) -> Self {
        let cell = Cell::new(row, col);
        assert_eq!(
            self.puzzle.value_of(cell),
            Some(value),
            "cell {cell} is {:?}, expected solved to {value}\ntranscript:\n{}",
            self.puzzle.candidates(cell),
            self.transcript()
        );
        self
    }

    /// Asserts a cell's candidates are exactly `values`.
    #[track_caller]
    pub fn assert_candidates(self, (row, col): (u8, u8), values: &[Value]) -> Self {
        let cell = Cell::new(row, col);
        let expected: ValueSet = values.iter().copied().collect();
        assert_eq!(
            self.puzzle.candidates(cell),
            expected,
            "wrong candidates at {cell}\ntranscript:\n{}",
            self.transcript()
        );
        self
    }

    /// Asserts a cell's candidates contain none of `values`.
    #[track_caller]
    pub fn assert_missing(self, (row, col): (u8, u8), values: &[Value]) -> Self {
        let cell = Cell::new(row, col);
        let gone: ValueSet = values.iter().copied().collect();
        assert!(
            !self.puzzle.candidates(cell).contains_any(gone),
            "cell {cell} still holds some of {gone:?}: {:?}\ntranscript:\n{}",
            self.puzzle.candidates(cell),
            self.transcript()
        );
        self
    }

    /// Asserts a cell's candidates still contain all of `values`.
    #[track_caller]
    pub fn assert_keeps(self, (row, col): (u8, u8), values: &[Value]) -> Self {
        let cell = Cell::new(row, col);
        let kept: ValueSet = values.iter().copied().collect();
        assert!(
            self.puzzle.candidates(cell).contains_all(kept),
            "cell {cell} lost some of {kept:?}: {:?}\ntranscript:\n{}",
            self.puzzle.candidates(cell),
            self.transcript()
        );
        self
    }

    /// Asserts the whole puzzle is solved.
    #[track_caller]
    pub fn assert_solved(self) -> Self {
        assert!(
            self.puzzle.solved(),
            "puzzle not solved\ntranscript:\n{}",
            self.transcript()
        );
        self
    }

    /// Asserts the number of steps emitted by the given rule family.
    #[track_caller]
    pub fn assert_rule_steps(self, rule: Rule, expected: usize) -> Self {
        let count = self
            .steps
            .iter()
            .filter(|step| step.evidence.rule() == rule)
            .count();
        assert_eq!(
            count, expected,
            "wrong {rule} step count\ntranscript:\n{}",
            self.transcript()
        );
        self
    }
}
