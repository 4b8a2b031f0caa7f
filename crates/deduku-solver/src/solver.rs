//! The solver: rule configuration, the deduction fixpoint loop and the
//! guessing search entry points.

use deduku_core::Puzzle;

use crate::{
    deduce::DeduceRun,
    error::Interrupt,
    search::SearchRun,
    Rule, SolverError, SolvingStep, StepSink,
};

/// A per-rule cap on the level `k` a rule may fire at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelLimit {
    /// The rule may fire at any level up to `N - 1`.
    Unlimited,
    /// The rule never fires.
    Disabled,
    /// The rule fires at levels up to the given `k`.
    Max(u8),
}

impl LevelLimit {
    /// Decodes the conventional integer encoding: `-1` unlimited, `0`
    /// disabled, `k > 0` a cap.
    #[must_use]
    pub fn from_arg(arg: i32) -> Self {
        match arg {
            i32::MIN..=-1 => Self::Unlimited,
            0 => Self::Disabled,
            cap => Self::Max(cap.min(i32::from(u8::MAX)) as u8),
        }
    }

    /// The highest level allowed on a grid of side `size`; 0 when disabled.
    #[must_use]
    pub fn cap(self, size: u8) -> u8 {
        match self {
            Self::Unlimited => size - 1,
            Self::Disabled => 0,
            Self::Max(cap) => cap.min(size - 1),
        }
    }
}

/// Step counts per rule family.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolveStats {
    counts: [usize; 4],
}

impl SolveStats {
    fn slot(rule: Rule) -> usize {
        match rule {
            Rule::Naked => 0,
            Rule::Hidden => 1,
            Rule::Linked => 2,
            Rule::Guess => 3,
        }
    }

    pub(crate) fn record(&mut self, rule: Rule) {
        self.counts[Self::slot(rule)] += 1;
    }

    /// Steps emitted by the given rule family.
    #[must_use]
    pub fn steps(&self, rule: Rule) -> usize {
        self.counts[Self::slot(rule)]
    }

    /// Steps emitted in total.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Returns `true` if any step was emitted.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.total_steps() > 0
    }
}

/// Result of a [`Solver::deduce`] run that did not hit a paradox.
#[derive(Debug, Clone)]
pub struct DeduceOutcome {
    /// Whether every cell ended up solved.
    pub fulfilled: bool,
    /// Whether the sink cancelled the run before the fixpoint.
    pub interrupted: bool,
    /// Step counts.
    pub stats: SolveStats,
}

/// Result of a [`Solver::search`] run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The solved puzzles found, in discovery order.
    pub solutions: Vec<Puzzle>,
    /// Whether the search stopped early: the solution quota was reached or
    /// the sink cancelled. When `false`, the guess tree was exhausted.
    pub interrupted: bool,
    /// Step counts, including the nested deductions.
    pub stats: SolveStats,
}

/// Result of the combined [`Solver::solve`] driver.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// The initial deduction pass.
    pub deduction: DeduceOutcome,
    /// The search pass, if one was needed and enabled.
    pub search: Option<SearchOutcome>,
}

/// The configurable solving engine.
///
/// A fresh solver enables every rule at every level, restarts from level 1
/// after each successful firing, and searches for up to two solutions when
/// deduction stalls.
///
/// # Examples
///
/// ```
/// use deduku_core::{Grid, Marks, Puzzle};
/// use deduku_solver::{DiscardSteps, LevelLimit, Solver};
///
/// let grid = Grid::new(3, 3)?;
/// let mut solver = Solver::new();
/// solver.max_naked_level = LevelLimit::Max(1);
/// solver.max_hidden_level = LevelLimit::Disabled;
/// solver.max_linked_level = LevelLimit::Disabled;
///
/// let mut puzzle = Puzzle::new(grid);
/// let outcome = solver.deduce(&mut puzzle, &mut DiscardSteps)?;
/// assert!(!outcome.fulfilled);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solver {
    /// Cap for the naked rule.
    pub max_naked_level: LevelLimit,
    /// Cap for the hidden rule.
    pub max_hidden_level: LevelLimit,
    /// Cap for the linked rule.
    pub max_linked_level: LevelLimit,
    /// Restart the level loop from 1 after a successful firing.
    pub lower_level_first: bool,
    /// Whether [`Solver::solve`] may fall back to searching.
    pub guess_enabled: bool,
    /// Stop searching once this many solutions are found.
    pub max_solutions: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Creates a solver with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_naked_level: LevelLimit::Unlimited,
            max_hidden_level: LevelLimit::Unlimited,
            max_linked_level: LevelLimit::Unlimited,
            lower_level_first: true,
            guess_enabled: true,
            max_solutions: 2,
        }
    }

    /// The level cap configured for `rule`.
    ///
    /// # Panics
    ///
    /// Panics for [`Rule::Guess`], which has no level cap.
    #[must_use]
    pub fn max_level(&self, rule: Rule) -> LevelLimit {
        match rule {
            Rule::Naked => self.max_naked_level,
            Rule::Hidden => self.max_hidden_level,
            Rule::Linked => self.max_linked_level,
            Rule::Guess => panic!("the guess rule has no level cap"),
        }
    }

    /// Sets the level cap for `rule`.
    ///
    /// # Panics
    ///
    /// Panics for [`Rule::Guess`], which has no level cap.
    pub fn set_max_level(&mut self, rule: Rule, limit: LevelLimit) {
        match rule {
            Rule::Naked => self.max_naked_level = limit,
            Rule::Hidden => self.max_hidden_level = limit,
            Rule::Linked => self.max_linked_level = limit,
            Rule::Guess => panic!("the guess rule has no level cap"),
        }
    }

    /// Disables all three deduction rules.
    pub fn disable_all_rules(&mut self) {
        self.max_naked_level = LevelLimit::Disabled;
        self.max_hidden_level = LevelLimit::Disabled;
        self.max_linked_level = LevelLimit::Disabled;
    }

    pub(crate) fn rule_enabled(&self, rule: Rule, level: u8, size: u8) -> bool {
        level <= self.max_level(rule).cap(size)
    }

    /// Runs the deduction rules on `puzzle` until a fixpoint, the solved
    /// state, a paradox, or cancellation, delivering every step to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Paradox`] if a rule proves the puzzle
    /// inconsistent; the paradox step is delivered before the error.
    pub fn deduce(
        &self,
        puzzle: &mut Puzzle,
        sink: &mut dyn StepSink,
    ) -> Result<DeduceOutcome, SolverError> {
        let mut stats = SolveStats::default();
        let result = DeduceRun::new(self, puzzle, sink, &mut stats).rounds();
        match result {
            Ok(()) | Err(Interrupt::Fulfilled) => Ok(DeduceOutcome {
                fulfilled: puzzle.fulfilled(),
                interrupted: false,
                stats,
            }),
            Err(Interrupt::Stopped) => Ok(DeduceOutcome {
                fulfilled: puzzle.fulfilled(),
                interrupted: true,
                stats,
            }),
            Err(Interrupt::Paradox(evidence)) => {
                let step = SolvingStep::paradox(evidence.clone());
                let _ = sink.on_step(puzzle, &step);
                Err(SolverError::Paradox(evidence))
            }
        }
    }

    /// Searches for solutions by depth-first guessing, delegating to the
    /// deduction rules on every branch. The puzzle itself is never mutated;
    /// each branch works on a clone.
    #[must_use]
    pub fn search(&self, puzzle: &Puzzle, sink: &mut dyn StepSink) -> SearchOutcome {
        let mut run = SearchRun::new(self, sink);
        let result = run.guess(puzzle, 1);
        run.finish(result)
    }

    /// The full driver: deduce, then search if the puzzle is still unsolved
    /// and guessing is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Paradox`] if the initial deduction proves the
    /// puzzle inconsistent.
    pub fn solve(
        &self,
        puzzle: &mut Puzzle,
        sink: &mut dyn StepSink,
    ) -> Result<SolveReport, SolverError> {
        let deduction = self.deduce(puzzle, sink)?;
        let search = if !deduction.fulfilled && !deduction.interrupted && self.guess_enabled {
            log::debug!("deduction stalled, falling back to guessing");
            Some(self.search(puzzle, sink))
        } else {
            None
        };
        Ok(SolveReport { deduction, search })
    }
}
