//! Depth-first guessing over unsolved puzzles.
//!
//! Every branch clones the puzzle, fixes one candidate, and hands the clone
//! to the deduction rules. Paradoxes raised inside a branch are expected:
//! they refute the guess, are reported as paradox steps, and the next
//! candidate is tried. Sibling branches therefore always start from the
//! parent's pre-guess state.

use deduku_core::{Cell, Puzzle, ValueSet};

use crate::{
    deduce::DeduceRun,
    error::{Flow, Interrupt},
    Evidence, Rule, SearchOutcome, SolveStats, SolvingStep, StepSink, Solver,
};

/// Picks the cell to branch on: the first cell in row-major order with
/// exactly two candidates, otherwise the unsolved cell with the fewest
/// candidates. `None` when every cell is solved.
pub(crate) fn choose_guess_cell(puzzle: &Puzzle) -> Option<Cell> {
    let mut best: Option<(u8, Cell)> = None;
    for cell in puzzle.grid().cells() {
        let count = puzzle.candidates(cell).len();
        if count <= 1 {
            continue;
        }
        if count == 2 {
            return Some(cell);
        }
        if best.map_or(true, |(min, _)| count < min) {
            best = Some((count, cell));
        }
    }
    best.map(|(_, cell)| cell)
}

pub(crate) struct SearchRun<'a> {
    solver: &'a Solver,
    sink: &'a mut dyn StepSink,
    solutions: Vec<Puzzle>,
    stats: SolveStats,
}

impl<'a> SearchRun<'a> {
    pub(crate) fn new(solver: &'a Solver, sink: &'a mut dyn StepSink) -> Self {
        Self {
            solver,
            sink,
            solutions: Vec::new(),
            stats: SolveStats::default(),
        }
    }

    /// Tries every candidate of the chosen cell at this depth.
    pub(crate) fn guess(&mut self, puzzle: &Puzzle, depth: u16) -> Flow<()> {
        let Some(cell) = choose_guess_cell(puzzle) else {
            // Nothing left to branch on.
            return Ok(());
        };
        let candidates = puzzle.candidates(cell);
        log::debug!("guess depth {depth}: branching on {cell} ({} candidates)", candidates.len());
        for value in candidates {
            let mut branch = puzzle.clone();
            let mutations = branch.retain_candidates(ValueSet::single(value), [cell]);
            self.stats.record(Rule::Guess);
            let step = SolvingStep::deduced(
                Evidence::Guess {
                    level: depth,
                    cell,
                    candidates,
                    chosen: value,
                },
                mutations,
            );
            if self.sink.on_step(&branch, &step).is_break() {
                return Err(Interrupt::Stopped);
            }

            let deduced =
                DeduceRun::new(self.solver, &mut branch, &mut *self.sink, &mut self.stats)
                    .rounds();
            match deduced {
                Err(Interrupt::Paradox(evidence)) => {
                    // The assumption refuted itself; report and move on.
                    let step = SolvingStep::paradox(evidence);
                    if self.sink.on_step(&branch, &step).is_break() {
                        return Err(Interrupt::Stopped);
                    }
                }
                Err(Interrupt::Stopped) => return Err(Interrupt::Stopped),
                Ok(()) | Err(Interrupt::Fulfilled) => {
                    if branch.solved() {
                        log::debug!("guess depth {depth}: solution found");
                        self.solutions.push(branch);
                        if self.solutions.len() >= self.solver.max_solutions {
                            return Err(Interrupt::Stopped);
                        }
                    } else if !branch.fulfilled() {
                        self.guess(&branch, depth + 1)?;
                    }
                    // A branch that filled every cell inconsistently is dead.
                }
            }
        }
        Ok(())
    }

    /// Converts the unwind result into the public outcome.
    pub(crate) fn finish(self, result: Flow<()>) -> SearchOutcome {
        let interrupted = match result {
            Ok(()) => false,
            Err(Interrupt::Stopped) => true,
            // Branch deductions catch their own paradoxes, and `Fulfilled`
            // never crosses a branch boundary.
            Err(Interrupt::Paradox(_)) | Err(Interrupt::Fulfilled) => unreachable!(),
        };
        SearchOutcome {
            solutions: self.solutions,
            interrupted,
            stats: self.stats,
        }
    }
}
