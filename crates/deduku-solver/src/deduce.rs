//! The three deduction rule families and the round loop.
//!
//! All three rules are the same combinatorial pattern at a level `k`: pick a
//! size-`k` subset (of cells, of values, or of parallel lines), union what
//! the subset can still reach, and compare the union's size against `k`. A
//! union smaller than `k` is a pigeonhole paradox; a union of exactly `k`
//! locks the subset and eliminates candidates elsewhere.
//!
//! Levels run from 1 upwards within a round. With `lower_level_first` set,
//! any firing restarts the round at level 1, so cheap rules keep the grid
//! small before the expensive subset sweeps run.

use deduku_core::{Cell, HouseKind, House, Puzzle, Value, ValueSet, Variation};

use crate::{
    combin::Combinations,
    error::{Flow, Interrupt},
    Evidence, Rule, SolveStats, SolvingStep, StepSink, Solver,
};

/// One deduction pass over a puzzle, shared by `Solver::deduce` and the
/// per-branch deductions of the search.
pub(crate) struct DeduceRun<'a> {
    solver: &'a Solver,
    puzzle: &'a mut Puzzle,
    sink: &'a mut dyn StepSink,
    stats: &'a mut SolveStats,
}

impl<'a> DeduceRun<'a> {
    pub(crate) fn new(
        solver: &'a Solver,
        puzzle: &'a mut Puzzle,
        sink: &'a mut dyn StepSink,
        stats: &'a mut SolveStats,
    ) -> Self {
        Self {
            solver,
            puzzle,
            sink,
            stats,
        }
    }

    /// Runs full rounds until one produces no variation or the puzzle is
    /// fulfilled.
    pub(crate) fn rounds(&mut self) -> Flow<()> {
        let mut round = 0u32;
        while !self.puzzle.fulfilled() {
            round += 1;
            let improved = self.round()?;
            log::trace!("deduction round {round} improved={improved}");
            if !improved {
                break;
            }
        }
        Ok(())
    }

    /// One round: every enabled rule at every level, lowest level first.
    fn round(&mut self) -> Flow<bool> {
        let size = self.puzzle.grid().size();
        let mut improved = false;
        for level in 1..size {
            if self.solver.rule_enabled(Rule::Naked, level, size) {
                improved |= self.naked_deduce(level)?;
            }
            if self.solver.rule_enabled(Rule::Hidden, level, size) {
                improved |= self.hidden_deduce(level)?;
            }
            if level >= 2 && self.solver.rule_enabled(Rule::Linked, level, size) {
                improved |= self.linked_deduce(level, HouseKind::Row)?;
                improved |= self.linked_deduce(level, HouseKind::Column)?;
            }
            if improved && self.solver.lower_level_first {
                return Ok(true);
            }
        }
        Ok(improved)
    }

    /// Delivers a successful step; a cancelling sink stops the run.
    fn emit(&mut self, evidence: Evidence, mutations: Vec<Variation>) -> Flow<()> {
        self.stats.record(evidence.rule());
        let step = SolvingStep::deduced(evidence, mutations);
        if self.sink.on_step(self.puzzle, &step).is_break() {
            return Err(Interrupt::Stopped);
        }
        if self.puzzle.fulfilled() {
            return Err(Interrupt::Fulfilled);
        }
        Ok(())
    }

    /// Naked rule at `level`: `k` cells of a house whose candidates union to
    /// at most `k` values. At level 1 this is the classical sole-candidate
    /// rule, including the empty-cell paradox.
    fn naked_deduce(&mut self, level: u8) -> Flow<bool> {
        let grid = self.puzzle.grid();
        let mut improved = false;
        for house in grid.houses() {
            let pool: Vec<Cell> = grid
                .house_cells(house)
                .filter(|&cell| self.puzzle.candidates(cell).len() <= level)
                .collect();
            let mut combos = Combinations::new(pool, usize::from(level), ValueSet::EMPTY);
            while let Some((cells, _)) = combos.next_with(|&cell, &acc| {
                let union = acc | self.puzzle.candidates(cell);
                (union.len() <= level).then_some(union)
            }) {
                // The pool was sampled at house entry; earlier firings may
                // have shrunk other members since, so re-check and re-union.
                if cells
                    .iter()
                    .any(|&cell| self.puzzle.candidates(cell).len() > level)
                {
                    continue;
                }
                let mut values = ValueSet::EMPTY;
                for &cell in &cells {
                    values |= self.puzzle.candidates(cell);
                }
                if values.len() < level {
                    return Err(Interrupt::Paradox(Evidence::Naked {
                        level,
                        house,
                        cells,
                        values,
                    }));
                }
                if values.len() > level {
                    continue;
                }

                let mut mutations = Vec::new();
                for common in grid.common_houses(&cells, None) {
                    let keep = grid.positions_of(common, &cells);
                    mutations.extend(self.puzzle.remove_candidates(
                        values,
                        grid.house_cells_excluding(common, keep),
                    ));
                }
                if !mutations.is_empty() {
                    improved = true;
                    self.emit(
                        Evidence::Naked {
                            level,
                            house,
                            cells,
                            values,
                        },
                        mutations,
                    )?;
                }
            }
        }
        Ok(improved)
    }

    /// Hidden rule at `level`: `k` values of a house confined to at most a
    /// few cells. Eliminations go to every other house containing all those
    /// cells, which yields the block/line interactions for free; when the
    /// cells number exactly `k`, they are additionally stripped down to the
    /// chosen values.
    fn hidden_deduce(&mut self, level: u8) -> Flow<bool> {
        let grid = self.puzzle.grid();
        // A spread wider than the block dimensions cannot share another
        // house, so such subsets could never eliminate anything.
        let spread_cap = level.max(grid.block_width()).max(grid.block_height());
        let mut improved = false;
        for house in grid.houses() {
            let line_cap = match house.kind() {
                HouseKind::Row => level.max(grid.block_width()),
                HouseKind::Column => level.max(grid.block_height()),
                HouseKind::Block => spread_cap,
            };
            let pool: Vec<Value> = (0..grid.size())
                .filter(|&value| self.puzzle.positions_in(house, value).len() <= spread_cap)
                .collect();
            let mut combos = Combinations::new(pool, usize::from(level), ValueSet::EMPTY);
            while let Some((chosen, _)) = combos.next_with(|&value, &acc| {
                let union = acc | self.puzzle.positions_in(house, value);
                (union.len() <= spread_cap).then_some(union)
            }) {
                if chosen
                    .iter()
                    .any(|&value| self.puzzle.positions_in(house, value).len() > spread_cap)
                {
                    continue;
                }
                let mut positions = ValueSet::EMPTY;
                for &value in &chosen {
                    positions |= self.puzzle.positions_in(house, value);
                }
                let values: ValueSet = chosen.iter().copied().collect();
                let cells: Vec<Cell> = positions
                    .iter()
                    .map(|i| grid.cell_in_house(house, i))
                    .collect();
                if positions.len() < level {
                    return Err(Interrupt::Paradox(Evidence::Hidden {
                        level,
                        house,
                        values,
                        cells,
                    }));
                }
                if positions.len() > line_cap {
                    continue;
                }

                let mut mutations = Vec::new();
                for common in grid.common_houses(&cells, None) {
                    if common == house {
                        if positions.len() == level {
                            mutations.extend(
                                self.puzzle.retain_candidates(values, cells.iter().copied()),
                            );
                        }
                    } else {
                        let keep = grid.positions_of(common, &cells);
                        mutations.extend(self.puzzle.remove_candidates(
                            values,
                            grid.house_cells_excluding(common, keep),
                        ));
                    }
                }
                if !mutations.is_empty() {
                    improved = true;
                    self.emit(
                        Evidence::Hidden {
                            level,
                            house,
                            values,
                            cells,
                        },
                        mutations,
                    )?;
                }
            }
        }
        Ok(improved)
    }

    /// Linked rule at `level` (the fish family): a value confined to `level`
    /// orthogonal lines within `level` parallel lines of the given kind.
    fn linked_deduce(&mut self, level: u8, kind: HouseKind) -> Flow<bool> {
        let grid = self.puzzle.grid();
        let orth = kind.orthogonal();
        let mut improved = false;
        for value in 0..grid.size() {
            let pool: Vec<u8> = (0..grid.size())
                .filter(|&index| {
                    let house = House::new(kind, index);
                    self.puzzle.positions_in(house, value).len() <= level
                })
                .collect();
            let mut combos = Combinations::new(pool, usize::from(level), ValueSet::EMPTY);
            while let Some((chosen, _)) = combos.next_with(|&index, &acc| {
                let union = acc | self.puzzle.positions_in(House::new(kind, index), value);
                (union.len() <= level).then_some(union)
            }) {
                if chosen.iter().any(|&index| {
                    self.puzzle.positions_in(House::new(kind, index), value).len() > level
                }) {
                    continue;
                }
                let mut orth_indices = ValueSet::EMPTY;
                for &index in &chosen {
                    orth_indices |= self.puzzle.positions_in(House::new(kind, index), value);
                }
                let indices: ValueSet = chosen.iter().copied().collect();
                if orth_indices.len() < level {
                    return Err(Interrupt::Paradox(Evidence::Linked {
                        level,
                        value,
                        kind,
                        indices,
                        orth_indices,
                    }));
                }
                if orth_indices.len() > level {
                    continue;
                }

                let mut mutations = Vec::new();
                for orth_index in orth_indices {
                    let orth_house = House::new(orth, orth_index);
                    mutations.extend(self.puzzle.remove_candidates(
                        ValueSet::single(value),
                        grid.house_cells_excluding(orth_house, indices),
                    ));
                }
                if !mutations.is_empty() {
                    improved = true;
                    self.emit(
                        Evidence::Linked {
                            level,
                            value,
                            kind,
                            indices,
                            orth_indices,
                        },
                        mutations,
                    )?;
                }
            }
        }
        Ok(improved)
    }
}
