//! Reading and writing puzzles as text.
//!
//! The format is one line per row, left to right:
//!
//! - a single mark: the cell is solved to that value;
//! - `*`: the cell still admits every value;
//! - `[135]`: the cell is restricted to the listed candidates
//!   (spaces between marks are allowed);
//! - `[^135]`: the cell is restricted to everything but the listed values.
//!
//! Blank lines separate block bands and are ignored. Writing always produces
//! the canonical form: solved marks, `*` for full cells, `[…]` in ascending
//! value order otherwise, with an extra space at block seams and a blank line
//! between bands, so `parse(format(p)) == p` for every puzzle.
//!
//! # Examples
//!
//! ```
//! use deduku_core::{text, Cell, Grid, Marks};
//!
//! let grid = Grid::new(2, 2)?;
//! let marks = Marks::default();
//! let puzzle = text::parse_puzzle(grid, &marks, "1 * [34] *\n* 2 * *\n")?;
//! assert_eq!(puzzle.value_of(Cell::new(0, 0)), Some(0));
//! assert_eq!(puzzle.candidates(Cell::new(0, 2)).len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt::Write as _;

use crate::{error::ParseError, Cell, Grid, Marks, Puzzle, ValueSet};

/// Parses a puzzle from text. Missing rows and missing cells at the end of a
/// line are left unconstrained.
///
/// # Errors
///
/// Returns a [`ParseError`] for unknown marks, marks outside the grid's value
/// range, too many rows or cells, unterminated `[` groups, or a mark table
/// that cannot cover the grid.
pub fn parse_puzzle(grid: Grid, marks: &Marks, input: &str) -> Result<Puzzle, ParseError> {
    marks.require(grid.size())?;
    let mut puzzle = Puzzle::new(grid);
    let mut row: u8 = 0;
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if row >= grid.size() {
            return Err(ParseError::TooManyRows { max: grid.size() });
        }
        parse_row(grid, marks, &mut puzzle, row, line)?;
        row += 1;
    }
    Ok(puzzle)
}

fn parse_row(
    grid: Grid,
    marks: &Marks,
    puzzle: &mut Puzzle,
    row: u8,
    line: &str,
) -> Result<(), ParseError> {
    let mut col: u8 = 0;
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }
        if col >= grid.size() {
            return Err(ParseError::TooManyCells {
                row: row + 1,
                max: grid.size(),
            });
        }
        let cell = Cell::new(row, col);
        match ch {
            '*' => {}
            '[' => {
                let mut listed = ValueSet::EMPTY;
                let mut complement = false;
                let mut first = true;
                let mut closed = false;
                for ch in chars.by_ref() {
                    match ch {
                        ']' => {
                            closed = true;
                            break;
                        }
                        '^' if first => complement = true,
                        ch if ch.is_whitespace() => continue,
                        ch => {
                            listed.insert(lookup_mark(grid, marks, row, ch)?);
                        }
                    };
                    first = false;
                }
                if !closed {
                    return Err(ParseError::UnterminatedGroup { row: row + 1 });
                }
                let keep = if complement {
                    ValueSet::full(grid.size()) - listed
                } else {
                    listed
                };
                puzzle.retain_candidates(keep, [cell]);
            }
            ch => {
                let value = lookup_mark(grid, marks, row, ch)?;
                puzzle.assign(cell, value);
            }
        }
        col += 1;
    }
    Ok(())
}

fn lookup_mark(grid: Grid, marks: &Marks, row: u8, ch: char) -> Result<u8, ParseError> {
    let value = marks
        .lookup(ch)
        .ok_or(ParseError::UnknownMark { mark: ch, row: row + 1 })?;
    if value >= grid.size() {
        return Err(ParseError::MarkOutOfRange {
            mark: ch,
            value,
            size: grid.size(),
        });
    }
    Ok(value)
}

/// Writes a puzzle in canonical text form.
#[must_use]
pub fn format_puzzle(puzzle: &Puzzle, marks: &Marks) -> String {
    let grid = puzzle.grid();
    let n = grid.size();
    let mut out = String::new();
    for row in 0..n {
        if row > 0 && row % grid.block_height() == 0 {
            out.push('\n');
        }
        for col in 0..n {
            if col > 0 {
                out.push(' ');
                if col % grid.block_width() == 0 {
                    out.push(' ');
                }
            }
            let candidates = puzzle.candidates(Cell::new(row, col));
            if let Some(value) = puzzle.value_of(Cell::new(row, col)) {
                out.push(marks.of(value));
            } else if candidates == ValueSet::full(n) {
                out.push('*');
            } else {
                out.push('[');
                for value in candidates {
                    out.push(marks.of(value));
                }
                out.push(']');
            }
        }
        out.push('\n');
    }
    out
}

fn push_rule_line(out: &mut String, grid: Grid, major: bool, cell_width: u8) {
    let gap = if major { '-' } else { ' ' };
    out.push('+');
    out.push(gap);
    for col in 0..grid.size() {
        if col > 0 {
            out.push(gap);
            out.push('+');
            out.push(gap);
        }
        for sub in 0..cell_width {
            if sub > 0 {
                out.push(gap);
            }
            out.push('-');
        }
    }
    out.push(gap);
    out.push('+');
    out.push('\n');
}

/// Renders a bordered grid of solved values, with `?` for unsolved cells.
#[must_use]
pub fn render_values(puzzle: &Puzzle, marks: &Marks) -> String {
    let grid = puzzle.grid();
    let mut out = String::new();
    push_rule_line(&mut out, grid, true, 1);
    for row in 0..grid.size() {
        out.push('|');
        for col in 0..grid.size() {
            let mark = match puzzle.value_of(Cell::new(row, col)) {
                Some(value) => marks.of(value),
                None => '?',
            };
            let fence = if (col + 1) % grid.block_width() == 0 { '|' } else { ':' };
            let _ = write!(out, " {mark} {fence}");
        }
        out.push('\n');
        let major = (row + 1) % grid.block_height() == 0;
        push_rule_line(&mut out, grid, major, 1);
    }
    out
}

/// Renders a bordered pencil-mark grid: each cell is a `block_height` by
/// `block_width` sub-grid showing its remaining candidates, padded with `*`
/// for solved cells and spaces otherwise.
#[must_use]
pub fn render_candidates(puzzle: &Puzzle, marks: &Marks) -> String {
    let grid = puzzle.grid();
    let (bh, bw) = (grid.block_height(), grid.block_width());
    let mut out = String::new();
    push_rule_line(&mut out, grid, true, bw);
    for row in 0..grid.size() {
        for sub_row in 0..bh {
            out.push('|');
            for col in 0..grid.size() {
                let cell = Cell::new(row, col);
                let candidates = puzzle.candidates(cell);
                for sub_col in 0..bw {
                    let value = sub_row * bw + sub_col;
                    let mark = if candidates.contains(value) {
                        marks.of(value)
                    } else if candidates.len() == 1 {
                        '*'
                    } else {
                        ' '
                    };
                    let _ = write!(out, " {mark}");
                }
                let fence = if (col + 1) % bw == 0 { '|' } else { ':' };
                let _ = write!(out, " {fence}");
            }
            out.push('\n');
        }
        let major = (row + 1) % bh == 0;
        push_rule_line(&mut out, grid, major, bw);
    }
    out
}
