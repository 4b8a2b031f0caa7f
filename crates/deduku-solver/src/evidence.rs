//! Why a deduction fired: the evidence taxonomy and solving steps.
//!
//! Every inference the engine makes is described by an [`Evidence`] value
//! carrying the rule's level and the data needed to replay it. A
//! [`SolvingStep`] bundles the evidence with the exact candidate
//! eliminations it caused; paradox steps carry the evidence of the
//! impossible inference and no mutations.

use std::fmt;

use deduku_core::{Cell, House, HouseKind, Marks, Value, ValueSet, Variation};

/// The stable rule vocabulary, as it appears in transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Cells whose combined candidates are exactly as many as the cells.
    Naked,
    /// Values confined to as many cells as there are values.
    Hidden,
    /// A value confined to `k` parallel lines meeting `k` orthogonal lines.
    Linked,
    /// A searched assumption.
    Guess,
}

impl Rule {
    /// The deduction rules, excluding [`Rule::Guess`].
    pub const DEDUCTIONS: [Self; 3] = [Self::Naked, Self::Hidden, Self::Linked];
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Naked => "naked",
            Self::Hidden => "hidden",
            Self::Linked => "linked",
            Self::Guess => "guess",
        };
        f.write_str(name)
    }
}

/// The particulars of one inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    /// In `house`, the `level` cells of `cells` hold only `values`.
    Naked {
        /// Size of the cell subset.
        level: u8,
        /// The house the subset was found in.
        house: House,
        /// The chosen cells.
        cells: Vec<Cell>,
        /// The union of their candidates.
        values: ValueSet,
    },
    /// In `house`, the `level` values of `values` appear only in `cells`.
    Hidden {
        /// Size of the value subset.
        level: u8,
        /// The house the subset was found in.
        house: House,
        /// The chosen values.
        values: ValueSet,
        /// The cells they appear in.
        cells: Vec<Cell>,
    },
    /// `value` is confined to the lines `indices` of kind `kind`, meeting
    /// exactly the orthogonal lines `orth_indices`.
    Linked {
        /// Number of parallel lines.
        level: u8,
        /// The value being traced.
        value: Value,
        /// The orientation of the chosen lines.
        kind: HouseKind,
        /// Indices of the chosen lines.
        indices: ValueSet,
        /// Indices of the orthogonal lines the value meets.
        orth_indices: ValueSet,
    },
    /// `cell` was assumed to be `chosen` out of `candidates`.
    Guess {
        /// Nesting depth of the guess, from 1.
        level: u16,
        /// The cell guessed on.
        cell: Cell,
        /// Its candidates before the guess.
        candidates: ValueSet,
        /// The assumed value.
        chosen: Value,
    },
}

impl Evidence {
    /// The rule family that produced this evidence.
    #[must_use]
    pub fn rule(&self) -> Rule {
        match self {
            Self::Naked { .. } => Rule::Naked,
            Self::Hidden { .. } => Rule::Hidden,
            Self::Linked { .. } => Rule::Linked,
            Self::Guess { .. } => Rule::Guess,
        }
    }

    /// The level the rule fired at; for guesses, the nesting depth.
    #[must_use]
    pub fn level(&self) -> u16 {
        match self {
            Self::Naked { level, .. } | Self::Hidden { level, .. } | Self::Linked { level, .. } => {
                u16::from(*level)
            }
            Self::Guess { level, .. } => *level,
        }
    }
}

/// One entry of the solving transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvingStep {
    /// Why the step happened.
    pub evidence: Evidence,
    /// Whether the inference proved the state impossible.
    pub paradox: bool,
    /// The candidate eliminations; empty for paradox steps.
    pub mutations: Vec<Variation>,
}

impl SolvingStep {
    /// A successful inference with its eliminations.
    #[must_use]
    pub fn deduced(evidence: Evidence, mutations: Vec<Variation>) -> Self {
        Self {
            evidence,
            paradox: false,
            mutations,
        }
    }

    /// An inference that produced an impossible state.
    #[must_use]
    pub fn paradox(evidence: Evidence) -> Self {
        Self {
            evidence,
            paradox: true,
            mutations: Vec::new(),
        }
    }

    /// Renders the step as transcript text using the given mark table.
    #[must_use]
    pub fn display<'a>(&'a self, marks: &'a Marks) -> StepDisplay<'a> {
        StepDisplay { step: self, marks }
    }
}

/// Transcript rendering of a [`SolvingStep`].
///
/// The format is `[rule@level]` followed by the evidence particulars, then
/// one `=> cell rXcY remove …` line per mutation. Paradox steps are prefixed
/// with `[paradox]` and have no mutation lines.
pub struct StepDisplay<'a> {
    step: &'a SolvingStep,
    marks: &'a Marks,
}

impl StepDisplay<'_> {
    fn write_values(&self, f: &mut fmt::Formatter<'_>, values: ValueSet) -> fmt::Result {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "\"{}\"", self.marks.of(value))?;
        }
        Ok(())
    }
}

fn write_cells(f: &mut fmt::Formatter<'_>, cells: &[Cell]) -> fmt::Result {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{cell}")?;
    }
    Ok(())
}

fn write_indices(f: &mut fmt::Formatter<'_>, indices: ValueSet) -> fmt::Result {
    for (i, index) in indices.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", index + 1)?;
    }
    Ok(())
}

impl fmt::Display for StepDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step.paradox {
            f.write_str("[paradox] ")?;
        }
        let evidence = &self.step.evidence;
        write!(f, "[{}@{}] ", evidence.rule(), evidence.level())?;
        match evidence {
            Evidence::Naked {
                house,
                cells,
                values,
                ..
            } => {
                write!(f, "{house}: cells [")?;
                write_cells(f, cells)?;
                f.write_str("] hold only values [")?;
                self.write_values(f, *values)?;
                f.write_str("]")?;
            }
            Evidence::Hidden {
                house,
                values,
                cells,
                ..
            } => {
                write!(f, "{house}: values [")?;
                self.write_values(f, *values)?;
                f.write_str("] confined to cells [")?;
                write_cells(f, cells)?;
                f.write_str("]")?;
            }
            Evidence::Linked {
                value,
                kind,
                indices,
                orth_indices,
                ..
            } => {
                write!(f, "value \"{}\" in {kind}s [", self.marks.of(*value))?;
                write_indices(f, *indices)?;
                write!(f, "] confined to {}s [", kind.orthogonal())?;
                write_indices(f, *orth_indices)?;
                f.write_str("]")?;
            }
            Evidence::Guess {
                cell,
                candidates,
                chosen,
                ..
            } => {
                write!(f, "cell {cell}: assume \"{}\" of [", self.marks.of(*chosen))?;
                self.write_values(f, *candidates)?;
                f.write_str("]")?;
            }
        }
        for variation in &self.step.mutations {
            write!(f, "\n=> cell {} remove ", variation.cell)?;
            self.write_values(f, variation.removed)?;
        }
        Ok(())
    }
}
