//! Solver errors and the internal unwind signals.

use crate::Evidence;

/// Errors surfaced by the solving entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    /// A rule proved the current puzzle inconsistent. The payload is the
    /// evidence of the impossible inference.
    #[error("a {rule}@{level} inference proved the puzzle inconsistent", rule = .0.rule(), level = .0.level())]
    Paradox(Evidence),
}

/// Non-local exits threaded through the rule routines with `?`.
///
/// `Paradox` aborts a deduction, `Fulfilled` short-circuits a round once
/// every cell is solved, and `Stopped` unwinds the search after the solution
/// quota is reached or the sink cancels. None of these escape the crate:
/// the public entry points translate them.
#[derive(Debug)]
pub(crate) enum Interrupt {
    Paradox(Evidence),
    Fulfilled,
    Stopped,
}

pub(crate) type Flow<T> = Result<T, Interrupt>;
