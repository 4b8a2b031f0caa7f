//! Step delivery: the visitor side of the solving-step stream.
//!
//! The engine suspends at every step it produces and hands it to a
//! [`StepSink`] together with the puzzle state at that moment. Returning
//! [`ControlFlow::Break`] cancels the run cleanly at that suspension point;
//! the engine unwinds, releasing any clones on the search stack, and reports
//! the outcome as interrupted.

use std::ops::ControlFlow;

use deduku_core::Puzzle;

use crate::SolvingStep;

/// Consumer of solving steps.
pub trait StepSink {
    /// Receives one step and the puzzle it was applied to.
    fn on_step(&mut self, puzzle: &Puzzle, step: &SolvingStep) -> ControlFlow<()>;
}

impl<F> StepSink for F
where
    F: FnMut(&Puzzle, &SolvingStep) -> ControlFlow<()>,
{
    fn on_step(&mut self, puzzle: &Puzzle, step: &SolvingStep) -> ControlFlow<()> {
        self(puzzle, step)
    }
}

/// A sink that drops every step.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSteps;

impl StepSink for DiscardSteps {
    fn on_step(&mut self, _puzzle: &Puzzle, _step: &SolvingStep) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// A sink that keeps every step, mainly for tests and replay.
#[derive(Debug, Default, Clone)]
pub struct CollectedSteps {
    steps: Vec<SolvingStep>,
}

impl CollectedSteps {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected steps, in emission order.
    #[must_use]
    pub fn steps(&self) -> &[SolvingStep] {
        &self.steps
    }

    /// Consumes the collector, returning the steps.
    #[must_use]
    pub fn into_steps(self) -> Vec<SolvingStep> {
        self.steps
    }
}

impl StepSink for CollectedSteps {
    fn on_step(&mut self, _puzzle: &Puzzle, step: &SolvingStep) -> ControlFlow<()> {
        self.steps.push(step.clone());
        ControlFlow::Continue(())
    }
}
