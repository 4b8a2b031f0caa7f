//! Command-line driver for the deduku engine.
//!
//! Reads a puzzle from a file or stdin, runs the configured deduction rules
//! and (optionally) the guessing search, and prints the step transcript and
//! the outcome. Exits 0 on any completed run, even an unsolved one; only
//! invalid input (bad geometry, bad puzzle text, a contradictory set of
//! givens) exits non-zero.

use std::{
    fs,
    io::{self, Read as _},
    ops::ControlFlow,
    path::PathBuf,
    process::ExitCode,
};

use clap::{ArgAction, Parser, ValueEnum};
use deduku_core::{text, Grid, Marks, Puzzle};
use deduku_solver::{Evidence, LevelLimit, SolveReport, Solver, SolverError, SolvingStep, StepSink};

/// How much of the solving process is echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum MsgLevel {
    /// No messages.
    None,
    /// Only guess decisions.
    Guess,
    /// Guesses and deduction steps.
    Deduce,
    /// Every step followed by the board state.
    Board,
}

/// Deductive sudoku solver for arbitrary block geometry.
#[derive(Debug, Parser)]
#[command(name = "deduku", version, about, allow_negative_numbers = true)]
struct Args {
    /// A file containing the puzzle; stdin if omitted.
    puzzle_file: Option<PathBuf>,

    /// Columns per block; the board side is BLOCK_WIDTH * BLOCK_HEIGHT.
    #[arg(long, default_value_t = 3)]
    block_width: u8,

    /// Rows per block.
    #[arg(long, default_value_t = 3)]
    block_height: u8,

    /// Marks for the cell values, one character per value.
    #[arg(long)]
    marks: Option<String>,

    /// Master switch: false disables all deduce rules, after which the
    /// per-rule level arguments re-enable specific ones.
    #[arg(long, default_value_t = true, action = ArgAction::Set,
          num_args = 0..=1, default_missing_value = "true")]
    deduce: bool,

    /// Max level of the naked rule: -1 unlimited, 0 disabled.
    #[arg(long)]
    naked_deduce: Option<i32>,

    /// Max level of the hidden rule: -1 unlimited, 0 disabled.
    #[arg(long)]
    hidden_deduce: Option<i32>,

    /// Max level of the linked rule: -1 unlimited, 0 disabled.
    #[arg(long)]
    linked_deduce: Option<i32>,

    /// Restart from level 1 whenever a rule fires; fewer, cheaper steps.
    #[arg(long, default_value_t = true, action = ArgAction::Set,
          num_args = 0..=1, default_missing_value = "true")]
    lower_level_first: bool,

    /// Fall back to guessing when deduction stalls.
    #[arg(long, default_value_t = true, action = ArgAction::Set,
          num_args = 0..=1, default_missing_value = "true")]
    guess: bool,

    /// Stop guessing once this many solutions are found.
    #[arg(long, default_value_t = 2)]
    max_solutions: usize,

    /// Message level outside of guessing.
    #[arg(long, value_enum, default_value_t = MsgLevel::Deduce)]
    deduce_msg: MsgLevel,

    /// Message level inside guess branches.
    #[arg(long, value_enum, default_value_t = MsgLevel::Guess)]
    guess_msg: MsgLevel,

    /// Print boards with cell borders instead of the plain format.
    #[arg(long, default_value_t = true, action = ArgAction::Set,
          num_args = 0..=1, default_missing_value = "true")]
    better_print: bool,
}

impl Args {
    fn build_solver(&self) -> Solver {
        let mut solver = Solver::new();
        if !self.deduce {
            solver.disable_all_rules();
        }
        if let Some(level) = self.naked_deduce {
            solver.max_naked_level = LevelLimit::from_arg(level);
        }
        if let Some(level) = self.hidden_deduce {
            solver.max_hidden_level = LevelLimit::from_arg(level);
        }
        if let Some(level) = self.linked_deduce {
            solver.max_linked_level = LevelLimit::from_arg(level);
        }
        solver.lower_level_first = self.lower_level_first;
        solver.guess_enabled = self.guess;
        solver.max_solutions = self.max_solutions;
        solver
    }
}

/// Prints the step transcript, indented two spaces per guess level.
struct TranscriptPrinter {
    marks: Marks,
    deduce_msg: MsgLevel,
    guess_msg: MsgLevel,
    better_print: bool,
    depth: u16,
}

impl TranscriptPrinter {
    fn new(args: &Args, marks: Marks) -> Self {
        Self {
            marks,
            deduce_msg: args.deduce_msg,
            guess_msg: args.guess_msg,
            better_print: args.better_print,
            depth: 0,
        }
    }

    fn print_indented(&self, indent: u16, step: &SolvingStep) {
        let prefix = "  ".repeat(usize::from(indent));
        let rendered = step.display(&self.marks).to_string();
        for line in rendered.lines() {
            println!("{prefix}{line}");
        }
    }

    fn print_board(&self, puzzle: &Puzzle) {
        print!("{}", render_board(puzzle, &self.marks, self.better_print));
    }
}

impl StepSink for TranscriptPrinter {
    fn on_step(&mut self, puzzle: &Puzzle, step: &SolvingStep) -> ControlFlow<()> {
        let msg_level = if let Evidence::Guess { level, .. } = &step.evidence {
            // A guess step is announced at the depth of its parent branch.
            let indent = level - 1;
            self.depth = *level;
            if self.guess_msg >= MsgLevel::Guess {
                self.print_indented(indent, step);
            }
            self.guess_msg
        } else {
            let msg_level = if self.depth > 0 { self.guess_msg } else { self.deduce_msg };
            if msg_level >= MsgLevel::Deduce {
                self.print_indented(self.depth, step);
            }
            msg_level
        };
        if msg_level >= MsgLevel::Board {
            self.print_board(puzzle);
        }
        ControlFlow::Continue(())
    }
}

fn render_board(puzzle: &Puzzle, marks: &Marks, better_print: bool) -> String {
    if !better_print {
        text::format_puzzle(puzzle, marks)
    } else if puzzle.fulfilled() {
        text::render_values(puzzle, marks)
    } else {
        text::render_candidates(puzzle, marks)
    }
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn report_outcome(
    args: &Args,
    marks: &Marks,
    puzzle: &Puzzle,
    result: Result<SolveReport, SolverError>,
) {
    match result {
        Err(SolverError::Paradox(_)) => {
            println!("The puzzle has no solution.");
        }
        Ok(_) if puzzle.solved() => {
            println!("Solved by deduction:");
            print!("{}", render_board(puzzle, marks, args.better_print));
        }
        Ok(report) => match report.search {
            Some(search) if !search.solutions.is_empty() => {
                println!(
                    "Solved by guessing, found {} solution(s):",
                    search.solutions.len()
                );
                for solution in &search.solutions {
                    print!("{}", render_board(solution, marks, args.better_print));
                    println!();
                }
                if search.interrupted {
                    println!("There might be more solutions not found.");
                }
            }
            _ => println!("Not solved."),
        },
    }
}

fn run(args: &Args) -> Result<(), (String, u8)> {
    let grid = Grid::new(args.block_height, args.block_width)
        .map_err(|error| (error.to_string(), 2))?;
    let marks = args
        .marks
        .as_deref()
        .map_or_else(Marks::default, Marks::new);
    marks
        .require(grid.size())
        .map_err(|error| (error.to_string(), 2))?;

    let input = read_input(args.puzzle_file.as_ref())
        .map_err(|error| (format!("cannot read puzzle: {error}"), 2))?;
    let mut puzzle = text::parse_puzzle(grid, &marks, &input)
        .map_err(|error| (error.to_string(), 2))?;

    println!("The puzzle is:");
    print!("{}", render_board(&puzzle, &marks, args.better_print));

    if puzzle.paradoxical() {
        return Err(("the givens are already contradictory".into(), 2));
    }

    let solver = args.build_solver();
    let mut printer = TranscriptPrinter::new(args, marks.clone());
    let result = solver.solve(&mut puzzle, &mut printer);
    report_outcome(args, &marks, &puzzle, result);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err((message, code)) => {
            eprintln!("deduku: {message}");
            ExitCode::from(code)
        }
    }
}
