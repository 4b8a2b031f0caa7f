//! End-to-end scenarios for the deduction rules and the guessing search.

use std::ops::ControlFlow;

use deduku_core::{text, Cell, Grid, Marks, Puzzle};
use deduku_solver::{
    testing::DeduceTester, CollectedSteps, DiscardSteps, Evidence, LevelLimit, Rule, Solver,
};

/// Solvable with sole candidates alone.
const EASY: &str =
    "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
const EASY_SOLUTION: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

/// Solvable with naked and hidden singles.
const MEDIUM: &str =
    "000000010400000000020000000000050407008000300001090000300400200050100000000806000";

/// Needs guessing on top of subset deduction; famously has a unique solution.
const HARD: &str =
    "800000000003600000070090200050007000000045700000100030001000068008500010090000400";
const HARD_SOLUTION: &str =
    "812753649943682175675491283154237896369845721287169534521974368438526917796318452";

fn classic_grid() -> Grid {
    Grid::new(3, 3).unwrap()
}

/// Parses an 81-digit puzzle string, `0` meaning unknown.
fn parse_digits(digits: &str) -> Puzzle {
    assert_eq!(digits.len(), 81);
    let text: String = digits
        .as_bytes()
        .chunks(9)
        .map(|row| {
            let line: String = row
                .iter()
                .map(|&b| if b == b'0' { '*' } else { b as char })
                .collect();
            line + "\n"
        })
        .collect();
    text::parse_puzzle(classic_grid(), &Marks::default(), &text).unwrap()
}

/// Renders a solved puzzle back into an 81-digit string.
fn solved_digits(puzzle: &Puzzle) -> String {
    let marks = Marks::default();
    puzzle
        .grid()
        .cells()
        .map(|cell| marks.of(puzzle.value_of(cell).expect("cell solved")))
        .collect()
}

fn solver_with(naked: LevelLimit, hidden: LevelLimit, linked: LevelLimit) -> Solver {
    let mut solver = Solver::new();
    solver.max_naked_level = naked;
    solver.max_hidden_level = hidden;
    solver.max_linked_level = linked;
    solver
}

#[test]
fn naked_singles_alone_solve_the_easy_puzzle() {
    let solver = solver_with(
        LevelLimit::Max(1),
        LevelLimit::Disabled,
        LevelLimit::Disabled,
    );
    let mut puzzle = parse_digits(EASY);
    let outcome = solver.deduce(&mut puzzle, &mut DiscardSteps).unwrap();
    assert!(outcome.fulfilled);
    assert!(puzzle.solved());
    assert_eq!(solved_digits(&puzzle), EASY_SOLUTION);
    assert!(outcome.stats.steps(Rule::Naked) > 0);
    assert_eq!(outcome.stats.steps(Rule::Hidden), 0);
}

#[test]
fn singles_solve_the_medium_puzzle() {
    let solver = solver_with(
        LevelLimit::Max(1),
        LevelLimit::Max(1),
        LevelLimit::Disabled,
    );
    let mut puzzle = parse_digits(MEDIUM);
    let outcome = solver.deduce(&mut puzzle, &mut DiscardSteps).unwrap();
    assert!(outcome.fulfilled);
    assert!(puzzle.solved());
}

#[test]
fn stronger_configurations_also_solve_the_medium_puzzle() {
    let configs = [
        solver_with(
            LevelLimit::Unlimited,
            LevelLimit::Unlimited,
            LevelLimit::Unlimited,
        ),
        solver_with(LevelLimit::Max(3), LevelLimit::Max(2), LevelLimit::Max(2)),
        {
            let mut solver = solver_with(
                LevelLimit::Max(1),
                LevelLimit::Max(1),
                LevelLimit::Disabled,
            );
            solver.lower_level_first = false;
            solver
        },
    ];
    for solver in configs {
        let mut puzzle = parse_digits(MEDIUM);
        solver.deduce(&mut puzzle, &mut DiscardSteps).unwrap();
        assert!(puzzle.solved(), "config {solver:?} failed");
    }
}

#[test]
fn deduction_reaches_a_fixpoint() {
    let solver = Solver::new();
    let mut puzzle = parse_digits(MEDIUM);
    solver.deduce(&mut puzzle, &mut DiscardSteps).unwrap();

    let mut sink = CollectedSteps::new();
    let again = solver.deduce(&mut puzzle, &mut sink).unwrap();
    assert_eq!(again.stats.total_steps(), 0);
    assert!(sink.steps().is_empty());
}

#[test]
fn deduction_is_deterministic() {
    let solver = solver_with(
        LevelLimit::Unlimited,
        LevelLimit::Unlimited,
        LevelLimit::Unlimited,
    );
    let marks = Marks::default();
    let transcript = |steps: &CollectedSteps| -> String {
        steps
            .steps()
            .iter()
            .map(|step| step.display(&marks).to_string() + "\n")
            .collect()
    };

    let mut first = parse_digits(MEDIUM);
    let mut first_steps = CollectedSteps::new();
    solver.deduce(&mut first, &mut first_steps).unwrap();

    let mut second = parse_digits(MEDIUM);
    let mut second_steps = CollectedSteps::new();
    solver.deduce(&mut second, &mut second_steps).unwrap();

    assert_eq!(first, second);
    assert!(!first_steps.steps().is_empty());
    assert_eq!(transcript(&first_steps), transcript(&second_steps));
}

#[test]
fn deduction_never_reintroduces_candidates() {
    // Every mutation must be an elimination that actually happened: the
    // removed values are gone from the puzzle state delivered with the step.
    let solver = Solver::new();
    let mut puzzle = parse_digits(EASY);
    let mut checked = 0usize;
    let mut sink = |state: &Puzzle, step: &deduku_solver::SolvingStep| {
        for variation in &step.mutations {
            assert!(!variation.removed.is_empty());
            assert!(!state
                .candidates(variation.cell)
                .contains_any(variation.removed));
            checked += 1;
        }
        ControlFlow::Continue(())
    };
    solver.deduce(&mut puzzle, &mut sink).unwrap();
    assert!(checked > 0);
}

#[test]
fn cancelling_the_sink_interrupts_deduction() {
    let solver = Solver::new();
    let mut puzzle = parse_digits(EASY);
    let mut seen = 0usize;
    let mut sink = |_: &Puzzle, _: &deduku_solver::SolvingStep| {
        seen += 1;
        ControlFlow::Break(())
    };
    let outcome = solver.deduce(&mut puzzle, &mut sink).unwrap();
    assert!(outcome.interrupted);
    assert!(!outcome.fulfilled);
    assert_eq!(seen, 1);
}

#[test]
fn naked_pair_locks_its_row_and_block() {
    let solver = solver_with(
        LevelLimit::Max(2),
        LevelLimit::Disabled,
        LevelLimit::Disabled,
    );
    DeduceTester::classic()
        .restrict((0, 0), &[0, 1])
        .restrict((0, 1), &[0, 1])
        .deduce_with(&solver)
        .assert_no_paradox()
        .assert_rule_steps(Rule::Naked, 1)
        .assert_candidates((0, 0), &[0, 1])
        .assert_candidates((0, 1), &[0, 1])
        .assert_missing((0, 5), &[0, 1])
        .assert_missing((1, 2), &[0, 1])
        .assert_keeps((1, 3), &[0, 1]);
}

#[test]
fn hidden_single_claims_its_block_interaction() {
    // Values 1 and 2 of row 1 fit only in the first two cells, which share
    // a block: the block loses both values elsewhere, then the hidden pair
    // strips the two cells down to those values.
    let mut tester = DeduceTester::classic();
    for col in 2..9 {
        tester = tester.remove((0, col), &[0, 1]);
    }
    let solver = solver_with(
        LevelLimit::Disabled,
        LevelLimit::Max(2),
        LevelLimit::Disabled,
    );
    tester
        .deduce_with(&solver)
        .assert_no_paradox()
        .assert_rule_steps(Rule::Hidden, 3)
        .assert_candidates((0, 0), &[0, 1])
        .assert_candidates((0, 1), &[0, 1])
        .assert_missing((1, 0), &[0, 1])
        .assert_missing((2, 2), &[0, 1])
        .assert_keeps((1, 3), &[0, 1])
        .assert_keeps((4, 4), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn linked_pair_is_the_x_wing() {
    // Value 1 appears in rows 2 and 5 only at columns 3 and 7.
    let mut tester = DeduceTester::classic();
    for row in [1, 4] {
        for col in [0, 1, 3, 4, 5, 7, 8] {
            tester = tester.remove((row, col), &[0]);
        }
    }
    let solver = solver_with(
        LevelLimit::Disabled,
        LevelLimit::Disabled,
        LevelLimit::Max(2),
    );
    let tester = tester
        .deduce_with(&solver)
        .assert_no_paradox()
        .assert_rule_steps(Rule::Linked, 1)
        .assert_missing((0, 2), &[0])
        .assert_missing((8, 6), &[0])
        .assert_keeps((1, 2), &[0])
        .assert_keeps((4, 6), &[0])
        .assert_keeps((0, 0), &[0]);
    match &tester.steps()[0].evidence {
        Evidence::Linked { level, value, .. } => {
            assert_eq!(*level, 2);
            assert_eq!(*value, 0);
        }
        other => panic!("expected linked evidence, got {other:?}"),
    }
}

#[test]
fn linked_triple_is_the_swordfish() {
    // Value 1 confined to columns {2, 5, 8} across rows 1, 4 and 7, two
    // columns per row.
    let keep = [(0u8, [1u8, 4u8]), (3, [4, 7]), (6, [1, 7])];
    let mut tester = DeduceTester::classic();
    for (row, cols) in keep {
        for col in 0..9 {
            if !cols.contains(&col) {
                tester = tester.remove((row, col), &[0]);
            }
        }
    }
    let solver = solver_with(
        LevelLimit::Disabled,
        LevelLimit::Disabled,
        LevelLimit::Max(3),
    );
    let tester = tester
        .deduce_with(&solver)
        .assert_no_paradox()
        .assert_rule_steps(Rule::Linked, 1)
        .assert_missing((1, 1), &[0])
        .assert_missing((2, 4), &[0])
        .assert_missing((8, 7), &[0])
        .assert_keeps((0, 1), &[0])
        .assert_keeps((3, 4), &[0])
        .assert_keeps((1, 0), &[0]);
    assert_eq!(tester.steps()[0].evidence.level(), 3);
}

#[test]
fn three_cells_on_two_values_is_a_paradox() {
    let solver = solver_with(
        LevelLimit::Max(3),
        LevelLimit::Disabled,
        LevelLimit::Disabled,
    );
    DeduceTester::classic()
        .restrict((0, 0), &[0, 1])
        .restrict((0, 1), &[0, 1])
        .restrict((0, 2), &[0, 1])
        .deduce_with(&solver)
        .assert_paradox(Rule::Naked);
}

#[test]
fn a_value_with_no_place_is_a_paradox() {
    let mut tester = DeduceTester::classic();
    for col in 0..9 {
        tester = tester.remove((4, col), &[6]);
    }
    let solver = solver_with(
        LevelLimit::Disabled,
        LevelLimit::Max(1),
        LevelLimit::Disabled,
    );
    tester.deduce_with(&solver).assert_paradox(Rule::Hidden);
}

#[test]
fn duplicate_givens_are_a_paradox() {
    let solver = solver_with(
        LevelLimit::Max(1),
        LevelLimit::Disabled,
        LevelLimit::Disabled,
    );
    DeduceTester::classic()
        .restrict((0, 0), &[4])
        .restrict((0, 8), &[4])
        .deduce_with(&solver)
        .assert_paradox(Rule::Naked);
}

#[test]
fn transcript_of_a_sole_candidate() {
    let solver = solver_with(
        LevelLimit::Max(1),
        LevelLimit::Disabled,
        LevelLimit::Disabled,
    );
    let tester = DeduceTester::classic()
        .restrict((0, 0), &[3])
        .deduce_with(&solver)
        .assert_no_paradox();
    let transcript = tester.transcript();
    let mut lines = transcript.lines();
    assert_eq!(
        lines.next(),
        Some("[naked@1] row 1: cells [r1c1] hold only values [\"4\"]")
    );
    // 8 row peers, 8 column peers, 4 remaining block peers.
    assert_eq!(transcript.matches("=> cell ").count(), 20);
    assert!(transcript.contains("=> cell r2c2 remove \"4\""));
}

#[test]
fn search_enumerates_two_solutions_of_an_empty_grid() {
    let grid = Grid::new(2, 2).unwrap();
    let puzzle = Puzzle::new(grid);
    let solver = Solver::new();

    let mut sink = CollectedSteps::new();
    let outcome = solver.search(&puzzle, &mut sink);

    assert_eq!(outcome.solutions.len(), 2);
    assert!(outcome.interrupted);
    for solution in &outcome.solutions {
        assert!(solution.solved());
    }
    assert_ne!(outcome.solutions[0], outcome.solutions[1]);

    // The original puzzle is untouched by the search.
    assert_eq!(puzzle, Puzzle::new(grid));

    // The step stream is a pre-order walk of the guess tree: it opens with a
    // first-level guess and descends at least one level further.
    let levels: Vec<u16> = sink
        .steps()
        .iter()
        .filter_map(|step| match &step.evidence {
            Evidence::Guess { level, .. } => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(levels.first(), Some(&1));
    assert!(levels.iter().any(|&level| level >= 2));
}

#[test]
fn search_respects_the_solution_quota() {
    let grid = Grid::new(2, 2).unwrap();
    let puzzle = Puzzle::new(grid);
    let mut solver = Solver::new();
    solver.max_solutions = 5;

    let outcome = solver.search(&puzzle, &mut DiscardSteps);
    assert_eq!(outcome.solutions.len(), 5);
    assert!(outcome.interrupted);
}

#[test]
fn guessing_finds_the_unique_solution_of_the_hard_puzzle() {
    let mut solver = solver_with(
        LevelLimit::Max(3),
        LevelLimit::Max(3),
        LevelLimit::Disabled,
    );
    solver.max_solutions = 2;

    let mut puzzle = parse_digits(HARD);
    let report = solver.solve(&mut puzzle, &mut DiscardSteps).unwrap();

    assert!(!report.deduction.fulfilled, "deduction alone should stall");
    let search = report.search.expect("search should run");
    assert_eq!(search.solutions.len(), 1);
    assert!(!search.interrupted, "the guess tree should be exhausted");
    assert_eq!(solved_digits(&search.solutions[0]), HARD_SOLUTION);
    assert!(search.stats.steps(Rule::Guess) > 0);
}

#[test]
fn search_leaves_the_deduced_puzzle_intact() {
    let solver = solver_with(
        LevelLimit::Max(2),
        LevelLimit::Max(2),
        LevelLimit::Disabled,
    );
    let mut puzzle = parse_digits(HARD);
    solver.deduce(&mut puzzle, &mut DiscardSteps).unwrap();
    let snapshot = puzzle.clone();

    let outcome = solver.search(&puzzle, &mut DiscardSteps);
    assert!(!outcome.solutions.is_empty());
    assert_eq!(puzzle, snapshot);
}

#[test]
fn sole_candidates_solve_a_2x3_board() {
    let text = "12345*\n45*123\n2345*1\n5*1234\n345*12\n*12345\n";
    let solver = solver_with(
        LevelLimit::Max(1),
        LevelLimit::Disabled,
        LevelLimit::Disabled,
    );
    DeduceTester::from_text(2, 3, text)
        .deduce_with(&solver)
        .assert_no_paradox()
        .assert_solved()
        .assert_solved_cell((0, 5), 5)
        .assert_solved_cell((5, 0), 5);
}

#[test]
fn sole_candidates_solve_a_3x4_board() {
    let text = "123456789AB*\n\
                56789AB*1234\n\
                9AB*12345678\n\
                23456789AB*1\n\
                6789AB*12345\n\
                AB*123456789\n\
                3456789AB*12\n\
                789AB*123456\n\
                B*123456789A\n\
                456789AB*123\n\
                89AB*1234567\n\
                *123456789AB\n";
    let solver = solver_with(
        LevelLimit::Max(1),
        LevelLimit::Disabled,
        LevelLimit::Disabled,
    );
    DeduceTester::from_text(3, 4, text)
        .deduce_with(&solver)
        .assert_no_paradox()
        .assert_solved()
        .assert_solved_cell((0, 11), 11)
        .assert_solved_cell((11, 0), 11);
}

#[test]
fn non_square_text_round_trips() {
    let grid = Grid::new(3, 4).unwrap();
    let marks = Marks::default();
    let mut puzzle = Puzzle::new(grid);
    puzzle.assign(Cell::new(0, 0), 11);
    puzzle.assign(Cell::new(7, 3), 9);
    let text = text::format_puzzle(&puzzle, &marks);
    let reparsed = text::parse_puzzle(grid, &marks, &text).unwrap();
    assert_eq!(reparsed, puzzle);
}
