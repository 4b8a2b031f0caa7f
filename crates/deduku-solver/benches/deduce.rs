//! Benchmarks for the deduction fixpoint and the guessing search.

use criterion::{criterion_group, criterion_main, Criterion};
use deduku_core::{text, Grid, Marks, Puzzle};
use deduku_solver::{DiscardSteps, LevelLimit, Solver};

const MEDIUM: &str =
    "000000010400000000020000000000050407008000300001090000300400200050100000000806000";

fn parse_digits(digits: &str) -> Puzzle {
    let grid = Grid::new(3, 3).unwrap();
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
    text::parse_puzzle(grid, &Marks::default(), &text).unwrap()
}

fn bench_deduce(c: &mut Criterion) {
    let puzzle = parse_digits(MEDIUM);

    let mut group = c.benchmark_group("deduce");
    group.bench_function("singles", |b| {
        let mut solver = Solver::new();
        solver.max_naked_level = LevelLimit::Max(1);
        solver.max_hidden_level = LevelLimit::Max(1);
        solver.max_linked_level = LevelLimit::Disabled;
        b.iter(|| {
            let mut work = puzzle.clone();
            solver.deduce(&mut work, &mut DiscardSteps).unwrap();
            work
        });
    });
    group.bench_function("full", |b| {
        let solver = Solver::new();
        b.iter(|| {
            let mut work = puzzle.clone();
            solver.deduce(&mut work, &mut DiscardSteps).unwrap();
            work
        });
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let grid = Grid::new(2, 2).unwrap();
    let puzzle = Puzzle::new(grid);

    c.bench_function("search/empty-4x4", |b| {
        let mut solver = Solver::new();
        solver.max_solutions = 2;
        b.iter(|| solver.search(&puzzle, &mut DiscardSteps));
    });
}

criterion_group!(benches, bench_deduce, bench_search);
criterion_main!(benches);
