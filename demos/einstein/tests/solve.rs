//! §8 scenario 5: the generated Einstein puzzle encoding has a unique
//! satisfying model, and solving it identifies "the German keeps the
//! fish". Also exercises the round-trip property: writing the generated
//! clauses out as DIMACS and re-parsing them must solve to the same
//! answer as solving the in-memory clause list directly.

use cdclsat::{Solver, SolveResult};
use einstein_puzzle::{generate, Category, LiteralTable};

fn german_keeps_fish(model: &cdclsat::Model) -> bool {
    let table = LiteralTable;
    let lit = table.lit(Category::Pet, 3, 4);
    model.lits().contains(&lit)
}

#[test]
fn solves_directly_to_the_known_unique_answer() {
    let (num_vars, clauses) = generate();
    let mut solver = Solver::new(num_vars);
    for c in &clauses {
        solver.add_clause(c);
    }
    match solver.solve() {
        SolveResult::Sat(model) => {
            assert!(german_keeps_fish(&model), "expected the German (house 3) to keep the fish");
        }
        SolveResult::Unsat => panic!("einstein puzzle encoding is UNSAT"),
    }
}

#[test]
fn round_trips_through_dimacs_text_to_the_same_answer() {
    let (num_vars, clauses) = generate();

    let mut buf = Vec::new();
    cdclsat_dimacs::write_dimacs(&mut buf, num_vars, &clauses).unwrap();

    let parsed = cdclsat_dimacs::parse(&buf[..]).expect("generated CNF must be valid DIMACS");
    let mut solver = parsed.into_solver();
    match solver.solve() {
        SolveResult::Sat(model) => {
            assert!(german_keeps_fish(&model), "expected the German (house 3) to keep the fish");
        }
        SolveResult::Unsat => panic!("re-parsed einstein puzzle encoding is UNSAT"),
    }
}
