//! End-to-end scenarios from the solver's testable-properties section,
//! driven entirely through DIMACS text and the public `cdclsat`/
//! `cdclsat-dimacs` API rather than the solver's internal types.

use cdclsat::SolveResult;

fn solve_dimacs(src: &str) -> SolveResult {
    let parsed = cdclsat_dimacs::parse(src.as_bytes()).expect("valid DIMACS");
    let mut solver = parsed.into_solver();
    solver.solve()
}

fn model_dimacs(result: &SolveResult) -> Option<Vec<i64>> {
    match result {
        SolveResult::Sat(m) => Some(m.lits().iter().map(|l| l.to_dimacs()).collect()),
        SolveResult::Unsat => None,
    }
}

#[test]
fn trivial_sat() {
    let result = solve_dimacs("p cnf 1 1\n1 0\n");
    assert_eq!(model_dimacs(&result), Some(vec![1]));
}

#[test]
fn trivial_unsat() {
    let result = solve_dimacs("p cnf 1 2\n1 0\n-1 0\n");
    assert_eq!(result, SolveResult::Unsat);
}

#[test]
fn forcing_chain() {
    let result = solve_dimacs("p cnf 3 3\n1 0\n-1 2 0\n-2 3 0\n");
    assert_eq!(model_dimacs(&result), Some(vec![1, 2, 3]));
}

#[test]
fn pigeonhole_two_into_one() {
    let result = solve_dimacs("p cnf 2 4\n1 2 0\n-1 -2 0\n-1 2 0\n1 -2 0\n");
    assert_eq!(result, SolveResult::Unsat);
}

/// Re-parsing the solver's own DIMACS output and solving it again must
/// agree with the first result (the round-trip property in §8).
#[test]
fn output_round_trips_through_the_parser() {
    let src = "p cnf 3 3\nc a comment line\n1 0\n-1 2 0\n-2 3 0\n";
    let first = solve_dimacs(src);
    let mut buf = Vec::new();
    cdclsat_dimacs::write_result(&mut buf, &first).unwrap();
    let rendered = String::from_utf8(buf).unwrap();

    match &first {
        SolveResult::Sat(_) => {
            assert_ne!(rendered.trim(), "UNSAT");
            let parsed: Vec<i64> = rendered
                .split_whitespace()
                .map(|t| t.parse().unwrap())
                .collect();
            assert_eq!(parsed, model_dimacs(&first).unwrap());
        }
        SolveResult::Unsat => assert_eq!(rendered.trim(), "UNSAT"),
    }
}

/// A formula with an explicit empty clause is `UNSAT` regardless of its
/// other clauses (§7: "Empty clause in input" is an immediate `UNSAT`).
#[test]
fn empty_clause_forces_unsat() {
    let result = solve_dimacs("p cnf 2 2\n1 2 0\n0\n");
    assert_eq!(result, SolveResult::Unsat);
}
