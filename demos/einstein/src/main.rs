//! CLI wrapper around [`einstein_puzzle::generate`]: writes the puzzle's
//! DIMACS CNF encoding to a given path, or to stdout if none is given.

use std::env;
use std::fs::File;
use std::io::{self, Write};

fn write_cnf(w: &mut impl Write, num_vars: u32, clauses: &[Vec<cdclsat::Lit>]) -> io::Result<()> {
    cdclsat_dimacs::write_dimacs(w, num_vars, clauses)
}

fn main() {
    let (num_vars, clauses) = einstein_puzzle::generate();

    let output_path = env::args().nth(1);
    let result = match output_path {
        Some(path) => write_cnf(&mut File::create(&path).expect("failed to create output file"), num_vars, &clauses),
        None => write_cnf(&mut io::stdout(), num_vars, &clauses),
    };
    result.expect("failed to write CNF output");
}
