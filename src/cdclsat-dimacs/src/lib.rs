//! DIMACS CNF reader and writer for the `cdclsat` solver.
//!
//! The accepted dialect is intentionally a subset of full DIMACS: a single
//! `p cnf <vars> <clauses>` header followed by whitespace-separated
//! integers, each clause terminated by a literal `0`. Clauses may span
//! multiple lines; `c`-prefixed lines and blank lines are ignored.

use std::io;

use thiserror::Error;

use cdclsat::Lit;

/// Errors produced while parsing a DIMACS CNF document.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("I/O error reading DIMACS input: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedInput { line: usize, token: String },

    #[error("line {line}: literal index too large: {value}")]
    LiteralTooLarge { line: usize, value: u64 },

    #[error("line {line}: invalid header syntax: '{header}'")]
    InvalidHeader { line: usize, header: String },

    #[error("line {line}: unterminated clause")]
    UnterminatedClause { line: usize },

    #[error("formula uses variable {used} but the header declares only {declared}")]
    VarCount { declared: u32, used: u32 },

    #[error("formula has {actual} clauses but the header declares {declared}")]
    ClauseCount { declared: u32, actual: u32 },
}

/// A fully parsed CNF formula: a variable count and a clause list, ready
/// to be loaded into a `cdclsat::Solver` via [`ParsedCnf::into_clauses`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCnf {
    pub num_vars: u32,
    pub clauses: Vec<Vec<Lit>>,
}

impl ParsedCnf {
    /// Builds a `Solver` preloaded with every parsed clause.
    pub fn into_solver(self) -> cdclsat::Solver {
        let mut solver = cdclsat::Solver::new(self.num_vars);
        for clause in &self.clauses {
            solver.add_clause(clause);
        }
        solver
    }
}

/// Parses a whole DIMACS CNF document from `input`.
pub fn parse(mut input: impl io::Read) -> Result<ParsedCnf, ParserError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    let mut header: Option<(u32, u32)> = None;
    let mut clauses: Vec<Vec<Lit>> = Vec::new();
    let mut partial: Vec<Lit> = Vec::new();
    let mut max_var_used: u32 = 0;
    let mut last_line = 0usize;

    for (line_no, raw_line) in text.lines().enumerate().map(|(i, l)| (i + 1, l)) {
        last_line = line_no;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        if trimmed.starts_with('p') {
            header = Some(parse_header_line(line_no, trimmed)?);
            continue;
        }
        if header.is_none() {
            return Err(ParserError::InvalidHeader { line: line_no, header: trimmed.to_string() });
        }
        for tok in trimmed.split_whitespace() {
            let n: i64 = tok.parse().map_err(|_| ParserError::UnexpectedInput {
                line: line_no,
                token: tok.to_string(),
            })?;
            if n == 0 {
                clauses.push(std::mem::take(&mut partial));
            } else {
                let v = n.unsigned_abs() as u64;
                if v > (u32::MAX / 2) as u64 {
                    return Err(ParserError::LiteralTooLarge { line: line_no, value: v });
                }
                max_var_used = max_var_used.max(v as u32);
                partial.push(Lit::from_dimacs(n));
            }
        }
    }

    if !partial.is_empty() {
        return Err(ParserError::UnterminatedClause { line: last_line });
    }

    let (declared_vars, declared_clauses) = header.ok_or(ParserError::InvalidHeader {
        line: last_line,
        header: String::new(),
    })?;

    if max_var_used > declared_vars {
        return Err(ParserError::VarCount { declared: declared_vars, used: max_var_used });
    }
    if clauses.len() as u32 != declared_clauses {
        return Err(ParserError::ClauseCount {
            declared: declared_clauses,
            actual: clauses.len() as u32,
        });
    }

    log::debug!("parsed {} variables, {} clauses", declared_vars, clauses.len());
    Ok(ParsedCnf { num_vars: declared_vars, clauses })
}

fn parse_header_line(line_no: usize, trimmed: &str) -> Result<(u32, u32), ParserError> {
    let bad_header = || ParserError::InvalidHeader { line: line_no, header: trimmed.to_string() };

    let mut parts = trimmed.split_whitespace();
    if parts.next() != Some("p") {
        return Err(bad_header());
    }
    if parts.next() != Some("cnf") {
        return Err(bad_header());
    }
    let num_vars: u32 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(bad_header)?;
    let num_clauses: u32 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(bad_header)?;
    if parts.next().is_some() {
        return Err(bad_header());
    }
    Ok((num_vars, num_clauses))
}

/// Writes `clauses` (and a matching header) as DIMACS CNF.
pub fn write_dimacs(mut target: impl io::Write, num_vars: u32, clauses: &[Vec<Lit>]) -> io::Result<()> {
    writeln!(target, "p cnf {} {}", num_vars, clauses.len())?;
    for clause in clauses {
        for lit in clause {
            write!(target, "{} ", lit.to_dimacs())?;
        }
        writeln!(target, "0")?;
    }
    Ok(())
}

/// Writes a model as the plain space-separated assignment line described
/// in §6: every declared variable in order, no leading `v`, no trailing
/// `0`. Writes the literal string `UNSAT` instead when there is no model.
pub fn write_result(mut target: impl io::Write, result: &cdclsat::SolveResult) -> io::Result<()> {
    match result {
        cdclsat::SolveResult::Sat(model) => writeln!(target, "{}", model),
        cdclsat::SolveResult::Unsat => writeln!(target, "UNSAT"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimacs_lits(nums: &[i64]) -> Vec<Lit> {
        nums.iter().map(|&n| Lit::from_dimacs(n)).collect()
    }

    #[test]
    fn parses_a_small_formula() {
        let input = "c a comment\np cnf 3 2\n1 -2 0\n2 3 0\n";
        let parsed = parse(input.as_bytes()).unwrap();
        assert_eq!(parsed.num_vars, 3);
        assert_eq!(parsed.clauses, vec![dimacs_lits(&[1, -2]), dimacs_lits(&[2, 3])]);
    }

    #[test]
    fn clause_may_span_multiple_lines() {
        let input = "p cnf 2 1\n1\n-2 0\n";
        let parsed = parse(input.as_bytes()).unwrap();
        assert_eq!(parsed.clauses, vec![dimacs_lits(&[1, -2])]);
    }

    #[test]
    fn rejects_missing_header() {
        let input = "1 2 0\n";
        match parse(input.as_bytes()) {
            Err(ParserError::InvalidHeader { .. }) => {}
            other => panic!("expected InvalidHeader, got {:?}", other),
        }
    }

    #[test]
    fn rejects_var_count_mismatch() {
        let input = "p cnf 1 1\n1 2 0\n";
        match parse(input.as_bytes()) {
            Err(ParserError::VarCount { declared: 1, used: 2 }) => {}
            other => panic!("expected VarCount mismatch, got {:?}", other),
        }
    }

    #[test]
    fn rejects_clause_count_mismatch() {
        let input = "p cnf 2 2\n1 2 0\n";
        match parse(input.as_bytes()) {
            Err(ParserError::ClauseCount { declared: 2, actual: 1 }) => {}
            other => panic!("expected ClauseCount mismatch, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unterminated_clause() {
        let input = "p cnf 2 1\n1 2\n";
        match parse(input.as_bytes()) {
            Err(ParserError::UnterminatedClause { .. }) => {}
            other => panic!("expected UnterminatedClause, got {:?}", other),
        }
    }

    #[test]
    fn write_then_parse_round_trips() {
        let clauses = vec![dimacs_lits(&[1, -2, 3]), dimacs_lits(&[-1])];
        let mut buf = Vec::new();
        write_dimacs(&mut buf, 3, &clauses).unwrap();
        let parsed = parse(&buf[..]).unwrap();
        assert_eq!(parsed.num_vars, 3);
        assert_eq!(parsed.clauses, clauses);
    }

    #[test]
    fn round_trips_through_a_temp_file() {
        use std::io::{Seek, SeekFrom};
        let clauses = vec![dimacs_lits(&[1, 2]), dimacs_lits(&[-1, -2])];
        let mut file = tempfile::tempfile().unwrap();
        write_dimacs(&mut file, 2, &clauses).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let parsed = parse(file).unwrap();
        assert_eq!(parsed.clauses, clauses);
    }
}
