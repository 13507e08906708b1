//! Command-line driver: reads a DIMACS CNF file (plain or gzip-compressed),
//! runs the solver, and writes the result to stdout or to a given output
//! path. Mirrors the teacher's `batsat-bin` shape: a small argument struct
//! built with `clap`'s builder API, `flate2` for transparent gzip input,
//! and `cpu-time` for the `--verbose` statistics block.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;
use std::process;

use clap::{App, Arg};
use cpu_time::ProcessTime;
use flate2::read::GzDecoder;

use cdclsat::SolveResult;

struct Args {
    input: String,
    output: Option<String>,
    verbose: bool,
}

fn parse_args() -> Args {
    let matches = App::new("cdclsat")
        .version("0.1.0")
        .about("A CDCL SAT solver for DIMACS CNF input")
        .arg(
            Arg::with_name("input")
                .help("Path to a DIMACS CNF file (.gz accepted)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Path to write the result to (default: stdout)")
                .index(2),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .help("Print a statistics block to stderr"),
        )
        .get_matches();

    Args {
        input: matches.value_of("input").unwrap().to_string(),
        output: matches.value_of("output").map(str::to_string),
        verbose: matches.is_present("verbose"),
    }
}

fn open_input(path: &str) -> io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if path.ends_with(".gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args();

    #[cfg(feature = "logging")]
    {
        if args.verbose {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
                .init();
        }
    }

    let reader = open_input(&args.input)?;
    let parsed = cdclsat_dimacs::parse(reader)?;

    let mut solver = parsed.into_solver();
    let start = ProcessTime::now();
    let result = solver.solve();
    let elapsed = start.elapsed();
    let stats = solver.stats();

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(Path::new(path))?),
        None => Box::new(io::stdout()),
    };
    cdclsat_dimacs::write_result(&mut out, &result)?;

    if args.verbose {
        eprintln!("restarts:      {}", stats.restarts);
        eprintln!("decisions:     {}", stats.decisions);
        eprintln!("propagations:  {}", stats.propagations);
        eprintln!("conflicts:     {}", stats.conflicts);
        eprintln!("CPU time:      {:.3}s", elapsed.as_secs_f64());
        match &result {
            SolveResult::Sat(_) => eprintln!("result:        SATISFIABLE"),
            SolveResult::Unsat => eprintln!("result:        UNSATISFIABLE"),
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("cdclsat: {}", err);
        process::exit(1);
    }
}
