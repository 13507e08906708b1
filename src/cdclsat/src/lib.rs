//! A from-scratch CDCL SAT solver core: DIMACS-numbered boolean
//! variables in, a satisfying model or `UNSAT` out.
//!
//! The crate is organized the way the algorithm is described: a literal /
//! assignment store ([`lit`]), an append-only clause store ([`clause`]),
//! a watched-literal index ([`watch`]), an implication graph for conflict
//! analysis ([`graph`]), a VSIDS-style decision heap ([`heap`]), and the
//! [`solver::Solver`] that drives propagation, conflict analysis, and
//! decisions into a full search loop.
//!
//! This crate deliberately has no clause-database reduction / garbage
//! collection: the clause store is a plain append-only `Vec`, not a
//! relocatable arena. See `DESIGN.md` for the reasoning.

pub mod clause;
pub mod graph;
pub mod heap;
pub mod lit;
pub mod watch;

mod solver;

pub use clause::ClauseId;
pub use lit::{LBool, Lit, Var};
pub use solver::{Model, SolveResult, Solver, Stats};

/// No-op unless built with `--features logging`, in which case it forwards
/// to [`log::debug!`]. Kept as a local macro (rather than depending on
/// `log` unconditionally) since `log` itself is an optional dependency.
#[cfg(feature = "logging")]
#[macro_export]
macro_rules! sat_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! sat_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! sat_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! sat_trace {
    ($($arg:tt)*) => {};
}
