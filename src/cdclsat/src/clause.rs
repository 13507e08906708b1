//! The clause store (component B): an append-only, indexed sequence of
//! clauses. Original clauses occupy the prefix; learnt clauses are
//! appended at the tail. Indices (`ClauseId`) are stable for the whole
//! search — nothing here is ever relocated or freed, since clause-database
//! reduction is out of scope (see `DESIGN.md`).

use smallvec::SmallVec;

use crate::lit::Lit;

/// Stable index into the clause store.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ClauseId(u32);

impl ClauseId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A clause: a set of distinct literals. By convention the first (and,
/// for clauses of length >= 2, second) literal are the two *watched*
/// positions (invariant W1); `Solver::propagate` keeps this true by
/// swapping literals into place rather than tracking watched positions
/// separately.
#[derive(Clone, Debug)]
pub struct Clause {
    lits: SmallVec<[Lit; 4]>,
    learnt: bool,
}

impl Clause {
    fn new(lits: SmallVec<[Lit; 4]>, learnt: bool) -> Self {
        Clause { lits, learnt }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    #[inline]
    pub fn learnt(&self) -> bool {
        self.learnt
    }

    #[inline]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.lits.swap(i, j);
    }
}

impl std::ops::Index<usize> for Clause {
    type Output = Lit;
    #[inline]
    fn index(&self, i: usize) -> &Lit {
        &self.lits[i]
    }
}

/// Removes duplicate literals from a clause in place, and reports whether
/// the clause is tautological (contains both `l` and `!l`). Tautological
/// clauses are kept per the spec's baseline (they are trivially satisfied).
pub fn dedup_lits(lits: &mut SmallVec<[Lit; 4]>) -> bool {
    lits.sort_by_key(|l| l.index());
    lits.dedup();
    lits.windows(2).any(|w| w[0] == !w[1])
}

/// Append-only clause store.
#[derive(Debug, Default)]
pub struct ClauseDb {
    clauses: Vec<Clause>,
}

impl ClauseDb {
    pub fn new() -> Self {
        ClauseDb { clauses: Vec::new() }
    }

    /// Adds a clause (already deduplicated) to the store and returns its id.
    /// The caller is responsible for registering watches afterwards (C).
    pub fn add(&mut self, lits: SmallVec<[Lit; 4]>, learnt: bool) -> ClauseId {
        let id = ClauseId(self.clauses.len() as u32);
        self.clauses.push(Clause::new(lits, learnt));
        id
    }

    #[inline]
    pub fn get(&self, id: ClauseId) -> &Clause {
        &self.clauses[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ClauseId) -> &mut Clause {
        &mut self.clauses[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClauseId, &Clause)> {
        self.clauses
            .iter()
            .enumerate()
            .map(|(i, c)| (ClauseId(i as u32), c))
    }
}
