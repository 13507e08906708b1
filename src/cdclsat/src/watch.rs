//! The watched-literal index (component C).
//!
//! `watches[lit]` holds every clause whose watched literal is `!lit` —
//! exactly the clauses that must be revisited when `lit` becomes true,
//! since that is when the literal they actually watch, `!lit`, becomes
//! false. Clauses of length 1 are never installed here — a unit clause
//! is permanently satisfied the instant it is asserted, so it has no
//! future propagation work; `Solver` instead replays unit literals
//! directly on every restart (see `solver.rs`), which is how invariant W1
//! is realized for the length-1 case.

use crate::clause::ClauseId;
use crate::lit::Lit;

/// One watch entry: the clause being watched, plus a cached "blocker"
/// literal (the clause's other watched literal) so the hot path in
/// `propagate` can often skip touching the clause at all when the
/// blocker is already true.
#[derive(Clone, Copy, Debug)]
pub struct Watch {
    pub clause: ClauseId,
    pub blocker: Lit,
}

#[derive(Debug, Default)]
pub struct WatchIndex {
    lists: Vec<Vec<Watch>>,
}

impl WatchIndex {
    pub fn new() -> Self {
        WatchIndex { lists: Vec::new() }
    }

    fn ensure_len(&mut self, lit: Lit) {
        if self.lists.len() <= lit.index() {
            self.lists.resize(lit.index() + 1, Vec::new());
        }
    }

    /// Registers a fresh slot pair for a newly created variable so both
    /// of its literals have backing watch lists.
    pub fn init_var(&mut self, pos: Lit, neg: Lit) {
        self.ensure_len(pos);
        self.ensure_len(neg);
    }

    /// Installs the two watches for a clause of length >= 2: the clause
    /// is added to the watch lists of `!lits[0]` and `!lits[1]`, with
    /// each other's literal cached as the blocker.
    pub fn init_watches(&mut self, id: ClauseId, l0: Lit, l1: Lit) {
        self.watchers_of_mut(!l0).push(Watch { clause: id, blocker: l1 });
        self.watchers_of_mut(!l1).push(Watch { clause: id, blocker: l0 });
    }

    #[inline]
    pub fn watchers_of(&self, lit: Lit) -> &[Watch] {
        self.lists.get(lit.index()).map_or(&[], |v| v.as_slice())
    }

    #[inline]
    pub fn watchers_of_mut(&mut self, lit: Lit) -> &mut Vec<Watch> {
        self.ensure_len(lit);
        &mut self.lists[lit.index()]
    }

    /// Moves a watch for `id` from `from_lit`'s list to `to_lit`'s list,
    /// updating the cached blocker to `new_blocker`. Preconditions per the
    /// spec: `from_lit` currently watches `id`; `to_lit` does not yet.
    pub fn move_watch(&mut self, id: ClauseId, from_lit: Lit, to_lit: Lit, new_blocker: Lit) {
        let list = &mut self.lists[from_lit.index()];
        let pos = list
            .iter()
            .position(|w| w.clause == id)
            .expect("move_watch: from_lit does not watch this clause");
        list.swap_remove(pos);
        self.watchers_of_mut(to_lit).push(Watch { clause: id, blocker: new_blocker });
    }

    /// Takes `lit`'s watch list, leaving an empty one in its place.
    /// `propagate` uses this to scan a snapshot of the watchers for a
    /// newly-false literal while still being free to push onto other
    /// lists (including `lit`'s own, if a clause keeps watching it).
    pub fn take_list(&mut self, lit: Lit) -> Vec<Watch> {
        self.ensure_len(lit);
        std::mem::take(&mut self.lists[lit.index()])
    }

    /// Replaces `lit`'s watch list outright (the surviving watchers after
    /// a `propagate` scan of a `take_list` snapshot).
    pub fn set_list(&mut self, lit: Lit, list: Vec<Watch>) {
        self.ensure_len(lit);
        self.lists[lit.index()] = list;
    }
}
