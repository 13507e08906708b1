//! The implication graph (component D).
//!
//! Keyed by *literal*, not variable: two parallel dense arrays indexed by
//! `lit.index()`. This is needed because conflict analysis (see
//! `solver.rs`) must, at the moment a clause is found falsified, record a
//! node for the *false* literal that the propagating literal's negation
//! represents — a transient bookkeeping entry that coexists with the
//! ordinary node already recorded for the true literal of the same
//! variable. A variable-keyed table could not hold both at once.
//!
//! `level_of`/`antecedents_of` are only meaningful while `contains` holds
//! (invariant G1, with the one deliberate exception noted above).
//! `clear()` is O(trail length), not O(2 * num_vars): it only resets the
//! literals that were actually recorded, tracked via `recorded`.

use smallvec::SmallVec;

use crate::lit::{Lit, Var};

#[derive(Clone, Default)]
struct Node {
    present: bool,
    level: u32,
    antecedents: SmallVec<[Lit; 4]>,
}

#[derive(Default)]
pub struct ImplicationGraph {
    nodes: Vec<Node>,
    recorded: Vec<Lit>,
}

impl ImplicationGraph {
    pub fn new() -> Self {
        ImplicationGraph { nodes: Vec::new(), recorded: Vec::new() }
    }

    pub fn init_var(&mut self, v: Var) {
        let needed = (v.index() as usize + 1) * 2;
        if self.nodes.len() < needed {
            self.nodes.resize(needed, Node::default());
        }
    }

    /// Records `lit` at `level`, forced by the given antecedents (empty
    /// for a decision literal, or for a unit clause's literal). The
    /// caller is responsible for the corresponding assignment-store
    /// update; this call site is the only place that touches the graph.
    pub fn record(&mut self, lit: Lit, level: u32, antecedents: SmallVec<[Lit; 4]>) {
        debug_assert!(!self.nodes[lit.index()].present, "literal recorded twice");
        self.nodes[lit.index()] = Node { present: true, level, antecedents };
        self.recorded.push(lit);
    }

    #[inline]
    pub fn contains(&self, lit: Lit) -> bool {
        self.nodes.get(lit.index()).map_or(false, |n| n.present)
    }

    #[inline]
    pub fn level_of(&self, lit: Lit) -> u32 {
        debug_assert!(self.contains(lit));
        self.nodes[lit.index()].level
    }

    #[inline]
    pub fn antecedents_of(&self, lit: Lit) -> &[Lit] {
        debug_assert!(self.contains(lit));
        &self.nodes[lit.index()].antecedents
    }

    /// Literals in the order they were recorded (decisions and forced
    /// literals in trail order, plus — transiently, until the next
    /// `clear()` — the pseudo-node for a conflict's falsified watched
    /// literal, recorded last).
    pub fn recorded(&self) -> &[Lit] {
        &self.recorded
    }

    pub fn clear(&mut self) {
        for lit in self.recorded.drain(..) {
            self.nodes[lit.index()] = Node::default();
        }
    }
}
