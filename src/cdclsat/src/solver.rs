//! The search driver (component H) and the public solver API, tying
//! together the assignment store (A), clause store (B), watched-literal
//! index (C), implication graph (D), decision heap (E), propagator (F),
//! and conflict analyzer (G).

use std::collections::HashSet;
use std::fmt;

use smallvec::SmallVec;

use crate::clause::{self, ClauseDb, ClauseId};
use crate::graph::ImplicationGraph;
use crate::heap::DecisionHeap;
use crate::lit::{LBool, Lit, Var};
use crate::watch::{Watch, WatchIndex};

/// A satisfying assignment: one literal per declared variable, in order
/// `1..=N`, each the positive or negative literal depending on its truth
/// value. Displays as the space-separated DIMACS-style line from §6.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model(Vec<Lit>);

impl Model {
    pub fn lits(&self) -> &[Lit] {
        &self.0
    }

    /// Whether `clause` is satisfied by this model.
    pub fn satisfies(&self, clause_lits: &[Lit]) -> bool {
        clause_lits.iter().any(|l| self.0.contains(l))
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for lit in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{}", lit.to_dimacs())?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveResult {
    Sat(Model),
    Unsat,
}

/// Running counters, reported by the CLI much like the teacher's
/// `print_stats`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    pub restarts: u64,
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
}

pub struct Solver {
    num_vars: u32,

    // A: literal / assignment store.
    assigns: Vec<LBool>,

    // B: clause store.
    clauses: ClauseDb,

    // C: watched-literal index.
    watches: WatchIndex,

    // D: implication graph.
    graph: ImplicationGraph,

    // E: decision heap with activity bumping.
    heap: DecisionHeap,

    // Assignment trail; also doubles as the propagation queue via `qhead`,
    // matching the teacher's observation that a separate queue is
    // unnecessary once assignments are recorded in order.
    trail: Vec<Lit>,
    trail_lim: Vec<u32>,
    qhead: usize,

    // Literals from every length-1 clause seen so far (original or
    // learnt), replayed on every restart since length-1 clauses are not
    // watched (see `watch.rs`).
    unit_lits: Vec<Lit>,

    /// `false` once an empty clause has been added; solving then reports
    /// `UNSAT` without doing any search.
    ok: bool,

    stats: Stats,
}

impl Solver {
    /// Creates a solver for variables `1..=num_vars`.
    pub fn new(num_vars: u32) -> Self {
        let mut s = Solver {
            num_vars,
            assigns: vec![LBool::Unset; num_vars as usize],
            clauses: ClauseDb::new(),
            watches: WatchIndex::new(),
            graph: ImplicationGraph::new(),
            heap: DecisionHeap::new(),
            trail: Vec::new(),
            trail_lim: Vec::new(),
            qhead: 0,
            unit_lits: Vec::new(),
            ok: true,
            stats: Stats::default(),
        };
        for idx in 0..num_vars {
            let v = Var::from_index(idx);
            s.watches.init_var(v.pos_lit(), v.neg_lit());
            s.graph.init_var(v);
            s.heap.init_var(v);
        }
        s
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Adds an original clause. Duplicate literals are removed; a clause
    /// that becomes empty marks the solver permanently unsatisfiable
    /// (§7). Tautological clauses are kept (§3/§6 baseline).
    pub fn add_clause(&mut self, raw: &[Lit]) {
        let mut lits: SmallVec<[Lit; 4]> = raw.iter().copied().collect();
        clause::dedup_lits(&mut lits);
        if lits.is_empty() {
            self.ok = false;
        }
        self.install_clause(lits, false);
    }

    fn install_clause(&mut self, lits: SmallVec<[Lit; 4]>, learnt: bool) -> ClauseId {
        let len = lits.len();
        let l0 = lits.get(0).copied();
        let l1 = lits.get(1).copied();
        let id = self.clauses.add(lits, learnt);
        if len == 1 {
            self.unit_lits.push(l0.unwrap());
        } else if len >= 2 {
            self.watches.init_watches(id, l0.unwrap(), l1.unwrap());
        }
        id
    }

    #[inline]
    fn value(&self, lit: Lit) -> LBool {
        self.assigns[lit.var().index() as usize].xor_sign(lit.sign())
    }

    #[inline]
    fn assign_true(&mut self, lit: Lit) {
        self.assigns[lit.var().index() as usize] = LBool::True.xor_sign(lit.sign());
    }

    #[inline]
    fn decision_level(&self) -> u32 {
        self.trail_lim.len() as u32
    }

    /// Runs the CDCL loop to completion: `restart(); loop { propagate ...
    /// }` from §4.H.
    pub fn solve(&mut self) -> SolveResult {
        if !self.ok {
            return SolveResult::Unsat;
        }
        if self.restart() {
            return SolveResult::Unsat;
        }
        loop {
            match self.propagate() {
                Some(witness) => {
                    if self.decision_level() == 0 {
                        return SolveResult::Unsat;
                    }
                    self.analyze(witness);
                    if self.restart() {
                        return SolveResult::Unsat;
                    }
                }
                None => {
                    if self.trail.len() as u32 == self.num_vars {
                        return SolveResult::Sat(self.build_model());
                    }
                    self.decide();
                }
            }
        }
    }

    fn build_model(&self) -> Model {
        let mut lits = Vec::with_capacity(self.num_vars as usize);
        for idx in 0..self.num_vars {
            let v = Var::from_index(idx);
            let lit = match self.assigns[idx as usize] {
                LBool::True => v.pos_lit(),
                LBool::False => v.neg_lit(),
                LBool::Unset => unreachable!("model requested with unassigned variable"),
            };
            lits.push(lit);
        }
        Model(lits)
    }

    /// Clears assignments, the implication graph, and the decision stack;
    /// rebuilds the decision heap over every variable; then replays every
    /// known unit literal. Returns `true` if two unit literals contradict
    /// each other (an immediate level-0 conflict, i.e. `UNSAT`).
    fn restart(&mut self) -> bool {
        crate::sat_trace!("restart #{}", self.stats.restarts + 1);
        for a in self.assigns.iter_mut() {
            *a = LBool::Unset;
        }
        self.graph.clear();
        self.trail.clear();
        self.trail_lim.clear();
        self.qhead = 0;
        self.stats.restarts += 1;

        self.heap.rebuild((0..self.num_vars).map(Var::from_index));

        for i in 0..self.unit_lits.len() {
            let lit = self.unit_lits[i];
            match self.value(lit) {
                LBool::True => continue,
                LBool::False => return true,
                LBool::Unset => {
                    self.graph.record(lit, 0, SmallVec::new());
                    self.assign_true(lit);
                    self.trail.push(lit);
                }
            }
        }
        false
    }

    fn decide(&mut self) {
        let v = self.pop_unassigned_var();
        self.stats.decisions += 1;
        self.trail_lim.push(self.trail.len() as u32);
        let lit = v.pos_lit();
        self.graph.record(lit, self.decision_level(), SmallVec::new());
        self.assign_true(lit);
        self.trail.push(lit);
    }

    fn pop_unassigned_var(&mut self) -> Var {
        loop {
            match self.heap.pop_max() {
                Some(v) => {
                    if self.assigns[v.index() as usize] == LBool::Unset {
                        return v;
                    }
                }
                None => panic!(
                    "decide() invoked with no unassigned variable left (invariant violation)"
                ),
            }
        }
    }

    /// Unit propagation to fixpoint (§4.F). Returns the literal `ℓ` whose
    /// assertion triggered a clause to become fully falsified, or `None`
    /// once the queue drains cleanly.
    fn propagate(&mut self) -> Option<Lit> {
        let mut conflict = None;
        'outer: while self.qhead < self.trail.len() {
            let p = self.trail[self.qhead];
            self.qhead += 1;
            self.stats.propagations += 1;
            let neg_p = !p;

            let old_watches = self.watches.take_list(p);
            let mut new_watches = Vec::with_capacity(old_watches.len());
            let mut idx = 0;
            while idx < old_watches.len() {
                let w = old_watches[idx];
                idx += 1;

                if self.value(w.blocker) == LBool::True {
                    new_watches.push(w);
                    continue;
                }

                let clause_len = self.clauses.get(w.clause).len();
                {
                    let c = self.clauses.get_mut(w.clause);
                    if c[0] == neg_p {
                        c.swap(0, 1);
                    }
                }
                debug_assert_eq!(self.clauses.get(w.clause)[1], neg_p);
                let first = self.clauses.get(w.clause)[0];

                if self.value(first) == LBool::True {
                    new_watches.push(Watch { clause: w.clause, blocker: first });
                    continue;
                }

                let mut replacement = None;
                for k in 2..clause_len {
                    let lk = self.clauses.get(w.clause)[k];
                    if self.value(lk) != LBool::False {
                        replacement = Some(k);
                        break;
                    }
                }

                if let Some(k) = replacement {
                    let new_watch_lit = {
                        let c = self.clauses.get_mut(w.clause);
                        c.swap(1, k);
                        c[1]
                    };
                    self.watches
                        .watchers_of_mut(!new_watch_lit)
                        .push(Watch { clause: w.clause, blocker: first });
                } else {
                    new_watches.push(Watch { clause: w.clause, blocker: first });
                    match self.value(first) {
                        LBool::False => {
                            let mut antecedents: SmallVec<[Lit; 4]> = SmallVec::new();
                            for &lit in self.clauses.get(w.clause).lits() {
                                if lit != neg_p {
                                    antecedents.push(!lit);
                                }
                            }
                            self.graph.record(neg_p, self.decision_level(), antecedents);
                            new_watches.extend_from_slice(&old_watches[idx..]);
                            conflict = Some(p);
                            self.watches.set_list(p, new_watches);
                            self.qhead = self.trail.len();
                            break 'outer;
                        }
                        LBool::Unset => {
                            self.enqueue_forced(first, w.clause);
                        }
                        LBool::True => unreachable!(),
                    }
                }
            }
            self.watches.set_list(p, new_watches);
        }
        conflict
    }

    fn enqueue_forced(&mut self, lit: Lit, from: ClauseId) {
        if self.graph.contains(lit) {
            return;
        }
        let mut antecedents: SmallVec<[Lit; 4]> = SmallVec::new();
        for &l in self.clauses.get(from).lits() {
            if l != lit {
                antecedents.push(!l);
            }
        }
        self.graph.record(lit, self.decision_level(), antecedents);
        self.assign_true(lit);
        self.trail.push(lit);
    }

    /// Conflict analysis producing a 1-UIP learnt clause (§4.G), using the
    /// fractional-weight dominator computation: weight flows backward
    /// from a root literal through its current-level antecedents, split
    /// evenly among them; a literal with final weight exactly 1 lies on
    /// every path from the decision to that root, i.e. it dominates it.
    /// Processing literals in reverse recording order guarantees a
    /// literal's weight is final by the time it is inspected (every
    /// contributor to it was recorded, and hence processed, earlier in
    /// the reverse scan), which avoids recursion and repeat visits to
    /// shared ancestors.
    fn analyze(&mut self, witness: Lit) {
        let current_level = self.decision_level();
        debug_assert!(current_level > 0);
        let neg_witness = !witness;

        let c1 = self.dominators(witness, current_level);
        let c2 = self.dominators(neg_witness, current_level);
        let mut uip_candidates: HashSet<Lit> = c1.intersection(&c2).copied().collect();
        uip_candidates.remove(&witness);
        uip_candidates.remove(&neg_witness);

        let fuip = self.find_fuip(witness, &uip_candidates, current_level);

        let mut new_clause: SmallVec<[Lit; 4]> = SmallVec::new();
        let mut added: HashSet<Lit> = HashSet::new();
        new_clause.push(!fuip);
        added.insert(!fuip);

        let mut visited: HashSet<Lit> = HashSet::new();
        self.find_cut(witness, fuip, current_level, &mut visited, &mut added, &mut new_clause);
        self.find_cut(neg_witness, fuip, current_level, &mut visited, &mut added, &mut new_clause);

        for &lit in &new_clause {
            self.heap.bump(lit.var());
        }
        self.heap.decay();

        crate::sat_debug!("conflict #{}: learnt clause of size {}", self.stats.conflicts + 1, new_clause.len());
        self.install_clause(new_clause, true);
        self.stats.conflicts += 1;
    }

    /// Returns the set of literals whose fractional weight, as distributed
    /// from `root`, is exactly 1 (the dominators of `root` within the
    /// current-level sub-DAG).
    fn dominators(&self, root: Lit, current_level: u32) -> HashSet<Lit> {
        const EPS: f64 = 1e-9;
        let recorded = self.graph.recorded();
        let start_pos = recorded
            .iter()
            .rposition(|&l| l == root)
            .expect("analyze: root literal was not recorded in the implication graph");

        let mut weight: std::collections::HashMap<Lit, f64> = std::collections::HashMap::new();
        weight.insert(root, 1.0);

        let mut result = HashSet::new();
        for &x in recorded[..=start_pos].iter().rev() {
            let w = match weight.get(&x) {
                Some(&w) => w,
                None => continue,
            };
            if (w - 1.0).abs() < EPS {
                result.insert(x);
            }
            let ants_at_level: Vec<Lit> = self
                .graph
                .antecedents_of(x)
                .iter()
                .copied()
                .filter(|&a| self.graph.contains(a) && self.graph.level_of(a) == current_level)
                .collect();
            if !ants_at_level.is_empty() {
                let share = w / ants_at_level.len() as f64;
                for a in ants_at_level {
                    *weight.entry(a).or_insert(0.0) += share;
                }
            }
        }
        result
    }

    /// Walks backward from `start` through current-level antecedents until
    /// a UIP candidate is reached; any deterministic choice of successor
    /// is correct per §4.G, so the first current-level antecedent in
    /// iteration order is used.
    fn find_fuip(&self, start: Lit, uip_candidates: &HashSet<Lit>, current_level: u32) -> Lit {
        let mut cur = start;
        loop {
            if uip_candidates.contains(&cur) {
                return cur;
            }
            let next = self
                .graph
                .antecedents_of(cur)
                .iter()
                .copied()
                .find(|&a| self.graph.contains(a) && self.graph.level_of(a) == current_level);
            match next {
                Some(a) => cur = a,
                None => panic!("1-UIP search exhausted without finding a dominator candidate"),
            }
        }
    }

    /// Iterative version of the spec's `find_cut(x)`: stops and emits
    /// `!x` for any literal from a strictly earlier level, stops silently
    /// at `fuip`, and otherwise recurses into every antecedent.
    fn find_cut(
        &self,
        start: Lit,
        fuip: Lit,
        current_level: u32,
        visited: &mut HashSet<Lit>,
        added: &mut HashSet<Lit>,
        out: &mut SmallVec<[Lit; 4]>,
    ) {
        let mut stack = vec![start];
        while let Some(x) = stack.pop() {
            if !visited.insert(x) {
                continue;
            }
            let level = self.graph.level_of(x);
            if level < current_level {
                if added.insert(!x) {
                    out.push(!x);
                }
                continue;
            }
            if x == fuip {
                continue;
            }
            for &a in self.graph.antecedents_of(x) {
                stack.push(a);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Var;

    fn lits(nums: &[i64]) -> Vec<Lit> {
        nums.iter().map(|&n| Lit::from_dimacs(n)).collect()
    }

    fn model_dimacs(m: &Model) -> Vec<i64> {
        m.lits().iter().map(|l| l.to_dimacs()).collect()
    }

    #[test]
    fn trivial_sat() {
        let mut s = Solver::new(1);
        s.add_clause(&lits(&[1]));
        match s.solve() {
            SolveResult::Sat(m) => assert_eq!(model_dimacs(&m), vec![1]),
            SolveResult::Unsat => panic!("expected SAT"),
        }
    }

    #[test]
    fn trivial_unsat() {
        let mut s = Solver::new(1);
        s.add_clause(&lits(&[1]));
        s.add_clause(&lits(&[-1]));
        assert_eq!(s.solve(), SolveResult::Unsat);
    }

    #[test]
    fn forcing_chain() {
        let mut s = Solver::new(3);
        s.add_clause(&lits(&[1]));
        s.add_clause(&lits(&[-1, 2]));
        s.add_clause(&lits(&[-2, 3]));
        match s.solve() {
            SolveResult::Sat(m) => assert_eq!(model_dimacs(&m), vec![1, 2, 3]),
            SolveResult::Unsat => panic!("expected SAT"),
        }
    }

    #[test]
    fn pigeonhole_two_into_one() {
        let mut s = Solver::new(2);
        s.add_clause(&lits(&[1, 2]));
        s.add_clause(&lits(&[-1, -2]));
        s.add_clause(&lits(&[-1, 2]));
        s.add_clause(&lits(&[1, -2]));
        assert_eq!(s.solve(), SolveResult::Unsat);
    }

    #[test]
    fn empty_clause_is_immediately_unsat() {
        let mut s = Solver::new(1);
        s.add_clause(&[]);
        assert_eq!(s.solve(), SolveResult::Unsat);
    }

    #[test]
    fn soundness_holds_on_small_random_instances() {
        // A fixed, small 3-SAT instance with a known model; asserts the
        // returned assignment (if any) satisfies every clause.
        let clauses: &[&[i64]] = &[
            &[1, 2, -3],
            &[-1, 3],
            &[2, 3],
            &[-2, -3, 1],
            &[1, -2],
        ];
        let mut s = Solver::new(3);
        for c in clauses {
            s.add_clause(&lits(c));
        }
        if let SolveResult::Sat(m) = s.solve() {
            for c in clauses {
                let cl = lits(c);
                assert!(m.satisfies(&cl), "model violates clause {:?}", c);
            }
        }
    }

    #[test]
    fn learnt_unit_clause_resolves_via_restart_replay() {
        // Forces a conflict whose 1-UIP clause is a unit clause at level 0.
        let mut s = Solver::new(2);
        s.add_clause(&lits(&[1, 2]));
        s.add_clause(&lits(&[1, -2]));
        s.add_clause(&lits(&[-1, 2]));
        s.add_clause(&lits(&[-1, -2]));
        assert_eq!(s.solve(), SolveResult::Unsat);
    }

    /// §8 scenario 6: random 3-SAT instances near the 4.25 clause-to-variable
    /// phase transition. No reference solver is available in-crate (that
    /// comparison is the external test harness the spec places out of
    /// scope), so this checks the property an independent oracle would
    /// otherwise confirm: every model the solver returns must satisfy every
    /// input clause.
    #[test]
    fn random_3sat_fuzz_soundness() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        const NUM_VARS: i64 = 20;
        const RATIO: f64 = 4.25;
        let num_clauses = (NUM_VARS as f64 * RATIO) as usize;

        for seed in 0..100u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut clauses: Vec<Vec<i64>> = Vec::with_capacity(num_clauses);
            for _ in 0..num_clauses {
                let mut c: Vec<i64> = Vec::with_capacity(3);
                while c.len() < 3 {
                    let v = rng.gen_range(1, NUM_VARS + 1);
                    let lit = if rng.gen_bool(0.5) { v } else { -v };
                    if !c.contains(&lit) && !c.contains(&-lit) {
                        c.push(lit);
                    }
                }
                clauses.push(c);
            }

            let mut s = Solver::new(NUM_VARS as u32);
            for c in &clauses {
                s.add_clause(&lits(c));
            }
            if let SolveResult::Sat(m) = s.solve() {
                for c in &clauses {
                    let cl = lits(c);
                    assert!(m.satisfies(&cl), "seed {}: model violates clause {:?}", seed, c);
                }
            }
        }
    }
}
