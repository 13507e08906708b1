//! The decision heap with VSIDS-style activity bumping (component E).
//!
//! A binary max-heap over variables, keyed by a parallel `activity` array,
//! with a position index so `bump` can sift an already-heaped variable in
//! place. Per the spec this index is allowed to go stale and be rebuilt
//! "on the fly": rather than incrementally reinserting every variable a
//! restart unassigns, `Solver::restart` simply calls `rebuild`, which is
//! cheap relative to the O(n) work a full restart already does.

use crate::lit::Var;

/// `inc` is multiplied by this after every learnt clause (`1 / 0.95`).
pub const BUMP_FACTOR: f64 = 1.0 / 0.95;
const RESCALE_THRESHOLD: f64 = 1e100;
const RESCALE_FACTOR: f64 = 1e-100;

#[derive(Default)]
pub struct DecisionHeap {
    heap: Vec<Var>,
    pos: Vec<i32>,
    activity: Vec<f64>,
    inc: f64,
}

impl DecisionHeap {
    pub fn new() -> Self {
        DecisionHeap { heap: Vec::new(), pos: Vec::new(), activity: Vec::new(), inc: 1.0 }
    }

    pub fn init_var(&mut self, v: Var) {
        let idx = v.index() as usize;
        if self.activity.len() <= idx {
            self.activity.resize(idx + 1, 0.0);
            self.pos.resize(idx + 1, -1);
        }
    }

    #[inline]
    pub fn activity_of(&self, v: Var) -> f64 {
        self.activity[v.index() as usize]
    }

    /// Adds the current bump increment to `v`'s activity, rescaling every
    /// activity (and `inc` itself) if the threshold is exceeded, then
    /// restores heap order around `v` if it is currently heaped.
    pub fn bump(&mut self, v: Var) {
        let idx = v.index() as usize;
        self.activity[idx] += self.inc;
        if self.activity[idx] > RESCALE_THRESHOLD {
            for a in self.activity.iter_mut() {
                *a *= RESCALE_FACTOR;
            }
            self.inc *= RESCALE_FACTOR;
        }
        if self.in_heap(v) {
            let p = self.pos[idx] as usize;
            self.sift_up(p);
        }
    }

    /// Called once per learnt clause to grow the increment geometrically.
    pub fn decay(&mut self) {
        self.inc *= BUMP_FACTOR;
    }

    #[inline]
    pub fn in_heap(&self, v: Var) -> bool {
        self.pos.get(v.index() as usize).map_or(false, |&p| p >= 0)
    }

    /// Rebuilds the heap to contain exactly `vars`, in arbitrary initial
    /// order, then heapifies by current activity.
    pub fn rebuild(&mut self, vars: impl Iterator<Item = Var>) {
        for p in self.pos.iter_mut() {
            *p = -1;
        }
        self.heap.clear();
        for v in vars {
            self.heap.push(v);
        }
        for (i, v) in self.heap.iter().enumerate() {
            self.pos[v.index() as usize] = i as i32;
        }
        if !self.heap.is_empty() {
            for i in (0..=(self.heap.len() - 1) / 2).rev() {
                self.sift_down(i);
            }
        }
    }

    /// Removes and returns the current maximum-activity variable, or
    /// `None` if the heap is empty.
    pub fn pop_max(&mut self) -> Option<Var> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap[0];
        self.pos[top.index() as usize] = -1;
        let last = self.heap.pop().unwrap();
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.pos[last.index() as usize] = 0;
            self.sift_down(0);
        }
        Some(top)
    }

    #[inline]
    fn higher_priority(&self, a: Var, b: Var) -> bool {
        self.activity[a.index() as usize] > self.activity[b.index() as usize]
    }

    fn sift_up(&mut self, mut i: usize) {
        let v = self.heap[i];
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.higher_priority(v, self.heap[parent]) {
                self.heap[i] = self.heap[parent];
                self.pos[self.heap[i].index() as usize] = i as i32;
                i = parent;
            } else {
                break;
            }
        }
        self.heap[i] = v;
        self.pos[v.index() as usize] = i as i32;
    }

    fn sift_down(&mut self, mut i: usize) {
        let v = self.heap[i];
        let len = self.heap.len();
        loop {
            let l = 2 * i + 1;
            let r = 2 * i + 2;
            let mut best = i;
            if l < len && self.higher_priority(self.heap[l], v) {
                best = l;
            }
            if r < len && self.higher_priority(self.heap[r], self.heap[best]) {
                best = r;
            }
            if best == i {
                break;
            }
            self.heap[i] = self.heap[best];
            self.pos[self.heap[i].index() as usize] = i as i32;
            i = best;
        }
        self.heap[i] = v;
        self.pos[v.index() as usize] = i as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_activity_order() {
        let mut h = DecisionHeap::new();
        let vars: Vec<Var> = (0..5).map(Var::from_index).collect();
        for &v in &vars {
            h.init_var(v);
        }
        h.rebuild(vars.iter().copied());
        // bump var 3 the most, then var 1.
        for _ in 0..5 {
            h.bump(vars[3]);
        }
        for _ in 0..2 {
            h.bump(vars[1]);
        }
        assert_eq!(h.pop_max(), Some(vars[3]));
        assert_eq!(h.pop_max(), Some(vars[1]));
    }

    #[test]
    fn rescale_preserves_order() {
        let mut h = DecisionHeap::new();
        let v0 = Var::from_index(0);
        let v1 = Var::from_index(1);
        h.init_var(v0);
        h.init_var(v1);
        h.rebuild([v0, v1].iter().copied());
        h.inc = RESCALE_THRESHOLD;
        h.bump(v1);
        h.bump(v1);
        assert!(h.activity_of(v1) > h.activity_of(v0));
        assert!(h.activity_of(v1) < RESCALE_THRESHOLD);
    }

    #[test]
    fn rebuild_contains_every_variable_again() {
        let mut h = DecisionHeap::new();
        let vars: Vec<Var> = (0..3).map(Var::from_index).collect();
        for &v in &vars {
            h.init_var(v);
        }
        h.rebuild(vars.iter().copied());
        h.pop_max();
        h.pop_max();
        h.rebuild(vars.iter().copied());
        let mut popped = Vec::new();
        while let Some(v) = h.pop_max() {
            popped.push(v);
        }
        assert_eq!(popped.len(), 3);
    }
}
