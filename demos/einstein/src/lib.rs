//! Generates the DIMACS CNF encoding of Einstein's five-house logic
//! puzzle, for use as an end-to-end test fixture for `cdclsat`.
//!
//! Five categories (house color `h`, nationality `l`, drink `d`, tobacco
//! `s`, pet `p`), each with five values, numbered `1..=5` per house
//! position. `category{house},{value}` is one boolean variable; variables
//! are numbered in the same row-major order the categories are declared
//! in below, matching the literal table this puzzle is traditionally
//! published with:
//!
//! | Nationality | Color  | House | Drink  | Tobacco     | Pet   |
//! |-------------|--------|-------|--------|-------------|-------|
//! | Brit        | Blue   | 1     | Beer   | Blends      | Bird  |
//! | Dane        | Green  | 2     | Coffee | Bluemasters | Cat   |
//! | German      | Red    | 3     | Milk   | Dunhill     | Dog   |
//! | Norwegian   | White  | 4     | Tea    | Pall Mall   | Fish  |
//! | Swede       | Yellow | 5     | Water  | Prince      | Horse |

use cdclsat::Lit;

pub const N: usize = 5;

#[derive(Clone, Copy)]
pub enum Category {
    House,
    Location,
    Drink,
    Smoke,
    Pet,
}

/// Maps `(category, house, value)` to the DIMACS variable number, in the
/// same order `einstein.py`'s `all_literals` list is built: all of
/// `House`, then all of `Location`, then `Drink`, then `Smoke`, then
/// `Pet`, each block row-major over `(house, value)` both `1..=5`.
pub struct LiteralTable;

impl LiteralTable {
    pub fn var(&self, cat: Category, house: usize, value: usize) -> i64 {
        debug_assert!((1..=N).contains(&house) && (1..=N).contains(&value));
        let block = match cat {
            Category::House => 0,
            Category::Location => 1,
            Category::Drink => 2,
            Category::Smoke => 3,
            Category::Pet => 4,
        };
        (block * N * N + (house - 1) * N + (value - 1) + 1) as i64
    }

    pub fn lit(&self, cat: Category, house: usize, value: usize) -> Lit {
        Lit::from_dimacs(self.var(cat, house, value))
    }
}

use Category::*;

/// Builds the full clause set and declared variable count for the puzzle.
pub fn generate() -> (u32, Vec<Vec<Lit>>) {
    let table = LiteralTable;
    let mut clauses: Vec<Vec<Lit>> = Vec::new();

    // The Brit lives in the red house.
    clauses.push(vec![table.lit(House, 1, 3)]);
    // The Swede keeps dogs as pets.
    clauses.push(vec![table.lit(Pet, 5, 3)]);
    // The Dane drinks tea.
    clauses.push(vec![table.lit(Drink, 2, 4)]);

    // The green house is on the left of the white house. Bidirectional:
    // for any assignment of the green house to position b and the white
    // house to position b+1, swapping which house (a or c) holds each
    // color is also constrained.
    for a in 1..=N {
        for b in 1..N {
            for c in 1..=N {
                let h1 = table.lit(House, a, 2);
                let l1 = table.lit(Location, a, b);
                let h2 = table.lit(House, c, 4);
                let l2 = table.lit(Location, c, b + 1);
                clauses.push(vec![!h1, !l1, !h2, l2]);
                clauses.push(vec![!h1, !l2, !h2, l1]);
            }
        }
    }

    // The green house's owner drinks coffee. (h{a},2 <-> d{a},2)
    for a in 1..=N {
        let h = table.lit(House, a, 2);
        let d = table.lit(Drink, a, 2);
        clauses.push(vec![!h, d]);
        clauses.push(vec![h, !d]);
    }

    // The person who smokes Pall Mall rears birds. (s{a},4 <-> p{a},1)
    for a in 1..=N {
        let s = table.lit(Smoke, a, 4);
        let p = table.lit(Pet, a, 1);
        clauses.push(vec![!s, p]);
        clauses.push(vec![s, !p]);
    }

    // The owner of the yellow house smokes Dunhill. (h{a},5 <-> s{a},3)
    for a in 1..=N {
        let h = table.lit(House, a, 5);
        let s = table.lit(Smoke, a, 3);
        clauses.push(vec![!h, s]);
        clauses.push(vec![h, !s]);
    }

    // The man living in the center house drinks milk. (l{a},3 <-> d{a},3)
    for a in 1..=N {
        let l = table.lit(Location, a, 3);
        let d = table.lit(Drink, a, 3);
        clauses.push(vec![!l, d]);
        clauses.push(vec![l, !d]);
    }

    // The Norwegian lives in the first house.
    clauses.push(vec![table.lit(Location, 4, 1)]);

    // The man who smokes Blends lives next to the one who keeps cats.
    neighbor_rule(&table, &mut clauses, Smoke, 1, Pet, 2);

    // The man who keeps the horse lives next to the man who smokes Dunhill.
    neighbor_rule(&table, &mut clauses, Pet, 5, Smoke, 3);

    // The owner who smokes Bluemasters drinks beer. (s{a},2 <-> d{a},1)
    for a in 1..=N {
        let s = table.lit(Smoke, a, 2);
        let d = table.lit(Drink, a, 1);
        clauses.push(vec![!s, d]);
        clauses.push(vec![s, !d]);
    }

    // The German smokes Prince.
    clauses.push(vec![table.lit(Smoke, 3, 5)]);

    // The Norwegian lives next to the blue house.
    for a in 1..=N {
        for b in 1..=N {
            let l1 = table.lit(Location, 4, a);
            let h = table.lit(House, b, 1);
            if a == 1 {
                clauses.push(vec![!l1, !h, table.lit(Location, b, a + 1)]);
            } else if a == N {
                clauses.push(vec![!l1, !h, table.lit(Location, b, a - 1)]);
            } else {
                clauses.push(vec![!l1, !h, table.lit(Location, b, a - 1), table.lit(Location, b, a + 1)]);
            }

            let l1 = table.lit(Location, b, a);
            if a == 1 {
                clauses.push(vec![!l1, !h, table.lit(Location, 4, a + 1)]);
            } else if a == N {
                clauses.push(vec![!l1, !h, table.lit(Location, 4, a - 1)]);
            } else {
                clauses.push(vec![!l1, !h, table.lit(Location, 4, a - 1), table.lit(Location, 4, a + 1)]);
            }
        }
    }

    // The man who smokes Blends has a neighbor who drinks water.
    //
    // The retrieved original source mixes up its own variable names here
    // (it substitutes the "keeps the horse" and "smokes Dunhill" literals
    // from the rule above instead of "smokes Blends" and "drinks water"),
    // which makes this clue a no-op duplicate of the horse/Dunhill rule.
    // `neighbor_rule` is reused with the literals the clue's own prose
    // names instead.
    neighbor_rule(&table, &mut clauses, Smoke, 1, Drink, 5);

    // Exactly one value per (category, house) and exactly one house per
    // (category, value): an at-least-one clause plus pairwise
    // at-most-one clauses, for every row and every column of every
    // category's 5x5 grid.
    for cat in [House, Location, Drink, Smoke, Pet] {
        for i in 1..=N {
            exactly_one(&table, &mut clauses, cat, i, true);
            exactly_one(&table, &mut clauses, cat, i, false);
        }
    }

    let num_vars = (N * N * 5) as u32;
    (num_vars, clauses)
}

/// Encodes "if `cat_a` has value `val_a` at house X, and house X is at
/// grid position `b`, and `cat_b` has value `val_b` at house Y, then Y is
/// adjacent to X" — and its symmetric counterpart with X and Y swapped.
/// Grounded in the (symmetric) adjacency clauses `einstein.py` uses for
/// both the Blends/cats and horse/Dunhill clues.
fn neighbor_rule(
    table: &LiteralTable,
    clauses: &mut Vec<Vec<Lit>>,
    cat_a: Category,
    val_a: usize,
    cat_b: Category,
    val_b: usize,
) {
    for a in 1..=N {
        for b in 1..=N {
            for c in 1..=N {
                let x = table.lit(cat_a, a, val_a);
                let pos_x = table.lit(Location, a, b);
                let y = table.lit(cat_b, c, val_b);

                let mut clause = vec![!x, !pos_x, !y];
                if b == 1 {
                    clause.push(table.lit(Location, c, b + 1));
                } else if b == N {
                    clause.push(table.lit(Location, c, b - 1));
                } else {
                    clause.push(table.lit(Location, c, b - 1));
                    clause.push(table.lit(Location, c, b + 1));
                }
                clauses.push(clause);

                let pos_y = table.lit(Location, c, b);
                let mut clause = vec![!x, !pos_y, !y];
                if b == 1 {
                    clause.push(table.lit(Location, a, b + 1));
                } else if b == N {
                    clause.push(table.lit(Location, a, b - 1));
                } else {
                    clause.push(table.lit(Location, a, b - 1));
                    clause.push(table.lit(Location, a, b + 1));
                }
                clauses.push(clause);
            }
        }
    }
}

/// Emits "exactly one of the five literals in this row/column is true":
/// one at-least-one clause, plus a pairwise at-most-one clause for every
/// pair. `by_house == true` fixes the house and ranges over values
/// (one house has exactly one value per category); `false` fixes the
/// value and ranges over houses (one value is held by exactly one house).
fn exactly_one(table: &LiteralTable, clauses: &mut Vec<Vec<Lit>>, cat: Category, fixed: usize, by_house: bool) {
    let lits: Vec<Lit> = (1..=N)
        .map(|v| if by_house { table.lit(cat, fixed, v) } else { table.lit(cat, v, fixed) })
        .collect();
    clauses.push(lits.clone());
    for i in 0..lits.len() {
        for j in (i + 1)..lits.len() {
            clauses.push(vec![!lits[i], !lits[j]]);
        }
    }
}
