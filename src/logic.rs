use std::ops::Index;

use itertools::Itertools;
use varisat::{Lit, Var};

/// Above this many clauses, [`exactly`] switches from the binomial encoding to a sequential counter.
const BINOMIAL_CLAUSE_LIMIT: u64 = 128;

pub(crate) fn exactly_one(lits: &[Lit]) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::with_capacity(lits.len() * (lits.len() + 1) / 2 + 1);

    // no two are true; (!A + !B) * (!A + !C) * ...
    clauses.extend(lits.iter()
        .combinations(2)
        .map(|pair| vec![!**pair.index(0), !**pair.index(1)])
    );
    // at least one is true; A + B + C + ...
    clauses.push(lits.to_vec());

    clauses
}

/// Clauses forcing exactly `k` of `lits` to be true.
///
/// Small constraints use the binomial encoding, which needs no extra variables.
/// Larger ones draw auxiliary variables from `fresh`.
pub(crate) fn exactly(lits: &[Lit], k: usize, fresh: impl FnMut() -> Var) -> Vec<Vec<Lit>> {
    let m = lits.len();

    if k > m {
        // unsatisfiable
        return vec![vec![]];
    }
    if k == 0 {
        return lits.iter().map(|lit| vec![!*lit]).collect_vec();
    }
    if k == m {
        return lits.iter().map(|lit| vec![*lit]).collect_vec();
    }
    if k == 1 && binomial(m, 2) < BINOMIAL_CLAUSE_LIMIT {
        return exactly_one(lits);
    }
    if binomial(m, k + 1) + binomial(m, m - k + 1) <= BINOMIAL_CLAUSE_LIMIT {
        return binomial_exactly(lits, k);
    }

    sequential_exactly(lits, k, fresh)
}

fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k) as u64;
    let n = n as u64;
    (0..k).fold(1u64, |acc, i| acc.saturating_mul(n - i) / (i + 1))
}

/// For 0 < k < m: any k + 1 of `lits` contain a false one, and any m - k + 1 contain a true one.
fn binomial_exactly(lits: &[Lit], k: usize) -> Vec<Vec<Lit>> {
    let m = lits.len();
    let mut clauses = lits.iter()
        .combinations(k + 1)
        .map(|selection| selection.into_iter().map(|lit| !*lit).collect_vec())
        .collect_vec();
    clauses.extend(lits.iter()
        .combinations(m - k + 1)
        .map(|selection| selection.into_iter().copied().collect_vec()));
    clauses
}

/// Sequential counter for 0 < k < m.
///
/// Register `r[i][j]` is true exactly when at least `j + 1` of the first `i + 1` literals are true,
/// for `j` up to `k` (one past the bound, so overflow is visible).
fn sequential_exactly(lits: &[Lit], k: usize, mut fresh: impl FnMut() -> Var) -> Vec<Vec<Lit>> {
    let m = lits.len();
    let mut clauses = Vec::new();
    let mut registers: Vec<Vec<Lit>> = Vec::with_capacity(m);

    for (i, x) in lits.iter().copied().enumerate() {
        let width = (i + 1).min(k + 1);
        let row = (0..width).map(|_| fresh().positive()).collect_vec();

        for (j, r) in row.iter().copied().enumerate() {
            // the register in the previous row counting the same, and one fewer
            let same = registers.last().and_then(|prev| prev.get(j)).copied();
            let fewer = if j == 0 { None } else { registers.last().and_then(|prev| prev.get(j - 1)).copied() };

            // upward: same => r, x & fewer => r (x => r when j == 0)
            if let Some(same) = same {
                clauses.push(vec![!same, r]);
            }
            match fewer {
                Some(fewer) => clauses.push(vec![!x, !fewer, r]),
                None if j == 0 => clauses.push(vec![!x, r]),
                None => {}
            }

            // downward: r => same | x, r => same | fewer
            match same {
                Some(same) => clauses.push(vec![!r, same, x]),
                None => clauses.push(vec![!r, x]),
            }
            match (same, fewer) {
                (Some(same), Some(fewer)) => clauses.push(vec![!r, same, fewer]),
                (None, Some(fewer)) => clauses.push(vec![!r, fewer]),
                _ => {}
            }
        }

        registers.push(row);
    }

    // 0 < k < m, so the last row has k + 1 registers
    let last = &registers[m - 1];
    clauses.push(vec![last[k - 1]]);
    clauses.push(vec![!last[k]]);

    clauses
}
