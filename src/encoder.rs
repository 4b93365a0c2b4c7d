//! Translation of a [`Grid`] into a boolean formula in conjunctive normal form.
//!
//! # Variables
//! Every potential edge E owns two variables, laid out densely as `2 * E + m`:
//! - `m = 0` ([`Multiplicity::AtLeastOne`]): E carries at least one bridge;
//! - `m = 1` ([`Multiplicity::Second`]): E carries a second bridge.
//!
//! The bridge count of E is the number of its true variables.
//!
//! Every island I and depth D in `0..N` own a level variable, laid out after the edge variables as `2 * edges + I * N + D`.
//! Auxiliary variables of the cardinality and connectivity encodings follow.
//!
//! # Constraints
//! 1. `second => atLeastOne` for every edge.
//! 2. For every island, exactly `value` of the variables of its incident edges are true.
//! 3. For every crossing pair of edges, at most one has a bridge.
//! 4. Connectivity, by depth levels relative to island 0.
//!    Island 0 sits at depth 0 and no other; every other island sits at exactly one depth in `1..N`.
//!    An island at depth D > 0 has a bridge to some neighbor at depth D - 1.
//!    Since depths strictly decrease along these bridges, every island reaches island 0.

use itertools::Itertools;
use log::debug;
use varisat::{CnfFormula, Lit, Var};

use crate::grid::{EdgeId, Grid, IslandId};
use crate::logic::exactly;
use crate::solution::Solution;
use crate::strategy::SolverFailure;

/// Upper bounds on the size of an encoding; exceeding either fails with [`SolverFailure::EncodingOverflow`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncodingLimits {
    /// Most variables, auxiliaries included.
    pub max_variables: usize,
    /// Most clauses.
    pub max_clauses: usize,
}

impl Default for EncodingLimits {
    fn default() -> Self {
        Self {
            max_variables: 1 << 22,
            max_clauses: 1 << 24,
        }
    }
}

/// Which of the two variables of an edge.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Multiplicity {
    /// The edge carries at least one bridge.
    AtLeastOne,
    /// The edge carries a second bridge.
    Second,
}

/// Variable counter and clause sink for one encoding run.
struct EncodingContext {
    next_var: usize,
    clauses: Vec<Vec<Lit>>,
    limits: EncodingLimits,
}

impl EncodingContext {
    fn fresh_var(&mut self) -> Var {
        self.next_var += 1;
        Var::from_index(self.next_var - 1)
    }

    fn add_clause(&mut self, clause: Vec<Lit>) {
        self.clauses.push(clause);
    }

    fn add_clauses(&mut self, clauses: impl IntoIterator<Item=Vec<Lit>>) {
        self.clauses.extend(clauses);
    }

    /// Exactly `k` of `lits`, allocating any auxiliaries from this context.
    fn add_exactly(&mut self, lits: &[Lit], k: usize) {
        let mut next_var = self.next_var;
        let clauses = exactly(lits, k, || {
            next_var += 1;
            Var::from_index(next_var - 1)
        });
        self.next_var = next_var;
        self.add_clauses(clauses);
    }

    fn check(&self) -> Result<(), SolverFailure> {
        if self.next_var > self.limits.max_variables || self.clauses.len() > self.limits.max_clauses {
            return Err(SolverFailure::EncodingOverflow {
                variables: self.next_var,
                clauses: self.clauses.len(),
                limits: self.limits,
            });
        }
        Ok(())
    }
}

/// The formula for one grid, with the variable layout needed to read a solution back out of a model.
#[derive(Clone, Debug)]
pub struct Encoding {
    edge_count: usize,
    island_count: usize,
    var_count: usize,
    clauses: Vec<Vec<Lit>>,
}

impl Encoding {
    /// Build the degree, non-crossing and connectivity constraints for `grid`.
    ///
    /// Fails only if the encoding would exceed `limits`; unsatisfiability is left to whichever strategy consumes the formula.
    pub fn new(grid: &Grid, limits: EncodingLimits) -> Result<Self, SolverFailure> {
        let edge_count = grid.potential_edges().len();
        let island_count = grid.islands().len();

        let level_count = island_count.checked_mul(island_count)
            .filter(|levels| levels.saturating_add(2 * edge_count) <= limits.max_variables);
        let Some(level_count) = level_count else {
            return Err(SolverFailure::EncodingOverflow {
                variables: island_count.saturating_mul(island_count).saturating_add(2 * edge_count),
                clauses: 0,
                limits,
            });
        };

        let mut encoding = Self { edge_count, island_count, var_count: 0, clauses: Vec::new() };
        let mut ctx = EncodingContext {
            next_var: 2 * edge_count + level_count,
            clauses: Vec::new(),
            limits,
        };

        encoding.degree_constraints(grid, &mut ctx);
        ctx.check()?;
        debug!("degree constraints: {} variables, {} clauses", ctx.next_var, ctx.clauses.len());

        encoding.crossing_constraints(grid, &mut ctx);
        ctx.check()?;
        debug!("non-crossing constraints: {} variables, {} clauses", ctx.next_var, ctx.clauses.len());

        encoding.connectivity_constraints(grid, &mut ctx)?;
        debug!("connectivity constraints: {} variables, {} clauses", ctx.next_var, ctx.clauses.len());

        encoding.var_count = ctx.next_var;
        encoding.clauses = ctx.clauses;
        Ok(encoding)
    }

    /// The variable of `edge` for `multiplicity`.
    #[inline]
    pub fn edge_var(&self, edge: EdgeId, multiplicity: Multiplicity) -> Var {
        Var::from_index(2 * edge + multiplicity as usize)
    }

    /// The variable placing `island` at `depth` below island 0.
    #[inline]
    pub fn level_var(&self, island: IslandId, depth: usize) -> Var {
        Var::from_index(2 * self.edge_count + island * self.island_count + depth)
    }

    /// Total variables, auxiliaries included.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Every clause, in the order emitted.
    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    /// The clauses as a formula for `varisat`.
    pub fn formula(&self) -> CnfFormula {
        CnfFormula::from(self.clauses.clone())
    }

    /// Every edge variable, ordered by edge and then by multiplicity.
    pub fn edge_vars(&self) -> impl Iterator<Item=(EdgeId, Multiplicity, Var)> + '_ {
        (0..self.edge_count)
            .cartesian_product([Multiplicity::AtLeastOne, Multiplicity::Second])
            .map(|(edge, multiplicity)| (edge, multiplicity, self.edge_var(edge, multiplicity)))
    }

    fn degree_constraints(&self, grid: &Grid, ctx: &mut EncodingContext) {
        for edge in 0..self.edge_count {
            // a second bridge implies a first
            ctx.add_clause(vec![
                self.edge_var(edge, Multiplicity::Second).negative(),
                self.edge_var(edge, Multiplicity::AtLeastOne).positive(),
            ]);
        }

        for island in grid.islands() {
            // each true variable is one bridge end at this island
            let lits = grid.incident_edges(island.id).iter()
                .flat_map(|edge| [
                    self.edge_var(*edge, Multiplicity::AtLeastOne).positive(),
                    self.edge_var(*edge, Multiplicity::Second).positive(),
                ])
                .collect_vec();
            ctx.add_exactly(&lits, usize::from(island.value));
        }
    }

    fn crossing_constraints(&self, grid: &Grid, ctx: &mut EncodingContext) {
        // zero-bridge edges never cross, so only the first bridge matters
        ctx.add_clauses(grid.crossing_pairs().map(|(a, b)| vec![
            self.edge_var(a, Multiplicity::AtLeastOne).negative(),
            self.edge_var(b, Multiplicity::AtLeastOne).negative(),
        ]));
    }

    fn connectivity_constraints(&self, grid: &Grid, ctx: &mut EncodingContext) -> Result<(), SolverFailure> {
        let n = self.island_count;
        if n <= 1 {
            return Ok(());
        }

        // the root sits at depth 0 and no other
        ctx.add_clause(vec![self.level_var(0, 0).positive()]);
        ctx.add_clauses((1..n).map(|depth| vec![self.level_var(0, depth).negative()]));

        for island in 1..n {
            ctx.add_clause(vec![self.level_var(island, 0).negative()]);
            let depths = (1..n).map(|depth| self.level_var(island, depth).positive()).collect_vec();
            ctx.add_exactly(&depths, 1);
            ctx.check()?;
        }

        for island in 1..n {
            for depth in 1..n {
                // at depth D implies some bridged neighbor at depth D - 1
                // with one auxiliary P per neighbor: P => bridge, P => neighbor at D - 1
                let mut support = vec![self.level_var(island, depth).negative()];
                for neighbor in grid.neighbor_ids(island) {
                    let Some(edge) = grid.edge_between(island, *neighbor) else { continue };
                    let p = ctx.fresh_var();
                    ctx.add_clause(vec![p.negative(), self.edge_var(edge, Multiplicity::AtLeastOne).positive()]);
                    ctx.add_clause(vec![p.negative(), self.level_var(*neighbor, depth - 1).positive()]);
                    support.push(p.positive());
                }
                ctx.add_clause(support);
            }
            ctx.check()?;
        }

        Ok(())
    }

    /// Read bridge counts from a (possibly partial) truth assignment; unknown variables count as false.
    pub fn decode(&self, value: impl Fn(Var) -> Option<bool>) -> Solution {
        let counts = (0..self.edge_count)
            .map(|edge| match value(self.edge_var(edge, Multiplicity::AtLeastOne)) {
                Some(true) => match value(self.edge_var(edge, Multiplicity::Second)) {
                    Some(true) => 2,
                    _ => 1,
                },
                _ => 0,
            })
            .collect_vec();

        Solution::from_counts(counts)
    }

    /// Read bridge counts from a complete model as returned by a SAT solver.
    pub fn decode_model(&self, model: &[Lit]) -> Solution {
        self.decode(|var| model.get(var.index()).map(|lit| lit.is_positive()))
    }

    /// The truth values of every edge variable that represent `solution`, ordered as [`Self::edge_vars`].
    pub fn edge_literals(&self, solution: &Solution) -> Vec<Lit> {
        self.edge_vars()
            .map(|(edge, multiplicity, var)| var.lit(match multiplicity {
                Multiplicity::AtLeastOne => solution.count(edge) >= 1,
                Multiplicity::Second => solution.count(edge) == 2,
            }))
            .collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use varisat::{ExtendFormula, Solver};

    use crate::encoder::{Encoding, EncodingLimits, Multiplicity};
    use crate::grid::Grid;
    use crate::strategy::SolverFailure;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    fn solve(encoding: &Encoding) -> Option<Vec<varisat::Lit>> {
        let mut solver = Solver::new();
        solver.add_formula(&encoding.formula());
        match solver.solve() {
            Ok(true) => solver.model(),
            _ => None,
        }
    }

    #[test]
    fn variable_layout() {
        let grid = grid("2 0 2\n0 0 0\n2 0 2\n");
        let encoding = Encoding::new(&grid, EncodingLimits::default()).unwrap();
        assert_eq!(encoding.edge_var(0, Multiplicity::AtLeastOne).index(), 0);
        assert_eq!(encoding.edge_var(3, Multiplicity::Second).index(), 7);
        assert_eq!(encoding.level_var(0, 0).index(), 8);
        assert_eq!(encoding.level_var(3, 3).index(), 8 + 15);
        assert!(encoding.var_count() >= 8 + 16);
    }

    #[test]
    fn decode_and_reencode_agree() {
        let grid = grid("2 0 3\n0 0 0\n1 0 2\n");
        let encoding = Encoding::new(&grid, EncodingLimits::default()).unwrap();
        let model = solve(&encoding).unwrap();
        let solution = encoding.decode_model(&model);
        assert!(solution.validate(&grid).is_ok());

        for (lit, (_, _, var)) in encoding.edge_literals(&solution).into_iter().zip(encoding.edge_vars()) {
            assert_eq!(lit, model[var.index()]);
        }
    }

    #[test]
    fn disconnected_degrees_are_rejected() {
        // two dominoes satisfy every degree, but are not connected to each other
        let grid = grid("1 1\n1 1\n");
        let encoding = Encoding::new(&grid, EncodingLimits::default()).unwrap();
        let mut solver = Solver::new();
        solver.add_formula(&encoding.formula());
        // (0,1) and (2,3) only
        solver.add_clause(&[encoding.edge_var(1, Multiplicity::AtLeastOne).positive()]);
        solver.add_clause(&[encoding.edge_var(3, Multiplicity::AtLeastOne).positive()]);
        assert!(!solver.solve().unwrap());
    }

    #[test]
    fn crossing_edges_are_exclusive() {
        let grid = grid("0 1 0\n1 0 1\n0 1 0\n");
        let encoding = Encoding::new(&grid, EncodingLimits::default()).unwrap();
        assert!(encoding.clauses().contains(&vec![
            encoding.edge_var(0, Multiplicity::AtLeastOne).negative(),
            encoding.edge_var(1, Multiplicity::AtLeastOne).negative(),
        ]));
        assert!(solve(&encoding).is_none());
    }

    #[test]
    fn limits_fail_fast() {
        let grid = grid("2 0 2\n0 0 0\n2 0 2\n");
        let limits = EncodingLimits { max_variables: 10, max_clauses: 1000 };
        assert!(matches!(Encoding::new(&grid, limits), Err(SolverFailure::EncodingOverflow { .. })));
        let limits = EncodingLimits { max_variables: 1000, max_clauses: 5 };
        assert!(matches!(Encoding::new(&grid, limits), Err(SolverFailure::EncodingOverflow { .. })));
    }
}
