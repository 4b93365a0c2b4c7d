use std::convert::identity;

use log::debug;
use varisat::Solver;

use crate::encoder::{Encoding, EncodingLimits};
use crate::grid::Grid;
use crate::solution::Solution;
use crate::strategy::{SolverFailure, Strategy};

/// The complete strategy: encode the grid and defer to the `varisat` CDCL solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exact {
    limits: EncodingLimits,
}

impl Exact {
    /// Fails with [`SolverFailure::EncodingOverflow`] on grids whose encoding exceeds `limits`.
    pub fn new(limits: EncodingLimits) -> Self {
        Self { limits }
    }
}

impl Strategy for Exact {
    fn attempt(&self, grid: &Grid) -> Result<Solution, SolverFailure> {
        if grid.is_trivial() {
            return Ok(Solution::empty(grid));
        }

        let encoding = Encoding::new(grid, self.limits)?;
        debug!("handing {} variables, {} clauses to the SAT solver", encoding.var_count(), encoding.clauses().len());

        let mut solver = Solver::new();
        solver.add_formula(&encoding.formula());
        // the solver only errors when interrupted or on proof output failure, neither of which is configured
        if !solver.solve().is_ok_and(identity) {
            return Err(SolverFailure::Unsatisfiable);
        }

        let model = solver.model().ok_or(SolverFailure::Unsatisfiable)?;
        Ok(encoding.decode_model(&model))
    }
}
