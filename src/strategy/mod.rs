//! Strategies for finding a [`Solution`], and the [`solve`] entry point.

use std::fmt;
use std::time::{Duration, Instant};

use log::info;
use strum::{Display, EnumString, VariantArray};

use crate::encoder::EncodingLimits;
use crate::grid::Grid;
use crate::solution::Solution;

pub use backtrack::Backtracking;
pub use best_first::BestFirst;
pub use brute_force::BruteForce;
pub use sat::Exact;

mod backtrack;
mod best_first;
mod brute_force;
mod sat;

/// Reasons a [`Strategy`] may fail.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SolverFailure {
    /// The search was exhausted, i.e. the grid as stated has no valid bridge assignment.
    #[error("no solution")]
    Unsatisfiable,
    /// The boolean encoding of the grid would exceed the configured limits.
    #[error("encoding needs {variables} variables and {clauses} clauses, above the limits of {} and {}",
        .limits.max_variables, .limits.max_clauses)]
    EncodingOverflow {
        /// Variables allocated when the limit was hit.
        variables: usize,
        /// Clauses emitted when the limit was hit.
        clauses: usize,
        /// The limits in force.
        limits: EncodingLimits,
    },
}

/// One way of finding a bridge assignment for a [`Grid`].
///
/// Every strategy returns the empty assignment for grids with a single island.
pub trait Strategy {
    /// Find a valid assignment, or report why none was found.
    fn attempt(&self, grid: &Grid) -> Result<Solution, SolverFailure>;
}

/// Counters kept by the searching strategies, logged once a search ends.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct SearchStats {
    /// Nodes whose children were generated.
    pub(crate) expanded: usize,
    /// Children rejected before being explored.
    pub(crate) pruned: usize,
    /// States reached again by another path.
    pub(crate) duplicates: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} expanded, {} pruned, {} duplicates", self.expanded, self.pruned, self.duplicates)
    }
}

/// Identifier of a [`Strategy`], as selected on the command line.
#[derive(Clone, Copy, Debug, Default, Display, EnumString, Eq, Hash, PartialEq, VariantArray)]
#[strum(serialize_all = "kebab-case")]
pub enum Method {
    /// Hand the encoded formula to a complete SAT solver.
    #[default]
    #[strum(to_string = "sat", serialize = "exact")]
    Sat,
    /// Unit propagation with a best-first search over partial assignments of the encoded formula.
    #[strum(to_string = "best-first", serialize = "astar")]
    BestFirst,
    /// Depth-first search over edge counts, pruning degree overflow and crossings.
    #[strum(to_string = "backtrack", serialize = "backtracking")]
    Backtrack,
    /// Every combination of edge counts, checked only once complete.
    #[strum(to_string = "brute-force", serialize = "bruteforce")]
    BruteForce,
}

impl Method {
    /// The strategy this method names. `limits` only matters to the formula-based strategies.
    pub fn strategy(&self, limits: EncodingLimits) -> Box<dyn Strategy> {
        match self {
            Method::Sat => Box::new(Exact::new(limits)),
            Method::BestFirst => Box::new(BestFirst::new(limits)),
            Method::Backtrack => Box::new(Backtracking),
            Method::BruteForce => Box::new(BruteForce),
        }
    }
}

/// The outcome of one [`solve`] call.
#[derive(Debug)]
pub struct Report {
    /// The method that ran.
    pub method: Method,
    /// The solution found, or why there is none.
    pub outcome: Result<Solution, SolverFailure>,
    /// Wall-clock time of the attempt alone, without parsing or rendering.
    pub elapsed: Duration,
}

/// Solve `grid` with the strategy named by `method`, timing the attempt.
pub fn solve(grid: &Grid, method: Method, limits: EncodingLimits) -> Report {
    info!("solving {} islands, {} potential edges with {}", grid.islands().len(), grid.potential_edges().len(), method);

    let start = Instant::now();
    let outcome = method.strategy(limits).attempt(grid);
    let elapsed = start.elapsed();

    match &outcome {
        Ok(solution) => info!("{} found {} bridged edges in {:?}", method, solution.bridges().count(), elapsed),
        Err(failure) => info!("{} stopped after {:?}: {}", method, elapsed, failure),
    }

    Report { method, outcome, elapsed }
}
