use log::debug;

use crate::grid::Grid;
use crate::solution::Solution;
use crate::strategy::{SolverFailure, Strategy};

/// Every one of the 3^E combinations of edge counts, in lexicographic order with edge 0 most significant.
///
/// Nothing is pruned: a combination is checked for exact degrees, crossings and connectivity only once complete.
/// Only usable on small grids.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForce;

/// Step `counts` to the next combination, as a base-3 odometer. Returns `false` once every combination has been seen.
fn advance(counts: &mut [u8]) -> bool {
    let Some(position) = counts.iter().rposition(|count| *count < 2) else {
        return false;
    };
    counts[position] += 1;
    counts[position + 1..].fill(0);
    true
}

fn degrees_match(grid: &Grid, counts: &[u8], totals: &mut [u32]) -> bool {
    totals.fill(0);
    for (edge, count) in grid.potential_edges().iter().zip(counts) {
        let (a, b) = edge.endpoints();
        totals[a] += u32::from(*count);
        totals[b] += u32::from(*count);
    }
    grid.islands().iter().all(|island| totals[island.id()] == u32::from(island.value()))
}

fn bridges_cross(grid: &Grid, counts: &[u8]) -> bool {
    grid.crossing_pairs().any(|(a, b)| counts[a] > 0 && counts[b] > 0)
}

impl Strategy for BruteForce {
    fn attempt(&self, grid: &Grid) -> Result<Solution, SolverFailure> {
        if grid.is_trivial() {
            return Ok(Solution::empty(grid));
        }

        let mut counts = vec![0; grid.potential_edges().len()];
        let mut totals = vec![0; grid.islands().len()];
        let mut checked = 0usize;

        loop {
            checked += 1;
            if degrees_match(grid, &counts, &mut totals) && !bridges_cross(grid, &counts) && grid.spans_all(&counts) {
                debug!("brute force checked {} combinations", checked);
                return Ok(Solution::from_counts(counts));
            }
            if !advance(&mut counts) {
                debug!("brute force exhausted all {} combinations", checked);
                return Err(SolverFailure::Unsatisfiable);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{advance, bridges_cross, BruteForce};
    use crate::grid::Grid;
    use crate::strategy::{SolverFailure, Strategy};

    #[test]
    fn odometer_visits_every_combination() {
        let mut counts = vec![0; 3];
        let mut seen = vec![counts.clone()];
        while advance(&mut counts) {
            seen.push(counts.clone());
        }
        assert_eq!(seen.len(), 27);
        assert_eq!(seen[1], vec![0, 0, 1]);
        assert_eq!(seen[3], vec![0, 1, 0]);
        assert_eq!(seen[26], vec![2, 2, 2]);
    }

    #[test]
    fn no_edges_is_a_single_combination() {
        assert!(!advance(&mut []));
    }

    #[test]
    fn crossing_combinations_are_rejected() {
        // degrees and connectivity both hold only with the two middle bridges crossing
        let grid: Grid = "2 2 0\n2 0 1\n0 1 0\n".parse().unwrap();
        assert!(bridges_cross(&grid, &[1, 1, 1, 1]));
        assert!(grid.spans_all(&[1, 1, 1, 1]));
        assert_eq!(BruteForce.attempt(&grid), Err(SolverFailure::Unsatisfiable));
    }
}
