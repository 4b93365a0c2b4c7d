use log::debug;

use crate::grid::{EdgeId, Grid};
use crate::solution::Solution;
use crate::strategy::{SearchStats, SolverFailure, Strategy};

/// Depth-first assignment of bridge counts, edge by edge in [`EdgeId`] order, straight on the grid model.
///
/// A count is skipped when it would push either endpoint past its value, or when it bridges an edge crossing one already bridged.
/// Degrees and connectivity are verified once every edge has a count.
#[derive(Clone, Copy, Debug, Default)]
pub struct Backtracking;

/// One decision on the stack: the count given to `edge`, and the totals of its endpoints before it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Frame {
    edge: EdgeId,
    count: u8,
    saved: (u32, u32),
}

struct DepthFirst<'a> {
    grid: &'a Grid,
    totals: Vec<u32>,
    counts: Vec<u8>,
    stack: Vec<Frame>,
    stats: SearchStats,
}

impl<'a> DepthFirst<'a> {
    fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            totals: vec![0; grid.islands().len()],
            counts: vec![0; grid.potential_edges().len()],
            stack: Vec::with_capacity(grid.potential_edges().len()),
            stats: SearchStats::default(),
        }
    }

    fn admits(&self, edge: EdgeId, count: u8) -> bool {
        let (a, b) = self.grid.edge(edge).endpoints();
        let fits = |island| self.totals[island] + u32::from(count) <= u32::from(self.grid.island(island).value());
        if !fits(a) || !fits(b) {
            return false;
        }

        // edges past this one are still at 0
        count == 0 || self.grid.crossing_edges(edge).iter().all(|other| self.counts[*other] == 0)
    }

    fn push(&mut self, edge: EdgeId, count: u8) {
        let (a, b) = self.grid.edge(edge).endpoints();
        self.stack.push(Frame { edge, count, saved: (self.totals[a], self.totals[b]) });
        self.totals[a] += u32::from(count);
        self.totals[b] += u32::from(count);
        self.counts[edge] = count;
        self.stats.expanded += 1;
    }

    fn pop(&mut self) -> Option<Frame> {
        let frame = self.stack.pop()?;
        let (a, b) = self.grid.edge(frame.edge).endpoints();
        (self.totals[a], self.totals[b]) = frame.saved;
        self.counts[frame.edge] = 0;
        Some(frame)
    }

    fn complete(&self) -> bool {
        self.grid.islands().iter().all(|island| self.totals[island.id()] == u32::from(island.value()))
            && self.grid.spans_all(&self.counts)
    }

    fn run(&mut self) -> Option<Solution> {
        let edge_count = self.counts.len();
        // the first count to try at the next edge; above 0 only right after a pop
        let mut resume = 0;

        loop {
            let edge = self.stack.len();
            if edge == edge_count {
                if self.complete() {
                    return Some(Solution::from_counts(self.counts.clone()));
                }
            } else {
                let mut next = None;
                for count in resume..=2 {
                    if self.admits(edge, count) {
                        next = Some(count);
                        break;
                    }
                    self.stats.pruned += 1;
                }

                if let Some(count) = next {
                    self.push(edge, count);
                    resume = 0;
                    continue;
                }
            }

            resume = self.pop()?.count + 1;
        }
    }
}

impl Strategy for Backtracking {
    fn attempt(&self, grid: &Grid) -> Result<Solution, SolverFailure> {
        if grid.is_trivial() {
            return Ok(Solution::empty(grid));
        }

        let mut search = DepthFirst::new(grid);
        let found = search.run();
        debug!("backtracking search: {}", search.stats);

        found.ok_or(SolverFailure::Unsatisfiable)
    }
}

#[cfg(test)]
mod tests {
    use super::{DepthFirst, Frame};
    use crate::grid::Grid;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn rollback_restores_totals() {
        let grid = grid("2 0 3\n0 0 0\n1 0 2\n");
        let mut search = DepthFirst::new(&grid);
        search.push(0, 1);
        search.push(1, 1);
        assert_eq!(search.totals, vec![2, 1, 1, 0]);

        assert_eq!(search.pop(), Some(Frame { edge: 1, count: 1, saved: (1, 0) }));
        assert_eq!(search.totals, vec![1, 0, 1, 0]);
        assert_eq!(search.pop(), Some(Frame { edge: 0, count: 1, saved: (0, 0) }));
        assert_eq!(search.totals, vec![0; 4]);
        assert_eq!(search.counts, vec![0; 4]);
        assert_eq!(search.pop(), None);
    }

    #[test]
    fn degree_overflow_is_pruned() {
        let grid = grid("1 0 2\n");
        let search = DepthFirst::new(&grid);
        assert!(search.admits(0, 1));
        assert!(!search.admits(0, 2));
    }

    #[test]
    fn crossing_is_pruned() {
        let grid = grid("0 1 0\n1 0 1\n0 1 0\n");
        let mut search = DepthFirst::new(&grid);
        assert!(search.admits(1, 1));
        search.push(0, 1);
        assert!(!search.admits(1, 1));
        assert!(search.admits(1, 0));
    }

    #[test]
    fn exhausts_without_solution() {
        let grid = grid("0 1 0\n1 0 1\n0 1 0\n");
        let mut search = DepthFirst::new(&grid);
        assert_eq!(search.run(), None);
        assert!(search.stack.is_empty());
        assert!(search.stats.pruned > 0);
    }
}
