//! Bridge assignments: checking them against a [`Grid`] and rendering them over it.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;

use crate::cell::Cell;
use crate::grid::{print, EdgeId, Grid, IslandId};
use crate::location::Location;

/// Ways a [`Solution`] can break the rules of the puzzle.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Violation {
    /// The assignment does not have one count per potential edge.
    #[error("expected {expected} edge counts, found {found}")]
    WrongLength {
        /// Potential edges in the grid.
        expected: usize,
        /// Counts in the assignment.
        found: usize,
    },
    /// An edge carries more than two bridges.
    #[error("edge {edge} carries {count} bridges")]
    CountOutOfRange {
        /// The first such edge.
        edge: EdgeId,
        /// Its count.
        count: u8,
    },
    /// An island has more or fewer bridges than its value.
    #[error("island {island} at {location} has {found} bridges, expected {expected}")]
    Degree {
        /// The first such island.
        island: IslandId,
        /// Where it sits.
        location: Location,
        /// Its value.
        expected: u8,
        /// Bridges ending at it.
        found: u32,
    },
    /// Two bridged edges cross.
    #[error("bridged edges {0} and {1} cross")]
    Crossing(EdgeId, EdgeId),
    /// Some island cannot be reached from the others over bridges.
    #[error("bridges do not connect every island")]
    Disconnected,
}

/// A bridge assignment: the number of bridges, 0 to 2, on each potential edge of a [`Grid`], indexed by [`EdgeId`].
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Solution {
    pub(crate) counts: Vec<u8>,
}

impl Solution {
    /// The assignment with no bridges at all.
    pub fn empty(grid: &Grid) -> Self {
        Self { counts: vec![0; grid.potential_edges().len()] }
    }

    /// An assignment with `counts[e]` bridges on edge `e`; see [`Self::validate`].
    pub fn from_counts(counts: Vec<u8>) -> Self {
        Self { counts }
    }

    /// Bridge counts, indexed by [`EdgeId`].
    pub fn counts(&self) -> &[u8] {
        &self.counts
    }

    /// Bridges on `edge`, 0 for edges past the end.
    pub fn count(&self, edge: EdgeId) -> u8 {
        self.counts.get(edge).copied().unwrap_or(0)
    }

    /// Bridges between two islands, 0 if they are not line-of-sight neighbors.
    pub fn between(&self, grid: &Grid, a: IslandId, b: IslandId) -> u8 {
        grid.edge_between(a, b).map_or(0, |edge| self.count(edge))
    }

    /// Edges carrying at least one bridge, with their counts.
    pub fn bridges(&self) -> impl Iterator<Item=(EdgeId, u8)> + '_ {
        self.counts.iter().copied().enumerate().filter(|(_, count)| *count > 0)
    }

    /// Total bridges ending at each island.
    pub(crate) fn degrees(&self, grid: &Grid) -> Vec<u32> {
        let mut degrees = vec![0; grid.islands().len()];
        for (edge, count) in self.bridges() {
            let (a, b) = grid.edge(edge).endpoints;
            degrees[a] += u32::from(count);
            degrees[b] += u32::from(count);
        }
        degrees
    }

    /// Check every rule: counts in range, exact island degrees, no crossing bridges, and a connected bridge graph.
    ///
    /// Grids with a single island accept the empty assignment.
    pub fn validate(&self, grid: &Grid) -> Result<(), Violation> {
        if self.counts.len() != grid.potential_edges().len() {
            return Err(Violation::WrongLength { expected: grid.potential_edges().len(), found: self.counts.len() });
        }

        if let Some((edge, count)) = self.bridges().find(|(_, count)| *count > 2) {
            return Err(Violation::CountOutOfRange { edge, count });
        }

        if grid.is_trivial() {
            return Ok(());
        }

        for (island, found) in grid.islands().iter().zip(self.degrees(grid)) {
            if found != u32::from(island.value) {
                return Err(Violation::Degree { island: island.id, location: island.location, expected: island.value, found });
            }
        }

        if let Some((a, b)) = grid.crossing_pairs().find(|(a, b)| self.count(*a) > 0 && self.count(*b) > 0) {
            return Err(Violation::Crossing(a, b));
        }

        if !grid.spans_all(&self.counts) {
            return Err(Violation::Disconnected);
        }

        Ok(())
    }

    /// Lay this assignment over `grid`, one cell per grid cell.
    pub fn render(&self, grid: &Grid) -> Rendered {
        let mut cells = grid.frozen();
        for (edge, count) in self.bridges() {
            let edge = grid.edge(edge);
            for location in edge.interior() {
                cells[location.as_index()] = Cell::Bridge { count, orientation: edge.orientation };
            }
        }

        Rendered { cells }
    }
}

/// A solved grid, frozen for output or printing.
///
/// [`Display`] writes one character per cell, `.` for empty cells.
/// [`Rendered::to_list_string`] writes each row as a list of quoted cells with `0` for empty cells.
pub struct Rendered {
    cells: Array2<Cell>,
}

impl Rendered {
    /// One line per row, each a bracketed list of quoted cells.
    pub fn to_list_string(&self) -> String {
        self.cells.rows().into_iter()
            .map(|row| format!("[ {} ]", row.iter().map(|cell| format!("\"{}\"", cell.glyph("0"))).join(" , ")))
            .join("\n")
    }
}

impl Display for Rendered {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", print(&self.cells, "."))
    }
}
