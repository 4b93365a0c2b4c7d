//! Building a [`Grid`] cell by cell or from text.

use std::num::NonZero;
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;

use crate::grid::Grid;
use crate::location::{Dimension, Location};

/// Reasons a builder may become invalid while building.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvalidReason {
    /// The input had no rows or no columns.
    #[error("the grid has no cells")]
    Empty,
    /// A row had a different number of cells than the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    NotRectangular {
        /// The offending row, counting non-empty lines from 0.
        row: usize,
        /// The length of the first row.
        expected: usize,
        /// The length of the offending row.
        found: usize,
    },
    /// A cell could not be read as a non-negative integer.
    #[error("cannot read {token:?} at row {row}, column {column} as a cell value")]
    BadToken {
        /// Counting non-empty lines from 0.
        row: usize,
        /// Counting cells from 0.
        column: usize,
        /// The text that was read.
        token: String,
    },
    /// An island was placed outside the bounds given by `dims` on a builder.
    #[error("{location} is outside the grid")]
    OutOfBounds {
        /// Where the island was placed.
        location: Location,
    },
    /// An island value was 0 or did not fit a cell.
    #[error("island at {location} has unusable value {value}")]
    IslandValue {
        /// Where the island was placed.
        location: Location,
        /// The value given.
        value: u32,
    },
    /// The grid has no islands at all.
    #[error("the grid contains no islands")]
    NoIslands,
}

/// A grid which is not rectangular, has no islands, or otherwise cannot be built.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("malformed grid: {}", .reasons.iter().join("; "))]
pub struct MalformedGridError {
    /// Every reason found, in the order found.
    pub reasons: Vec<InvalidReason>,
}

impl From<InvalidReason> for MalformedGridError {
    fn from(reason: InvalidReason) -> Self {
        Self { reasons: vec![reason] }
    }
}

/// Functionality all grid builders must implement.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
pub trait Builder: Clone {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(width, height)` order.
    fn with_dims(dims: (Dimension, Dimension)) -> Self;
    /// Place an island requiring `value` bridges at `location`, replacing anything already there.
    ///
    /// May cause the builder to enter an [`OutOfBounds`](InvalidReason::OutOfBounds) invalid state if `location` is out of bounds,
    /// or an [`IslandValue`](InvalidReason::IslandValue) invalid state if `value` is 0 or above 255.
    /// If the builder is already in an invalid state, this function does nothing.
    fn add_island(&mut self, location: Location, value: u32) -> &mut Self;
    /// Remove the most recently added island.
    ///
    /// If the builder is in an invalid state or no islands are present, this function does nothing.
    fn pop_island(&mut self) -> &mut Self;
    /// Clear `location`, dropping any island there regardless of where in the chain this method is called.
    ///
    /// May cause the builder to enter an [`OutOfBounds`](InvalidReason::OutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    fn drop_location(&mut self, location: Location) -> &mut Self;
    /// Check the validity of this builder, ensuring no [`InvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<InvalidReason>)` otherwise.
    fn is_valid(&self) -> Option<&Vec<InvalidReason>>;
    /// Convert the state of this builder into a [`Grid`].
    fn build(&self) -> Result<Grid, MalformedGridError>;
}

/// A builder for rectangular Hashiwokakero grids.
#[derive(Clone, Debug)]
pub struct GridBuilder {
    // width, height
    dims: (Dimension, Dimension),
    cells: Array2<u8>,
    // in insertion order, for pop_island
    placed: Vec<Location>,
    invalid_reasons: Vec<InvalidReason>,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::<usize>::MIN, NonZero::<usize>::MIN))
    }
}

impl Builder for GridBuilder {
    fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::zeros((dims.1.get(), dims.0.get())),
            placed: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    fn add_island(&mut self, location: Location, value: u32) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            self.invalid_reasons.push(InvalidReason::OutOfBounds { location });
            return self;
        }

        match u8::try_from(value) {
            Ok(cell) if cell > 0 => {
                self.cells[location.as_index()] = cell;
                self.placed.push(location);
            }
            _ => self.invalid_reasons.push(InvalidReason::IslandValue { location, value }),
        }

        self
    }

    fn pop_island(&mut self) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if let Some(location) = self.placed.pop() {
            self.cells[location.as_index()] = 0;
        }

        self
    }

    fn drop_location(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            self.invalid_reasons.push(InvalidReason::OutOfBounds { location });
            return self;
        }

        self.cells[location.as_index()] = 0;
        self.placed.retain(|placed| *placed != location);
        self
    }

    fn is_valid(&self) -> Option<&Vec<InvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    fn build(&self) -> Result<Grid, MalformedGridError> {
        if !self.invalid_reasons.is_empty() {
            return Err(MalformedGridError { reasons: self.invalid_reasons.clone() });
        }

        if self.cells.iter().all(|value| *value == 0) {
            return Err(InvalidReason::NoIslands.into());
        }

        Ok(Grid::from_cells(self.dims, self.cells.clone()))
    }
}

impl GridBuilder {
    #[inline]
    fn in_bounds(&self, location: Location) -> bool {
        location.col() < self.dims.0.get() && location.row() < self.dims.1.get()
    }

    /// Start a builder from a matrix of cell values, 0 meaning an empty cell.
    ///
    /// Rows must all have the same, nonzero length; otherwise the builder is invalid.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Self {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let (Some(width), Some(height)) = (NonZero::new(width), NonZero::new(rows.len())) else {
            let mut builder = Self::default();
            builder.invalid_reasons.push(InvalidReason::Empty);
            return builder;
        };

        let mut builder = Self::with_dims((width, height));
        if let Some((row, found)) = rows.iter()
            .map(|row| row.as_ref().len())
            .enumerate()
            .find(|(_, len)| *len != width.get()) {
            builder.invalid_reasons.push(InvalidReason::NotRectangular { row, expected: width.get(), found });
            return builder;
        }

        for (y, row) in rows.iter().enumerate() {
            for (x, value) in row.as_ref().iter().enumerate() {
                if *value > 0 {
                    builder.add_island(Location(x, y), *value);
                }
            }
        }

        builder
    }
}

/// Read cell values from text: one row per non-empty line, cells separated by commas, or by whitespace on lines without commas.
pub(crate) fn parse_rows(text: &str) -> Result<Vec<Vec<u32>>, InvalidReason> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(row, line)| {
            let tokens = if line.contains(',') {
                line.split(',').map(str::trim).collect_vec()
            } else {
                line.split_whitespace().collect_vec()
            };

            tokens.into_iter()
                .enumerate()
                .map(|(column, token)| token.parse::<u32>()
                    .map_err(|_| InvalidReason::BadToken { row, column, token: token.to_string() }))
                .collect()
        })
        .collect()
}

impl FromStr for Grid {
    type Err = MalformedGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GridBuilder::from_rows(&parse_rows(s)?).build()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use crate::builder::{Builder, GridBuilder, InvalidReason};
    use crate::grid::Grid;
    use crate::location::Location;

    #[test]
    fn parse_commas_and_whitespace() {
        let commas: Grid = "2, 0, 2\n\n0,0,0\n".parse().unwrap();
        let spaces: Grid = "2 0 2\n0 0 0".parse().unwrap();
        assert_eq!(format!("{}", commas), format!("{}", spaces));
        assert_eq!(commas.dims(), (3, 2));
        assert_eq!(commas.islands().len(), 2);
    }

    #[test]
    fn reject_ragged_rows() {
        let err = "1 0 1\n1 0\n".parse::<Grid>().unwrap_err();
        assert_eq!(err.reasons, vec![InvalidReason::NotRectangular { row: 1, expected: 3, found: 2 }]);
    }

    #[test]
    fn reject_without_islands() {
        let err = "0 0\n0 0\n".parse::<Grid>().unwrap_err();
        assert_eq!(err.reasons, vec![InvalidReason::NoIslands]);
        let err = "".parse::<Grid>().unwrap_err();
        assert_eq!(err.reasons, vec![InvalidReason::Empty]);
    }

    #[test]
    fn reject_bad_token() {
        let err = "1, x, 1\n".parse::<Grid>().unwrap_err();
        assert_eq!(err.reasons, vec![InvalidReason::BadToken { row: 0, column: 1, token: "x".to_string() }]);
    }

    #[test]
    fn builder_invalid_states() {
        let mut builder = GridBuilder::with_dims((NonZero::new(3).unwrap(), NonZero::new(2).unwrap()));
        builder.add_island(Location(3, 0), 2);
        assert_eq!(builder.is_valid(), Some(&vec![InvalidReason::OutOfBounds { location: Location(3, 0) }]));
        // further changes are ignored once invalid
        builder.add_island(Location(0, 0), 2);
        assert!(builder.build().is_err());

        let mut builder = GridBuilder::with_dims((NonZero::new(3).unwrap(), NonZero::new(2).unwrap()));
        builder.add_island(Location(0, 0), 0);
        assert_eq!(builder.is_valid(), Some(&vec![InvalidReason::IslandValue { location: Location(0, 0), value: 0 }]));
    }

    #[test]
    fn pop_and_drop() {
        let grid = GridBuilder::with_dims((NonZero::new(3).unwrap(), NonZero::new(1).unwrap()))
            .add_island(Location(0, 0), 1)
            .add_island(Location(1, 0), 3)
            .add_island(Location(2, 0), 1)
            .pop_island()
            .drop_location(Location(1, 0))
            .add_island(Location(2, 0), 1)
            .build()
            .unwrap();

        assert_eq!(format!("{}", grid), "1.1\n");
        assert_eq!(grid.potential_edges().len(), 1);
    }
}
