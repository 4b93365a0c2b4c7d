use std::fmt::{Display, Formatter};

use crate::shape::Orientation;

/// A cell of a grid, frozen for output or printing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Cell {
    Island { value: u8 },
    Bridge { count: u8, orientation: Orientation },
    #[default]
    Empty,
}

impl Cell {
    pub(crate) fn glyph(&self, empty: &'static str) -> String {
        match self {
            Cell::Island { value } => value.to_string(),
            Cell::Bridge { count, orientation } => match (orientation, count) {
                (Orientation::Horizontal, 1) => "-",
                (Orientation::Horizontal, _) => "=",
                (Orientation::Vertical, 1) => "|",
                (Orientation::Vertical, _) => "$",
            }.to_string(),
            Cell::Empty => empty.to_string(),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph("."))
    }
}
