//! Directions and bridge orientations.

use std::hash::Hash;

use strum::{Display, VariantArray};

use crate::location::Location;

/// The four axis directions an island can see along.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum SquareStep {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl SquareStep {
    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// Stepping off the top or left edge wraps to a huge coordinate, which any bounds check rejects.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }
}

/// The axis a bridge runs along.
#[derive(Copy, Clone, Display, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[strum(serialize_all = "lowercase")]
pub enum Orientation {
    /// Along a row.
    Horizontal,
    /// Along a column.
    Vertical,
}

impl Orientation {
    /// The orientation of a segment between two distinct locations sharing a row or a column.
    pub(crate) fn between(a: Location, b: Location) -> Self {
        if a.row() == b.row() {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Orientation, SquareStep};
    use crate::location::Location;

    #[test]
    fn steps_move_one_cell() {
        let from = Location(3, 3);
        assert_eq!(SquareStep::Up.attempt_from(from), Location(3, 2));
        assert_eq!(SquareStep::Down.attempt_from(from), Location(3, 4));
        assert_eq!(SquareStep::Left.attempt_from(from), Location(2, 3));
        assert_eq!(SquareStep::Right.attempt_from(from), Location(4, 3));
    }

    #[test]
    fn steps_off_the_corner_leave_bounds() {
        let corner = Location(0, 0);
        assert!(SquareStep::Up.attempt_from(corner).row() > 1000);
        assert!(SquareStep::Left.attempt_from(corner).col() > 1000);
    }

    #[test]
    fn orientation_between() {
        assert_eq!(Orientation::between(Location(0, 4), Location(3, 4)), Orientation::Horizontal);
        assert_eq!(Orientation::between(Location(2, 0), Location(2, 5)), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.to_string(), "vertical");
    }
}
