use crate::grid::Edge;

/// Whether two edges intersect strictly inside both of their spans.
///
/// Edges of the same orientation never cross; overlapping parallel edges cannot arise since islands only see their first neighbor.
/// Sharing an endpoint is not a crossing.
pub fn crosses(a: &Edge, b: &Edge) -> bool {
    if a.orientation == b.orientation {
        return false;
    }

    let (horizontal, vertical) = if a.is_horizontal() { (a, b) } else { (b, a) };

    let row = horizontal.locations.0.row();
    let (c_min, c_max) = min_max(horizontal.locations.0.col(), horizontal.locations.1.col());
    let col = vertical.locations.0.col();
    let (r_min, r_max) = min_max(vertical.locations.0.row(), vertical.locations.1.row());

    r_min < row && row < r_max && c_min < col && col < c_max
}

#[inline]
fn min_max(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
