//! The puzzle: islands, and the potential edges between islands that see each other.

use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Dfs;
use strum::VariantArray;
use unordered_pair::UnorderedPair;

use crate::cell::Cell;
use crate::crossing::crosses;
use crate::location::{Dimension, Location};
use crate::shape::{Orientation, SquareStep};

/// Index of an island within its [`Grid`]. Islands are numbered in row-major order.
pub type IslandId = usize;
/// Index of a potential edge within its [`Grid`].
pub type EdgeId = usize;

/// A numbered cell requiring exactly `value` incident bridge endpoints.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Island {
    pub(crate) id: IslandId,
    pub(crate) location: Location,
    pub(crate) value: u8,
}

impl Island {
    /// The row-major index of this island.
    pub fn id(&self) -> IslandId {
        self.id
    }

    /// Where this island sits on the grid.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The row of this island.
    pub fn row(&self) -> usize {
        self.location.row()
    }

    /// The column of this island.
    pub fn col(&self) -> usize {
        self.location.col()
    }

    /// The number of bridges this island requires.
    pub fn value(&self) -> u8 {
        self.value
    }
}

/// A candidate bridge location between two line-of-sight adjacent islands.
///
/// Endpoints are canonical: the island with the smaller [`IslandId`] comes first.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    pub(crate) endpoints: (IslandId, IslandId),
    pub(crate) locations: (Location, Location),
    pub(crate) orientation: Orientation,
}

impl Edge {
    /// The two islands joined by this edge, smaller id first.
    pub fn endpoints(&self) -> (IslandId, IslandId) {
        self.endpoints
    }

    /// The locations of the two endpoints, in the same order as [`Self::endpoints`].
    pub fn locations(&self) -> (Location, Location) {
        self.locations
    }

    /// The axis any bridge on this edge runs along.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether both endpoints share a row.
    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    /// Locations strictly between the two endpoints.
    pub(crate) fn interior(&self) -> impl Iterator<Item=Location> {
        let (a, b) = self.locations;
        let horizontal = self.is_horizontal();
        let (lo, hi) = if horizontal { (a.col(), b.col()) } else { (a.row(), b.row()) };
        ((lo.min(hi) + 1)..lo.max(hi)).map(move |i| if horizontal { Location(i, a.row()) } else { Location(a.col(), i) })
    }
}

/// A Hashiwokakero puzzle: the raw cell values, the islands found in them, and the potential edges between those islands.
///
/// Grids are built with a [`Builder`](crate::builder::Builder) such as [`GridBuilder`](crate::builder::GridBuilder), or parsed from text.
/// They are read-only once built.
pub struct Grid {
    pub(crate) dims: (Dimension, Dimension),
    pub(crate) cells: Array2<u8>,
    pub(crate) islands: Vec<Island>,
    neighbors: Vec<Vec<IslandId>>,
    edges: Vec<Edge>,
    incident: Vec<Vec<EdgeId>>,
    crossings: Vec<Vec<EdgeId>>,
    edge_index: HashMap<UnorderedPair<IslandId>, EdgeId>,
}

impl Grid {
    /// Derive islands, line-of-sight neighbors, potential edges and crossing pairs from raw cell values.
    /// `cells` must contain at least one nonzero value; the builder checks this.
    pub(crate) fn from_cells(dims: (Dimension, Dimension), cells: Array2<u8>) -> Self {
        let mut island_at = Array2::from_elem(cells.raw_dim(), None);
        let islands = cells.indexed_iter()
            .filter(|(_, value)| **value > 0)
            .enumerate()
            .map(|(id, (index, value))| {
                island_at[index] = Some(id);
                Island { id, location: Location::from(index), value: *value }
            })
            .collect_vec();

        let neighbors = islands.iter()
            .map(|island| SquareStep::VARIANTS.iter()
                .filter_map(|step| {
                    // islands do not see past the first island in a direction
                    let mut location = step.attempt_from(island.location);
                    while let Some(slot) = island_at.get(location.as_index()) {
                        if slot.is_some() {
                            return *slot;
                        }
                        location = step.attempt_from(location);
                    }
                    None
                })
                .collect_vec())
            .collect_vec();

        let mut edges = Vec::new();
        let mut incident = vec![Vec::new(); islands.len()];
        let mut edge_index = HashMap::new();
        for island in &islands {
            for &other in &neighbors[island.id] {
                if island.id < other {
                    let id = edges.len();
                    let locations = (island.location, islands[other].location);
                    edges.push(Edge {
                        endpoints: (island.id, other),
                        locations,
                        orientation: Orientation::between(locations.0, locations.1),
                    });
                    incident[island.id].push(id);
                    incident[other].push(id);
                    edge_index.insert(UnorderedPair(island.id, other), id);
                }
            }
        }

        let mut crossings = vec![Vec::new(); edges.len()];
        for ((i, a), (j, b)) in edges.iter().enumerate().tuple_combinations() {
            if crosses(a, b) {
                crossings[i].push(j);
                crossings[j].push(i);
            }
        }

        Self { dims, cells, islands, neighbors, edges, incident, crossings, edge_index }
    }

    /// Width and height of this grid.
    pub fn dims(&self) -> (usize, usize) {
        (self.dims.0.get(), self.dims.1.get())
    }

    /// Every island, indexed by [`IslandId`].
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// The island with index `id`.
    pub fn island(&self, id: IslandId) -> &Island {
        &self.islands[id]
    }

    /// The first visible island in each of the four axis directions, at most four in total.
    pub fn neighbors(&self, island: IslandId) -> impl Iterator<Item=&Island> + '_ {
        self.neighbors[island].iter().map(|id| &self.islands[*id])
    }

    pub(crate) fn neighbor_ids(&self, island: IslandId) -> &[IslandId] {
        &self.neighbors[island]
    }

    /// All potential edges, de-duplicated and indexed by [`EdgeId`].
    pub fn potential_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The potential edge with index `id`.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Potential edges with `island` as an endpoint.
    pub fn incident_edges(&self, island: IslandId) -> &[EdgeId] {
        &self.incident[island]
    }

    /// The potential edge joining `a` and `b` in either order, if they see each other.
    pub fn edge_between(&self, a: IslandId, b: IslandId) -> Option<EdgeId> {
        self.edge_index.get(&UnorderedPair(a, b)).copied()
    }

    /// Edges which cross `edge`.
    pub fn crossing_edges(&self, edge: EdgeId) -> &[EdgeId] {
        &self.crossings[edge]
    }

    /// Every crossing pair of edges, each reported once with the smaller [`EdgeId`] first.
    pub fn crossing_pairs(&self) -> impl Iterator<Item=(EdgeId, EdgeId)> + '_ {
        self.crossings.iter().enumerate()
            .flat_map(|(i, others)| others.iter().filter(move |j| **j > i).map(move |j| (i, *j)))
    }

    /// A grid with a single island is considered solved by the empty assignment.
    pub fn is_trivial(&self) -> bool {
        self.islands.len() <= 1
    }

    /// Whether the edges with a positive entry in `counts` connect every island.
    pub(crate) fn spans_all(&self, counts: &[u8]) -> bool {
        let mut graph: UnGraphMap<IslandId, ()> = UnGraphMap::with_capacity(self.islands.len(), self.edges.len());
        for island in &self.islands {
            graph.add_node(island.id);
        }
        for (edge, count) in self.edges.iter().zip(counts) {
            if *count > 0 {
                graph.add_edge(edge.endpoints.0, edge.endpoints.1, ());
            }
        }

        let mut visited = 0;
        let mut dfs = Dfs::new(&graph, 0);
        while dfs.next(&graph).is_some() {
            visited += 1;
        }

        visited == self.islands.len()
    }

    /// The grid as an array of frozen cells, without any bridges.
    pub(crate) fn frozen(&self) -> Array2<Cell> {
        self.cells.map(|value| match *value {
            0 => Cell::Empty,
            value => Cell::Island { value },
        })
    }
}

pub(crate) fn print(cells: &Array2<Cell>, empty: &'static str) -> String {
    let mut out = String::with_capacity(cells.nrows() * (cells.ncols() + 1));

    for row in cells.rows() {
        for cell in row {
            out.push_str(&cell.glyph(empty));
        }
        out.push('\n');
    }

    out
}

impl Debug for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("dims", &self.dims())
            .field("islands", &self.islands)
            .field("edges", &self.edges)
            .finish_non_exhaustive()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", print(&self.frozen(), "."))
    }
}
