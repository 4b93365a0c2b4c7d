#![warn(missing_docs)]

//! # `hashi`
//!
//! A solver for [Hashiwokakero](https://en.wikipedia.org/wiki/Hashiwokakero), also sold as "Bridges".
//! Begin by building a grid using a builder such as [`GridBuilder`](builder::GridBuilder), or parse one from text with [`str::parse`].
//! Then pick a [`Method`] and call [`solve()`], yielding a [`Solution`] which can be validated and rendered over the grid.
//!
//! # Internals
//! Every island sees at most one other island in each axis direction; each such pair is a potential edge carrying 0, 1 or 2 bridges.
//! A solution gives every island exactly as many bridges as its number, never lets two bridges cross, and connects all islands.
//!
//! Four strategies are provided:
//! 1. [`Method::Sat`] expresses the puzzle as a Boolean satisfiability problem (see [`encoder`]) and hands it to `varisat`.
//! Degrees are cardinality constraints over two variables per edge; connectivity is asserted by placing every island at some depth
//! of a spanning tree rooted at the first island, with a bridged neighbor one level closer to the root.
//! 2. [`Method::BestFirst`] searches the same formula itself, by unit propagation and a priority queue keyed on unsatisfied clauses.
//! 3. [`Method::Backtrack`] assigns bridge counts edge by edge on the grid model, pruning overfull islands and crossings as it goes.
//! 4. [`Method::BruteForce`] tries every combination of counts and is only fit for tiny grids.

pub use builder::{Builder, GridBuilder, MalformedGridError};
pub use crossing::crosses;
pub use encoder::EncodingLimits;
pub use grid::{Edge, EdgeId, Grid, Island, IslandId};
pub use location::Location;
pub use solution::{Rendered, Solution, Violation};
pub use strategy::{solve, Method, Report, SolverFailure, Strategy};

mod tests;
pub(crate) mod cell;
pub(crate) mod crossing;
pub(crate) mod location;
pub(crate) mod logic;
pub mod builder;
pub mod encoder;
pub mod grid;
pub mod shape;
pub mod solution;
pub mod strategy;
#[cfg(feature = "wasm")]
pub mod wasm;
