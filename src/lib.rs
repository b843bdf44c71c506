//! Wave function collapse over a square grid of socket-matched tiles
//!
//! Tiles declare which sockets they offer on each edge. Every cell starts in
//! superposition over all oriented tiles; cells are collapsed in order of
//! lowest remaining candidate count and constraints propagate to neighbors
//! until the grid is resolved or contradictions are reached.

#![forbid(unsafe_code)]

/// Socket compatibility, cell superpositions, selection and propagation
pub mod algorithm;
/// Rule loading, rendering, progress reporting and error handling
pub mod io;
/// Random selection utilities
pub mod math;
/// Directions, tiles and the grid
pub mod spatial;

pub use io::error::{GenerationError, Result};
pub use spatial::grid::{CellState, Coordinate, Grid, RunStatus, Snapshot};
