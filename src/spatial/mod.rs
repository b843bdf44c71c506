//! Spatial data structures and the collapse orchestration
//!
//! This module contains spatial-related functionality including:
//! - Direction and rotation primitives
//! - Tile definitions and the deployment catalog
//! - The grid of superposed cells and its snapshots

/// Directions, rotations and per-direction maps
pub mod direction;
/// Grid state, collapse loop and snapshots
pub mod grid;
/// Tile definitions, rotation expansion and the deployment catalog
pub mod tiles;

pub use grid::{CellState, Grid, Snapshot};
