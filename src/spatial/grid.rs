//! Square grid of superposed cells and the collapse loop driving it
//!
//! The grid owns the deployment catalog and every cell for one generation
//! run. Each step picks the lowest-entropy cell, collapses it with a weighted
//! random choice and propagates constraints until nothing changes. Results
//! are only read through an immutable [`Snapshot`].

use std::fmt;

use log::debug;
use ndarray::Array2;
use rand::Rng;

use crate::algorithm::propagation::{PropagationStats, propagate_from};
use crate::algorithm::selection::find_lowest_entropy;
use crate::algorithm::superposition::{CellStatus, Superposition};
use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::spatial::direction::Rotation;
use crate::spatial::tiles::{TileCatalog, TileDefinition, TileId};

/// Cell position as `[row, col]`
pub type Coordinate = [usize; 2];

/// Overall state of a run, derived from the cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Some cell still holds more than one candidate
    Running,
    /// Every cell holds exactly one candidate
    FullyResolved,
    /// Nothing left to collapse but at least one cell is invalid
    ContainsContradiction,
}

/// Generation state for one run
#[derive(Clone, Debug)]
pub struct Grid {
    catalog: TileCatalog,
    cells: Array2<Superposition>,
    steps: usize,
    last_propagation: PropagationStats,
}

impl Grid {
    /// Build a `size`×`size` grid whose cells all hold the full catalog
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `size` is zero or exceeds `MAX_GRID_DIMENSION`
    /// - The definitions fail catalog validation
    pub fn new(size: usize, definitions: Vec<TileDefinition>) -> Result<Self> {
        Self::from_catalog(size, TileCatalog::build(definitions)?)
    }

    /// Build a grid over an already validated catalog
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero or exceeds `MAX_GRID_DIMENSION`
    pub fn from_catalog(size: usize, catalog: TileCatalog) -> Result<Self> {
        check_grid_size(size)?;

        let seed = Superposition::full(&catalog)?;
        Ok(Self {
            cells: Array2::from_elem((size, size), seed),
            catalog,
            steps: 0,
            last_propagation: PropagationStats::default(),
        })
    }

    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.cells.nrows()
    }

    /// The deployment catalog shared by every cell
    pub const fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    /// Number of collapses performed so far
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Statistics of the most recent propagation closure
    pub const fn last_propagation(&self) -> PropagationStats {
        self.last_propagation
    }

    /// Remaining candidate count at `coordinate`
    pub fn entropy_at(&self, coordinate: Coordinate) -> Option<usize> {
        self.cells.get(coordinate).map(Superposition::entropy)
    }

    /// Derived run state
    pub fn status(&self) -> RunStatus {
        let mut contradiction = false;
        for cell in &self.cells {
            match cell.status() {
                CellStatus::Superposed => return RunStatus::Running,
                CellStatus::Invalid => contradiction = true,
                CellStatus::Collapsed => {}
            }
        }

        if contradiction {
            RunStatus::ContainsContradiction
        } else {
            RunStatus::FullyResolved
        }
    }

    /// Collapse cells until none is left in superposition
    ///
    /// Contradictions do not stop the run; remaining cells keep resolving.
    /// Returns the number of steps performed by this call.
    ///
    /// # Errors
    ///
    /// Returns an error only if an internal precondition is violated
    pub fn collapse<R: Rng>(&mut self, rng: &mut R) -> Result<usize> {
        let mut performed = 0;
        while self.collapse_one_step(rng)?.is_some() {
            performed += 1;
        }
        Ok(performed)
    }

    /// Resolve the lowest-entropy cell and propagate its consequences
    ///
    /// Returns the collapsed coordinate, or `None` when the run is over.
    ///
    /// # Errors
    ///
    /// Returns an error only if an internal precondition is violated
    pub fn collapse_one_step<R: Rng>(&mut self, rng: &mut R) -> Result<Option<Coordinate>> {
        let Some(coordinate) = find_lowest_entropy(&self.cells, rng) else {
            return Ok(None);
        };

        self.collapse_at(coordinate, rng)?;
        Ok(Some(coordinate))
    }

    /// Force-resolve `coordinate` and propagate its consequences
    ///
    /// Collapsed and invalid cells are left untouched and `false` is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if `coordinate` lies outside the grid
    pub fn collapse_at<R: Rng>(&mut self, coordinate: Coordinate, rng: &mut R) -> Result<bool> {
        let size = self.size();
        let cell = self
            .cells
            .get_mut(coordinate)
            .ok_or(GenerationError::InvalidCoordinate { coordinate, size })?;

        if cell.status() != CellStatus::Superposed {
            return Ok(false);
        }

        let chosen = cell.collapse(&self.catalog, rng)?;
        self.steps += 1;

        if let Some((id, rotation)) = self.catalog.describe(chosen) {
            debug!(
                "Step {}: collapsed ({}, {}) to tile '{id}' rotated {rotation}",
                self.steps, coordinate[0], coordinate[1]
            );
        }

        self.last_propagation = propagate_from(&mut self.cells, &self.catalog, coordinate);
        Ok(true)
    }

    /// Immutable view of every cell's resolution state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.cells.map(|cell| self.cell_state(cell)),
        }
    }

    fn cell_state(&self, cell: &Superposition) -> CellState {
        match cell.status() {
            CellStatus::Invalid => CellState::Invalid,
            CellStatus::Superposed => CellState::Unresolved {
                entropy: cell.entropy(),
            },
            CellStatus::Collapsed => cell
                .collapsed_deployment()
                .ok()
                .and_then(|index| self.catalog.describe(index))
                .map_or(CellState::Invalid, |(id, rotation)| CellState::Collapsed {
                    tile: id.clone(),
                    rotation,
                }),
        }
    }
}

/// Reject grid side lengths outside `1..=MAX_GRID_DIMENSION`
///
/// # Errors
///
/// Returns an error if `size` is zero or exceeds `MAX_GRID_DIMENSION`
pub fn check_grid_size(size: usize) -> Result<()> {
    if size == 0 || size > MAX_GRID_DIMENSION {
        return Err(invalid_parameter(
            "size",
            &size,
            &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
        ));
    }
    Ok(())
}

/// Externally visible state of one cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellState {
    /// Still in superposition
    Unresolved {
        /// Remaining candidate count
        entropy: usize,
    },
    /// Resolved to one oriented tile
    Collapsed {
        /// Chosen tile
        tile: TileId,
        /// Orientation relative to the authored tile
        rotation: Rotation,
    },
    /// Contradiction: no candidate survived propagation
    Invalid,
}

/// Read-only copy of a grid's cell states
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    cells: Array2<CellState>,
}

impl Snapshot {
    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.cells.nrows()
    }

    /// State of the cell at `coordinate`
    pub fn get(&self, coordinate: Coordinate) -> Option<&CellState> {
        self.cells.get(coordinate)
    }

    /// Iterate `(coordinate, state)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &CellState)> {
        self.cells
            .indexed_iter()
            .map(|((row, col), state)| ([row, col], state))
    }

    /// Every cell collapsed, none invalid
    pub fn is_fully_resolved(&self) -> bool {
        self.cells
            .iter()
            .all(|state| matches!(state, CellState::Collapsed { .. }))
    }

    /// Coordinates of contradicted cells
    pub fn invalid_cells(&self) -> Vec<Coordinate> {
        self.iter()
            .filter(|(_, state)| matches!(state, CellState::Invalid))
            .map(|(coordinate, _)| coordinate)
            .collect()
    }

    /// Number of collapsed cells
    pub fn resolved_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|state| matches!(state, CellState::Collapsed { .. }))
            .count()
    }
}

fn rotation_marker(rotation: Rotation) -> &'static str {
    match rotation {
        Rotation::None => "",
        Rotation::Clockwise => ">",
        Rotation::Half => "v",
        Rotation::Anticlockwise => "<",
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = self.cells.map(|state| match state {
            CellState::Unresolved { .. } => "?".to_string(),
            CellState::Invalid => "!".to_string(),
            CellState::Collapsed { tile, rotation } => {
                format!("{tile}{}", rotation_marker(*rotation))
            }
        });
        let width = tokens.iter().map(String::len).max().unwrap_or(1);

        for row in tokens.rows() {
            let line: Vec<String> = row.iter().map(|token| format!("{token:>width$}")).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
