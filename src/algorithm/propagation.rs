use std::collections::VecDeque;

use log::{trace, warn};
use ndarray::Array2;

use crate::algorithm::superposition::Superposition;
use crate::spatial::direction::Direction;
use crate::spatial::grid::Coordinate;
use crate::spatial::tiles::TileCatalog;

/// Directed adjacency between two grid cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Cell whose candidates constrain the target
    pub source: Coordinate,
    /// Cell being constrained
    pub target: Coordinate,
    /// Direction from `source` to `target`
    pub direction: Direction,
}

/// Work performed by one propagation closure
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Edges popped from the worklist
    pub edges_processed: usize,
    /// Candidates removed across all targets
    pub candidates_removed: usize,
    /// Cells driven to zero candidates
    pub contradictions: usize,
}

/// Neighbor of `coordinate` one step in `direction`, if inside `dims` (rows, cols)
///
/// The grid does not wrap around.
pub fn neighbor(
    coordinate: Coordinate,
    direction: Direction,
    dims: (usize, usize),
) -> Option<Coordinate> {
    let [dr, dc] = direction.offset();
    let row = coordinate[0].checked_add_signed(dr)?;
    let col = coordinate[1].checked_add_signed(dc)?;
    (row < dims.0 && col < dims.1).then_some([row, col])
}

/// Edges from `coordinate` to each of its up to four in-bounds neighbors
pub fn outgoing_edges(coordinate: Coordinate, dims: (usize, usize)) -> impl Iterator<Item = Edge> {
    Direction::ALL.into_iter().filter_map(move |direction| {
        neighbor(coordinate, direction, dims).map(|target| Edge {
            source: coordinate,
            target,
            direction,
        })
    })
}

/// Propagate constraints outward from `origin` until no cell changes
///
/// Each popped edge narrows its target against the source's remaining
/// sockets. A target that changed and is still valid enqueues its own
/// outgoing edges except the one pointing straight back at the source.
/// Cells may be enqueued more than once; this only costs repeated work since
/// narrowing is idempotent, and the loop ends because the total candidate
/// count across the grid only decreases.
pub fn propagate_from(
    cells: &mut Array2<Superposition>,
    catalog: &TileCatalog,
    origin: Coordinate,
) -> PropagationStats {
    let dims = cells.dim();
    let mut stats = PropagationStats::default();
    let mut worklist: VecDeque<Edge> = outgoing_edges(origin, dims).collect();

    while let Some(edge) = worklist.pop_front() {
        stats.edges_processed += 1;

        // A source emptied after this edge was queued constrains nothing
        let Some(source) = cells.get(edge.source).filter(|source| source.is_valid()) else {
            continue;
        };
        let offered = source.facing_sockets(edge.direction, catalog);

        let Some(target) = cells.get_mut(edge.target) else {
            continue;
        };
        let before = target.entropy();
        if !target.restrict(edge.direction, &offered, catalog) {
            continue;
        }
        stats.candidates_removed += before - target.entropy();

        if !target.is_valid() {
            stats.contradictions += 1;
            warn!(
                "Contradiction at ({}, {}) while propagating from ({}, {})",
                edge.target[0], edge.target[1], edge.source[0], edge.source[1]
            );
            continue;
        }

        worklist.extend(
            outgoing_edges(edge.target, dims).filter(|next| next.target != edge.source),
        );
    }

    trace!(
        "Propagation from ({}, {}): {} edges, {} candidates removed, {} contradictions",
        origin[0],
        origin[1],
        stats.edges_processed,
        stats.candidates_removed,
        stats.contradictions
    );

    stats
}
