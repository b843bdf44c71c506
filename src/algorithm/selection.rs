use ndarray::Array2;
use rand::Rng;

use crate::algorithm::superposition::{CellStatus, Superposition};
use crate::math::probability::uniform_choice;
use crate::spatial::grid::Coordinate;

/// Coordinates of every superposed cell sharing the minimum entropy
///
/// Invalid and collapsed cells are never candidates. Returns the minimum
/// entropy alongside the tied coordinates in row-major order.
pub fn lowest_entropy_ties(cells: &Array2<Superposition>) -> Option<(usize, Vec<Coordinate>)> {
    let mut lowest: Option<usize> = None;
    let mut ties = Vec::new();

    for ((row, col), cell) in cells.indexed_iter() {
        if cell.status() != CellStatus::Superposed {
            continue;
        }

        let entropy = cell.entropy();
        match lowest {
            Some(current) if entropy > current => {}
            Some(current) if entropy == current => ties.push([row, col]),
            _ => {
                lowest = Some(entropy);
                ties.clear();
                ties.push([row, col]);
            }
        }
    }

    lowest.map(|entropy| (entropy, ties))
}

/// Pick the next cell to collapse
///
/// Chooses uniformly among the superposed cells tied at the lowest entropy,
/// or returns `None` once every cell is collapsed or invalid.
pub fn find_lowest_entropy<R: Rng>(
    cells: &Array2<Superposition>,
    rng: &mut R,
) -> Option<Coordinate> {
    let (_, ties) = lowest_entropy_ties(cells)?;
    uniform_choice(rng, ties.len()).and_then(|choice| ties.get(choice).copied())
}
