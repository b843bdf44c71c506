//! Snapshot rendering to RGBA images and PNG files

use std::path::Path;

use image::{Rgba, RgbaImage, imageops};

use crate::io::configuration::{INVALID_COLOR, MAX_CANVAS_DIMENSION, UNRESOLVED_COLOR};
use crate::io::error::{GenerationError, Result, file_system, invalid_parameter};
use crate::io::graphics::TileAtlas;
use crate::spatial::grid::{CellState, Coordinate, Snapshot};

/// Edge length in pixels of a rendered `size`×`size` grid
///
/// # Errors
///
/// Returns an error if the side overflows or exceeds `MAX_CANVAS_DIMENSION`
pub fn canvas_side(size: usize, tile_pixels: u32) -> Result<u32> {
    u32::try_from(size)
        .ok()
        .and_then(|cells| cells.checked_mul(tile_pixels))
        .filter(|&side| side <= MAX_CANVAS_DIMENSION)
        .ok_or_else(|| {
            invalid_parameter(
                "tile_pixels",
                &tile_pixels,
                &format!(
                    "a {size}x{size} grid of {tile_pixels}px cells exceeds {MAX_CANVAS_DIMENSION}px per side"
                ),
            )
        })
}

/// Draw every cell of `snapshot` using tiles from `atlas`
///
/// Collapsed cells show their tile image turned by the deployed rotation;
/// unresolved and invalid cells are filled with marker colours.
///
/// # Errors
///
/// Returns an error if the canvas would be too large or a collapsed tile has
/// no image in the atlas
pub fn render_snapshot(snapshot: &Snapshot, atlas: &TileAtlas) -> Result<RgbaImage> {
    let tile_pixels = atlas.tile_pixels();
    let side = canvas_side(snapshot.size(), tile_pixels)?;
    let mut canvas = RgbaImage::from_pixel(side, side, Rgba(UNRESOLVED_COLOR));
    let invalid = RgbaImage::from_pixel(tile_pixels, tile_pixels, Rgba(INVALID_COLOR));

    for ([row, col], state) in snapshot.iter() {
        let x = i64::from(col as u32 * tile_pixels);
        let y = i64::from(row as u32 * tile_pixels);
        match state {
            CellState::Unresolved { .. } => {}
            CellState::Invalid => imageops::replace(&mut canvas, &invalid, x, y),
            CellState::Collapsed { tile, rotation } => {
                let image = atlas.oriented(tile, *rotation)?;
                imageops::replace(&mut canvas, &image, x, y);
            }
        }
    }

    Ok(canvas)
}

/// Render `snapshot` and save it as a PNG
///
/// # Errors
///
/// Returns an error if:
/// - A collapsed tile has no image in the atlas
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_snapshot_png(
    snapshot: &Snapshot,
    atlas: &TileAtlas,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let output_path = output_path.as_ref();
    let canvas = render_snapshot(snapshot, atlas)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|source| file_system(parent, "create directory", source))?;
    }

    canvas
        .save(output_path)
        .map_err(|source| GenerationError::ImageExport {
            path: output_path.to_path_buf(),
            source,
        })
}

/// Grid coordinate under pixel `(x, y)` of a rendered `size`×`size` grid
///
/// Returns `None` for pixels outside the rendered area.
pub const fn pixel_to_coordinate(
    x: u32,
    y: u32,
    tile_pixels: u32,
    size: usize,
) -> Option<Coordinate> {
    if tile_pixels == 0 {
        return None;
    }
    let row = (y / tile_pixels) as usize;
    let col = (x / tile_pixels) as usize;
    if row < size && col < size {
        Some([row, col])
    } else {
        None
    }
}
