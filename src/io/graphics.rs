//! Tile graphics: YAML image maps and the in-memory atlas used for rendering

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::Deserialize;

use crate::io::configuration::{MAX_TILE_PIXELS, ORIENTATION_NOTCH_FRACTION};
use crate::io::error::{GenerationError, Result, file_system, invalid_parameter};
use crate::io::rules::{RawId, parse_versioned};
use crate::spatial::direction::Rotation;
use crate::spatial::tiles::{TileCatalog, TileId};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphicEntry {
    id: RawId,
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct GraphicsDocument {
    graphics: Vec<GraphicEntry>,
}

/// Parse a graphics file body into tile id → image path
///
/// Relative paths are resolved against `base_dir`.
///
/// # Errors
///
/// Returns an error if the version is unsupported, the document is
/// malformed, or a tile id appears twice
pub fn parse_graphics(text: &str, base_dir: &Path) -> Result<HashMap<TileId, PathBuf>> {
    let document: GraphicsDocument = parse_versioned(text, "graphics entries")?;
    let mut graphics = HashMap::new();

    for entry in document.graphics {
        let id = TileId(entry.id.to_string());
        if graphics.contains_key(&id) {
            return Err(invalid_parameter(
                "graphics",
                &id,
                &"tile id is listed more than once",
            ));
        }
        graphics.insert(id, base_dir.join(entry.path));
    }

    Ok(graphics)
}

/// Read a graphics file, resolving image paths relative to its directory
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse
pub fn load_graphics(path: impl AsRef<Path>) -> Result<HashMap<TileId, PathBuf>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|source| file_system(path, "read graphics", source))?;
    parse_graphics(&text, path.parent().unwrap_or_else(|| Path::new("")))
}

/// Square tile images keyed by tile id, all of one size
#[derive(Clone, Debug)]
pub struct TileAtlas {
    tile_pixels: u32,
    images: HashMap<TileId, RgbaImage>,
}

impl TileAtlas {
    /// Empty atlas with the given cell size
    ///
    /// # Errors
    ///
    /// Returns an error if `tile_pixels` is zero or exceeds `MAX_TILE_PIXELS`
    pub fn new(tile_pixels: u32) -> Result<Self> {
        check_tile_pixels(tile_pixels)?;
        Ok(Self {
            tile_pixels,
            images: HashMap::new(),
        })
    }

    /// Load every image listed in `graphics`, scaled to `tile_pixels`
    ///
    /// # Errors
    ///
    /// Returns an error if `tile_pixels` is out of range or any image fails to load
    pub fn from_graphics(graphics: &HashMap<TileId, PathBuf>, tile_pixels: u32) -> Result<Self> {
        let mut atlas = Self::new(tile_pixels)?;
        for (id, path) in graphics {
            let image = image::open(path)
                .map_err(|source| GenerationError::ImageLoad {
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();
            atlas.insert(id.clone(), image);
        }
        Ok(atlas)
    }

    /// Generated solid-colour tiles for every definition in `catalog`
    ///
    /// Each swatch has a darker band along its authored top edge so that
    /// rotations stay visible.
    ///
    /// # Errors
    ///
    /// Returns an error if `tile_pixels` is out of range
    pub fn swatches(catalog: &TileCatalog, tile_pixels: u32) -> Result<Self> {
        let mut atlas = Self::new(tile_pixels)?;
        let count = catalog.definitions().len();
        let notch = (tile_pixels / ORIENTATION_NOTCH_FRACTION).max(1);

        for (index, definition) in catalog.definitions().iter().enumerate() {
            let color = swatch_color(index, count);
            let shade = Rgba([color[0] / 2, color[1] / 2, color[2] / 2, 255]);
            let image = RgbaImage::from_fn(tile_pixels, tile_pixels, |_, y| {
                if y < notch { shade } else { Rgba(color) }
            });
            atlas.insert(definition.id.clone(), image);
        }
        Ok(atlas)
    }

    /// Register an image, scaling it to the atlas cell size
    pub fn insert(&mut self, id: TileId, image: RgbaImage) {
        let image = if image.dimensions() == (self.tile_pixels, self.tile_pixels) {
            image
        } else {
            imageops::resize(
                &image,
                self.tile_pixels,
                self.tile_pixels,
                FilterType::Nearest,
            )
        };
        self.images.insert(id, image);
    }

    /// Edge length of every tile image
    pub const fn tile_pixels(&self) -> u32 {
        self.tile_pixels
    }

    /// Whether `id` has an image
    pub fn contains(&self, id: &TileId) -> bool {
        self.images.contains_key(id)
    }

    /// Image for `id` turned by `rotation`
    ///
    /// # Errors
    ///
    /// Returns an error if the atlas has no image for `id`
    pub fn oriented(&self, id: &TileId, rotation: Rotation) -> Result<RgbaImage> {
        let image = self
            .images
            .get(id)
            .ok_or_else(|| GenerationError::UnknownTileGraphic {
                tile: id.to_string(),
            })?;
        Ok(match rotation {
            Rotation::None => image.clone(),
            Rotation::Clockwise => imageops::rotate90(image),
            Rotation::Half => imageops::rotate180(image),
            Rotation::Anticlockwise => imageops::rotate270(image),
        })
    }
}

/// Reject cell sizes outside `1..=MAX_TILE_PIXELS`
///
/// # Errors
///
/// Returns an error if `tile_pixels` is zero or exceeds `MAX_TILE_PIXELS`
pub fn check_tile_pixels(tile_pixels: u32) -> Result<()> {
    if tile_pixels == 0 || tile_pixels > MAX_TILE_PIXELS {
        return Err(invalid_parameter(
            "tile_pixels",
            &tile_pixels,
            &format!("must be between 1 and {MAX_TILE_PIXELS}"),
        ));
    }
    Ok(())
}

/// Evenly spaced hues around the colour wheel
fn swatch_color(index: usize, count: usize) -> [u8; 4] {
    let hue = index as f64 / count.max(1) as f64 * 6.0;
    let sector = hue.floor();
    let fraction = hue - sector;
    let rising = (fraction * 200.0) as u8 + 40;
    let falling = ((1.0 - fraction) * 200.0) as u8 + 40;
    let (high, low) = (240, 40);

    match sector as u8 % 6 {
        0 => [high, rising, low, 255],
        1 => [falling, high, low, 255],
        2 => [low, high, rising, 255],
        3 => [low, falling, high, 255],
        4 => [rising, low, high, 255],
        _ => [high, low, falling, 255],
    }
}
