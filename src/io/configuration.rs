//! Generation constants and runtime configuration defaults

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default side length of the square grid
pub const DEFAULT_GRID_SIZE: usize = 8;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid side length
pub const MAX_GRID_DIMENSION: usize = 1024;

/// Default number of generation attempts before accepting a contradiction
pub const DEFAULT_ATTEMPTS: usize = 1;

/// Rule and graphics file schema versions this build understands
pub const SUPPORTED_RULE_VERSIONS: &[u64] = &[1];

/// Edge length in pixels of one rendered cell
pub const DEFAULT_TILE_PIXELS: u32 = 32;

/// Largest accepted edge length of one rendered cell
pub const MAX_TILE_PIXELS: u32 = 512;

// Caps a rendered RGBA frame at 1 GiB
/// Largest edge length in pixels of a rendered grid
pub const MAX_CANVAS_DIMENSION: u32 = 16_384;

// Fallback swatches draw a darker band along the authored top edge
/// Fraction of the tile height used for the orientation notch
pub const ORIENTATION_NOTCH_FRACTION: u32 = 6;

/// Colour for cells still in superposition
pub const UNRESOLVED_COLOR: [u8; 4] = [40, 40, 40, 255];
/// Colour marking contradictions
pub const INVALID_COLOR: [u8; 4] = [220, 0, 220, 255];

// Output settings
/// Suffix added to visualization filenames
pub const VISUALIZATION_SUFFIX: &str = "_steps";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 20;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
/// Multiplier applied to the delay of the closing frame
pub const FINAL_FRAME_HOLD: u32 = 25;

/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
