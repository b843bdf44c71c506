//! Command-line interface for generating a tile grid from a rule file

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};

use crate::io::configuration::{
    DEFAULT_ATTEMPTS, DEFAULT_GRID_SIZE, DEFAULT_SEED, DEFAULT_TILE_PIXELS, GIF_FRAME_DELAY_MS,
    VISUALIZATION_SUFFIX,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::graphics::{TileAtlas, check_tile_pixels, load_graphics};
use crate::io::image::{canvas_side, export_snapshot_png};
use crate::io::progress::RunProgress;
use crate::io::rules::RuleSet;
use crate::io::visualization::VisualizationCapture;
use crate::spatial::grid::{Coordinate, Grid, RunStatus, Snapshot, check_grid_size};
use crate::spatial::tiles::TileCatalog;

#[derive(Parser, Debug)]
#[command(name = "tilewave")]
#[command(
    author,
    version,
    about = "Fill a square grid with socket-matched tiles by wave function collapse"
)]
/// Command-line arguments for the grid generator
pub struct Cli {
    /// YAML rule file declaring sockets and tiles
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// YAML graphics file mapping tile ids to images
    #[arg(short, long)]
    pub graphics: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(short = 'n', long, default_value_t = DEFAULT_GRID_SIZE)]
    pub size: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Attempts before accepting a grid with contradictions (seed increases per retry)
    #[arg(short, long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: usize,

    /// Cell to collapse before automatic selection, as ROW,COL (repeatable)
    #[arg(long = "start", value_name = "ROW,COL", value_parser = parse_coordinate)]
    pub start: Vec<Coordinate>,

    /// Write the rendered grid to this PNG file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write an animated GIF of every collapse step
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Edge length in pixels of one rendered cell
    #[arg(short = 'p', long, default_value_t = DEFAULT_TILE_PIXELS)]
    pub tile_pixels: u32,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Seed used for attempt number `attempt` (1-based)
    pub const fn seed_for_attempt(&self, attempt: usize) -> u64 {
        self.seed.wrapping_add(attempt.saturating_sub(1) as u64)
    }
}

/// Parse a `ROW,COL` pair
///
/// # Errors
///
/// Returns a message if the text is not two comma-separated integers
pub fn parse_coordinate(text: &str) -> std::result::Result<Coordinate, String> {
    let (row, col) = text
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL but got '{text}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid coordinate component '{part}': {e}"))
    };
    Ok([parse(row)?, parse(col)?])
}

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Final state of the accepted attempt
    pub snapshot: Snapshot,
    /// Derived state of the accepted attempt
    pub status: RunStatus,
    /// Seed that produced the accepted attempt
    pub seed: u64,
    /// Number of attempts made
    pub attempts_used: usize,
}

/// Drives rule loading, generation with retries and export
pub struct Generator {
    cli: Cli,
}

impl Generator {
    /// Create a generator for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load rules, generate and write the requested outputs
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The size, attempt count or cell size is out of range
    /// - The rendered grid would exceed `MAX_CANVAS_DIMENSION`
    /// - Rule or graphics loading fails
    /// - An output cannot be written
    pub fn run(&self) -> Result<GenerationOutcome> {
        self.check_arguments()?;
        if self.cli.output.is_some() || self.cli.visualize {
            check_tile_pixels(self.cli.tile_pixels)?;
            canvas_side(self.cli.size, self.cli.tile_pixels)?;
        }

        let catalog = TileCatalog::build(RuleSet::from_path(&self.cli.rules)?.into_definitions())?;
        let mut capture = self
            .visualization_path()
            .map(|_| VisualizationCapture::new(self.cli.size * self.cli.size));

        let outcome = self.generate(&catalog, capture.as_mut())?;

        let needs_atlas = self.cli.output.is_some() || capture.is_some();
        if needs_atlas {
            let atlas = self.build_atlas(&catalog)?;
            if let Some(output) = &self.cli.output {
                export_snapshot_png(&outcome.snapshot, &atlas, output)?;
                info!("Wrote {}", output.display());
            }
            if let (Some(capture), Some(path)) = (&capture, self.visualization_path()) {
                capture.export_gif(&atlas, &path, GIF_FRAME_DELAY_MS)?;
                info!("Wrote {}", path.display());
            }
        }

        Ok(outcome)
    }

    /// Run up to `attempts` generations over `catalog`, stopping at the first
    /// contradiction-free grid
    ///
    /// The last attempt is returned even if it contains contradictions.
    ///
    /// # Errors
    ///
    /// Returns an error if the size, attempt count or a start coordinate is invalid
    pub fn generate(
        &self,
        catalog: &TileCatalog,
        mut capture: Option<&mut VisualizationCapture>,
    ) -> Result<GenerationOutcome> {
        self.check_arguments()?;

        let cells = self.cli.size * self.cli.size;
        let progress = if self.cli.should_show_progress() {
            RunProgress::new(cells, self.cli.attempts)
        } else {
            RunProgress::hidden(cells, self.cli.attempts)
        };

        let mut attempt = 1;
        loop {
            let seed = self.cli.seed_for_attempt(attempt);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = Grid::from_catalog(self.cli.size, catalog.clone())?;

            progress.start_attempt(attempt, seed);
            if let Some(capture) = capture.as_deref_mut() {
                capture.clear();
                capture.record(grid.snapshot());
            }

            for &coordinate in &self.cli.start {
                if grid.collapse_at(coordinate, &mut rng)? {
                    if let Some(capture) = capture.as_deref_mut() {
                        capture.record(grid.snapshot());
                    }
                }
            }

            while grid.collapse_one_step(&mut rng)?.is_some() {
                progress.update(grid.steps());
                if let Some(capture) = capture.as_deref_mut() {
                    capture.record(grid.snapshot());
                }
            }

            let snapshot = grid.snapshot();
            let status = grid.status();
            progress.finish(status, snapshot.resolved_count());

            if status == RunStatus::FullyResolved || attempt >= self.cli.attempts {
                if status == RunStatus::ContainsContradiction {
                    warn!(
                        "Accepting grid with {} contradicted cells after {attempt} attempts",
                        snapshot.invalid_cells().len()
                    );
                }
                return Ok(GenerationOutcome {
                    snapshot,
                    status,
                    seed,
                    attempts_used: attempt,
                });
            }

            info!("Attempt {attempt} with seed {seed} hit a contradiction; retrying");
            attempt += 1;
        }
    }

    fn check_arguments(&self) -> Result<()> {
        check_grid_size(self.cli.size)?;
        if self.cli.attempts == 0 {
            return Err(invalid_parameter(
                "attempts",
                &self.cli.attempts,
                &"must be at least 1",
            ));
        }
        Ok(())
    }

    fn build_atlas(&self, catalog: &TileCatalog) -> Result<TileAtlas> {
        match &self.cli.graphics {
            Some(path) => TileAtlas::from_graphics(&load_graphics(path)?, self.cli.tile_pixels),
            None => TileAtlas::swatches(catalog, self.cli.tile_pixels),
        }
    }

    /// Where the step animation is written, if `--visualize` was given
    pub fn visualization_path(&self) -> Option<PathBuf> {
        if !self.cli.visualize {
            return None;
        }
        let anchor = self.cli.output.as_deref().unwrap_or(&self.cli.rules);
        Some(Self::sibling_path(anchor, VISUALIZATION_SUFFIX, "gif"))
    }

    fn sibling_path(anchor: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = anchor.file_stem().unwrap_or_default();
        let name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

        if let Some(parent) = anchor.parent() {
            parent.join(name)
        } else {
            PathBuf::from(name)
        }
    }
}
