//! Frame capture and GIF generation for step-by-step collapse playback

use std::path::Path;

use image::codecs::gif::GifEncoder;
use image::{Delay, Frame};

use crate::io::configuration::{FINAL_FRAME_HOLD, VIEWER_MIN_FRAME_DELAY_MS};
use crate::io::error::{GenerationError, Result, file_system};
use crate::io::graphics::TileAtlas;
use crate::io::image::render_snapshot;
use crate::spatial::grid::Snapshot;

/// Records the grid after each collapse step
///
/// Snapshots are rendered only at export time, so capture stays cheap while
/// the run is in progress.
#[derive(Debug, Default)]
pub struct VisualizationCapture {
    frames: Vec<Snapshot>,
}

impl VisualizationCapture {
    /// Empty capture sized for roughly `expected_steps` frames
    pub fn new(expected_steps: usize) -> Self {
        Self {
            frames: Vec::with_capacity(expected_steps + 1),
        }
    }

    /// Append the current state of the grid
    pub fn record(&mut self, snapshot: Snapshot) {
        self.frames.push(snapshot);
    }

    /// Drop all captured frames, e.g. before a retry
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Returns the total number of captured frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Export the captured frames as a GIF with automatic frame skipping
    ///
    /// If `frame_delay_ms` is below what viewers reliably honour, frames are
    /// skipped so the apparent playback speed is preserved. The last frame
    /// is held longer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - A collapsed tile has no image in the atlas
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(
        &self,
        atlas: &TileAtlas,
        output_path: impl AsRef<Path>,
        frame_delay_ms: u32,
    ) -> Result<()> {
        let output_path = output_path.as_ref();
        if self.frames.is_empty() {
            return Err(GenerationError::Precondition {
                operation: "export_gif",
                reason: "no frames captured for visualization".to_string(),
            });
        }

        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms.max(1)) as usize
        } else {
            1
        };

        let frames = self.generate_frames(atlas, effective_delay_ms, skip_factor)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| file_system(parent, "create directory", source))?;
        }

        let file = std::fs::File::create(output_path)
            .map_err(|source| file_system(output_path, "create file", source))?;

        let mut encoder = GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|source| GenerationError::ImageExport {
                path: output_path.to_path_buf(),
                source,
            })
    }

    fn generate_frames(
        &self,
        atlas: &TileAtlas,
        delay_ms: u32,
        skip_factor: usize,
    ) -> Result<Vec<Frame>> {
        let last = self.frames.len().saturating_sub(1);
        let mut frames = Vec::new();

        for (index, snapshot) in self.frames.iter().enumerate() {
            if index % skip_factor != 0 && index != last {
                continue;
            }
            let delay = if index == last {
                delay_ms * FINAL_FRAME_HOLD
            } else {
                delay_ms
            };
            frames.push(Frame::from_parts(
                render_snapshot(snapshot, atlas)?,
                0,
                0,
                Delay::from_numer_denom_ms(delay, 1),
            ));
        }

        Ok(frames)
    }
}
