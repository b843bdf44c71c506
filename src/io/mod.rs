//! Input/output: rule and graphics files, rendering, progress and the CLI

/// Command-line interface and generation driver
pub mod cli;
/// Generation constants and defaults
pub mod configuration;
/// Error types and constructor helpers
pub mod error;
/// Graphics file loading and the tile atlas
pub mod graphics;
/// Snapshot rendering and PNG export
pub mod image;
/// Progress bars for generation attempts
pub mod progress;
/// YAML rule file loading
pub mod rules;
/// Step capture and GIF export
pub mod visualization;
