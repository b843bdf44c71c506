//! Terminal progress display for generation attempts

use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressStyle};

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use crate::spatial::grid::RunStatus;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} cells {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar tracking resolved cells across generation attempts
///
/// One bar is reused for every attempt; it is reset when a retry starts.
pub struct RunProgress {
    bar: ProgressBar,
    attempts: usize,
}

impl RunProgress {
    /// Create a bar for a grid with `cell_count` cells and up to `attempts` tries
    pub fn new(cell_count: usize, attempts: usize) -> Self {
        let bar = ProgressBar::new(cell_count as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        Self { bar, attempts }
    }

    /// Hidden bar that draws nothing, for quiet runs and tests
    pub fn hidden(cell_count: usize, attempts: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(cell_count as u64);
        Self { bar, attempts }
    }

    /// Reset the bar for attempt number `attempt` (1-based) using `seed`
    pub fn start_attempt(&self, attempt: usize, seed: u64) {
        self.bar.reset();
        self.bar.set_prefix(format!("attempt {attempt}/{}", self.attempts));
        self.bar.set_message(format!("seed {seed}"));
    }

    /// Report progress after a collapse step
    ///
    /// Only steps are counted here; propagation resolves further cells
    /// without steps of their own, which [`finish`](Self::finish) accounts for.
    pub fn update(&self, steps: usize) {
        self.bar.set_position(steps as u64);
        self.bar.set_message(format!("step {steps}"));
    }

    /// Current bar position
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar with the final resolved count and outcome
    pub fn finish(&self, status: RunStatus, resolved: usize) {
        self.bar.set_position(resolved as u64);
        let message = match status {
            RunStatus::FullyResolved => "resolved",
            RunStatus::ContainsContradiction => "contradiction",
            RunStatus::Running => "stopped",
        };
        self.bar.finish_with_message(message);
    }
}
