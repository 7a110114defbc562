//! Iteration progress display for sequence replay

use crate::analysis::statistics::IterationStats;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar over the iterations of one replay
pub struct ReplayProgress {
    bar: ProgressBar,
}

impl ReplayProgress {
    /// Create a bar for `iterations` iterations labeled with `name`
    pub fn new(name: &str, iterations: usize) -> Self {
        let bar = ProgressBar::new(iterations as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(name.to_string());
        Self { bar }
    }

    /// Advance to the iteration described by `stats`
    pub fn update(&self, stats: &IterationStats) {
        self.bar.set_position(stats.iteration as u64);
        self.bar.set_message(format!(
            "{:.1}% active",
            stats.active_fraction() * 100.0
        ));
    }

    /// Current position of the bar
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar with a final message
    pub fn finish(&self, message: String) {
        self.bar.finish_with_message(message);
    }
}
