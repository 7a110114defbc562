//! Command-line interface replaying label sequences through a preemption grid

use crate::analysis::replay::replay_sequence;
use crate::analysis::statistics::RunSummary;
use crate::grid::layout::CellLayout;
use crate::grid::mask::CellMask;
use crate::grid::preemption::{PreemptionConfig, PreemptionGrid};
use crate::io::configuration::{
    ACTIVITY_GIF_NAME, DEFAULT_ITERATIONS, DEFAULT_LOG_LEVEL, DEFAULT_OUTPUT_DIR,
    DEFAULT_PREEMPTION_THRESHOLD, DEFAULT_SEED, DEFAULT_STRIDE, DEFAULT_SYNTHETIC_HEIGHT,
    DEFAULT_SYNTHETIC_WIDTH, FINAL_MASK_NAME, GIF_FRAME_DELAY_MS, SYNTHETIC_ROW_PADDING,
};
use crate::io::error::{GridError, Result, invalid_parameter};
use crate::io::image::{PngSequence, export_mask_overlay};
use crate::io::progress::ReplayProgress;
use crate::io::visualization::ActivityCapture;
use crate::labels::source::{LabelFrame, LabelSource};
use crate::labels::synthetic::SyntheticLabels;
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pregrid")]
#[command(
    author,
    version,
    about = "Replay superpixel label sequences through a preemption grid"
)]
/// Command-line arguments for the replay tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Directory of 16-bit grayscale label maps, replayed in file name order
    #[arg(value_name = "FRAMES", required_unless_present = "synthetic")]
    pub target: Option<PathBuf>,

    /// Replay a generated converging sequence instead of files
    #[arg(long, conflicts_with = "target")]
    pub synthetic: bool,

    /// Cluster stride in pixels
    #[arg(short, long, default_value_t = DEFAULT_STRIDE)]
    pub stride: usize,

    /// Fraction of a cell's S² pixels that must change to keep it updatable
    #[arg(short, long, default_value_t = DEFAULT_PREEMPTION_THRESHOLD)]
    pub threshold: f32,

    /// Disable gating; every cluster stays active and updatable
    #[arg(long)]
    pub no_preemption: bool,

    /// Maximum iterations to replay
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Random seed for synthetic sequences
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Width of synthetic frames in pixels
    #[arg(short = 'W', long, default_value_t = DEFAULT_SYNTHETIC_WIDTH)]
    pub width: usize,

    /// Height of synthetic frames in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_SYNTHETIC_HEIGHT)]
    pub height: usize,

    /// Directory receiving statistics and images
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Export activity masks as an animated GIF and the final mask as PNG
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log specification, e.g. `info` or `preemptive_grid=debug`
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

impl Cli {
    /// Preemption settings requested on the command line
    pub const fn preemption_config(&self) -> PreemptionConfig {
        PreemptionConfig {
            enabled: !self.no_preemption,
            threshold: self.threshold,
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Orchestrates one replay: source selection, grid setup, capture and export
pub struct ReplayProcessor {
    cli: Cli,
}

impl ReplayProcessor {
    /// Create a processor for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the replay and write its outputs
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the frames cannot be
    /// read, or an output cannot be written
    pub fn process(&mut self) -> Result<RunSummary> {
        let config = self.cli.preemption_config();
        config.validate()?;

        let mut source = self.open_source()?;
        let (height, width) = source.dimensions();
        let layout = CellLayout::new(height, width, self.cli.stride)?;
        let mut grid = PreemptionGrid::with_layout(layout);
        info!(
            "replaying {} on a {}x{} cell grid (stride {}, threshold {}, preemption {})",
            source.describe(),
            layout.cell_cols(),
            layout.cell_rows(),
            layout.stride(),
            config.threshold,
            if config.enabled { "on" } else { "off" }
        );

        let progress = self
            .cli
            .should_show_progress()
            .then(|| ReplayProgress::new(&source.describe(), self.cli.iterations));
        let mut capture = self.cli.visualize.then(|| {
            ActivityCapture::new(layout.cell_rows(), layout.cell_cols(), self.cli.iterations)
        });
        let mut last_state: Option<(LabelFrame, CellMask)> = None;

        let summary = replay_sequence(
            &mut grid,
            source.as_mut(),
            &config,
            self.cli.iterations,
            |stats, grid, frame| {
                if let Some(ref progress) = progress {
                    progress.update(stats);
                }
                if let Some(ref mut capture) = capture {
                    capture.record(stats.iteration, grid);
                    last_state = Some((frame.clone(), grid.active_mask().clone()));
                }
            },
        )?;

        if let Some(ref progress) = progress {
            progress.finish(summary.to_string());
        }

        self.write_outputs(&summary, &layout, capture.as_ref(), last_state.as_ref())?;
        Ok(summary)
    }

    fn open_source(&self) -> Result<Box<dyn LabelSource>> {
        if self.cli.synthetic {
            let layout = CellLayout::new(self.cli.height, self.cli.width, self.cli.stride)?;
            return Ok(Box::new(SyntheticLabels::new(
                layout,
                SYNTHETIC_ROW_PADDING,
                self.cli.iterations + 1,
                self.cli.seed,
            )?));
        }

        let target = self
            .cli
            .target
            .as_deref()
            .ok_or_else(|| invalid_parameter("target", &"", &"a frame directory is required"))?;
        if !target.is_dir() {
            return Err(GridError::FileSystem {
                path: target.to_path_buf(),
                operation: "open frame directory",
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }
        Ok(Box::new(PngSequence::from_directory(target)?))
    }

    fn write_outputs(
        &self,
        summary: &RunSummary,
        layout: &CellLayout,
        capture: Option<&ActivityCapture>,
        last_state: Option<&(LabelFrame, CellMask)>,
    ) -> Result<()> {
        let output = self.cli.output.as_path();
        std::fs::create_dir_all(output).map_err(|e| GridError::FileSystem {
            path: output.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;

        let stats_path = Self::stats_path(output);
        std::fs::write(&stats_path, summary.to_csv()).map_err(|e| GridError::FileSystem {
            path: stats_path.clone(),
            operation: "write statistics",
            source: e,
        })?;
        info!("statistics written to {}", stats_path.display());

        if let Some(capture) = capture.filter(|capture| capture.frame_count() > 0) {
            let gif_path = output.join(ACTIVITY_GIF_NAME);
            capture.export_gif(&gif_path, GIF_FRAME_DELAY_MS)?;
            info!("activity animation written to {}", gif_path.display());
        }

        if let Some((frame, mask)) = last_state {
            let mask_path = output.join(FINAL_MASK_NAME);
            export_mask_overlay(&frame.view()?, layout, mask, &mask_path)?;
            info!("final mask written to {}", mask_path.display());
        }

        Ok(())
    }

    /// Path of the CSV statistics file inside `output`
    pub fn stats_path(output: &Path) -> PathBuf {
        output.join("stats.csv")
    }
}
