//! Drives a preemption grid through a label sequence the way a clustering loop does

use log::info;

use crate::analysis::statistics::{IterationStats, RunSummary};
use crate::grid::cluster::Cluster;
use crate::grid::preemption::{PreemptionConfig, PreemptionGrid};
use crate::io::error::{GridError, Result, invalid_label_layout};
use crate::labels::source::{LabelFrame, LabelSource};

/// Replay up to `max_iterations` frame pairs from `source` through `grid`
///
/// The grid is initialized from `config`, then each consecutive pair of frames
/// is recorded as old/new assignment. Clusters are seeded one per cell and
/// gated after every update. `on_iteration` sees the statistics, the grid and
/// the newer frame before the next pair is recorded. The grid is finalized
/// once the sequence or the iteration budget runs out.
///
/// # Errors
///
/// Returns an error if `config` is invalid, the source yields no frame,
/// reports dimensions that differ from the grid, or fails to produce a frame
pub fn replay_sequence<F>(
    grid: &mut PreemptionGrid,
    source: &mut dyn LabelSource,
    config: &PreemptionConfig,
    max_iterations: usize,
    mut on_iteration: F,
) -> Result<RunSummary>
where
    F: FnMut(&IterationStats, &PreemptionGrid, &LabelFrame),
{
    let layout = *grid.layout();
    if source.dimensions() != (layout.height(), layout.width()) {
        let (height, width) = source.dimensions();
        return Err(invalid_label_layout(&format!(
            "{} is {width}x{height} but the grid covers {}x{}",
            source.describe(),
            layout.width(),
            layout.height()
        )));
    }

    grid.initialize_with(config)?;
    let clusters = Cluster::seed_grid(&layout);
    let mut previous = source.next_frame()?.ok_or_else(|| GridError::EmptySequence {
        origin: source.describe(),
    })?;

    let mut summary = RunSummary::default();
    for iteration in 1..=max_iterations {
        let Some(current) = source.next_frame()? else {
            break;
        };

        grid.record_old_assignment(previous.labels(), previous.row_stride())?;
        grid.record_new_assignment(current.labels(), current.row_stride())?;

        let stats = IterationStats::collect(iteration, grid, &clusters);
        info!("{stats}");
        on_iteration(&stats, grid, &current);
        summary.record(stats);

        previous = current;
    }

    grid.finalize();
    info!("replay finished: {summary}");
    Ok(summary)
}
