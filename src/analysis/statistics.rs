//! Per-iteration activity statistics and run summaries

use std::fmt;
use std::fmt::Write as _;

use crate::grid::cluster::Cluster;
use crate::grid::preemption::PreemptionGrid;

/// Snapshot of the grid's decisions after one `record_new_assignment`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationStats {
    /// 1-based clustering iteration
    pub iteration: usize,
    /// Pixels whose label changed in this iteration
    pub changed_pixels: u64,
    /// Cells whose neighborhood exceeded its threshold
    pub updatable_cells: usize,
    /// Cells the next labeling pass must revisit
    pub active_cells: usize,
    /// Total number of cells
    pub cell_count: usize,
    /// Clusters that pass the activity gate
    pub active_clusters: usize,
    /// Clusters allowed to move their center
    pub updatable_clusters: usize,
    /// Total number of clusters queried
    pub cluster_count: usize,
}

impl IterationStats {
    /// Read the current masks and gate every cluster through the grid
    pub fn collect(iteration: usize, grid: &PreemptionGrid, clusters: &[Cluster]) -> Self {
        Self {
            iteration,
            changed_pixels: grid.total_changes(),
            updatable_cells: grid.updatable_mask().count(),
            active_cells: grid.active_mask().count(),
            cell_count: grid.layout().cell_count(),
            active_clusters: grid.active_clusters(clusters).len(),
            updatable_clusters: grid.updatable_clusters(clusters).len(),
            cluster_count: clusters.len(),
        }
    }

    /// Share of cells still active, in `[0, 1]`
    pub fn active_fraction(&self) -> f64 {
        if self.cell_count == 0 {
            return 0.0;
        }
        self.active_cells as f64 / self.cell_count as f64
    }

    /// Cells the next labeling pass may skip
    pub const fn skipped_cells(&self) -> usize {
        self.cell_count.saturating_sub(self.active_cells)
    }
}

impl fmt::Display for IterationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iteration {}: {} changed pixels, {}/{} cells active ({:.1}%), {}/{} updatable, {}/{} clusters active",
            self.iteration,
            self.changed_pixels,
            self.active_cells,
            self.cell_count,
            self.active_fraction() * 100.0,
            self.updatable_cells,
            self.cell_count,
            self.active_clusters,
            self.cluster_count
        )
    }
}

/// Accumulated statistics of a replayed run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    iterations: Vec<IterationStats>,
}

impl RunSummary {
    /// Append one iteration
    pub fn record(&mut self, stats: IterationStats) {
        self.iterations.push(stats);
    }

    /// All recorded iterations in order
    pub fn iterations(&self) -> &[IterationStats] {
        &self.iterations
    }

    /// Number of recorded iterations
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    /// Test if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// Mean share of active cells over all iterations
    pub fn mean_active_fraction(&self) -> f64 {
        if self.iterations.is_empty() {
            return 0.0;
        }
        self.iterations
            .iter()
            .map(IterationStats::active_fraction)
            .sum::<f64>()
            / self.iterations.len() as f64
    }

    /// Cell visits saved across the run
    pub fn skipped_cell_iterations(&self) -> usize {
        self.iterations.iter().map(IterationStats::skipped_cells).sum()
    }

    /// First iteration after which no cell was active
    pub fn first_quiet_iteration(&self) -> Option<usize> {
        self.iterations
            .iter()
            .find(|stats| stats.active_cells == 0)
            .map(|stats| stats.iteration)
    }

    /// Render every iteration as CSV with a header line
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(
            "iteration,changed_pixels,updatable_cells,active_cells,cell_count,active_clusters,updatable_clusters,cluster_count\n",
        );
        for stats in &self.iterations {
            let _ = writeln!(
                csv,
                "{},{},{},{},{},{},{},{}",
                stats.iteration,
                stats.changed_pixels,
                stats.updatable_cells,
                stats.active_cells,
                stats.cell_count,
                stats.active_clusters,
                stats.updatable_clusters,
                stats.cluster_count
            );
        }
        csv
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations, mean activity {:.1}%, {} cell visits skipped",
            self.iterations.len(),
            self.mean_active_fraction() * 100.0,
            self.skipped_cell_iterations()
        )?;
        if let Some(iteration) = self.first_quiet_iteration() {
            write!(f, ", quiet from iteration {iteration}")?;
        }
        Ok(())
    }
}
