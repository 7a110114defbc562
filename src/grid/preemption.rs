//! Preemption grid deciding which cells and clusters still need work
//!
//! After every labeling pass the grid counts, per cell, how many pixels changed
//! label. A cell stays updatable while the change summed over its 3x3
//! neighborhood exceeds a threshold scaled by the neighborhood size; activity
//! then spreads one cell outward from every updatable cell. Clusters anchored
//! in inactive cells can be skipped by the next labeling pass, and clusters in
//! non-updatable cells keep their centers.

use log::{debug, trace};
use ndarray::{Array2, ArrayView2, Axis, s};
use rayon::prelude::*;

use crate::grid::cluster::Cluster;
use crate::grid::layout::CellLayout;
use crate::grid::mask::CellMask;
use crate::io::configuration::{DEFAULT_PREEMPTION_THRESHOLD, MAX_NEIGHBORHOOD_CELLS};
use crate::io::error::{GridError, Result, invalid_parameter};
use crate::labels::assignment::{LabelSnapshot, LabelView, count_changed};

/// Change thresholds indexed by the number of cells in a neighborhood
pub type ThresholdTable = [u64; MAX_NEIGHBORHOOD_CELLS + 1];

/// Per-run preemption settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreemptionConfig {
    /// Whether activity gating is applied at all
    pub enabled: bool,
    /// Fraction of `S²` changed pixels per neighborhood cell that keeps a cell updatable
    pub threshold: f32,
}

impl Default for PreemptionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_PREEMPTION_THRESHOLD,
        }
    }
}

impl PreemptionConfig {
    /// Check the threshold is a finite fraction in `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is NaN, infinite or outside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(invalid_parameter(
                "threshold",
                &self.threshold,
                &"must be a finite fraction in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Per-cell change accounting and activity gating for one segmentation run
#[derive(Debug, Clone)]
pub struct PreemptionGrid {
    layout: CellLayout,
    enabled: bool,
    threshold: f32,
    change_counts: Array2<u32>,
    updatable: CellMask,
    active: CellMask,
    snapshot: Option<LabelSnapshot>,
}

impl PreemptionGrid {
    /// Create a grid for an `height x width` image with cluster stride `stride`
    ///
    /// The grid starts disabled with every cell updatable and active; call
    /// [`Self::initialize`] to begin a run.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are rejected by [`CellLayout::new`]
    pub fn new(height: usize, width: usize, stride: usize) -> Result<Self> {
        Ok(Self::with_layout(CellLayout::new(height, width, stride)?))
    }

    /// Create a grid over an existing layout
    pub fn with_layout(layout: CellLayout) -> Self {
        let (rows, cols) = (layout.cell_rows(), layout.cell_cols());
        Self {
            layout,
            enabled: false,
            threshold: DEFAULT_PREEMPTION_THRESHOLD,
            change_counts: Array2::zeros((rows, cols)),
            updatable: CellMask::new(rows, cols, true),
            active: CellMask::new(rows, cols, true),
            snapshot: None,
        }
    }

    /// Begin (or restart) a run
    ///
    /// Zeroes every change count and marks every cell updatable and active.
    /// A previously captured snapshot is kept. `threshold` is used as given;
    /// a negative value truncates every threshold to zero, so prefer
    /// [`Self::initialize_with`] for unchecked input.
    pub fn initialize(&mut self, enabled: bool, threshold: f32) {
        self.enabled = enabled;
        self.threshold = threshold;
        self.change_counts.fill(0);
        self.updatable.fill(true);
        self.active.fill(true);
        trace!(
            "preemption grid initialized: enabled={enabled}, threshold={threshold}, {} cells",
            self.layout.cell_count()
        );
    }

    /// Begin a run from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if [`PreemptionConfig::validate`] rejects `config`;
    /// the grid is left unchanged
    pub fn initialize_with(&mut self, config: &PreemptionConfig) -> Result<()> {
        config.validate()?;
        self.initialize(config.enabled, config.threshold);
        Ok(())
    }

    /// Force every cell updatable and active for a final exhaustive pass
    ///
    /// Change counts are left untouched.
    pub fn finalize(&mut self) {
        self.updatable.fill(true);
        self.active.fill(true);
        trace!("preemption grid finalized");
    }

    /// Capture the current labels as the baseline for the next comparison
    ///
    /// `labels` holds `H` rows of `row_stride` entries. The previous snapshot
    /// is replaced in full and all change counts are zeroed.
    ///
    /// # Errors
    ///
    /// Returns an error if `row_stride` is smaller than the image width or the
    /// buffer is shorter than `H * row_stride`; the grid is left unchanged
    pub fn record_old_assignment(&mut self, labels: &[u16], row_stride: usize) -> Result<()> {
        let view = self.view_of(labels, row_stride)?;
        match self.snapshot.as_mut() {
            Some(snapshot) => snapshot.recapture(&view),
            None => self.snapshot = Some(LabelSnapshot::capture(&view)),
        }
        self.change_counts.fill(0);
        Ok(())
    }

    /// Compare new labels against the snapshot and recompute both masks
    ///
    /// Change counts are computed in parallel, one task per cell row. Every
    /// cell's updatability is decided before any activity flag is written, so
    /// the result does not depend on visiting order.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingSnapshot`] if no assignment was recorded
    /// with [`Self::record_old_assignment`], or a layout error if the buffer
    /// does not cover the image; in both cases the grid is left unchanged
    pub fn record_new_assignment(&mut self, labels: &[u16], row_stride: usize) -> Result<()> {
        let current = self.view_of(labels, row_stride)?;
        let snapshot = self.snapshot.as_ref().ok_or(GridError::MissingSnapshot)?;
        let previous = snapshot.view();
        let layout = self.layout;

        self.change_counts.fill(0);
        self.change_counts
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(cell_row, mut counts)| {
                for y in layout.pixel_rows(cell_row) {
                    let old_row = previous.row(y);
                    let new_row = current.row(y);
                    for (cell_col, count) in counts.iter_mut().enumerate() {
                        let cols = layout.pixel_cols(cell_col);
                        let old = old_row.get(cols.clone()).unwrap_or(&[]);
                        let new = new_row.get(cols).unwrap_or(&[]);
                        *count += count_changed(old, new);
                    }
                }
            });

        let thresholds = self.threshold_table();
        self.mark_updatable(&thresholds);
        self.propagate_activity();

        debug!(
            "preemption update: {} changed pixels, {}/{} cells updatable, {}/{} active",
            self.total_changes(),
            self.updatable.count(),
            self.layout.cell_count(),
            self.active.count(),
            self.layout.cell_count()
        );
        Ok(())
    }

    /// Change threshold for each neighborhood size from 0 to 9 cells
    ///
    /// Every contributing cell is assumed to hold `S²` pixels, including
    /// truncated cells on the image edge.
    pub fn threshold_table(&self) -> ThresholdTable {
        let stride = self.layout.stride() as f32;
        std::array::from_fn(|cells| (cells as f32 * self.threshold * stride * stride) as u64)
    }

    fn mark_updatable(&mut self, thresholds: &ThresholdTable) {
        for cell_row in 0..self.layout.cell_rows() {
            for cell_col in 0..self.layout.cell_cols() {
                let (rows, cols) = self.layout.neighborhood(cell_row, cell_col);
                let cells = rows.len() * cols.len();
                let changes: u64 = self
                    .change_counts
                    .slice(s![rows, cols])
                    .iter()
                    .map(|&count| u64::from(count))
                    .sum();
                let bound = thresholds.get(cells).copied().unwrap_or(u64::MAX);
                self.updatable.set(cell_row, cell_col, changes > bound);
            }
        }
    }

    fn propagate_activity(&mut self) {
        let layout = self.layout;
        self.active.fill(false);
        for (cell_row, cell_col) in self.updatable.iter_set() {
            let (rows, cols) = layout.neighborhood(cell_row, cell_col);
            self.active.raise_block(rows, cols);
        }
    }

    /// Whether the labeling pass should revisit the cluster's neighborhood
    ///
    /// Always true while preemption is disabled. Clusters outside the image
    /// are looked up in the nearest edge cell.
    pub fn is_active_cluster(&self, cluster: &Cluster) -> bool {
        if !self.enabled {
            return true;
        }
        let (cell_row, cell_col) = self.cluster_cell(cluster);
        self.active.get(cell_row, cell_col)
    }

    /// Whether the cluster may move its center after the next pass
    ///
    /// Always true while preemption is disabled. Clusters outside the image
    /// are looked up in the nearest edge cell.
    pub fn is_updatable_cluster(&self, cluster: &Cluster) -> bool {
        if !self.enabled {
            return true;
        }
        let (cell_row, cell_col) = self.cluster_cell(cluster);
        self.updatable.get(cell_row, cell_col)
    }

    /// Indices of the clusters that pass [`Self::is_active_cluster`]
    pub fn active_clusters(&self, clusters: &[Cluster]) -> Vec<usize> {
        clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| self.is_active_cluster(cluster))
            .map(|(index, _)| index)
            .collect()
    }

    /// Indices of the clusters that pass [`Self::is_updatable_cluster`]
    pub fn updatable_clusters(&self, clusters: &[Cluster]) -> Vec<usize> {
        clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| self.is_updatable_cluster(cluster))
            .map(|(index, _)| index)
            .collect()
    }

    fn cluster_cell(&self, cluster: &Cluster) -> (usize, usize) {
        let (x, y) = (usize::from(cluster.x), usize::from(cluster.y));
        if !self.layout.contains_pixel(x, y) {
            debug!(
                "cluster at ({x}, {y}) lies outside the {}x{} image; using nearest edge cell",
                self.layout.width(),
                self.layout.height()
            );
        }
        cluster.home_cell(&self.layout)
    }

    fn view_of<'a>(&self, labels: &'a [u16], row_stride: usize) -> Result<LabelView<'a>> {
        LabelView::new(labels, self.layout.width(), self.layout.height(), row_stride)
    }

    /// Cell dimensions of this grid
    pub const fn layout(&self) -> &CellLayout {
        &self.layout
    }

    /// Whether gating is applied in the current run
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Threshold fraction of the current run
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether a baseline snapshot has been captured
    pub const fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Changed pixels counted in one cell by the last update
    pub fn change_count(&self, cell_row: usize, cell_col: usize) -> u32 {
        self.change_counts
            .get([cell_row, cell_col])
            .copied()
            .unwrap_or(0)
    }

    /// All change counts as a `CH x CW` view
    pub fn change_counts(&self) -> ArrayView2<'_, u32> {
        self.change_counts.view()
    }

    /// Sum of changed pixels over the whole grid
    pub fn total_changes(&self) -> u64 {
        self.change_counts.iter().map(|&count| u64::from(count)).sum()
    }

    /// Stored activity flag of a cell, ignoring the enable switch
    pub fn is_active_cell(&self, cell_row: usize, cell_col: usize) -> bool {
        self.active.get(cell_row, cell_col)
    }

    /// Stored updatability flag of a cell, ignoring the enable switch
    pub fn is_updatable_cell(&self, cell_row: usize, cell_col: usize) -> bool {
        self.updatable.get(cell_row, cell_col)
    }

    /// Activity flags of every cell
    pub const fn active_mask(&self) -> &CellMask {
        &self.active
    }

    /// Updatability flags of every cell
    pub const fn updatable_mask(&self) -> &CellMask {
        &self.updatable
    }
}
