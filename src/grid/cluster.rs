//! Cluster centers as seen by the preemption grid

use crate::grid::layout::CellLayout;

/// A cluster center at pixel coordinate `(x, y)`
///
/// Only the position matters to the grid; color and membership live with the
/// clustering pass that owns the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cluster {
    /// Column of the center in pixels
    pub x: u16,
    /// Row of the center in pixels
    pub y: u16,
}

impl Cluster {
    /// Create a cluster centered at `(x, y)`
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Cell the cluster is anchored in, clamped to the grid
    pub fn home_cell(&self, layout: &CellLayout) -> (usize, usize) {
        layout.home_cell(usize::from(self.x), usize::from(self.y))
    }

    /// Place one cluster at the center of every cell, row-major
    ///
    /// Mirrors the regular seeding of superpixel clustering: cluster `k`
    /// starts in cell `k`. Centers on truncated edge cells sit at the middle
    /// of the pixels that exist.
    pub fn seed_grid(layout: &CellLayout) -> Vec<Self> {
        let mut clusters = Vec::with_capacity(layout.cell_count());
        for cell_row in 0..layout.cell_rows() {
            let rows = layout.pixel_rows(cell_row);
            let y = rows.start + rows.len() / 2;
            for cell_col in 0..layout.cell_cols() {
                let cols = layout.pixel_cols(cell_col);
                let x = cols.start + cols.len() / 2;
                clusters.push(Self::new(
                    u16::try_from(x).unwrap_or(u16::MAX),
                    u16::try_from(y).unwrap_or(u16::MAX),
                ));
            }
        }
        clusters
    }
}
