//! Seeded generator of converging label sequences
//!
//! The first frame labels every pixel with the index of its cell, which is what
//! a grid-seeded clustering produces before any center has moved. Each later
//! frame toggles pixels near cell edges between their own cell and the nearest
//! neighboring cell. The toggle rate differs per cell and decays geometrically,
//! so the sequence settles the way a real clustering run does: most cells go
//! quiet early while a few stay restless.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::grid::layout::CellLayout;
use crate::io::configuration::{
    SYNTHETIC_BOUNDARY_WIDTH, SYNTHETIC_INITIAL_JITTER, SYNTHETIC_JITTER_DECAY,
};
use crate::io::error::{Result, invalid_parameter};
use crate::labels::source::{LabelFrame, LabelSource};

/// Label value written into row padding
pub const PADDING_LABEL: u16 = u16::MAX;

/// Synthetic label source over a padded buffer
pub struct SyntheticLabels {
    layout: CellLayout,
    row_stride: usize,
    current: Vec<u16>,
    restlessness: Vec<f64>,
    rng: StdRng,
    jitter: f64,
    decay: f64,
    remaining: usize,
    started: bool,
}

impl SyntheticLabels {
    /// Create a source yielding `frames` frames
    ///
    /// Rows are `row_padding` entries wider than the image to exercise
    /// strided buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout has more cells than distinct labels
    /// below [`PADDING_LABEL`]
    pub fn new(layout: CellLayout, row_padding: usize, frames: usize, seed: u64) -> Result<Self> {
        if layout.cell_count() > usize::from(PADDING_LABEL) {
            return Err(invalid_parameter(
                "stride",
                &layout.stride(),
                &format!(
                    "{} cells exceed the {PADDING_LABEL} distinct synthetic labels",
                    layout.cell_count()
                ),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let restlessness = (0..layout.cell_count())
            .map(|_| rng.random::<f64>())
            .collect();
        let row_stride = layout.width() + row_padding;

        Ok(Self {
            layout,
            row_stride,
            current: grid_labels(&layout, row_stride),
            restlessness,
            rng,
            jitter: SYNTHETIC_INITIAL_JITTER,
            decay: SYNTHETIC_JITTER_DECAY,
            remaining: frames,
            started: false,
        })
    }

    /// Override the initial toggle rate and its per-frame decay
    ///
    /// # Errors
    ///
    /// Returns an error if either value lies outside `[0, 1]`
    pub fn with_jitter(mut self, initial: f64, decay: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&initial) {
            return Err(invalid_parameter("jitter", &initial, &"must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&decay) {
            return Err(invalid_parameter("decay", &decay, &"must lie in [0, 1]"));
        }
        self.jitter = initial;
        self.decay = decay;
        Ok(self)
    }

    /// Current toggle rate before per-cell scaling
    pub const fn jitter(&self) -> f64 {
        self.jitter
    }

    fn advance(&mut self) {
        let layout = self.layout;
        let width = layout.width();
        for (y, row) in self
            .current
            .chunks_mut(self.row_stride)
            .take(layout.height())
            .enumerate()
        {
            for (x, label) in row.iter_mut().take(width).enumerate() {
                let (cell_row, cell_col) = layout.home_cell(x, y);
                let own = cell_label(&layout, cell_row, cell_col);
                let Some(other) = nearest_neighbor_label(&layout, x, y) else {
                    continue;
                };
                let rate = self
                    .restlessness
                    .get(layout.cell_index(cell_row, cell_col))
                    .copied()
                    .unwrap_or(0.0)
                    * self.jitter;
                if self.rng.random::<f64>() < rate {
                    *label = if *label == own { other } else { own };
                }
            }
        }
        self.jitter *= self.decay;
    }
}

impl LabelSource for SyntheticLabels {
    fn dimensions(&self) -> (usize, usize) {
        (self.layout.height(), self.layout.width())
    }

    fn describe(&self) -> String {
        format!(
            "synthetic {}x{} sequence",
            self.layout.width(),
            self.layout.height()
        )
    }

    fn next_frame(&mut self) -> Result<Option<LabelFrame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        if self.started {
            self.advance();
        }
        self.started = true;
        self.remaining -= 1;

        LabelFrame::new(
            self.current.clone(),
            self.layout.width(),
            self.layout.height(),
            self.row_stride,
        )
        .map(Some)
    }
}

/// Label every pixel with the flat index of its cell
///
/// Cells past index `PADDING_LABEL - 1` share that label.
pub fn grid_labels(layout: &CellLayout, row_stride: usize) -> Vec<u16> {
    let mut labels = vec![PADDING_LABEL; layout.height() * row_stride];
    for (y, row) in labels
        .chunks_mut(row_stride.max(1))
        .take(layout.height())
        .enumerate()
    {
        for (x, label) in row.iter_mut().take(layout.width()).enumerate() {
            let (cell_row, cell_col) = layout.home_cell(x, y);
            *label = cell_label(layout, cell_row, cell_col);
        }
    }
    labels
}

fn cell_label(layout: &CellLayout, cell_row: usize, cell_col: usize) -> u16 {
    u16::try_from(layout.cell_index(cell_row, cell_col)).unwrap_or(PADDING_LABEL - 1)
}

// Label of the adjacent cell across the closest edge within the boundary band
fn nearest_neighbor_label(layout: &CellLayout, x: usize, y: usize) -> Option<u16> {
    let (cell_row, cell_col) = layout.home_cell(x, y);
    let rows = layout.pixel_rows(cell_row);
    let cols = layout.pixel_cols(cell_col);

    let candidates = [
        (y - rows.start, cell_row.checked_sub(1).map(|r| (r, cell_col))),
        (
            rows.end - 1 - y,
            (cell_row + 1 < layout.cell_rows()).then_some((cell_row + 1, cell_col)),
        ),
        (x - cols.start, cell_col.checked_sub(1).map(|c| (cell_row, c))),
        (
            cols.end - 1 - x,
            (cell_col + 1 < layout.cell_cols()).then_some((cell_row, cell_col + 1)),
        ),
    ];

    candidates
        .into_iter()
        .filter(|(distance, _)| *distance < SYNTHETIC_BOUNDARY_WIDTH)
        .filter_map(|(distance, cell)| cell.map(|cell| (distance, cell)))
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, (row, col))| cell_label(layout, row, col))
}
