//! Frame capture and GIF generation for per-iteration activity masks

use std::path::Path;

use image::{Frame, Rgba, RgbaImage};

use crate::grid::preemption::PreemptionGrid;
use crate::io::error::{GridError, Result};
use crate::io::image::create_parent_dir;

/// Side length in pixels of one cell in rendered frames
pub const CELL_SCALE: u32 = 8;

const UPDATABLE_COLOR: [u8; 4] = [220, 60, 40, 255];
const ACTIVE_COLOR: [u8; 4] = [240, 180, 40, 255];
const IDLE_COLOR: [u8; 4] = [40, 40, 48, 255];

/// Cell states captured after one update
#[derive(Debug, Clone)]
struct MaskFrame {
    iteration: usize,
    // 0 = idle, 1 = active, 2 = updatable (and therefore active)
    states: Vec<u8>,
}

/// Records the grid's masks after every update for later export
pub struct ActivityCapture {
    cell_rows: usize,
    cell_cols: usize,
    frames: Vec<MaskFrame>,
}

impl ActivityCapture {
    /// Create an empty capture for a `cell_rows x cell_cols` grid
    pub fn new(cell_rows: usize, cell_cols: usize, max_iterations: usize) -> Self {
        Self {
            cell_rows,
            cell_cols,
            frames: Vec::with_capacity(max_iterations),
        }
    }

    /// Record the current masks of `grid`
    pub fn record(&mut self, iteration: usize, grid: &PreemptionGrid) {
        let mut states = Vec::with_capacity(self.cell_rows * self.cell_cols);
        for cell_row in 0..self.cell_rows {
            for cell_col in 0..self.cell_cols {
                let state = if grid.is_updatable_cell(cell_row, cell_col) {
                    2
                } else {
                    u8::from(grid.is_active_cell(cell_row, cell_col))
                };
                states.push(state);
            }
        }
        self.frames.push(MaskFrame { iteration, states });
    }

    /// Number of captured frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Iterations of the captured frames, in order
    pub fn iterations(&self) -> Vec<usize> {
        self.frames.iter().map(|frame| frame.iteration).collect()
    }

    /// Export the captured frames as an animated GIF
    ///
    /// The last frame is held 4x longer so the final state stays readable.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        if self.frames.is_empty() {
            return Err(GridError::EmptySequence {
                origin: "activity capture".to_string(),
            });
        }

        let last_index = self.frames.len() - 1;
        let frames: Vec<Frame> = self
            .frames
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                let delay = if index == last_index {
                    frame_delay_ms * 4
                } else {
                    frame_delay_ms
                };
                Frame::from_parts(
                    self.render_frame(frame),
                    0,
                    0,
                    image::Delay::from_numer_denom_ms(delay, 1),
                )
            })
            .collect();

        create_parent_dir(output_path)?;
        let file = std::fs::File::create(output_path).map_err(|e| GridError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| GridError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })
    }

    fn render_frame(&self, frame: &MaskFrame) -> RgbaImage {
        let width = self.cell_cols as u32 * CELL_SCALE;
        let height = self.cell_rows as u32 * CELL_SCALE;
        let mut img = RgbaImage::new(width, height);

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let cell_row = (y / CELL_SCALE) as usize;
            let cell_col = (x / CELL_SCALE) as usize;
            let state = frame
                .states
                .get(cell_row * self.cell_cols + cell_col)
                .copied()
                .unwrap_or(0);
            let color = match state {
                2 => UPDATABLE_COLOR,
                1 => ACTIVE_COLOR,
                _ => IDLE_COLOR,
            };
            *pixel = Rgba(color);
        }

        img
    }
}
