//! Cell arithmetic for partitioning an image into stride-sized cells
//!
//! Cells are `S x S` pixel blocks laid out row-major. The last row and column
//! of cells are truncated when the image size is not a multiple of the stride.

use std::ops::Range;

use crate::io::configuration::MAX_IMAGE_SIDE;
use crate::io::error::{Result, invalid_parameter};

/// Fixed image and cell dimensions for one grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    height: usize,
    width: usize,
    stride: usize,
    cell_rows: usize,
    cell_cols: usize,
}

impl CellLayout {
    /// Create a layout for an `height x width` image with cluster stride `stride`
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero, if the height or width
    /// exceeds [`MAX_IMAGE_SIDE`], or if `stride²` does not fit the per-cell
    /// change counter
    pub fn new(height: usize, width: usize, stride: usize) -> Result<Self> {
        if height == 0 {
            return Err(invalid_parameter("height", &height, &"must be positive"));
        }
        if width == 0 {
            return Err(invalid_parameter("width", &width, &"must be positive"));
        }
        for (parameter, side) in [("height", height), ("width", width)] {
            if side > MAX_IMAGE_SIDE {
                return Err(invalid_parameter(
                    parameter,
                    &side,
                    &format!("cluster coordinates only address {MAX_IMAGE_SIDE} pixels"),
                ));
            }
        }
        if stride == 0 {
            return Err(invalid_parameter("stride", &stride, &"must be positive"));
        }
        let area = stride.checked_mul(stride).unwrap_or(usize::MAX);
        if u32::try_from(area).is_err() {
            return Err(invalid_parameter(
                "stride",
                &stride,
                &"cell area exceeds the change counter range",
            ));
        }

        Ok(Self {
            height,
            width,
            stride,
            cell_rows: height.div_ceil(stride),
            cell_cols: width.div_ceil(stride),
        })
    }

    /// Image height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Image width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Cluster stride in pixels
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Number of cell rows (`ceil(H / S)`)
    pub const fn cell_rows(&self) -> usize {
        self.cell_rows
    }

    /// Number of cell columns (`ceil(W / S)`)
    pub const fn cell_cols(&self) -> usize {
        self.cell_cols
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.cell_rows * self.cell_cols
    }

    /// Nominal cell capacity `S²`, also used for truncated edge cells
    pub const fn nominal_cell_area(&self) -> usize {
        self.stride * self.stride
    }

    /// Flat row-major index of a cell
    pub const fn cell_index(&self, cell_row: usize, cell_col: usize) -> usize {
        cell_row * self.cell_cols + cell_col
    }

    /// Pixel rows covered by a cell row
    pub fn pixel_rows(&self, cell_row: usize) -> Range<usize> {
        let start = (cell_row * self.stride).min(self.height);
        start..((cell_row + 1) * self.stride).min(self.height)
    }

    /// Pixel columns covered by a cell column
    pub fn pixel_cols(&self, cell_col: usize) -> Range<usize> {
        let start = (cell_col * self.stride).min(self.width);
        start..((cell_col + 1) * self.stride).min(self.width)
    }

    /// Actual pixel count of a cell, smaller than `S²` on truncated edges
    pub fn cell_area(&self, cell_row: usize, cell_col: usize) -> usize {
        self.pixel_rows(cell_row).len() * self.pixel_cols(cell_col).len()
    }

    /// The 3x3 block of cells around a cell, clipped at grid bounds
    ///
    /// Corners yield 4 cells, edges 6 and interior cells 9.
    pub fn neighborhood(&self, cell_row: usize, cell_col: usize) -> (Range<usize>, Range<usize>) {
        let rows = cell_row.saturating_sub(1)..(cell_row + 2).min(self.cell_rows);
        let cols = cell_col.saturating_sub(1)..(cell_col + 2).min(self.cell_cols);
        (rows, cols)
    }

    /// Cell containing pixel `(x, y)`
    ///
    /// Coordinates past the image are clamped onto the last cell row/column,
    /// so the result is always a valid cell.
    pub fn home_cell(&self, x: usize, y: usize) -> (usize, usize) {
        (
            (y / self.stride).min(self.cell_rows - 1),
            (x / self.stride).min(self.cell_cols - 1),
        )
    }

    /// Whether pixel `(x, y)` lies inside the image
    pub const fn contains_pixel(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }
}
