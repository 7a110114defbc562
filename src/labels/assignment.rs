//! Stride-aware views over pixel-to-cluster label arrays
//!
//! Label arrays are row-major `u16` buffers whose rows may be padded: row `i`
//! starts at `i * row_stride` and only its first `width` entries are labels.

use crate::io::error::{Result, invalid_label_layout};

/// Borrowed, validated label array
#[derive(Debug, Clone, Copy)]
pub struct LabelView<'a> {
    data: &'a [u16],
    width: usize,
    height: usize,
    row_stride: usize,
}

impl<'a> LabelView<'a> {
    /// Wrap a label buffer
    ///
    /// # Errors
    ///
    /// Returns an error if `row_stride < width` or if `data` is shorter than
    /// `height * row_stride`
    pub fn new(data: &'a [u16], width: usize, height: usize, row_stride: usize) -> Result<Self> {
        if row_stride < width {
            return Err(invalid_label_layout(&format!(
                "row stride {row_stride} is smaller than width {width}"
            )));
        }
        let required = height.checked_mul(row_stride).ok_or_else(|| {
            invalid_label_layout(&format!("{height} rows of stride {row_stride} overflow"))
        })?;
        if data.len() < required {
            return Err(invalid_label_layout(&format!(
                "buffer holds {} labels but {height} rows of stride {row_stride} need {required}",
                data.len()
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            row_stride,
        })
    }

    /// Number of meaningful labels per row
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Distance between row starts in the buffer
    pub const fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Meaningful labels of one row, empty past the last row
    pub fn row(&self, row: usize) -> &'a [u16] {
        let start = row * self.row_stride;
        self.data.get(start..start + self.width).unwrap_or(&[])
    }

    /// Label at pixel `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        if x >= self.width {
            return None;
        }
        self.row(y).get(x).copied()
    }

    /// The `height * row_stride` prefix of the buffer, padding included
    pub fn raw(&self) -> &'a [u16] {
        self.data.get(..self.height * self.row_stride).unwrap_or(&[])
    }
}

/// Owned copy of a label array taken as the baseline for change counting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSnapshot {
    labels: Vec<u16>,
    width: usize,
    height: usize,
    row_stride: usize,
}

impl LabelSnapshot {
    /// Copy `height * row_stride` labels out of a view
    pub fn capture(view: &LabelView<'_>) -> Self {
        Self {
            labels: view.raw().to_vec(),
            width: view.width(),
            height: view.height(),
            row_stride: view.row_stride(),
        }
    }

    /// Replace the snapshot contents in full, reusing the allocation
    pub fn recapture(&mut self, view: &LabelView<'_>) {
        self.labels.clear();
        self.labels.extend_from_slice(view.raw());
        self.width = view.width();
        self.height = view.height();
        self.row_stride = view.row_stride();
    }

    /// Borrow the snapshot as a view
    pub fn view(&self) -> LabelView<'_> {
        LabelView {
            data: self.labels.as_slice(),
            width: self.width,
            height: self.height,
            row_stride: self.row_stride,
        }
    }

    /// Row stride the snapshot was captured with
    pub const fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Number of stored labels, padding included
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Test if the snapshot stores no labels
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Number of positions where two equal-length label runs disagree
pub fn count_changed(previous: &[u16], current: &[u16]) -> u32 {
    previous
        .iter()
        .zip(current)
        .map(|(old, new)| u32::from(old != new))
        .sum()
}
