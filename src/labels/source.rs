//! Owned label frames and the sources that produce them in iteration order

use crate::io::error::Result;
use crate::labels::assignment::LabelView;

/// One label array as produced by a single labeling pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFrame {
    labels: Vec<u16>,
    width: usize,
    height: usize,
    row_stride: usize,
}

impl LabelFrame {
    /// Wrap an owned buffer, validating its layout
    ///
    /// # Errors
    ///
    /// Returns an error if `row_stride < width` or the buffer is shorter than
    /// `height * row_stride`
    pub fn new(labels: Vec<u16>, width: usize, height: usize, row_stride: usize) -> Result<Self> {
        LabelView::new(&labels, width, height, row_stride)?;
        Ok(Self {
            labels,
            width,
            height,
            row_stride,
        })
    }

    /// Raw buffer, padding included
    pub fn labels(&self) -> &[u16] {
        &self.labels
    }

    /// Labels per row
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

    /// Borrow the frame as a label view
    ///
    /// # Errors
    ///
    /// Never fails for a frame built through [`Self::new`]
    pub fn view(&self) -> Result<LabelView<'_>> {
        LabelView::new(&self.labels, self.width, self.height, self.row_stride)
    }
}

/// Produces the label frames of successive clustering iterations
pub trait LabelSource {
    /// Image size as `(height, width)`
    fn dimensions(&self) -> (usize, usize);

    /// Human-readable origin used in error messages
    fn describe(&self) -> String;

    /// Next frame, or `None` once the sequence is exhausted
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be produced or does not match
    /// [`Self::dimensions`]
    fn next_frame(&mut self) -> Result<Option<LabelFrame>>;
}
