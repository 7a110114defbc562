//! Label maps stored as 16-bit grayscale PNG files, and mask overlay export

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Luma, Rgba, RgbaImage};

use crate::grid::layout::CellLayout;
use crate::grid::mask::CellMask;
use crate::io::error::{GridError, Result, invalid_label_layout};
use crate::labels::assignment::LabelView;
use crate::labels::source::{LabelFrame, LabelSource};

/// Load a label map; each pixel's 16-bit luminance is its cluster label
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_label_map(path: &Path) -> Result<LabelFrame> {
    let img = image::open(path).map_err(|e| GridError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    let luma = img.to_luma16();
    let (width, height) = luma.dimensions();
    LabelFrame::new(
        luma.into_raw(),
        width as usize,
        height as usize,
        width as usize,
    )
}

/// Save a label array as a 16-bit grayscale PNG, dropping row padding
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image
/// cannot be written
pub fn save_label_map(view: &LabelView<'_>, path: &Path) -> Result<()> {
    let mut packed = Vec::with_capacity(view.width() * view.height());
    for y in 0..view.height() {
        packed.extend_from_slice(view.row(y));
    }

    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(view.width() as u32, view.height() as u32, packed).ok_or_else(
            || invalid_label_layout(&"label buffer does not match its dimensions"),
        )?;

    create_parent_dir(path)?;
    img.save(path).map_err(|e| GridError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Directory of label maps replayed in file name order
pub struct PngSequence {
    directory: PathBuf,
    paths: VecDeque<PathBuf>,
    dimensions: (usize, usize),
}

impl PngSequence {
    /// Collect every `.png` file in `directory`, sorted by name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read, holds no PNG files,
    /// or the first file's header cannot be read
    pub fn from_directory(directory: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(directory).map_err(|e| GridError::FileSystem {
            path: directory.to_path_buf(),
            operation: "read directory",
            source: e,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("png") {
                paths.push(path);
            }
        }
        paths.sort();

        let first = paths.first().ok_or_else(|| GridError::EmptySequence {
            origin: directory.display().to_string(),
        })?;
        let (width, height) = image::image_dimensions(first).map_err(|e| GridError::ImageLoad {
            path: first.clone(),
            source: e,
        })?;

        Ok(Self {
            directory: directory.to_path_buf(),
            paths: paths.into(),
            dimensions: (height as usize, width as usize),
        })
    }

    /// Frames not yet read
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl LabelSource for PngSequence {
    fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    fn describe(&self) -> String {
        self.directory.display().to_string()
    }

    fn next_frame(&mut self) -> Result<Option<LabelFrame>> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };

        let frame = load_label_map(&path)?;
        if (frame.height(), frame.width()) != self.dimensions {
            return Err(invalid_label_layout(&format!(
                "'{}' is {}x{} but the sequence is {}x{}",
                path.display(),
                frame.width(),
                frame.height(),
                self.dimensions.1,
                self.dimensions.0
            )));
        }
        Ok(Some(frame))
    }
}

/// Deterministic display color for a label
pub fn label_color(label: u16) -> [u8; 3] {
    let hash = u32::from(label).wrapping_mul(0x9E37_79B1);
    let [r, g, b, _] = hash.to_be_bytes();
    [r | 0x40, g | 0x40, b | 0x40]
}

/// Render labels colored per cluster, dimmed wherever the cell is inactive
pub fn render_mask_overlay(view: &LabelView<'_>, layout: &CellLayout, mask: &CellMask) -> RgbaImage {
    let mut img = RgbaImage::new(view.width() as u32, view.height() as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let (px, py) = (x as usize, y as usize);
        let [r, g, b] = view.get(px, py).map_or([0, 0, 0], label_color);
        let (cell_row, cell_col) = layout.home_cell(px, py);
        *pixel = if mask.get(cell_row, cell_col) {
            Rgba([r, g, b, 255])
        } else {
            Rgba([r / 4, g / 4, b / 4, 255])
        };
    }
    img
}

/// Export [`render_mask_overlay`] as a PNG
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image
/// cannot be saved
pub fn export_mask_overlay(
    view: &LabelView<'_>,
    layout: &CellLayout,
    mask: &CellMask,
    output_path: &Path,
) -> Result<()> {
    let img = render_mask_overlay(view, layout, mask);
    create_parent_dir(output_path)?;
    img.save(output_path).map_err(|e| GridError::ImageExport {
        path: output_path.to_path_buf(),
        source: e,
    })
}

pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GridError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    Ok(())
}
