use bitvec::vec::BitVec;
use std::fmt;
use std::ops::Range;

/// Fixed-size boolean flag per grid cell
///
/// Stored row-major in a single bit vector; the size never changes after
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellMask {
    bits: BitVec,
    cols: usize,
}

impl CellMask {
    /// Create a mask with every cell set to `value`
    pub fn new(rows: usize, cols: usize, value: bool) -> Self {
        Self {
            bits: BitVec::repeat(value, rows * cols),
            cols,
        }
    }

    /// Number of cells in the mask
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Test if the mask holds no cells
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Set every cell to `value`
    pub fn fill(&mut self, value: bool) {
        self.bits.fill(value);
    }

    /// Read a cell; cells outside the mask read as false
    pub fn get(&self, row: usize, col: usize) -> bool {
        if col >= self.cols {
            return false;
        }
        self.bits.get(row * self.cols + col).as_deref() == Some(&true)
    }

    /// Write a cell; writes outside the mask are ignored
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        if col >= self.cols {
            return;
        }
        if let Some(mut bit) = self.bits.get_mut(row * self.cols + col) {
            *bit = value;
        }
    }

    /// Set every cell in the given block to true
    pub fn raise_block(&mut self, rows: Range<usize>, cols: Range<usize>) {
        for row in rows {
            for col in cols.clone() {
                self.set(row, col, true);
            }
        }
    }

    /// Count cells set to true
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Test if every cell is set
    pub fn all(&self) -> bool {
        self.bits.all()
    }

    /// Test if no cell is set
    pub fn none(&self) -> bool {
        self.bits.not_any()
    }

    /// Iterate `(row, col)` of every set cell in row-major order
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols.max(1);
        self.bits
            .iter_ones()
            .map(move |index| (index / cols, index % cols))
    }
}

impl fmt::Display for CellMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, bit) in self.bits.iter().by_vals().enumerate() {
            if index > 0 && self.cols > 0 && index % self.cols == 0 {
                writeln!(f)?;
            }
            write!(f, "{}", if bit { '#' } else { '.' })?;
        }
        Ok(())
    }
}
