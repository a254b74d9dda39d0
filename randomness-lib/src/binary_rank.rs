//! Rank of binary matrices over GF(2), as used by the
//! [Binary Matrix Rank Test](crate::tests::binary_matrix_rank).
//!
//! The rank is determined with the two-pass elimination from Appendix F.1 of NIST SP 800-22:
//! forward row operations produce an upper triangular form, backward row operations clear the
//! entries above each pivot. The rank is then the count of rows that are not all zero.

use crate::bitvec::BitBlock;
use crate::Error;

/// The maximum count of columns a [BinaryMatrix] can hold: one row is stored in one `u64`.
pub const MAX_COLUMNS: usize = u64::BITS as usize;

/// A binary matrix, each row packed into one `u64`. Column 0 is the most significant used bit.
///
/// Only mutated while computing its rank, see [BinaryMatrix::rank].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMatrix {
    rows: Vec<u64>,
    cols: usize,
}

impl BinaryMatrix {
    /// Create a matrix from its packed rows. Each row holds `cols` bits, the first column being
    /// the most significant of them. Fails if `cols` is 0 or greater than [MAX_COLUMNS] or if a
    /// row has bits set outside of the columns.
    pub fn from_rows(rows: Vec<u64>, cols: usize) -> Result<Self, Error> {
        if cols == 0 || cols > MAX_COLUMNS {
            return Err(Error::InvalidParameter(format!(
                "column count has to be in 1..={MAX_COLUMNS}, is {cols}"
            )));
        }
        if rows.is_empty() {
            return Err(Error::InvalidParameter("a matrix needs at least 1 row".to_owned()));
        }
        let too_wide = |row: &&u64| row.checked_shr(cols as u32).unwrap_or(0) != 0;
        if let Some(row) = rows.iter().find(too_wide) {
            return Err(Error::InvalidParameter(format!(
                "row {row:#b} has more than {cols} columns"
            )));
        }

        Ok(Self { rows, cols })
    }

    /// Reshape a block of `rows * cols` bits into a matrix, filling it row by row.
    pub fn from_block(block: BitBlock<'_>, rows: usize, cols: usize) -> Result<Self, Error> {
        if block.len_bit() != rows * cols {
            return Err(Error::InvalidParameter(format!(
                "a {rows}x{cols} matrix needs {} bits, the block has {}",
                rows * cols,
                block.len_bit()
            )));
        }
        if cols == 0 || cols > MAX_COLUMNS {
            return Err(Error::InvalidParameter(format!(
                "column count has to be in 1..={MAX_COLUMNS}, is {cols}"
            )));
        }

        let rows = (0..rows)
            .map(|row| block.bits_at_wide(row * cols, cols))
            .collect();

        Self::from_rows(rows, cols)
    }

    /// Count of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Count of columns.
    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// Get the bit in the given row and column
    #[inline]
    pub fn bit(&self, row_idx: usize, col_idx: usize) -> bool {
        (self.rows[row_idx] >> (self.cols - 1 - col_idx)) & 1 == 1
    }

    /// Swap 2 rows by their indices
    #[inline]
    fn swap_rows(&mut self, i: usize, j: usize) {
        self.rows.swap(i, j)
    }

    /// xor 2 rows, save the result in row target
    #[inline]
    fn xor_rows(&mut self, target: usize, i: usize) {
        self.rows[target] ^= self.rows[i];
    }

    /// Calculate the binary rank of the matrix according to Appendix F.1.
    ///
    /// The elimination runs over the first `min(rows, cols)` diagonal elements and happens in
    /// place, the matrix is consumed.
    pub fn rank(mut self) -> usize {
        let row_count = self.rows.len();
        let m = usize::min(row_count, self.cols);

        // Forward row operations
        for i in 0..(m - 1) {
            // Step 1: find a pivot for column i, searching downwards
            if !self.bit(i, i) {
                match ((i + 1)..row_count).find(|&row| self.bit(row, i)) {
                    Some(row) => self.swap_rows(i, row),
                    None => continue,
                }
            }

            // Step 2: eliminate the ones below the pivot
            for row in (i + 1)..row_count {
                if self.bit(row, i) {
                    self.xor_rows(row, i);
                }
            }
        }

        // Backward row operations
        for i in (1..m).rev() {
            // Step 1: find a pivot for column i, searching upwards
            if !self.bit(i, i) {
                match (0..i).rev().find(|&row| self.bit(row, i)) {
                    Some(row) => self.swap_rows(i, row),
                    None => continue,
                }
            }

            // Step 2: eliminate the ones above the pivot
            for row in (0..i).rev() {
                if self.bit(row, i) {
                    self.xor_rows(row, i);
                }
            }
        }

        // Step 3: rank = m - count of rows that are all zero
        let zero_rows = self.rows.iter().filter(|&&row| row == 0).count();
        m.saturating_sub(zero_rows)
    }
}

impl BitBlock<'_> {
    /// Like [BitBlock::bits_at], but for up to 64 bits.
    pub(crate) fn bits_at_wide(&self, offset: usize, count: usize) -> u64 {
        debug_assert!(count <= MAX_COLUMNS);

        let high = count.saturating_sub(32);
        let low = count - high;

        let high_bits = if high > 0 { self.bits_at(offset, high) } else { 0 };
        (high_bits << low) | self.bits_at(offset + high, low)
    }
}
