//! Everything necessary for the [Non-Overlapping](non_overlapping) and [Overlapping](overlapping)
//! template matching tests. For the tests themselves, see the corresponding submodules.
//!
//! This module also contains the [Template] type used by both tests.

pub mod overlapping;

use crate::bitvec::BitBlock;
use std::fmt::{Display, Formatter};

/// The minimum template length, in bits.
pub const MIN_TEMPLATE_LEN: usize = 2;

/// The maximum template length, in bits.
pub const MAX_TEMPLATE_LEN: usize = 21;

/// A bit pattern that is searched for in the sequence.
///
/// For the template length `m`, the following bounds must be met: 2 <= `m` <= 21.
/// These bounds are checked by all creation functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Template {
    // the pattern, first bit being the most significant of the used bits
    bits: u32,
    len: usize,
}

impl Template {
    /// Create a template from its bits, the first bit of the template being bit `len - 1`.
    /// Returns `None` if the length is out of bounds or if `bits` has more than `len` bits.
    pub const fn from_bits(bits: u32, len: usize) -> Option<Self> {
        if len < MIN_TEMPLATE_LEN || len > MAX_TEMPLATE_LEN || (bits >> len) != 0 {
            None
        } else {
            Some(Self { bits, len })
        }
    }

    /// Create a template from a string of '0' and '1', e.g. "11110000".
    /// Returns `None` for any other character or if the length is out of bounds.
    pub fn from_ascii_str(value: &str) -> Option<Self> {
        if !(MIN_TEMPLATE_LEN..=MAX_TEMPLATE_LEN).contains(&value.len()) {
            return None;
        }

        let bits = value.bytes().try_fold(0_u32, |bits, char| match char {
            b'0' => Some(bits << 1),
            b'1' => Some((bits << 1) | 1),
            _ => None,
        })?;

        Self::from_bits(bits, value.len())
    }

    /// The template consisting of `len` ones. Returns `None` if the length is out of bounds.
    pub const fn all_ones(len: usize) -> Option<Self> {
        if len < MIN_TEMPLATE_LEN || len > MAX_TEMPLATE_LEN {
            None
        } else {
            Self::from_bits((1 << len) - 1, len)
        }
    }

    /// The template length m, in bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Templates are never empty, this always returns `false`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// If the template matches the block at the given offset. The template has to fit into the
    /// block at this offset.
    #[inline]
    pub(crate) fn matches_at(&self, block: &BitBlock<'_>, offset: usize) -> bool {
        block.bits_at(offset, self.len) == self.bits as u64
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0>width$b}", self.bits, width = self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitvec::BitVec;

    #[test]
    fn template_from_ascii_str() {
        let template = Template::from_ascii_str("000000001").unwrap();
        assert_eq!(template.len(), 9);
        assert_eq!(template.to_string(), "000000001");

        assert!(Template::from_ascii_str("1").is_none());
        assert!(Template::from_ascii_str("0120").is_none());
        assert!(Template::from_ascii_str(&"1".repeat(22)).is_none());
    }

    #[test]
    fn template_matches_across_words() {
        // the template starts in the first word and ends in the second one
        let mut input = "0".repeat(60);
        input.push_str("1111000");
        let data = BitVec::from_ascii_str(&input).unwrap();
        let block = data.as_block();
        let template = Template::from_ascii_str("11110000").unwrap();

        assert!(!template.matches_at(&block, 58));
        assert!(Template::from_ascii_str("111100").unwrap().matches_at(&block, 60));
        assert_eq!(Template::all_ones(9).unwrap().to_string(), "111111111");
    }
}
