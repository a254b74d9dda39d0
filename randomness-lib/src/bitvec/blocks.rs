//! Block views on a [BitVec]: index-bounded windows into the one shared buffer.

use crate::bitvec::{BitIter, BitVec};
use rayon::prelude::*;
use std::iter::FusedIterator;
use std::num::NonZero;

/// A contiguous part of a [BitVec], given by start offset and length. Creating a block does not
/// copy any data.
#[derive(Copy, Clone, Debug)]
pub struct BitBlock<'a> {
    data: &'a BitVec,
    start: usize,
    len: usize,
}

impl<'a> BitBlock<'a> {
    pub(crate) fn new(data: &'a BitVec, start: usize, len: usize) -> Self {
        Self { data, start, len }
    }

    /// The count of bits in this block.
    pub fn len_bit(&self) -> usize {
        self.len
    }

    /// If the block contains no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The offset of the block in the underlying sequence.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the bit at the given index, relative to the block start.
    ///
    /// ## Panics
    /// If the index is out of bounds.
    pub fn bit(&self, idx: usize) -> bool {
        assert!(idx < self.len, "bit index {idx} out of block bounds");
        self.data.bit(self.start + idx)
    }

    /// The count of bits with the value 1.
    pub fn count_ones(&self) -> usize {
        self.data.count_ones_range(self.start, self.len)
    }

    /// Iterate over all bits of the block.
    pub fn iter(&self) -> BitIter<'a> {
        BitIter::new(self.data, self.start, self.start + self.len)
    }

    /// The length of the longest uninterrupted run of ones in this block.
    pub fn longest_run_of_ones(&self) -> usize {
        let (longest, current) = self.iter().fold((0, 0), |(longest, current), bit| {
            if bit {
                (longest, current + 1)
            } else {
                (usize::max(longest, current), 0)
            }
        });

        // the block may end with a run
        usize::max(longest, current)
    }

    /// Reads `count` bits (at most 32), starting at `offset` relative to the block start, as a
    /// number with the first bit being the most significant one.
    pub(crate) fn bits_at(&self, offset: usize, count: usize) -> u64 {
        debug_assert!(offset + count <= self.len);
        self.data.bits_at(self.start + offset, count)
    }

    /// Copies the block into an own [BitVec].
    pub fn to_bitvec(&self) -> BitVec {
        let bits = self.iter().collect::<Vec<_>>();
        BitVec::from(bits.as_slice())
    }
}

/// Iterator over the disjoint, equally long blocks of a [BitVec].
/// Created by [BitVec::blocks].
#[derive(Clone, Debug)]
pub struct Blocks<'a> {
    data: &'a BitVec,
    block_len: usize,
    next: usize,
    count: usize,
}

impl<'a> Blocks<'a> {
    pub(crate) fn new(data: &'a BitVec, block_len: usize) -> Self {
        Self {
            data,
            block_len,
            next: 0,
            count: data.len_bit() / block_len,
        }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = BitBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.count {
            let block = BitBlock::new(self.data, self.next * self.block_len, self.block_len);
            self.next += 1;
            Some(block)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.count - self.next;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Blocks<'_> {}

impl FusedIterator for Blocks<'_> {}

impl BitVec {
    /// Parallel version of [BitVec::blocks], yielding the blocks in their original order.
    pub fn par_blocks(
        &self,
        block_len: NonZero<usize>,
    ) -> impl IndexedParallelIterator<Item = BitBlock<'_>> {
        let block_len = block_len.get();
        let count = self.len_bit() / block_len;

        (0..count)
            .into_par_iter()
            .map(move |idx| BitBlock::new(self, idx * block_len, block_len))
    }
}
