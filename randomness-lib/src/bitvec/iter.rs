//! Iterators over the bits of a [BitVec].

use crate::bitvec::{BitVec, WORD_BITS};
use std::iter::FusedIterator;

/// Iterator over a range of bits of a [BitVec], yielding `true` for 1 and `false` for 0.
#[derive(Clone, Debug)]
pub struct BitIter<'a> {
    data: &'a BitVec,
    // next index to yield from the front
    front: usize,
    // one past the next index to yield from the back
    back: usize,
}

impl<'a> BitIter<'a> {
    /// Iterate over the bits `start..end`. The range has to be within the BitVec.
    pub(crate) fn new(data: &'a BitVec, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= data.len_bit());
        Self {
            data,
            front: start,
            back: end,
        }
    }

    #[inline]
    fn get(&self, idx: usize) -> bool {
        (self.data.words[idx / WORD_BITS] >> (WORD_BITS - 1 - idx % WORD_BITS)) & 1 == 1
    }
}

impl Iterator for BitIter<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            let bit = self.get(self.front);
            self.front += 1;
            Some(bit)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = usize::min(self.front.saturating_add(n), self.back);
        self.next()
    }
}

impl DoubleEndedIterator for BitIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            self.back -= 1;
            Some(self.get(self.back))
        } else {
            None
        }
    }
}

impl ExactSizeIterator for BitIter<'_> {}

impl FusedIterator for BitIter<'_> {}

impl<'a> IntoIterator for &'a BitVec {
    type Item = bool;
    type IntoIter = BitIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
