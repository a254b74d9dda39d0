//! Everything needed to store the data to test.
//!
//! A [BitVec] is created once per sample and never mutated by a test. Tests that work on blocks of
//! the sequence use [BitBlock] views, which are only offsets into the one shared buffer.

use crate::{Error, BYTE_SIZE};
use std::mem;
use std::num::NonZero;

mod blocks;
pub mod iter;

pub use blocks::{BitBlock, Blocks};
pub use iter::BitIter;

/// Bits per storage word.
pub(crate) const WORD_BITS: usize = usize::BITS as usize;

/// A list of bits, tightly packed - used in all tests.
///
/// The bits are stored MSB first: the bit with index 0 is the most significant bit of the first
/// word. Unused bits of the last word are always 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitVec {
    // data storage
    pub(crate) words: Box<[usize]>,
    // count of bits in the last word - maximum of usize::BITS - 1.
    pub(crate) bit_count_last_word: u8,
}

impl BitVec {
    /// How many bits the Vec contains
    pub fn len_bit(&self) -> usize {
        if self.bit_count_last_word == 0 {
            self.words.len() * WORD_BITS
        } else {
            (self.words.len() - 1) * WORD_BITS + (self.bit_count_last_word as usize)
        }
    }

    /// If the BitVec contains no bits at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the bit at the given index.
    ///
    /// ## Panics
    /// If the index is out of bounds.
    #[inline]
    pub fn bit(&self, idx: usize) -> bool {
        assert!(idx < self.len_bit(), "bit index {idx} out of bounds");
        (self.words[idx / WORD_BITS] >> (WORD_BITS - 1 - idx % WORD_BITS)) & 1 == 1
    }

    /// The count of bits with the value 1.
    pub fn count_ones(&self) -> usize {
        // unused bits are always 0, no masking necessary
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterate over all bits, in order.
    pub fn iter(&self) -> BitIter<'_> {
        BitIter::new(self, 0, self.len_bit())
    }

    /// Crop the BitVec to the passed bit length. This operation does nothing
    /// if the previous length is smaller than the new length.
    pub fn crop(&mut self, new_bit_len: usize) {
        if new_bit_len < self.len_bit() {
            let mut new_len = new_bit_len / WORD_BITS;
            let additional_bits = (new_bit_len % WORD_BITS) as u8;

            if additional_bits > 0 {
                new_len += 1
            }

            let mut data = mem::take(&mut self.words).into_vec();
            data.truncate(new_len);
            if additional_bits > 0 {
                if let Some(last) = data.last_mut() {
                    *last &= last_word_mask(additional_bits);
                }
            }
            self.words = data.into_boxed_slice();

            self.bit_count_last_word = additional_bits;
        }
    }

    /// Returns a new BitVec with every bit flipped.
    pub fn complement(&self) -> Self {
        let mut words = self.words.iter().map(|word| !word).collect::<Box<[usize]>>();

        if self.bit_count_last_word != 0 {
            if let Some(last) = words.last_mut() {
                *last &= last_word_mask(self.bit_count_last_word);
            }
        }

        Self {
            words,
            bit_count_last_word: self.bit_count_last_word,
        }
    }

    /// Split the sequence into consecutive windows of `window_len` bits each, e.g. one window per
    /// time period. A remainder shorter than `window_len` is discarded.
    pub fn split(&self, window_len: NonZero<usize>) -> Vec<BitVec> {
        self.blocks(window_len).map(|block| block.to_bitvec()).collect()
    }

    /// Iterate over the disjoint blocks of `block_len` bits. Trailing bits that do not fill a whole
    /// block are not part of any block.
    pub fn blocks(&self, block_len: NonZero<usize>) -> Blocks<'_> {
        Blocks::new(self, block_len.get())
    }

    /// A view on the block starting at bit `start` with `len` bits.
    ///
    /// ## Panics
    /// If the block does not lie within the sequence.
    pub fn block(&self, start: usize, len: usize) -> BitBlock<'_> {
        assert!(
            start + len <= self.len_bit(),
            "block {start}..{} out of bounds",
            start + len
        );
        BitBlock::new(self, start, len)
    }

    /// A view on the whole sequence.
    pub fn as_block(&self) -> BitBlock<'_> {
        BitBlock::new(self, 0, self.len_bit())
    }

    /// Creates a [BitVec] from a string, with the ASCII char "0" mapping to 0 and "1" mapping to 1.
    /// No other character is allowed, [Error::InvalidInput] is returned for any other character
    /// and for an empty string.
    pub fn from_ascii_str(value: &str) -> Result<Self, Error> {
        if value.is_empty() {
            return Err(Error::InvalidInput("the sequence is empty".to_owned()));
        }

        let words = value
            .as_bytes()
            .chunks(WORD_BITS)
            .enumerate()
            .map(|(chunk_idx, chunk)| {
                // [0] = MSB
                chunk
                    .iter()
                    .enumerate()
                    .try_fold(0usize, |word, (i, char)| match *char {
                        b'1' => Ok(word | (1 << (WORD_BITS - i - 1))),
                        // no need to change the value itself
                        b'0' => Ok(word),
                        other => Err(Error::InvalidInput(format!(
                            "invalid character {:?} at position {}",
                            other as char,
                            chunk_idx * WORD_BITS + i
                        ))),
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            words,
            bit_count_last_word: (value.len() % WORD_BITS) as u8,
        })
    }

    /// Creates a [BitVec] from a string, with the ASCII char "0" mapping to 0 and "1" mapping to 1.
    /// ASCII whitespace (spaces, tabs, line breaks) is skipped, any other character is an
    /// [Error::InvalidInput] with its byte position. If no bit is found, [Error::InvalidInput] is
    /// returned as well.
    pub fn from_ascii_str_skip_whitespace(value: &str) -> Result<Self, Error> {
        let mut builder = Builder::default();

        for (position, char) in value.bytes().enumerate() {
            match char {
                b'1' => builder.push(true),
                b'0' => builder.push(false),
                char if char.is_ascii_whitespace() => {}
                // report the whole (possibly multibyte) character
                _ => {
                    let char = value[position..].chars().next().unwrap_or_default();
                    return Err(Error::InvalidInput(format!(
                        "invalid character {char:?} at position {position}"
                    )));
                }
            }
        }

        if builder.len == 0 {
            return Err(Error::InvalidInput(
                "the sequence contains no '0' or '1'".to_owned(),
            ));
        }

        Ok(builder.finish())
    }

    /// Returns `count` bits starting with bit `start` as the lowest bits of a number, the first bit
    /// being the most significant one. At most 32 bits can be read at once.
    pub(crate) fn bits_at(&self, start: usize, count: usize) -> u64 {
        debug_assert!(count <= 32);
        debug_assert!(start + count <= self.len_bit());

        let mut value = 0_u64;
        let mut taken = 0;
        let mut idx = start;

        while taken < count {
            let offset = idx % WORD_BITS;
            let available = usize::min(WORD_BITS - offset, count - taken);
            // shift out the bits before the start, then the bits after the end
            let part = (self.words[idx / WORD_BITS] << offset) >> (WORD_BITS - available);

            value = (value << available) | (part as u64);
            taken += available;
            idx += available;
        }

        value
    }

    /// Count the ones in the bit range `start..(start + len)`.
    pub(crate) fn count_ones_range(&self, start: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }

        let end = start + len;
        let first = start / WORD_BITS;
        let last = (end - 1) / WORD_BITS;

        (first..=last)
            .map(|word_idx| {
                let mut word = self.words[word_idx];
                if word_idx == first {
                    word &= usize::MAX >> (start % WORD_BITS);
                }
                if word_idx == last {
                    let used = (end - 1) % WORD_BITS + 1;
                    word &= usize::MAX << (WORD_BITS - used);
                }
                word.count_ones() as usize
            })
            .sum()
    }

    /// Count the positions `k` where bit `k` differs from bit `k + 1`.
    pub(crate) fn count_transitions(&self) -> usize {
        let n = self.len_bit();
        if n < 2 {
            return 0;
        }
        let pairs = n - 1;

        self.words
            .iter()
            .enumerate()
            .take_while(|(idx, _)| idx * WORD_BITS < pairs)
            .map(|(idx, &word)| {
                // the successor of the last bit in this word is the first bit of the next word
                let next_msb = self
                    .words
                    .get(idx + 1)
                    .map_or(0, |next| next >> (WORD_BITS - 1));
                let mut diff = word ^ ((word << 1) | next_msb);

                let valid = usize::min(pairs - idx * WORD_BITS, WORD_BITS);
                if valid < WORD_BITS {
                    diff &= usize::MAX << (WORD_BITS - valid);
                }

                diff.count_ones() as usize
            })
            .sum()
    }
}

/// Mask for the valid bits of the last word, `bits` in `1..WORD_BITS`.
#[inline]
fn last_word_mask(bits: u8) -> usize {
    !(usize::MAX >> bits)
}

/// Sequential helper to build a [BitVec] bit by bit.
#[derive(Default)]
struct Builder {
    words: Vec<usize>,
    len: usize,
}

impl Builder {
    fn push(&mut self, bit: bool) {
        let offset = self.len % WORD_BITS;
        if offset == 0 {
            self.words.push(0);
        }
        if bit {
            // there is always at least 1 word in the vec
            if let Some(word) = self.words.last_mut() {
                *word |= 1 << (WORD_BITS - offset - 1);
            }
        }
        self.len += 1;
    }

    fn finish(self) -> BitVec {
        BitVec {
            words: self.words.into_boxed_slice(),
            bit_count_last_word: (self.len % WORD_BITS) as u8,
        }
    }
}

impl From<&[bool]> for BitVec {
    /// Creates a [BitVec] from a list of bools, with `true` mapping to 1.
    fn from(value: &[bool]) -> Self {
        let mut builder = Builder::default();
        value.iter().for_each(|&bit| builder.push(bit));
        builder.finish()
    }
}

impl From<&[u8]> for BitVec {
    /// Creates a [BitVec] from raw bytes, 8 bits per byte, the MSB of each byte first.
    fn from(value: &[u8]) -> Self {
        const BYTES_PER_WORD: usize = WORD_BITS / BYTE_SIZE;

        let words = value
            .chunks(BYTES_PER_WORD)
            .map(|chunk| {
                let mut bytes = [0_u8; BYTES_PER_WORD];
                bytes[..chunk.len()].copy_from_slice(chunk);
                usize::from_be_bytes(bytes)
            })
            .collect();

        Self {
            words,
            bit_count_last_word: ((value.len() % BYTES_PER_WORD) * BYTE_SIZE) as u8,
        }
    }
}

impl From<Vec<u8>> for BitVec {
    fn from(value: Vec<u8>) -> Self {
        Self::from(value.as_slice())
    }
}
