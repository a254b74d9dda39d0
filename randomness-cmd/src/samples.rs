//! Loading the samples of a dataset from its text representation.

use randomness_lib::bitvec::BitVec;
use randomness_lib::Error;
use std::num::NonZero;

/// Parse the samples of a dataset.
///
/// Without a window, each non-empty line is one sample and must consist of only '0' or '1'
/// (surrounding whitespace is ignored). With a window, the whole text is read as one sequence,
/// skipping whitespace, and split into samples of exactly `window` bits, discarding the
/// remainder. Any character other than '0', '1' or whitespace is an [Error::InvalidInput].
pub fn parse_samples(text: &str, window: Option<NonZero<usize>>) -> Result<Vec<BitVec>, Error> {
    match window {
        Some(window) => Ok(BitVec::from_ascii_str_skip_whitespace(text)?.split(window)),
        None => text
            .lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(idx, line)| {
                BitVec::from_ascii_str(line).map_err(|err| match err {
                    Error::InvalidInput(msg) => {
                        Error::InvalidInput(format!("line {}: {msg}", idx + 1))
                    }
                    err => err,
                })
            })
            .collect(),
    }
}
