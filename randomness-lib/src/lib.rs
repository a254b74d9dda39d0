#![doc = include_str!("../README.md")]

use crate::tests::binary_matrix_rank::MatrixRankTestArg;
use crate::tests::frequency_block::FrequencyBlockTestArg;
use crate::tests::template_matching::non_overlapping::NonOverlappingTemplateTestArgs;
use crate::tests::template_matching::overlapping::OverlappingTemplateTestArgs;
use std::num::NonZero;
use strum::{Display, EnumIter};
use thiserror::Error;

pub use strum::IntoEnumIterator;

// internal usage only
pub(crate) mod internals;
#[cfg(test)]
mod unit_tests;

// public exports
pub mod aggregation;
pub mod battery;
pub mod binary_rank;
pub mod bitvec;
pub mod test_runner;
pub mod tests;

// shared data structures

/// How many bits a byte has
const BYTE_SIZE: usize = 8;

/// The significance level each single p-value is compared against.
pub const SIGNIFICANCE_LEVEL: f64 = 0.001;

/// List of all tests of the battery, in the order they are run and reported.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, EnumIter, Display)]
#[repr(u8)]
pub enum Test {
    /// See [tests::frequency].
    Monobit = 0,
    /// See [tests::frequency_block].
    BlockFrequency = 1,
    /// See [tests::runs].
    IndependentRuns = 2,
    /// See [tests::longest_run_of_ones].
    LongestRun = 3,
    /// See [tests::binary_matrix_rank].
    MatrixRank = 4,
    /// See [tests::spectral_dft].
    Spectral = 5,
    /// See [tests::template_matching::non_overlapping].
    NonOverlappingTemplate = 6,
    /// See [tests::template_matching::overlapping].
    OverlappingTemplate = 7,
}

impl Test {
    /// The numbered label used when reporting this test, e.g. "01. Monobit Test".
    pub fn label(self) -> &'static str {
        match self {
            Test::Monobit => "01. Monobit Test",
            Test::BlockFrequency => "02. Block Frequency Test",
            Test::IndependentRuns => "03. Independent Runs Test",
            Test::LongestRun => "04. Longest Runs Test",
            Test::MatrixRank => "05. Matrix Rank Test",
            Test::Spectral => "06. Spectral Test",
            Test::NonOverlappingTemplate => "07. Non Overlapping Patterns",
            Test::OverlappingTemplate => "08. Overlapping Patterns",
        }
    }
}

/// All test arguments for use in a [Battery](battery::Battery) or with
/// [run_test](test_runner::run_test), prefilled with sane defaults.
///
/// You can construct an instance, leaving all other arguments as the default, like this:
/// ```
/// use std::num::NonZero;
/// use randomness_lib::TestArgs;
/// use randomness_lib::tests::frequency_block::FrequencyBlockTestArg;
/// let args = TestArgs {
///     frequency_block: FrequencyBlockTestArg::new(NonZero::new(23).unwrap()),
///     ..Default::default()
/// };
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct TestArgs {
    pub frequency_block: FrequencyBlockTestArg,
    pub binary_matrix_rank: MatrixRankTestArg,
    pub non_overlapping_template: NonOverlappingTemplateTestArgs,
    pub overlapping_template: OverlappingTemplateTestArgs,
}

/// The common test result type, as used by all tests.
///
/// A result either holds a p-value in `[0, 1]` or the [skip sentinel](Self::SKIP_SENTINEL),
/// meaning that the test was not applicable to the sequence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TestResult {
    p_value: f64,
    comment: Option<&'static str>,
}

// private methods
impl TestResult {
    /// A new test result without comment.
    pub(crate) fn new(p_value: f64) -> Self {
        Self {
            p_value,
            comment: None,
        }
    }

    /// A new test result with a comment.
    pub(crate) fn new_with_comment(p_value: f64, comment: &'static str) -> Self {
        Self {
            p_value,
            comment: Some(comment),
        }
    }

    /// A skipped test, the comment states why.
    pub(crate) fn skipped(comment: &'static str) -> Self {
        Self::new_with_comment(Self::SKIP_SENTINEL, comment)
    }
}

// public methods
impl TestResult {
    /// The value a test returns if it is not applicable to the input.
    pub const SKIP_SENTINEL: f64 = -1.0;

    /// Wraps a raw value, e.g. one that was read back from a report. No range check is done.
    pub fn from_p_value(p_value: f64) -> Self {
        Self::new(p_value)
    }

    /// The p_value (result of the test)
    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    /// If the test was not applicable to the sequence.
    pub fn is_skipped(&self) -> bool {
        self.p_value == Self::SKIP_SENTINEL
    }

    /// To determine if the test passed, based on the given threshold:
    /// The test passes if the [p_value](Self::p_value) is greater than the given threshold.
    /// A skipped test never passes.
    pub fn passed(&self, threshold: f64) -> bool {
        !self.is_skipped() && self.p_value > threshold
    }

    /// Some tests leave a comment about the outcome.
    pub fn comment(&self) -> Option<&'static str> {
        self.comment
    }
}

/// The error type for all tests
#[derive(Error, Debug)]
pub enum Error {
    /// A numeric overflow happened. The String gives further information on where exactly.
    #[error("Overflow in {0}.")]
    Overflow(String),
    #[error("Result is not a number.")]
    NaN,
    #[error("Result is infinite.")]
    Infinite,
    #[error(transparent)]
    GammaFunctionFailed(#[from] statrs::StatsError),
    #[error("Invalid Parameter: {0}")]
    InvalidParameter(String),
    /// The input could not be converted into a bit sequence.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),
    #[error("Thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Sets the maximum of threads to be used by the battery. This method can only be called ONCE and
/// only BEFORE a test is started. If not used, the count of logical CPUs is used.
///
/// If called multiple times or after the first test, an error will be returned.
///
/// The library uses its own [rayon](https://docs.rs/rayon/latest/rayon/index.html) thread pool,
/// the global rayon pool of the calling code is not touched.
pub fn set_max_threads(max_threads: usize) -> Result<(), Error> {
    internals::init_thread_pool(max_threads)
}

/// Returns the minimum input length, in bits, for the specified test with the given arguments.
///
/// Shorter sequences are not tested, the result is the [skip sentinel](TestResult::SKIP_SENTINEL).
pub fn get_min_length_for_test(test: Test, args: &TestArgs) -> NonZero<usize> {
    use crate::tests;

    match test {
        Test::Monobit => tests::frequency::MIN_INPUT_LENGTH,
        Test::BlockFrequency => args.frequency_block.block_length(),
        Test::IndependentRuns => tests::runs::MIN_INPUT_LENGTH,
        Test::LongestRun => tests::longest_run_of_ones::MIN_INPUT_LENGTH,
        Test::MatrixRank => args.binary_matrix_rank.min_input_length(),
        Test::Spectral => tests::spectral_dft::MIN_INPUT_LENGTH,
        Test::NonOverlappingTemplate => args.non_overlapping_template.min_input_length(),
        Test::OverlappingTemplate => args.overlapping_template.min_input_length(),
    }
}
