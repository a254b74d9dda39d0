//! The registry of all tests: every test is reachable through the uniform signature [TestFn],
//! which allows iterating over the tests, running them in parallel and testing them independently.

use crate::bitvec::BitVec;
use crate::tests::template_matching::{non_overlapping, overlapping};
use crate::tests::*;
use crate::{get_min_length_for_test, Error, Test, TestArgs, TestResult};
use strum::IntoEnumIterator;

/// The uniform signature every registered test is called with.
pub type TestFn = fn(&BitVec, &TestArgs) -> Result<TestResult, Error>;

impl Test {
    /// The registered function of this test.
    pub fn function(self) -> TestFn {
        match self {
            Test::Monobit => |data, _| frequency::frequency_test(data),
            Test::BlockFrequency => {
                |data, args| frequency_block::frequency_block_test(data, args.frequency_block)
            }
            Test::IndependentRuns => |data, _| runs::runs_test(data),
            Test::LongestRun => |data, _| longest_run_of_ones::longest_run_of_ones_test(data),
            Test::MatrixRank => |data, args| {
                binary_matrix_rank::binary_matrix_rank_test(data, args.binary_matrix_rank)
            },
            Test::Spectral => |data, _| spectral_dft::spectral_dft_test(data),
            Test::NonOverlappingTemplate => |data, args| {
                non_overlapping::non_overlapping_template_matching_test(
                    data,
                    args.non_overlapping_template,
                )
            },
            Test::OverlappingTemplate => |data, args| {
                overlapping::overlapping_template_matching_test(data, args.overlapping_template)
            },
        }
    }
}

/// All registered tests with their functions, in battery order.
pub fn registry() -> impl Iterator<Item = (Test, TestFn)> {
    Test::iter().map(|test| (test, test.function()))
}

/// Runs one test on the sequence, with the arguments for the test taken from `args`.
///
/// If the sequence is shorter than the [minimum length](get_min_length_for_test) of the test,
/// the test is not run and the [skip sentinel](TestResult::SKIP_SENTINEL) is returned.
pub fn run_test(test: Test, data: &BitVec, args: &TestArgs) -> Result<TestResult, Error> {
    let min_length = get_min_length_for_test(test, args);
    if data.len_bit() < min_length.get() {
        log::trace!(
            "{test}: {} bits are fewer than the minimum of {min_length}, skipping",
            data.len_bit()
        );
        return Ok(TestResult::skipped(
            "The sequence is shorter than the minimum input length.",
        ));
    }

    let result = test.function()(data, args)?;
    log::trace!("{test}: p-value {}", result.p_value());

    Ok(result)
}

/// Runs all given tests on the sequence, one after another, returning the results in the order of
/// the given tests.
pub fn run_tests(
    tests: impl IntoIterator<Item = Test>,
    data: &BitVec,
    args: &TestArgs,
) -> Vec<(Test, Result<TestResult, Error>)> {
    tests
        .into_iter()
        .map(|test| (test, run_test(test, data, args)))
        .collect()
}
