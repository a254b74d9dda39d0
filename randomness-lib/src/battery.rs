//! The test battery: every sample of a dataset is run through every selected test.
//!
//! Each (sample, test) pair is an independent unit of work, all units are dispatched to the thread
//! pool of the library. The results are collected per test, in sample order, before they are
//! handed to the [aggregation](crate::aggregation).

use crate::aggregation::{aggregate, AggregateResult};
use crate::bitvec::BitVec;
use crate::internals::thread_pool;
use crate::test_runner::run_test;
use crate::tests::binary_matrix_rank::MatrixRankTestArg;
use crate::tests::frequency_block::FrequencyBlockTestArg;
use crate::{Error, Test, TestArgs, TestResult};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::num::NonZero;
use strum::IntoEnumIterator;

/// The results of one test for all samples of a dataset, in sample order.
pub type SampleResultSet = Vec<TestResult>;

/// A battery: the tests to run and their arguments.
#[derive(Clone, Debug)]
pub struct Battery {
    tests: Vec<Test>,
    args: TestArgs,
}

impl Battery {
    /// A battery running all tests with the given arguments.
    pub fn new(args: TestArgs) -> Self {
        Self {
            tests: Test::iter().collect(),
            args,
        }
    }

    /// A battery running only the given tests. Duplicates are removed, the tests are run and
    /// reported in battery order.
    pub fn with_tests(tests: impl IntoIterator<Item = Test>, args: TestArgs) -> Self {
        let mut tests = tests.into_iter().collect::<Vec<_>>();
        tests.sort();
        tests.dedup();

        Self { tests, args }
    }

    /// The tests this battery runs.
    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    /// The test arguments.
    pub fn args(&self) -> &TestArgs {
        &self.args
    }

    /// Run every test of the battery on every sample.
    ///
    /// Fails with [Error::InvalidParameter] if there are no samples. A test that returns an error
    /// for any sample is not part of the [results](DatasetReport::results), the first of its
    /// errors is in [errors](DatasetReport::errors). The other tests are not affected.
    pub fn run(&self, dataset_name: &str, samples: &[BitVec]) -> Result<DatasetReport, Error> {
        if samples.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "dataset \"{dataset_name}\" contains no samples"
            )));
        }

        log::debug!(
            "running {} tests on {} samples of dataset \"{dataset_name}\"",
            self.tests.len(),
            samples.len()
        );

        let test_count = self.tests.len();
        let args = &self.args;
        let tests = &self.tests;

        // one unit per (sample, test) pair, the collected list keeps the unit order
        let results = thread_pool()?.install(|| {
            (0..samples.len() * test_count)
                .into_par_iter()
                .map(|unit| {
                    let (sample_idx, test) = (unit / test_count, tests[unit % test_count]);
                    log::trace!("dataset \"{dataset_name}\": sample {sample_idx}, {test}");
                    run_test(test, &samples[sample_idx], args)
                })
                .collect::<Vec<_>>()
        });

        // barrier: every unit is done
        let (results, errors) = sort_per_test(dataset_name, &self.tests, results);

        log::debug!("finished dataset \"{dataset_name}\"");

        Ok(DatasetReport {
            name: dataset_name.to_owned(),
            sample_count: samples.len(),
            results,
            errors,
        })
    }
}

/// Sort the unit results (in unit order, the tests of the first sample, then the tests of the
/// second sample and so on) into per-test lists. A test with an error on any sample has no list,
/// only its first error.
pub(crate) fn sort_per_test(
    dataset_name: &str,
    tests: &[Test],
    results: Vec<Result<TestResult, Error>>,
) -> (BTreeMap<Test, SampleResultSet>, BTreeMap<Test, Error>) {
    let mut per_test = tests
        .iter()
        .map(|&test| (test, Vec::new()))
        .collect::<BTreeMap<Test, SampleResultSet>>();
    let mut errors = BTreeMap::new();

    for (unit, result) in results.into_iter().enumerate() {
        let (sample_idx, test) = (unit / tests.len(), tests[unit % tests.len()]);
        match result {
            Ok(result) => {
                if let Some(list) = per_test.get_mut(&test) {
                    list.push(result);
                }
            }
            Err(err) => {
                log::error!(
                    "dataset \"{dataset_name}\": {test} failed on sample {sample_idx}: {err}"
                );
                errors.entry(test).or_insert(err);
            }
        }
    }
    // incomplete lists cannot be aggregated
    per_test.retain(|test, _| !errors.contains_key(test));

    (per_test, errors)
}

impl Default for Battery {
    fn default() -> Self {
        Self::new(TestArgs::default())
    }
}

/// The results of one battery run on one dataset.
#[derive(Debug)]
pub struct DatasetReport {
    /// The name of the dataset.
    pub name: String,
    /// The count of samples in the dataset.
    pub sample_count: usize,
    /// The results of each test, in sample order.
    pub results: BTreeMap<Test, SampleResultSet>,
    /// The tests that returned an error for at least one sample, with the error of the first
    /// such sample.
    pub errors: BTreeMap<Test, Error>,
}

impl DatasetReport {
    /// Aggregate the results of each test over all samples.
    pub fn aggregate(&self) -> Result<BTreeMap<Test, AggregateResult>, Error> {
        self.results
            .iter()
            .map(|(&test, results)| {
                let aggregated = aggregate(results)?;
                if aggregated.is_skipped() {
                    log::warn!(
                        "dataset \"{}\": {test} was skipped for at least one sample",
                        self.name
                    );
                }
                Ok((test, aggregated))
            })
            .collect()
    }
}

/// Runs all tests on every sample of the dataset, with the block length of the
/// [block frequency test](crate::tests::frequency_block) and the dimension of the
/// [matrix rank test](crate::tests::binary_matrix_rank) given. All other arguments are the
/// defaults.
///
/// Returns the results of each test, in sample order. A test that returned an error is missing,
/// see [Battery::run].
pub fn run_battery(
    dataset_name: &str,
    samples: &[BitVec],
    block_size: NonZero<usize>,
    matrix_dimension: usize,
) -> Result<BTreeMap<Test, SampleResultSet>, Error> {
    let binary_matrix_rank = MatrixRankTestArg::new(matrix_dimension).ok_or_else(|| {
        Error::InvalidParameter(format!("invalid matrix dimension {matrix_dimension}"))
    })?;

    let args = TestArgs {
        frequency_block: FrequencyBlockTestArg::new(block_size),
        binary_matrix_rank,
        ..Default::default()
    };

    Ok(Battery::new(args).run(dataset_name, samples)?.results)
}
