//! Struct and conversion method for a validated arg.

use crate::cmd_args::{dataset_name_from_path, DatasetArg, RegularArgs};
use crate::toml_config::{TomlConfig, TomlDataset, TomlInput, TomlOutput, TomlTest};
use randomness_lib::tests::binary_matrix_rank::MatrixRankTestArg;
use randomness_lib::tests::frequency_block::FrequencyBlockTestArg;
use randomness_lib::{IntoEnumIterator, Test, TestArgs};
use std::num::NonZero;
use std::path::PathBuf;

/// Which tests are to be run (allowed or blocked)
#[derive(Clone, Debug, PartialEq)]
pub enum TestsToRun {
    AllowList(Vec<Test>),
    BlockList(Vec<Test>),
    All,
}

impl TestsToRun {
    /// The tests to run, in battery order.
    pub fn select(&self) -> Vec<Test> {
        match self {
            TestsToRun::AllowList(tests) => Test::iter().filter(|t| tests.contains(t)).collect(),
            TestsToRun::BlockList(tests) => Test::iter().filter(|t| !tests.contains(t)).collect(),
            TestsToRun::All => Test::iter().collect(),
        }
    }
}

impl From<crate::cmd_args::TestsToRun> for TestsToRun {
    fn from(value: crate::cmd_args::TestsToRun) -> Self {
        if let Some(tests) = value.tests {
            let tests = tests.into_iter().map(From::from).collect();
            TestsToRun::AllowList(tests)
        } else if let Some(tests) = value.exclude_tests {
            let tests = tests.into_iter().map(From::from).collect();
            TestsToRun::BlockList(tests)
        } else {
            TestsToRun::All
        }
    }
}

impl From<TomlTest> for TestsToRun {
    fn from(value: TomlTest) -> Self {
        if let Some(tests) = value.include {
            let tests = tests.into_iter().map(From::from).collect();
            TestsToRun::AllowList(tests)
        } else if let Some(tests) = value.exclude {
            let tests = tests.into_iter().map(From::from).collect();
            TestsToRun::BlockList(tests)
        } else {
            TestsToRun::All
        }
    }
}

/// A dataset to test.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    /// The name used in the report
    pub name: String,
    /// Path to the sample file
    pub file: PathBuf,
    /// Optional period (start year, end year) the samples span.
    pub period: Option<(i32, i32)>,
}

impl From<DatasetArg> for Dataset {
    fn from(value: DatasetArg) -> Self {
        Self {
            name: value.name,
            file: value.file,
            period: None,
        }
    }
}

impl From<TomlDataset> for Dataset {
    fn from(value: TomlDataset) -> Self {
        let TomlDataset {
            name,
            file,
            start_year,
            end_year,
        } = value;

        Self {
            name: name.unwrap_or_else(|| dataset_name_from_path(&file)),
            file,
            period: start_year.zip(end_year),
        }
    }
}

/// A validated config with a valid state that can be used to run tests.
#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    /// The datasets, at least one.
    pub datasets: Vec<Dataset>,
    /// Split each dataset file into samples of this many bits instead of reading one sample per
    /// line.
    pub window: Option<NonZero<usize>>,
    /// The exact tests to be run.
    pub tests_to_run: TestsToRun,
    /// Finished test arguments
    pub test_arguments: TestArgs,
    /// An optional path to save the outputs to.
    pub output_path: Option<PathBuf>,
    /// Write console output about individual samples, else only summaries.
    pub console_output: bool,
    /// Maximum count of threads, `None` for the library default.
    pub threads: Option<NonZero<usize>>,
}

impl ValidatedConfig {
    /// Creates a valid config from the command line arguments.
    pub fn try_from_cmd_args(args: RegularArgs) -> Result<Self, &'static str> {
        Self::try_from_toml(TomlConfig::default(), args)
    }

    /// Creates a valid config from the specified toml configuration, uses overrides from the
    /// command line.
    pub fn try_from_toml(toml: TomlConfig, args: RegularArgs) -> Result<Self, &'static str> {
        let TomlConfig {
            input: TomlInput { datasets, window },
            test,
            arguments,
            output,
            threads,
        } = toml;

        let TomlOutput {
            csv: output_path,
            quiet,
        } = output.unwrap_or_default();

        let RegularArgs {
            datasets: args_datasets,
            window: args_window,
            block_size,
            matrix_dimension,
            output_path: args_output_path,
            tests_to_run,
            threads: args_threads,
            quiet: args_quiet,
        } = args;

        // cmd args overwrite everywhere
        let datasets: Vec<Dataset> = if args_datasets.is_empty() {
            datasets.into_iter().map(From::from).collect()
        } else {
            args_datasets.into_iter().map(From::from).collect()
        };
        if datasets.is_empty() {
            return Err("No dataset is specified in the config file or the cmd args!");
        }

        let window = args_window.or(window);
        let output_path = args_output_path.or(output_path);
        let console_output = !(args_quiet || quiet);
        let threads = args_threads.or(threads);

        let tests_to_run: TestsToRun = {
            let cmd_tests_to_run = tests_to_run.into();

            if let TestsToRun::All = &cmd_tests_to_run {
                // no command line switch was specified, use the toml file
                test.into()
            } else {
                cmd_tests_to_run
            }
        };

        let mut test_arguments: TestArgs = match arguments {
            Some(arguments) => arguments.try_into()?,
            None => Default::default(),
        };

        if let Some(block_size) = block_size {
            test_arguments.frequency_block = FrequencyBlockTestArg::new(block_size);
        }

        if let Some(matrix_dimension) = matrix_dimension {
            test_arguments.binary_matrix_rank = MatrixRankTestArg::new(matrix_dimension)
                .ok_or("The matrix dimension must be between 2 and 64!")?;
        }

        Ok(Self {
            datasets,
            window,
            tests_to_run,
            test_arguments,
            output_path,
            console_output,
            threads,
        })
    }
}
