//! Everything necessary for command line arguments.

use crate::ArgTest;
use clap::{Args, Parser};
use std::num::NonZero;
use std::path::{Path, PathBuf};

/// The command line arguments.
#[derive(Debug, Parser)]
#[command(version, author, about, long_about = None)]
pub struct CmdArgs {
    // If a dataset is specified, a config file is not needed, but allowed.
    /// Path to an optional configuration file. Required if no dataset is specified.
    ///
    /// The configuration written in the config file can be supplemented by command line switches.
    #[arg(short, long, required_unless_present = "datasets")]
    pub config_file: Option<PathBuf>,
    #[command(flatten)]
    pub regular_args: RegularArgs,
}

/// The "regular" command line arguments (everything except for config file)
#[derive(Debug, Clone, Args)]
#[group(required = false, multiple = true)]
pub struct RegularArgs {
    /// A dataset to test, given as NAME=PATH or only PATH (the file name is used as name then).
    /// Can be given multiple times. Replaces the datasets of the config file.
    ///
    /// A dataset file is an ASCII text file holding one sample per line, consisting of only '0'
    /// or '1'. Empty lines are ignored.
    #[arg(short, long = "dataset", value_parser = parse_dataset)]
    pub datasets: Vec<DatasetArg>,
    /// Read each dataset file as one long sequence and split it into samples with exactly this
    /// many bits, the remainder is discarded.
    ///
    /// Characters other than '0' or '1' (e.g. line breaks) are skipped in this mode.
    #[arg(short, long)]
    pub window: Option<NonZero<usize>>,
    /// The block length of the frequency test within a block.
    #[arg(short, long)]
    pub block_size: Option<NonZero<usize>>,
    /// The matrix dimension (rows and columns) of the binary matrix rank test.
    #[arg(short = 'q', long)]
    pub matrix_dimension: Option<usize>,
    /// Optional path to save the results to.
    ///
    /// If given, the results will be saved in CSV format with ';' delimiter and the following
    /// columns: dataset; test; sample; p-value; verdict
    ///
    /// Each test has one row per sample and one row with sample "aggregate". Skipped results have
    /// a p-value of -1.
    #[arg(short, long = "output")]
    pub output_path: Option<PathBuf>,
    /// The tests to run: either include specific tests or exclude specific tests, if neither is
    /// set: run all tests.
    #[command(flatten)]
    pub tests_to_run: TestsToRun,
    /// The maximum count of threads to use, defaults to the count of logical CPUs.
    #[arg(long)]
    pub threads: Option<NonZero<usize>>,
    /// Reduce the console output to the summary of each dataset.
    #[arg(long)]
    pub quiet: bool,
}

/// Which tests are to be run. Allows only one of these options to be used.
#[derive(Debug, Clone, Args)]
#[group(required = false, multiple = false)]
pub struct TestsToRun {
    /// Run only the specified tests.
    ///
    /// If neither this option nor '--exclude-tests' is specified, all tests are run.
    #[arg(short, long, value_delimiter = ',')]
    pub tests: Option<Vec<ArgTest>>,
    /// Run all available tests except for the excluded tests.
    ///
    /// If neither this option nor '--tests' is specified, all tests are run.
    #[arg(short, long, value_delimiter = ',')]
    pub exclude_tests: Option<Vec<ArgTest>>,
}

/// A dataset as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetArg {
    pub name: String,
    pub file: PathBuf,
}

/// Parses NAME=PATH or PATH.
fn parse_dataset(value: &str) -> Result<DatasetArg, String> {
    match value.split_once('=') {
        Some((name, file)) if !name.is_empty() && !file.is_empty() => Ok(DatasetArg {
            name: name.to_owned(),
            file: PathBuf::from(file),
        }),
        Some(_) => Err(format!("\"{value}\" is neither NAME=PATH nor PATH")),
        None => Ok(DatasetArg {
            name: dataset_name_from_path(Path::new(value)),
            file: PathBuf::from(value),
        }),
    }
}

/// The name of a dataset without an explicit name: the file name without extension.
pub fn dataset_name_from_path(path: &Path) -> String {
    path.file_stem()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
