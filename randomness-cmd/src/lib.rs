//! The building blocks of the command line application: arguments, configuration file, sample
//! loading, console report and CSV output.

use clap::ValueEnum;
use randomness_lib::Test;
use serde::{Deserialize, Serialize};

pub mod cmd_args;
pub mod csv;
pub mod report;
pub mod samples;
pub mod toml_config;
pub mod valid_arg;

/// The tests that can be specified. Used both for command line arguments and TOML.
#[derive(Copy, Clone, Debug, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgTest {
    /// Monobit (Frequency) Test
    Monobit,
    /// Frequency Test within a Block
    BlockFrequency,
    /// Independent Runs Test
    IndependentRuns,
    /// Test for the Longest Run of Ones in a Block
    LongestRun,
    /// Binary Matrix Rank Test
    MatrixRank,
    /// Discrete Fourier Transform (Spectral) Test
    Spectral,
    /// Non-overlapping Template Matching Test
    NonOverlappingTemplate,
    /// Overlapping Template Matching Test
    OverlappingTemplate,
}

// this implementation is only there to break if a test is added into randomness_lib.
impl From<Test> for ArgTest {
    fn from(value: Test) -> Self {
        match value {
            Test::Monobit => ArgTest::Monobit,
            Test::BlockFrequency => ArgTest::BlockFrequency,
            Test::IndependentRuns => ArgTest::IndependentRuns,
            Test::LongestRun => ArgTest::LongestRun,
            Test::MatrixRank => ArgTest::MatrixRank,
            Test::Spectral => ArgTest::Spectral,
            Test::NonOverlappingTemplate => ArgTest::NonOverlappingTemplate,
            Test::OverlappingTemplate => ArgTest::OverlappingTemplate,
        }
    }
}

impl From<ArgTest> for Test {
    fn from(value: ArgTest) -> Self {
        match value {
            ArgTest::Monobit => Test::Monobit,
            ArgTest::BlockFrequency => Test::BlockFrequency,
            ArgTest::IndependentRuns => Test::IndependentRuns,
            ArgTest::LongestRun => Test::LongestRun,
            ArgTest::MatrixRank => Test::MatrixRank,
            ArgTest::Spectral => Test::Spectral,
            ArgTest::NonOverlappingTemplate => Test::NonOverlappingTemplate,
            ArgTest::OverlappingTemplate => Test::OverlappingTemplate,
        }
    }
}
