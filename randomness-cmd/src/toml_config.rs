//! TOML configuration file.

use crate::ArgTest;
use randomness_lib::tests::binary_matrix_rank::MatrixRankTestArg;
use randomness_lib::tests::frequency_block::FrequencyBlockTestArg;
use randomness_lib::tests::template_matching::non_overlapping::NonOverlappingTemplateTestArgs;
use randomness_lib::tests::template_matching::overlapping::OverlappingTemplateTestArgs;
use randomness_lib::tests::template_matching::Template;
use randomness_lib::TestArgs;
use serde::{Deserialize, Serialize};
use std::num::NonZero;
use std::path::PathBuf;

/// Struct for the TOML configuration file, the constraints of CmdArgs are not validated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TomlConfig {
    // not really optional, the datasets must be supplemented from cmd args if missing.
    pub input: TomlInput,
    pub test: TomlTest,
    // each argument is optional
    pub arguments: Option<TomlTestArguments>,
    pub output: Option<TomlOutput>,
    pub threads: Option<NonZero<usize>>,
}

/// Input: the datasets and the optional window length
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TomlInput {
    pub datasets: Vec<TomlDataset>,
    pub window: Option<NonZero<usize>>,
}

/// One dataset: a file of samples.
///
/// If a start and an end year are given, the approximate start year of each sample is printed
/// above the per-sample results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TomlDataset {
    pub name: Option<String>,
    pub file: PathBuf,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

/// Tests to run: allowlist or blocklist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TomlTest {
    // include tests overrides exclude tests
    pub include: Option<Vec<ArgTest>>,
    pub exclude: Option<Vec<ArgTest>>,
}

/// Output: CSV file and console verbosity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TomlOutput {
    pub csv: Option<PathBuf>,
    pub quiet: bool,
}

/// Test arguments for the battery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TomlTestArguments {
    pub frequency_block: Option<TomlFrequencyBlock>,
    pub binary_matrix_rank: Option<TomlMatrixRank>,
    pub non_overlapping_template_matching: Option<TomlNonOverlapping>,
    pub overlapping_template_matching: Option<TomlOverlapping>,
}

impl TryFrom<TomlTestArguments> for TestArgs {
    type Error = &'static str;

    fn try_from(value: TomlTestArguments) -> Result<Self, Self::Error> {
        let TomlTestArguments {
            frequency_block,
            binary_matrix_rank,
            non_overlapping_template_matching,
            overlapping_template_matching,
        } = value;

        let frequency_block = match frequency_block {
            Some(TomlFrequencyBlock {
                block_length: Some(block_length),
            }) => FrequencyBlockTestArg::new(block_length),
            _ => Default::default(),
        };

        let binary_matrix_rank = match binary_matrix_rank {
            Some(TomlMatrixRank {
                dimension: Some(dimension),
            }) => MatrixRankTestArg::new(dimension)
                .ok_or("Config file: invalid value for binary-matrix-rank.dimension")?,
            _ => Default::default(),
        };

        let non_overlapping_template = {
            if let Some(arg) = non_overlapping_template_matching {
                use randomness_lib::tests::template_matching::non_overlapping::{
                    DEFAULT_BLOCK_COUNT, DEFAULT_TEMPLATE,
                };

                let template = match arg.template {
                    Some(template) => Template::from_ascii_str(&template).ok_or(
                        "Config file: invalid value for non-overlapping-template-matching.template",
                    )?,
                    None => DEFAULT_TEMPLATE,
                };
                let count_blocks = arg.count_blocks.unwrap_or(DEFAULT_BLOCK_COUNT);

                NonOverlappingTemplateTestArgs::new(template, count_blocks)
                    .ok_or("Config file: invalid value for non-overlapping-template-matching.")?
            } else {
                Default::default()
            }
        };

        let overlapping_template = {
            if let Some(arg) = overlapping_template_matching {
                use randomness_lib::tests::template_matching::overlapping::{
                    DEFAULT_BLOCK_LENGTH, DEFAULT_TEMPLATE_LENGTH,
                };

                let template_length = arg
                    .template_length
                    .map(NonZero::get)
                    .unwrap_or(DEFAULT_TEMPLATE_LENGTH);
                let block_length = arg
                    .block_length
                    .map(NonZero::get)
                    .unwrap_or(DEFAULT_BLOCK_LENGTH);

                OverlappingTemplateTestArgs::new(template_length, block_length)
                    .ok_or("Config file: invalid value for overlapping-template-matching.")?
            } else {
                Default::default()
            }
        };

        Ok(TestArgs {
            frequency_block,
            binary_matrix_rank,
            non_overlapping_template,
            overlapping_template,
        })
    }
}

/// Test argument for the Frequency test within a block.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TomlFrequencyBlock {
    pub block_length: Option<NonZero<usize>>,
}

/// Test argument for the binary matrix rank test.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TomlMatrixRank {
    pub dimension: Option<usize>,
}

/// Test argument for the non-overlapping template matching test.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TomlNonOverlapping {
    pub template: Option<String>,
    pub count_blocks: Option<NonZero<usize>>,
}

/// Test argument for the overlapping template matching test.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TomlOverlapping {
    pub template_length: Option<NonZero<usize>>,
    pub block_length: Option<NonZero<usize>>,
}
