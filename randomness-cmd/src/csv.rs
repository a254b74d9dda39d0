//! Everything needed to save CSV results.

use core::error::Error;
use csv::WriterBuilder;
use randomness_lib::aggregation::{AggregateResult, Verdict};
use randomness_lib::battery::DatasetReport;
use randomness_lib::{Test, TestResult, SIGNIFICANCE_LEVEL};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Error type for [CsvFile]
#[derive(Debug)]
pub enum CsvFileError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl Display for CsvFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvFileError::Io(e) => write!(f, "IO error: {e}"),
            CsvFileError::Csv(e) => write!(f, "CSV error: {e}"),
        }
    }
}

impl Error for CsvFileError {}

impl From<std::io::Error> for CsvFileError {
    fn from(value: std::io::Error) -> Self {
        CsvFileError::Io(value)
    }
}

impl From<csv::Error> for CsvFileError {
    fn from(value: csv::Error) -> Self {
        CsvFileError::Csv(value)
    }
}

/// One row of the CSV output.
#[derive(Serialize)]
struct CsvFormat<'a> {
    dataset: &'a str,
    test: &'a str,
    sample: &'a str,
    #[serde(rename = "p-value")]
    p_value: f64,
    verdict: String,
}

/// This struct represents a CSV writer for the test outputs, see [CsvFile::write_dataset] for
/// the format.
#[derive(Debug)]
pub struct CsvFile<W: Write = File>(csv::Writer<W>);

impl CsvFile {
    /// Create a new CSV File writer writing to the specified path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CsvFileError> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvFile<W> {
    /// Create a new CSV writer writing into the given writer.
    pub fn from_writer(writer: W) -> Self {
        let mut builder = WriterBuilder::new();

        builder.delimiter(b';').has_headers(true);

        // target specific: on windows, lines should end with CRLF, on all other platforms, the default
        // LF is enough.
        #[cfg(target_family = "windows")]
        {
            use csv::Terminator;

            builder.terminator(Terminator::CRLF);
        }

        Self(builder.from_writer(writer))
    }

    /// Append the results of a dataset to the CSV file.
    ///
    /// CSV format: dataset; test; sample; p-value; verdict. Each test has one row per sample
    /// (numbered from 1) followed by one row with sample "aggregate". Skipped results have a
    /// p-value of -1. A test that returned an error only has the aggregate row, with verdict
    /// "ERROR".
    pub fn write_dataset(
        &mut self,
        report: &DatasetReport,
        aggregates: &BTreeMap<Test, AggregateResult>,
    ) -> Result<(), CsvFileError> {
        for (test, aggregate) in aggregates {
            let test_label = test.label();

            if let Some(results) = report.results.get(test) {
                for (no, result) in results.iter().enumerate() {
                    let sample = (no + 1).to_string();
                    let row = CsvFormat {
                        dataset: &report.name,
                        test: test_label,
                        sample: &sample,
                        p_value: result.p_value(),
                        verdict: sample_verdict(result).to_string(),
                    };

                    self.0.serialize(row)?;
                }
            }

            let row = CsvFormat {
                dataset: &report.name,
                test: test_label,
                sample: "aggregate",
                p_value: aggregate.p_value().unwrap_or(TestResult::SKIP_SENTINEL),
                verdict: aggregate.verdict().to_string(),
            };
            self.0.serialize(row)?;
        }

        for test in report.errors.keys() {
            let row = CsvFormat {
                dataset: &report.name,
                test: test.label(),
                sample: "aggregate",
                p_value: TestResult::SKIP_SENTINEL,
                verdict: "ERROR".to_owned(),
            };
            self.0.serialize(row)?;
        }

        self.0.flush()?;
        Ok(())
    }

    /// Finish writing and return the inner writer.
    pub fn into_inner(self) -> Result<W, CsvFileError> {
        self.0.into_inner().map_err(|err| {
            CsvFileError::Io(std::io::Error::new(err.error().kind(), err.to_string()))
        })
    }
}

/// The verdict of a single sample.
fn sample_verdict(result: &TestResult) -> Verdict {
    if result.is_skipped() {
        Verdict::Skipped
    } else if result.passed(SIGNIFICANCE_LEVEL) {
        Verdict::Pass
    } else {
        Verdict::Fail
    }
}
