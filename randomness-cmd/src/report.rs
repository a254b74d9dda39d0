//! Console report of a battery run.

use randomness_lib::aggregation::{AggregateResult, Verdict};
use randomness_lib::battery::DatasetReport;
use randomness_lib::{Error, Test, TestResult};
use std::collections::{BTreeMap, BTreeSet};

/// Width of the test label column, including the leading tab.
const LABEL_WIDTH: usize = 40;

/// Width of the column before the sample periods, aligning them with the per-sample p-values.
const PERIOD_INDENT: usize = 64;

/// The header printed before the results of a dataset.
pub fn format_header(report: &DatasetReport) -> String {
    format!(
        "\tRunning tests on {} ({} samples)",
        report.name, report.sample_count
    )
}

/// The approximate start year of each sample, if the dataset spans the given period.
pub fn format_period(period: (i32, i32), sample_count: usize) -> String {
    let (start, end) = period;
    let step = f64::from(end - start) / (sample_count as f64);

    let mut line = " ".repeat(PERIOD_INDENT);
    for idx in 0..sample_count {
        let year = f64::from(start) + (idx as f64) * step;
        line.push_str(&format!("~{}\t", year as i64));
    }

    line
}

/// One line of the report: the test label, the verdict, the aggregate p-value and every
/// per-sample p-value.
pub fn format_test_line(
    test: Test,
    aggregate: &AggregateResult,
    results: &[TestResult],
    per_sample: bool,
) -> String {
    let mut line = format!("\t{:<width$}", test.label(), width = LABEL_WIDTH - 1);

    let verdict = match aggregate.verdict() {
        Verdict::Pass => "PASS!",
        Verdict::Fail => "FAIL!",
        Verdict::Skipped => "SKIP!",
    };
    line.push_str(verdict);
    line.push('\t');

    match aggregate.p_value() {
        Some(p_value) => line.push_str(&format!("p={p_value:.5}\t")),
        None => line.push_str("p=SKIPPED\t"),
    }

    if per_sample {
        for result in results {
            line.push_str(&format_p_value(result));
            line.push('\t');
        }
    }

    line
}

/// The line of a test that returned an error instead of a result.
pub fn format_error_line(test: Test, err: &Error) -> String {
    format!(
        "\t{:<width$}ERROR!\t{err}",
        test.label(),
        width = LABEL_WIDTH - 1
    )
}

/// A per-sample p-value: 5 decimals, the skip sentinel with 4 decimals.
fn format_p_value(result: &TestResult) -> String {
    if result.is_skipped() {
        format!("{:.4}", result.p_value())
    } else {
        format!("{:.5}", result.p_value())
    }
}

/// Format the whole report of a dataset, one line per test.
pub fn format_report(
    report: &DatasetReport,
    aggregates: &BTreeMap<Test, AggregateResult>,
    period: Option<(i32, i32)>,
    per_sample: bool,
) -> Vec<String> {
    let mut lines = vec![format_header(report), String::new()];

    if let (Some(period), true) = (period, per_sample) {
        lines.push(format_period(period, report.sample_count));
    }

    let tests = aggregates
        .keys()
        .chain(report.errors.keys())
        .copied()
        .collect::<BTreeSet<_>>();

    for test in tests {
        if let Some(err) = report.errors.get(&test) {
            lines.push(format_error_line(test, err));
        } else if let Some(aggregate) = aggregates.get(&test) {
            let results = report
                .results
                .get(&test)
                .map(Vec::as_slice)
                .unwrap_or_default();
            lines.push(format_test_line(test, aggregate, results, per_sample));
        }
    }

    lines
}
