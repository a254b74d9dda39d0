//! Aggregation of the per-sample results of one test over a whole dataset.
//!
//! Two metrics are computed:
//! 1. The uniformity of the p-values: they are sorted into 10 equally wide bins in `[0, 1]`, a
//!    chi-squared test against the uniform distribution gives the aggregate p-value.
//! 2. The pass fraction: the fraction of samples with a p-value above the
//!    [significance level](crate::SIGNIFICANCE_LEVEL).
//!
//! A dataset passes a test if at least [PASS_PROPORTION] of its samples pass. If the test was
//! skipped for any sample, the whole aggregate is [skipped](AggregateResult::Skipped).

use crate::internals::{check_f64, igamc};
use crate::{Error, TestResult, SIGNIFICANCE_LEVEL};
use std::fmt::{Display, Formatter};

/// The count of equally wide bins the p-values are sorted into.
pub const P_VALUE_BINS: usize = 10;

/// The minimum fraction of passing samples for a dataset to pass a test.
pub const PASS_PROPORTION: f64 = 0.96;

/// The aggregate over all samples of one (dataset, test) pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AggregateResult {
    /// At least one sample was skipped (or there were no samples), no metric is computed.
    Skipped,
    /// The computed metrics.
    Computed {
        /// The p-value of the chi-squared uniformity test over the sample p-values.
        p_value: f64,
        /// The fraction of samples whose p-value exceeds the significance level.
        pass_fraction: f64,
    },
}

impl AggregateResult {
    /// If no metric was computed.
    pub fn is_skipped(&self) -> bool {
        matches!(self, AggregateResult::Skipped)
    }

    /// The aggregate p-value, if computed.
    pub fn p_value(&self) -> Option<f64> {
        match self {
            AggregateResult::Skipped => None,
            AggregateResult::Computed { p_value, .. } => Some(*p_value),
        }
    }

    /// The pass fraction, if computed.
    pub fn pass_fraction(&self) -> Option<f64> {
        match self {
            AggregateResult::Skipped => None,
            AggregateResult::Computed { pass_fraction, .. } => Some(*pass_fraction),
        }
    }

    /// The verdict for the dataset: PASS if the pass fraction is at least [PASS_PROPORTION].
    pub fn verdict(&self) -> Verdict {
        match self {
            AggregateResult::Skipped => Verdict::Skipped,
            AggregateResult::Computed { pass_fraction, .. } => {
                if *pass_fraction >= PASS_PROPORTION {
                    Verdict::Pass
                } else {
                    Verdict::Fail
                }
            }
        }
    }
}

/// The final verdict of a (dataset, test) pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail,
    Skipped,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Skipped => "SKIP",
        };
        f.write_str(text)
    }
}

/// Aggregate the results of one test over all samples of a dataset.
///
/// See the [module docs](crate::aggregation).
pub fn aggregate(results: &[TestResult]) -> Result<AggregateResult, Error> {
    if results.is_empty() || results.iter().any(TestResult::is_skipped) {
        return Ok(AggregateResult::Skipped);
    }

    if let Some(invalid) = results.iter().find(|r| !(0.0..=1.0).contains(&r.p_value())) {
        return Err(Error::InvalidParameter(format!(
            "p-value {} is outside of [0, 1]",
            invalid.p_value()
        )));
    }

    let count = results.len() as f64;

    // Step 1: sort the p-values into the bins, p = 1 falls into the last bin
    let mut bins = [0_usize; P_VALUE_BINS];
    for result in results {
        let bin = usize::min(
            (result.p_value() * P_VALUE_BINS as f64).floor() as usize,
            P_VALUE_BINS - 1,
        );
        bins[bin] += 1;
    }

    // Step 2: compute chi = sum of (F_i - s / 10)^2 / (s / 10)
    let expected = count / P_VALUE_BINS as f64;
    let chi = bins
        .into_iter()
        .map(|observed| f64::powi((observed as f64) - expected, 2) / expected)
        .sum::<f64>();
    check_f64(chi)?;

    // Step 3: compute p_value = igamc(9 / 2, chi / 2)
    let p_value = igamc(((P_VALUE_BINS - 1) as f64) / 2.0, chi / 2.0)?;
    check_f64(p_value)?;

    // Step 4: the fraction of samples that passed
    let passed = results
        .iter()
        .filter(|r| r.passed(SIGNIFICANCE_LEVEL))
        .count();
    let pass_fraction = (passed as f64) / count;

    Ok(AggregateResult::Computed {
        p_value,
        pass_fraction,
    })
}
