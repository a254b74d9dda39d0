//! Overlapping Template Matching test.
//!
//! This test tries to detect generators that produce too many occurrences of runs of ones.
//! Each block of M bits is scanned with an m-bit window for the template of m ones. The big
//! difference to the [non-overlapping](super::non_overlapping) test is that template matches
//! may overlap: the window always slides one bit.
//!
//! The block match counts are sorted into six categories (0, 1, 2, 3, 4 and >= 5 matches), their
//! theoretical probabilities derive from the confluent hypergeometric function with
//! `lambda = (M - m + 1) / 2^m` and `eta = lambda / 2`:
//!
//! * `pi_0 = e^-eta`
//! * `pi_u = eta * e^(-2 eta) * 2^-u * 1F1(u + 1; 2; eta)` for `u` in 1..=4
//! * `pi_5 = 1 - (pi_0 + ... + pi_4)`
//!
//! This test needs arguments, see [OverlappingTemplateTestArgs].

use crate::bitvec::{BitBlock, BitVec};
use crate::internals::{check_f64, checked_add, hyp1f1, igamc};
use crate::tests::template_matching::{Template, MAX_TEMPLATE_LEN, MIN_TEMPLATE_LEN};
use crate::{Error, TestResult};
use rayon::prelude::*;
use std::num::NonZero;

/// The default length of each block M, in bits.
pub const DEFAULT_BLOCK_LENGTH: usize = 1032;

/// The default template length m.
pub const DEFAULT_TEMPLATE_LENGTH: usize = 9;

/// Count of categories K + 1.
const CATEGORY_COUNT: usize = 6;

/// The arguments for the Overlapping Template Matching Test.
///
/// 1. The template length *m*. 2 <= *m* <= 21. See [DEFAULT_TEMPLATE_LENGTH].
/// 2. The length of each block, *M*, in bits. *m* <= *M*. See [DEFAULT_BLOCK_LENGTH].
///
/// These bounds are checked by the creation function.
/// A default variant is available with [OverlappingTemplateTestArgs::default()].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlappingTemplateTestArgs {
    template_length: usize,
    block_length: NonZero<usize>,
}

impl OverlappingTemplateTestArgs {
    /// Create new arguments. For the meanings and allowed value ranges, see
    /// [OverlappingTemplateTestArgs].
    pub fn new(template_length: usize, block_length: usize) -> Option<Self> {
        if !(MIN_TEMPLATE_LEN..=MAX_TEMPLATE_LEN).contains(&template_length)
            || block_length < template_length
        {
            return None;
        }

        Some(Self {
            template_length,
            block_length: NonZero::new(block_length)?,
        })
    }

    /// The template length m.
    pub fn template_length(&self) -> usize {
        self.template_length
    }

    /// The block length M.
    pub fn block_length(&self) -> NonZero<usize> {
        self.block_length
    }

    /// One block is needed at least.
    pub fn min_input_length(&self) -> NonZero<usize> {
        self.block_length
    }
}

impl Default for OverlappingTemplateTestArgs {
    /// Default values, see the module constants
    fn default() -> Self {
        Self {
            template_length: DEFAULT_TEMPLATE_LENGTH,
            block_length: const {
                match NonZero::new(DEFAULT_BLOCK_LENGTH) {
                    Some(v) => v,
                    None => panic!("Literal should be non-zero!"),
                }
            },
        }
    }
}

/// The theoretical probabilities of the six categories for the given arguments.
///
/// `None` if they cannot be computed in `f64`, or if a category has a probability of zero. This
/// happens for a large `eta`, i.e. blocks much longer than `2^(m + 1)`.
pub fn category_probabilities(
    args: OverlappingTemplateTestArgs,
) -> Option<[f64; CATEGORY_COUNT]> {
    let m = args.template_length as i32;
    let lambda =
        ((args.block_length.get() - args.template_length + 1) as f64) / f64::powi(2.0, m);
    let eta = lambda / 2.0;

    let mut probabilities = [0.0; CATEGORY_COUNT];
    probabilities[0] = f64::exp(-eta);
    for u in 1..(CATEGORY_COUNT - 1) {
        probabilities[u] = eta
            * f64::exp(-2.0 * eta)
            * f64::powi(2.0, -(u as i32))
            * hyp1f1((u + 1) as f64, 2.0, eta)?;
    }
    probabilities[CATEGORY_COUNT - 1] =
        1.0 - probabilities[..(CATEGORY_COUNT - 1)].iter().sum::<f64>();

    probabilities
        .iter()
        .all(|pi| pi.is_finite() && *pi > 0.0)
        .then_some(probabilities)
}

/// Overlapping template match test - No. 8
///
/// See the [module docs](crate::tests::template_matching::overlapping).
/// If not a single block fits into the sequence, the test is skipped.
pub fn overlapping_template_matching_test(
    data: &BitVec,
    args: OverlappingTemplateTestArgs,
) -> Result<TestResult, Error> {
    let block_length = args.block_length;
    let template = Template::all_ones(args.template_length).ok_or_else(|| {
        Error::InvalidParameter(format!(
            "invalid template length {}",
            args.template_length
        ))
    })?;

    // Step 1: partition the sequence into N blocks of length M
    let block_count = data.len_bit() / block_length.get();
    if block_count == 0 {
        return Ok(TestResult::skipped(
            "Data is too short for a single block.",
        ));
    }

    // Step 2: count the matches per block and sort them into the categories
    let categories = data
        .par_blocks(block_length)
        .try_fold(
            || [0_usize; CATEGORY_COUNT],
            |mut categories, block| {
                let matches = count_matches(&block, template)?;
                let category = usize::min(matches, CATEGORY_COUNT - 1);
                categories[category] = checked_add!(categories[category], 1)?;
                Ok::<_, Error>(categories)
            },
        )
        .try_reduce(
            || [0_usize; CATEGORY_COUNT],
            |mut a, b| {
                for i in 0..CATEGORY_COUNT {
                    a[i] = checked_add!(a[i], b[i])?;
                }
                Ok(a)
            },
        )?;

    // Step 3: compute chi = sum of (v_i - N * pi_i)^2 / (N * pi_i)
    let Some(probabilities) = category_probabilities(args) else {
        return Ok(TestResult::skipped(
            "The category probabilities cannot be computed for these arguments.",
        ));
    };

    let chi = categories
        .into_iter()
        .zip(probabilities)
        .map(|(count, pi)| {
            let expected = (block_count as f64) * pi;
            f64::powi((count as f64) - expected, 2) / expected
        })
        .sum::<f64>();
    check_f64(chi)?;

    // Step 4: compute p_value = igamc(K / 2, chi / 2), K = 5
    let p_value = igamc(((CATEGORY_COUNT - 1) as f64) / 2.0, chi / 2.0)?;
    check_f64(p_value)?;

    Ok(TestResult::new(p_value))
}

/// Count the (possibly overlapping) matches of the template in the block.
fn count_matches(block: &BitBlock<'_>, template: Template) -> Result<usize, Error> {
    (0..=(block.len_bit() - template.len()))
        .filter(|&offset| template.matches_at(block, offset))
        .try_fold(0_usize, |count, _| checked_add!(count, 1))
}
