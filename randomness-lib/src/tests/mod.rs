//! All implemented NIST SP 800-22 tests.
//!
//! Every test is a pure function of the sequence and its arguments, returning either a p-value in
//! `[0, 1]` or the [skip sentinel](crate::TestResult::SKIP_SENTINEL).

pub mod template_matching;
