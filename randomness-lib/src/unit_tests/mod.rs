//! All unit tests

use crate::bitvec::BitVec;
use crate::Error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::num::NonZero;


// Path to the test directory
const TEST_FILE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/test-files");

/// Macro to compare f64 values - == is not a good option because of floating point shenanigans.
/// An optional third argument gives the allowed absolute deviation.
macro_rules! assert_f64_eq {
    ($left:expr, $right:expr) => {
        let (got, expected): (f64, f64) = ($left, $right);
        assert!(
            f64::abs(got - expected) < f64::EPSILON,
            "Expected {expected}, got {got}"
        );
    };
    ($left:expr, $right:expr, $tolerance:expr) => {
        let (got, expected, tolerance): (f64, f64, f64) = ($left, $right, $tolerance);
        assert!(
            f64::abs(got - expected) < tolerance,
            "Expected {expected}, got {got}"
        );
    };
}

use assert_f64_eq;

/// The book only gives the value with reduces precision - rounding is nearly always necessary
fn round(value: f64, digits: u8) -> f64 {
    let t = f64::powi(10.0, digits as i32);
    (value * t).round() / t
}

/// Check the test result: Assert that it is OK and print the error if it is not.
fn result_checker<T>(output: &Result<T, Error>) {
    if let Err(e) = output {
        println!("Error: {e}")
    }
    assert!(output.is_ok())
}

/// A reproducible pseudo-random bit sequence
fn random_bits(len: usize, seed: u64) -> Vec<bool> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random::<bool>()).collect()
}

/// Test the creation of a BitVec from a bool vec
#[test]
fn test_bitvec_from_bool() {
    let input_data = [
        true, false, true, true, false, true, false, true, false, true,
    ];

    let bitvec = BitVec::from(input_data.as_slice());

    // assert that length is the expected 10
    assert_eq!(bitvec.len_bit(), input_data.len());
    assert_eq!(bitvec.iter().collect::<Vec<_>>(), input_data);
    assert_eq!(bitvec.count_ones(), 6);
}

/// Test the creation of a BitVec from an ASCII string
#[test]
fn test_bitvec_from_ascii_string() {
    let input_data = "1011010101";

    let bitvec = BitVec::from_ascii_str(input_data);
    result_checker(&bitvec);
    let bitvec = bitvec.unwrap();

    assert_eq!(bitvec.len_bit(), input_data.len());
    let expected = input_data.bytes().map(|b| b == b'1').collect::<Vec<_>>();
    assert_eq!(bitvec.iter().collect::<Vec<_>>(), expected);
}

/// Test the ASCII string parsing with an invalid ASCII string (should not work)
#[test]
fn test_bitvec_from_ascii_string_invalid() {
    assert!(matches!(
        BitVec::from_ascii_str("10110b10101"),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        BitVec::from_ascii_str("1011 0101"),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(BitVec::from_ascii_str(""), Err(Error::InvalidInput(_))));
}

/// Test the ASCII string parsing with whitespace interspersed.
#[test]
fn test_bitvec_from_ascii_string_skip_whitespace() {
    let input_data = "101 101100\n101010\t100\r\n";

    let bitvec = BitVec::from_ascii_str_skip_whitespace(input_data).unwrap();

    // assert that length is the expected 18
    assert_eq!(bitvec.len_bit(), 18);
    assert_eq!(bitvec, BitVec::from_ascii_str("101101100101010100").unwrap());

    assert!(matches!(
        BitVec::from_ascii_str_skip_whitespace(" \n\t"),
        Err(Error::InvalidInput(_))
    ));
}

/// Any character other than '0', '1' or whitespace is rejected with its position.
#[test]
fn test_bitvec_from_ascii_string_skip_whitespace_invalid() {
    match BitVec::from_ascii_str_skip_whitespace("01 01x2") {
        Err(Error::InvalidInput(msg)) => {
            assert_eq!(msg, "invalid character 'x' at position 5")
        }
        other => panic!("unexpected result: {other:?}"),
    }

    match BitVec::from_ascii_str_skip_whitespace("0ä1") {
        Err(Error::InvalidInput(msg)) => {
            assert_eq!(msg, "invalid character 'ä' at position 1")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

/// Test the creation of a BitVec from bytes, MSB first
#[test]
fn test_bitvec_from_bytes() {
    let bitvec = BitVec::from(vec![0b1011_0101, 0b0000_0001, 0xFF]);

    assert_eq!(bitvec.len_bit(), 24);
    assert_eq!(
        bitvec,
        BitVec::from_ascii_str("101101010000000111111111").unwrap()
    );
}

#[test]
fn test_bitvec_crop_and_complement() {
    let mut bitvec = BitVec::from_ascii_str(&"10".repeat(50)).unwrap();
    bitvec.crop(7);
    assert_eq!(bitvec, BitVec::from_ascii_str("1010101").unwrap());

    let complement = bitvec.complement();
    assert_eq!(complement, BitVec::from_ascii_str("0101010").unwrap());
    assert_eq!(complement.count_ones(), 3);

    // cropping to a greater length does nothing
    bitvec.crop(100);
    assert_eq!(bitvec.len_bit(), 7);
}

#[test]
fn test_bitvec_split_discards_remainder() {
    let bitvec = BitVec::from_ascii_str("1100101011").unwrap();
    let parts = bitvec.split(NonZero::new(3).unwrap());

    assert_eq!(
        parts,
        vec![
            BitVec::from_ascii_str("110").unwrap(),
            BitVec::from_ascii_str("010").unwrap(),
            BitVec::from_ascii_str("101").unwrap(),
        ]
    );
}

/// The word-wise helpers have to give the same results as a bit by bit calculation, also across
/// word boundaries.
#[test]
fn test_bitvec_word_helpers() {
    let bits = random_bits(301, 7);
    let bitvec = BitVec::from(bits.as_slice());

    for (start, len) in [(0, 301), (3, 61), (60, 8), (63, 2), (64, 64), (100, 201), (5, 0)] {
        let expected = bits[start..(start + len)].iter().filter(|&&b| b).count();
        assert_eq!(bitvec.count_ones_range(start, len), expected, "{start}, {len}");
    }

    for (start, count) in [(0, 9), (58, 9), (120, 32), (292, 9), (63, 1)] {
        let expected = bits[start..(start + count)]
            .iter()
            .fold(0_u64, |value, &bit| (value << 1) | bit as u64);
        assert_eq!(bitvec.bits_at(start, count), expected, "{start}, {count}");
    }

    let transitions = bits.windows(2).filter(|pair| pair[0] != pair[1]).count();
    assert_eq!(bitvec.count_transitions(), transitions);
}

#[test]
fn test_blocks_and_longest_run() {
    let bitvec = BitVec::from_ascii_str("11001100000101010110110001001100111000000000001").unwrap();
    let blocks = bitvec.blocks(NonZero::new(8).unwrap()).collect::<Vec<_>>();

    assert_eq!(blocks.len(), 5);
    assert_eq!(blocks[0].longest_run_of_ones(), 2);
    assert_eq!(blocks[1].longest_run_of_ones(), 1);
    assert_eq!(blocks[2].longest_run_of_ones(), 2);
    assert_eq!(blocks[3].start(), 24);
    assert_eq!(blocks[4].count_ones(), 3);
    assert_eq!(blocks[4].longest_run_of_ones(), 3);
}
