//! Numeric-hash hypotheses: deterministic string-to-integer functions.
//!
//! Character codes are Unicode scalar values and lengths count characters,
//! not bytes. Digest-based hashes read the first four bytes of the digest of
//! the UTF-8 encoding as a big-endian `u32`.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::types::OutputValue;

use super::types::{
    EvaluationError, EvaluationResult, Hypothesis, HypothesisCategory, ScoringContext,
};

fn first_char_code(input: &str) -> EvaluationResult<i64> {
    input
        .chars()
        .next()
        .map(|c| i64::from(u32::from(c)))
        .ok_or(EvaluationError::EmptyInput)
}

fn char_len(input: &str) -> i64 {
    input.chars().count() as i64
}

// ── Character arithmetic ────────────────────────────────────────────────

/// Sum of all character codes. The empty input sums to zero.
pub struct CharCodeSum;

impl Hypothesis for CharCodeSum {
    fn name(&self) -> &str {
        "char-code-sum"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::NumericHash
    }

    fn description(&self) -> String {
        "sum of character codes".into()
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        input
            .chars()
            .try_fold(0i64, |acc, c| acc.checked_add(i64::from(u32::from(c))))
            .map(OutputValue::Integer)
            .ok_or(EvaluationError::Overflow)
    }
}

/// Code of the first character multiplied by the length.
pub struct FirstCharTimesLength;

impl Hypothesis for FirstCharTimesLength {
    fn name(&self) -> &str {
        "first-char-times-length"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::NumericHash
    }

    fn description(&self) -> String {
        "code of first character times length".into()
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        first_char_code(input)?
            .checked_mul(char_len(input))
            .map(OutputValue::Integer)
            .ok_or(EvaluationError::Overflow)
    }
}

/// Code of the first character XOR the length.
pub struct FirstCharXorLength;

impl Hypothesis for FirstCharXorLength {
    fn name(&self) -> &str {
        "first-char-xor-length"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::NumericHash
    }

    fn description(&self) -> String {
        "code of first character xor length".into()
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        Ok(OutputValue::Integer(first_char_code(input)? ^ char_len(input)))
    }
}

/// Number of characters.
pub struct InputLength;

impl Hypothesis for InputLength {
    fn name(&self) -> &str {
        "length"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::NumericHash
    }

    fn description(&self) -> String {
        "number of characters".into()
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        Ok(OutputValue::Integer(char_len(input)))
    }
}

// ── Digests ─────────────────────────────────────────────────────────────

/// Digest algorithm feeding [`DigestPrefix`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    fn label(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    fn prefix_u32(&self, bytes: &[u8]) -> u32 {
        let mut head = [0u8; 4];
        match self {
            Self::Md5 => head.copy_from_slice(&Md5::digest(bytes)[..4]),
            Self::Sha1 => head.copy_from_slice(&Sha1::digest(bytes)[..4]),
            Self::Sha256 => head.copy_from_slice(&Sha256::digest(bytes)[..4]),
        }
        u32::from_be_bytes(head)
    }
}

/// First 32 bits of a cryptographic digest as an unsigned integer.
///
/// Equivalent to parsing the first eight hex digits of the hex digest.
pub struct DigestPrefix {
    algorithm: DigestAlgorithm,
    name: String,
}

impl DigestPrefix {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            name: format!("{}-prefix32", algorithm.label()),
        }
    }
}

impl Hypothesis for DigestPrefix {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::NumericHash
    }

    fn description(&self) -> String {
        format!("first 8 hex digits of {} digest", self.algorithm.label())
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        Ok(OutputValue::Integer(i64::from(
            self.algorithm.prefix_u32(input.as_bytes()),
        )))
    }
}

/// IEEE CRC-32 of the UTF-8 bytes.
pub struct Crc32;

impl Hypothesis for Crc32 {
    fn name(&self) -> &str {
        "crc32"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::NumericHash
    }

    fn description(&self) -> String {
        "IEEE CRC-32 of UTF-8 bytes".into()
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        Ok(OutputValue::Integer(i64::from(crc32fast::hash(input.as_bytes()))))
    }
}

// ── Rolling hashes ──────────────────────────────────────────────────────

/// `h = 31 * h + unit` over UTF-16 code units, wrapping at 32 bits (signed).
pub struct JavaStringHash;

impl Hypothesis for JavaStringHash {
    fn name(&self) -> &str {
        "rolling-hash-31"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::NumericHash
    }

    fn description(&self) -> String {
        "31-multiplier rolling hash over UTF-16 units (signed 32-bit)".into()
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        let hash = input
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Ok(OutputValue::Integer(i64::from(hash)))
    }
}

/// djb2: `h = 33 * h + byte` from 5381, wrapping at 32 bits (unsigned).
pub struct Djb2;

impl Hypothesis for Djb2 {
    fn name(&self) -> &str {
        "djb2"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::NumericHash
    }

    fn description(&self) -> String {
        "djb2 over UTF-8 bytes (unsigned 32-bit)".into()
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        let hash = input
            .bytes()
            .fold(5381u32, |h, b| h.wrapping_mul(33).wrapping_add(u32::from(b)));
        Ok(OutputValue::Integer(i64::from(hash)))
    }
}
