//! Hypothesis library for behavioural fingerprinting.
//!
//! Each candidate implements the `Hypothesis` trait: a named pure function
//! from input string to predicted output. The built-in `HypothesisLibrary`
//! groups them into numeric-hash, boolean-predicate, identity, fixed-value
//! and clock families.

pub mod clock;
pub mod identity;
pub mod library;
pub mod numeric;
pub mod predicate;
pub mod types;

pub use clock::{UnixClock, DEFAULT_CLOCK_TOLERANCE_SECS};
pub use identity::{Echo, FixedValue, TextTransform};
pub use library::{HypothesisLibrary, KNOWN_KEYWORDS};
pub use numeric::{
    CharCodeSum, Crc32, DigestAlgorithm, DigestPrefix, Djb2, FirstCharTimesLength,
    FirstCharXorLength, InputLength, JavaStringHash,
};
pub use predicate::{
    first_embedded_integer, parse_integral, AlphabeticOnly, AlphanumericOnly, ContainsKeyword,
    Divisibility, DivisibilityRule, IsEmpty, LengthParity, NumericOnly,
};
pub use types::{
    EvaluationError, EvaluationResult, Hypothesis, HypothesisCategory, ScoringContext,
};
