//! The built-in hypothesis library, read-only and shared process-wide.
//!
//! Declaration order is significant: the match engine breaks score ties by
//! it.

use std::sync::OnceLock;

use crate::types::OutputCategory;

use super::clock::UnixClock;
use super::identity::{Echo, FixedValue, TextTransform};
use super::numeric::{
    CharCodeSum, Crc32, DigestAlgorithm, DigestPrefix, Djb2, FirstCharTimesLength,
    FirstCharXorLength, InputLength, JavaStringHash,
};
use super::predicate::{
    AlphabeticOnly, AlphanumericOnly, ContainsKeyword, Divisibility, DivisibilityRule, IsEmpty,
    LengthParity, NumericOnly,
};
use super::types::{Hypothesis, HypothesisCategory};

/// Keywords the containment predicates test for.
pub const KNOWN_KEYWORDS: &[&str] = &[
    "glitch", "error", "bug", "fail", "alpha", "zap", "fizz", "buzz",
];

/// An ordered collection of hypotheses.
pub struct HypothesisLibrary {
    entries: Vec<Box<dyn Hypothesis>>,
}

impl HypothesisLibrary {
    /// Build a library from explicit entries, keeping their order.
    pub fn new(entries: Vec<Box<dyn Hypothesis>>) -> Self {
        Self { entries }
    }

    /// The built-in library, constructed once per process.
    pub fn builtin() -> &'static HypothesisLibrary {
        static BUILTIN: OnceLock<HypothesisLibrary> = OnceLock::new();
        BUILTIN.get_or_init(|| Self::new(builtin_entries()))
    }

    /// Hypotheses scored for a capability declaring `output`, in declaration order.
    pub fn for_category(&self, output: OutputCategory) -> Vec<&dyn Hypothesis> {
        self.entries
            .iter()
            .filter(|h| h.category().applies_to(output))
            .map(|h| &**h)
            .collect()
    }

    /// Hypotheses of one family, in declaration order.
    pub fn by_family(&self, family: HypothesisCategory) -> Vec<&dyn Hypothesis> {
        self.entries
            .iter()
            .filter(|h| h.category() == family)
            .map(|h| &**h)
            .collect()
    }

    /// Look up a hypothesis by name.
    pub fn get(&self, name: &str) -> Option<&dyn Hypothesis> {
        self.entries
            .iter()
            .find(|h| h.name() == name)
            .map(|h| &**h)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Hypothesis> {
        self.entries.iter().map(|h| &**h)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_entries() -> Vec<Box<dyn Hypothesis>> {
    let mut entries: Vec<Box<dyn Hypothesis>> = vec![
        // numeric hash
        Box::new(CharCodeSum),
        Box::new(FirstCharTimesLength),
        Box::new(FirstCharXorLength),
        Box::new(InputLength),
        Box::new(DigestPrefix::new(DigestAlgorithm::Md5)),
        Box::new(DigestPrefix::new(DigestAlgorithm::Sha1)),
        Box::new(DigestPrefix::new(DigestAlgorithm::Sha256)),
        Box::new(Crc32),
        Box::new(JavaStringHash),
        Box::new(Djb2),
        // boolean predicate
        Box::new(Divisibility::classic()),
        Box::new(Divisibility::new(3, 5, DivisibilityRule::Either)),
        Box::new(AlphabeticOnly),
        Box::new(NumericOnly),
        Box::new(AlphanumericOnly),
        Box::new(LengthParity::even()),
        Box::new(LengthParity::odd()),
        Box::new(IsEmpty),
    ];

    for keyword in KNOWN_KEYWORDS {
        entries.push(Box::new(ContainsKeyword::new(keyword)));
    }
    for keyword in KNOWN_KEYWORDS {
        entries.push(Box::new(ContainsKeyword::ignoring_case(keyword)));
    }

    // identity
    entries.push(Box::new(Echo));
    entries.push(Box::new(TextTransform::Uppercase));
    entries.push(Box::new(TextTransform::Lowercase));
    entries.push(Box::new(TextTransform::Reversed));

    // fixed value
    entries.push(Box::new(FixedValue));

    // clock
    entries.push(Box::new(UnixClock::default()));

    entries
}
