//! Deterministic discriminating test inputs per capability.
//!
//! The catalog is pure: the same capability always yields the same ordered
//! sequence. Inputs are grouped so that rival hypotheses disagree on at least
//! one case (e.g. `"9"` separates "divisible by 15" from "divisible by 3 or 5").

use std::collections::HashSet;

use crate::types::{Capability, TestCase};

/// Keywords longer than this get a fixed family of variants instead of every
/// case permutation.
const FULL_PERMUTATION_MAX_LEN: usize = 4;

/// Builds the ordered test-case sequence for a capability.
#[derive(Clone, Debug, Default)]
pub struct TestCaseCatalog;

impl TestCaseCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Generate the catalog for `capability`.
    ///
    /// Later duplicates of an input are dropped so each input is probed once.
    pub fn generate(&self, capability: &Capability) -> Vec<TestCase> {
        let mut builder = CatalogBuilder::default();

        builder.push("", "empty string");

        for (input, label) in [("a", "single lowercase"), ("Z", "single uppercase"), ("1", "single digit"), ("!", "single symbol")] {
            builder.push(input, label);
        }

        for (input, label) in NUMERIC_BOUNDARIES {
            builder.push(*input, *label);
        }

        for n in 2..=10 {
            builder.push("a".repeat(n), format!("length {}", n));
        }

        for (input, label) in [
            ("hello", "word"),
            ("world", "word"),
            ("test", "word"),
            ("abc", "letters"),
            ("Hello", "capitalized word"),
            ("HELLO", "uppercase word"),
            ("hElLo", "mixed-case word"),
            ("Hello World", "two words"),
            ("hello world", "two words lowercase"),
            ("true", "boolean word"),
            ("false", "boolean word"),
        ] {
            builder.push(input, label);
        }

        for (input, label) in [
            ("abc123", "letters then digits"),
            ("123abc", "digits then letters"),
            ("hello123", "word then digits"),
            ("15abc", "fifteen with text"),
            ("abc15", "text with fifteen"),
        ] {
            builder.push(input, label);
        }

        for keyword in capability.catalog_keywords() {
            for (input, label) in keyword_variants(keyword) {
                builder.push(input, label);
            }
        }

        for (input, label) in [
            ("!@#", "symbols"),
            ("!@#$%", "special chars"),
            (" ", "single space"),
            ("ababab", "repeating ab"),
            ("123123", "repeating 123"),
        ] {
            builder.push(input, label);
        }

        builder.push("a".repeat(100), "100 a's");
        builder.push("hello".repeat(20), "repeated hello");
        builder.push("very long string ".repeat(100), "very long string x100");

        for (input, label) in [
            ("🚀", "emoji"),
            ("ñáéíóú", "accents"),
            ("你好", "chinese"),
            ("unicode: 🚀", "mixed unicode"),
        ] {
            builder.push(input, label);
        }

        builder.finish()
    }
}

const NUMERIC_BOUNDARIES: &[(&str, &str)] = &[
    ("0", "zero"),
    ("2", "two"),
    ("3", "multiple of 3"),
    ("4", "four"),
    ("5", "multiple of 5"),
    ("6", "multiple of 3"),
    ("9", "multiple of 3"),
    ("10", "multiple of 5"),
    ("12", "multiple of 3"),
    ("15", "multiple of 15"),
    ("18", "multiple of 3"),
    ("20", "multiple of 5"),
    ("30", "multiple of 15"),
    ("45", "multiple of 15"),
    ("60", "multiple of 15"),
    ("75", "multiple of 15"),
    ("90", "multiple of 15"),
    ("100", "hundred"),
    ("105", "multiple of 15"),
    ("1000", "thousand"),
    ("-3", "negative multiple of 3"),
    ("-15", "negative fifteen"),
    ("15.0", "decimal fifteen"),
    ("15.5", "decimal fifteen point five"),
];

/// Case variants of a keyword, plus an embedded occurrence.
fn keyword_variants(keyword: &str) -> Vec<(String, String)> {
    let lower = keyword.to_lowercase();
    if lower.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    out.push((lower.clone(), format!("{} keyword", lower)));
    out.push((lower.to_uppercase(), format!("{} uppercase", lower)));
    out.push((capitalize(&lower), format!("{} capitalized", lower)));

    let chars: Vec<char> = lower.chars().collect();
    if chars.len() <= FULL_PERMUTATION_MAX_LEN {
        for mask in 0u32..(1 << chars.len()) {
            let variant: String = chars
                .iter()
                .enumerate()
                .map(|(i, c)| upper_if(*c, mask & (1 << i) != 0))
                .collect();
            out.push((variant, format!("{} case permutation", lower)));
        }
    } else {
        let alternating: String = chars
            .iter()
            .enumerate()
            .map(|(i, c)| upper_if(*c, i % 2 == 1))
            .collect();
        let inverse: String = chars
            .iter()
            .enumerate()
            .map(|(i, c)| upper_if(*c, i % 2 == 0))
            .collect();
        out.push((alternating, format!("{} alternating case", lower)));
        out.push((inverse, format!("{} inverse alternating case", lower)));
        for pos in 0..chars.len() {
            let variant: String = chars
                .iter()
                .enumerate()
                .map(|(i, c)| upper_if(*c, i == pos))
                .collect();
            out.push((variant, format!("{} single uppercase", lower)));
        }
    }

    out.push((format!("x{}x", lower), format!("{} embedded", lower)));
    out
}

fn upper_if(c: char, upper: bool) -> String {
    if upper {
        c.to_uppercase().collect()
    } else {
        c.to_string()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Append-only accumulator that drops repeated inputs.
#[derive(Default)]
struct CatalogBuilder {
    cases: Vec<TestCase>,
    seen: HashSet<String>,
}

impl CatalogBuilder {
    fn push(&mut self, input: impl Into<String>, label: impl Into<String>) {
        let input = input.into();
        if self.seen.insert(input.clone()) {
            self.cases.push(TestCase::new(input, label));
        }
    }

    fn finish(self) -> Vec<TestCase> {
        self.cases
    }
}
