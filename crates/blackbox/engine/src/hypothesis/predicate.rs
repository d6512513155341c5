//! Boolean-predicate hypotheses.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::OutputValue;

use super::types::{
    EvaluationError, EvaluationResult, Hypothesis, HypothesisCategory, ScoringContext,
};

/// Parse an input as an integral number.
///
/// Accepts plain integers and integral decimals such as `"15.0"`. Anything
/// else (text, `"15.5"`, non-finite values) is not a number.
pub fn parse_integral(input: &str) -> Option<i64> {
    if let Ok(n) = input.parse::<i64>() {
        return Some(n);
    }
    let f = input.parse::<f64>().ok()?;
    let limit = 9_223_372_036_854_775_808.0_f64;
    if f.is_finite() && f.fract() == 0.0 && (-limit..limit).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

#[allow(clippy::expect_used)] // Static regex pattern is hardcoded and valid
fn embedded_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+\.?\d*").expect("valid regex"))
}

/// The first number embedded anywhere in `input`, as an integer.
///
/// `"15abc"` and `"abc15"` both read as 15. Inputs with no number, or whose
/// first number has a fractional part, are [`EvaluationError::NotNumeric`].
pub fn first_embedded_integer(input: &str) -> EvaluationResult<i64> {
    let found = embedded_number_regex()
        .find(input)
        .ok_or(EvaluationError::NotNumeric)?
        .as_str();
    match parse_integral(found) {
        Some(n) => Ok(n),
        None if has_zero_fraction(found) => Err(EvaluationError::Overflow),
        None => Err(EvaluationError::NotNumeric),
    }
}

fn has_zero_fraction(number: &str) -> bool {
    number
        .split_once('.')
        .map_or(true, |(_, fraction)| fraction.bytes().all(|b| b == b'0'))
}

macro_rules! char_class_predicate {
    ($ty:ident, $name:literal, $desc:literal, $test:expr) => {
        #[doc = $desc]
        pub struct $ty;

        impl Hypothesis for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn category(&self) -> HypothesisCategory {
                HypothesisCategory::BooleanPredicate
            }

            fn description(&self) -> String {
                $desc.into()
            }

            fn predict(
                &self,
                input: &str,
                _context: &ScoringContext<'_>,
            ) -> EvaluationResult<OutputValue> {
                let test: fn(char) -> bool = $test;
                Ok(OutputValue::Bool(!input.is_empty() && input.chars().all(test)))
            }
        }
    };
}

char_class_predicate!(
    AlphabeticOnly,
    "alphabetic-only",
    "true iff the input is non-empty and every character is alphabetic",
    char::is_alphabetic
);

char_class_predicate!(
    NumericOnly,
    "numeric-only",
    "true iff the input is non-empty and every character is numeric",
    char::is_numeric
);

char_class_predicate!(
    AlphanumericOnly,
    "alphanumeric-only",
    "true iff the input is non-empty and every character is alphanumeric",
    char::is_alphanumeric
);

/// True for the empty input only.
pub struct IsEmpty;

impl Hypothesis for IsEmpty {
    fn name(&self) -> &str {
        "is-empty"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::BooleanPredicate
    }

    fn description(&self) -> String {
        "true iff the input is empty".into()
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        Ok(OutputValue::Bool(input.is_empty()))
    }
}

/// Tests whether the character count is even or odd.
pub struct LengthParity {
    even: bool,
}

impl LengthParity {
    pub fn even() -> Self {
        Self { even: true }
    }

    pub fn odd() -> Self {
        Self { even: false }
    }
}

impl Hypothesis for LengthParity {
    fn name(&self) -> &str {
        if self.even {
            "even-length"
        } else {
            "odd-length"
        }
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::BooleanPredicate
    }

    fn description(&self) -> String {
        format!(
            "true iff the character count is {}",
            if self.even { "even" } else { "odd" }
        )
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        let is_even = input.chars().count() % 2 == 0;
        Ok(OutputValue::Bool(is_even == self.even))
    }
}

/// Substring containment of a fixed keyword.
pub struct ContainsKeyword {
    keyword: String,
    case_insensitive: bool,
    name: String,
}

impl ContainsKeyword {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            case_insensitive: false,
            name: format!("contains:{}", keyword),
        }
    }

    pub fn ignoring_case(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            case_insensitive: true,
            name: format!("contains-ci:{}", keyword),
        }
    }
}

impl Hypothesis for ContainsKeyword {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::BooleanPredicate
    }

    fn description(&self) -> String {
        if self.case_insensitive {
            format!("true iff the input contains {:?} in any case", self.keyword)
        } else {
            format!("true iff the input contains {:?}", self.keyword)
        }
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        let found = if self.case_insensitive {
            input.to_lowercase().contains(&self.keyword)
        } else {
            input.contains(&self.keyword)
        };
        Ok(OutputValue::Bool(found))
    }
}

/// How the two divisors of a [`Divisibility`] predicate combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DivisibilityRule {
    /// Divisible by both (the classic FizzBuzz condition).
    Both,
    /// Divisible by at least one.
    Either,
}

/// Numeric divisibility by a pair of factors.
///
/// True iff the first number embedded in the input is a nonzero integer
/// satisfying the rule. Inputs without one cannot be evaluated.
pub struct Divisibility {
    a: i64,
    b: i64,
    rule: DivisibilityRule,
    name: String,
}

impl Divisibility {
    pub fn new(a: i64, b: i64, rule: DivisibilityRule) -> Self {
        let joiner = match rule {
            DivisibilityRule::Both => "and",
            DivisibilityRule::Either => "or",
        };
        Self {
            a,
            b,
            rule,
            name: format!("divisible-by-{}-{}-{}", a, joiner, b),
        }
    }

    /// `true` iff divisible by both 3 and 5 and nonzero.
    pub fn classic() -> Self {
        Self::new(3, 5, DivisibilityRule::Both)
    }

    fn holds(&self, n: i64) -> bool {
        if n == 0 || self.a == 0 || self.b == 0 {
            return false;
        }
        let n = n.unsigned_abs();
        let by_a = n % self.a.unsigned_abs() == 0;
        let by_b = n % self.b.unsigned_abs() == 0;
        match self.rule {
            DivisibilityRule::Both => by_a && by_b,
            DivisibilityRule::Either => by_a || by_b,
        }
    }
}

impl Hypothesis for Divisibility {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::BooleanPredicate
    }

    fn description(&self) -> String {
        let joiner = match self.rule {
            DivisibilityRule::Both => "both",
            DivisibilityRule::Either => "either of",
        };
        format!(
            "true iff a nonzero number divisible by {} {} and {}",
            joiner, self.a, self.b
        )
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        let n = first_embedded_integer(input)?;
        Ok(OutputValue::Bool(self.holds(n)))
    }
}
