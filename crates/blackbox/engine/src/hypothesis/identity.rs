//! Identity and fixed-value hypotheses.

use crate::types::OutputValue;

use super::types::{
    EvaluationError, EvaluationResult, Hypothesis, HypothesisCategory, ScoringContext,
};

/// The output equals the input.
pub struct Echo;

impl Hypothesis for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::Identity
    }

    fn description(&self) -> String {
        "output equals input".into()
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        Ok(OutputValue::Text(input.to_string()))
    }
}

/// String transforms that sit next to exact echo as near-miss rivals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextTransform {
    Uppercase,
    Lowercase,
    Reversed,
}

impl Hypothesis for TextTransform {
    fn name(&self) -> &str {
        match self {
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Reversed => "reversed",
        }
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::Identity
    }

    fn description(&self) -> String {
        match self {
            Self::Uppercase => "input converted to uppercase".into(),
            Self::Lowercase => "input converted to lowercase".into(),
            Self::Reversed => "input with characters reversed".into(),
        }
    }

    fn predict(&self, input: &str, _context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        let text = match self {
            Self::Uppercase => input.to_uppercase(),
            Self::Lowercase => input.to_lowercase(),
            Self::Reversed => input.chars().rev().collect(),
        };
        Ok(OutputValue::Text(text))
    }
}

/// The output is the same constant for every input.
///
/// The candidate constant is the first scorable observed output, never one
/// supplied from outside.
pub struct FixedValue;

impl Hypothesis for FixedValue {
    fn name(&self) -> &str {
        "fixed-value"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::FixedValue
    }

    fn description(&self) -> String {
        "output is constant (anchored on the first observed value)".into()
    }

    fn predict(&self, _input: &str, context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        context
            .first_observed
            .cloned()
            .ok_or(EvaluationError::NoBaseline)
    }
}
