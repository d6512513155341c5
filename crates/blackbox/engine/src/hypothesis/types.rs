//! The hypothesis trait and its supporting types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{OutputCategory, OutputValue};

/// Family a hypothesis belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisCategory {
    /// Deterministic string-to-integer functions.
    NumericHash,
    /// String-to-boolean tests.
    BooleanPredicate,
    /// Echo and simple string transforms.
    Identity,
    /// Output does not depend on the input.
    FixedValue,
    /// Output follows the wall clock at observation time.
    Clock,
}

impl HypothesisCategory {
    /// Whether hypotheses of this family are scored for a capability
    /// declaring `output`.
    ///
    /// Fixed-value is scored for every output category.
    pub fn applies_to(&self, output: OutputCategory) -> bool {
        match self {
            Self::FixedValue => true,
            Self::NumericHash => output == OutputCategory::Integer,
            Self::BooleanPredicate => output == OutputCategory::Boolean,
            Self::Identity => output == OutputCategory::String,
            Self::Clock => output == OutputCategory::FixedScalar,
        }
    }
}

impl std::fmt::Display for HypothesisCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NumericHash => write!(f, "numeric_hash"),
            Self::BooleanPredicate => write!(f, "boolean_predicate"),
            Self::Identity => write!(f, "identity"),
            Self::FixedValue => write!(f, "fixed_value"),
            Self::Clock => write!(f, "clock"),
        }
    }
}

/// A hypothesis could not produce a prediction for one input.
///
/// The pair is excluded from that hypothesis's score; it neither confirms
/// nor refutes it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The function needs at least one character.
    #[error("input is empty")]
    EmptyInput,

    /// Integer arithmetic left the i64 range.
    #[error("arithmetic overflow")]
    Overflow,

    /// No scorable observation exists to anchor a constant.
    #[error("no observed baseline")]
    NoBaseline,

    /// The input carries no integral number to test.
    #[error("no integral number in input")]
    NotNumeric,
}

/// Result type for a single hypothesis evaluation.
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Facts a hypothesis may consult while predicting one pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoringContext<'a> {
    /// Output of the first scorable observation, in catalog order.
    pub first_observed: Option<&'a OutputValue>,
    /// When the observation being scored was recorded.
    pub observed_at: Option<DateTime<Utc>>,
}

/// A named candidate explanation of a capability's behaviour.
///
/// Implementations are stateless and side-effect free.
pub trait Hypothesis: Send + Sync {
    /// Stable name, unique within a library.
    fn name(&self) -> &str;

    /// Family this hypothesis belongs to.
    fn category(&self) -> HypothesisCategory;

    /// One-line human description.
    fn description(&self) -> String;

    /// Predict the output for `input`.
    fn predict(&self, input: &str, context: &ScoringContext<'_>) -> EvaluationResult<OutputValue>;

    /// Whether a prediction counts as a match for `observed`.
    fn agrees(&self, expected: &OutputValue, observed: &OutputValue) -> bool {
        expected.strict_eq(observed)
    }
}
