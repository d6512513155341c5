//! Clock hypotheses: output tracks the wall clock, not the input.

use crate::types::OutputValue;

use super::types::{
    EvaluationError, EvaluationResult, Hypothesis, HypothesisCategory, ScoringContext,
};

/// Default allowed distance between the reported and observed time.
pub const DEFAULT_CLOCK_TOLERANCE_SECS: i64 = 30;

/// The output is the current Unix time in seconds.
///
/// The prediction is the time the observation was recorded. A numeric
/// output agrees when it lies within `tolerance_secs` of it.
pub struct UnixClock {
    tolerance_secs: i64,
}

impl UnixClock {
    pub fn new(tolerance_secs: i64) -> Self {
        Self {
            tolerance_secs: tolerance_secs.max(0),
        }
    }

    pub fn tolerance_secs(&self) -> i64 {
        self.tolerance_secs
    }
}

impl Default for UnixClock {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_TOLERANCE_SECS)
    }
}

impl Hypothesis for UnixClock {
    fn name(&self) -> &str {
        "unix-time"
    }

    fn category(&self) -> HypothesisCategory {
        HypothesisCategory::Clock
    }

    fn description(&self) -> String {
        format!(
            "current unix time in seconds (within {}s)",
            self.tolerance_secs
        )
    }

    fn predict(&self, _input: &str, context: &ScoringContext<'_>) -> EvaluationResult<OutputValue> {
        context
            .observed_at
            .map(|at| OutputValue::Integer(at.timestamp()))
            .ok_or(EvaluationError::NoBaseline)
    }

    fn agrees(&self, expected: &OutputValue, observed: &OutputValue) -> bool {
        let OutputValue::Integer(now) = expected else {
            return false;
        };
        let reported = match observed {
            OutputValue::Integer(n) => *n as f64,
            OutputValue::Float(x) if x.is_finite() => *x,
            _ => return false,
        };
        (reported - *now as f64).abs() <= self.tolerance_secs as f64
    }
}
