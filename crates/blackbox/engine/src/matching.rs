//! Match engine: scores hypotheses against an observation set.
//!
//! Every hypothesis is evaluated over the same scorable observations. A
//! pair whose evaluation fails is left out of that hypothesis's denominator.
//! Ties in the final ordering fall back to the order the hypotheses were
//! supplied in, and every exact match is reported: the engine never picks a
//! single winner among equals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hypothesis::{Hypothesis, HypothesisCategory, ScoringContext};
use crate::types::{Capability, Observation, OutputValue};

/// An input on which a hypothesis and the endpoint disagreed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Counterexample {
    pub input: String,
    pub expected: OutputValue,
    pub observed: OutputValue,
}

/// Outcome of scoring one hypothesis for one capability.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Verdict {
    pub hypothesis: String,
    pub category: HypothesisCategory,
    /// Pairs where the prediction equalled the observed output.
    pub matches: usize,
    /// Pairs that were scored (scorable observations minus `excluded`).
    pub total: usize,
    /// Pairs the hypothesis could not evaluate.
    pub excluded: usize,
    /// `matches == total` and `total > 0`.
    pub is_exact: bool,
    /// First few disagreements, in catalog order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counterexamples: Vec<Counterexample>,
}

impl Verdict {
    /// `matches / total`, or `0.0` when nothing was scored.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matches as f64 / self.total as f64
        }
    }

    /// `0 < matches < total`.
    pub fn is_partial(&self) -> bool {
        self.matches > 0 && self.matches < self.total
    }
}

/// Scores hypotheses against observations.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    /// Maximum counterexamples kept per verdict.
    pub counterexample_limit: usize,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self {
            counterexample_limit: 5,
        }
    }
}

impl MatchEngine {
    pub fn new(counterexample_limit: usize) -> Self {
        Self {
            counterexample_limit,
        }
    }

    /// Score every hypothesis against the scorable observations of `capability`.
    ///
    /// Returns one verdict per hypothesis, ordered by descending `matches`
    /// with ties in `hypotheses` order. Observations recorded for a
    /// different capability are ignored.
    pub fn evaluate(
        &self,
        capability: &Capability,
        observations: &[Observation],
        hypotheses: &[&dyn Hypothesis],
    ) -> Vec<Verdict> {
        let scorable: Vec<(&Observation, &OutputValue)> = observations
            .iter()
            .filter(|o| o.capability == capability.name)
            .filter_map(|o| o.scorable_output().map(|out| (o, out)))
            .collect();

        let context = ScoringContext {
            first_observed: scorable.first().map(|(_, out)| *out),
            observed_at: None,
        };

        let mut verdicts: Vec<Verdict> = hypotheses
            .iter()
            .map(|h| self.score(*h, &scorable, &context))
            .collect();

        // Stable: equal match counts keep declaration order.
        verdicts.sort_by(|a, b| b.matches.cmp(&a.matches));

        let exact = verdicts.iter().filter(|v| v.is_exact).count();
        if exact > 1 {
            debug!(
                capability = %capability.name,
                exact,
                "multiple hypotheses explain all observations"
            );
        }

        verdicts
    }

    fn score(
        &self,
        hypothesis: &dyn Hypothesis,
        scorable: &[(&Observation, &OutputValue)],
        context: &ScoringContext<'_>,
    ) -> Verdict {
        let mut matches = 0;
        let mut total = 0;
        let mut excluded = 0;
        let mut counterexamples = Vec::new();

        for (observation, observed) in scorable {
            let pair = ScoringContext {
                observed_at: Some(observation.observed_at),
                ..*context
            };
            match hypothesis.predict(&observation.input, &pair) {
                Ok(expected) => {
                    total += 1;
                    if hypothesis.agrees(&expected, observed) {
                        matches += 1;
                    } else if counterexamples.len() < self.counterexample_limit {
                        counterexamples.push(Counterexample {
                            input: observation.input.clone(),
                            expected,
                            observed: (*observed).clone(),
                        });
                    }
                }
                Err(_) => excluded += 1,
            }
        }

        Verdict {
            hypothesis: hypothesis.name().to_string(),
            category: hypothesis.category(),
            matches,
            total,
            excluded,
            is_exact: total > 0 && matches == total,
            counterexamples,
        }
    }
}

/// Exact verdicts, in ranking order.
pub fn exact_matches(verdicts: &[Verdict]) -> Vec<&Verdict> {
    verdicts.iter().filter(|v| v.is_exact).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypothesis::{
        AlphabeticOnly, Divisibility, Echo, FirstCharTimesLength, FixedValue, HypothesisLibrary,
        IsEmpty, UnixClock,
    };
    use chrono::{TimeZone, Utc};
    use crate::types::{InvocationMethod, OutputCategory, ProbeFailure, TestCase};

    fn capability(category: OutputCategory) -> Capability {
        Capability::new("cap", "/cap", InvocationMethod::Payload, category)
    }

    fn observe(cap: &Capability, pairs: &[(&str, OutputValue)]) -> Vec<Observation> {
        pairs
            .iter()
            .map(|(input, out)| {
                Observation::success(cap, &TestCase::new(*input, "t"), 200, out.clone())
            })
            .collect()
    }

    fn bools(cap: &Capability, pairs: &[(&str, bool)]) -> Vec<Observation> {
        let pairs: Vec<(&str, OutputValue)> = pairs
            .iter()
            .map(|(i, b)| (*i, OutputValue::Bool(*b)))
            .collect();
        observe(cap, &pairs)
    }

    fn verdict<'a>(verdicts: &'a [Verdict], name: &str) -> &'a Verdict {
        verdicts
            .iter()
            .find(|v| v.hypothesis == name)
            .unwrap_or_else(|| panic!("no verdict for {}", name))
    }

    #[test]
    fn divisibility_exact_on_fizzbuzz_data() {
        let cap = capability(OutputCategory::Boolean);
        let mut pairs: Vec<(&str, bool)> = ["15", "30", "45", "60"].iter().map(|s| (*s, true)).collect();
        pairs.extend(["1", "2", "3", "5", "9", "10"].iter().map(|s| (*s, false)));
        let obs = bools(&cap, &pairs);

        let classic = Divisibility::classic();
        let verdicts = MatchEngine::default().evaluate(&cap, &obs, &[&classic]);
        assert!(verdicts[0].is_exact);
        assert_eq!(verdicts[0].matches, 10);
        assert_eq!(verdicts[0].total, 10);
    }

    #[test]
    fn single_contradiction_drops_exact_status() {
        let cap = capability(OutputCategory::Boolean);
        let obs = bools(
            &cap,
            &[("15", true), ("30", true), ("9", true), ("1", false), ("10", false)],
        );
        let classic = Divisibility::classic();
        let verdicts = MatchEngine::default().evaluate(&cap, &obs, &[&classic]);
        let v = &verdicts[0];
        assert!(!v.is_exact);
        assert!(v.is_partial());
        assert_eq!(v.matches, 4);
        assert_eq!(v.counterexamples.len(), 1);
        assert_eq!(v.counterexamples[0].input, "9");
    }

    #[test]
    fn echo_partial_when_one_output_differs() {
        let cap = capability(OutputCategory::String);
        let obs = observe(
            &cap,
            &[
                ("a", OutputValue::Text("a".into())),
                ("zap", OutputValue::Text("zap".into())),
                ("ZAP", OutputValue::Text("zap".into())),
            ],
        );
        let verdicts = MatchEngine::default().evaluate(&cap, &obs, &[&Echo]);
        assert_eq!(verdicts[0].matches, verdicts[0].total - 1);
        assert!(!verdicts[0].is_exact);
    }

    #[test]
    fn fixed_value_anchors_on_first_observation() {
        let cap = capability(OutputCategory::FixedScalar);
        let constant = observe(
            &cap,
            &[
                ("", OutputValue::Integer(42)),
                ("a", OutputValue::Integer(42)),
                ("b", OutputValue::Float(42.0)),
            ],
        );
        let v = MatchEngine::default().evaluate(&cap, &constant, &[&FixedValue]);
        assert!(v[0].is_exact);

        let drifting = observe(
            &cap,
            &[
                ("", OutputValue::Integer(1)),
                ("a", OutputValue::Integer(2)),
                ("b", OutputValue::Integer(2)),
            ],
        );
        let v = MatchEngine::default().evaluate(&cap, &drifting, &[&FixedValue]);
        // Anchored on 1, not on the majority value.
        assert_eq!(v[0].matches, 1);
        assert_eq!(v[0].total, 3);
    }

    #[test]
    fn boolean_output_never_matches_integer_prediction() {
        let cap = capability(OutputCategory::Integer);
        let obs = observe(&cap, &[("a", OutputValue::Bool(true))]);
        let lib = HypothesisLibrary::builtin();
        let length = lib.get("length").unwrap();
        let v = MatchEngine::default().evaluate(&cap, &obs, &[length]);
        assert_eq!(v[0].matches, 0);
    }

    #[test]
    fn evaluation_failures_leave_the_denominator() {
        let cap = capability(OutputCategory::Integer);
        let obs = observe(
            &cap,
            &[
                ("", OutputValue::Integer(0)),
                ("ab", OutputValue::Integer(194)),
                ("c", OutputValue::Integer(99)),
            ],
        );
        let v = MatchEngine::default().evaluate(&cap, &obs, &[&FirstCharTimesLength]);
        assert_eq!(v[0].excluded, 1);
        assert_eq!(v[0].total, 2);
        assert!(v[0].is_exact);
    }

    #[test]
    fn clock_output_is_told_apart_from_a_constant() {
        let cap = capability(OutputCategory::FixedScalar);
        let case = TestCase::new("", "t");
        let at = |secs: i64| Utc.timestamp_opt(secs, 0).unwrap();

        let ticking: Vec<Observation> = [1_800_000_000, 1_800_000_060, 1_800_000_121]
            .iter()
            .map(|t| {
                Observation::success(&cap, &case, 200, OutputValue::Integer(*t)).at(at(*t - 1))
            })
            .collect();
        let clock = UnixClock::default();
        let v = MatchEngine::default().evaluate(&cap, &ticking, &[&FixedValue, &clock]);
        assert_eq!(v[0].hypothesis, "unix-time");
        assert!(v[0].is_exact);
        assert_eq!(verdict(&v, "fixed-value").matches, 1);

        let frozen: Vec<Observation> = [1_800_000_000, 1_800_000_060]
            .iter()
            .map(|t| {
                Observation::success(&cap, &case, 200, OutputValue::Integer(1_700_000_000))
                    .at(at(*t))
            })
            .collect();
        let v = MatchEngine::default().evaluate(&cap, &frozen, &[&FixedValue, &clock]);
        assert!(verdict(&v, "fixed-value").is_exact);
        assert_eq!(verdict(&v, "unix-time").matches, 0);
    }

    #[test]
    fn ambiguous_exact_matches_are_all_reported() {
        let cap = capability(OutputCategory::Boolean);
        let obs = bools(&cap, &[("123", false), ("!@#", false)]);
        let verdicts = MatchEngine::default().evaluate(&cap, &obs, &[&AlphabeticOnly, &IsEmpty]);
        let exact = exact_matches(&verdicts);
        assert_eq!(exact.len(), 2);
        assert_eq!(exact[0].hypothesis, "alphabetic-only");
        assert_eq!(exact[1].hypothesis, "is-empty");
    }

    #[test]
    fn ordering_is_by_matches_then_declaration() {
        let cap = capability(OutputCategory::Boolean);
        let obs = bools(&cap, &[("abc", true), ("", false), ("15", false), ("30", true)]);
        let classic = Divisibility::classic();
        let verdicts =
            MatchEngine::default().evaluate(&cap, &obs, &[&IsEmpty, &classic, &AlphabeticOnly]);
        assert_eq!(verdicts[0].hypothesis, "alphabetic-only");
        // is-empty and divisibility both score 1; declaration order holds.
        assert_eq!(verdicts[1].hypothesis, "is-empty");
        assert_eq!(verdicts[2].hypothesis, "divisible-by-3-and-5");
        assert_eq!(verdict(&verdicts, "is-empty").matches, 1);
        assert_eq!(verdict(&verdicts, "divisible-by-3-and-5").excluded, 2);
    }

    #[test]
    fn inputs_without_numbers_leave_divisibility_exact() {
        let cap = capability(OutputCategory::Boolean);
        let obs = bools(
            &cap,
            &[
                ("15", true),
                ("30", true),
                ("9", false),
                ("15abc", true),
                ("abc15", true),
                ("hello", false),
                ("fizz", true),
            ],
        );
        let classic = Divisibility::classic();
        let verdicts = MatchEngine::default().evaluate(&cap, &obs, &[&classic]);
        let v = &verdicts[0];
        assert!(v.is_exact);
        assert_eq!((v.matches, v.total, v.excluded), (5, 5, 2));
        assert!(v.counterexamples.is_empty());
    }

    #[test]
    fn all_error_observations_never_exact() {
        let cap = capability(OutputCategory::Boolean);
        let obs = vec![Observation::failure(
            &cap,
            &TestCase::new("x", "t"),
            None,
            ProbeFailure::Transport {
                message: "refused".into(),
            },
        )];
        let lib = HypothesisLibrary::builtin();
        let hyps = lib.for_category(cap.category);
        let verdicts = MatchEngine::default().evaluate(&cap, &obs, &hyps);
        assert_eq!(verdicts.len(), hyps.len());
        assert!(verdicts.iter().all(|v| v.total == 0 && !v.is_exact));
    }

    #[test]
    fn foreign_observations_are_ignored() {
        let cap = capability(OutputCategory::String);
        let other = Capability::new("other", "/other", InvocationMethod::Payload, OutputCategory::String);
        let mut obs = observe(&cap, &[("a", OutputValue::Text("a".into()))]);
        obs.extend(observe(&other, &[("b", OutputValue::Text("nope".into()))]));
        let v = MatchEngine::default().evaluate(&cap, &obs, &[&Echo]);
        assert_eq!(v[0].total, 1);
        assert!(v[0].is_exact);
    }

    #[test]
    fn counterexample_limit_is_respected() {
        let cap = capability(OutputCategory::String);
        let pairs: Vec<(String, OutputValue)> = (0..10)
            .map(|i| (format!("in{}", i), OutputValue::Text("x".into())))
            .collect();
        let pairs: Vec<(&str, OutputValue)> =
            pairs.iter().map(|(i, o)| (i.as_str(), o.clone())).collect();
        let obs = observe(&cap, &pairs);
        let v = MatchEngine::new(3).evaluate(&cap, &obs, &[&Echo]);
        assert_eq!(v[0].counterexamples.len(), 3);
    }
}
