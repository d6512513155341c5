//! Per-capability summaries and the run report.
//!
//! Pure aggregation over verdicts and observations. Rendering is left to a
//! [`ReportSink`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::{Counterexample, Verdict};
use crate::types::{Capability, Observation, OutputCategory, OutputValue};

// ── Outcome ─────────────────────────────────────────────────────────────

/// What the verdicts say about one capability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// At least one hypothesis explains every scorable observation.
    /// `ambiguous` is set when more than one does.
    Confirmed {
        hypotheses: Vec<String>,
        ambiguous: bool,
    },
    /// No exact match; the hypothesis with the highest match ratio explains
    /// some observations.
    Partial {
        hypothesis: String,
        matches: usize,
        total: usize,
        ratio: f64,
    },
    /// Scorable observations exist but no hypothesis matched any of them.
    NoMatch,
    /// Every probe failed, or nothing was probed.
    InsufficientData,
}

impl ReportOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Confirmed { ambiguous: false, .. } => "confirmed",
            Self::Confirmed { ambiguous: true, .. } => "ambiguous",
            Self::Partial { .. } => "partial",
            Self::NoMatch => "no match",
            Self::InsufficientData => "insufficient data",
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

impl std::fmt::Display for ReportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed { hypotheses, .. } => {
                write!(f, "{}: {}", self.label(), hypotheses.join(", "))
            }
            Self::Partial {
                hypothesis,
                matches,
                total,
                ratio,
            } => write!(
                f,
                "partial: {} ({}/{}, {:.1}%)",
                hypothesis,
                matches,
                total,
                ratio * 100.0
            ),
            Self::NoMatch | Self::InsufficientData => write!(f, "{}", self.label()),
        }
    }
}

// ── Capability Report ───────────────────────────────────────────────────

/// A raw (input, output) pair kept for human inspection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SamplePair {
    pub input: String,
    pub label: String,
    pub output: OutputValue,
}

/// Probe outcome counts for one capability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCounts {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// How often one output value was observed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBucket {
    pub value: String,
    pub count: usize,
}

/// Boolean outputs grouped by input length in characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBucket {
    pub length: usize,
    pub true_count: usize,
    pub false_count: usize,
}

/// Summary of one capability's run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapabilityReport {
    pub capability: String,
    pub path: String,
    pub category: OutputCategory,
    pub outcome: ReportOutcome,
    pub probes: ProbeCounts,
    pub samples: Vec<SamplePair>,
    /// Most frequent outputs first.
    pub output_histogram: Vec<OutputBucket>,
    /// Boolean capabilities only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub length_profile: Vec<LengthBucket>,
    /// Disagreements of the best partial hypothesis.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counterexamples: Vec<Counterexample>,
    pub verdicts: Vec<Verdict>,
}

/// Builds capability reports.
#[derive(Clone, Debug)]
pub struct ReportBuilder {
    sample_size: usize,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self { sample_size: 5 }
    }
}

impl ReportBuilder {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    /// Summarise `verdicts` and `observations` for `capability`.
    ///
    /// `verdicts` must be in match-engine ranking order. Observations for
    /// other capabilities are ignored.
    pub fn build(
        &self,
        capability: &Capability,
        verdicts: &[Verdict],
        observations: &[Observation],
    ) -> CapabilityReport {
        let own: Vec<&Observation> = observations
            .iter()
            .filter(|o| o.capability == capability.name)
            .collect();
        let scorable: Vec<(&Observation, &OutputValue)> = own
            .iter()
            .filter_map(|o| o.scorable_output().map(|out| (*o, out)))
            .collect();

        let probes = ProbeCounts {
            total: own.len(),
            succeeded: scorable.len(),
            failed: own.len() - scorable.len(),
        };

        let outcome = outcome_for(verdicts, scorable.len());
        let counterexamples = match &outcome {
            ReportOutcome::Partial { .. } => best_partial(verdicts)
                .map(|v| v.counterexamples.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let samples = scorable
            .iter()
            .take(self.sample_size)
            .map(|(o, out)| SamplePair {
                input: o.input.clone(),
                label: o.label.clone(),
                output: (*out).clone(),
            })
            .collect();

        let length_profile = if capability.category == OutputCategory::Boolean {
            length_profile(&scorable)
        } else {
            Vec::new()
        };

        CapabilityReport {
            capability: capability.name.clone(),
            path: capability.path.clone(),
            category: capability.category,
            outcome,
            probes,
            samples,
            output_histogram: output_histogram(&scorable),
            length_profile,
            counterexamples,
            verdicts: verdicts.to_vec(),
        }
    }
}

fn outcome_for(verdicts: &[Verdict], scorable: usize) -> ReportOutcome {
    if scorable == 0 {
        return ReportOutcome::InsufficientData;
    }

    let exact: Vec<String> = verdicts
        .iter()
        .filter(|v| v.is_exact)
        .map(|v| v.hypothesis.clone())
        .collect();
    if !exact.is_empty() {
        return ReportOutcome::Confirmed {
            ambiguous: exact.len() > 1,
            hypotheses: exact,
        };
    }

    match best_partial(verdicts) {
        Some(best) => ReportOutcome::Partial {
            hypothesis: best.hypothesis.clone(),
            matches: best.matches,
            total: best.total,
            ratio: best.ratio(),
        },
        _ => ReportOutcome::NoMatch,
    }
}

/// Highest `ratio()` among verdicts with any match. Ties keep ranking order.
fn best_partial(verdicts: &[Verdict]) -> Option<&Verdict> {
    verdicts
        .iter()
        .filter(|v| v.matches > 0)
        .fold(None, |best: Option<&Verdict>, v| match best {
            Some(b) if b.ratio() >= v.ratio() => Some(b),
            _ => Some(v),
        })
}

fn output_histogram(scorable: &[(&Observation, &OutputValue)]) -> Vec<OutputBucket> {
    // (first index, count) per rendered value.
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (idx, (_, out)) in scorable.iter().enumerate() {
        counts.entry(out.to_string()).or_insert((idx, 0)).1 += 1;
    }

    let mut buckets: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(value, (first, count))| (value, first, count))
        .collect();
    buckets.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));
    buckets
        .into_iter()
        .map(|(value, _, count)| OutputBucket { value, count })
        .collect()
}

fn length_profile(scorable: &[(&Observation, &OutputValue)]) -> Vec<LengthBucket> {
    let mut by_length: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for (obs, out) in scorable {
        if let Some(b) = out.as_bool() {
            let entry = by_length.entry(obs.input.chars().count()).or_default();
            if b {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }
    by_length
        .into_iter()
        .map(|(length, (true_count, false_count))| LengthBucket {
            length,
            true_count,
            false_count,
        })
        .collect()
}

// ── Run Report ──────────────────────────────────────────────────────────

/// Outcome counts across a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub capabilities: usize,
    pub confirmed: usize,
    pub ambiguous: usize,
    pub partial: usize,
    pub no_match: usize,
    pub insufficient_data: usize,
    pub probes: usize,
    pub failed_probes: usize,
}

/// Everything one run produced, in configuration order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub capabilities: Vec<CapabilityReport>,
    pub totals: RunTotals,
}

impl RunReport {
    /// Assemble a report finished now.
    pub fn assemble(
        base_url: impl Into<String>,
        started_at: DateTime<Utc>,
        capabilities: Vec<CapabilityReport>,
    ) -> Self {
        let totals = totals(&capabilities);
        Self {
            run_id: Uuid::new_v4(),
            base_url: base_url.into(),
            started_at,
            finished_at: Utc::now(),
            capabilities,
            totals,
        }
    }

    pub fn capability(&self, name: &str) -> Option<&CapabilityReport> {
        self.capabilities.iter().find(|c| c.capability == name)
    }
}

fn totals(reports: &[CapabilityReport]) -> RunTotals {
    let mut totals = RunTotals {
        capabilities: reports.len(),
        ..RunTotals::default()
    };
    for report in reports {
        totals.probes += report.probes.total;
        totals.failed_probes += report.probes.failed;
        match &report.outcome {
            ReportOutcome::Confirmed { ambiguous: true, .. } => {
                totals.confirmed += 1;
                totals.ambiguous += 1;
            }
            ReportOutcome::Confirmed { .. } => totals.confirmed += 1,
            ReportOutcome::Partial { .. } => totals.partial += 1,
            ReportOutcome::NoMatch => totals.no_match += 1,
            ReportOutcome::InsufficientData => totals.insufficient_data += 1,
        }
    }
    totals
}

// ── Sinks ───────────────────────────────────────────────────────────────

/// Renders a finished run report.
pub trait ReportSink {
    fn render(&self, report: &RunReport) -> std::io::Result<()>;
}

/// Keeps rendered reports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<RunReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<RunReport> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ReportSink for MemorySink {
    fn render(&self, report: &RunReport) -> std::io::Result<()> {
        self.reports
            .lock()
            .map_err(|_| std::io::Error::other("memory sink poisoned"))?
            .push(report.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypothesis::HypothesisCategory;
    use crate::types::{InvocationMethod, ProbeFailure, TestCase};

    fn cap(category: OutputCategory) -> Capability {
        Capability::new("cap", "/cap", InvocationMethod::Payload, category)
    }

    fn verdict(name: &str, matches: usize, total: usize) -> Verdict {
        Verdict {
            hypothesis: name.into(),
            category: HypothesisCategory::BooleanPredicate,
            matches,
            total,
            excluded: 0,
            is_exact: total > 0 && matches == total,
            counterexamples: vec![],
        }
    }

    fn ok(cap: &Capability, input: &str, out: OutputValue) -> Observation {
        Observation::success(cap, &TestCase::new(input, "t"), 200, out)
    }

    fn failed(cap: &Capability, input: &str) -> Observation {
        Observation::failure(
            cap,
            &TestCase::new(input, "t"),
            Some(500),
            ProbeFailure::Status {
                status: 500,
                body: String::new(),
            },
        )
    }

    #[test]
    fn exact_match_is_confirmed() {
        let c = cap(OutputCategory::Boolean);
        let obs = vec![ok(&c, "a", OutputValue::Bool(true))];
        let report = ReportBuilder::default().build(
            &c,
            &[verdict("alphabetic-only", 1, 1), verdict("is-empty", 0, 1)],
            &obs,
        );
        assert_eq!(
            report.outcome,
            ReportOutcome::Confirmed {
                hypotheses: vec!["alphabetic-only".into()],
                ambiguous: false
            }
        );
        assert_eq!(report.outcome.label(), "confirmed");
    }

    #[test]
    fn ties_are_reported_as_ambiguous() {
        let c = cap(OutputCategory::Boolean);
        let obs = vec![ok(&c, "1", OutputValue::Bool(false))];
        let report = ReportBuilder::default().build(
            &c,
            &[verdict("a", 1, 1), verdict("b", 1, 1)],
            &obs,
        );
        match &report.outcome {
            ReportOutcome::Confirmed {
                hypotheses,
                ambiguous,
            } => {
                assert!(*ambiguous);
                assert_eq!(hypotheses, &vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected confirmed, got {:?}", other),
        }
    }

    #[test]
    fn best_partial_carries_its_counterexamples() {
        let c = cap(OutputCategory::Boolean);
        let obs = vec![
            ok(&c, "a", OutputValue::Bool(true)),
            ok(&c, "b", OutputValue::Bool(false)),
        ];
        let mut best = verdict("x", 1, 2);
        best.counterexamples.push(Counterexample {
            input: "b".into(),
            expected: OutputValue::Bool(true),
            observed: OutputValue::Bool(false),
        });
        let report = ReportBuilder::default().build(&c, &[best, verdict("y", 0, 2)], &obs);
        assert!(matches!(
            &report.outcome,
            ReportOutcome::Partial { hypothesis, matches: 1, total: 2, .. } if hypothesis == "x"
        ));
        assert_eq!(report.counterexamples.len(), 1);
    }

    #[test]
    fn partial_prefers_ratio_over_raw_matches() {
        let c = cap(OutputCategory::Boolean);
        let obs: Vec<Observation> = (0..10)
            .map(|i| ok(&c, &i.to_string(), OutputValue::Bool(false)))
            .collect();
        let many = verdict("many", 6, 10);
        let mut precise = verdict("precise", 4, 5);
        precise.excluded = 5;
        precise.counterexamples.push(Counterexample {
            input: "3".into(),
            expected: OutputValue::Bool(true),
            observed: OutputValue::Bool(false),
        });
        let report = ReportBuilder::default().build(&c, &[many, precise, verdict("late", 4, 5)], &obs);
        match &report.outcome {
            ReportOutcome::Partial {
                hypothesis,
                matches,
                total,
                ratio,
            } => {
                assert_eq!(hypothesis, "precise");
                assert_eq!((*matches, *total), (4, 5));
                assert!((ratio - 0.8).abs() < f64::EPSILON);
            }
            other => panic!("expected partial, got {:?}", other),
        }
        assert_eq!(report.counterexamples[0].input, "3");
    }

    #[test]
    fn insufficient_data_differs_from_no_match() {
        let c = cap(OutputCategory::Integer);
        let all_failed = vec![failed(&c, "a"), failed(&c, "b")];
        let report = ReportBuilder::default().build(&c, &[verdict("length", 0, 0)], &all_failed);
        assert_eq!(report.outcome, ReportOutcome::InsufficientData);
        assert_eq!(report.probes.failed, 2);
        assert!(report.samples.is_empty());

        let obs = vec![ok(&c, "a", OutputValue::Integer(7))];
        let report = ReportBuilder::default().build(&c, &[verdict("length", 0, 1)], &obs);
        assert_eq!(report.outcome, ReportOutcome::NoMatch);
    }

    #[test]
    fn samples_are_capped_and_skip_failures() {
        let c = cap(OutputCategory::String);
        let mut obs = vec![failed(&c, "x")];
        for i in 0..10 {
            obs.push(ok(&c, &i.to_string(), OutputValue::Text(i.to_string())));
        }
        let report = ReportBuilder::new(3).build(&c, &[], &obs);
        assert_eq!(report.samples.len(), 3);
        assert_eq!(report.samples[0].input, "0");
        assert_eq!(report.probes, ProbeCounts { total: 11, succeeded: 10, failed: 1 });
        assert!(report.length_profile.is_empty());
    }

    #[test]
    fn histogram_orders_by_frequency_then_first_seen() {
        let c = cap(OutputCategory::Boolean);
        let obs = vec![
            ok(&c, "a", OutputValue::Bool(true)),
            ok(&c, "", OutputValue::Bool(false)),
            ok(&c, "bb", OutputValue::Bool(false)),
            ok(&c, "cc", OutputValue::Bool(true)),
            ok(&c, "1", OutputValue::Bool(false)),
        ];
        let report = ReportBuilder::default().build(&c, &[], &obs);
        assert_eq!(
            report.output_histogram,
            vec![
                OutputBucket { value: "false".into(), count: 3 },
                OutputBucket { value: "true".into(), count: 2 },
            ]
        );
        assert_eq!(
            report.length_profile,
            vec![
                LengthBucket { length: 0, true_count: 0, false_count: 1 },
                LengthBucket { length: 1, true_count: 1, false_count: 1 },
                LengthBucket { length: 2, true_count: 1, false_count: 1 },
            ]
        );
    }

    #[test]
    fn run_totals_count_outcomes() {
        let c = cap(OutputCategory::Boolean);
        let obs = vec![ok(&c, "a", OutputValue::Bool(true)), failed(&c, "b")];
        let builder = ReportBuilder::default();
        let confirmed = builder.build(&c, &[verdict("a", 1, 1), verdict("b", 1, 1)], &obs);
        let insufficient = builder.build(&c, &[], &[failed(&c, "z")]);

        let run = RunReport::assemble("http://svc", Utc::now(), vec![confirmed, insufficient]);
        assert_eq!(run.totals.capabilities, 2);
        assert_eq!(run.totals.confirmed, 1);
        assert_eq!(run.totals.ambiguous, 1);
        assert_eq!(run.totals.insufficient_data, 1);
        assert_eq!(run.totals.probes, 3);
        assert_eq!(run.totals.failed_probes, 2);
        assert!(run.finished_at >= run.started_at);
    }

    #[test]
    fn memory_sink_keeps_reports() {
        let sink = MemorySink::new();
        let run = RunReport::assemble("http://svc", Utc::now(), vec![]);
        sink.render(&run).unwrap();
        assert_eq!(sink.reports().len(), 1);
        assert_eq!(sink.reports()[0].run_id, run.run_id);
    }

    #[test]
    fn outcome_serialises_with_status_tag() {
        let json = serde_json::to_value(ReportOutcome::InsufficientData).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        let json = serde_json::to_value(ReportOutcome::Confirmed {
            hypotheses: vec!["echo".into()],
            ambiguous: false,
        })
        .unwrap();
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["hypotheses"][0], "echo");
    }
}
