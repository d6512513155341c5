//! # blackbox-engine
//!
//! Behavioural fingerprinting of remote HTTP endpoints.
//!
//! Given a service exposing a handful of undocumented endpoints, the engine
//! submits crafted inputs to each one, records what comes back, and scores
//! a library of candidate functions against the observed pairs to name the
//! behaviour each endpoint implements.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────┐
//!   │  TargetConfig       │  ← base URL + capabilities
//!   └──────────┬──────────┘
//!              ▼
//!   ┌─────────────────────┐
//!   │  TestCaseCatalog    │  ← deterministic discriminating inputs
//!   └──────────┬──────────┘
//!              ▼
//!   ┌─────────────────────┐     ┌──────────────────────┐
//!   │  EndpointProbe      │ ──▶ │  Transport           │  ← reqwest or scripted
//!   └──────────┬──────────┘     └──────────────────────┘
//!              ▼
//!   ┌─────────────────────┐     ┌──────────────────────┐
//!   │  MatchEngine        │ ◀── │  HypothesisLibrary   │
//!   └──────────┬──────────┘     └──────────────────────┘
//!              ▼
//!   ┌─────────────────────┐
//!   │  ReportBuilder      │  → RunReport → ReportSink
//!   └─────────────────────┘
//! ```
//!
//! ## Key Principles
//!
//! - **Failures are data**: a probe never returns an error. Transport,
//!   status and decode failures are recorded on the observation and left
//!   out of scoring.
//! - **Strict equality**: booleans never equal numbers, and opaque bodies
//!   never equal anything. The clock hypothesis alone accepts a tolerance
//!   window around the observation time.
//! - **Surface ties**: every hypothesis that explains all observations is
//!   reported. The engine never picks a single winner among equals.
//! - **Insufficient data is not "no match"**: an all-error observation set
//!   is reported as such.

#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod hypothesis;
pub mod matching;
pub mod probe;
pub mod report;
pub mod transport;
pub mod types;

pub use catalog::TestCaseCatalog;
pub use config::{TargetConfig, DEFAULT_BASE_URL};
pub use engine::{FingerprintEngine, Investigation, ProgressFn};
pub use error::{FingerprintError, FingerprintResult};
pub use hypothesis::{
    EvaluationError, EvaluationResult, Hypothesis, HypothesisCategory, HypothesisLibrary,
    ScoringContext,
};
pub use matching::{exact_matches, Counterexample, MatchEngine, Verdict};
pub use probe::{normalize, EndpointProbe, PAYLOAD_FIELD, RESULT_FIELD};
pub use report::{
    CapabilityReport, LengthBucket, MemorySink, OutputBucket, ProbeCounts, ReportBuilder,
    ReportOutcome, ReportSink, RunReport, RunTotals, SamplePair,
};
pub use transport::{
    HttpMethod, ProbeRequest, ReqwestTransport, Transport, TransportError, TransportResponse,
};
pub use types::{
    Capability, InvocationMethod, Observation, OutputCategory, OutputValue, ProbeFailure,
    TestCase,
};
