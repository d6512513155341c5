//! Core type definitions for the fingerprinting engine.
//!
//! A [`Capability`] names one remote endpoint, a [`TestCase`] is one crafted
//! input for it, and an [`Observation`] records what the endpoint did with
//! that input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Capability ──────────────────────────────────────────────────────────

/// How a capability is invoked on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationMethod {
    /// `GET` with no body. The test-case input does not reach the endpoint.
    Query,
    /// `POST` with a JSON object carrying the input in its `data` field.
    Payload,
}

impl std::fmt::Display for InvocationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Payload => write!(f, "payload"),
        }
    }
}

/// The kind of output a capability is expected to produce.
///
/// Selects which hypotheses are scored. It is never enforced at probe time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputCategory {
    Integer,
    Boolean,
    String,
    FixedScalar,
}

impl std::fmt::Display for OutputCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::String => write!(f, "string"),
            Self::FixedScalar => write!(f, "fixed_scalar"),
        }
    }
}

/// One remote endpoint under investigation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// Short name, unique within a target.
    pub name: String,
    /// Path relative to the target's base URL, starting with `/`.
    pub path: String,
    /// Wire invocation style.
    pub method: InvocationMethod,
    /// Expected output category.
    pub category: OutputCategory,
    /// Extra case-variant seeds for the catalog. Empty means "use the name".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl Capability {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        method: InvocationMethod,
        category: OutputCategory,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method,
            category,
            keywords: Vec::new(),
        }
    }

    /// Builder-style keyword override.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Keywords the catalog derives case variants from.
    pub fn catalog_keywords(&self) -> Vec<&str> {
        if self.keywords.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.keywords.iter().map(String::as_str).collect()
        }
    }
}

// ── Test Case ───────────────────────────────────────────────────────────

/// A crafted input for one capability.
///
/// The label is descriptive only and never participates in scoring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub label: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            label: label.into(),
        }
    }
}

// ── Output Value ────────────────────────────────────────────────────────

/// A typed output, either observed from an endpoint or predicted by a hypothesis.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OutputValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
    /// JSON arrays and objects.
    Structured(serde_json::Value),
    /// A non-JSON response body. Never equal to anything.
    Opaque(String),
}

impl OutputValue {
    /// Convert a decoded JSON `result` field.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    // Beyond i64::MAX; no hypothesis produces values this large.
                    Self::Float(u as f64)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Self::Text(s.clone()),
            Value::Null => Self::Null,
            other => Self::Structured(other.clone()),
        }
    }

    /// Type-aware equality used for scoring.
    ///
    /// Booleans never equal numbers, numbers compare by value across the
    /// integer/float split, and opaque payloads never equal anything.
    pub fn strict_eq(&self, other: &OutputValue) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(i), Self::Float(f)) | (Self::Float(f), Self::Integer(i)) => {
                integral_f64_eq(*i, *f)
            }
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Structured(a), Self::Structured(b)) => a == b,
            _ => false,
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Null => "null",
            Self::Structured(_) => "structured",
            Self::Opaque(_) => "opaque",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

fn integral_f64_eq(i: i64, f: f64) -> bool {
    // i64::MAX as f64 rounds up to 2^63, which is out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) && f as i64 == i
}

impl std::fmt::Display for OutputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{:?}", s),
            Self::Null => write!(f, "null"),
            Self::Structured(v) => write!(f, "{}", v),
            Self::Opaque(s) => write!(f, "<opaque {} bytes>", s.len()),
        }
    }
}

// ── Probe Failure ───────────────────────────────────────────────────────

/// Why a probe produced no output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeFailure {
    /// The request never produced a response.
    Transport { message: String },
    /// The endpoint answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The body was declared JSON but could not be decoded into a result.
    Decode { message: String },
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "transport: {}", message),
            Self::Status { status, body } => write!(f, "status {}: {}", status, body),
            Self::Decode { message } => write!(f, "decode: {}", message),
        }
    }
}

// ── Observation ─────────────────────────────────────────────────────────

/// The recorded outcome of probing one test case.
///
/// Exactly one of `output` and `error` is populated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Observation {
    /// Name of the capability this observation belongs to.
    pub capability: String,
    pub input: String,
    pub label: String,
    pub output: Option<OutputValue>,
    /// HTTP status, absent when the transport failed.
    pub status: Option<u16>,
    pub error: Option<ProbeFailure>,
    #[serde(default = "Utc::now")]
    pub observed_at: DateTime<Utc>,
}

impl Observation {
    pub fn success(
        capability: &Capability,
        case: &TestCase,
        status: u16,
        output: OutputValue,
    ) -> Self {
        Self {
            capability: capability.name.clone(),
            input: case.input.clone(),
            label: case.label.clone(),
            output: Some(output),
            status: Some(status),
            error: None,
            observed_at: Utc::now(),
        }
    }

    pub fn failure(
        capability: &Capability,
        case: &TestCase,
        status: Option<u16>,
        error: ProbeFailure,
    ) -> Self {
        Self {
            capability: capability.name.clone(),
            input: case.input.clone(),
            label: case.label.clone(),
            output: None,
            status,
            error: Some(error),
            observed_at: Utc::now(),
        }
    }

    /// Override the recording time.
    pub fn at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = observed_at;
        self
    }

    /// Whether this observation takes part in hypothesis scoring.
    pub fn is_scorable(&self) -> bool {
        self.error.is_none() && self.output.is_some()
    }

    /// The observed output of a scorable observation.
    pub fn scorable_output(&self) -> Option<&OutputValue> {
        if self.error.is_some() {
            None
        } else {
            self.output.as_ref()
        }
    }
}
