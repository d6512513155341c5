//! Target configuration: where the service lives and what it exposes.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FingerprintError, FingerprintResult};
use crate::types::{Capability, InvocationMethod, OutputCategory};

/// Base URL of the reference service.
pub const DEFAULT_BASE_URL: &str = "https://blackbox-interface.vercel.app";

fn default_timeout_secs() -> u64 {
    30
}

fn default_sample_size() -> usize {
    5
}

fn default_counterexample_limit() -> usize {
    5
}

/// Static description of one target service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Scheme and host, without a trailing path.
    pub base_url: String,

    /// Transport timeout per request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between consecutive probes of one capability.
    #[serde(default)]
    pub pacing_ms: u64,

    /// Raw (input, output) pairs kept per capability report.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Counterexamples kept per verdict.
    #[serde(default = "default_counterexample_limit")]
    pub counterexample_limit: usize,

    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        use InvocationMethod::{Payload, Query};
        use OutputCategory as Out;

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
            pacing_ms: 0,
            sample_size: default_sample_size(),
            counterexample_limit: default_counterexample_limit(),
            capabilities: vec![
                Capability::new("data", "/data", Payload, Out::Integer),
                Capability::new("time", "/time", Query, Out::FixedScalar),
                Capability::new("fizzbuzz", "/fizzbuzz", Payload, Out::Boolean)
                    .with_keywords(["fizzbuzz", "fizz", "buzz"]),
                Capability::new("glitch", "/glitch", Payload, Out::Boolean),
                Capability::new("zap", "/zap", Payload, Out::String),
                Capability::new("alpha", "/alpha", Payload, Out::Boolean),
            ],
        }
    }
}

impl TargetConfig {
    /// Check the configuration before any probe is sent.
    pub fn validate(&self) -> FingerprintResult<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(FingerprintError::Configuration("base_url is empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(FingerprintError::Configuration(format!(
                "base_url must be http(s): {}",
                base
            )));
        }
        if self.sample_size == 0 {
            return Err(FingerprintError::Configuration(
                "sample_size must be at least 1".into(),
            ));
        }

        let mut seen = HashSet::new();
        for cap in &self.capabilities {
            if cap.name.trim().is_empty() {
                return Err(FingerprintError::Configuration(
                    "capability name is empty".into(),
                ));
            }
            if !cap.path.starts_with('/') {
                return Err(FingerprintError::Configuration(format!(
                    "capability {} path must start with '/': {}",
                    cap.name, cap.path
                )));
            }
            if !seen.insert(cap.name.as_str()) {
                return Err(FingerprintError::DuplicateCapability(cap.name.clone()));
            }
        }
        Ok(())
    }

    /// Look up a capability by name.
    pub fn capability(&self, name: &str) -> FingerprintResult<&Capability> {
        self.capabilities
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| FingerprintError::UnknownCapability(name.to_string()))
    }

    /// Capabilities named in `only`, in configuration order. Empty selects all.
    pub fn select(&self, only: &[String]) -> FingerprintResult<Vec<&Capability>> {
        for name in only {
            self.capability(name)?;
        }
        Ok(self
            .capabilities
            .iter()
            .filter(|c| only.is_empty() || only.iter().any(|n| n == &c.name))
            .collect())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}
