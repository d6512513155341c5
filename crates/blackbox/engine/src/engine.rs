//! Fingerprint engine: drives the catalog, probe, matcher and report builder.
//!
//! Capabilities are investigated one at a time, in configuration order.
//! Within a capability the catalog is fully materialised before the first
//! probe and test cases are sent sequentially in catalog order.

use chrono::Utc;
use tracing::{debug, info};

use crate::catalog::TestCaseCatalog;
use crate::config::TargetConfig;
use crate::error::FingerprintResult;
use crate::hypothesis::HypothesisLibrary;
use crate::matching::MatchEngine;
use crate::probe::EndpointProbe;
use crate::report::{CapabilityReport, ReportBuilder, RunReport};
use crate::transport::Transport;
use crate::types::{Capability, Observation};

/// Observations and report for one capability.
#[derive(Clone, Debug)]
pub struct Investigation {
    pub observations: Vec<Observation>,
    pub report: CapabilityReport,
}

/// Progress of a capability's probing: `(capability, done, total)`.
pub type ProgressFn<'a> = dyn FnMut(&Capability, usize, usize) + 'a;

/// Orchestrates a fingerprint run against one target.
pub struct FingerprintEngine<T> {
    config: TargetConfig,
    probe: EndpointProbe<T>,
    catalog: TestCaseCatalog,
    matcher: MatchEngine,
    reports: ReportBuilder,
    /// `None` uses the built-in library.
    library: Option<HypothesisLibrary>,
}

impl<T: Transport> FingerprintEngine<T> {
    /// Validate `config` and wire the engine around `transport`.
    pub fn new(config: TargetConfig, transport: T) -> FingerprintResult<Self> {
        config.validate()?;
        let probe = EndpointProbe::new(transport, &config.base_url);
        Ok(Self {
            probe,
            catalog: TestCaseCatalog::new(),
            matcher: MatchEngine::new(config.counterexample_limit),
            reports: ReportBuilder::new(config.sample_size),
            library: None,
            config,
        })
    }

    /// Score against `library` instead of the built-in one.
    pub fn with_library(mut self, library: HypothesisLibrary) -> Self {
        self.library = Some(library);
        self
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    pub fn probe(&self) -> &EndpointProbe<T> {
        &self.probe
    }

    pub fn catalog(&self) -> &TestCaseCatalog {
        &self.catalog
    }

    pub fn library(&self) -> &HypothesisLibrary {
        match &self.library {
            Some(lib) => lib,
            None => HypothesisLibrary::builtin(),
        }
    }

    /// Probe every catalog case of `capability`, one observation per case.
    pub async fn observe(
        &self,
        capability: &Capability,
        progress: &mut ProgressFn<'_>,
    ) -> Vec<Observation> {
        let cases = self.catalog.generate(capability);
        let pacing = self.config.pacing();
        let mut observations = Vec::with_capacity(cases.len());

        for (idx, case) in cases.iter().enumerate() {
            if idx > 0 && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
            observations.push(self.probe.probe(capability, case).await);
            progress(capability, idx + 1, cases.len());
        }
        observations
    }

    /// Score and summarise an observation set. No network.
    pub fn analyse(&self, capability: &Capability, observations: &[Observation]) -> CapabilityReport {
        let hypotheses = self.library().for_category(capability.category);
        let verdicts = self.matcher.evaluate(capability, observations, &hypotheses);
        self.reports.build(capability, &verdicts, observations)
    }

    /// Probe and analyse one capability.
    pub async fn investigate(
        &self,
        capability: &Capability,
        progress: &mut ProgressFn<'_>,
    ) -> Investigation {
        debug!(capability = %capability.name, path = %capability.path, "investigating");
        let observations = self.observe(capability, progress).await;
        let report = self.analyse(capability, &observations);
        info!(
            capability = %capability.name,
            outcome = %report.outcome,
            probes = report.probes.total,
            failed = report.probes.failed,
            "capability fingerprinted"
        );
        Investigation {
            observations,
            report,
        }
    }

    /// Fingerprint the capabilities named in `only`, or all when empty.
    pub async fn run(&self, only: &[String]) -> FingerprintResult<RunReport> {
        self.run_with_progress(only, &mut |_, _, _| {}).await
    }

    pub async fn run_with_progress(
        &self,
        only: &[String],
        progress: &mut ProgressFn<'_>,
    ) -> FingerprintResult<RunReport> {
        let selected = self.config.select(only)?;
        let started_at = Utc::now();
        info!(
            base_url = %self.config.base_url,
            capabilities = selected.len(),
            "fingerprint run started"
        );

        let mut reports = Vec::with_capacity(selected.len());
        for capability in selected {
            reports.push(self.investigate(capability, progress).await.report);
        }

        let run = RunReport::assemble(self.config.base_url.clone(), started_at, reports);
        info!(
            run_id = %run.run_id,
            confirmed = run.totals.confirmed,
            partial = run.totals.partial,
            "fingerprint run finished"
        );
        Ok(run)
    }
}
