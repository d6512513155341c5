//! Fingerprint run command

use std::time::Duration;

use blackbox_engine::{FingerprintEngine, ReqwestTransport, TargetConfig};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::CliResult;
use crate::output::{self, OutputFormat};

/// Arguments for `run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Only fingerprint this capability (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,
}

/// Probe and fingerprint the selected capabilities
pub async fn execute(args: RunArgs, target: TargetConfig, format: OutputFormat) -> CliResult<()> {
    let transport = ReqwestTransport::new(target.timeout())?;
    let engine = FingerprintEngine::new(target, transport)?;

    let report = match format {
        OutputFormat::Table => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message("Probing...");

            let result = engine
                .run_with_progress(&args.only, &mut |capability, done, total| {
                    pb.set_message(format!("{} {}/{}", capability.name, done, total));
                })
                .await;
            pb.finish_and_clear();
            result?
        }
        OutputFormat::Json | OutputFormat::Yaml => engine.run(&args.only).await?,
    };

    output::sink_for(format).render(&report)?;
    Ok(())
}
