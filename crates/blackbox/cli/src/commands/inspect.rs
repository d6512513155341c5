//! Raw exchange inspection command

use blackbox_engine::{
    normalize, Capability, EndpointProbe, Observation, ProbeRequest, ReqwestTransport,
    TargetConfig, TestCase, TransportResponse,
};
use clap::Args;
use colored::*;
use serde::Serialize;

use crate::error::CliResult;
use crate::output::{print_error, print_single, OutputFormat};

/// Arguments for `inspect`
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Capability name; all capabilities when omitted
    pub name: Option<String>,

    /// Input sent to payload-style capabilities
    #[arg(long, default_value = "hello")]
    pub input: String,
}

/// One raw exchange and its normalised observation
#[derive(Debug, Serialize)]
struct InspectRecord {
    capability: String,
    request: ProbeRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<TransportResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    observation: Option<Observation>,
}

/// Send one request per selected capability and show what came back
pub async fn execute(args: InspectArgs, target: &TargetConfig, format: OutputFormat) -> CliResult<()> {
    let selected: Vec<&Capability> = match &args.name {
        Some(name) => vec![target.capability(name)?],
        None => target.capabilities.iter().collect(),
    };

    let transport = ReqwestTransport::new(target.timeout())?;
    let probe = EndpointProbe::new(transport, &target.base_url);
    let case = TestCase::new(args.input.as_str(), "inspect");

    let mut records = Vec::with_capacity(selected.len());
    for capability in selected {
        let request = probe.request_for(capability, &case.input);
        let record = match probe.exchange(capability, &case.input).await {
            Ok(response) => InspectRecord {
                capability: capability.name.clone(),
                request,
                observation: Some(normalize(capability, &case, &response)),
                response: Some(response),
                error: None,
            },
            Err(err) => InspectRecord {
                capability: capability.name.clone(),
                request,
                response: None,
                error: Some(err.to_string()),
                observation: None,
            },
        };
        records.push(record);
    }

    match format {
        OutputFormat::Table => {
            for record in &records {
                print_record(record);
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Yaml => print_single(&records, format),
    }
}

fn print_record(record: &InspectRecord) {
    println!();
    println!(
        "{} {} {}",
        record.capability.bold(),
        record.request.method,
        record.request.url.dimmed()
    );
    if let Some(body) = &record.request.body {
        println!("  Request body: {}", body);
    }

    if let Some(err) = &record.error {
        print_error(err);
        return;
    }

    if let Some(response) = &record.response {
        let status = if response.is_success() {
            response.status.to_string().green()
        } else {
            response.status.to_string().red()
        };
        println!("  Status: {}", status);
        println!("  Headers:");
        for (name, value) in &response.headers {
            println!("    {}: {}", name, value.dimmed());
        }
        println!("  Body: {}", response.body);
    }

    if let Some(obs) = &record.observation {
        match (&obs.output, &obs.error) {
            (Some(output), _) => println!("  Decoded: {} ({})", output, output.kind()),
            (None, Some(failure)) => println!("  Decoded: {}", failure.to_string().yellow()),
            (None, None) => {}
        }
    }
}
