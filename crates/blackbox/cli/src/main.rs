//! Blackbox CLI - behavioural fingerprinting of remote HTTP endpoints
//!
//! This CLI lets an investigator:
//! - Probe every capability of a target and name the function behind it
//! - Print the deterministic test-case catalog for a capability
//! - Browse the hypothesis library
//! - Inspect one raw request/response exchange

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{catalog, hypotheses, inspect, run};
use config::CliConfig;
use error::CliResult;

/// Blackbox CLI application
#[derive(Parser)]
#[command(name = "blackbox")]
#[command(about = "Blackbox - behavioural fingerprinting CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "BLACKBOX_CONFIG")]
    config: Option<String>,

    /// Target service base URL (overrides the config file)
    #[arg(short, long, env = "BLACKBOX_BASE_URL")]
    base_url: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Probe and fingerprint capabilities
    Run(run::RunArgs),

    /// Print the test-case catalog for a capability
    Catalog(catalog::CatalogArgs),

    /// List the hypothesis library
    #[command(alias = "hyp")]
    Hypotheses(hypotheses::HypothesesArgs),

    /// Show one raw exchange per capability
    Inspect(inspect::InspectArgs),

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;
    let target = config.into_target(cli.base_url);
    target.validate()?;
    tracing::debug!(
        base_url = %target.base_url,
        capabilities = target.capabilities.len(),
        "configuration loaded"
    );

    // Execute command
    match cli.command {
        Commands::Run(args) => run::execute(args, target, cli.output).await,
        Commands::Catalog(args) => catalog::execute(args, &target, cli.output),
        Commands::Hypotheses(args) => hypotheses::execute(args, cli.output),
        Commands::Inspect(args) => inspect::execute(args, &target, cli.output).await,
        Commands::Config => match cli.output {
            output::OutputFormat::Table => {
                println!("Base URL: {}", target.base_url);
                println!("Timeout: {}s", target.timeout_secs);
                println!("Pacing: {}ms", target.pacing_ms);
                println!("Sample size: {}", target.sample_size);
                println!("Counterexample limit: {}", target.counterexample_limit);
                println!("Capabilities:");
                for cap in &target.capabilities {
                    println!("  {} {} ({}, {})", cap.name, cap.path, cap.method, cap.category);
                }
                Ok(())
            }
            format => output::print_single(&target, format),
        },
    }
}
