//! Output formatting utilities and report sinks

use blackbox_engine::{CapabilityReport, ReportOutcome, ReportSink, RunReport};
use colored::*;
use serde::Serialize;
use std::io;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

/// Print a vector of items in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(data).with(Style::modern()));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&data)?),
    }
    Ok(())
}

/// Print a single item in the specified format
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?)
        }
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(data)?),
    }
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Shorten `s` to `max` characters for table cells.
pub fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

// ── Report sinks ────────────────────────────────────────────────────────

/// Sink for the selected output format
pub fn sink_for(format: OutputFormat) -> Box<dyn ReportSink> {
    match format {
        OutputFormat::Table => Box::new(TableSink),
        OutputFormat::Json => Box::new(JsonSink),
        OutputFormat::Yaml => Box::new(YamlSink),
    }
}

/// Pretty JSON on stdout
pub struct JsonSink;

impl ReportSink for JsonSink {
    fn render(&self, report: &RunReport) -> io::Result<()> {
        let text = serde_json::to_string_pretty(report)?;
        println!("{}", text);
        Ok(())
    }
}

/// YAML on stdout
pub struct YamlSink;

impl ReportSink for YamlSink {
    fn render(&self, report: &RunReport) -> io::Result<()> {
        let text = serde_yaml::to_string(report).map_err(io::Error::other)?;
        print!("{}", text);
        Ok(())
    }
}

/// Colored tables on stdout
pub struct TableSink;

/// Summary row per capability
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Capability")]
    capability: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Explanation")]
    explanation: String,
    #[tabled(rename = "Probes")]
    probes: String,
}

impl From<&CapabilityReport> for SummaryRow {
    fn from(r: &CapabilityReport) -> Self {
        let explanation = match &r.outcome {
            ReportOutcome::Confirmed { hypotheses, .. } => hypotheses.join(", "),
            ReportOutcome::Partial {
                hypothesis,
                matches,
                total,
                ratio,
            } => format!("{} {}/{} ({:.1}%)", hypothesis, matches, total, ratio * 100.0),
            ReportOutcome::NoMatch | ReportOutcome::InsufficientData => "-".into(),
        };
        Self {
            capability: r.capability.clone(),
            category: r.category.to_string(),
            outcome: r.outcome.label().to_string(),
            explanation,
            probes: format!("{}/{}", r.probes.succeeded, r.probes.total),
        }
    }
}

#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Output")]
    output: String,
}

#[derive(Tabled)]
struct CounterexampleRow {
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Expected")]
    expected: String,
    #[tabled(rename = "Observed")]
    observed: String,
}

fn colorize_outcome(outcome: &ReportOutcome) -> String {
    let label = outcome.label();
    match outcome {
        ReportOutcome::Confirmed { ambiguous: false, .. } => label.green().to_string(),
        ReportOutcome::Confirmed { ambiguous: true, .. } => label.cyan().to_string(),
        ReportOutcome::Partial { .. } => label.yellow().to_string(),
        ReportOutcome::NoMatch => label.red().to_string(),
        ReportOutcome::InsufficientData => label.dimmed().to_string(),
    }
}

fn outcome_detail(outcome: &ReportOutcome) -> String {
    match outcome {
        ReportOutcome::Confirmed { hypotheses, .. } => hypotheses.join(", "),
        ReportOutcome::Partial {
            hypothesis,
            matches,
            total,
            ..
        } => format!("{} ({}/{})", hypothesis, matches, total),
        ReportOutcome::NoMatch | ReportOutcome::InsufficientData => String::new(),
    }
}

impl TableSink {
    fn render_capability(&self, r: &CapabilityReport) {
        println!();
        println!("{} {} ({})", "▸".bold(), r.capability.bold(), r.path.dimmed());
        println!("  Outcome: {} {}", colorize_outcome(&r.outcome), outcome_detail(&r.outcome));
        if r.probes.failed > 0 {
            println!(
                "  {} {} of {} probes failed",
                "⚠".yellow(),
                r.probes.failed,
                r.probes.total
            );
        }

        if !r.samples.is_empty() {
            let rows: Vec<SampleRow> = r
                .samples
                .iter()
                .map(|s| SampleRow {
                    input: clip(&format!("{:?}", s.input), 32),
                    label: s.label.clone(),
                    output: clip(&s.output.to_string(), 32),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::modern()));
        }

        if !r.output_histogram.is_empty() {
            let top: Vec<String> = r
                .output_histogram
                .iter()
                .take(5)
                .map(|b| format!("{} ×{}", clip(&b.value, 24), b.count))
                .collect();
            println!("  Outputs: {}", top.join(", "));
        }

        if !r.length_profile.is_empty() {
            let lengths: Vec<String> = r
                .length_profile
                .iter()
                .map(|b| format!("{}:{}/{}", b.length, b.true_count, b.false_count))
                .collect();
            println!("  By length (true/false): {}", lengths.join(" "));
        }

        if !r.counterexamples.is_empty() {
            println!("  Counterexamples:");
            let rows: Vec<CounterexampleRow> = r
                .counterexamples
                .iter()
                .map(|c| CounterexampleRow {
                    input: clip(&format!("{:?}", c.input), 32),
                    expected: clip(&c.expected.to_string(), 24),
                    observed: clip(&c.observed.to_string(), 24),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::modern()));
        }
    }
}

impl ReportSink for TableSink {
    fn render(&self, report: &RunReport) -> io::Result<()> {
        let elapsed = report.finished_at - report.started_at;
        println!("{} {}", "Run".bold(), report.run_id.to_string().dimmed());
        println!("Target: {}", report.base_url);
        println!("Duration: {:.1}s", elapsed.num_milliseconds() as f64 / 1000.0);
        println!();

        let rows: Vec<SummaryRow> = report.capabilities.iter().map(SummaryRow::from).collect();
        if rows.is_empty() {
            println!("{}", "No capabilities".dimmed());
            return Ok(());
        }
        println!("{}", Table::new(rows).with(Style::modern()));

        for capability in &report.capabilities {
            self.render_capability(capability);
        }

        let t = &report.totals;
        println!();
        if t.confirmed == t.capabilities {
            print_success(&format!("All {} capabilities explained", t.capabilities));
        } else {
            print_info(&format!(
                "{} confirmed ({} ambiguous), {} partial, {} unmatched, {} insufficient data",
                t.confirmed, t.ambiguous, t.partial, t.no_match, t.insufficient_data
            ));
        }
        if t.failed_probes > 0 {
            print_warning(&format!("{} of {} probes failed", t.failed_probes, t.probes));
        }
        Ok(())
    }
}
