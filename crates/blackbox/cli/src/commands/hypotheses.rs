//! Hypothesis library command

use blackbox_engine::{HypothesisLibrary, OutputCategory};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliResult;
use crate::output::{print_output, OutputFormat};

/// Output category filter
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Integer,
    Boolean,
    String,
    FixedScalar,
}

impl From<CategoryArg> for OutputCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Integer => OutputCategory::Integer,
            CategoryArg::Boolean => OutputCategory::Boolean,
            CategoryArg::String => OutputCategory::String,
            CategoryArg::FixedScalar => OutputCategory::FixedScalar,
        }
    }
}

/// Arguments for `hypotheses`
#[derive(Args, Debug)]
pub struct HypothesesArgs {
    /// Only hypotheses scored for this output category
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
}

/// Table row for a hypothesis
#[derive(Debug, Serialize, Tabled)]
struct HypothesisRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// List the built-in library in declaration order
pub fn execute(args: HypothesesArgs, format: OutputFormat) -> CliResult<()> {
    let library = HypothesisLibrary::builtin();
    let selected = match args.category {
        Some(category) => library.for_category(category.into()),
        None => library.iter().collect(),
    };
    let rows: Vec<HypothesisRow> = selected
        .into_iter()
        .map(|h| HypothesisRow {
            name: h.name().to_string(),
            family: h.category().to_string(),
            description: h.description(),
        })
        .collect();
    print_output(rows, format)
}
