//! Test-case catalog command

use blackbox_engine::{TargetConfig, TestCaseCatalog};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliResult;
use crate::output::{clip, print_output, OutputFormat};

/// Arguments for `catalog`
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Capability name
    pub name: String,
}

/// Table row for a test case
#[derive(Debug, Serialize, Tabled)]
struct CaseRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Input", display_with = "display_input")]
    input: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Chars")]
    chars: usize,
}

fn display_input(input: &String) -> String {
    clip(&format!("{:?}", input), 40)
}

/// Print the catalog for one capability. No network.
pub fn execute(args: CatalogArgs, target: &TargetConfig, format: OutputFormat) -> CliResult<()> {
    let capability = target.capability(&args.name)?;
    let rows: Vec<CaseRow> = TestCaseCatalog::new()
        .generate(capability)
        .into_iter()
        .enumerate()
        .map(|(index, case)| CaseRow {
            index,
            chars: case.input.chars().count(),
            input: case.input,
            label: case.label,
        })
        .collect();
    print_output(rows, format)
}
