//! Compare command - metric success rates over an experiment directory.
//!
//! Every immediate subdirectory of the root is one dataset; its name, split
//! on `_`, leads the row (`run`, `e1`, `e2`), followed by one success rate
//! per metric.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::batch::{init_thread_pool, run_experiment, ExperimentRow};
use crate::cli::{build_plan, require_directory, OutputFormat, PlanArgs};
use crate::metrics::Metric;

/// Leading columns taken from the dataset directory name
const FOLDER_HEADER: [&str; 3] = ["run", "e1", "e2"];

#[derive(Args)]
pub struct CompareArgs {
    /// Experiment root containing one directory per dataset
    #[arg(required = true)]
    pub root: PathBuf,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub plan: PlanArgs,
}

/// Execute the compare command
///
/// # Errors
///
/// Returns an error if the root is not a directory, the configuration does
/// not resolve, or any block file fails to parse or score.
#[allow(clippy::needless_pass_by_value)]
pub fn run(
    args: CompareArgs,
    format: OutputFormat,
    verbose: bool,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    require_directory(&args.root)?;
    let plan = build_plan(config, &args.plan, args.threads)?;
    init_thread_pool(plan.threads)?;

    if verbose {
        eprintln!(
            "Comparing {} metrics over {} (threads: {})",
            plan.metrics().len(),
            args.root.display(),
            rayon::current_num_threads()
        );
    }

    let rows = run_experiment(&args.root, &plan)?;

    match format {
        OutputFormat::Text => print_text_rows(&rows, plan.metrics()),
        OutputFormat::Json => print_json_rows(&rows)?,
        OutputFormat::Tsv => print_tsv_rows(&rows, plan.metrics()),
    }

    Ok(())
}

fn header(metrics: &[Metric]) -> Vec<&'static str> {
    FOLDER_HEADER
        .iter()
        .copied()
        .chain(metrics.iter().map(Metric::name))
        .collect()
}

fn cells(row: &ExperimentRow) -> Vec<String> {
    row.fields
        .iter()
        .cloned()
        .chain(row.summary.success_rates.iter().map(|r| format!("{r:.4}")))
        .collect()
}

fn print_text_rows(rows: &[ExperimentRow], metrics: &[Metric]) {
    let width = metrics.iter().map(|m| m.name().len()).max().unwrap_or(0);
    let justify = |cell: &str| format!("{cell:<width$}");

    let header: Vec<String> = header(metrics).into_iter().map(justify).collect();
    println!("{}", header.join("\t"));

    for row in rows {
        let line: Vec<String> = cells(row).iter().map(|c| justify(c.as_str())).collect();
        println!("{}", line.join("\t"));
    }
}

fn print_json_rows(rows: &[ExperimentRow]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn print_tsv_rows(rows: &[ExperimentRow], metrics: &[Metric]) {
    println!("{}", header(metrics).join("\t"));
    for row in rows {
        println!("{}", cells(row).join("\t"));
    }
}
