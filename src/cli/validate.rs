//! Validate command - check simulated datasets against their expected distances.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::batch::{init_thread_pool, validate_datasets, ValidationReport};
use crate::cli::{load_config, require_directory, OutputFormat};

#[derive(Args)]
pub struct ValidateArgs {
    /// Root containing `<run>_<e1>_<e2>` dataset directories
    #[arg(required = true)]
    pub root: PathBuf,

    /// Worker threads (overrides the config file; defaults to the number of CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Exit with an error if any distance differs
    #[arg(long)]
    pub strict: bool,
}

/// Execute the validate command
///
/// # Errors
///
/// Returns an error if the root is not a directory, the config file cannot be
/// read, the thread count is zero or a block file cannot be parsed, and with
/// `--strict` if any issue was found.
#[allow(clippy::needless_pass_by_value)]
pub fn run(
    args: ValidateArgs,
    format: OutputFormat,
    verbose: bool,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    require_directory(&args.root)?;
    let threads = args.threads.or(load_config(config)?.threads);
    if threads == Some(0) {
        anyhow::bail!("Thread count must be at least 1");
    }
    init_thread_pool(threads)?;

    let report = validate_datasets(&args.root)?;

    if verbose {
        eprintln!(
            "Checked {} files, skipped {} directories",
            report.files_checked,
            report.skipped_directories.len()
        );
    }

    match format {
        OutputFormat::Text => print_text_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Tsv => print_tsv_report(&report),
    }

    if args.strict && !report.is_clean() {
        anyhow::bail!("{} distance mismatches found", report.issues.len());
    }
    Ok(())
}

fn print_text_report(report: &ValidationReport) {
    for issue in &report.issues {
        println!("{issue}");
    }
    if report.is_clean() {
        println!("All {} files match their expected distances", report.files_checked);
    }
}

fn print_tsv_report(report: &ValidationReport) {
    println!("file\tkind\tgenome_a\tgenome_b\texpected\tactual");
    for issue in &report.issues {
        println!(
            "{}\t{:?}\t{}\t{}\t{}\t{}",
            issue.file.display(),
            issue.kind,
            issue.genomes.0,
            issue.genomes.1,
            issue.expected,
            issue.actual
        );
    }
}
