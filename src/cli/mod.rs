//! Command-line interface for quartet-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **evaluate**: Score the candidate topologies on one GRIMM block file
//! - **compare**: Success rates of every metric over an experiment directory
//! - **validate**: Check simulated datasets against their expected DCJ distances
//!
//! ## Usage
//!
//! ```text
//! # Score one file
//! quartet-solver evaluate blocks.txt
//!
//! # Experiment table, 8 worker threads
//! quartet-solver compare experiment/ --threads 8
//!
//! # JSON output for scripting
//! quartet-solver compare experiment/ --format json
//!
//! # Candidates and metrics from a config file
//! quartet-solver --config run.json evaluate blocks.txt
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{EvaluationPlan, RunConfig};
use crate::metrics::Metric;

pub mod compare;
pub mod evaluate;
pub mod validate;

#[derive(Parser)]
#[command(name = "quartet-solver")]
#[command(version)]
#[command(about = "Score quartet tree topologies on breakpoint graphs")]
#[command(
    long_about = "quartet-solver builds a breakpoint graph from genome block orders and scores the three unrooted quartet topologies with a family of rearrangement metrics.\n\nFor every metric it reports whether the correct topology is the unique best one, and aggregates those verdicts into success rates over simulated experiments."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// JSON run configuration (topologies, correct topology, metrics, threads)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score candidate topologies on one block file
    Evaluate(evaluate::EvaluateArgs),

    /// Compare metric success rates over an experiment directory
    Compare(compare::CompareArgs),

    /// Check simulated datasets against their expected distances
    Validate(validate::ValidateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Flags shared by the scoring commands; each one overrides the config file
#[derive(clap::Args, Debug, Default)]
pub struct PlanArgs {
    /// Candidate topology, repeatable (e.g. `-t AB|CD -t AC|BD`)
    #[arg(short, long = "topology")]
    pub topologies: Vec<String>,

    /// Topology the data was simulated from
    #[arg(long)]
    pub correct: Option<String>,

    /// Metric to run, repeatable; all of them by default
    #[arg(short, long = "metric", value_enum)]
    pub metrics: Vec<Metric>,
}

impl PlanArgs {
    fn apply(&self, config: &mut RunConfig) {
        if !self.topologies.is_empty() {
            config.topologies.clone_from(&self.topologies);
        }
        if let Some(correct) = &self.correct {
            config.correct_topology.clone_from(correct);
        }
        if !self.metrics.is_empty() {
            config.metrics = Some(self.metrics.clone());
        }
    }
}

/// Load the config file if given, apply command-line overrides and resolve
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the result does not resolve.
pub fn build_plan(
    config_path: Option<&Path>,
    overrides: &PlanArgs,
    threads: Option<usize>,
) -> anyhow::Result<EvaluationPlan> {
    let mut config = load_config(config_path)?;

    overrides.apply(&mut config);
    if threads.is_some() {
        config.threads = threads;
    }

    Ok(config.resolve()?)
}

/// The `--config` file, or the defaults when none was given
pub fn load_config(config_path: Option<&Path>) -> anyhow::Result<RunConfig> {
    match config_path {
        Some(path) => RunConfig::load_from_file(path)
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display())),
        None => Ok(RunConfig::default()),
    }
}

/// Error unless `path` is an existing directory
pub(crate) fn require_directory(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("Path {} doesn't exist", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("Path {} is not a directory", path.display());
    }
    Ok(())
}
