//! Evaluate command - score the candidate topologies on one block file.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::batch::{evaluate_file, FileOutcome};
use crate::cli::{build_plan, OutputFormat, PlanArgs};
use crate::config::EvaluationPlan;
use crate::metrics::MetricScores;

#[derive(Args)]
pub struct EvaluateArgs {
    /// GRIMM block file (plain or gzipped)
    #[arg(required = true)]
    pub file: PathBuf,

    #[command(flatten)]
    pub plan: PlanArgs,
}

/// Execute the evaluate command
///
/// # Errors
///
/// Returns an error if the configuration does not resolve, or the file
/// cannot be parsed or scored.
#[allow(clippy::needless_pass_by_value)]
pub fn run(
    args: EvaluateArgs,
    format: OutputFormat,
    verbose: bool,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let plan = build_plan(config, &args.plan, None)?;

    if verbose {
        eprintln!(
            "Scoring {} topologies with {} metrics (correct: {})",
            plan.topologies.len(),
            plan.metrics().len(),
            plan.correct
        );
    }

    let outcome = evaluate_file(&args.file, &plan)?;

    match format {
        OutputFormat::Text => print_text_outcome(&outcome, &plan),
        OutputFormat::Json => print_json_outcome(&outcome, &plan)?,
        OutputFormat::Tsv => print_tsv_outcome(&outcome),
    }

    Ok(())
}

fn best_label(outcome: &FileOutcome, row: &MetricScores) -> String {
    outcome
        .matrix
        .best_topologies(row)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn print_text_outcome(outcome: &FileOutcome, plan: &EvaluationPlan) {
    let matrix = &outcome.matrix;
    let name_width = matrix
        .rows
        .iter()
        .map(|row| row.metric.name().len())
        .max()
        .unwrap_or(0)
        .max("Metric".len());
    let column_width = matrix
        .topologies
        .iter()
        .map(|t| t.to_string().len())
        .max()
        .unwrap_or(0)
        .max(8);

    println!("Evaluation Results");
    println!("{}", "=".repeat(60));
    println!("\nFile: {}", outcome.path.display());
    println!("Correct topology: {}\n", plan.correct);

    let header: Vec<String> = matrix
        .topologies
        .iter()
        .map(|t| format!("{:>column_width$}", t.to_string()))
        .collect();
    println!(
        "{:<name_width$}  {}  {:<column_width$}  Correct",
        "Metric",
        header.join("  "),
        "Best"
    );

    for (row, verdict) in matrix.rows.iter().zip(&outcome.verdicts) {
        let scores: Vec<String> = row
            .scores
            .iter()
            .map(|s| format!("{s:>column_width$.2}"))
            .collect();
        println!(
            "{:<name_width$}  {}  {:<column_width$}  {}",
            row.metric.name(),
            scores.join("  "),
            best_label(outcome, row),
            if *verdict { "yes" } else { "no" }
        );
    }

    let hits = outcome.verdicts.iter().filter(|v| **v).count();
    println!(
        "\n{hits}/{} metrics single out the correct topology",
        outcome.verdicts.len()
    );
}

fn print_json_outcome(outcome: &FileOutcome, plan: &EvaluationPlan) -> anyhow::Result<()> {
    let rows: Vec<serde_json::Value> = outcome
        .matrix
        .rows
        .iter()
        .zip(&outcome.verdicts)
        .map(|(row, verdict)| {
            serde_json::json!({
                "metric": row.metric.name(),
                "scores": row.scores,
                "best": outcome.matrix.best_topologies(row),
                "correct": verdict,
            })
        })
        .collect();

    let output = serde_json::json!({
        "file": outcome.path.display().to_string(),
        "correct_topology": plan.correct,
        "topologies": outcome.matrix.topologies,
        "metrics": rows,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_outcome(outcome: &FileOutcome) {
    let topologies: Vec<String> = outcome
        .matrix
        .topologies
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("metric\t{}\tbest\tcorrect", topologies.join("\t"));

    for (row, verdict) in outcome.matrix.rows.iter().zip(&outcome.verdicts) {
        let scores: Vec<String> = row.scores.iter().map(ToString::to_string).collect();
        println!(
            "{}\t{}\t{}\t{}",
            row.metric.name(),
            scores.join("\t"),
            best_label(outcome, row),
            verdict
        );
    }
}
