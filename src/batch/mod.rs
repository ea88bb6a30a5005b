//! Batch evaluation over directories of GRIMM block files.
//!
//! The expected layout is one directory per simulated dataset, each holding
//! any number of block files (nested directories are walked):
//!
//! ```text
//! experiment/
//!   1_10_20/
//!     blocks_0.txt
//!     blocks_1.txt
//!   2_10_40/
//!     ...
//! ```
//!
//! A dataset directory name is split on `_` into the report's leading
//! columns (run, e1, e2). Files within a directory are scored in parallel
//! with rayon and their verdicts averaged into per-metric success rates.

pub mod validate;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EvaluationPlan;
use crate::metrics::{Metric, MetricError, ScoreMatrix};
use crate::parsing::grimm::{parse_grimm_file, ParseError};
use crate::utils::count_to_f64;

pub use validate::{validate_datasets, ValidationIssue, ValidationReport};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to score {}: {source}", path.display())]
    Metric {
        path: PathBuf,
        #[source]
        source: MetricError,
    },

    #[error("No block files found under {}", .0.display())]
    EmptyBatch(PathBuf),

    #[error("Failed to configure thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Scores and verdicts for one block file
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub matrix: ScoreMatrix,
    pub verdicts: Vec<bool>,
}

/// Per-metric success rates over every file of a directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderSummary {
    pub folder: PathBuf,
    pub files: usize,
    pub metrics: Vec<Metric>,
    pub success_rates: Vec<f64>,
}

/// One dataset directory of an experiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentRow {
    pub name: String,
    /// The directory name split on `_`
    pub fields: Vec<String>,
    pub summary: FolderSummary,
}

/// Size the global rayon pool. Must run before any parallel work.
///
/// # Errors
///
/// Returns `BatchError::ThreadPool` if the global pool was already built.
pub fn init_thread_pool(threads: Option<usize>) -> Result<(), BatchError> {
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()?;
        debug!(threads = n, "Configured thread pool");
    } else {
        debug!(threads = rayon::current_num_threads(), "Using default thread pool");
    }
    Ok(())
}

/// Parse one block file and score it
///
/// Genomes outside the plan's universe (such as ancestral genomes written
/// next to the leaves) are removed from the graph before scoring.
///
/// # Errors
///
/// Returns `BatchError::Parse` or `BatchError::Metric`, carrying the file path.
pub fn evaluate_file(path: &Path, plan: &EvaluationPlan) -> Result<FileOutcome, BatchError> {
    debug!(file = %path.display(), "Evaluating block file");

    let parsed = parse_grimm_file(path).map_err(|source| BatchError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let ignored: Vec<String> = parsed
        .genomes()
        .into_iter()
        .filter(|g| !plan.universe.contains(g))
        .map(|g| g.to_string())
        .collect();
    if !ignored.is_empty() {
        debug!(file = %path.display(), genomes = ?ignored, "Ignoring genomes outside the quartet");
    }
    let graph = parsed.restricted_to(&plan.universe);

    let matrix = plan
        .engine
        .score_matrix(&graph, &plan.topologies)
        .map_err(|source| BatchError::Metric {
            path: path.to_path_buf(),
            source,
        })?;

    let verdicts = matrix.decisions(&plan.correct);
    Ok(FileOutcome {
        path: path.to_path_buf(),
        matrix,
        verdicts,
    })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let io_error = |source| BatchError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;
    entries.retain(|p| !is_hidden(p));
    entries.sort();
    Ok(entries)
}

/// Every non-hidden file below `dir`, recursively, in sorted order
///
/// Symbolic links to directories are not followed.
///
/// # Errors
///
/// Returns `BatchError::Io` if a directory cannot be listed.
pub fn collect_block_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for path in read_dir_sorted(&current)? {
            let is_link = path
                .symlink_metadata()
                .is_ok_and(|m| m.file_type().is_symlink());
            if path.is_dir() {
                if is_link {
                    warn!(path = %path.display(), "Skipping symlinked directory");
                } else {
                    pending.push(path);
                }
            } else if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Immediate, non-hidden subdirectories of `root`, sorted by name
///
/// # Errors
///
/// Returns `BatchError::Io` if `root` cannot be listed.
pub fn dataset_directories(root: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut dirs = read_dir_sorted(root)?;
    dirs.retain(|p| p.is_dir());
    Ok(dirs)
}

/// Mean of each verdict column
fn success_rates(verdicts: &[Vec<bool>], metric_count: usize) -> Vec<f64> {
    let files = count_to_f64(verdicts.len());
    (0..metric_count)
        .map(|i| {
            let hits = verdicts
                .iter()
                .filter(|row| row.get(i).copied().unwrap_or(false))
                .count();
            count_to_f64(hits) / files
        })
        .collect()
}

/// Score every block file under `dir` in parallel and average the verdicts
///
/// # Errors
///
/// Returns `BatchError::EmptyBatch` if there are no files, or the first
/// file error encountered.
pub fn evaluate_folder(dir: &Path, plan: &EvaluationPlan) -> Result<FolderSummary, BatchError> {
    let files = collect_block_files(dir)?;
    if files.is_empty() {
        return Err(BatchError::EmptyBatch(dir.to_path_buf()));
    }

    let verdicts = files
        .par_iter()
        .map(|path| evaluate_file(path, plan).map(|outcome| outcome.verdicts))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FolderSummary {
        folder: dir.to_path_buf(),
        files: files.len(),
        metrics: plan.metrics().to_vec(),
        success_rates: success_rates(&verdicts, plan.metrics().len()),
    })
}

/// Evaluate every dataset directory directly under `root`
///
/// # Errors
///
/// Returns `BatchError::Io` if `root` cannot be listed, or the first folder error.
pub fn run_experiment(root: &Path, plan: &EvaluationPlan) -> Result<Vec<ExperimentRow>, BatchError> {
    let mut rows = Vec::new();

    for dir in dataset_directories(root)? {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let summary = evaluate_folder(&dir, plan)?;
        info!(directory = %name, files = summary.files, "Finished directory");

        rows.push(ExperimentRow {
            fields: name.split('_').map(str::to_string).collect(),
            name,
            summary,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// `A = B`, `C = D`, the pairs one reversal apart: every informative
    /// metric prefers `AB|CD`
    const AB_CD_BLOCKS: &str = "\
>A
1 2 3 4 @
>B
1 2 3 4 @
>C
1 -2 3 4 @
>D
1 -2 3 4 @
";

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_collect_block_files_recursive_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("b.txt"), AB_CD_BLOCKS);
        write(&dir.path().join("a/z.txt"), AB_CD_BLOCKS);
        write(&dir.path().join(".hidden"), "junk");

        let files = collect_block_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("a/z.txt"), PathBuf::from("b.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_block_files_skips_directory_links() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("blocks.txt"), AB_CD_BLOCKS);
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let files = collect_block_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("blocks.txt")]);
    }

    #[test]
    fn test_evaluate_file_ignores_ancestral_genomes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.txt");
        write(
            &path,
            ">A\n1 2 @\n>B\n1 2 @\n>Left\n1 2 @\n>C\n1 -2 @\n>D\n1 -2 @\n>Right\n1 -2 @\n",
        );

        let plan = EvaluationPlan::default();
        let outcome = evaluate_file(&path, &plan).unwrap();
        let bp = Metric::ALL.iter().position(|m| *m == Metric::Bp).unwrap();
        let row = &outcome.matrix.rows[bp];
        assert_eq!(row.best_indices(), vec![0]);
        assert!(outcome.verdicts[bp]);
    }

    #[test]
    fn test_evaluate_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.txt");
        write(&path, AB_CD_BLOCKS);

        let outcome = evaluate_file(&path, &EvaluationPlan::default()).unwrap();
        assert_eq!(outcome.verdicts.len(), Metric::ALL.len());
        let bp = Metric::ALL.iter().position(|m| *m == Metric::Bp).unwrap();
        let dcj = Metric::ALL.iter().position(|m| *m == Metric::Dcj).unwrap();
        assert!(outcome.verdicts[bp]);
        assert!(outcome.verdicts[dcj]);
    }

    #[test]
    fn test_evaluate_folder_averages() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("one.txt"), AB_CD_BLOCKS);
        write(&dir.path().join("two.txt"), AB_CD_BLOCKS);

        let summary = evaluate_folder(dir.path(), &EvaluationPlan::default()).unwrap();
        assert_eq!(summary.files, 2);
        assert_eq!(summary.success_rates.len(), Metric::ALL.len());
        assert!(summary
            .success_rates
            .iter()
            .all(|r| (0.0..=1.0).contains(r)));
        let bp = Metric::ALL.iter().position(|m| *m == Metric::Bp).unwrap();
        assert!((summary.success_rates[bp] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            evaluate_folder(dir.path(), &EvaluationPlan::default()),
            Err(BatchError::EmptyBatch(_))
        ));
    }

    #[test]
    fn test_parse_failure_names_file() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("bad.txt"), "1 2 $\n");
        let err = evaluate_folder(dir.path(), &EvaluationPlan::default()).unwrap_err();
        assert!(matches!(err, BatchError::Parse { .. }));
        assert!(err.to_string().contains("bad.txt"));
    }

    #[test]
    fn test_run_experiment_rows() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("2_5_10/blocks.txt"), AB_CD_BLOCKS);
        write(&root.path().join("1_5_10/blocks.txt"), AB_CD_BLOCKS);
        write(&root.path().join("stray.txt"), "not a dataset");

        let rows = run_experiment(root.path(), &EvaluationPlan::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "1_5_10");
        assert_eq!(rows[0].fields, vec!["1", "5", "10"]);
        assert_eq!(rows[1].summary.files, 1);
    }

    #[test]
    fn test_success_rates() {
        let verdicts = vec![vec![true, false], vec![true, true]];
        assert_eq!(success_rates(&verdicts, 2), vec![1.0, 0.5]);
    }
}
