//! Sanity checks for simulated datasets.
//!
//! A dataset directory named `<run>_<e1>_<e2>` was simulated so that every
//! leaf is `e2` DCJ operations away from its ancestor (`A`, `B` from `Left`;
//! `C`, `D` from `Right`) and the two ancestors are `e1` apart.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::batch::{collect_block_files, dataset_directories, BatchError};
use crate::core::types::Genome;
use crate::metrics::distance::dcj_distance;
use crate::parsing::grimm::parse_grimm_file;

/// Leaf/ancestor pairs expected to be `e2` apart
pub const LEAF_PAIRS: [(&str, &str); 4] = [("A", "Left"), ("B", "Left"), ("C", "Right"), ("D", "Right")];

/// Ancestor pair expected to be `e1` apart
pub const ANCESTOR_PAIR: (&str, &str) = ("Left", "Right");

const DISTANCE_TOLERANCE: f64 = 1e-9;

/// Expected distances decoded from a dataset directory name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetParams {
    pub e1: u64,
    pub e2: u64,
}

impl DatasetParams {
    /// Decode `<run>_<e1>_<e2>`
    #[must_use]
    pub fn from_dir_name(name: &str) -> Option<Self> {
        let mut parts = name.split('_');
        let (_run, e1, e2) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            e1: e1.parse().ok()?,
            e2: e2.parse().ok()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Leaf to ancestor
    Leaf,
    /// Ancestor to ancestor
    Ancestor,
}

/// A DCJ distance that differs from what the dataset name promises
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub file: PathBuf,
    pub kind: IssueKind,
    pub genomes: (String, String),
    pub expected: u64,
    pub actual: f64,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            IssueKind::Leaf => "Leaf - inner node",
            IssueKind::Ancestor => "Inner node",
        };
        write!(
            f,
            "{what} distance {}-{} differs in file {}, expected={}, real={}",
            self.genomes.0,
            self.genomes.1,
            self.file.display(),
            self.expected,
            self.actual
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub files_checked: usize,
    pub skipped_directories: Vec<PathBuf>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

fn check_pair(
    file: &Path,
    graph: &crate::core::graph::BreakpointGraph,
    (a, b): (&str, &str),
    kind: IssueKind,
    expected: u64,
) -> Option<ValidationIssue> {
    let actual = dcj_distance(graph, &Genome::new(a), &Genome::new(b));
    #[allow(clippy::cast_precision_loss)]
    let matches = (actual - expected as f64).abs() < DISTANCE_TOLERANCE;
    if matches {
        return None;
    }
    Some(ValidationIssue {
        file: file.to_path_buf(),
        kind,
        genomes: (a.to_string(), b.to_string()),
        expected,
        actual,
    })
}

/// Check one block file against its dataset's expected distances
///
/// # Errors
///
/// Returns `BatchError::Parse` if the file is not valid GRIMM.
pub fn validate_file(path: &Path, params: DatasetParams) -> Result<Vec<ValidationIssue>, BatchError> {
    let graph = parse_grimm_file(path).map_err(|source| BatchError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let leaf_issues = LEAF_PAIRS
        .iter()
        .filter_map(|&pair| check_pair(path, &graph, pair, IssueKind::Leaf, params.e2));
    let ancestor_issue = check_pair(path, &graph, ANCESTOR_PAIR, IssueKind::Ancestor, params.e1);

    Ok(leaf_issues.chain(ancestor_issue).collect())
}

/// Validate every dataset directory directly under `root`.
///
/// Directories whose names do not decode as `<run>_<e1>_<e2>` are skipped
/// with a warning. Distance mismatches are collected, not fatal.
///
/// # Errors
///
/// Returns `BatchError::Io` if a directory cannot be listed, or
/// `BatchError::Parse` for a malformed block file.
pub fn validate_datasets(root: &Path) -> Result<ValidationReport, BatchError> {
    let mut report = ValidationReport::default();

    for dir in dataset_directories(root)? {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(params) = DatasetParams::from_dir_name(&name) else {
            warn!(directory = %name, "Skipping directory not named <run>_<e1>_<e2>");
            report.skipped_directories.push(dir);
            continue;
        };

        let files = collect_block_files(&dir)?;
        let issues = files
            .par_iter()
            .map(|file| validate_file(file, params))
            .collect::<Result<Vec<_>, _>>()?;

        report.files_checked += files.len();
        report.issues.extend(issues.into_iter().flatten());
        info!(directory = %name, files = files.len(), "Finished directory");
    }

    Ok(report)
}
