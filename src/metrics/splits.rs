//! Split-distribution metrics.
//!
//! Every edge color induces a bipartition of the genomes. A topology is
//! rewarded for each observed split it does not cross.

use std::collections::BTreeMap;

use crate::core::color::{is_simple_edge, normalize, CanonicalSplit, ColorError};
use crate::core::graph::{Edge, GraphView};
use crate::core::types::{GenomeUniverse, Topology};
use crate::metrics::{Score, NEGATIVE};
use crate::utils::count_to_f64;

/// A canonical split together with the number of edges that induced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub split: CanonicalSplit,
    pub weight: usize,
}

/// Histogram the canonical splits of `edges`, ordered by split
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if an edge names a genome outside `universe`.
pub fn branches<'e>(
    edges: impl Iterator<Item = &'e Edge>,
    universe: &GenomeUniverse,
) -> Result<Vec<Branch>, ColorError> {
    let mut counts: BTreeMap<CanonicalSplit, usize> = BTreeMap::new();
    for edge in edges {
        *counts.entry(normalize(&edge.color, universe)?).or_default() += 1;
    }
    Ok(counts
        .into_iter()
        .map(|(split, weight)| Branch { split, weight })
        .collect())
}

/// Total weight of the branches compatible with `topology`
#[must_use]
pub fn compatible_weight(branches: &[Branch], topology: &Topology) -> usize {
    branches
        .iter()
        .filter(|b| b.split.is_compatible_with(topology))
        .map(|b| b.weight)
        .sum()
}

fn score_branches(branches: &[Branch], topology: &Topology) -> Score {
    NEGATIVE * count_to_f64(compatible_weight(branches, topology))
}

/// Distribution metric: minus the number of edges whose split fits the topology
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` for an edge colored outside the topology's genomes.
pub fn distribution_metric<G: GraphView>(graph: &G, topology: &Topology) -> Result<Score, ColorError> {
    let universe = GenomeUniverse::of_topology(topology);
    let branches = branches(graph.edges(), &universe)?;
    Ok(score_branches(&branches, topology))
}

/// Simple-paths metric: the distribution metric over edges whose endpoints
/// both have degree two
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` for an edge colored outside the topology's genomes.
pub fn simple_paths_metric<G: GraphView>(graph: &G, topology: &Topology) -> Result<Score, ColorError> {
    let universe = GenomeUniverse::of_topology(topology);
    let simple = graph.edges().filter(|e| is_simple_edge(graph, e));
    let branches = branches(simple, &universe)?;
    Ok(score_branches(&branches, topology))
}
