//! Common-ancestor metrics over alternating structures.
//!
//! For a topology `AB|CD` the walk alternates between the colors `{A,B}` and
//! `{C,D}`. Long alternating paths mean the two sister pairs disagree on few
//! adjacencies of their common ancestor.

use crate::core::graph::GraphView;
use crate::core::types::Topology;
use crate::metrics::walker::{sweep, Alternation, Structure, WalkMode};
use crate::metrics::{Score, NEGATIVE};
use crate::utils::count_to_f64;

/// The two colors alternated for `topology`: its left pair, then its right pair
#[must_use]
pub fn alternation_for(topology: &Topology) -> Alternation {
    let [left, right] = topology.sides();
    Alternation::new(left, right)
}

/// CA and MCA for one (graph, topology), sharing the path sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlternatingScores {
    pub ca: Score,
    pub mca: Score,
}

impl AlternatingScores {
    pub fn compute<G: GraphView>(graph: &G, topology: &Topology) -> Self {
        let alternation = alternation_for(topology);
        let ca = ca_from_paths(&sweep(graph, &alternation, WalkMode::Paths));
        let mca = ca - cycle_excess(&sweep(graph, &alternation, WalkMode::Cycles));
        Self { ca, mca }
    }
}

fn ca_from_paths(structures: &[Structure]) -> Score {
    let halves: usize = structures
        .iter()
        .map(|s| s.length().div_ceil(2))
        .sum();
    NEGATIVE * count_to_f64(halves)
}

fn cycle_excess(structures: &[Structure]) -> Score {
    structures
        .iter()
        .filter_map(|s| match s {
            Structure::Cycle(len) if *len > 0 => Some(*len),
            _ => None,
        })
        .map(|len| count_to_f64(len) / 2.0 - 1.0)
        .sum()
}

/// S_CA: minus the sum of `ceil(len / 2)` over maximal alternating paths
pub fn ca_metric<G: GraphView>(graph: &G, topology: &Topology) -> Score {
    ca_from_paths(&sweep(graph, &alternation_for(topology), WalkMode::Paths))
}

/// S_MCA: S_CA minus `len / 2 - 1` for every alternating cycle
pub fn mca_metric<G: GraphView>(graph: &G, topology: &Topology) -> Score {
    AlternatingScores::compute(graph, topology).mca
}
