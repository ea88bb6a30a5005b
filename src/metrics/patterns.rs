//! Local 4-vertex motif detectors.
//!
//! Each detector anchors at every vertex and looks for one shape:
//!
//! - **Cylinder**: a 2-genome edge on top, an edge of the same color on the
//!   bottom, and two single-genome sides of different colors.
//! - **Bag**: a 2-genome edge on top, a single-genome bottom edge whose genome
//!   is one of the top colors, and two single-genome sides of different colors.
//! - **Diamond**: a 4-cycle of single-genome edges with pairwise distinct colors.
//!
//! A motif votes for a pair of genomes it suggests are sisters. Motifs are
//! keyed by their vertex set, so the same four vertices found from different
//! anchors are counted once (the last vote found wins).

use std::collections::{BTreeMap, BTreeSet};

use crate::core::color::{neighbors, EdgeFilter};
use crate::core::graph::{GraphView, VertexId};
use crate::core::types::{Multicolor, Topology};
use crate::metrics::{Score, NEGATIVE};
use crate::utils::count_to_f64;

/// Four distinct vertices, stored sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Motif([VertexId; 4]);

impl Motif {
    /// Returns `None` unless all four vertices are distinct
    #[must_use]
    pub fn new(mut vertices: [VertexId; 4]) -> Option<Self> {
        vertices.sort_unstable();
        if vertices.windows(2).any(|w| w[0] == w[1]) {
            return None;
        }
        Some(Self(vertices))
    }
}

/// Detected motifs and the genome pair each one votes for
pub type PatternVotes = BTreeMap<Motif, Multicolor>;

fn neighbor_set<G: GraphView>(graph: &G, vertex: VertexId, filter: EdgeFilter<'_>) -> BTreeSet<VertexId> {
    neighbors(graph, vertex, filter).map(|(v, _)| v).collect()
}

pub fn find_cylinder_patterns<G: GraphView>(graph: &G) -> PatternVotes {
    let mut votes = PatternVotes::new();

    for start in graph.vertices() {
        for (double_vertex, double_edge) in neighbors(graph, start, EdgeFilter::Size(2)) {
            for (single_vertex, single_edge) in neighbors(graph, start, EdgeFilter::Size(1)) {
                let across_single =
                    neighbor_set(graph, single_vertex, EdgeFilter::Color(&double_edge.color));
                if across_single.is_empty() {
                    continue;
                }

                let across_double = neighbor_set(graph, double_vertex, EdgeFilter::Size(1));
                if across_double.is_empty() {
                    continue;
                }

                for &final_vertex in across_single.intersection(&across_double) {
                    let Some(closing) = graph.edge_between(final_vertex, double_vertex) else {
                        continue;
                    };
                    if closing.color == single_edge.color {
                        continue;
                    }
                    let Some(motif) = Motif::new([start, single_vertex, double_vertex, final_vertex])
                    else {
                        continue;
                    };
                    votes.insert(motif, double_edge.color.clone());
                }
            }
        }
    }

    votes
}

pub fn find_bag_patterns<G: GraphView>(graph: &G) -> PatternVotes {
    let mut votes = PatternVotes::new();

    for start in graph.vertices() {
        for (double_vertex, double_edge) in neighbors(graph, start, EdgeFilter::Size(2)) {
            for (single_vertex, single_edge) in neighbors(graph, start, EdgeFilter::Size(1)) {
                let bottoms = neighbors(graph, single_vertex, EdgeFilter::SingleFrom(&double_edge.color));

                for (final_vertex, _) in bottoms {
                    let reaches_double = neighbors(graph, final_vertex, EdgeFilter::Size(1))
                        .any(|(v, _)| v == double_vertex);
                    if !reaches_double {
                        continue;
                    }
                    let Some(closing) = graph.edge_between(double_vertex, final_vertex) else {
                        continue;
                    };
                    if closing.color == single_edge.color {
                        continue;
                    }
                    let Some(motif) = Motif::new([start, single_vertex, double_vertex, final_vertex])
                    else {
                        continue;
                    };
                    votes.insert(motif, double_edge.color.clone());
                }
            }
        }
    }

    votes
}

pub fn find_diamond_patterns<G: GraphView>(graph: &G) -> PatternVotes {
    let mut votes = PatternVotes::new();

    for start in graph.vertices() {
        for (first_vertex, first_edge) in neighbors(graph, start, EdgeFilter::Size(1)) {
            let seconds = neighbors(graph, start, EdgeFilter::Size(1))
                .filter(|(_, e)| e.color != first_edge.color);

            for (second_vertex, second_edge) in seconds {
                let thirds = neighbors(graph, second_vertex, EdgeFilter::Size(1))
                    .filter(|(_, e)| e.color != first_edge.color && e.color != second_edge.color);

                for (third_vertex, third_edge) in thirds {
                    let Some(last_edge) = graph.edge_between(third_vertex, first_vertex) else {
                        continue;
                    };
                    let last = &last_edge.color;
                    if last.len() != 1
                        || *last == first_edge.color
                        || *last == second_edge.color
                        || *last == third_edge.color
                    {
                        continue;
                    }
                    let Some(motif) = Motif::new([start, first_vertex, second_vertex, third_vertex])
                    else {
                        continue;
                    };
                    votes.insert(motif, first_edge.color.union(&second_edge.color));
                }
            }
        }
    }

    votes
}

/// Minus the number of votes whose genome pair sits on one side of `topology`
#[must_use]
pub fn pattern_metric(votes: &PatternVotes, topology: &Topology) -> Score {
    let together = votes
        .values()
        .filter(|pair| topology.keeps_together(pair))
        .count();
    NEGATIVE * count_to_f64(together)
}
