//! Additive pairwise rearrangement distances (S_BP and S_DCJ, after Wei Xu).
//!
//! A topology `AB|CD` is scored by `d(A,B) + d(C,D)`: the tree whose sister
//! pairs are closest to each other wins.

use std::collections::HashSet;

use crate::core::graph::{Edge, GraphView, VertexId};
use crate::core::types::{Genome, Topology};
use crate::metrics::Score;
use crate::utils::count_to_f64;

/// Number of gene blocks: half the number of extremity vertices
fn block_number<G: GraphView>(graph: &G) -> f64 {
    count_to_f64(graph.vertex_count()) / 2.0
}

/// Breakpoint distance `n - |adj(a) ∩ adj(b)|`.
///
/// Adjacencies are compared by their unordered endpoint pair, so parallel
/// edges between the same extremities count as one shared adjacency.
/// `n` is taken from the whole graph, so the `[0, n]` bound only holds when
/// both genomes carry every block of the graph.
pub fn bp_distance<G: GraphView>(graph: &G, a: &Genome, b: &Genome) -> f64 {
    let adjacencies = |genome: &Genome| -> HashSet<(VertexId, VertexId)> {
        graph
            .edges()
            .filter(|e| e.color.contains(genome))
            .map(Edge::endpoints)
            .collect()
    };

    let shared = adjacencies(a).intersection(&adjacencies(b)).count();
    block_number(graph) - count_to_f64(shared)
}

/// DCJ distance `n - c`, where `c` counts the connected components of the
/// subgraph made of edges carrying `a` or `b` (its alternating cycles).
///
/// Vertices neither genome touches are components of their own, so with
/// unequal gene content the result can drop below zero.
pub fn dcj_distance<G: GraphView>(graph: &G, a: &Genome, b: &Genome) -> f64 {
    let carries_pair = |edge: &Edge| edge.color.contains(a) || edge.color.contains(b);

    let mut visited: HashSet<VertexId> = HashSet::new();
    let mut components = 0usize;

    for start in graph.vertices() {
        if !visited.insert(start) {
            continue;
        }
        components += 1;

        let mut stack = vec![start];
        while let Some(vertex) = stack.pop() {
            for edge in graph.edges_by_vertex(vertex).filter(|e| carries_pair(e)) {
                let next = edge.other(vertex);
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
    }

    block_number(graph) - count_to_f64(components)
}

/// Sum a pairwise distance over both sister pairs of `topology`
pub fn additive_metric<G, F>(graph: &G, topology: &Topology, pairwise: F) -> f64
where
    G: GraphView,
    F: Fn(&G, &Genome, &Genome) -> f64,
{
    topology
        .pairs()
        .into_iter()
        .map(|(a, b)| pairwise(graph, a, b))
        .sum()
}

/// S_BP: additive breakpoint distance, truncated to an integer
pub fn bp_distance_metric<G: GraphView>(graph: &G, topology: &Topology) -> Score {
    additive_metric(graph, topology, bp_distance).trunc()
}

/// S_DCJ: additive DCJ distance, truncated to an integer
pub fn dcj_distance_metric<G: GraphView>(graph: &G, topology: &Topology) -> Score {
    additive_metric(graph, topology, dcj_distance).trunc()
}
