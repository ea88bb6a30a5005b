//! Topology-scoring metrics over breakpoint graphs.
//!
//! Every metric maps a `(graph, topology)` pair to a [`Score`]; **lower is
//! better**, so the best topology is the one with the minimum score.
//!
//! | Metric | Module | Idea |
//! |--------|--------|------|
//! | Distribution | [`splits`] | edges whose color split fits the tree |
//! | Simple paths | [`splits`] | the same, on degree-2 edges only |
//! | Cylinder / Bag / Diamond | [`patterns`] | local 4-vertex motifs |
//! | S_BP / S_DCJ | [`distance`] | additive pairwise distances |
//! | S_CA / S_MCA | [`alternating`] | alternating paths and cycles |
//!
//! [`engine::EvaluationEngine`] runs a metric set over the candidate
//! topologies and turns the score matrix into per-metric verdicts.
//!
//! ## Example
//!
//! ```rust
//! use quartet_solver::core::graph::{BreakpointGraph, VertexId};
//! use quartet_solver::core::types::{Multicolor, Topology};
//! use quartet_solver::metrics::engine::evaluate;
//!
//! let mut graph = BreakpointGraph::with_vertices(4);
//! graph.add_edge(VertexId(0), VertexId(1), Multicolor::from_labels(["A", "B"]));
//! graph.add_edge(VertexId(2), VertexId(3), Multicolor::from_labels(["A", "B"]));
//! graph.add_edge(VertexId(1), VertexId(2), Multicolor::from_labels(["C"]));
//! graph.add_edge(VertexId(0), VertexId(3), Multicolor::from_labels(["D"]));
//!
//! let topologies = Topology::quartet_topologies();
//! let verdicts = evaluate(&graph, &topologies, &topologies[0]).unwrap();
//! assert_eq!(verdicts.len(), 10);
//! ```

pub mod alternating;
pub mod distance;
pub mod engine;
pub mod patterns;
pub mod splits;
pub mod walker;

use thiserror::Error;

use crate::core::color::ColorError;

pub use engine::{EvaluationEngine, Metric, MetricScores, ScoreMatrix};

/// A topology score; lower is better
pub type Score = f64;

/// Scores are negated counts so that every metric is minimized
pub const NEGATIVE: Score = -1.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("No candidate topologies to score")]
    NoTopologies,
}
