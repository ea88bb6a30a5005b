//! # quartet-solver
//!
//! A library for choosing between the three unrooted quartet topologies of
//! four genomes from their gene-order rearrangements.
//!
//! The genomes are read into a **breakpoint graph**: one vertex per block
//! extremity, one edge per adjacency, each edge colored by the set of genomes
//! that share it. A family of metrics then scores every candidate topology on
//! that graph, lower being better. For each metric the verdict is whether the
//! correct topology is the unique minimum.
//!
//! ## Features
//!
//! - **Split metrics**: count edges whose color fits the tree
//! - **Local patterns**: cylinder, bag and diamond motifs vote for a topology
//! - **Additive distances**: breakpoint and DCJ distances summed along the tree
//! - **Alternating structures**: CA and MCA from alternating paths and cycles
//! - **Batch runs**: per-metric success rates over simulated experiments, in parallel
//!
//! ## Example
//!
//! ```rust
//! use quartet_solver::parsing::grimm::parse_grimm_text;
//! use quartet_solver::{EvaluationEngine, Metric, Topology};
//!
//! let graph = parse_grimm_text(">A\n1 2 3 @\n>B\n1 2 3 @\n>C\n1 -2 3 @\n>D\n1 -2 3 @\n").unwrap();
//! let topologies = Topology::quartet_topologies();
//!
//! let engine = EvaluationEngine::with_metrics(vec![Metric::Bp, Metric::Dcj]);
//! let verdicts = engine.evaluate(&graph, &topologies, &topologies[0]).unwrap();
//! assert_eq!(verdicts, vec![true, true]);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: genomes, topologies, the breakpoint graph and color splits
//! - [`metrics`]: every scoring metric and the evaluation engine
//! - [`parsing`]: the GRIMM reader
//! - [`config`]: JSON run configuration
//! - [`batch`]: directory-level evaluation and dataset validation
//! - [`cli`]: Command-line interface implementation

pub mod batch;
pub mod cli;
pub mod config;
pub mod core;
pub mod metrics;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{EvaluationPlan, RunConfig};
pub use core::graph::{BreakpointGraph, GraphView, VertexId};
pub use core::types::*;
pub use metrics::{EvaluationEngine, Metric, MetricScores, ScoreMatrix};
