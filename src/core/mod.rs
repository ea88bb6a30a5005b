//! Core data types for breakpoint-graph topology scoring.
//!
//! - [`types`]: genomes, multicolors and unrooted quartet topologies
//! - [`graph`]: the breakpoint multigraph and its read-only [`graph::GraphView`]
//! - [`color`]: canonical color splits and the edge filters metrics walk with
//!
//! ## Topology descriptors
//!
//! | Descriptor | Meaning |
//! |------------|---------|
//! | `AB\|CD` | Single-character genomes, one split |
//! | `Left,Right\|C,D` | Comma-separated multi-character genome names |
//!
//! Descriptors compare **order-insensitively**: `CD|BA` and `AB|CD` name the
//! same quartet.

pub mod color;
pub mod graph;
pub mod types;
