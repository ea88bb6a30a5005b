//! Color algebra over breakpoint-graph edges.
//!
//! An edge color (multicolor) names the genomes sharing an adjacency. Read as
//! a bipartition of the genome universe it becomes a [`CanonicalSplit`], the
//! key used by the split-based metrics.

use thiserror::Error;

use crate::core::graph::{Edge, GraphView, VertexId};
use crate::core::types::{GenomeUniverse, Multicolor, Topology};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid multicolor {color}: not a subset of genome universe {universe}")]
    InvalidColor {
        color: Multicolor,
        universe: GenomeUniverse,
    },
}

/// Order-independent bipartition of the genome universe induced by a color.
///
/// The smaller side comes first; equal-sized sides are ordered
/// lexicographically, so complementary colors share one split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalSplit {
    pub first: Multicolor,
    pub second: Multicolor,
}

impl CanonicalSplit {
    /// A split is compatible with a topology when its smaller side fits inside
    /// one of the topology's halves, i.e. the split does not cross the tree.
    #[must_use]
    pub fn is_compatible_with(&self, topology: &Topology) -> bool {
        topology.sides().iter().any(|side| self.first.is_subset(side))
    }
}

impl std::fmt::Display for CanonicalSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.first, self.second)
    }
}

/// Canonicalize a multicolor against the genome universe.
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if the color names a genome outside `universe`.
pub fn normalize(color: &Multicolor, universe: &GenomeUniverse) -> Result<CanonicalSplit, ColorError> {
    if !color.is_subset(universe.genomes()) {
        return Err(ColorError::InvalidColor {
            color: color.clone(),
            universe: universe.clone(),
        });
    }

    let first = color.clone();
    let second = universe.genomes().difference(color);

    let first_goes_first = match first.len().cmp(&second.len()) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal => first <= second,
    };

    Ok(if first_goes_first {
        CanonicalSplit { first, second }
    } else {
        CanonicalSplit {
            first: second,
            second: first,
        }
    })
}

/// Which incident edges a neighbor lookup follows
#[derive(Debug, Clone, Copy)]
pub enum EdgeFilter<'a> {
    /// Color equal to the given multicolor
    Color(&'a Multicolor),
    /// Color with exactly this many genomes
    Size(usize),
    /// Color equal to either multicolor
    EitherColor(&'a Multicolor, &'a Multicolor),
    /// Single-genome color whose genome belongs to the given multicolor
    SingleFrom(&'a Multicolor),
}

impl EdgeFilter<'_> {
    #[must_use]
    pub fn accepts(&self, edge: &Edge) -> bool {
        match self {
            Self::Color(color) => edge.color == **color,
            Self::Size(size) => edge.color.len() == *size,
            Self::EitherColor(a, b) => edge.color == **a || edge.color == **b,
            Self::SingleFrom(colors) => edge.color.len() == 1 && edge.color.is_subset(colors),
        }
    }
}

/// Neighbors of `vertex` across the edges accepted by `filter`.
///
/// Yields one `(neighbor, edge)` per incident edge, so parallel edges produce
/// repeated neighbors and a self-loop yields `vertex` itself.
pub fn neighbors<'g, G: GraphView>(
    graph: &'g G,
    vertex: VertexId,
    filter: EdgeFilter<'g>,
) -> impl Iterator<Item = (VertexId, &'g Edge)> + 'g {
    graph
        .edges_by_vertex(vertex)
        .filter(move |edge| filter.accepts(edge))
        .map(move |edge| (edge.other(vertex), edge))
}

/// Number of edges touching `vertex`, parallel edges counted separately
pub fn degree<G: GraphView>(graph: &G, vertex: VertexId) -> usize {
    graph.edges_by_vertex(vertex).count()
}

/// A vertex is simple when exactly two edges touch it
pub fn is_simple_vertex<G: GraphView>(graph: &G, vertex: VertexId) -> bool {
    degree(graph, vertex) == 2
}

/// An edge is simple when both of its endpoints are simple
pub fn is_simple_edge<G: GraphView>(graph: &G, edge: &Edge) -> bool {
    is_simple_vertex(graph, edge.vertex1) && is_simple_vertex(graph, edge.vertex2)
}
