use std::collections::{BTreeSet, HashMap};

use crate::core::types::{Genome, GenomeUniverse, Multicolor};

/// Opaque handle to a gene-extremity vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of an edge within its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// An adjacency between two extremities, colored by the genomes sharing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub vertex1: VertexId,
    pub vertex2: VertexId,
    pub color: Multicolor,
}

impl Edge {
    /// The endpoint opposite `vertex`. A self-loop returns `vertex` itself.
    #[must_use]
    pub fn other(&self, vertex: VertexId) -> VertexId {
        if self.vertex1 == vertex {
            self.vertex2
        } else {
            self.vertex1
        }
    }

    /// Endpoints as an unordered pair (smaller id first)
    #[must_use]
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        if self.vertex1 <= self.vertex2 {
            (self.vertex1, self.vertex2)
        } else {
            (self.vertex2, self.vertex1)
        }
    }
}

/// Read-only query surface over a breakpoint graph.
///
/// Every metric in [`crate::metrics`] is written against this trait; the
/// graph store behind it is never mutated during scoring.
pub trait GraphView {
    /// All vertices, in a stable order
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_;

    fn vertex_count(&self) -> usize;

    /// All edges, in insertion order
    fn edges(&self) -> impl Iterator<Item = &Edge> + '_;

    /// Edges incident to `vertex`, once per edge (a self-loop appears once)
    fn edges_by_vertex(&self, vertex: VertexId) -> impl Iterator<Item = &Edge> + '_;

    /// First edge joining `a` and `b`, if any
    fn edge_between(&self, a: VertexId, b: VertexId) -> Option<&Edge>;
}

/// In-memory breakpoint multigraph with labelled vertices
#[derive(Debug, Clone, Default)]
pub struct BreakpointGraph {
    labels: Vec<String>,
    label_index: HashMap<String, VertexId>,
    edges: Vec<Edge>,
    incidence: Vec<Vec<EdgeId>>,
}

impl BreakpointGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph with `count` vertices labelled `0..count`
    #[must_use]
    pub fn with_vertices(count: usize) -> Self {
        let mut graph = Self::new();
        for i in 0..count {
            graph.add_vertex(i.to_string());
        }
        graph
    }

    /// Get or create the vertex with this label
    pub fn add_vertex(&mut self, label: impl Into<String>) -> VertexId {
        let label = label.into();
        if let Some(&id) = self.label_index.get(&label) {
            return id;
        }
        let id = VertexId(self.labels.len());
        self.labels.push(label.clone());
        self.label_index.insert(label, id);
        self.incidence.push(Vec::new());
        id
    }

    #[must_use]
    pub fn vertex(&self, label: &str) -> Option<VertexId> {
        self.label_index.get(label).copied()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Add an adjacency, merging its color into an existing edge between the
    /// same endpoints. This is how genome orders are combined into one graph.
    ///
    /// # Panics
    ///
    /// Panics if either vertex does not belong to this graph.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId, color: Multicolor) -> EdgeId {
        if let Some(id) = self.edge_between(a, b).map(|e| e.id) {
            let existing = &mut self.edges[id.0].color;
            *existing = existing.union(&color);
            return id;
        }
        self.push_edge(a, b, color)
    }

    /// Add a genome's adjacency; shorthand for a single-genome [`Self::add_edge`]
    pub fn add_adjacency(&mut self, a: VertexId, b: VertexId, genome: &Genome) -> EdgeId {
        self.add_edge(a, b, std::iter::once(genome.clone()).collect())
    }

    /// Add a parallel edge even if the endpoints are already joined
    ///
    /// # Panics
    ///
    /// Panics if either vertex does not belong to this graph.
    pub fn push_edge(&mut self, a: VertexId, b: VertexId, color: Multicolor) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            id,
            vertex1: a,
            vertex2: b,
            color,
        });
        self.incidence[a.0].push(id);
        if a != b {
            self.incidence[b.0].push(id);
        }
        id
    }

    /// The graph as seen by `universe` alone.
    ///
    /// Genomes outside `universe` are removed from every color, edges left
    /// without a color are dropped, and so are vertices no remaining edge
    /// touches. Parallel edges stay parallel.
    #[must_use]
    pub fn restricted_to(&self, universe: &GenomeUniverse) -> Self {
        let mut restricted = Self::new();

        for edge in &self.edges {
            let color: Multicolor = edge
                .color
                .iter()
                .filter(|g| universe.contains(g))
                .cloned()
                .collect();
            if color.is_empty() {
                continue;
            }
            let (Some(a), Some(b)) = (self.labels.get(edge.vertex1.0), self.labels.get(edge.vertex2.0))
            else {
                continue;
            };
            let a = restricted.add_vertex(a.as_str());
            let b = restricted.add_vertex(b.as_str());
            restricted.push_edge(a, b, color);
        }

        restricted
    }

    /// Every genome label appearing on some edge
    #[must_use]
    pub fn genomes(&self) -> BTreeSet<Genome> {
        self.edges
            .iter()
            .flat_map(|e| e.color.iter().cloned())
            .collect()
    }
}

impl GraphView for BreakpointGraph {
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.labels.len()).map(VertexId)
    }

    fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    fn edges_by_vertex(&self, vertex: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.incidence
            .get(vertex.0)
            .into_iter()
            .flatten()
            .map(move |id| &self.edges[id.0])
    }

    fn edge_between(&self, a: VertexId, b: VertexId) -> Option<&Edge> {
        self.edges_by_vertex(a).find(|e| e.other(a) == b)
    }
}
