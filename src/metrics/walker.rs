//! Alternating path and cycle traversal.
//!
//! A walk starts at a vertex with one of two colors and keeps stepping to an
//! unvisited neighbor across an edge of the current color, flipping the color
//! after each step. Paths and cycles share the stepping; they differ only in
//! how a dead end is interpreted.

use std::collections::HashSet;

use crate::core::color::{neighbors, EdgeFilter};
use crate::core::graph::{GraphView, VertexId};
use crate::core::types::Multicolor;

/// Whether a sweep measures alternating paths or alternating cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    Paths,
    Cycles,
}

/// The two colors a walk alternates between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternation {
    first: Multicolor,
    second: Multicolor,
}

impl Alternation {
    pub fn new(first: Multicolor, second: Multicolor) -> Self {
        Self { first, second }
    }

    /// The counterpart of `color`. Anything other than the first color maps to it.
    #[must_use]
    pub fn alternate(&self, color: &Multicolor) -> &Multicolor {
        if *color == self.first {
            &self.second
        } else {
            &self.first
        }
    }

    #[must_use]
    pub fn colors(&self) -> [&Multicolor; 2] {
        [&self.first, &self.second]
    }
}

/// What a single walk found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// Maximal alternating path of the given number of edges (possibly 0)
    Path(usize),
    /// Closed alternating cycle of the given number of edges
    Cycle(usize),
    /// Cycle-mode walk that ended at a leaf or never moved
    Degenerate,
}

impl Structure {
    #[must_use]
    pub fn length(&self) -> usize {
        match self {
            Self::Path(len) | Self::Cycle(len) => *len,
            Self::Degenerate => 0,
        }
    }
}

enum WalkState {
    Walking,
    DeadEnd,
}

/// Walk from `start` beginning with `start_color`.
///
/// `visited` is shared with the caller's sweep so that a structure reached
/// from both of its ends is only measured once.
pub fn traverse<G: GraphView>(
    graph: &G,
    start: VertexId,
    start_color: &Multicolor,
    alternation: &Alternation,
    visited: &mut HashSet<VertexId>,
    mode: WalkMode,
) -> Structure {
    let mut current = start;
    let mut color = start_color;
    let mut length = 0usize;
    let mut state = WalkState::Walking;

    while let WalkState::Walking = state {
        visited.insert(current);
        let next = neighbors(graph, current, EdgeFilter::Color(color))
            .map(|(v, _)| v)
            .find(|v| !visited.contains(v));

        match next {
            Some(v) => {
                current = v;
                color = alternation.alternate(color);
                length += 1;
            }
            None => state = WalkState::DeadEnd,
        }
    }

    match mode {
        WalkMode::Paths => Structure::Path(length),
        WalkMode::Cycles => {
            let alternate = alternation.alternate(color);
            let closing_edges =
                neighbors(graph, current, EdgeFilter::EitherColor(color, alternate)).count();
            if closing_edges == 1 || length == 0 {
                Structure::Degenerate
            } else {
                Structure::Cycle(length + 1)
            }
        }
    }
}

/// Walk from every not-yet-visited vertex in both colors.
///
/// One visited set is used for the whole sweep.
pub fn sweep<G: GraphView>(graph: &G, alternation: &Alternation, mode: WalkMode) -> Vec<Structure> {
    let mut visited = HashSet::new();
    let mut found = Vec::new();

    for vertex in graph.vertices() {
        if visited.contains(&vertex) {
            continue;
        }
        for color in alternation.colors() {
            found.push(traverse(graph, vertex, color, alternation, &mut visited, mode));
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::BreakpointGraph;

    fn color(labels: &[&str]) -> Multicolor {
        Multicolor::from_labels(labels.iter().copied())
    }

    fn alternation() -> Alternation {
        Alternation::new(color(&["A", "C"]), color(&["B", "D"]))
    }

    /// 0 -AC- 1 -BD- 2 -AC- 3 -BD- 0
    fn square() -> BreakpointGraph {
        let mut graph = BreakpointGraph::with_vertices(4);
        graph.add_edge(VertexId(0), VertexId(1), color(&["A", "C"]));
        graph.add_edge(VertexId(2), VertexId(3), color(&["A", "C"]));
        graph.add_edge(VertexId(1), VertexId(2), color(&["B", "D"]));
        graph.add_edge(VertexId(0), VertexId(3), color(&["B", "D"]));
        graph
    }

    fn total(structures: &[Structure]) -> usize {
        structures.iter().map(Structure::length).sum()
    }

    #[test]
    fn test_alternate() {
        let alt = alternation();
        assert_eq!(alt.alternate(&color(&["A", "C"])), &color(&["B", "D"]));
        assert_eq!(alt.alternate(&color(&["B", "D"])), &color(&["A", "C"]));
    }

    #[test]
    fn test_square_paths() {
        let structures = sweep(&square(), &alternation(), WalkMode::Paths);
        assert_eq!(structures, vec![Structure::Path(3), Structure::Path(0)]);
        assert_eq!(total(&structures), 3);
    }

    #[test]
    fn test_square_cycles() {
        let structures = sweep(&square(), &alternation(), WalkMode::Cycles);
        assert_eq!(structures, vec![Structure::Cycle(4), Structure::Degenerate]);
        assert_eq!(total(&structures), 4);
    }

    #[test]
    fn test_open_path_is_not_a_cycle() {
        let mut graph = BreakpointGraph::with_vertices(3);
        graph.add_edge(VertexId(0), VertexId(1), color(&["A", "C"]));
        graph.add_edge(VertexId(1), VertexId(2), color(&["B", "D"]));

        let cycles = sweep(&graph, &alternation(), WalkMode::Cycles);
        assert_eq!(total(&cycles), 0);

        let paths = sweep(&graph, &alternation(), WalkMode::Paths);
        assert_eq!(total(&paths), 2);
    }

    #[test]
    fn test_visited_set_is_shared() {
        let graph = square();
        let alt = alternation();
        let mut visited = HashSet::new();
        let first = traverse(&graph, VertexId(0), &color(&["A", "C"]), &alt, &mut visited, WalkMode::Paths);
        assert_eq!(first, Structure::Path(3));
        assert_eq!(visited.len(), 4);
        let again = traverse(&graph, VertexId(2), &color(&["A", "C"]), &alt, &mut visited, WalkMode::Paths);
        assert_eq!(again, Structure::Path(0));
    }

    #[test]
    fn test_other_colors_are_ignored() {
        let mut graph = BreakpointGraph::with_vertices(2);
        graph.add_edge(VertexId(0), VertexId(1), color(&["A"]));
        let structures = sweep(&graph, &alternation(), WalkMode::Paths);
        assert_eq!(total(&structures), 0);
        assert_eq!(structures.len(), 4);
    }
}
