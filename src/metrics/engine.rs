use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use crate::core::graph::GraphView;
use crate::core::types::Topology;
use crate::metrics::alternating::AlternatingScores;
use crate::metrics::distance::{bp_distance_metric, dcj_distance_metric};
use crate::metrics::patterns::{
    find_bag_patterns, find_cylinder_patterns, find_diamond_patterns, pattern_metric, PatternVotes,
};
use crate::metrics::splits::{distribution_metric, simple_paths_metric};
use crate::metrics::{MetricError, Score};

/// Scores closer than this are treated as tied
pub const SCORE_TOLERANCE: f64 = 1e-9;

/// One topology-scoring metric, in reporting order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Distribution,
    SimplePaths,
    CylinderPattern,
    BagPattern,
    DiamondPattern,
    Bp,
    Dcj,
    Ca,
    Mca,
    /// MCA plus the three pattern scores
    Cumulative,
}

impl Metric {
    /// Every metric, in reporting order
    pub const ALL: [Metric; 10] = [
        Metric::Distribution,
        Metric::SimplePaths,
        Metric::CylinderPattern,
        Metric::BagPattern,
        Metric::DiamondPattern,
        Metric::Bp,
        Metric::Dcj,
        Metric::Ca,
        Metric::Mca,
        Metric::Cumulative,
    ];

    /// Column name used in reports
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Distribution => "Distribution",
            Self::SimplePaths => "Simple_Paths",
            Self::CylinderPattern => "Cylinder_pattern",
            Self::BagPattern => "Bag_pattern",
            Self::DiamondPattern => "Diamond_pattern",
            Self::Bp => "S_BP",
            Self::Dcj => "S_DCJ",
            Self::Ca => "S_CA",
            Self::Mca => "S_MCA",
            Self::Cumulative => "Cumulative",
        }
    }


    /// Score a single topology without any caching
    ///
    /// # Errors
    ///
    /// Returns `MetricError::Color` if an edge is colored outside the topology's genomes.
    pub fn score<G: GraphView>(&self, graph: &G, topology: &Topology) -> Result<Score, MetricError> {
        let patterns = GraphPatterns::new(graph);
        let candidate = Candidate::new(topology);
        score_metric(*self, graph, &patterns, &candidate)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pattern votes found in one graph, computed on first use
struct GraphPatterns<'g, G> {
    graph: &'g G,
    cylinder: OnceCell<PatternVotes>,
    bag: OnceCell<PatternVotes>,
    diamond: OnceCell<PatternVotes>,
}

impl<'g, G: GraphView> GraphPatterns<'g, G> {
    fn new(graph: &'g G) -> Self {
        Self {
            graph,
            cylinder: OnceCell::new(),
            bag: OnceCell::new(),
            diamond: OnceCell::new(),
        }
    }

    fn cylinder(&self) -> &PatternVotes {
        self.cylinder.get_or_init(|| find_cylinder_patterns(self.graph))
    }

    fn bag(&self) -> &PatternVotes {
        self.bag.get_or_init(|| find_bag_patterns(self.graph))
    }

    fn diamond(&self) -> &PatternVotes {
        self.diamond.get_or_init(|| find_diamond_patterns(self.graph))
    }
}

/// One candidate topology and its alternating-structure scores, computed on first use
struct Candidate<'t> {
    topology: &'t Topology,
    alternating: OnceCell<AlternatingScores>,
}

impl<'t> Candidate<'t> {
    fn new(topology: &'t Topology) -> Self {
        Self {
            topology,
            alternating: OnceCell::new(),
        }
    }

    fn alternating<G: GraphView>(&self, graph: &G) -> AlternatingScores {
        *self
            .alternating
            .get_or_init(|| AlternatingScores::compute(graph, self.topology))
    }
}

fn score_metric<G: GraphView>(
    metric: Metric,
    graph: &G,
    patterns: &GraphPatterns<'_, G>,
    candidate: &Candidate<'_>,
) -> Result<Score, MetricError> {
    let topology = candidate.topology;
    let score = match metric {
        Metric::Distribution => distribution_metric(graph, topology)?,
        Metric::SimplePaths => simple_paths_metric(graph, topology)?,
        Metric::CylinderPattern => pattern_metric(patterns.cylinder(), topology),
        Metric::BagPattern => pattern_metric(patterns.bag(), topology),
        Metric::DiamondPattern => pattern_metric(patterns.diamond(), topology),
        Metric::Bp => bp_distance_metric(graph, topology),
        Metric::Dcj => dcj_distance_metric(graph, topology),
        Metric::Ca => candidate.alternating(graph).ca,
        Metric::Mca => candidate.alternating(graph).mca,
        Metric::Cumulative => {
            candidate.alternating(graph).mca
                + pattern_metric(patterns.cylinder(), topology)
                + pattern_metric(patterns.bag(), topology)
                + pattern_metric(patterns.diamond(), topology)
        }
    };
    Ok(score)
}

/// Scores of one metric, aligned with [`ScoreMatrix::topologies`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricScores {
    pub metric: Metric,
    pub scores: Vec<Score>,
}

impl MetricScores {
    /// Indices of every topology tied at the minimum score
    #[must_use]
    pub fn best_indices(&self) -> Vec<usize> {
        tied_at_minimum(&self.scores)
    }
}

fn tied_at_minimum(scores: &[Score]) -> Vec<usize> {
    let Some(minimum) = scores.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    scores
        .iter()
        .enumerate()
        .filter(|(_, s)| (**s - minimum).abs() < SCORE_TOLERANCE)
        .map(|(i, _)| i)
        .collect()
}

/// Metric × topology score table for one graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMatrix {
    pub topologies: Vec<Topology>,
    pub rows: Vec<MetricScores>,
}

impl ScoreMatrix {
    /// Topologies tied at the minimum of `row`
    #[must_use]
    pub fn best_topologies(&self, row: &MetricScores) -> Vec<&Topology> {
        row.best_indices()
            .into_iter()
            .filter_map(|i| self.topologies.get(i))
            .collect()
    }

    /// One verdict per row, see [`decide`]
    #[must_use]
    pub fn decisions(&self, correct: &Topology) -> Vec<bool> {
        self.rows
            .iter()
            .map(|row| decide(&row.scores, &self.topologies, correct))
            .collect()
    }
}

/// True iff exactly one topology attains the minimum score and it is the
/// same unrooted tree as `correct`
#[must_use]
pub fn decide(scores: &[Score], topologies: &[Topology], correct: &Topology) -> bool {
    match tied_at_minimum(scores).as_slice() {
        [only] => topologies
            .get(*only)
            .is_some_and(|best| best.same_quartet(correct)),
        _ => false,
    }
}

/// Runs a metric set over candidate topologies
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    metrics: Vec<Metric>,
}

impl Default for EvaluationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationEngine {
    /// Engine running every metric in reporting order
    #[must_use]
    pub fn new() -> Self {
        Self {
            metrics: Metric::ALL.to_vec(),
        }
    }

    /// Engine running `metrics`, reordered into reporting order with duplicates removed
    #[must_use]
    pub fn with_metrics(mut metrics: Vec<Metric>) -> Self {
        metrics.sort_unstable();
        metrics.dedup();
        Self { metrics }
    }

    #[must_use]
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Score every metric on every topology.
    ///
    /// Pattern detection runs once for the graph; alternating structures run
    /// once per topology.
    ///
    /// # Errors
    ///
    /// Returns `MetricError::NoTopologies` for an empty candidate list, or
    /// `MetricError::Color` if an edge is colored outside a topology's genomes.
    pub fn score_matrix<G: GraphView>(
        &self,
        graph: &G,
        topologies: &[Topology],
    ) -> Result<ScoreMatrix, MetricError> {
        if topologies.is_empty() {
            return Err(MetricError::NoTopologies);
        }

        let patterns = GraphPatterns::new(graph);
        let candidates: Vec<Candidate<'_>> = topologies.iter().map(Candidate::new).collect();

        let rows = self
            .metrics
            .iter()
            .map(|&metric| -> Result<MetricScores, MetricError> {
                let scores = candidates
                    .iter()
                    .map(|candidate| score_metric(metric, graph, &patterns, candidate))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MetricScores { metric, scores })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScoreMatrix {
            topologies: topologies.to_vec(),
            rows,
        })
    }

    /// One verdict per metric: see [`decide`]
    ///
    /// # Errors
    ///
    /// Same as [`Self::score_matrix`].
    pub fn evaluate<G: GraphView>(
        &self,
        graph: &G,
        topologies: &[Topology],
        correct: &Topology,
    ) -> Result<Vec<bool>, MetricError> {
        Ok(self.score_matrix(graph, topologies)?.decisions(correct))
    }
}

/// Evaluate every metric, in reporting order
///
/// # Errors
///
/// Same as [`EvaluationEngine::score_matrix`].
pub fn evaluate<G: GraphView>(
    graph: &G,
    topologies: &[Topology],
    correct: &Topology,
) -> Result<Vec<bool>, MetricError> {
    EvaluationEngine::new().evaluate(graph, topologies, correct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorError;
    use crate::core::graph::{BreakpointGraph, VertexId};
    use crate::core::types::Multicolor;

    fn color(labels: &[&str]) -> Multicolor {
        Multicolor::from_labels(labels.iter().copied())
    }

    /// A cylinder voting for `{A,B}`
    fn cylinder_graph() -> BreakpointGraph {
        let mut graph = BreakpointGraph::with_vertices(4);
        graph.add_edge(VertexId(0), VertexId(1), color(&["A", "B"]));
        graph.add_edge(VertexId(2), VertexId(3), color(&["A", "B"]));
        graph.add_edge(VertexId(1), VertexId(2), color(&["C"]));
        graph.add_edge(VertexId(0), VertexId(3), color(&["D"]));
        graph
    }

    fn row(matrix: &ScoreMatrix, metric: Metric) -> &MetricScores {
        matrix.rows.iter().find(|r| r.metric == metric).unwrap()
    }

    #[test]
    fn test_metric_names_in_order() {
        let names: Vec<&str> = Metric::ALL.iter().map(Metric::name).collect();
        assert_eq!(
            names,
            vec![
                "Distribution",
                "Simple_Paths",
                "Cylinder_pattern",
                "Bag_pattern",
                "Diamond_pattern",
                "S_BP",
                "S_DCJ",
                "S_CA",
                "S_MCA",
                "Cumulative",
            ]
        );
    }

    #[test]
    fn test_decide_unique_minimum() {
        let topologies = Topology::quartet_topologies();
        assert!(decide(&[-3.0, -1.0, 0.0], &topologies, &topologies[0]));
        assert!(!decide(&[-3.0, -1.0, 0.0], &topologies, &topologies[1]));
    }

    #[test]
    fn test_decide_tie_is_false() {
        let topologies = Topology::quartet_topologies();
        for correct in &topologies {
            assert!(!decide(&[-2.0, -2.0, 0.0], &topologies, correct));
        }
        assert!(!decide(&[], &topologies, &topologies[0]));
    }

    #[test]
    fn test_decide_ignores_pair_order() {
        let topologies = Topology::quartet_topologies();
        let correct: Topology = "DC|BA".parse().unwrap();
        assert!(decide(&[-1.0, 0.0, 0.0], &topologies, &correct));
    }

    #[test]
    fn test_cylinder_graph_matrix() {
        let graph = cylinder_graph();
        let topologies = Topology::quartet_topologies();
        let matrix = EvaluationEngine::new()
            .score_matrix(&graph, &topologies)
            .unwrap();

        assert_eq!(matrix.rows.len(), Metric::ALL.len());
        let cylinder = row(&matrix, Metric::CylinderPattern);
        assert_eq!(cylinder.scores, vec![-1.0, 0.0, 0.0]);
        assert_eq!(matrix.best_topologies(cylinder), vec![&topologies[0]]);

        let decisions = matrix.decisions(&topologies[0]);
        assert!(decisions[2]);
    }

    #[test]
    fn test_cumulative_sums_mca_and_patterns() {
        let graph = cylinder_graph();
        let topologies = Topology::quartet_topologies();
        let matrix = EvaluationEngine::new()
            .score_matrix(&graph, &topologies)
            .unwrap();

        for i in 0..topologies.len() {
            let expected = row(&matrix, Metric::Mca).scores[i]
                + row(&matrix, Metric::CylinderPattern).scores[i]
                + row(&matrix, Metric::BagPattern).scores[i]
                + row(&matrix, Metric::DiamondPattern).scores[i];
            assert!((row(&matrix, Metric::Cumulative).scores[i] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_matrix_agrees_with_single_scores() {
        let graph = cylinder_graph();
        let topologies = Topology::quartet_topologies();
        let matrix = EvaluationEngine::new()
            .score_matrix(&graph, &topologies)
            .unwrap();
        for row in &matrix.rows {
            for (topology, score) in topologies.iter().zip(&row.scores) {
                let single = row.metric.score(&graph, topology).unwrap();
                assert!((single - score).abs() < 1e-9, "{} on {topology}", row.metric);
            }
        }
    }

    #[test]
    fn test_with_metrics_orders_and_dedups() {
        let engine = EvaluationEngine::with_metrics(vec![Metric::Mca, Metric::Bp, Metric::Mca]);
        assert_eq!(engine.metrics(), &[Metric::Bp, Metric::Mca]);
    }

    #[test]
    fn test_empty_graph_ties_everywhere() {
        let graph = BreakpointGraph::new();
        let topologies = Topology::quartet_topologies();
        let verdicts = evaluate(&graph, &topologies, &topologies[0]).unwrap();
        assert_eq!(verdicts, vec![false; Metric::ALL.len()]);
    }

    #[test]
    fn test_errors() {
        let graph = cylinder_graph();
        assert_eq!(
            EvaluationEngine::new().score_matrix(&graph, &[]),
            Err(MetricError::NoTopologies)
        );

        let mut graph = BreakpointGraph::with_vertices(2);
        graph.add_edge(VertexId(0), VertexId(1), color(&["A", "E"]));
        let topologies = Topology::quartet_topologies();
        let err = evaluate(&graph, &topologies, &topologies[0]).unwrap_err();
        assert!(matches!(err, MetricError::Color(ColorError::InvalidColor { .. })));
    }
}
