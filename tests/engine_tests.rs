//! Library-level properties of the scoring engine
//!
//! These tests drive the public API end to end: GRIMM text in, verdicts out.

use quartet_solver::batch::run_experiment;
use quartet_solver::core::color::normalize;
use quartet_solver::core::types::{Genome, GenomeUniverse, Multicolor, Topology};
use quartet_solver::metrics::distance::{bp_distance, dcj_distance};
use quartet_solver::metrics::engine::{decide, evaluate};
use quartet_solver::parsing::grimm::parse_grimm_text;
use quartet_solver::{BreakpointGraph, EvaluationEngine, GraphView, Metric, RunConfig};

/// `A = B` and `C = D`, the pairs one reversal apart
const AB_CD_BLOCKS: &str = "\
>A
1 2 3 4 @
>B
1 2 3 4 @
>C
1 -2 3 4 @
>D
1 -2 3 4 @
";

/// Four unrelated orders of the same five blocks
const SCRAMBLED_BLOCKS: &str = "\
# four different circular orders
>A
1 2 3 4 5 @
>B
1 -3 -2 4 5 @
>C
1 2 -4 3 5 @
>D
5 4 -1 2 3 @
";

/// Linear chromosomes sharing both telomeres
const LINEAR_BLOCKS: &str = "\
>A
1 2 3 $
>B
1 2 3 $
>C
1 -2 3 $
>D
-3 2 -1 $
";

const IDENTICAL_BLOCKS: &str = "\
>A
1 2 3 @
>B
1 2 3 @
>C
1 2 3 @
>D
1 2 3 @
";

fn quartet() -> [Genome; 4] {
    ["A", "B", "C", "D"].map(Genome::new)
}

fn block_number(graph: &BreakpointGraph) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let vertices = graph.vertex_count() as f64;
    vertices / 2.0
}

/// Canonicalization is deterministic and idempotent for every color
#[test]
fn test_normalize_idempotent() {
    let universe = GenomeUniverse::quartet();
    let labels = ["A", "B", "C", "D"];

    for mask in 0u8..16 {
        let color = Multicolor::from_labels(
            labels
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, l)| *l),
        );
        let split = normalize(&color, &universe).unwrap();
        assert_eq!(split, normalize(&color, &universe).unwrap());
        assert_eq!(split, normalize(&split.first, &universe).unwrap());
        assert_eq!(split, normalize(&split.second, &universe).unwrap());
        assert!(split.first.len() <= split.second.len());
    }
}

/// BP and DCJ distances stay within `[0, n]` on well-formed graphs
#[test]
fn test_distance_bounds() {
    for text in [AB_CD_BLOCKS, SCRAMBLED_BLOCKS, LINEAR_BLOCKS] {
        let graph = parse_grimm_text(text).unwrap();
        let n = block_number(&graph);
        let genomes = quartet();

        for a in &genomes {
            for b in &genomes {
                let bp = bp_distance(&graph, a, b);
                let dcj = dcj_distance(&graph, a, b);
                assert!((0.0..=n).contains(&bp), "bp({a},{b}) = {bp} outside [0, {n}]");
                assert!((0.0..=n).contains(&dcj), "dcj({a},{b}) = {dcj} outside [0, {n}]");
                if a == b {
                    assert_eq!(bp, 0.0);
                    assert_eq!(dcj, 0.0);
                }
            }
        }
    }
}

/// Distances are symmetric in their genome arguments
#[test]
fn test_distance_symmetry() {
    let graph = parse_grimm_text(SCRAMBLED_BLOCKS).unwrap();
    let genomes = quartet();
    for a in &genomes {
        for b in &genomes {
            assert_eq!(bp_distance(&graph, a, b), bp_distance(&graph, b, a));
            assert_eq!(dcj_distance(&graph, a, b), dcj_distance(&graph, b, a));
        }
    }
}

/// A graph that cannot tell the topologies apart never yields a positive verdict
#[test]
fn test_ties_are_never_correct() {
    let graph = parse_grimm_text(IDENTICAL_BLOCKS).unwrap();
    let topologies = Topology::quartet_topologies();

    for correct in &topologies {
        let verdicts = evaluate(&graph, &topologies, correct).unwrap();
        assert_eq!(verdicts.len(), Metric::ALL.len());
        assert!(verdicts.iter().all(|v| !v), "{verdicts:?}");
    }

    assert!(!decide(&[1.0, 1.0, 2.0], &topologies, &topologies[0]));
    assert!(!decide(&[], &[], &topologies[0]));
}

/// GRIMM text through the full engine picks the simulated tree
#[test]
fn test_grimm_to_verdicts() {
    let graph = parse_grimm_text(AB_CD_BLOCKS).unwrap();
    let topologies = Topology::quartet_topologies();
    let engine = EvaluationEngine::with_metrics(vec![Metric::Dcj, Metric::Bp]);

    let matrix = engine.score_matrix(&graph, &topologies).unwrap();
    assert_eq!(engine.metrics(), &[Metric::Bp, Metric::Dcj]);
    for row in &matrix.rows {
        assert_eq!(row.best_indices(), vec![0], "{}", row.metric);
    }
    assert_eq!(matrix.decisions(&topologies[0]), vec![true, true]);
    assert_eq!(matrix.decisions(&topologies[1]), vec![false, false]);
}

/// The correct topology is matched as an unrooted tree, not as a string
#[test]
fn test_correct_topology_is_order_insensitive() {
    let graph = parse_grimm_text(AB_CD_BLOCKS).unwrap();
    let topologies = Topology::quartet_topologies();

    let canonical = evaluate(&graph, &topologies, &topologies[0]).unwrap();
    let flipped: Topology = "DC|BA".parse().unwrap();
    assert_eq!(evaluate(&graph, &topologies, &flipped).unwrap(), canonical);
}

/// Cumulative is MCA plus the three pattern scores, for every topology
#[test]
fn test_cumulative_row() {
    let graph = parse_grimm_text(SCRAMBLED_BLOCKS).unwrap();
    let topologies = Topology::quartet_topologies();
    let matrix = EvaluationEngine::new()
        .score_matrix(&graph, &topologies)
        .unwrap();

    let row = |metric: Metric| {
        matrix
            .rows
            .iter()
            .find(|r| r.metric == metric)
            .map(|r| r.scores.clone())
            .unwrap()
    };
    let parts = [
        row(Metric::Mca),
        row(Metric::CylinderPattern),
        row(Metric::BagPattern),
        row(Metric::DiamondPattern),
    ];
    let cumulative = row(Metric::Cumulative);

    for (i, total) in cumulative.iter().enumerate() {
        let expected: f64 = parts.iter().map(|p| p[i]).sum();
        assert!((total - expected).abs() < 1e-9);
    }
}

/// Every metric scored alone agrees with its row in the full matrix
#[test]
fn test_single_metric_matches_matrix() {
    let graph = parse_grimm_text(LINEAR_BLOCKS).unwrap();
    let topologies = Topology::quartet_topologies();
    let matrix = EvaluationEngine::new()
        .score_matrix(&graph, &topologies)
        .unwrap();

    for row in &matrix.rows {
        for (topology, score) in topologies.iter().zip(&row.scores) {
            let alone = row.metric.score(&graph, topology).unwrap();
            assert!((alone - score).abs() < 1e-9, "{} on {topology}", row.metric);
        }
    }
}

/// A config file drives a whole experiment
#[test]
fn test_config_driven_experiment() {
    let root = tempfile::tempdir().unwrap();
    for dataset in ["1_1_0", "2_1_0"] {
        let dir = root.path().join(dataset);
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("blocks_0.txt"), AB_CD_BLOCKS).unwrap();
        std::fs::write(dir.join("blocks_1.txt"), AB_CD_BLOCKS).unwrap();
    }

    let config_path = root.path().join("run.json");
    std::fs::write(&config_path, r#"{"metrics": ["bp", "dcj"], "correct_topology": "CD|AB"}"#)
        .unwrap();
    let plan = RunConfig::load_from_file(&config_path)
        .unwrap()
        .resolve()
        .unwrap();

    let rows = run_experiment(root.path(), &plan).unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.summary.files, 2);
        assert_eq!(row.summary.metrics, vec![Metric::Bp, Metric::Dcj]);
        assert_eq!(row.summary.success_rates, vec![1.0, 1.0]);
    }
}
