use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::graph::{BreakpointGraph, GraphView, VertexId};
use crate::core::types::Genome;
use crate::utils::validation::{check_block_limit, is_valid_genome_label};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid GRIMM format at line {line}: {message}")]
    InvalidFormat { line: usize, message: String },

    #[error("Line {0}: chromosome found before any '>' genome header")]
    ChromosomeBeforeGenome(usize),

    #[error("Line {0}: chromosome is missing its '$' or '@' terminator")]
    MissingTerminator(usize),

    #[error("Line {0}: empty block name")]
    EmptyBlockName(usize),

    #[error("Line {0}: empty genome name")]
    EmptyGenomeName(usize),

    #[error("No genomes found in input")]
    NoGenomes,

    #[error("{0}")]
    TooManyBlocks(String),
}

/// Suffix of the vertex capping a linear chromosome end
pub const INFINITY_SUFFIX: &str = "__infinity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `$`
    Linear,
    /// `@`
    Circular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SignedBlock<'a> {
    name: &'a str,
    reverse: bool,
}

impl SignedBlock<'_> {
    /// Extremity a walk along the chromosome enters the block through
    fn entry(&self) -> String {
        if self.reverse {
            head(self.name)
        } else {
            tail(self.name)
        }
    }

    /// Extremity a walk along the chromosome leaves the block through
    fn exit(&self) -> String {
        if self.reverse {
            tail(self.name)
        } else {
            head(self.name)
        }
    }
}

#[must_use]
pub fn tail(block: &str) -> String {
    format!("{block}t")
}

#[must_use]
pub fn head(block: &str) -> String {
    format!("{block}h")
}

#[must_use]
pub fn infinity(extremity: &str) -> String {
    format!("{extremity}{INFINITY_SUFFIX}")
}

/// Parse a GRIMM file into a breakpoint graph. Files ending in `.gz` are
/// decompressed on the fly.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or a format error
/// describing the first malformed line.
pub fn parse_grimm_file(path: &Path) -> Result<BreakpointGraph, ParseError> {
    let file = File::open(path)?;
    let compressed = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

    if compressed {
        parse_grimm_reader(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        parse_grimm_reader(BufReader::new(file))
    }
}

/// Parse GRIMM text into a breakpoint graph
///
/// # Errors
///
/// Returns a format error describing the first malformed line.
pub fn parse_grimm_text(text: &str) -> Result<BreakpointGraph, ParseError> {
    parse_grimm_reader(text.as_bytes())
}

/// Parse GRIMM input from any buffered reader.
///
/// Every genome's adjacencies are added to one graph; an adjacency shared by
/// several genomes becomes a single edge colored with all of them.
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure, `ParseError::NoGenomes` if no
/// `>` header is present, `ParseError::TooManyBlocks` past the block limit,
/// or a line-specific format error.
pub fn parse_grimm_reader<R: BufRead>(reader: R) -> Result<BreakpointGraph, ParseError> {
    let mut graph = BreakpointGraph::new();
    let mut current: Option<Genome> = None;
    let mut genome_count = 0usize;
    let mut blocks: HashSet<String> = HashSet::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let content = strip_comment(&line).trim();
        if content.is_empty() {
            continue;
        }

        if let Some(name) = content.strip_prefix('>') {
            let name = name.trim();
            if name.is_empty() {
                return Err(ParseError::EmptyGenomeName(line_number));
            }
            if !is_valid_genome_label(name) {
                return Err(ParseError::InvalidFormat {
                    line: line_number,
                    message: format!("invalid genome name '{name}'"),
                });
            }
            current = Some(Genome::new(name));
            genome_count += 1;
            continue;
        }

        let Some(genome) = &current else {
            return Err(ParseError::ChromosomeBeforeGenome(line_number));
        };

        let (chromosome, shape) = parse_chromosome(content, line_number)?;
        for block in &chromosome {
            if !blocks.contains(block.name) {
                if let Some(msg) = check_block_limit(blocks.len()) {
                    return Err(ParseError::TooManyBlocks(msg));
                }
                blocks.insert(block.name.to_string());
            }
        }
        add_chromosome(&mut graph, genome, &chromosome, shape);
    }

    if genome_count == 0 {
        return Err(ParseError::NoGenomes);
    }

    let colors = graph.genomes();
    if colors.len() < genome_count {
        warn!(
            declared = genome_count,
            with_adjacencies = colors.len(),
            "Some genomes contribute no adjacencies"
        );
    }

    debug!(
        genomes = genome_count,
        blocks = blocks.len(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Parsed GRIMM input"
    );

    Ok(graph)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split a chromosome line into signed blocks and its terminator
fn parse_chromosome(content: &str, line: usize) -> Result<(Vec<SignedBlock<'_>>, Shape), ParseError> {
    let Some(pos) = content.find(['$', '@']) else {
        return Err(ParseError::MissingTerminator(line));
    };

    let shape = if content[pos..].starts_with('$') {
        Shape::Linear
    } else {
        Shape::Circular
    };

    let trailing = content[pos + 1..].trim();
    if !trailing.is_empty() {
        return Err(ParseError::InvalidFormat {
            line,
            message: format!("unexpected text after terminator: '{trailing}'"),
        });
    }

    let blocks = content[..pos]
        .split_whitespace()
        .map(|token| parse_block(token, line))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((blocks, shape))
}

fn parse_block(token: &str, line: usize) -> Result<SignedBlock<'_>, ParseError> {
    let (name, reverse) = match token.as_bytes().first() {
        Some(b'-') => (&token[1..], true),
        Some(b'+') => (&token[1..], false),
        _ => (token, false),
    };

    if name.is_empty() {
        return Err(ParseError::EmptyBlockName(line));
    }
    if name.starts_with(['+', '-']) {
        return Err(ParseError::InvalidFormat {
            line,
            message: format!("block '{token}' has more than one sign"),
        });
    }

    Ok(SignedBlock { name, reverse })
}

fn add_chromosome(graph: &mut BreakpointGraph, genome: &Genome, blocks: &[SignedBlock<'_>], shape: Shape) {
    let (Some(first), Some(last)) = (blocks.first(), blocks.last()) else {
        return;
    };

    for pair in blocks.windows(2) {
        join(graph, genome, &pair[0].exit(), &pair[1].entry());
    }

    match shape {
        Shape::Circular => join(graph, genome, &last.exit(), &first.entry()),
        Shape::Linear => {
            let start = first.entry();
            let end = last.exit();
            join(graph, genome, &infinity(&start), &start);
            join(graph, genome, &end, &infinity(&end));
        }
    }
}

fn join(graph: &mut BreakpointGraph, genome: &Genome, a: &str, b: &str) {
    let a: VertexId = graph.add_vertex(a);
    let b: VertexId = graph.add_vertex(b);
    graph.add_adjacency(a, b, genome);
}
