use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::validation::{is_valid_genome_label, split_descriptor_side};

/// A genome label (e.g. `A`, or an ancestral genome such as `Left`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Genome(pub String);

impl Genome {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Genome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of genomes sharing one adjacency. Duplicates are collapsed and the
/// members are kept sorted, so equality and ordering are structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Multicolor(BTreeSet<Genome>);

impl Multicolor {
    /// Build a multicolor from genome labels
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Genome::new).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, genome: &Genome) -> bool {
        self.0.contains(genome)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Genome> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_subset(&self, other: &Multicolor) -> bool {
        self.0.is_subset(&other.0)
    }

    #[must_use]
    pub fn union(&self, other: &Multicolor) -> Multicolor {
        Self(self.0.union(&other.0).cloned().collect())
    }

    #[must_use]
    pub fn difference(&self, other: &Multicolor) -> Multicolor {
        Self(self.0.difference(&other.0).cloned().collect())
    }
}

impl FromIterator<Genome> for Multicolor {
    fn from_iter<T: IntoIterator<Item = Genome>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for Multicolor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(Genome::as_str).collect();
        write!(f, "{{{}}}", labels.join(","))
    }
}

/// The full set of genomes a topology is scored over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeUniverse(Multicolor);

impl GenomeUniverse {
    /// The conventional quartet universe `{A,B,C,D}`
    #[must_use]
    pub fn quartet() -> Self {
        Self(Multicolor::from_labels(["A", "B", "C", "D"]))
    }

    /// Universe spanned by the four leaves of a topology
    #[must_use]
    pub fn of_topology(topology: &Topology) -> Self {
        Self(topology.genomes().cloned().collect())
    }

    #[must_use]
    pub fn genomes(&self) -> &Multicolor {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, genome: &Genome) -> bool {
        self.0.contains(genome)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for GenomeUniverse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Topology '{0}' must have exactly two sides separated by '|'")]
    SideCount(String),

    #[error("Topology side '{0}' must name exactly two genomes")]
    SideSize(String),

    #[error("Invalid genome label '{0}' in topology")]
    InvalidLabel(String),

    #[error("Topology '{0}' repeats a genome; sides must be disjoint")]
    RepeatedGenome(String),
}

/// An unrooted quartet tree written as two genome pairs, e.g. `AB|CD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topology {
    pub left: (Genome, Genome),
    pub right: (Genome, Genome),
}

impl Topology {
    pub fn new(left: (Genome, Genome), right: (Genome, Genome)) -> Self {
        Self { left, right }
    }

    /// The three unrooted topologies over `{A,B,C,D}`, in reporting order
    #[must_use]
    pub fn quartet_topologies() -> [Topology; 3] {
        let g = |s: &str| Genome::new(s);
        [
            Topology::new((g("A"), g("B")), (g("C"), g("D"))),
            Topology::new((g("A"), g("C")), (g("B"), g("D"))),
            Topology::new((g("A"), g("D")), (g("C"), g("B"))),
        ]
    }

    /// Both genome pairs, left first
    #[must_use]
    pub fn pairs(&self) -> [(&Genome, &Genome); 2] {
        [
            (&self.left.0, &self.left.1),
            (&self.right.0, &self.right.1),
        ]
    }

    /// Both sides as multicolors, left first
    #[must_use]
    pub fn sides(&self) -> [Multicolor; 2] {
        self.pairs()
            .map(|(a, b)| [a.clone(), b.clone()].into_iter().collect())
    }

    pub fn genomes(&self) -> impl Iterator<Item = &Genome> {
        [&self.left.0, &self.left.1, &self.right.0, &self.right.1].into_iter()
    }

    /// True if every genome of `color` sits on the same side of the tree
    #[must_use]
    pub fn keeps_together(&self, color: &Multicolor) -> bool {
        self.sides().iter().any(|side| color.is_subset(side))
    }

    /// Unrooted equality: `AB|CD`, `BA|CD` and `CD|AB` are the same tree
    #[must_use]
    pub fn same_quartet(&self, other: &Topology) -> bool {
        let mut mine = self.sides();
        let mut theirs = other.sides();
        mine.sort();
        theirs.sort();
        mine == theirs
    }
}

impl FromStr for Topology {
    type Err = TopologyError;

    /// Parse `AB|CD` (single-letter genomes) or `A,B|C,D` / `Left,Right|C,D`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sides: Vec<&str> = s.trim().split('|').collect();
        if sides.len() != 2 {
            return Err(TopologyError::SideCount(s.to_string()));
        }

        let mut pairs = Vec::with_capacity(2);
        for side in sides {
            let labels = split_descriptor_side(side);
            if labels.len() != 2 {
                return Err(TopologyError::SideSize(side.trim().to_string()));
            }
            if let Some(bad) = labels.iter().find(|l| !is_valid_genome_label(l)) {
                return Err(TopologyError::InvalidLabel(bad.clone()));
            }
            pairs.push((Genome::new(&labels[0]), Genome::new(&labels[1])));
        }

        let right = pairs.pop().ok_or_else(|| TopologyError::SideCount(s.to_string()))?;
        let left = pairs.pop().ok_or_else(|| TopologyError::SideCount(s.to_string()))?;
        let topology = Topology::new(left, right);

        let distinct: BTreeSet<&Genome> = topology.genomes().collect();
        if distinct.len() != 4 {
            return Err(TopologyError::RepeatedGenome(s.to_string()));
        }

        Ok(topology)
    }
}

impl TryFrom<String> for Topology {
    type Error = TopologyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Topology> for String {
    fn from(value: Topology) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let compact = self.genomes().all(|g| g.as_str().chars().count() == 1);
        let [(a, b), (c, d)] = self.pairs();
        if compact {
            write!(f, "{a}{b}|{c}{d}")
        } else {
            write!(f, "{a},{b}|{c},{d}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multicolor_collapses_duplicates() {
        let color = Multicolor::from_labels(["B", "A", "B"]);
        assert_eq!(color.len(), 2);
        assert_eq!(color.to_string(), "{A,B}");
    }

    #[test]
    fn test_parse_compact_topology() {
        let topology: Topology = "AB|CD".parse().unwrap();
        assert_eq!(topology.left, (Genome::new("A"), Genome::new("B")));
        assert_eq!(topology.right, (Genome::new("C"), Genome::new("D")));
        assert_eq!(topology.to_string(), "AB|CD");
    }

    #[test]
    fn test_parse_comma_topology() {
        let topology: Topology = "Left, Right | C,D".parse().unwrap();
        assert_eq!(topology.left.1, Genome::new("Right"));
        assert_eq!(topology.to_string(), "Left,Right|C,D");
    }

    #[test]
    fn test_parse_topology_errors() {
        assert!(matches!(
            "ABCD".parse::<Topology>(),
            Err(TopologyError::SideCount(_))
        ));
        assert!(matches!(
            "ABC|D".parse::<Topology>(),
            Err(TopologyError::SideSize(_))
        ));
        assert!(matches!(
            "AB|AD".parse::<Topology>(),
            Err(TopologyError::RepeatedGenome(_))
        ));
    }

    #[test]
    fn test_same_quartet_ignores_order() {
        let a: Topology = "AB|CD".parse().unwrap();
        let b: Topology = "DC|BA".parse().unwrap();
        let c: Topology = "AC|BD".parse().unwrap();
        assert!(a.same_quartet(&b));
        assert!(!a.same_quartet(&c));
    }

    #[test]
    fn test_keeps_together() {
        let topology: Topology = "AB|CD".parse().unwrap();
        assert!(topology.keeps_together(&Multicolor::from_labels(["A", "B"])));
        assert!(topology.keeps_together(&Multicolor::from_labels(["D", "C"])));
        assert!(!topology.keeps_together(&Multicolor::from_labels(["A", "C"])));
    }

    #[test]
    fn test_topology_serde_round_trip() {
        let topology: Topology = "AD|CB".parse().unwrap();
        let json = serde_json::to_string(&topology).unwrap();
        assert_eq!(json, "\"AD|CB\"");
        let back: Topology = serde_json::from_str(&json).unwrap();
        assert_eq!(back, topology);
    }

    #[test]
    fn test_universe_of_topology() {
        let topology = &Topology::quartet_topologies()[2];
        assert_eq!(GenomeUniverse::of_topology(topology), GenomeUniverse::quartet());
    }
}
