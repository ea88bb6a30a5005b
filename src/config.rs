//! Run configuration.
//!
//! A run is described by a small JSON document; every field is optional:
//!
//! ```json
//! {
//!   "topologies": ["AB|CD", "AC|BD", "AD|CB"],
//!   "correct_topology": "AB|CD",
//!   "metrics": ["distribution", "mca", "cumulative"],
//!   "threads": 4
//! }
//! ```
//!
//! [`RunConfig::resolve`] validates it into an [`EvaluationPlan`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::types::{GenomeUniverse, Topology, TopologyError};
use crate::metrics::{EvaluationEngine, Metric};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("No candidate topologies configured")]
    NoTopologies,

    #[error("No metrics configured")]
    NoMetrics,

    #[error("Topology {topology} does not span the genomes {universe} of the other candidates")]
    MixedGenomes {
        topology: String,
        universe: GenomeUniverse,
    },

    #[error("Thread count must be at least 1")]
    ZeroThreads,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Candidate topology descriptors
    pub topologies: Vec<String>,
    /// Descriptor of the topology the data was simulated from
    pub correct_topology: String,
    /// Metrics to run; all of them when absent
    pub metrics: Option<Vec<Metric>>,
    /// Worker threads for batch runs; rayon's default when absent
    pub threads: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            topologies: Topology::quartet_topologies()
                .iter()
                .map(ToString::to_string)
                .collect(),
            correct_topology: "AB|CD".to_string(),
            metrics: None,
            threads: None,
        }
    }
}

impl RunConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read, or
    /// `ConfigError::ParseError` if it is not valid config JSON.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if `json` is not valid config JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate descriptors and build the plan a run executes
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Topology` for a malformed descriptor, or another
    /// variant for an empty topology or metric list, candidates over different
    /// genomes, or a zero thread count.
    pub fn resolve(&self) -> Result<EvaluationPlan, ConfigError> {
        let topologies = self
            .topologies
            .iter()
            .map(|s| s.parse::<Topology>())
            .collect::<Result<Vec<_>, _>>()?;

        let Some(first) = topologies.first() else {
            return Err(ConfigError::NoTopologies);
        };
        let universe = GenomeUniverse::of_topology(first);
        if let Some(stray) = topologies
            .iter()
            .find(|t| GenomeUniverse::of_topology(t) != universe)
        {
            return Err(ConfigError::MixedGenomes {
                topology: stray.to_string(),
                universe,
            });
        }

        let correct: Topology = self.correct_topology.parse()?;

        let engine = match &self.metrics {
            Some(metrics) if metrics.is_empty() => return Err(ConfigError::NoMetrics),
            Some(metrics) => EvaluationEngine::with_metrics(metrics.clone()),
            None => EvaluationEngine::new(),
        };

        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }

        Ok(EvaluationPlan {
            topologies,
            correct,
            universe,
            engine,
            threads: self.threads,
        })
    }
}

/// A validated run: what to score, against what, and with which metrics
#[derive(Debug, Clone)]
pub struct EvaluationPlan {
    pub topologies: Vec<Topology>,
    pub correct: Topology,
    pub universe: GenomeUniverse,
    pub engine: EvaluationEngine,
    pub threads: Option<usize>,
}

impl EvaluationPlan {
    #[must_use]
    pub fn metrics(&self) -> &[Metric] {
        self.engine.metrics()
    }
}

impl Default for EvaluationPlan {
    fn default() -> Self {
        let topologies = Topology::quartet_topologies().to_vec();
        let correct = topologies[0].clone();
        Self {
            universe: GenomeUniverse::of_topology(&correct),
            topologies,
            correct,
            engine: EvaluationEngine::new(),
            threads: None,
        }
    }
}
