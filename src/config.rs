//! Pipeline configuration.

use crate::community::WeightFunction;
use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of words kept after ranking.
pub const DEFAULT_MAX_WORDS: usize = 100;
/// Default number of nearest neighbors per word.
pub const DEFAULT_N_NEIGHBORS: usize = 10;

/// Knobs for [`compute_tree`](crate::compute_tree).
///
/// Deserializes from partial input: missing fields take their defaults, so a
/// transport can feed query parameters straight in.
///
/// ```rust
/// use wordtree::PipelineConfig;
///
/// let config: PipelineConfig = serde_json::from_str(r#"{"max_words": 50}"#).unwrap();
/// assert_eq!(config.max_words, 50);
/// assert_eq!(config.n_neighbors, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of ranked words to place in the graph (default: 100).
    #[serde(alias = "words")]
    pub max_words: usize,
    /// Neighbors per word in the kNN graph (default: 10).
    pub n_neighbors: usize,
    /// Distance metric between word vectors (default: cosine).
    #[serde(alias = "distance_metric")]
    pub metric: DistanceMetric,
    /// How edge distances become clustering weights (default: raw distance).
    pub edge_weight: WeightFunction,
    /// Louvain resolution γ (default: 1.0).
    pub resolution: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            n_neighbors: DEFAULT_N_NEIGHBORS,
            metric: DistanceMetric::Cosine,
            edge_weight: WeightFunction::Distance,
            resolution: 1.0,
        }
    }
}

impl PipelineConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the word budget.
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    /// Set the neighbor count.
    pub fn with_n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the distance metric by name (`"cosine"`, `"euclidean"`, ...).
    pub fn with_metric_name(self, name: &str) -> Result<Self> {
        Ok(self.with_metric(name.parse()?))
    }

    /// Set the edge weight function.
    pub fn with_edge_weight(mut self, edge_weight: WeightFunction) -> Self {
        self.edge_weight = edge_weight;
        self
    }

    /// Set the Louvain resolution.
    ///
    /// Higher values produce smaller communities.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Reject configurations that cannot produce a graph.
    pub fn validate(&self) -> Result<()> {
        if self.max_words == 0 {
            return Err(Error::InvalidParameter {
                name: "max_words",
                message: "must be positive",
            });
        }
        if self.n_neighbors == 0 {
            return Err(Error::InvalidParameter {
                name: "n_neighbors",
                message: "must be positive",
            });
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(Error::InvalidParameter {
                name: "resolution",
                message: "must be a positive finite number",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = PipelineConfig::default();
        assert_eq!(c.max_words, 100);
        assert_eq!(c.n_neighbors, 10);
        assert_eq!(c.metric, DistanceMetric::Cosine);
        assert_eq!(c.edge_weight, WeightFunction::Distance);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_budgets() {
        let err = PipelineConfig::new().with_max_words(0).validate().unwrap_err();
        assert!(err.is_invalid_config());
        let err = PipelineConfig::new()
            .with_n_neighbors(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                name: "n_neighbors",
                ..
            }
        ));
        assert!(PipelineConfig::new()
            .with_resolution(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_metric_name() {
        let c = PipelineConfig::new().with_metric_name("euclidean").unwrap();
        assert_eq!(c.metric, DistanceMetric::Euclidean);
        assert!(PipelineConfig::new().with_metric_name("bogus").is_err());
    }

    #[test]
    fn test_deserialize_query_style() {
        let c: PipelineConfig =
            serde_json::from_str(r#"{"words": 20, "n_neighbors": 3, "distance_metric": "cityblock"}"#)
                .unwrap();
        assert_eq!(c.max_words, 20);
        assert_eq!(c.n_neighbors, 3);
        assert_eq!(c.metric, DistanceMetric::Cityblock);
        assert_eq!(c.resolution, 1.0);

        let bad = serde_json::from_str::<PipelineConfig>(r#"{"metric": "nope"}"#);
        assert!(bad.is_err());
    }
}
