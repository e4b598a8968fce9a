//! kNN similarity graph construction over ranked words.
//!
//! This module bridges word embeddings to community detection. Given the
//! selected vocabulary, it constructs a k-nearest neighbor graph where:
//! - Each word becomes a node carrying its word and selection score
//! - Edges connect each word to its k nearest neighbors
//! - Edge weights are the embedding distances (smaller = more similar)
//!
//! ```text
//! Ranked words → vectors → distance matrix → kNN graph → Louvain → dendrogram
//! ```
//!
//! # Construction
//!
//! A kNN graph G = (V, E) is constructed as:
//! - V = {v_1, ..., v_n} where v_i is the i-th ranked word
//! - E = {{v_i, v_j} : v_j ∈ kNN(v_i) or v_i ∈ kNN(v_j)}
//!
//! The edge set is the *union* of both directions, so the graph is undirected
//! without dropping one-sided neighbor relations. kNN is exact: for the
//! vocabulary sizes involved (a few hundred words at most) a full distance
//! matrix is cheaper than building an approximate index.
//!
//! # Edge weights for clustering
//!
//! The graph stores raw distances. How those become modularity weights is
//! chosen at clustering time with [`WeightFunction`]:
//! - **Distance**: w = d (default; the distance is used as-is)
//! - **Similarity**: w = 1 − d, floored at 0.001
//! - **InverseDistance**: w = 1 / (1 + d)
//! - **GaussianKernel**: w = exp(−d² / σ²), σ = median edge distance
//! - **Uniform**: w = 1

use crate::distance::{DistanceMatrix, DistanceMetric};
use crate::embedding::EmbeddingSpace;
use crate::error::Result;
use crate::select::RankedWord;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Node payload of a [`SimilarityGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordNode {
    /// The word.
    pub word: String,
    /// Its selection score.
    pub weight: f64,
}

/// Undirected kNN graph over words; edge weights are embedding distances.
///
/// Node index `i` is the i-th ranked word.
pub type SimilarityGraph = UnGraph<WordNode, f64>;

/// Configuration for kNN graph construction.
#[derive(Debug, Clone)]
pub struct KnnGraphConfig {
    /// Number of neighbors per node (default: 10)
    pub k: usize,
    /// Distance metric (default: cosine)
    pub metric: DistanceMetric,
}

impl Default for KnnGraphConfig {
    fn default() -> Self {
        Self {
            k: 10,
            metric: DistanceMetric::Cosine,
        }
    }
}

/// How to compute clustering weights from edge distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightFunction {
    /// w = distance
    #[default]
    Distance,
    /// w = 1 - distance (for cosine distance in [0, 2])
    Similarity,
    /// w = 1 / (1 + distance)
    InverseDistance,
    /// w = exp(-distance² / σ²) where σ is the median distance
    GaussianKernel,
    /// w = 1.0 (unweighted)
    Uniform,
}

impl WeightFunction {
    /// Weight for one edge. `sigma` is only read by the Gaussian kernel.
    pub fn apply(self, distance: f64, sigma: f64) -> f64 {
        match self {
            WeightFunction::Distance => distance,
            // Clamp to ensure positive weights (distance=0 -> weight=1)
            WeightFunction::Similarity => (1.0 - distance).max(0.001),
            WeightFunction::InverseDistance => 1.0 / (1.0 + distance),
            WeightFunction::GaussianKernel => {
                if sigma > 0.0 {
                    (-distance * distance / (sigma * sigma)).exp()
                } else {
                    1.0
                }
            }
            WeightFunction::Uniform => 1.0,
        }
    }

    /// Map a list of distances to weights, estimating σ from the list itself.
    pub fn apply_all(self, distances: &[f64]) -> Vec<f64> {
        let sigma = if matches!(self, WeightFunction::GaussianKernel) {
            median(distances).unwrap_or(1.0)
        } else {
            1.0
        };
        distances.iter().map(|&d| self.apply(d, sigma)).collect()
    }
}

fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.get(sorted.len() / 2).copied()
}

/// Indices of the `k` nearest other items for every row of `distances`.
///
/// Ties are broken by lower index. Rows with fewer than `k` other items get
/// all of them.
pub fn nearest_neighbors(distances: &DistanceMatrix, k: usize) -> Vec<Vec<usize>> {
    let n = distances.len();
    let k = k.min(n.saturating_sub(1)); // Can't have more neighbors than n-1
    (0..n)
        .map(|i| {
            let row = distances.row(i);
            let mut others: Vec<usize> = (0..n).filter(|&j| j != i).collect();
            others.sort_by(|&a, &b| row[a].total_cmp(&row[b]).then(a.cmp(&b)));
            others.truncate(k);
            others
        })
        .collect()
}

/// Build the similarity graph for `words` with default settings and `k`
/// neighbors.
pub fn knn_graph_from_embeddings<E>(words: &[RankedWord], embeddings: &E, k: usize) -> Result<SimilarityGraph>
where
    E: EmbeddingSpace + ?Sized,
{
    knn_graph_with_config(
        words,
        embeddings,
        &KnnGraphConfig {
            k,
            ..Default::default()
        },
    )
}

/// Build the similarity graph with full configuration options.
///
/// # Errors
///
/// Propagates embedding lookup failures and returns
/// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if the
/// vectors differ in length. An empty word list yields an empty graph.
pub fn knn_graph_with_config<E>(
    words: &[RankedWord],
    embeddings: &E,
    config: &KnnGraphConfig,
) -> Result<SimilarityGraph>
where
    E: EmbeddingSpace + ?Sized,
{
    let vectors = words
        .iter()
        .map(|w| embeddings.vector(&w.word))
        .collect::<Result<Vec<&[f32]>>>()?;
    let distances = DistanceMatrix::compute(&vectors, config.metric)?;
    let neighbors = nearest_neighbors(&distances, config.k);

    // Union of both directions, ordered so edge insertion is deterministic.
    let mut pairs: BTreeSet<(usize, usize)> = BTreeSet::new();
    for (i, list) in neighbors.iter().enumerate() {
        for &j in list {
            let _ = pairs.insert((i.min(j), i.max(j)));
        }
    }

    let mut graph = SimilarityGraph::with_capacity(words.len(), pairs.len());
    for w in words {
        let _ = graph.add_node(WordNode {
            word: w.word.clone(),
            weight: w.score,
        });
    }
    for (i, j) in pairs {
        let _ = graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), distances.get(i, j));
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        k = config.k,
        metric = %config.metric,
        "built kNN graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::InMemoryEmbeddings;
    use crate::Error;
    use petgraph::visit::EdgeRef;

    fn ranked(words: &[&str]) -> Vec<RankedWord> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| RankedWord {
                word: (*w).to_string(),
                score: 1.0 / (i + 1) as f64,
            })
            .collect()
    }

    fn clustered_space() -> InMemoryEmbeddings {
        let mut space = InMemoryEmbeddings::new();
        // Cluster 1
        space.insert("cat", vec![1.0, 0.0, 0.0], 10).unwrap();
        space.insert("dog", vec![0.9, 0.1, 0.0], 10).unwrap();
        space.insert("cow", vec![0.95, 0.05, 0.0], 10).unwrap();
        // Cluster 2
        space.insert("car", vec![0.0, 1.0, 0.0], 10).unwrap();
        space.insert("bus", vec![0.1, 0.9, 0.0], 10).unwrap();
        space.insert("van", vec![0.05, 0.95, 0.0], 10).unwrap();
        space
    }

    #[test]
    fn test_knn_graph_basic() {
        let words = ranked(&["cat", "dog", "cow", "car", "bus", "van"]);
        let graph = knn_graph_from_embeddings(&words, &clustered_space(), 2).unwrap();

        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph[NodeIndex::new(3)].word, "car");
        assert_eq!(graph[NodeIndex::new(0)].weight, 1.0);

        // Each triple is its own 2-NN neighborhood: two triangles, no bridge.
        assert_eq!(graph.edge_count(), 6);
        for edge in graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            assert_eq!(a < 3, b < 3, "edge {a}-{b} crosses clusters");
        }
    }

    #[test]
    fn test_knn_graph_empty() {
        let graph = knn_graph_from_embeddings(&[], &clustered_space(), 5).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_knn_graph_single_point() {
        let graph = knn_graph_from_embeddings(&ranked(&["cat"]), &clustered_space(), 5).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_small_graph_is_complete() {
        // Fewer than k + 1 words: everyone is everyone's neighbor.
        let words = ranked(&["cat", "dog", "car"]);
        let graph = knn_graph_from_embeddings(&words, &clustered_space(), 10).unwrap();
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_union_symmetrization() {
        // 1-D points: a=0, b=1, c=3, d=10.
        // kNN(d) = c but kNN(c) = b, so {c,d} exists only via d's query.
        let mut space = InMemoryEmbeddings::new();
        for (w, x) in [("a", 0.0), ("b", 1.0), ("c", 3.0), ("d", 10.0)] {
            space.insert(w, vec![x], 1).unwrap();
        }
        let config = KnnGraphConfig {
            k: 1,
            metric: DistanceMetric::Euclidean,
        };
        let graph = knn_graph_with_config(&ranked(&["a", "b", "c", "d"]), &space, &config).unwrap();

        let c = NodeIndex::new(2);
        let d = NodeIndex::new(3);
        let edge = graph.find_edge(c, d).expect("union keeps one-sided neighbors");
        assert_eq!(graph[edge], 7.0);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_edge_weights_are_distances() {
        let words = ranked(&["cat", "dog", "car"]);
        let space = clustered_space();
        let graph = knn_graph_from_embeddings(&words, &space, 2).unwrap();
        for edge in graph.edge_references() {
            let a = &graph[edge.source()].word;
            let b = &graph[edge.target()].word;
            let expected = DistanceMetric::Cosine
                .distance(space.vector(a).unwrap(), space.vector(b).unwrap());
            assert_eq!(*edge.weight(), expected);
            assert!(*edge.weight() >= 0.0);
            assert_ne!(edge.source(), edge.target());
        }
    }

    #[test]
    fn test_missing_word_propagates() {
        let err = knn_graph_from_embeddings(&ranked(&["cat", "unicorn"]), &clustered_space(), 2)
            .unwrap_err();
        assert!(matches!(err, Error::Embedding { .. }));
    }

    #[test]
    fn test_nearest_neighbors_tie_break() {
        let a = [0.0f32];
        let b = [1.0f32];
        let c = [-1.0f32];
        let dm = DistanceMatrix::compute(&[&a, &b, &c], DistanceMetric::Euclidean).unwrap();
        let nn = nearest_neighbors(&dm, 1);
        // b and c are equidistant from a: lower index wins.
        assert_eq!(nn[0], vec![1]);
        assert_eq!(nn[1], vec![0]);
        assert_eq!(nn[2], vec![0]);
    }

    #[test]
    fn test_weight_functions() {
        let distances = [0.0, 0.5, 1.5];
        for weight_fn in [
            WeightFunction::Similarity,
            WeightFunction::InverseDistance,
            WeightFunction::GaussianKernel,
            WeightFunction::Uniform,
        ] {
            for w in weight_fn.apply_all(&distances) {
                assert!(w > 0.0, "Weight should be positive for {:?}", weight_fn);
            }
        }
        assert_eq!(WeightFunction::Distance.apply_all(&distances), distances.to_vec());
        assert_eq!(WeightFunction::Similarity.apply(1.5, 1.0), 0.001);
    }
}
