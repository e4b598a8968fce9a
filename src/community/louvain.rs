//! Louvain algorithm for community detection.
//!
//! Fast modularity optimization through local node moves and graph aggregation.
//!
//! ## The Algorithm (Blondel et al. 2008)
//!
//! Louvain is a multi-level, greedy modularity optimization algorithm:
//!
//! 1. **Phase 1 (Local Moving)**: Start with each node in its own community.
//!    Repeatedly move nodes to neighboring community with highest modularity
//!    gain until no improvement.
//!
//! 2. **Phase 2 (Aggregation)**: Build a meta-graph where communities become
//!    single nodes. Edge weights are sums of edges between communities.
//!    Self-loops represent internal community edges.
//!
//! 3. **Iterate**: Repeat phases 1-2 on the meta-graph until modularity
//!    stops improving.
//!
//! Every level that merged something is recorded, which yields a
//! [`Dendrogram`] of clusters-of-clusters rather than a single flat labelling.
//!
//! ## Determinism
//!
//! Nodes are visited in ascending index order at every level, candidate
//! communities are scanned in ascending id order, and a node only moves when
//! the best gain strictly beats staying put. Equal gains go to the lowest
//! community id. The same graph always produces the same dendrogram.
//!
//! ## References
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! Journal of Statistical Mechanics: Theory and Experiment, P10008.

use super::knn_graph::WeightFunction;
use super::traits::{CommunityDetection, HierarchicalDetection};
use crate::error::{Error, Result};
use crate::hierarchy::{Dendrogram, Partition};
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;

/// Gains closer than this are treated as equal.
const GAIN_EPSILON: f64 = 1e-12;

/// Weighted graph at one level of the coarsening.
#[derive(Debug, Clone)]
struct LevelGraph {
    n: usize,
    /// Inter-node edges `(i, j, w)` with `i < j`.
    edges: Vec<(usize, usize, f64)>,
    /// Intra-node weight carried up from finer levels.
    self_loops: Vec<f64>,
}

impl LevelGraph {
    fn from_graph<N, E>(graph: &UnGraph<N, E>, weight_fn: WeightFunction) -> Result<Self>
    where
        E: Copy + Into<f64>,
    {
        let n = graph.node_count();
        let raw: Vec<(usize, usize, f64)> = graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), (*e.weight()).into()))
            .collect();
        if raw.iter().any(|&(_, _, w)| !w.is_finite() || w < 0.0) {
            return Err(Error::InvalidParameter {
                name: "edge weight",
                message: "must be finite and non-negative",
            });
        }

        let distances: Vec<f64> = raw.iter().map(|&(_, _, w)| w).collect();
        let weights = weight_fn.apply_all(&distances);

        let mut edges = Vec::with_capacity(raw.len());
        let mut self_loops = vec![0.0; n];
        for (&(i, j, _), w) in raw.iter().zip(weights) {
            if i == j {
                self_loops[i] += w;
            } else {
                edges.push((i.min(j), i.max(j), w));
            }
        }
        Ok(Self {
            n,
            edges,
            self_loops,
        })
    }

    /// Total edge weight m (each edge once, plus self-loops).
    fn total_weight(&self) -> f64 {
        self.edges.iter().map(|&(_, _, w)| w).sum::<f64>() + self.self_loops.iter().sum::<f64>()
    }

    /// Weighted degrees; self-loops count twice.
    fn degrees(&self) -> Vec<f64> {
        let mut degrees: Vec<f64> = self.self_loops.iter().map(|&sl| 2.0 * sl).collect();
        for &(i, j, w) in &self.edges {
            degrees[i] += w;
            degrees[j] += w;
        }
        degrees
    }

    fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![Vec::new(); self.n];
        for &(i, j, w) in &self.edges {
            adj[i].push((j, w));
            adj[j].push((i, w));
        }
        adj
    }
}

/// Louvain community detection algorithm.
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Resolution parameter (gamma).
    resolution: f64,
    /// Maximum local-moving sweeps per level.
    max_iter: usize,
    /// Maximum levels of aggregation (default: node count).
    max_levels: Option<usize>,
    /// Minimum modularity improvement to continue.
    min_modularity_gain: f64,
    /// How edge weights become modularity weights.
    weight_fn: WeightFunction,
}

impl Louvain {
    /// Create a new Louvain detector with default settings.
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            max_iter: 100,
            max_levels: None,
            min_modularity_gain: 1e-7,
            weight_fn: WeightFunction::Distance,
        }
    }

    /// Set resolution parameter.
    ///
    /// Higher values produce smaller communities.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set maximum local-moving sweeps per level.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set maximum aggregation levels.
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = Some(levels);
        self
    }

    /// Set the minimum modularity improvement for another sweep or level.
    pub fn with_min_modularity_gain(mut self, gain: f64) -> Self {
        self.min_modularity_gain = gain;
        self
    }

    /// Set how edge weights are turned into modularity weights.
    pub fn with_weight_fn(mut self, weight_fn: WeightFunction) -> Self {
        self.weight_fn = weight_fn;
        self
    }

    /// Modularity of `labels` (community per node) on `graph`.
    pub fn modularity<N, E>(&self, graph: &UnGraph<N, E>, labels: &[usize]) -> Result<f64>
    where
        E: Copy + Into<f64>,
    {
        if labels.len() != graph.node_count() {
            return Err(Error::DimensionMismatch {
                expected: graph.node_count(),
                found: labels.len(),
            });
        }
        let level = LevelGraph::from_graph(graph, self.weight_fn)?;
        Ok(self.modularity_weighted(&level, labels))
    }

    /// Compute modularity of a weighted graph partition.
    ///
    /// `Q = Σ_c [ in_c / m − γ (tot_c / 2m)² ]`
    fn modularity_weighted(&self, graph: &LevelGraph, communities: &[usize]) -> f64 {
        let m = graph.total_weight();
        if m <= 0.0 {
            return 0.0;
        }
        let degrees = graph.degrees();
        let n_comm = communities.iter().max().map_or(0, |&c| c + 1);

        let mut internal = vec![0.0; n_comm];
        let mut total = vec![0.0; n_comm];
        for (i, &c) in communities.iter().enumerate() {
            total[c] += degrees[i];
            internal[c] += graph.self_loops[i];
        }
        for &(i, j, w) in &graph.edges {
            if communities[i] == communities[j] {
                internal[communities[i]] += w;
            }
        }

        internal
            .iter()
            .zip(&total)
            .map(|(&inc, &tot)| inc / m - self.resolution * (tot / (2.0 * m)).powi(2))
            .sum()
    }

    /// Phase 1: Local moving on weighted graph.
    /// Returns (communities, improved).
    fn local_moving(&self, graph: &LevelGraph) -> (Vec<usize>, bool) {
        let n = graph.n;
        let m = graph.total_weight();
        if m <= 0.0 {
            return ((0..n).collect(), false);
        }

        let adj = graph.adjacency();
        let degrees = graph.degrees();

        let mut communities: Vec<usize> = (0..n).collect();
        let mut community_degrees = degrees.clone();
        let mut any_improved = false;
        let mut current_q = self.modularity_weighted(graph, &communities);

        for _iter in 0..self.max_iter {
            let mut improved = false;

            for node in 0..n {
                let current_community = communities[node];
                let ki = degrees[node];

                // Temporarily remove node from community
                community_degrees[current_community] -= ki;

                // Neighboring communities and their edge weights, by ascending id
                let mut community_weights: BTreeMap<usize, f64> = BTreeMap::new();
                for &(neighbor, w) in &adj[node] {
                    *community_weights.entry(communities[neighbor]).or_insert(0.0) += w;
                }

                let gain = |ki_in: f64, sigma_tot: f64| {
                    ki_in / m - self.resolution * sigma_tot * ki / (2.0 * m * m)
                };

                // Staying is the baseline; a move must strictly beat it.
                let mut best_community = current_community;
                let mut best_gain = gain(
                    community_weights
                        .get(&current_community)
                        .copied()
                        .unwrap_or(0.0),
                    community_degrees[current_community],
                );

                for (&target_comm, &ki_in) in &community_weights {
                    if target_comm == current_community {
                        continue;
                    }
                    let g = gain(ki_in, community_degrees[target_comm]);
                    if g > best_gain + GAIN_EPSILON {
                        best_gain = g;
                        best_community = target_comm;
                    }
                }

                community_degrees[best_community] += ki;
                if best_community != current_community {
                    communities[node] = best_community;
                    improved = true;
                    any_improved = true;
                }
            }

            if !improved {
                break;
            }
            let q = self.modularity_weighted(graph, &communities);
            if q - current_q < self.min_modularity_gain {
                break;
            }
            current_q = q;
        }

        (communities, any_improved)
    }

    /// Phase 2: Aggregate graph based on communities.
    fn aggregate(graph: &LevelGraph, partition: &Partition) -> LevelGraph {
        let n_new = partition.n_communities();
        let comm = partition.as_slice();

        // Aggregate self-loops (including edges within communities)
        let mut new_self_loops = vec![0.0; n_new];
        for (i, &sl) in graph.self_loops.iter().enumerate() {
            new_self_loops[comm[i]] += sl;
        }

        let mut new_edge_weights: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for &(i, j, w) in &graph.edges {
            let (ci, cj) = (comm[i], comm[j]);
            if ci == cj {
                new_self_loops[ci] += w;
            } else {
                *new_edge_weights
                    .entry((ci.min(cj), ci.max(cj)))
                    .or_insert(0.0) += w;
            }
        }

        LevelGraph {
            n: n_new,
            edges: new_edge_weights
                .into_iter()
                .map(|((i, j), w)| (i, j, w))
                .collect(),
            self_loops: new_self_loops,
        }
    }

    /// Run multi-level Louvain and record every coarsening level.
    ///
    /// Empty graphs, single nodes and graphs without positive edge weight
    /// produce an empty dendrogram.
    pub fn generate_dendrogram<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Dendrogram>
    where
        E: Copy + Into<f64>,
    {
        let n = graph.node_count();
        let mut dendrogram = Dendrogram::new(n);
        let mut current = LevelGraph::from_graph(graph, self.weight_fn)?;

        let max_levels = self.max_levels.unwrap_or(n);
        let mut prev_modularity = f64::NEG_INFINITY;
        let mut converged = false;

        for level in 0..max_levels {
            // Phase 1: Local moving
            let (labels, improved) = self.local_moving(&current);
            if !improved {
                converged = true;
                break;
            }

            let partition = Partition::from_labels(&labels);
            if partition.n_communities() == current.n {
                converged = true;
                break;
            }

            let mod_now = self.modularity_weighted(&current, partition.as_slice());
            if mod_now - prev_modularity < self.min_modularity_gain {
                converged = true;
                break;
            }
            prev_modularity = mod_now;

            tracing::debug!(
                level,
                nodes = current.n,
                communities = partition.n_communities(),
                modularity = mod_now,
                "louvain level"
            );

            // Phase 2: Aggregate
            current = Self::aggregate(&current, &partition);
            dendrogram.push_level(partition)?;
        }

        if !converged && n > 1 {
            tracing::warn!(
                max_levels,
                levels = dendrogram.n_levels(),
                "louvain stopped at the level limit before converging"
            );
        }

        Ok(dendrogram)
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for Louvain {
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>
    where
        E: Copy + Into<f64>,
    {
        Ok(self.generate_dendrogram(graph)?.best_partition())
    }
}

impl HierarchicalDetection for Louvain {
    fn dendrogram<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Dendrogram>
    where
        E: Copy + Into<f64>,
    {
        self.generate_dendrogram(graph)
    }
}
