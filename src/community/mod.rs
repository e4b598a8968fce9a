//! Similarity graphs and community detection.
//!
//! Given the selected vocabulary, build a kNN graph over the word vectors
//! and find natural groupings where words within groups are densely
//! connected, and connections between groups are sparse.
//!
//! ## The Modularity Objective
//!
//! Louvain optimizes **modularity** Q, which compares the actual edge weight
//! within communities to the expected weight in a random graph with the same
//! degree sequence:
//!
//! ```text
//! Q = (1/2m) × Σ[A_ij - γ(k_i × k_j)/(2m)] × δ(c_i, c_j)
//! ```
//!
//! Where:
//! - m = total edge weight (sum of all edges)
//! - A_ij = edge weight between i and j
//! - k_i = weighted degree of node i
//! - γ = resolution parameter
//! - δ(c_i, c_j) = 1 if i and j are in same community
//!
//! **Intuition**: For each pair in the same community, we add (actual edges) -
//! (expected edges). A good partition has Q > 0, meaning more internal edges
//! than expected by chance.
//!
//! ## The Resolution Parameter γ
//!
//! - **γ = 1**: Standard modularity (default)
//! - **γ > 1**: Smaller communities (higher penalty for merging)
//! - **γ < 1**: Larger communities (lower penalty for merging)
//!
//! ## Usage
//!
//! ```rust
//! use petgraph::graph::UnGraph;
//! use wordtree::community::{CommunityDetection, Louvain};
//!
//! let mut graph = UnGraph::<(), f64>::new_undirected();
//! let a = graph.add_node(());
//! let b = graph.add_node(());
//! let c = graph.add_node(());
//! graph.add_edge(a, b, 1.0);
//! graph.add_edge(b, c, 1.0);
//! graph.add_edge(a, c, 1.0);
//!
//! let communities = Louvain::new().detect(&graph).unwrap();
//! assert_eq!(communities, vec![0, 0, 0]);
//! ```
//!
//! ## References
//!
//! - Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."

mod knn_graph;
mod louvain;
mod traits;

pub use knn_graph::{
    knn_graph_from_embeddings, knn_graph_with_config, nearest_neighbors, KnnGraphConfig,
    SimilarityGraph, WeightFunction, WordNode,
};
pub use louvain::Louvain;
pub use traits::{CommunityDetection, HierarchicalDetection};
