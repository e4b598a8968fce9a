//! Community detection traits.

use crate::error::Result;
use crate::hierarchy::Dendrogram;
use petgraph::graph::UnGraph;

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Detect communities in a weighted graph.
    ///
    /// Returns a mapping from node index to community ID.
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>
    where
        E: Copy + Into<f64>;
}

/// Community detection that exposes every level of its coarsening.
pub trait HierarchicalDetection: CommunityDetection {
    /// Partitions from finest to coarsest.
    fn dendrogram<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Dendrogram>
    where
        E: Copy + Into<f64>;
}
