//! # wordtree
//!
//! Hierarchical word clouds: rank a document's distinctive vocabulary, link
//! the words into a kNN similarity graph over their embeddings, and coarsen
//! that graph with multi-level Louvain into a tree of clusters-of-clusters.
//!
//! ```text
//! tokens → TokenCounts → select_words → kNN graph → Louvain dendrogram → TreeNode records
//! ```
//!
//! ```rust
//! use wordtree::{compute_tree, InMemoryEmbeddings, PipelineConfig};
//!
//! let embeddings = InMemoryEmbeddings::new()
//!     .with_word("cat", vec![1.0, 0.1], 500)?
//!     .with_word("dog", vec![0.9, 0.2], 400)?
//!     .with_word("car", vec![0.1, 1.0], 900)?;
//!
//! let tree = compute_tree(["cat", "dog", "cat", "car"], &embeddings, &PipelineConfig::default())?;
//! assert!(tree.last().unwrap().parent_id.is_none());
//! # Ok::<(), wordtree::Error>(())
//! ```

pub mod community;
pub mod config;
pub mod distance;
pub mod embedding;
/// Error types used across `wordtree`.
pub mod error;
pub mod hierarchy;
mod pipeline;
pub mod select;
pub mod tokenize;

pub use community::{
    knn_graph_from_embeddings, knn_graph_with_config, CommunityDetection, KnnGraphConfig,
    Louvain, SimilarityGraph, WeightFunction, WordNode,
};
pub use config::PipelineConfig;
pub use distance::{DistanceMatrix, DistanceMetric};
pub use embedding::{EmbeddingSpace, InMemoryEmbeddings};
pub use error::{Error, Result};
pub use hierarchy::{assemble_tree, validate_tree, Dendrogram, Partition, TreeNode};
pub use pipeline::{
    build_word_tree, compute_tree, compute_tree_from_text, compute_tree_json, WordTree,
};
pub use select::{select_words, RankedWord};
pub use tokenize::{SimpleTokenizer, TokenCounts, Tokenizer};
