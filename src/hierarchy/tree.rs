//! Parent-pointer word tree assembled from a dendrogram.
//!
//! The output is a flat list of records, ready for a zoomable tree renderer:
//!
//! ```text
//! {"id": "0-3", "parentId": "1-0", "word": "cat", "weight": 0.12}
//! {"id": "1-0", "parentId": "2-0"}
//! {"id": "2-0", "parentId": null}
//! ```
//!
//! Ids are `"{level}-{node}"`. Level 0 holds one leaf per graph node; level
//! `i + 1` holds the communities of level `i`; a synthetic level on top
//! gathers every remaining community under the single root.

use super::dendrogram::{Dendrogram, Partition};
use crate::community::SimilarityGraph;
use crate::error::{Error, Result};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// One record of the assembled tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// `"{level}-{node}"`.
    pub id: String,
    /// Id of the parent one level up; `None` only for the root.
    pub parent_id: Option<String>,
    /// Word, on leaves only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    /// Selection score, on leaves only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Format a tree node id.
pub fn node_id(level: usize, node: usize) -> String {
    format!("{level}-{node}")
}

/// Split a tree node id into `(level, node)`.
pub fn parse_node_id(id: &str) -> Option<(usize, usize)> {
    let (level, node) = id.split_once('-')?;
    Some((level.parse().ok()?, node.parse().ok()?))
}

impl TreeNode {
    /// Leaf for a word.
    pub fn leaf(node: usize, parent: usize, word: impl Into<String>, weight: f64) -> Self {
        Self {
            id: node_id(0, node),
            parent_id: Some(node_id(1, parent)),
            word: Some(word.into()),
            weight: Some(weight),
        }
    }

    /// Cluster node at `level` (≥ 1).
    pub fn cluster(level: usize, node: usize, parent: usize) -> Self {
        Self {
            id: node_id(level, node),
            parent_id: Some(node_id(level + 1, parent)),
            word: None,
            weight: None,
        }
    }

    /// The synthetic root at `level`.
    pub fn root(level: usize) -> Self {
        Self {
            id: node_id(level, 0),
            parent_id: None,
            word: None,
            weight: None,
        }
    }

    /// True for the root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// True for level-0 nodes.
    pub fn is_leaf(&self) -> bool {
        self.level() == Some(0)
    }

    /// Level encoded in the id.
    pub fn level(&self) -> Option<usize> {
        parse_node_id(&self.id).map(|(level, _)| level)
    }
}

/// Flatten a dendrogram over `graph` into tree records.
///
/// Records are emitted level by level, nodes in ascending id order, and the
/// root last. An empty graph yields the root alone; a graph that never merged
/// hangs every leaf directly off the root.
pub fn assemble_tree(dendrogram: &Dendrogram, graph: &SimilarityGraph) -> Result<Vec<TreeNode>> {
    if dendrogram.n_items() != graph.node_count() {
        return Err(Error::DimensionMismatch {
            expected: graph.node_count(),
            found: dendrogram.n_items(),
        });
    }

    let top = Partition::all_in_one(dendrogram.top_node_count());
    let levels: Vec<&Partition> = dendrogram.levels().chain(std::iter::once(&top)).collect();

    let total: usize = levels.iter().map(|p| p.len()).sum();
    let mut nodes = Vec::with_capacity(total + 1);
    for (level, partition) in levels.iter().enumerate() {
        for (node, community) in partition.iter() {
            if level == 0 {
                let word = &graph[NodeIndex::new(node)];
                nodes.push(TreeNode::leaf(node, community, word.word.clone(), word.weight));
            } else {
                nodes.push(TreeNode::cluster(level, node, community));
            }
        }
    }
    nodes.push(TreeNode::root(levels.len()));

    Ok(nodes)
}
