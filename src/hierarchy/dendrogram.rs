//! Dendrogram of multi-level community partitions.
//!
//! A dendrogram produced by multi-level modularity optimization is a stack of
//! partitions. Level 0 maps the original graph nodes to first-level
//! communities; level `i` maps the communities of level `i - 1` to coarser
//! communities.
//!
//! ```text
//! level 1:      0           1        communities of communities
//!             /   \         |
//! level 0:   0     1        2        communities of words
//!           / \   / \      / \
//! nodes:   0   1 2   3    4   5
//! ```
//!
//! Each level strictly reduces the node count, so a dendrogram over `n`
//! items has at most `n - 1` levels.

use crate::error::{Error, Result};

/// One dendrogram level: node id → community id at the next level up.
///
/// Community ids are dense (`0..n_communities`) and numbered in order of
/// first appearance when scanning nodes by ascending id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    assignments: Vec<usize>,
    n_communities: usize,
}

impl Partition {
    /// Build from arbitrary community labels, renumbering them densely.
    pub fn from_labels(labels: &[usize]) -> Self {
        let (assignments, n_communities) = renumber(labels);
        Self {
            assignments,
            n_communities,
        }
    }

    /// Every node in community 0.
    pub fn all_in_one(n: usize) -> Self {
        Self {
            assignments: vec![0; n],
            n_communities: usize::from(n > 0),
        }
    }

    /// Number of nodes at this level.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// True if the level has no nodes.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of distinct communities.
    pub fn n_communities(&self) -> usize {
        self.n_communities
    }

    /// Community labels indexed by node.
    pub fn as_slice(&self) -> &[usize] {
        &self.assignments
    }

    /// `(node, community)` pairs by ascending node id.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.assignments.iter().copied().enumerate()
    }
}

/// Renumber labels to consecutive integers in first-appearance order.
fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut next = 0;
    let mut mapping = std::collections::HashMap::new();
    let out = labels
        .iter()
        .map(|&l| {
            *mapping.entry(l).or_insert_with(|| {
                let id = next;
                next += 1;
                id
            })
        })
        .collect();
    (out, next)
}

/// Stack of partitions, finest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dendrogram {
    levels: Vec<Partition>,
    n_items: usize,
}

impl Dendrogram {
    /// Create an empty dendrogram over `n_items` original nodes.
    pub fn new(n_items: usize) -> Self {
        Self {
            levels: Vec::new(),
            n_items,
        }
    }

    /// Append a coarser level.
    ///
    /// The partition must cover exactly the nodes of the current top level.
    pub fn push_level(&mut self, partition: Partition) -> Result<()> {
        let expected = self.top_node_count();
        if partition.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: partition.len(),
            });
        }
        self.levels.push(partition);
        Ok(())
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of recorded levels.
    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// True if no level was recorded.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Partition at `level`.
    pub fn level(&self, level: usize) -> Option<&Partition> {
        self.levels.get(level)
    }

    /// Iterate over levels, finest first.
    pub fn levels(&self) -> impl Iterator<Item = &Partition> {
        self.levels.iter()
    }

    /// Nodes at the top of the stack: the last level's communities, or the
    /// original items when no level is recorded.
    pub fn top_node_count(&self) -> usize {
        self.levels
            .last()
            .map(Partition::n_communities)
            .unwrap_or(self.n_items)
    }

    /// Community of every original item after applying levels `0..=level`.
    ///
    /// Levels past the end are clamped to the coarsest level; an empty
    /// dendrogram yields the identity labelling.
    pub fn partition_at_level(&self, level: usize) -> Vec<usize> {
        let mut labels: Vec<usize> = (0..self.n_items).collect();
        for partition in self.levels.iter().take(level.saturating_add(1)) {
            for label in labels.iter_mut() {
                *label = partition.as_slice()[*label];
            }
        }
        labels
    }

    /// Coarsest community of every original item.
    pub fn best_partition(&self) -> Vec<usize> {
        self.partition_at_level(self.levels.len().saturating_sub(1))
    }

    /// Number of nodes at every level, starting with the original items and
    /// ending with the top node count.
    pub fn node_counts(&self) -> Vec<usize> {
        std::iter::once(self.n_items)
            .chain(self.levels.iter().map(Partition::n_communities))
            .collect()
    }
}
