//! Hierarchical structures for the word tree.
//!
//! Clustering produces a [`Dendrogram`]: a stack of [`Partition`]s, each
//! mapping the nodes of one level onto the communities of the next.
//! [`assemble_tree`] flattens it into parent-pointer [`TreeNode`] records:
//!
//! ```text
//! Level 2:            [2-0]            synthetic root
//!                    /     \
//! Level 1:       [1-0]     [1-1]       communities of communities
//!                /   \       |
//! Level 0:   [0-0] [0-1]   [0-2]       words
//!             cat   dog     car
//! ```
//!
//! Key property: following `parentId` from any leaf reaches the root, and
//! levels strictly increase on the way up. [`validate_tree`] checks exactly
//! that.

mod dendrogram;
mod tree;
mod validate;

pub use dendrogram::{Dendrogram, Partition};
pub use tree::{assemble_tree, node_id, parse_node_id, TreeNode};
pub use validate::{
    validate_tree, HealthCheck, HealthReport, Severity, ValidationIssue, ValidationReport,
};
