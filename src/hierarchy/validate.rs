//! Tree validation and health checking.
//!
//! Verifies the structure of an assembled word tree:
//! - Exactly one root
//! - Every parent id resolves to a node in the same output
//! - Every chain of parents ends at the root (no cycles)
//! - Parents sit exactly one level above their children
//! - Leaves carry a word and a weight
//!
//! # Example
//!
//! ```rust
//! use wordtree::hierarchy::{validate_tree, TreeNode};
//!
//! let nodes = vec![TreeNode::leaf(0, 0, "cat", 1.0), TreeNode::root(1)];
//! let report = validate_tree(&nodes);
//! assert!(report.is_healthy(), "{}", report);
//! ```

use std::collections::HashMap;
use std::fmt;

use super::tree::TreeNode;

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Unusual but still a usable tree.
    Warning,
    /// A broken invariant.
    Error,
    /// The records do not form a tree at all.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        })
    }
}

/// A single problem found in a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: Severity,
    /// Id of the offending node, when one is to blame.
    pub node_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if let Some(id) = &self.node_id {
            write!(f, " (node {id})")?;
        }
        Ok(())
    }
}

/// Every issue found by [`validate_tree`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Issues in discovery order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn push(&mut self, severity: Severity, node_id: Option<&str>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity,
            node_id: node_id.map(str::to_owned),
            message: message.into(),
        });
    }

    /// No errors or critical issues.
    pub fn is_healthy(&self) -> bool {
        !self.issues.iter().any(|i| i.severity >= Severity::Error)
    }

    /// No issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "tree is valid");
        }
        writeln!(f, "{} issue(s):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

/// Validation plus shape statistics.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Validation issues.
    pub validation: ValidationReport,
    /// Total number of records.
    pub node_count: usize,
    /// Number of word leaves.
    pub leaf_count: usize,
    /// Level of the root, i.e. edges on every leaf-to-root path.
    pub max_depth: usize,
    /// Average number of children per non-leaf node.
    pub avg_branching_factor: f64,
}

impl HealthReport {
    /// No errors or critical issues.
    pub fn is_healthy(&self) -> bool {
        self.validation.is_healthy()
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} nodes, {} leaves, depth {}, branching {:.2}",
            self.node_count, self.leaf_count, self.max_depth, self.avg_branching_factor
        )?;
        write!(f, "{}", self.validation)
    }
}

/// Types that can be health-checked.
pub trait HealthCheck {
    /// Validate and summarize.
    fn health_check(&self) -> HealthReport;

    /// Shorthand for `health_check().is_healthy()`.
    fn is_healthy(&self) -> bool {
        self.health_check().is_healthy()
    }
}

impl HealthCheck for [TreeNode] {
    fn health_check(&self) -> HealthReport {
        let leaf_count = self.iter().filter(|n| n.is_leaf()).count();
        let internal = self.len() - leaf_count;
        let with_parent = self.iter().filter(|n| !n.is_root()).count();

        HealthReport {
            validation: validate_tree(self),
            node_count: self.len(),
            leaf_count,
            max_depth: self
                .iter()
                .find(|n| n.is_root())
                .and_then(TreeNode::level)
                .unwrap_or(0),
            avg_branching_factor: if internal == 0 {
                0.0
            } else {
                with_parent as f64 / internal as f64
            },
        }
    }
}

/// Validate an assembled word tree.
pub fn validate_tree(nodes: &[TreeNode]) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.id.as_str(), i).is_some() {
            report.push(Severity::Error, Some(&node.id), "duplicate node id");
        }
        if node.level().is_none() {
            report.push(Severity::Warning, Some(&node.id), "malformed node id");
        }
        if node.is_leaf() && (node.word.is_none() || node.weight.is_none()) {
            report.push(Severity::Warning, Some(&node.id), "leaf without word or weight");
        }
    }

    // Resolved parent position per node; None for roots and dangling parents.
    let mut parent: Vec<Option<usize>> = vec![None; nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        let Some(parent_id) = &node.parent_id else {
            continue;
        };
        let Some(&p) = index.get(parent_id.as_str()) else {
            report.push(
                Severity::Error,
                Some(&node.id),
                format!("parent id {parent_id} does not resolve"),
            );
            continue;
        };
        parent[i] = Some(p);
        if let (Some(child_level), Some(parent_level)) = (node.level(), nodes[p].level()) {
            if parent_level != child_level + 1 {
                report.push(
                    Severity::Error,
                    Some(&node.id),
                    format!("parent {parent_id} is not exactly one level up"),
                );
            }
        }
    }

    let roots = nodes.iter().filter(|n| n.is_root()).count();
    if roots == 0 && !nodes.is_empty() {
        report.push(Severity::Critical, None, "no root node");
    } else if roots > 1 {
        report.push(Severity::Error, None, format!("{roots} root nodes"));
    }

    // A chain longer than the record count has revisited a node.
    for (i, node) in nodes.iter().enumerate() {
        let mut current = i;
        let mut steps = 0;
        while let Some(p) = parent[current] {
            current = p;
            steps += 1;
            if steps > nodes.len() {
                report.push(Severity::Critical, Some(&node.id), "cycle in parent chain");
                return report;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::{SimilarityGraph, WordNode};
    use crate::hierarchy::{assemble_tree, Dendrogram, Partition};
    use proptest::prelude::*;

    fn record(id: &str, parent: Option<&str>) -> TreeNode {
        TreeNode {
            id: id.into(),
            parent_id: parent.map(Into::into),
            word: None,
            weight: None,
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue {
            severity: Severity::Error,
            node_id: Some("1-42".into()),
            message: "Something wrong".into(),
        };
        assert_eq!(issue.to_string(), "[ERROR] Something wrong (node 1-42)");
    }

    #[test]
    fn test_validate_tree_ok() {
        let nodes = vec![
            TreeNode::leaf(0, 0, "cat", 1.0),
            TreeNode::leaf(1, 0, "dog", 0.5),
            TreeNode::cluster(1, 0, 0),
            TreeNode::root(2),
        ];
        let report = validate_tree(&nodes);
        assert!(report.is_clean(), "{}", report);

        let health = nodes.health_check();
        assert!(health.is_healthy());
        assert_eq!(health.node_count, 4);
        assert_eq!(health.leaf_count, 2);
        assert_eq!(health.max_depth, 2);
        assert_eq!(health.avg_branching_factor, 1.5);
    }

    #[test]
    fn test_leaf_without_word_is_only_a_warning() {
        let nodes = vec![record("0-0", Some("1-0")), TreeNode::root(1)];
        let report = validate_tree(&nodes);
        assert!(report.is_healthy());
        assert!(!report.is_clean());
        assert_eq!(report.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_dangling_parent() {
        let nodes = vec![TreeNode::leaf(0, 7, "cat", 1.0), TreeNode::root(1)];
        let report = validate_tree(&nodes);
        assert!(!report.is_healthy());
        assert!(report
            .issues
            .iter()
            .any(|i| i.message.contains("does not resolve") && i.node_id.as_deref() == Some("0-0")));
    }

    #[test]
    fn test_level_skip_and_duplicates() {
        let nodes = vec![
            TreeNode {
                id: "0-0".into(),
                parent_id: Some("2-0".into()),
                word: Some("cat".into()),
                weight: Some(1.0),
            },
            TreeNode::leaf(0, 0, "cat", 1.0),
            TreeNode::root(2),
        ];
        let report = validate_tree(&nodes);
        assert!(!report.is_healthy());
        assert!(report.issues.iter().any(|i| i.message.contains("one level up")));
        assert!(report.issues.iter().any(|i| i.message.contains("duplicate")));
    }

    #[test]
    fn test_multiple_roots() {
        let nodes = vec![
            TreeNode::leaf(0, 0, "cat", 1.0),
            TreeNode::root(1),
            record("5-0", None),
        ];
        let report = validate_tree(&nodes);
        assert!(!report.is_healthy());
        assert!(report.issues.iter().any(|i| i.message == "2 root nodes"));
    }

    #[test]
    fn test_no_root_and_cycle() {
        let nodes = vec![record("1-0", Some("2-0")), record("2-0", Some("1-0"))];
        let report = validate_tree(&nodes);
        let critical: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .collect();
        assert!(critical.iter().any(|i| i.message == "no root node"));
        assert!(critical.iter().any(|i| i.message.contains("cycle")));
    }

    fn arb_dendrogram() -> impl Strategy<Value = Dendrogram> {
        (0usize..40, proptest::collection::vec(1usize..4, 0..6)).prop_map(|(n, shrink)| {
            let mut dendro = Dendrogram::new(n);
            for step in shrink {
                let current = dendro.top_node_count();
                if current <= 1 {
                    break;
                }
                // Merge runs of `step + 1` consecutive nodes.
                let labels: Vec<usize> = (0..current).map(|i| i / (step + 1)).collect();
                dendro.push_level(Partition::from_labels(&labels)).unwrap();
            }
            dendro
        })
    }

    proptest! {
        #[test]
        fn assembled_trees_are_clean(dendro in arb_dendrogram()) {
            let mut graph = SimilarityGraph::default();
            for i in 0..dendro.n_items() {
                let _ = graph.add_node(WordNode { word: format!("w{i}"), weight: 1.0 });
            }
            let nodes = assemble_tree(&dendro, &graph).unwrap();
            let report = validate_tree(&nodes);
            prop_assert!(report.is_clean(), "{}", report);
            prop_assert_eq!(nodes.iter().filter(|n| n.is_root()).count(), 1);
            prop_assert_eq!(nodes.iter().filter(|n| n.is_leaf()).count(), dendro.n_items());
        }
    }
}
