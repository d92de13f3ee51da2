//! Child-list balancing.
//!
//! A flat list wider than the allowed fan-out is cut into consecutive runs,
//! each wrapped in a synthetic group node named after its first and last
//! members. Runs are balanced again one level down until every node is within
//! its limit.
//!
//! Group nodes carry no identifier and no style; the projector styles them
//! after the list they were cut from.

use crate::config::{BalancerConfig, DEFAULT_LABEL_TRUNCATION, DEFAULT_MAX_CHILDREN};
use crate::tree::TreeNode;

/// Regroups oversized child lists. Must not depend on or alter the graph.
pub trait Balance {
    /// Returns `children` regrouped so that the parent, sitting at depth
    /// `start_level`, stays within its fan-out.
    fn balance(&self, children: Vec<TreeNode>, start_level: usize) -> Vec<TreeNode>;
}

/// Balancer with a per-depth fan-out table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancer {
    max_children: Vec<usize>,
    label_truncation: usize,
}

impl Default for LoadBalancer {
    fn default() -> Self {
        Self::new(vec![DEFAULT_MAX_CHILDREN], DEFAULT_LABEL_TRUNCATION)
    }
}

impl LoadBalancer {
    /// Creates a balancer. `max_children[d]` bounds the children of a node at
    /// depth `d`; the last entry applies to every deeper level. Limits below 2
    /// are raised to 2.
    #[must_use]
    pub fn new(max_children: Vec<usize>, label_truncation: usize) -> Self {
        Self {
            max_children,
            label_truncation,
        }
    }

    /// Creates a balancer from configuration.
    #[must_use]
    pub fn from_config(config: &BalancerConfig) -> Self {
        Self::new(config.max_children.clone(), config.label_truncation)
    }

    /// Fan-out allowed below a node at `level`.
    #[must_use]
    pub fn limit(&self, level: usize) -> usize {
        self.max_children
            .get(level)
            .or_else(|| self.max_children.last())
            .copied()
            .unwrap_or(DEFAULT_MAX_CHILDREN)
            .max(2)
    }

    fn truncate(&self, label: &str) -> String {
        if label.chars().count() <= self.label_truncation {
            label.to_string()
        } else {
            let kept: String = label.chars().take(self.label_truncation).collect();
            format!("{kept}…")
        }
    }

    fn group(&self, run: Vec<TreeNode>, level: usize) -> TreeNode {
        let label = match (run.first(), run.last()) {
            (Some(first), Some(last)) if run.len() > 1 => format!(
                "{} – {}",
                self.truncate(&first.label),
                self.truncate(&last.label)
            ),
            (Some(only), _) => self.truncate(&only.label),
            _ => String::new(),
        };
        TreeNode::new(label).with_children(self.balance(run, level))
    }
}

impl Balance for LoadBalancer {
    fn balance(&self, children: Vec<TreeNode>, start_level: usize) -> Vec<TreeNode> {
        let limit = self.limit(start_level);
        if children.len() <= limit {
            return children;
        }
        let run_length = children.len().div_ceil(limit);
        let mut groups = Vec::with_capacity(limit);
        let mut rest = children.into_iter();
        loop {
            let run: Vec<TreeNode> = rest.by_ref().take(run_length).collect();
            if run.is_empty() {
                break;
            }
            groups.push(self.group(run, start_level + 1));
        }
        tracing::trace!(level = start_level, groups = groups.len(), "child list balanced");
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(n: usize) -> Vec<TreeNode> {
        (0..n).map(|i| TreeNode::new(format!("item{i:03}"))).collect()
    }

    fn max_fan_out(nodes: &[TreeNode]) -> usize {
        nodes
            .iter()
            .map(|n| n.children.len().max(max_fan_out(&n.children)))
            .max()
            .unwrap_or(0)
    }

    fn leaf_count(nodes: &[TreeNode]) -> usize {
        nodes
            .iter()
            .map(|n| if n.children.is_empty() { 1 } else { leaf_count(&n.children) })
            .sum()
    }

    #[test]
    fn short_lists_are_untouched() {
        let balancer = LoadBalancer::new(vec![8], 10);
        assert_eq!(balancer.balance(leaves(8), 0), leaves(8));
    }

    #[test]
    fn long_lists_are_bounded_at_every_level() {
        let balancer = LoadBalancer::new(vec![8], 10);
        let balanced = balancer.balance(leaves(500), 0);
        assert_eq!(balanced.len(), 8);
        assert!(max_fan_out(&balanced) <= 8);
        assert_eq!(leaf_count(&balanced), 500);
    }

    #[test]
    fn order_is_preserved() {
        let balancer = LoadBalancer::new(vec![4], 10);
        let balanced = balancer.balance(leaves(10), 0);
        assert_eq!(balanced[0].label, "item000 – item002");
        assert_eq!(balanced[3].label, "item009");
    }

    #[test]
    fn groups_are_anonymous() {
        let balancer = LoadBalancer::new(vec![4], 10);
        let balanced = balancer.balance(leaves(10), 0);
        assert!(balanced.iter().all(|g| g.id.is_none()));
    }

    #[test]
    fn per_level_table_uses_last_entry_below() {
        let balancer = LoadBalancer::new(vec![3, 5], 10);
        assert_eq!(balancer.limit(0), 3);
        assert_eq!(balancer.limit(1), 5);
        assert_eq!(balancer.limit(7), 5);
        assert_eq!(LoadBalancer::new(Vec::new(), 10).limit(0), DEFAULT_MAX_CHILDREN);
        assert_eq!(LoadBalancer::new(vec![0], 10).limit(0), 2);
    }

    #[test]
    fn group_labels_are_truncated() {
        let balancer = LoadBalancer::new(vec![2], 4);
        let children = vec![
            TreeNode::new("Aardvark"),
            TreeNode::new("Baboon"),
            TreeNode::new("Cheetah"),
        ];
        let balanced = balancer.balance(children, 0);
        assert_eq!(balanced[0].label, "Aard… – Babo…");
        assert_eq!(balanced[1].label, "Chee…");
    }
}
