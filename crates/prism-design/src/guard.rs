use crate::types::DesignNode;
use prism_common::{PrismError, Result};

/// Ceilings for tree walks. Design documents come from an external API and
/// can be arbitrarily deep or wide; every walk validates against these
/// limits first so the recursive passes run on known-bounded input.
#[derive(Debug, Clone, Copy)]
pub struct WalkLimits {
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_nodes: 5_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: usize,
}

/// Iterative (explicit-stack) pre-walk. Exceeding either ceiling is an
/// input error, not a stack overflow further down the pipeline.
pub fn check_tree(root: &DesignNode, limits: &WalkLimits) -> Result<TreeStats> {
    let mut stack: Vec<(&DesignNode, usize)> = vec![(root, 1)];
    let mut node_count = 0usize;
    let mut max_depth = 0usize;

    while let Some((node, depth)) = stack.pop() {
        if depth > limits.max_depth {
            return Err(PrismError::Input(format!(
                "design tree exceeds maximum depth of {} at node '{}'",
                limits.max_depth, node.id
            )));
        }

        node_count += 1;
        if node_count > limits.max_nodes {
            return Err(PrismError::Input(format!(
                "design tree exceeds maximum node count of {}",
                limits.max_nodes
            )));
        }

        max_depth = max_depth.max(depth);
        for child in &node.children {
            stack.push((child, depth + 1));
        }
    }

    Ok(TreeStats {
        node_count,
        max_depth,
    })
}
