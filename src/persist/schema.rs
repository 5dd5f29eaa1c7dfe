//! Schema types for tree documents and input matrices.
//!
//! Schema types are separate from runtime types: the saved tree carries only
//! package names, structure and creation order, never calls or costs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::{CallMatrix, DependencyMatrix};
use crate::error::DataError;

// =============================================================================
// TreeDocument
// =============================================================================

/// Recursive output document: one per node.
///
/// The root's `packages` is empty; every other node lists the packages it
/// commits on top of its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDocument {
    /// Package names committed at this node.
    pub packages: Vec<String>,
    /// Child documents in creation order.
    pub children: Vec<TreeDocument>,
    /// Creation order of the node (root = 0).
    pub split_generation: u64,
}

impl TreeDocument {
    /// Total number of nodes in this document.
    pub fn num_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(doc) = stack.pop() {
            count += 1;
            stack.extend(doc.children.iter());
        }
        count
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// For every leaf, the union of `packages` along its root-to-leaf path.
    ///
    /// Leaves are returned in depth-first order.
    pub fn leaf_contexts(&self) -> Vec<BTreeSet<String>> {
        let mut contexts = Vec::new();
        let mut stack: Vec<(&TreeDocument, BTreeSet<String>)> = vec![(self, BTreeSet::new())];

        while let Some((doc, mut context)) = stack.pop() {
            context.extend(doc.packages.iter().cloned());
            if doc.is_leaf() {
                contexts.push(context);
                continue;
            }
            for child in doc.children.iter().rev() {
                stack.push((child, context.clone()));
            }
        }
        contexts
    }
}

// =============================================================================
// TreeInput
// =============================================================================

/// Input document for the command-line tool.
///
/// ```json
/// {
///   "packages": ["numpy", "pandas"],
///   "calls": [[1, 1], [1, 0]],
///   "deps": [[0, 1], [0, 0]],
///   "weights": [120.0, 340.0]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeInput {
    /// Package names, one per column.
    pub packages: Vec<String>,
    /// Calls × packages membership rows.
    pub calls: Vec<Vec<u8>>,
    /// Packages × packages direct-prerequisite rows.
    pub deps: Vec<Vec<u8>>,
    /// Optional per-package import weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

impl TreeInput {
    /// Validate into the two input matrices and the optional weights.
    pub fn into_matrices(
        self,
    ) -> Result<(CallMatrix, DependencyMatrix, Option<Vec<f64>>), DataError> {
        let calls = CallMatrix::from_rows(self.packages, &self.calls)?;
        let deps = DependencyMatrix::from_rows(&self.deps)?;
        Ok((calls, deps, self.weights))
    }
}
