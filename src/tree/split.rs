//! Split evaluation.
//!
//! A [`Split`] proposes moving every call of a node that needs one package into
//! a new child node where that package is committed:
//!
//! ```text
//! parent_calls = rows with calls[:, p] == 0      (stay with the node)
//! child_calls  = rows with calls[:, p] != 0      (column p zeroed)
//! benefit      = cost(node) - (cost(parent_calls) + cost(child_calls))
//! ```
//!
//! Evaluation is O(calls × packages) per candidate.

use ndarray::{Array2, Axis};

use super::node::{Node, NodeId};
use crate::cost::CostModel;

/// A candidate (or applied) partition of one node's calls on one package.
#[derive(Debug, Clone)]
pub struct Split {
    /// Node whose calls are partitioned.
    pub node: NodeId,
    /// Package column the calls are partitioned on.
    pub package: usize,
    /// Calls that do not need `package`; they stay with the node.
    pub parent_calls: Array2<u8>,
    /// Calls that need `package`, with that column zeroed.
    pub child_calls: Array2<u8>,
    pub parent_cost: f64,
    pub child_cost: f64,
    /// Predicted reduction of the node's cost.
    pub benefit: f64,
}

impl Split {
    /// Evaluate splitting `node` on `package`.
    pub fn evaluate(node: &Node, package: usize, model: &CostModel) -> Self {
        let calls = node.calls();
        let column = calls.column(package);

        let (child_rows, parent_rows): (Vec<usize>, Vec<usize>) =
            (0..calls.nrows()).partition(|&row| column[row] != 0);

        let parent_calls = calls.select(Axis(0), &parent_rows);
        let mut child_calls = calls.select(Axis(0), &child_rows);
        child_calls.column_mut(package).fill(0);

        let parent_cost = model.cost(parent_calls.view());
        let child_cost = model.cost(child_calls.view());

        Self {
            node: node.id(),
            package,
            parent_calls,
            child_calls,
            parent_cost,
            child_cost,
            benefit: node.cost() - (parent_cost + child_cost),
        }
    }

    /// Number of calls that would move to the new child.
    #[inline]
    pub fn num_isolated(&self) -> usize {
        self.child_calls.nrows()
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[on col {} of node {} to save {:.1}]",
            self.package, self.node, self.benefit
        )
    }
}
