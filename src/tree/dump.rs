//! Human-readable text rendering of an import tree.

use std::fmt::Write;

use super::grower::ImportTree;
use super::node::NodeId;

impl ImportTree {
    /// Render the tree as indented text, one block per node in depth-first order.
    ///
    /// ```text
    /// ROOT [3.0 total cost]
    /// 2 calls with sub cost 2.0
    /// 1 children with sub cost 1.0
    ///
    /// - A [1.0 total cost]
    /// - 2 calls with sub cost 1.0
    /// - 0 children with sub cost 0.0
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![NodeId::ROOT];

        while let Some(id) = stack.pop() {
            let node = self.node(id);
            let prefix = "- ".repeat(node.depth() as usize);

            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "{prefix}{} [{:.1} total cost]",
                self.node_name(id),
                node.rcost()
            );
            let _ = writeln!(
                out,
                "{prefix}{} calls with sub cost {:.1}",
                node.num_calls(),
                node.cost()
            );
            let _ = writeln!(
                out,
                "{prefix}{} children with sub cost {:.1}",
                node.children().len(),
                node.rcost() - node.cost()
            );
            out.push('\n');

            stack.extend(node.children().iter().rev().copied());
        }

        out
    }
}
