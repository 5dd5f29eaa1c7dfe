//! Conversion from the runtime tree to its document schema.

use super::schema::TreeDocument;
use crate::tree::{ImportTree, Node};

impl From<&ImportTree> for TreeDocument {
    fn from(tree: &ImportTree) -> Self {
        // Children are always created after their parent, so building in
        // reverse creation order sees every child document before its parent.
        let mut docs: Vec<Option<TreeDocument>> = vec![None; tree.num_nodes()];

        for node in tree.nodes().iter().skip(1).rev() {
            let doc = node_document(tree, node, &mut docs);
            docs[node.id().index()] = Some(doc);
        }
        node_document(tree, tree.root(), &mut docs)
    }
}

/// Document for `node`, taking its children's documents out of `docs`.
fn node_document(
    tree: &ImportTree,
    node: &Node,
    docs: &mut [Option<TreeDocument>],
) -> TreeDocument {
    TreeDocument {
        packages: node
            .packages()
            .iter()
            .map(|&p| tree.package_name(p).to_string())
            .collect(),
        children: node
            .children()
            .iter()
            .filter_map(|c| docs[c.index()].take())
            .collect(),
        split_generation: node.generation(),
    }
}

impl ImportTree {
    /// Snapshot the tree structure as a [`TreeDocument`].
    pub fn to_document(&self) -> TreeDocument {
        TreeDocument::from(self)
    }
}
