//! Testing utilities for zygote-tree.
//!
//! Fixtures and tree assertions shared by unit tests, integration tests and
//! benchmarks. Everything here panics on failure; float comparisons go
//! through the re-exported `approx` crate.
//!
//! ```ignore
//! use zygote_tree::testing::{assert_tree_invariants, four_call_workload};
//! ```

use crate::data::{CallMatrix, DependencyMatrix};
use crate::tree::{ImportTree, NodeId};

// =============================================================================
// Fixtures
// =============================================================================

/// Three independent packages `A`, `B`, `C` and four calls needing
/// `[A]`, `[A, B]`, `[B]`, `[C]`. Uniform root cost is 5.
pub fn four_call_workload() -> (CallMatrix, DependencyMatrix) {
    let calls = CallMatrix::from_rows(
        vec!["A".into(), "B".into(), "C".into()],
        &[vec![1, 0, 0], vec![1, 1, 0], vec![0, 1, 0], vec![0, 0, 1]],
    )
    .expect("fixture rows are rectangular");
    (calls, DependencyMatrix::independent(3))
}

/// A small scientific-Python workload with transitive closure already applied.
///
/// Packages: `numpy`, `pandas` (needs numpy), `scipy` (needs numpy),
/// `sklearn` (needs scipy), `requests`.
pub fn scientific_workload() -> (CallMatrix, DependencyMatrix) {
    let names = ["numpy", "pandas", "scipy", "sklearn", "requests"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let calls = CallMatrix::from_rows(
        names,
        &[
            vec![1, 1, 0, 0, 0],
            vec![1, 1, 0, 0, 1],
            vec![1, 0, 1, 1, 0],
            vec![1, 1, 1, 1, 0],
            vec![1, 0, 1, 0, 0],
            vec![0, 0, 0, 0, 1],
            vec![0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0],
        ],
    )
    .expect("fixture rows are rectangular");
    let deps = DependencyMatrix::from_rows(&[
        vec![0, 1, 1, 0, 0],
        vec![0, 0, 0, 0, 0],
        vec![0, 0, 0, 1, 0],
        vec![0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0],
    ])
    .expect("fixture matrix is square and binary");
    (calls, deps)
}

// =============================================================================
// Tree Assertions
// =============================================================================

/// Assert the structural invariants of a tree:
///
/// - `rcost == cost + Σ children.rcost` at every node
/// - every parent link matches the parent's child list
/// - costs are non-negative
/// - the nodes together own exactly `num_calls` calls
pub fn assert_tree_invariants(tree: &ImportTree, num_calls: usize) {
    let mut owned = 0;
    for node in tree.nodes() {
        let children_rcost: f64 = node.children().iter().map(|&c| tree.node(c).rcost()).sum();
        assert_eq!(
            node.rcost(),
            node.cost() + children_rcost,
            "rcost of node {} is not cost plus children",
            node.id()
        );
        assert!(node.cost() >= 0.0, "node {} has negative cost", node.id());

        for &child in node.children() {
            assert_eq!(tree.node(child).parent(), Some(node.id()));
        }
        if let Some(parent) = node.parent() {
            assert!(tree.node(parent).children().contains(&node.id()));
        } else {
            assert_eq!(node.id(), NodeId::ROOT);
        }

        owned += node.num_calls();
    }
    assert_eq!(owned, num_calls, "calls are not partitioned across nodes");
}
