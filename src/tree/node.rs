//! Tree nodes.
//!
//! Nodes live in the tree's arena and refer to each other by [`NodeId`]. The
//! parent link is only followed upward, for cost propagation.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use super::split::Split;
use crate::cost::CostModel;
use crate::data::DependencyMatrix;

/// Index of a node in the tree's arena. The root is always `NodeId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A group of calls sharing a committed package context.
///
/// `packages`, `parent`, `generation` and `depth` are fixed at creation; only
/// `calls`, the costs and `children` evolve as the tree grows.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    /// Packages committed here on top of the parent's context. Empty only for the root.
    packages: Vec<usize>,
    calls: Array2<u8>,
    /// Outstanding prerequisites per package along this node's path.
    remaining: Array1<u32>,
    pub(super) cost: f64,
    /// Own cost plus every descendant's cost.
    pub(super) rcost: f64,
    pub(super) children: Vec<NodeId>,
    generation: u64,
    depth: u32,
    /// Sequence number of this node's pending candidate, if any.
    pub(super) pending: Option<u64>,
    pub(super) terminal: bool,
}

impl Node {
    /// Root node over every call. Nothing is committed yet.
    pub(super) fn root(calls: Array2<u8>, deps: &DependencyMatrix, generation: u64) -> Self {
        Self {
            id: NodeId::ROOT,
            parent: None,
            packages: Vec::new(),
            calls,
            remaining: deps.prerequisite_counts(),
            cost: 0.0,
            rcost: 0.0,
            children: Vec::new(),
            generation,
            depth: 0,
            pending: None,
            terminal: false,
        }
    }

    /// Child of `parent` committing `package`.
    pub(super) fn child(
        parent: &Node,
        id: NodeId,
        package: usize,
        calls: Array2<u8>,
        deps: &DependencyMatrix,
        generation: u64,
    ) -> Self {
        let mut remaining = parent.remaining.clone();
        for (dependent, (count, &edge)) in remaining
            .iter_mut()
            .zip(deps.dependents(package).iter())
            .enumerate()
        {
            if dependent != package {
                debug_assert!(*count >= u32::from(edge), "prerequisite committed twice");
                *count = count.saturating_sub(u32::from(edge));
            }
        }

        Self {
            id,
            parent: Some(parent.id),
            packages: vec![package],
            calls,
            remaining,
            cost: 0.0,
            rcost: 0.0,
            children: Vec::new(),
            generation,
            depth: parent.depth + 1,
            pending: None,
            terminal: false,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn packages(&self) -> &[usize] {
        &self.packages
    }

    /// Calls currently owned by this node.
    #[inline]
    pub fn calls(&self) -> ArrayView2<'_, u8> {
        self.calls.view()
    }

    #[inline]
    pub fn num_calls(&self) -> usize {
        self.calls.nrows()
    }

    #[inline]
    pub fn remaining(&self) -> ArrayView1<'_, u32> {
        self.remaining.view()
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[inline]
    pub fn rcost(&self) -> f64 {
        self.rcost
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Creation order; the root is generation 0.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether a split of this node is waiting in the tree's queue.
    #[inline]
    pub fn has_pending_split(&self) -> bool {
        self.pending.is_some()
    }

    /// No split of this node will ever be proposed again.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Whether `package` may be split on here.
    ///
    /// With `prereq_first`, every prerequisite of the package must already be
    /// committed on the path from the root.
    #[inline]
    pub fn is_eligible(&self, package: usize, prereq_first: bool) -> bool {
        !prereq_first || self.remaining[package] == 0
    }

    pub(super) fn replace_calls(&mut self, calls: Array2<u8>) {
        self.calls = calls;
    }

    /// Best split over every eligible package that isolates at least one call.
    ///
    /// Returns `None` when the node is cheaper than `min_split_cost`, when no
    /// package is eligible, or when the best candidate would raise cost.
    /// Zero-benefit splits are returned. Ties keep the lowest package index.
    pub fn best_split(
        &self,
        model: &CostModel,
        prereq_first: bool,
        min_split_cost: f64,
    ) -> Option<Split> {
        if self.cost < min_split_cost {
            return None;
        }

        let mut best: Option<Split> = None;
        for package in 0..self.remaining.len() {
            if !self.is_eligible(package, prereq_first) {
                continue;
            }
            if self.calls.column(package).iter().all(|&v| v == 0) {
                continue;
            }

            let split = Split::evaluate(self, package, model);
            if best.as_ref().map_or(true, |b| split.benefit > b.benefit) {
                best = Some(split);
            }
        }

        best.filter(|split| split.benefit >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    fn chain_deps() -> DependencyMatrix {
        // 0 <- 1 <- 2 (0 is a prerequisite of 1, 1 of 2)
        DependencyMatrix::from_rows(&[vec![0, 1, 0], vec![0, 0, 1], vec![0, 0, 0]]).unwrap()
    }

    fn costed_root(calls: Array2<u8>, deps: &DependencyMatrix, model: &CostModel) -> Node {
        let mut root = Node::root(calls, deps, 0);
        root.cost = model.cost(root.calls());
        root.rcost = root.cost;
        root
    }

    #[test]
    fn root_remaining_counts_prerequisites() {
        let root = Node::root(Array2::zeros((0, 3)), &chain_deps(), 0);
        assert_eq!(root.remaining(), array![0u32, 1, 1]);
        assert!(root.is_root());
        assert!(root.packages().is_empty());
    }

    #[test]
    fn child_commits_package() {
        let deps = chain_deps();
        let root = Node::root(Array2::zeros((0, 3)), &deps, 0);
        let child = Node::child(&root, NodeId(1), 0, Array2::zeros((0, 3)), &deps, 1);
        assert_eq!(child.remaining(), array![0u32, 0, 1]);
        assert_eq!(child.packages(), &[0usize]);
        assert_eq!(child.parent(), Some(NodeId::ROOT));
        assert_eq!(child.depth(), 1);
    }

    #[test]
    fn prereq_first_gates_eligibility() {
        let root = Node::root(Array2::zeros((0, 3)), &chain_deps(), 0);
        assert!(root.is_eligible(0, true));
        assert!(!root.is_eligible(1, true));
        assert!(root.is_eligible(1, false));
    }

    #[test]
    fn split_moves_rows_and_zeroes_column() {
        let deps = DependencyMatrix::independent(3);
        let model = CostModel::uniform(3, 0.0);
        let root = costed_root(array![[1, 0, 0], [1, 1, 0], [0, 1, 0], [0, 0, 1]], &deps, &model);

        let split = Split::evaluate(&root, 0, &model);
        assert_eq!(split.parent_calls, array![[0u8, 1, 0], [0, 0, 1]]);
        assert_eq!(split.child_calls, array![[0u8, 0, 0], [0, 1, 0]]);
        assert_eq!(split.num_isolated(), 2);
        assert_abs_diff_eq!(split.parent_cost, 2.0);
        assert_abs_diff_eq!(split.child_cost, 1.0);
        assert_abs_diff_eq!(split.benefit, 2.0);
    }

    #[test]
    fn best_split_prefers_lowest_package_on_tie() {
        let deps = DependencyMatrix::independent(3);
        let model = CostModel::uniform(3, 0.0);
        let root = costed_root(array![[1, 0, 0], [1, 1, 0], [0, 1, 0], [0, 0, 1]], &deps, &model);

        let best = root.best_split(&model, false, 0.01).unwrap();
        assert_eq!(best.package, 0);
        assert_abs_diff_eq!(best.benefit, 2.0);
    }

    #[test]
    fn best_split_keeps_zero_benefit_prerequisite() {
        // numpy costs nothing but must be committed before pandas.
        let deps = DependencyMatrix::from_rows(&[vec![0, 1], vec![0, 0]]).unwrap();
        let model = CostModel::new(array![0.0, 10.0], 0.0);
        let root = costed_root(array![[1, 1], [1, 1]], &deps, &model);

        let best = root.best_split(&model, true, 0.01).unwrap();
        assert_eq!(best.package, 0);
        assert_eq!(best.benefit, 0.0);
        assert_eq!(best.num_isolated(), 2);
    }

    #[test]
    fn best_split_none_below_threshold() {
        let deps = DependencyMatrix::independent(2);
        let model = CostModel::new(array![0.001, 0.001], 0.0);
        let root = costed_root(array![[1, 1]], &deps, &model);
        assert!(root.best_split(&model, false, 0.01).is_none());
    }

    #[test]
    fn best_split_none_without_eligible_package() {
        // 0 and 1 are each other's prerequisite: neither is ever eligible.
        let deps = DependencyMatrix::from_rows(&[vec![0, 1], vec![1, 0]]).unwrap();
        let model = CostModel::uniform(2, 0.0);
        let root = costed_root(array![[1, 1], [1, 0]], &deps, &model);
        assert!(root.best_split(&model, true, 0.01).is_none());
        assert!(root.best_split(&model, false, 0.01).is_some());
    }
}
