//! Import tree construction.
//!
//! [`ImportTree`] owns the node arena and the global split queue and grows the
//! tree greedily: each step pops the best pending split anywhere in the tree,
//! applies it, propagates costs to the root and proposes fresh splits for the
//! two nodes that changed.
//!
//! # Ordering
//!
//! Every mutation runs strictly as mutate → propagate → re-enqueue. Only the
//! path from the new child to the root is recosted, so nothing may interleave
//! with a split while it is applied.

use approx::relative_eq;
use ndarray::{Array1, ArrayView1};

use super::node::{Node, NodeId};
use super::queue::{SplitCandidate, SplitQueue};
use super::split::Split;
use crate::config::SplitOpts;
use crate::cost::{distribute_weights, CostModel};
use crate::data::{CallMatrix, DependencyMatrix};
use crate::error::BuildError;
use crate::logger::BuildLogger;

/// Tolerance for the realized-vs-predicted benefit check.
pub const BENEFIT_TOLERANCE: f64 = 1e-9;

// ============================================================================
// TreeState
// ============================================================================

/// Growth state of an [`ImportTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    /// Splits are pending and the root still has cost.
    Building,
    /// Root cost is zero or no split is pending. Further splitting is a no-op.
    Stable,
}

// ============================================================================
// ImportTree
// ============================================================================

/// Tree grouping calls around shared package prerequisites.
///
/// # Example
///
/// ```
/// use zygote_tree::config::SplitOpts;
/// use zygote_tree::data::{CallMatrix, DependencyMatrix};
/// use zygote_tree::tree::ImportTree;
///
/// let calls = CallMatrix::from_rows(
///     vec!["a".into(), "b".into(), "c".into()],
///     &[vec![1, 0, 0], vec![1, 1, 0], vec![0, 1, 0], vec![0, 0, 1]],
/// ).unwrap();
/// let deps = DependencyMatrix::independent(3);
///
/// let mut tree = ImportTree::new(calls, deps, SplitOpts::default()).unwrap();
/// assert_eq!(tree.root().cost(), 5.0);
///
/// tree.do_splits(1).unwrap();
/// assert_eq!(tree.root().rcost(), 3.0);
/// ```
#[derive(Debug)]
pub struct ImportTree {
    /// Arena; index is `NodeId`. Parents always precede their children.
    nodes: Vec<Node>,
    queue: SplitQueue,
    package_names: Vec<String>,
    deps: DependencyMatrix,
    cost_model: CostModel,
    opts: SplitOpts,
    next_generation: u64,
    next_seq: u64,
    splits_applied: usize,
    logger: BuildLogger,
}

impl ImportTree {
    /// Build the root over every call and enqueue its best split.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Config`] if `opts` fail validation
    /// - [`BuildError::DimensionMismatch`] if the calls matrix, dependency
    ///   matrix and weight vector disagree on the number of packages
    pub fn new(
        calls: CallMatrix,
        deps: DependencyMatrix,
        opts: SplitOpts,
    ) -> Result<Self, BuildError> {
        opts.validate()?;

        let weights = match &opts.weights {
            Some(w) => Array1::from(w.clone()),
            None => Array1::ones(deps.num_packages()),
        };
        let num_packages = weights.len();

        if calls.num_packages() != num_packages {
            return Err(BuildError::DimensionMismatch {
                what: "calls matrix",
                expected: num_packages,
                actual: calls.num_packages(),
            });
        }
        if deps.num_packages() != num_packages {
            return Err(BuildError::DimensionMismatch {
                what: "dependency matrix",
                expected: num_packages,
                actual: deps.num_packages(),
            });
        }

        let weights = if opts.dist_weights {
            distribute_weights(&deps, weights.view())
        } else {
            weights
        };

        let logger = BuildLogger::new(opts.verbosity);
        let (package_names, calls) = calls.into_parts();
        logger.info(&format!(
            "building import tree: {} calls, {} packages",
            calls.nrows(),
            num_packages
        ));

        let mut tree = Self {
            nodes: Vec::new(),
            queue: SplitQueue::new(),
            package_names,
            cost_model: CostModel::new(weights, opts.entropy_penalty),
            deps,
            opts,
            next_generation: 0,
            next_seq: 0,
            splits_applied: 0,
            logger,
        };

        let generation = tree.next_generation();
        let root = Node::root(calls, &tree.deps, generation);
        tree.nodes.push(root);
        tree.recursively_update_costs(NodeId::ROOT);
        tree.enqueue_best_split(NodeId::ROOT);

        tree.logger
            .info(&format!("root cost: {:.3}", tree.root().cost()));
        Ok(tree)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// All nodes in creation order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of splits waiting in the global queue.
    #[inline]
    pub fn num_pending(&self) -> usize {
        self.queue.len()
    }

    /// Best pending split, if any.
    pub fn peek_split(&self) -> Option<&Split> {
        self.queue.peek().map(|c| &c.split)
    }

    #[inline]
    pub fn splits_applied(&self) -> usize {
        self.splits_applied
    }

    #[inline]
    pub fn package_names(&self) -> &[String] {
        &self.package_names
    }

    #[inline]
    pub fn package_name(&self, package: usize) -> &str {
        &self.package_names[package]
    }

    /// Effective weights (after redistribution, if enabled).
    #[inline]
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.cost_model.weights()
    }

    #[inline]
    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    #[inline]
    pub fn opts(&self) -> &SplitOpts {
        &self.opts
    }

    pub fn state(&self) -> TreeState {
        if self.root().rcost == 0.0 || self.queue.is_empty() {
            TreeState::Stable
        } else {
            TreeState::Building
        }
    }

    /// `ROOT` for the root, else the committed package names joined by `|`.
    pub fn node_name(&self, id: NodeId) -> String {
        let node = self.node(id);
        if node.is_root() {
            return "ROOT".to_string();
        }
        node.packages()
            .iter()
            .map(|&p| self.package_name(p))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Ids from `id` up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.node(current).parent())
    }

    /// Every package committed on the path from the root to `id`.
    pub fn committed_packages(&self, id: NodeId) -> Vec<usize> {
        let mut packages: Vec<usize> = self
            .ancestors(id)
            .flat_map(|a| self.node(a).packages().iter().copied())
            .collect();
        packages.sort_unstable();
        packages
    }

    // ------------------------------------------------------------------------
    // Growth
    // ------------------------------------------------------------------------

    /// Apply up to `n` of the globally best pending splits.
    ///
    /// Stops early once the root's total cost reaches zero or no split is
    /// pending. Calling this on a [`TreeState::Stable`] tree changes nothing.
    ///
    /// # Errors
    ///
    /// [`BuildError::InconsistentBenefit`] if a split does not reduce its
    /// node's total cost by the predicted benefit. The tree must then be
    /// discarded.
    pub fn do_splits(&mut self, n: usize) -> Result<&mut Self, BuildError> {
        let mut applied = 0;
        while applied < n {
            if self.root().rcost == 0.0 {
                self.logger.info("root cost is zero, tree is stable");
                break;
            }
            let Some(candidate) = self.queue.pop() else {
                self.logger.info("no pending splits, tree is stable");
                break;
            };
            if self.node(candidate.split.node).pending != Some(candidate.seq) {
                self.logger.warn(&format!(
                    "discarding stale split {} for node {}",
                    candidate.seq, candidate.split.node
                ));
                continue;
            }

            self.apply(candidate)?;
            applied += 1;
        }

        if applied > 0 {
            self.logger.info(&format!(
                "applied {} splits ({} total), root cost {:.3}, {} nodes",
                applied,
                self.splits_applied,
                self.root().rcost,
                self.nodes.len()
            ));
        }
        Ok(self)
    }

    /// Split until the tree is stable.
    pub fn grow(&mut self) -> Result<&mut Self, BuildError> {
        while self.state() == TreeState::Building {
            self.do_splits(1)?;
        }
        Ok(self)
    }

    fn apply(&mut self, candidate: SplitCandidate) -> Result<(), BuildError> {
        let SplitCandidate { split, .. } = candidate;
        let node = split.node;
        let package = split.package;
        let predicted = split.benefit;

        let before = self.node(node).rcost;
        self.split(split);
        let after = self.node(node).rcost;
        let realized = before - after;

        // Rounding error grows with the node's total cost, not with the benefit.
        if !relative_eq!(
            realized,
            predicted,
            epsilon = BENEFIT_TOLERANCE * before.abs().max(1.0),
            max_relative = BENEFIT_TOLERANCE
        ) {
            return Err(BuildError::InconsistentBenefit {
                node,
                package,
                predicted,
                realized,
            });
        }

        self.splits_applied += 1;
        self.logger.log_split(
            self.splits_applied,
            node.0,
            self.package_name(package),
            predicted,
            self.root().rcost,
        );
        Ok(())
    }

    /// Move the split's child-side calls into a new child node.
    fn split(&mut self, split: Split) {
        let Split {
            node: parent_id,
            package,
            parent_calls,
            child_calls,
            ..
        } = split;

        let child_id = NodeId(self.nodes.len() as u32);
        let generation = self.next_generation();

        let parent = &mut self.nodes[parent_id.index()];
        parent.replace_calls(parent_calls);
        parent.pending = None;
        parent.children.push(child_id);
        let child = Node::child(parent, child_id, package, child_calls, &self.deps, generation);
        self.nodes.push(child);

        self.recursively_update_costs(child_id);
        self.enqueue_best_split(child_id);
        self.enqueue_best_split(parent_id);
    }

    /// Recompute `cost` and `rcost` from `start` up to the root.
    fn recursively_update_costs(&mut self, start: NodeId) {
        let mut current = Some(start);
        while let Some(id) = current {
            let node = &self.nodes[id.index()];
            let cost = self.cost_model.cost(node.calls());
            let children_rcost: f64 = node
                .children
                .iter()
                .map(|c| self.nodes[c.index()].rcost)
                .sum();

            let node = &mut self.nodes[id.index()];
            node.cost = cost;
            node.rcost = cost + children_rcost;
            current = node.parent();
        }
    }

    /// Push the node's best split, or mark the node terminal if it has none.
    fn enqueue_best_split(&mut self, id: NodeId) {
        let best = self.node(id).best_split(
            &self.cost_model,
            self.opts.prereq_first,
            self.opts.min_split_cost,
        );

        match best {
            Some(split) => {
                let seq = self.next_seq();
                let node = &mut self.nodes[id.index()];
                node.pending = Some(seq);
                node.terminal = false;
                self.queue.push(SplitCandidate::new(seq, split));
            }
            None => {
                let node = &mut self.nodes[id.index()];
                node.pending = None;
                node.terminal = true;
                if node.cost >= self.opts.min_split_cost {
                    self.logger.debug(&format!(
                        "node {} exhausted with cost {:.3}: no eligible split",
                        id, node.cost
                    ));
                }
            }
        }
    }

    fn next_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Build an import tree and enqueue the root's best split.
///
/// See [`ImportTree::new`].
pub fn build(
    calls: CallMatrix,
    deps: DependencyMatrix,
    opts: SplitOpts,
) -> Result<ImportTree, BuildError> {
    ImportTree::new(calls, deps, opts)
}

// ============================================================================
// Tests
// ============================================================================
