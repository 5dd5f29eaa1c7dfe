//! Integration tests for import tree construction.
//!
//! These tests validate cost bookkeeping, split ordering and the
//! Building → Stable lifecycle on small hand-checked workloads.

use approx::assert_abs_diff_eq;
use rstest::rstest;

use zygote_tree::testing::{assert_tree_invariants, four_call_workload, scientific_workload};
use zygote_tree::{
    build, BuildError, CallMatrix, CostModel, DependencyMatrix, ImportTree, NodeId, SplitOpts,
    TreeState,
};

fn uniform_opts() -> SplitOpts {
    SplitOpts::builder().prereq_first(false).build().unwrap()
}

// =============================================================================
// Four-call scenario
// =============================================================================

#[test]
fn test_four_call_root_cost() {
    let (calls, deps) = four_call_workload();
    let tree = build(calls, deps, uniform_opts()).unwrap();

    // 2 (A) + 2 (B) + 1 (C)
    assert_eq!(tree.root().cost(), 5.0);
    assert_eq!(tree.root().rcost(), 5.0);
}

#[test]
fn test_four_call_first_split() {
    let (calls, deps) = four_call_workload();
    let mut tree = build(calls, deps, uniform_opts()).unwrap();

    let best = tree.peek_split().unwrap();
    // A and B tie at benefit 2; A was evaluated first.
    assert_eq!(best.package, 0);
    assert_eq!(best.benefit, 2.0);
    assert_eq!(best.benefit, best.num_isolated() as f64);
    let benefit = best.benefit;

    tree.do_splits(1).unwrap();

    let root = tree.root();
    let child = tree.node(NodeId(1));
    assert_eq!(root.cost() + child.cost(), 5.0 - benefit);
    assert_eq!(root.rcost(), 3.0);
    assert_eq!(tree.node_name(NodeId(1)), "A");
    assert_tree_invariants(&tree, 4);
}

#[test]
fn test_four_call_tie_goes_to_earliest_candidate() {
    let (calls, deps) = four_call_workload();
    let mut tree = build(calls, deps, uniform_opts()).unwrap();
    tree.do_splits(1).unwrap();

    // Root ([B], [C]) and child A ([], [B]) both offer a split on B worth 1.
    // Child A proposed its split first, so it wins over the older root.
    assert_eq!(tree.peek_split().unwrap().node, NodeId(1));
    assert_eq!(tree.peek_split().unwrap().package, 1);

    tree.do_splits(1).unwrap();
    let second = tree.node(NodeId(2));
    assert_eq!(second.generation(), 2);
    assert_eq!(second.parent(), Some(NodeId(1)));
    assert_eq!(tree.node_name(second.id()), "B");
    assert_eq!(tree.root().rcost(), 2.0);
    assert_tree_invariants(&tree, 4);
}

#[test]
fn test_four_call_grows_to_zero_cost() {
    let (calls, deps) = four_call_workload();
    let mut tree = build(calls, deps, uniform_opts()).unwrap();
    tree.grow().unwrap();

    assert_eq!(tree.state(), TreeState::Stable);
    assert_eq!(tree.root().rcost(), 0.0);
    assert_eq!(tree.num_pending(), 0);
    assert!(tree.nodes().iter().all(|n| n.is_terminal()));
    assert_tree_invariants(&tree, 4);
}

// =============================================================================
// do_splits contract
// =============================================================================

#[test]
fn test_do_splits_zero_is_noop() {
    let (calls, deps) = four_call_workload();
    let mut tree = build(calls, deps, uniform_opts()).unwrap();

    tree.do_splits(0).unwrap();
    assert_eq!(tree.num_nodes(), 1);
    assert_eq!(tree.splits_applied(), 0);
    assert_eq!(tree.root().rcost(), 5.0);
    assert_eq!(tree.state(), TreeState::Building);
}

#[test]
fn test_do_splits_on_stable_tree_changes_nothing() {
    let (calls, deps) = scientific_workload();
    let mut tree = build(calls, deps, uniform_opts()).unwrap();
    tree.do_splits(1000).unwrap();
    assert_eq!(tree.state(), TreeState::Stable);

    let before = tree.to_document();
    let nodes = tree.num_nodes();
    tree.do_splits(10).unwrap();
    assert_eq!(tree.num_nodes(), nodes);
    assert_eq!(tree.to_document(), before);
}

#[test]
fn test_do_splits_chains() {
    let (calls, deps) = four_call_workload();
    let mut tree = build(calls, deps, uniform_opts()).unwrap();
    let applied = tree.do_splits(1).unwrap().do_splits(1).unwrap().splits_applied();
    assert_eq!(applied, 2);
}

#[test]
fn test_batched_splits_match_single_batch() {
    let (calls, deps) = scientific_workload();
    let mut batched = build(calls.clone(), deps.clone(), uniform_opts()).unwrap();
    for _ in 0..4 {
        batched.do_splits(2).unwrap();
    }

    let mut single = build(calls, deps, uniform_opts()).unwrap();
    single.do_splits(8).unwrap();

    assert_eq!(batched.to_document(), single.to_document());
    assert_eq!(batched.root().rcost(), single.root().rcost());
}

#[rstest]
#[case(false, 0.0)]
#[case(true, 0.0)]
#[case(false, 0.5)]
#[case(true, 2.0)]
fn test_root_cost_non_increasing(#[case] prereq_first: bool, #[case] entropy_penalty: f64) {
    let (calls, deps) = scientific_workload();
    let opts = SplitOpts::builder()
        .prereq_first(prereq_first)
        .entropy_penalty(entropy_penalty)
        .build()
        .unwrap();
    let mut tree = build(calls, deps, opts).unwrap();

    let mut previous = tree.root().rcost();
    while tree.state() == TreeState::Building {
        let predicted = tree.peek_split().unwrap().benefit;
        tree.do_splits(1).unwrap();
        let current = tree.root().rcost();
        assert!(current <= previous);
        assert!(current >= 0.0);
        assert_abs_diff_eq!(previous - current, predicted, epsilon = 1e-9);
        previous = current;
    }
    assert_tree_invariants(&tree, 8);
}

// =============================================================================
// Cost model agreement
// =============================================================================

#[test]
fn test_root_cost_matches_cost_model() {
    let (calls, deps) = scientific_workload();
    let weights = vec![120.0, 340.0, 410.0, 600.0, 35.0];
    let model = CostModel::new(weights.clone().into(), 0.3);
    let expected = model.cost(calls.values());

    let opts = SplitOpts::builder()
        .weights(weights)
        .entropy_penalty(0.3)
        .build()
        .unwrap();
    let tree = build(calls, deps, opts).unwrap();
    assert_eq!(tree.root().cost(), expected);
}

#[test]
fn test_dist_weights_redistributes() {
    let (calls, deps) = scientific_workload();
    let opts = SplitOpts::builder().dist_weights(true).build().unwrap();
    let tree = build(calls, deps, opts).unwrap();

    // numpy has no prerequisites and keeps its weight, plus pandas' and scipy's.
    // pandas and scipy pass theirs to numpy, sklearn passes its weight to scipy.
    let weights = tree.weights();
    assert_abs_diff_eq!(weights[0], 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(weights[1], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(weights[2], 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(weights[3], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(weights[4], 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(weights.sum(), 5.0, epsilon = 1e-9);
}

// =============================================================================
// Prerequisite ordering
// =============================================================================

#[test]
fn test_prereq_first_commits_prerequisites_on_path() {
    let (calls, deps) = scientific_workload();
    let opts = SplitOpts::builder().prereq_first(true).build().unwrap();
    let mut tree = build(calls, deps.clone(), opts).unwrap();
    tree.grow().unwrap();

    for node in tree.nodes().iter().filter(|n| !n.is_root()) {
        let committed = tree.committed_packages(node.id());
        for &package in node.packages() {
            for prereq in 0..deps.num_packages() {
                if prereq != package && deps.values()[[prereq, package]] == 1 {
                    assert!(
                        committed.contains(&prereq),
                        "{} committed before its prerequisite {}",
                        tree.package_name(package),
                        tree.package_name(prereq)
                    );
                }
            }
        }
    }
}

#[test]
fn test_free_prerequisite_is_committed_first() {
    // numpy costs nothing, yet committing it is the only way to reach pandas.
    let calls = CallMatrix::from_rows(
        vec!["numpy".into(), "pandas".into()],
        &[vec![1, 1], vec![1, 1]],
    )
    .unwrap();
    let deps = DependencyMatrix::from_rows(&[vec![0, 1], vec![0, 0]]).unwrap();
    let opts = SplitOpts::builder()
        .weights(vec![0.0, 10.0])
        .prereq_first(true)
        .build()
        .unwrap();

    let mut tree = build(calls, deps, opts).unwrap();
    assert_eq!(tree.root().cost(), 20.0);
    assert_eq!(tree.num_pending(), 1);
    assert_eq!(tree.peek_split().unwrap().benefit, 0.0);

    tree.do_splits(10).unwrap();
    assert_eq!(tree.root().rcost(), 0.0);
    assert_eq!(tree.state(), TreeState::Stable);
    assert_eq!(tree.num_nodes(), 3);
    assert_eq!(tree.node_name(NodeId(1)), "numpy");
    assert_eq!(tree.node_name(NodeId(2)), "pandas");
    assert_eq!(tree.node(NodeId(2)).parent(), Some(NodeId(1)));
    assert_tree_invariants(&tree, 2);
}

#[test]
fn test_cyclic_dependencies_leave_node_terminal() {
    // a and b each list the other as prerequisite: with prereq_first neither
    // can ever be split on.
    let calls = CallMatrix::from_rows(
        vec!["a".into(), "b".into()],
        &[vec![1, 1], vec![1, 1], vec![1, 0]],
    )
    .unwrap();
    let deps = DependencyMatrix::from_rows(&[vec![0, 1], vec![1, 0]]).unwrap();
    let opts = SplitOpts::builder().prereq_first(true).build().unwrap();

    let mut tree = build(calls, deps, opts).unwrap();
    assert_eq!(tree.num_pending(), 0);
    assert!(tree.root().is_terminal());
    assert_eq!(tree.state(), TreeState::Stable);

    tree.do_splits(5).unwrap();
    assert_eq!(tree.num_nodes(), 1);
    assert_eq!(tree.root().rcost(), 5.0);
}

#[test]
fn test_min_split_cost_stops_cheap_nodes() {
    let (calls, deps) = four_call_workload();
    let opts = SplitOpts::builder().min_split_cost(10.0).build().unwrap();
    let mut tree = build(calls, deps, opts).unwrap();
    assert_eq!(tree.state(), TreeState::Stable);
    tree.do_splits(3).unwrap();
    assert_eq!(tree.num_nodes(), 1);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_dimension_mismatch_between_calls_and_deps() {
    let (calls, _) = four_call_workload();
    let err = ImportTree::new(calls, DependencyMatrix::independent(4), uniform_opts()).unwrap_err();
    assert!(matches!(err, BuildError::DimensionMismatch { .. }));
}

#[test]
fn test_empty_workload_is_stable() {
    let calls = CallMatrix::from_rows(vec!["a".into()], &[]).unwrap();
    let mut tree = build(calls, DependencyMatrix::independent(1), uniform_opts()).unwrap();
    assert_eq!(tree.root().rcost(), 0.0);
    assert_eq!(tree.state(), TreeState::Stable);
    tree.do_splits(3).unwrap();
    assert_eq!(tree.num_nodes(), 1);
}
