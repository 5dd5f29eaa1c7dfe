//! Greedy import tree construction.
//!
//! This module groups calls around shared package prerequisites:
//!
//! - [`Node`]: a group of calls with a committed package context
//! - [`Split`]: a candidate partition of one node's calls on one package
//! - [`SplitQueue`]: global best-first queue of pending splits
//! - [`ImportTree`]: owns the node arena and queue, drives refinement
//!
//! # Algorithm
//!
//! 1. The root holds every call; its best split is enqueued
//! 2. Pop the best pending split across the whole tree
//! 3. Move the calls needing the split package into a new child, with that
//!    package committed (its column zeroed)
//! 4. Recompute costs from the child up to the root
//! 5. Enqueue fresh best splits for the child and the split node
//! 6. Repeat until the requested number of splits is applied, the root's
//!    total cost is zero, or nothing is pending
//!
//! # Example
//!
//! ```
//! use zygote_tree::config::SplitOpts;
//! use zygote_tree::data::{CallMatrix, DependencyMatrix};
//! use zygote_tree::tree::{build, TreeState};
//!
//! let calls = CallMatrix::from_rows(
//!     vec!["numpy".into(), "pandas".into()],
//!     &[vec![1, 1], vec![1, 0], vec![1, 1]],
//! ).unwrap();
//! // numpy is a prerequisite of pandas
//! let deps = DependencyMatrix::from_rows(&[vec![0, 1], vec![0, 0]]).unwrap();
//! let opts = SplitOpts::builder().prereq_first(true).build().unwrap();
//!
//! let mut tree = build(calls, deps, opts).unwrap();
//! tree.do_splits(10).unwrap();
//! assert_eq!(tree.state(), TreeState::Stable);
//! assert_eq!(tree.root().rcost(), 0.0);
//! ```

mod dump;
mod grower;
mod node;
mod queue;
mod split;

pub use grower::{build, ImportTree, TreeState, BENEFIT_TOLERANCE};
pub use node::{Node, NodeId};
pub use queue::{SplitCandidate, SplitQueue};
pub use split::Split;
