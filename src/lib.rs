//! zygote-tree: import-sharing trees for serverless function invocations.
//!
//! Groups invocations ("calls") by the packages they import, so a runtime can
//! pre-import shared package sets once per group instead of once per call.
//!
//! # Key Types
//!
//! - [`CallMatrix`] / [`DependencyMatrix`] - Input matrices
//! - [`SplitOpts`] - Weights, prerequisite ordering, entropy penalty
//! - [`ImportTree`] - Greedy tree construction and refinement
//! - [`TreeDocument`] - Saved tree structure
//!
//! # Example
//!
//! ```
//! use zygote_tree::{build, CallMatrix, DependencyMatrix, SplitOpts};
//!
//! let calls = CallMatrix::from_rows(
//!     vec!["a".into(), "b".into(), "c".into()],
//!     &[vec![1, 0, 0], vec![1, 1, 0], vec![0, 1, 0], vec![0, 0, 1]],
//! ).unwrap();
//! let deps = DependencyMatrix::independent(3);
//!
//! let mut tree = build(calls, deps, SplitOpts::default()).unwrap();
//! tree.do_splits(2).unwrap().do_splits(2).unwrap();
//! println!("{}", tree.dump());
//! ```

// Re-export approx traits for users who want to compare costs
pub use approx;

pub mod config;
pub mod cost;
pub mod data;
pub mod error;
pub mod logger;
pub mod persist;
pub mod testing;
pub mod tree;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, SplitOpts};
pub use cost::CostModel;
pub use data::{CallMatrix, DependencyMatrix};
pub use error::{BuildError, DataError, PersistError};
pub use logger::{BuildLogger, Verbosity};
pub use persist::{TreeDocument, TreeInput};
pub use tree::{build, ImportTree, Node, NodeId, TreeState};
