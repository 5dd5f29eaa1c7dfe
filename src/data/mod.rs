//! Input matrices consumed by tree construction.
//!
//! Two dense matrices describe a workload:
//!
//! - [`CallMatrix`]: calls × packages, one row per invocation, 1 where the
//!   invocation needs the package after transitive-dependency resolution
//! - [`DependencyMatrix`]: packages × packages, entry `[i, j]` is 1 iff package
//!   `i` is a direct prerequisite of package `j`
//!
//! Both are produced upstream; this module only validates their shape.

mod matrix;

pub use matrix::{CallMatrix, DependencyMatrix};
