//! Branch-and-bound nodes and pair branching.
//!
//! Each node narrows the set of admissible batches with two kinds of
//! constraints, accumulated monotonically from the root:
//!
//! - **together(a, b)**: `a` and `b` are in the same batch or both absent
//!   (equality groups);
//! - **apart(a, b)**: `a` and `b` never share a batch (disjoint pairs).
//!
//! The exact oracle only emits columns respecting the active node and the
//! DP oracle filters violators out;
//! [`Batch::check_branching`](crate::models::Batch::check_branching) is the
//! independent check.
//!
//! # Reference
//! Vanderbeck (2000), "On Dantzig-Wolfe decomposition in integer programming
//! and ways to perform branching in a branch-and-price algorithm"

mod node;
mod selection;
mod tree;

pub use node::{BranchNode, NodeId};
pub use selection::select_branching_pair;
pub use tree::BranchTree;
