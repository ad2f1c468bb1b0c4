//! Constituency tree model.
//!
//! [Tree] uses the arena pattern: all [Node]s live in one vector and refer
//! to each other by [TreeIndex]. A tree exclusively owns its nodes, hence
//! cloning is a deep copy and no node is ever shared between two trees.

pub mod node;
pub mod tree;

pub use node::Node;
pub use tree::{Tree, TreeIndex};
