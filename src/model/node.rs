//! Node module for constituency tree representation.

use crate::model::tree::TreeIndex;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// A node of a constituency tree.
///
/// A node is either:
/// - **Terminal**: a word, no children
/// - **Nonterminal**: a category label with at least one child;
///   a nonterminal whose only child is a terminal is a *preterminal* (POS tag)
///
/// # Invariants
/// - `index` is the position of this node in the tree arena
/// - `parent` is `None` only for the root
/// - Terminals have no children, nonterminals have at least one
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Node {
    index: TreeIndex,
    label: String,
    parent: Option<TreeIndex>,
    children: Vec<TreeIndex>,
}

impl Node {
    pub(crate) fn new_terminal(index: TreeIndex, word: String) -> Self {
        Node {
            index,
            label: word,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn new_nonterminal(index: TreeIndex, label: String, children: Vec<TreeIndex>) -> Self {
        Node {
            index,
            label,
            parent: None,
            children,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: TreeIndex) {
        self.parent = Some(parent);
    }

    /// Index of this node in the tree arena.
    pub fn index(&self) -> TreeIndex {
        self.index
    }

    /// Category label of a nonterminal, or the word of a terminal.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Index of the parent, `None` for the root.
    pub fn parent_index(&self) -> Option<TreeIndex> {
        self.parent
    }

    /// Indices of the children, left to right.
    pub fn children(&self) -> &[TreeIndex] {
        &self.children
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_nonterminal(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
