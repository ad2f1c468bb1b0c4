//! Tree module for constituency tree representation.
//!
//! This module provides the core data structure for parse trees:
//! - `Tree`: The tree structure using the arena pattern.
//! - `TreeIndex` is used to index nodes.

use crate::model::node::Node;
use std::fmt;
use std::ops::Index;

/// Index of a node in a tree (arena).
pub type TreeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: TreeIndex = usize::MAX;

// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A constituency (phrase structure) tree represented using the arena pattern on [Node].
///
/// Nodes are stored in a contiguous vector and referenced by [TreeIndex],
/// so a tree owns all of its nodes and nothing is shared between trees.
/// Cloning a tree therefore is always a deep copy.
///
/// # Construction
/// Bottom-up: add terminals, then nonterminals over already added children,
/// and finally mark one nonterminal as root with [Tree::set_root].
///
/// # Example
/// ```
/// use rerank_data::model::Tree;
///
/// // (S (NP (NN dogs)) (VP (VBP bark)))
/// let mut tree = Tree::new();
/// let dogs = tree.add_terminal("dogs");
/// let nn = tree.add_nonterminal("NN", vec![dogs]);
/// let np = tree.add_nonterminal("NP", vec![nn]);
/// let bark = tree.add_terminal("bark");
/// let vbp = tree.add_nonterminal("VBP", vec![bark]);
/// let vp = tree.add_nonterminal("VP", vec![vbp]);
/// let s = tree.add_nonterminal("S", vec![np, vp]);
/// tree.set_root(s);
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.words(), vec!["dogs", "bark"]);
/// assert_eq!(tree.to_string(), "(S (NP (NN dogs)) (VP (VBP bark)))");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,

    /// Index of the root of this tree
    root_index: TreeIndex,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new, empty tree.
    pub fn new() -> Self {
        Tree {
            nodes: Vec::new(),
            root_index: NO_ROOT_SET_INDEX,
        }
    }

    /// Creates a new, empty tree with capacity for `num_nodes` nodes.
    pub fn with_capacity(num_nodes: usize) -> Self {
        Tree {
            nodes: Vec::with_capacity(num_nodes),
            root_index: NO_ROOT_SET_INDEX,
        }
    }

    /// Adds a terminal (word) and returns its index.
    pub fn add_terminal<S: Into<String>>(&mut self, word: S) -> TreeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node::new_terminal(index, word.into()));
        index
    }

    /// Adds a nonterminal over the given children and returns its index.
    ///
    /// # Panics
    /// Panics if `children` is empty or refers to nodes not yet added.
    pub fn add_nonterminal<S: Into<String>>(&mut self, label: S, children: Vec<TreeIndex>) -> TreeIndex {
        assert!(!children.is_empty(), "nonterminal needs at least one child");
        let index = self.nodes.len();
        for &child in &children {
            self.nodes[child].set_parent(index);
        }
        self.nodes.push(Node::new_nonterminal(index, label.into(), children));
        index
    }

    /// Marks the node at `index` as root.
    pub fn set_root(&mut self, index: TreeIndex) {
        self.root_index = index;
    }

    /// Returns the root node.
    ///
    /// # Panics
    /// Panics if no root was set.
    pub fn root(&self) -> &Node {
        &self.nodes[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> TreeIndex {
        self.root_index
    }

    /// Returns the node at `index`.
    pub fn node(&self, index: TreeIndex) -> &Node {
        &self.nodes[index]
    }

    /// Iterates over all nodes in arena order (children before parents).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Terminals in sentence order.
    pub fn terminals(&self) -> Vec<&Node> {
        let mut terminals = Vec::new();
        if self.root_index == NO_ROOT_SET_INDEX {
            return terminals;
        }
        let mut stack = vec![self.root_index];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if node.is_terminal() {
                terminals.push(node);
            } else {
                stack.extend(node.children().iter().rev());
            }
        }
        terminals
    }

    /// Words of the sentence in order.
    pub fn words(&self) -> Vec<&str> {
        self.terminals().into_iter().map(Node::label).collect()
    }

    pub fn num_terminals(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_terminal()).count()
    }

    /// Returns `true` if the node at `index` is a preterminal (POS tag),
    /// i.e. a nonterminal whose only child is a terminal.
    pub fn is_preterminal(&self, index: TreeIndex) -> bool {
        match self.nodes[index].children() {
            [child] => self.nodes[*child].is_terminal(),
            _ => false,
        }
    }

    /// `(word, tag)` pairs of the terminals in sentence order.
    pub fn tagged_words(&self) -> Vec<(&str, &str)> {
        self.terminals()
            .into_iter()
            .filter_map(|terminal| {
                let parent = terminal.parent_index()?;
                Some((terminal.label(), self.nodes[parent].label()))
            })
            .collect()
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set, in bounds and the root has no parent
    /// - Node indices match their position in the arena
    /// - Children point back to their parent
    /// - All nodes besides the root have a parent
    pub fn is_valid(&self) -> bool {
        if self.root_index >= self.nodes.len() {
            return false;
        }
        if !self.nodes[self.root_index].is_root() {
            return false;
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.index() != index {
                return false;
            }
            for &child in node.children() {
                if child >= self.nodes.len() || self.nodes[child].parent_index() != Some(index) {
                    return false;
                }
            }
            if index != self.root_index && node.parent_index().is_none() {
                return false;
            }
        }

        true
    }

    /// Writes the bracketing below `index`, walking an explicit stack.
    fn write_node(&self, f: &mut fmt::Formatter, index: TreeIndex) -> fmt::Result {
        enum Token {
            Node(TreeIndex),
            Space,
            Close,
        }

        let mut stack = vec![Token::Node(index)];
        while let Some(token) = stack.pop() {
            match token {
                Token::Close => write!(f, ")")?,
                Token::Node(index) => {
                    let node = &self.nodes[index];
                    if node.is_terminal() {
                        write!(f, "{}", node.label())?;
                        continue;
                    }
                    write!(f, "({}", node.label())?;
                    stack.push(Token::Close);
                    for &child in node.children().iter().rev() {
                        stack.push(Token::Node(child));
                        stack.push(Token::Space);
                    }
                }
                Token::Space => write!(f, " ")?,
            }
        }
        Ok(())
    }
}

impl Index<TreeIndex> for Tree {
    type Output = Node;

    fn index(&self, index: TreeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

/// Writes the tree as a Penn Treebank bracketing.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.root_index == NO_ROOT_SET_INDEX {
            return write!(f, "()");
        }
        self.write_node(f, self.root_index)
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> Tree {
        // (S1 (S (NP (PRP I)) (VP (VBD saw) (NP (PRP her))) (. .)))
        let mut tree = Tree::new();
        let i = tree.add_terminal("I");
        let prp = tree.add_nonterminal("PRP", vec![i]);
        let np = tree.add_nonterminal("NP", vec![prp]);
        let saw = tree.add_terminal("saw");
        let vbd = tree.add_nonterminal("VBD", vec![saw]);
        let her = tree.add_terminal("her");
        let prp2 = tree.add_nonterminal("PRP", vec![her]);
        let np2 = tree.add_nonterminal("NP", vec![prp2]);
        let vp = tree.add_nonterminal("VP", vec![vbd, np2]);
        let dot = tree.add_terminal(".");
        let punct = tree.add_nonterminal(".", vec![dot]);
        let s = tree.add_nonterminal("S", vec![np, vp, punct]);
        let root = tree.add_nonterminal("S1", vec![s]);
        tree.set_root(root);
        tree
    }

    #[test]
    fn test_structure() {
        let tree = small_tree();
        assert!(tree.is_valid());
        assert_eq!(tree.num_terminals(), 4);
        assert_eq!(tree.words(), vec!["I", "saw", "her", "."]);
        assert_eq!(
            tree.tagged_words(),
            vec![("I", "PRP"), ("saw", "VBD"), ("her", "PRP"), (".", ".")]
        );
        assert!(tree.is_preterminal(1));
        assert!(!tree.is_preterminal(2));
        assert_eq!(tree.root().label(), "S1");
    }

    #[test]
    fn test_display() {
        let tree = small_tree();
        assert_eq!(
            tree.to_string(),
            "(S1 (S (NP (PRP I)) (VP (VBD saw) (NP (PRP her))) (. .)))"
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let original = small_tree();
        let copy = original.clone();
        drop(original);
        assert!(copy.is_valid());
        assert_eq!(copy.words(), vec!["I", "saw", "her", "."]);
    }

    #[test]
    fn test_without_root_is_invalid() {
        let mut tree = Tree::new();
        tree.add_terminal("x");
        assert!(!tree.is_valid());
        assert_eq!(tree.to_string(), "()");
        assert!(tree.terminals().is_empty());
    }

    #[test]
    fn test_display_deep_chain() {
        let depth = 200_000;
        let mut tree = Tree::new();
        let mut index = tree.add_terminal("w");
        for _ in 0..depth {
            index = tree.add_nonterminal("X", vec![index]);
        }
        tree.set_root(index);

        let text = tree.to_string();
        assert_eq!(text.len(), depth * 4 + 1);
        assert!(text.starts_with("(X (X "));
        assert!(text.ends_with("w))"));
    }
}
