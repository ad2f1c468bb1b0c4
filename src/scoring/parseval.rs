//! PARSEVAL labeled bracket extraction with evalb-style defaults.

use crate::model::{Tree, TreeIndex};
use crate::scoring::edges::{Edge, EdgeSet};
use crate::scoring::BracketScorer;

/// Preterminals whose words do not count as span positions
const DEFAULT_IGNORED_TAGS: &[&str] = &[",", ":", "``", "''", ".", "-NONE-"];

/// Root labels not counted as a bracket
const DEFAULT_ROOT_LABELS: &[&str] = &["", "ROOT", "TOP", "S1"];

/// Labels scored as the same category
const DEFAULT_EQUIVALENT_LABELS: &[(&str, &str)] = &[("PRT", "ADVP")];

// =#========================================================================#=
// PARSEVAL SCORER
// =#========================================================================$=
/// Labeled bracket scorer following the usual evalb parameters.
///
/// * Words tagged with an ignored tag (punctuation, empty elements) are
///   removed before spans are computed
/// * Preterminals are not brackets; neither is a root labeled
///   `ROOT`, `TOP`, `S1` or with an empty label
/// * Constituents left without words are dropped
/// * Function tags and co-indices are stripped (`NP-SBJ-1` → `NP`)
/// * `PRT` is scored as `ADVP`
///
/// # Example
/// ```
/// use rerank_data::scoring::{BracketScorer, ParsevalScorer};
/// use rerank_data::treebank::parse_tree;
///
/// let gold = parse_tree("(S1 (S (NP-SBJ (PRP I)) (VP (VBD ran) (ADVP (RB away))) (. .)))", false)?;
/// let test = parse_tree("(S1 (S (NP (PRP I)) (VP (VBD ran) (PRT (RP away))) (. .)))", false)?;
///
/// let scorer = ParsevalScorer::default();
/// let gold_edges = scorer.edges(&gold);
/// let counts = scorer.compare(&gold_edges, &test);
/// assert_eq!(gold_edges.nedges(), 4);
/// assert_eq!(counts.common, 4);
/// # Ok::<(), rerank_data::parser::ParsingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParsevalScorer {
    ignored_tags: Vec<String>,
    root_labels: Vec<String>,
    equivalent_labels: Vec<(String, String)>,
}

impl Default for ParsevalScorer {
    fn default() -> Self {
        ParsevalScorer {
            ignored_tags: DEFAULT_IGNORED_TAGS.iter().map(|s| s.to_string()).collect(),
            root_labels: DEFAULT_ROOT_LABELS.iter().map(|s| s.to_string()).collect(),
            equivalent_labels: DEFAULT_EQUIVALENT_LABELS
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }
}

impl ParsevalScorer {
    /// Replaces the preterminal tags whose words are ignored.
    pub fn with_ignored_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the pairs of labels scored as equal (first is mapped to second).
    pub fn with_equivalent_labels<I, S>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        self.equivalent_labels = pairs.into_iter().map(|(a, b)| (a.into(), b.into())).collect();
        self
    }

    /// Strips function tags and co-indices, then applies label equivalences.
    pub fn normalize_label(&self, label: &str) -> String {
        let base = label
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-' || c == '=')
            .map_or(label, |(i, _)| &label[..i]);
        self.equivalent_labels
            .iter()
            .find(|(from, _)| from == base)
            .map_or(base, |(_, to)| to.as_str())
            .to_string()
    }

    fn is_ignored_tag(&self, tag: &str) -> bool {
        self.ignored_tags.iter().any(|t| t == tag)
    }

    /// Collects the brackets of `tree` in one post-order walk over an
    /// explicit stack, counting word positions as it goes.
    fn collect_edges(&self, tree: &Tree, edges: &mut EdgeSet) {
        enum Visit {
            Enter(TreeIndex),
            Exit { index: TreeIndex, left: usize },
        }

        let mut position = 0;
        let mut stack = vec![Visit::Enter(tree.root_index())];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(index) => {
                    let node = &tree[index];
                    if node.is_terminal() {
                        position += 1;
                    } else if tree.is_preterminal(index) {
                        if !self.is_ignored_tag(node.label()) {
                            position += 1;
                        }
                    } else {
                        stack.push(Visit::Exit { index, left: position });
                        stack.extend(node.children().iter().rev().map(|&child| Visit::Enter(child)));
                    }
                }
                Visit::Exit { index, left } => {
                    let node = &tree[index];
                    let is_unscored_root =
                        node.is_root() && self.root_labels.iter().any(|root| root == node.label());
                    if position > left && !is_unscored_root {
                        edges.insert(Edge::new(self.normalize_label(node.label()), left, position));
                    }
                }
            }
        }
    }
}

impl BracketScorer for ParsevalScorer {
    fn edges(&self, tree: &Tree) -> EdgeSet {
        let mut edges = EdgeSet::new();
        if tree.is_valid() {
            self.collect_edges(tree, &mut edges);
        }
        edges
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;
    use crate::treebank::parse_tree;

    fn edges_of(text: &str) -> EdgeSet {
        ParsevalScorer::default().edges(&parse_tree(text, false).unwrap())
    }

    #[test]
    fn test_spans_skip_punctuation() {
        let edges = edges_of("(S1 (S (NP (DT The) (NN dog)) (, ,) (VP (VBD barked)) (. .)))");
        assert_eq!(edges.nedges(), 3);
        assert_eq!(edges.count(&Edge::new("S", 0, 3)), 1);
        assert_eq!(edges.count(&Edge::new("NP", 0, 2)), 1);
        assert_eq!(edges.count(&Edge::new("VP", 2, 3)), 1);
    }

    #[test]
    fn test_empty_elements_dropped() {
        let edges = edges_of("( (S (NP-SBJ (-NONE- *)) (VP (VB Go)) (. !)))");
        assert_eq!(edges.nedges(), 2);
        assert_eq!(edges.count(&Edge::new("S", 0, 1)), 1);
        assert_eq!(edges.count(&Edge::new("VP", 0, 1)), 1);
    }

    #[test]
    fn test_unary_chain_counts_twice() {
        let edges = edges_of("(S1 (NP (NP (NN cat))))");
        assert_eq!(edges.count(&Edge::new("NP", 0, 1)), 2);
    }

    #[test]
    fn test_scored_root() {
        let edges = edges_of("(S (NP (NN cat)) (VP (VBZ sleeps)))");
        assert_eq!(edges.count(&Edge::new("S", 0, 2)), 1);
        assert_eq!(edges.nedges(), 3);
    }

    #[test]
    fn test_normalize_label() {
        let scorer = ParsevalScorer::default();
        assert_eq!(scorer.normalize_label("NP-SBJ-1"), "NP");
        assert_eq!(scorer.normalize_label("NP=2"), "NP");
        assert_eq!(scorer.normalize_label("-NONE-"), "-NONE");
        assert_eq!(scorer.normalize_label("PRT"), "ADVP");
        assert_eq!(scorer.normalize_label("VP"), "VP");
    }

    #[test]
    fn test_compare_counts() {
        let scorer = ParsevalScorer::default();
        let gold = scorer.edges(&parse_tree("(S1 (S (NP (DT a) (NN b)) (VP (VB c) (NP (NN d)))))", false).unwrap());
        let test = parse_tree("(S1 (S (NP (DT a)) (VP (NN b) (VB c) (NP (NN d)))))", false).unwrap();
        let counts = scorer.compare(&gold, &test);
        assert_eq!(gold.nedges(), 4);
        assert_eq!(counts.candidate, 4);
        assert_eq!(counts.common, 2);
    }

    #[test]
    fn test_custom_ignored_tags() {
        let scorer = ParsevalScorer::default().with_ignored_tags(Vec::<String>::new());
        let edges = scorer.edges(&parse_tree("(S1 (S (NP (NN x)) (. .)))", false).unwrap());
        assert_eq!(edges.count(&Edge::new("S", 0, 2)), 1);
    }

    #[test]
    fn test_custom_equivalent_labels() {
        let scorer = ParsevalScorer::default().with_equivalent_labels([("ADVP", "PRT")]);
        assert_eq!(scorer.normalize_label("ADVP-TMP"), "PRT");
        assert_eq!(scorer.normalize_label("PRT"), "PRT");
    }

    #[test]
    fn test_deeply_nested_tree() {
        let depth = 200_000;
        let text = format!("(S1 {}(NN w){})", "(NP ".repeat(depth), ")".repeat(depth));
        let edges = edges_of(&text);
        assert_eq!(edges.nedges(), depth);
        assert_eq!(edges.count(&Edge::new("NP", 0, 1)), depth);
    }
}
