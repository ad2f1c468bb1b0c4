//! Structs and logic to parse Penn Treebank bracketings.

use crate::model::{Tree, TreeIndex};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;

/// Bytes ending a label or a word
const TREEBANK_DELIMITERS: &[u8] = b"() \t\r\n";

/// Guess of nodes per tree to avoid early reallocations
const DEFAULT_NUM_NODES_GUESS: usize = 64;

// =#========================================================================#=
// TREEBANK PARSER
// =#========================================================================$=
/// Parser (configuration) for Penn Treebank style bracketed trees.
///
/// # Configuration
/// * [`with_downcase()`](Self::with_downcase)
///     - lower-cases all terminals (words); category labels stay untouched.
///
/// # Format
/// * `tree ::= node`
/// * `node ::= '(' [label] (node+ | word) ')'`
///
/// Furthermore:
/// * Labels and words are delimited by whitespace and parentheses
/// * The root label may be empty, as in `( (S ...) )`
/// * Nothing but whitespace may follow the root
///
/// # Example
/// ```
/// use rerank_data::treebank::TreebankParser;
/// use rerank_data::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("(S1 (NP (NNP Pierre) (NNP Vinken)))");
/// let tree = TreebankParser::new().with_downcase().parse_tree(&mut byte_parser).unwrap();
/// assert_eq!(tree.words(), vec!["pierre", "vinken"]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TreebankParser {
    downcase: bool,
}

impl TreebankParser {
    /// Creates a new [TreebankParser] keeping words as they are.
    pub fn new() -> Self {
        Self { downcase: false }
    }

    /// Configures the parser to lower-case terminals.
    pub fn with_downcase(mut self) -> Self {
        self.downcase = true;
        self
    }

    /// Configures whether the parser lower-cases terminals.
    pub fn set_downcase(&mut self, downcase: bool) -> &mut Self {
        self.downcase = downcase;
        self
    }

    /// Parses a single bracketed tree from the given [ByteParser].
    ///
    /// After the tree, only whitespace may remain in the input.
    ///
    /// # Errors
    /// `InvalidTree` if the bracketing is malformed, `UnexpectedEOF` if the
    /// input ends inside the tree.
    pub fn parse_tree<B: ByteSource>(&self, parser: &mut ByteParser<B>) -> Result<Tree, ParsingError> {
        let mut tree = Tree::with_capacity(DEFAULT_NUM_NODES_GUESS);

        parser.skip_whitespace();
        if !parser.peek_is(b'(') {
            let found = parser.peek().map(char::from);
            return Err(ParsingError::invalid_tree(
                parser,
                format!("Expected '(' at start of tree but found {:?}", found),
            ));
        }

        let root = self.parse_node(parser, &mut tree)?;
        tree.set_root(root);

        parser.skip_whitespace();
        if !parser.is_eof() {
            return Err(ParsingError::invalid_tree(
                parser,
                "Unexpected text after end of tree".to_string(),
            ));
        }

        Ok(tree)
    }

    /// Parses `'(' [label] (node+ | word) ')'` and returns the node index.
    /// Expects the parser at the opening `(`.
    ///
    /// Open constituents are kept on an explicit stack, so nesting depth is
    /// bounded by memory rather than by the call stack.
    fn parse_node<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<TreeIndex, ParsingError> {
        let mut open: Vec<OpenConstituent> = vec![Self::open_constituent(parser)];

        loop {
            parser.skip_whitespace();
            match parser.peek() {
                None => return Err(ParsingError::unexpected_eof(parser)),
                Some(b'(') => open.push(Self::open_constituent(parser)),
                Some(b')') => {
                    parser.next_byte();
                    let Some(constituent) = open.pop() else {
                        return Err(ParsingError::invalid_tree(parser, "Unbalanced ')'".to_string()));
                    };
                    let index = Self::close_constituent(parser, tree, constituent)?;
                    match open.last_mut() {
                        Some(parent) => parent.children.push(index),
                        None => return Ok(index),
                    }
                }
                Some(_) => {
                    let word = Self::parse_symbol(parser);
                    let word = if self.downcase { word.to_lowercase() } else { word };
                    let index = tree.add_terminal(word);
                    if let Some(parent) = open.last_mut() {
                        parent.children.push(index);
                    }
                }
            }
        }
    }

    /// Consumes `'(' [label]`.
    fn open_constituent<B: ByteSource>(parser: &mut ByteParser<B>) -> OpenConstituent {
        parser.next_byte(); // consume '('
        parser.skip_whitespace();
        OpenConstituent {
            label: Self::parse_symbol(parser),
            children: Vec::new(),
        }
    }

    /// Checks a constituent whose `)` was just consumed and adds it to the tree.
    fn close_constituent<B: ByteSource>(
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
        constituent: OpenConstituent,
    ) -> Result<TreeIndex, ParsingError> {
        let OpenConstituent { label, children } = constituent;
        if children.is_empty() {
            return Err(ParsingError::invalid_tree(
                parser,
                format!("Empty constituent ({label})"),
            ));
        }
        if children.len() > 1 && children.iter().any(|&child| tree[child].is_terminal()) {
            return Err(ParsingError::invalid_tree(
                parser,
                format!("Constituent ({label} ...) mixes words and phrases"),
            ));
        }

        Ok(tree.add_nonterminal(label, children))
    }

    /// Parses a label or word up to the next delimiter.
    fn parse_symbol<B: ByteSource>(parser: &mut ByteParser<B>) -> String {
        let mut symbol = Vec::new();
        while let Some(b) = parser.peek() {
            if TREEBANK_DELIMITERS.contains(&b) {
                break;
            }
            symbol.push(b);
            parser.next_byte();
        }
        String::from_utf8_lossy(&symbol).into_owned()
    }
}

/// A constituent whose `(` was read but not yet its `)`.
struct OpenConstituent {
    label: String,
    children: Vec<TreeIndex>,
}

// =#========================================================================#=
// TESTS
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parsing_error::ParsingErrorType;

    fn parse(text: &str) -> Result<Tree, ParsingError> {
        TreebankParser::new().parse_tree(&mut ByteParser::for_str(text))
    }

    #[test]
    fn test_parse_simple_tree() {
        let tree = parse("(S1 (S (NP (DT The) (NN dog)) (VP (VBD barked)) (. .)))").unwrap();
        assert!(tree.is_valid());
        assert_eq!(tree.root().label(), "S1");
        assert_eq!(tree.words(), vec!["The", "dog", "barked", "."]);
        assert_eq!(
            tree.to_string(),
            "(S1 (S (NP (DT The) (NN dog)) (VP (VBD barked)) (. .)))"
        );
    }

    #[test]
    fn test_parse_empty_root_label() {
        let tree = parse("( (S (NP-SBJ (PRP He)) (VP (VBZ runs))) )\n").unwrap();
        assert_eq!(tree.root().label(), "");
        assert_eq!(tree.root().children().len(), 1);
        assert_eq!(tree.words(), vec!["He", "runs"]);
    }

    #[test]
    fn test_downcase_only_words() {
        let mut byte_parser = ByteParser::for_str("(S1 (NP (NNP Pierre) (NNP VINKEN)))");
        let tree = TreebankParser::new()
            .with_downcase()
            .parse_tree(&mut byte_parser)
            .unwrap();
        assert_eq!(
            tree.tagged_words(),
            vec![("pierre", "NNP"), ("vinken", "NNP")]
        );
    }

    #[test]
    fn test_unbalanced_tree_fails() {
        let err = parse("(S1 (NP (NN dog))").unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEOF);
    }

    #[test]
    fn test_trailing_text_fails() {
        let err = parse("(S1 (NN dog)) )").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidTree(_)));
    }

    #[test]
    fn test_missing_open_paren_fails() {
        let err = parse("S1 (NN dog)").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidTree(_)));
    }

    #[test]
    fn test_empty_constituent_fails() {
        let err = parse("(S1 (NP ))").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::InvalidTree(_)));
    }

    #[test]
    fn test_deeply_nested_tree() {
        let depth = 200_000;
        let text = format!("{}w{}", "(X ".repeat(depth), ")".repeat(depth));
        let tree = parse(&text).unwrap();
        assert_eq!(tree.num_nodes(), depth + 1);
        assert_eq!(tree.words(), vec!["w"]);
        assert!(tree.is_valid());
    }

    #[test]
    fn test_deeply_nested_unbalanced_tree_fails() {
        let text = format!("{}w", "(X ".repeat(100_000));
        let err = parse(&text).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEOF);
    }
}
