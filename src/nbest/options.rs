//! Read configuration shared by all record readers.

/// Options for reading n-best data.
///
/// # Configuration
/// * [`with_downcase()`](Self::with_downcase) - lower-case words of all trees
/// * [`with_ignore_trees()`](Self::with_ignore_trees) - skip tree text; only
///   counts and log probabilities are kept and nothing is scored
/// * [`with_max_line_len(n)`](Self::with_max_line_len) - fail on tree lines
///   longer than `n` bytes; by default lines may have any length
///
/// # Example
/// ```
/// use rerank_data::nbest::ReadOptions;
///
/// let options = ReadOptions::new().with_downcase().with_max_line_len(1 << 16);
/// assert!(options.downcase());
/// assert!(!options.ignore_trees());
/// assert_eq!(options.max_line_len(), Some(65536));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    downcase: bool,
    ignore_trees: bool,
    max_line_len: Option<usize>,
}

impl ReadOptions {
    /// Creates default options: keep case, keep trees, unbounded lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower-case the words of gold and candidate trees.
    pub fn with_downcase(mut self) -> Self {
        self.downcase = true;
        self
    }

    /// Skip tree text instead of parsing it.
    pub fn with_ignore_trees(mut self) -> Self {
        self.ignore_trees = true;
        self
    }

    /// Fail on tree lines longer than `max_line_len` bytes.
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = Some(max_line_len);
        self
    }

    pub fn downcase(&self) -> bool {
        self.downcase
    }

    pub fn ignore_trees(&self) -> bool {
        self.ignore_trees
    }

    pub fn max_line_len(&self) -> Option<usize> {
        self.max_line_len
    }
}
