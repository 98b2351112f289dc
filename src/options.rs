/// Default nesting limit for blocks and lists.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Knobs for parsing and decoding.
///
/// The grammar itself places no bound on nesting, so the parser enforces
/// `max_depth` to keep recursion (in both the parser and the decoder, which
/// only recurses along the tree) bounded for adversarial input.
///
/// # Examples
///
/// ```rust
/// use blockconf::Options;
/// let opts = Options::default().with_max_depth(2);
/// assert!(blockconf::parse_with("a { b { } }", &opts).is_ok());
/// assert!(blockconf::parse_with("a { b { c { } } }", &opts).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub max_depth: usize,
}

impl Options {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
