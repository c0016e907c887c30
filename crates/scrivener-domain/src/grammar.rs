//! Grammar-checker match value type

/// One problem reported by a grammar-checking service
///
/// `offset` and `length` are measured in characters of the checked text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarMatch {
    /// Character offset of the flagged span
    pub offset: usize,

    /// Character length of the flagged span
    pub length: usize,

    /// Human-readable explanation
    pub message: String,

    /// Identifier of the rule that fired
    pub rule_id: String,

    /// Replacement suggestions, best first
    pub suggestions: Vec<String>,
}

impl GrammarMatch {
    /// The best suggestion, if the checker offered any
    pub fn top_suggestion(&self) -> Option<&str> {
        self.suggestions.first().map(String::as_str)
    }

    /// Exclusive end offset of the flagged span
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}
