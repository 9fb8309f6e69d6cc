//! Token counting seam.
//!
//! Token costs are obtained from an external tokenizer keyed by model name;
//! this crate never decodes tokens, it only budgets them. Implementations are
//! expected to be pure and cheap per call.

/// Counts the token cost of a piece of text under a given model.
pub trait Tokenizer: Send + Sync {
    /// Count the tokens `text` would occupy in `model`'s context window.
    fn count_tokens(&self, model: &str, text: &str) -> usize;
}

/// Character-based token estimate (~4 characters per token, rounded up).
///
/// Good enough for budgeting when no model-exact tokenizer is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenizer;

impl Tokenizer for HeuristicTokenizer {
    fn count_tokens(&self, _model: &str, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_rounds_up() {
        let t = HeuristicTokenizer;
        assert_eq!(t.count_tokens("any", ""), 0);
        assert_eq!(t.count_tokens("any", "abc"), 1);
        assert_eq!(t.count_tokens("any", "abcd"), 1);
        assert_eq!(t.count_tokens("any", "abcde"), 2);
    }

    #[test]
    fn test_heuristic_counts_chars_not_bytes() {
        let t = HeuristicTokenizer;
        // Four multi-byte characters should still be one token.
        assert_eq!(t.count_tokens("any", "éééé"), 1);
    }
}
