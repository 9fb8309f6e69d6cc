//! Model identity and context limit.

use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A completion model and the context budget it imposes.
///
/// Immutable once constructed; identifies which tokenizer and context limit
/// apply to messages counted under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    name: String,
    max_tokens: usize,
}

impl Model {
    /// Create a new model reference.
    ///
    /// Fails if the name is empty or the context budget is zero.
    pub fn new(name: impl Into<String>, max_tokens: usize) -> Result<Self, ChatError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ChatError::invalid_model("model name is empty"));
        }
        if max_tokens == 0 {
            return Err(ChatError::invalid_model(format!(
                "model '{name}' must have a positive token budget"
            )));
        }
        Ok(Self { name, max_tokens })
    }

    /// The model's name, as sent to the provider and tokenizer.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum context size in tokens.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_new() {
        let model = Model::new("gpt-4o-mini", 128_000).unwrap();
        assert_eq!(model.name(), "gpt-4o-mini");
        assert_eq!(model.max_tokens(), 128_000);
    }

    #[test]
    fn test_model_rejects_empty_name() {
        assert!(Model::new("", 100).is_err());
    }

    #[test]
    fn test_model_rejects_zero_budget() {
        assert!(Model::new("gpt-4o-mini", 0).is_err());
    }

    #[test]
    fn test_model_serde_roundtrip() {
        let model = Model::new("gpt-4o", 128_000).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let parsed: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(model, parsed);
    }
}
