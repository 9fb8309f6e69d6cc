//! Configuration loading and persistence.

use super::Config;
use crate::error::{ChatError, ConfigError};
use crate::types::{ChatConfig, Model};
use std::fs;
use std::path::Path;

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.model.name.is_empty() {
            errors.push("model.name cannot be empty".to_string());
        }
        if self.model.max_context_tokens == 0 {
            errors.push("model.max_context_tokens must be positive".to_string());
        }
        if self.initial_system_message.is_empty() {
            errors.push("initial_system_message cannot be empty".to_string());
        }

        let c = &self.completion;
        for (name, value, min, max) in [
            ("completion.temperature", c.temperature, 0.0, 2.0),
            ("completion.top_p", c.top_p, 0.0, 2.0),
            ("completion.presence_penalty", c.presence_penalty, -2.0, 2.0),
            ("completion.frequency_penalty", c.frequency_penalty, -2.0, 2.0),
        ] {
            // NaN compares false against both bounds, so reject it explicitly.
            if value.is_nan() || value < min || value > max {
                errors.push(format!("{name} must be within [{min}, {max}], got {value}"));
            }
        }
        if c.n == 0 {
            errors.push("completion.n must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Build the per-chat generation parameters from this configuration.
    pub fn to_chat_config(&self) -> Result<ChatConfig, ChatError> {
        Ok(ChatConfig {
            model: Model::new(&self.model.name, self.model.max_context_tokens)?,
            temperature: self.completion.temperature,
            top_p: self.completion.top_p,
            n: self.completion.n,
            stop: self.completion.stop.clone(),
            max_completion_tokens: self.completion.max_tokens,
            presence_penalty: self.completion.presence_penalty,
            frequency_penalty: self.completion.frequency_penalty,
        })
    }
}
