// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module for Prompter
//!
//! Model configuration carried on every completion call, plus the numeric
//! limits read from the environment at startup.

use serde::{Deserialize, Serialize};

use crate::error::{PrompterError, Result};
use crate::llm::provider::Provider;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default nucleus sampling parameter
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Model configuration for one completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which backend to call
    pub provider: Provider,

    /// Model identifier, provider-specific
    pub model: String,

    /// Sampling temperature, must stay within [0, 2]
    pub temperature: f32,

    /// Nucleus sampling parameter, must stay within [0, 1]
    pub top_p: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let provider = Provider::GoogleGemini;
        Self {
            provider,
            model: provider.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}

impl ModelConfig {
    /// Config for a provider with its default model and standard sampling
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }

    /// Config pinned to a provider's meta-operation model
    pub fn meta(provider: Provider, temperature: f32) -> Self {
        Self {
            provider,
            model: provider.meta_model().to_string(),
            temperature,
            top_p: DEFAULT_TOP_P,
        }
    }

    /// Enforce the configuration invariants
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(PrompterError::Config(
                "Model name must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(PrompterError::Config(format!(
                "Temperature {} is outside the valid range [0, 2]",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(PrompterError::Config(format!(
                "Top-p {} is outside the valid range [0, 1]",
                self.top_p
            )));
        }
        Ok(())
    }
}

/// Numeric limits read from environment-style configuration at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Limits {
    /// Maximum combined length of the composed system prompt
    pub max_prompt_length: usize,

    /// Maximum number of blocks in the editable list
    pub max_blocks: usize,

    /// Rate-limit window in seconds (read for external collaborators)
    pub rate_limit_window_secs: u64,

    /// Maximum requests allowed per window
    pub rate_limit_max_requests: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_prompt_length: 10_000,
            max_blocks: 20,
            rate_limit_window_secs: 60,
            rate_limit_max_requests: 10,
        }
    }
}

impl Limits {
    /// Read limits from the environment, falling back to fixed defaults when
    /// a variable is unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_prompt_length: env_or("PROMPTER_MAX_PROMPT_LENGTH", defaults.max_prompt_length),
            max_blocks: env_or("PROMPTER_MAX_BLOCKS", defaults.max_blocks),
            rate_limit_window_secs: env_or(
                "PROMPTER_RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window_secs,
            ),
            rate_limit_max_requests: env_or(
                "PROMPTER_RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
