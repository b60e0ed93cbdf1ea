// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Provider enumeration and the stream adapter trait
//!
//! Defines the abstraction layer over the supported LLM backends. Every
//! adapter turns a (system instruction, user prompt, config, credential)
//! tuple into a lazy stream of plain text fragments, discarding the
//! provider-specific envelope.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;
use std::str::FromStr;

use crate::config::ModelConfig;
use crate::error::{PrompterError, Result};

/// A lazy, finite, single-consumption sequence of text fragments.
///
/// Concatenating all fragments in order yields the full response text.
/// Each stream owns its decode state, so abandoning iteration mid-stream
/// cannot corrupt a later operation.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// The supported LLM backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "Google Gemini")]
    GoogleGemini,
    #[serde(rename = "OpenAI")]
    OpenAI,
    #[serde(rename = "Open Router")]
    OpenRouter,
}

impl Provider {
    /// All providers, in presentation order
    pub const ALL: [Provider; 3] = [
        Provider::GoogleGemini,
        Provider::OpenAI,
        Provider::OpenRouter,
    ];

    /// Human-readable provider name, also used as the credential JSON key
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::GoogleGemini => "Google Gemini",
            Provider::OpenAI => "OpenAI",
            Provider::OpenRouter => "Open Router",
        }
    }

    /// Curated model list for this provider; the first entry is the default
    pub fn default_models(&self) -> &'static [&'static str] {
        match self {
            Provider::GoogleGemini => {
                &["gemini-2.5-flash", "gemini-2.5-flash-lite", "gemini-2.5-pro"]
            }
            Provider::OpenAI => &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"],
            Provider::OpenRouter => &[
                "anthropic/claude-3-opus",
                "anthropic/claude-3.5-sonnet",
                "anthropic/claude-3.7-sonnet",
                "anthropic/claude-3-sonnet",
                "anthropic/claude-3-haiku",
                "google/gemini-2.5-flash",
                "google/gemini-2.5-flash-lite",
                "google/gemini-2.5-pro",
                "openai/gpt-4o",
                "openai/gpt-4o-mini",
                "openai/gpt-4-turbo",
                "openai/gpt-3.5-turbo",
                "meta-llama/llama-3-70b-instruct",
                "mistralai/mistral-large",
                "cohere/command-r-plus",
            ],
        }
    }

    /// First default model for this provider
    pub fn default_model(&self) -> &'static str {
        self.default_models()[0]
    }

    /// Model pinned for meta-operations (create/refine/improve)
    pub fn meta_model(&self) -> &'static str {
        match self {
            Provider::GoogleGemini => "gemini-2.5-flash",
            Provider::OpenAI => "gpt-4o",
            Provider::OpenRouter => "anthropic/claude-3.5-sonnet",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = PrompterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google gemini" | "gemini" | "google" => Ok(Provider::GoogleGemini),
            "openai" => Ok(Provider::OpenAI),
            "open router" | "openrouter" => Ok(Provider::OpenRouter),
            other => Err(PrompterError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Trait implemented by each provider stream adapter
#[async_trait]
pub trait StreamAdapter: Send + Sync {
    /// The provider this adapter speaks for
    fn provider(&self) -> Provider;

    /// Open a streaming completion call.
    ///
    /// Fails immediately with a configuration error (and zero network calls)
    /// when `api_key` is empty. Provider envelope fields (ids, object tags,
    /// finish reasons, role markers) are discarded; only incremental text
    /// fragments come back.
    async fn stream(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        config: &ModelConfig,
        api_key: &str,
    ) -> Result<TextStream>;
}

/// Standard configuration error for a missing or empty credential
pub fn missing_api_key_error(provider: Provider) -> PrompterError {
    PrompterError::Config(format!(
        "API key for {} is not configured. Please add it in the API key configuration panel.",
        provider.display_name()
    ))
}

/// Wrap a transport-level failure with the provider's display name
pub fn network_error(provider: Provider, err: impl fmt::Display) -> PrompterError {
    PrompterError::Network {
        provider: provider.display_name().to_string(),
        message: err.to_string(),
    }
}
