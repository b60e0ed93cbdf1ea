// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! API key validation
//!
//! One lightweight authenticated GET per provider against its model-listing
//! endpoint. Gemini authenticates via query parameter; the other two via
//! bearer header. Validation never mutates other state and never returns an
//! error: every outcome is a status with a human-readable message, so each
//! provider's test can be re-triggered independently.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::llm::provider::Provider;
use crate::session::KeyTestStatus;

const GEMINI_PROBE_BASE: &str = "https://generativelanguage.googleapis.com";
const OPENAI_PROBE_BASE: &str = "https://api.openai.com";
const OPENROUTER_PROBE_BASE: &str = "https://openrouter.ai";

const VALID_KEY_MESSAGE: &str = "Key is valid.";
const INVALID_KEY_MESSAGE: &str = "Invalid or incorrect key.";
const NETWORK_FAILURE_MESSAGE: &str = "Network failure while testing the key.";

/// Validates provider credentials with one cheap probe request each
pub struct KeyValidator {
    client: Client,
    gemini_base: String,
    openai_base: String,
    openrouter_base: String,
}

impl KeyValidator {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            gemini_base: GEMINI_PROBE_BASE.to_string(),
            openai_base: OPENAI_PROBE_BASE.to_string(),
            openrouter_base: OPENROUTER_PROBE_BASE.to_string(),
        }
    }

    /// Override one provider's probe base URL
    pub fn with_base_url(mut self, provider: Provider, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        match provider {
            Provider::GoogleGemini => self.gemini_base = base_url,
            Provider::OpenAI => self.openai_base = base_url,
            Provider::OpenRouter => self.openrouter_base = base_url,
        }
        self
    }

    /// Probe one provider with one credential.
    ///
    /// Any 2xx is success; a non-2xx reports the provider's own error
    /// message when the body carries one; transport failure reports a
    /// generic network message.
    pub async fn validate(&self, provider: Provider, api_key: &str) -> KeyTestStatus {
        debug!(provider = provider.display_name(), "probing API key");

        let request = match provider {
            Provider::GoogleGemini => self
                .client
                .get(format!("{}/v1beta/models", self.gemini_base))
                .query(&[("pageSize", "1"), ("key", api_key)]),
            Provider::OpenAI => self
                .client
                .get(format!("{}/v1/models", self.openai_base))
                .bearer_auth(api_key),
            Provider::OpenRouter => self
                .client
                .get(format!("{}/api/v1/models", self.openrouter_base))
                .bearer_auth(api_key)
                .header("HTTP-Referer", "http://localhost:3000")
                .header("X-Title", "LLM Prompter"),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(_) => return KeyTestStatus::error(NETWORK_FAILURE_MESSAGE),
        };

        if response.status().is_success() {
            return KeyTestStatus::success(VALID_KEY_MESSAGE);
        }

        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ProbeErrorBody>(&body).ok())
            .map(|parsed| parsed.error.message)
            .unwrap_or_else(|| INVALID_KEY_MESSAGE.to_string());

        KeyTestStatus::error(message)
    }
}

impl Default for KeyValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ProbeErrorBody {
    error: ProbeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProbeErrorDetail {
    message: String,
}
