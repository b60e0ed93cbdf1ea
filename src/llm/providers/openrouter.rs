// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! OpenRouter streaming adapter
//!
//! OpenRouter is OpenAI-compatible on the wire; it additionally accepts two
//! bookkeeping headers identifying the calling site. Their absence never
//! changes data decoding, only upstream rankings.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::llm::provider::{
    missing_api_key_error, network_error, Provider, StreamAdapter, TextStream,
};
use crate::llm::providers::common::{
    ensure_readable_body, parse_error_body, ChatCompletionRequest,
};
use crate::llm::sse::{chat_completion_delta, SseEvent, SseLineDecoder};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Fallback referer when no site URL is configured
const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Title reported to OpenRouter rankings
const SITE_NAME: &str = "LLM Prompter";

/// OpenRouter provider - many models behind one OpenAI-compatible API
pub struct OpenRouterAdapter {
    client: Client,
    base_url: String,
    site_url: String,
    site_name: String,
}

impl OpenRouterAdapter {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: OPENROUTER_API_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            site_name: SITE_NAME.to_string(),
        }
    }

    /// Create with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::new()
        }
    }

    /// Set the site URL reported in the HTTP-Referer header
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    /// Set the site name reported in the X-Title header
    pub fn with_site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = name.into();
        self
    }
}

impl Default for OpenRouterAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamAdapter for OpenRouterAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenRouter
    }

    async fn stream(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        config: &ModelConfig,
        api_key: &str,
    ) -> Result<TextStream> {
        if api_key.is_empty() {
            return Err(missing_api_key_error(Provider::OpenRouter));
        }

        let body = ChatCompletionRequest::streaming(config, system_instruction, user_prompt);

        debug!(model = %config.model, "opening OpenRouter streaming completion");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.site_name)
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(Provider::OpenRouter, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error_body(status, &body).into());
        }
        ensure_readable_body(&response)?;

        let mut byte_stream = response.bytes_stream();

        let fragments = async_stream::try_stream! {
            let mut decoder = SseLineDecoder::new();
            let mut done = false;

            while let Some(chunk) = byte_stream.next().await {
                let chunk = chunk.map_err(|e| network_error(Provider::OpenRouter, e))?;
                for event in decoder.push(&chunk) {
                    match event {
                        SseEvent::Done => {
                            done = true;
                            break;
                        }
                        SseEvent::Data(data) => {
                            if let Some(text) = chat_completion_delta(&data) {
                                yield text;
                            }
                        }
                    }
                }
                if done {
                    break;
                }
            }
        };

        Ok(Box::pin(fragments))
    }
}
