// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! OpenAI streaming adapter
//!
//! Issues a `stream: true` chat-completion call and decodes the SSE byte
//! stream into plain text fragments.

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

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI chat-completions provider
pub struct OpenAiAdapter {
    client: Client,
    base_url: String,
}

impl OpenAiAdapter {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Create with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamAdapter for OpenAiAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    async fn stream(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        config: &ModelConfig,
        api_key: &str,
    ) -> Result<TextStream> {
        if api_key.is_empty() {
            return Err(missing_api_key_error(Provider::OpenAI));
        }

        let body = ChatCompletionRequest::streaming(config, system_instruction, user_prompt);

        debug!(model = %config.model, "opening OpenAI streaming completion");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(Provider::OpenAI, e))?;

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
                let chunk = chunk.map_err(|e| network_error(Provider::OpenAI, e))?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_provider() {
        assert_eq!(OpenAiAdapter::new().provider(), Provider::OpenAI);
    }

    #[test]
    fn test_with_base_url() {
        let adapter = OpenAiAdapter::with_base_url("http://localhost:9999/v1/chat/completions");
        assert_eq!(adapter.base_url, "http://localhost:9999/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_empty_key_fails_without_network() {
        // Unroutable base URL: reaching the network would fail differently
        let adapter = OpenAiAdapter::with_base_url("http://192.0.2.1/v1/chat/completions");
        let config = ModelConfig::for_provider(Provider::OpenAI);

        let Err(err) = adapter.stream("sys", "user", &config, "").await else {
            panic!("expected an error for an empty key");
        };
        assert!(matches!(err, crate::error::PrompterError::Config(_)));
    }
}
