// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Google Gemini streaming adapter
//!
//! Speaks the `streamGenerateContent` REST endpoint with `alt=sse`, so the
//! response arrives as `data:` lines like the chat-completion providers,
//! but without a `[DONE]` sentinel - the stream ends with the body. The
//! credential travels as a query parameter, not a header.
//!
//! Gemini may emit empty text fragments; they are passed through as-is.
//! Consumers appending fragments see no difference, and dropping them here
//! would special-case one provider's envelope.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::error::Result;
use crate::llm::provider::{
    missing_api_key_error, network_error, Provider, StreamAdapter, TextStream,
};
use crate::llm::providers::common::{ensure_readable_body, parse_error_body};
use crate::llm::sse::{SseEvent, SseLineDecoder};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini provider
pub struct GeminiAdapter {
    client: Client,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Create with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn stream_endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent",
            self.base_url, model
        )
    }
}

impl Default for GeminiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamAdapter for GeminiAdapter {
    fn provider(&self) -> Provider {
        Provider::GoogleGemini
    }

    async fn stream(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        config: &ModelConfig,
        api_key: &str,
    ) -> Result<TextStream> {
        if api_key.is_empty() {
            return Err(missing_api_key_error(Provider::GoogleGemini));
        }

        let body = GenerateContentRequest::streaming(config, system_instruction, user_prompt);

        debug!(model = %config.model, "opening Gemini streaming completion");

        let response = self
            .client
            .post(self.stream_endpoint(&config.model))
            .query(&[("alt", "sse"), ("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(Provider::GoogleGemini, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error_body(status, &body).into());
        }
        ensure_readable_body(&response)?;

        let mut byte_stream = response.bytes_stream();

        let fragments = async_stream::try_stream! {
            let mut decoder = SseLineDecoder::new();

            while let Some(chunk) = byte_stream.next().await {
                let chunk = chunk.map_err(|e| network_error(Provider::GoogleGemini, e))?;
                for event in decoder.push(&chunk) {
                    if let SseEvent::Data(data) = event {
                        if let Some(text) = generate_content_text(&data) {
                            yield text;
                        }
                    }
                }
            }
        };

        Ok(Box::pin(fragments))
    }
}

// Gemini wire types

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
}

impl GenerateContentRequest {
    fn streaming(config: &ModelConfig, system_instruction: &str, user_prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: user_prompt.to_string(),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Extract the text of one `GenerateContentResponse` payload.
///
/// A parseable payload always yields a fragment, possibly empty. Malformed
/// JSON skips the line without ending the stream.
fn generate_content_text(data: &str) -> Option<String> {
    match serde_json::from_str::<GenerateContentChunk>(data) {
        Ok(chunk) => {
            let text = chunk
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content)
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .collect::<String>()
                })
                .unwrap_or_default();
            Some(text)
        }
        Err(err) => {
            warn!(error = %err, "skipping malformed Gemini SSE line");
            None
        }
    }
}
