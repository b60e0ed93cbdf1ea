// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Wire types and helpers shared by the chat-completion providers
//!
//! OpenAI and OpenRouter speak the same `/v1/chat/completions` dialect;
//! only endpoints, auth placement, and bookkeeping headers differ.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::ApiError;

/// Chat-completion request body
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatCompletionRequest {
    /// Build a streaming request with one system and one user message
    pub fn streaming(
        config: &ModelConfig,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
            temperature: config.temperature,
            top_p: config.top_p,
            stream: true,
        }
    }
}

/// JSON error envelope used by all three providers
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Turn a non-2xx response body into an API error.
///
/// Prefers the provider's own `error.message`; an unparseable body falls
/// back to the raw status text.
pub(crate) fn parse_error_body(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                body.to_string()
            }
        });

    ApiError::ServerError {
        status: status.as_u16(),
        message,
    }
}

/// Reject a success response that declares no readable body
pub(crate) fn ensure_readable_body(response: &reqwest::Response) -> Result<(), ApiError> {
    if response.content_length() == Some(0) {
        Err(ApiError::EmptyBody)
    } else {
        Ok(())
    }
}
