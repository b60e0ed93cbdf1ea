// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM module for Prompter
//!
//! Provides the provider abstraction, the stream adapters, SSE decoding,
//! and API key validation.

pub mod provider;
pub mod providers;
pub mod sse;
pub mod validator;

pub use provider::{Provider, StreamAdapter, TextStream};
pub use providers::{GeminiAdapter, OpenAiAdapter, OpenRouterAdapter};
pub use validator::KeyValidator;
