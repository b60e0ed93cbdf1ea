// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Provider stream adapter implementations

pub mod common;
pub mod gemini;
pub mod openai;
pub mod openrouter;

pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;
pub use openrouter::OpenRouterAdapter;
