// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Prompter - multi-provider LLM prompt workbench.
//!
//! This crate exposes the shared runtime used by the `prompter` CLI
//! (`src/main.rs`):
//! - `workbench`: operation orchestration, busy/error state, block editing
//! - `llm`: provider abstraction and streaming adapters (Gemini/OpenAI/OpenRouter)
//! - `blocks`: block-structured prompt model, response reconciler, format transforms
//! - `session`: credential storage and key-test state
//!
//! A system prompt is a list of titled blocks; every LLM operation either
//! streams text to the caller (submit) or rewrites the block list wholesale
//! from a parsed response (the meta-operations).

pub mod blocks;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod workbench;

pub use error::{PrompterError, Result};
