// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Prompt block primitives
//!
//! A system prompt is an ordered list of titled blocks. Order is
//! semantically meaningful: serialization concatenates blocks in list order.

pub mod format;
pub mod parser;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between serialized blocks
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// One titled section of a system prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBlock {
    /// Opaque unique id, assigned once at creation and never reused
    pub id: String,
    /// Block title, by convention a `# `-prefixed boundary line
    pub title: String,
    /// Block body; internal whitespace is preserved verbatim
    pub content: String,
}

impl PromptBlock {
    /// Create a block with a freshly generated id
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Serialize blocks as `title\n\ncontent` pairs joined by `---` separators.
///
/// This is the composed system instruction handed to providers, and the
/// round-trip inverse of [`parser::parse_blocks`].
pub fn serialize_blocks(blocks: &[PromptBlock]) -> String {
    blocks
        .iter()
        .map(|block| format!("{}\n\n{}", block.title, block.content))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}
