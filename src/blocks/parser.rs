// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Response reconciliation
//!
//! Converts completed model output back into the ordered block structure.
//! Models wrap their answer in code fences and vary whitespace freely, so
//! parsing tolerates both. Detection is a single pass over lines rather than
//! a greedy pattern match: model output is untrusted and arbitrarily long.

use super::PromptBlock;

/// Parse free-form model output into an ordered list of titled blocks.
///
/// Returns `None` when the text is empty, whitespace-only, or contains no
/// boundary line. `None` is a recoverable sentinel: callers surface the raw
/// text as a user-facing error instead of discarding existing blocks.
///
/// A boundary line starts with `#` followed by whitespace. Each block's
/// content is every line up to the next boundary, trimmed at the edges with
/// internal whitespace preserved. Blocks come back in source order.
pub fn parse_blocks(raw: &str) -> Option<Vec<PromptBlock>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned = strip_code_fence(trimmed);

    let mut blocks: Vec<PromptBlock> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in cleaned.lines() {
        if is_boundary_line(line) {
            if let Some((title, content_lines)) = current.take() {
                blocks.push(make_block(title, &content_lines));
            }
            current = Some((line.trim().to_string(), Vec::new()));
        } else if let Some((_, content_lines)) = current.as_mut() {
            content_lines.push(line);
        }
        // Lines before the first boundary are not part of any block
    }

    if let Some((title, content_lines)) = current {
        blocks.push(make_block(title, &content_lines));
    }

    if blocks.is_empty() {
        None
    } else {
        Some(blocks)
    }
}

fn make_block(title: String, content_lines: &[&str]) -> PromptBlock {
    // Serialized prompts separate blocks with a `---` rule; dropping a
    // trailing rule keeps serialize -> parse a clean round trip.
    let mut lines = content_lines.to_vec();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.last().is_some_and(|l| l.trim() == "---") {
        lines.pop();
    }
    let content = lines.join("\n").trim().to_string();
    PromptBlock::new(title, content)
}

/// A boundary line is `#` followed by whitespace at the start of the line
fn is_boundary_line(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('#') && chars.next().is_some_and(|c| c.is_whitespace())
}

/// Strip one surrounding triple-backtick fence, keeping the trimmed interior.
///
/// The opening fence line may carry a language tag; the whole first line goes.
fn strip_code_fence(text: &str) -> &str {
    if text.starts_with("```") && text.ends_with("```") {
        if let Some(first_newline) = text.find('\n') {
            let last_fence = text.rfind("```").unwrap_or(0);
            if first_newline < last_fence {
                return text[first_newline + 1..last_fence].trim();
            }
        }
    }
    text
}
