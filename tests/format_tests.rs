// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use prompter::blocks::format::{to_markdown, to_xml};
use prompter::blocks::PromptBlock;

fn sample() -> Vec<PromptBlock> {
    vec![
        PromptBlock::new("# ROLE", "You are a poet."),
        PromptBlock::new("## CONTEXT", "Writes haiku only."),
    ]
}

#[test]
fn test_markdown_conversion_is_idempotent() {
    let once = to_markdown(&sample());
    let twice = to_markdown(&once);

    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.title, b.title);
        assert_eq!(a.content, b.content);
    }
    assert_eq!(once[0].title, "## ROLE");
    assert_eq!(once[1].title, "## CONTEXT");
}

#[test]
fn test_xml_conversion_is_idempotent() {
    let once = to_xml(&sample());
    let twice = to_xml(&once);

    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.title, b.title);
        assert_eq!(a.content, b.content);
    }
    assert_eq!(once[0].title, "<title>ROLE</title>");
    assert_eq!(once[0].content, "<content>\nYou are a poet.\n</content>");
}

#[test]
fn test_xml_to_markdown_leaves_no_residual_tags() {
    let converted = to_markdown(&to_xml(&sample()));

    for block in &converted {
        assert!(!block.title.contains("<title>"), "title: {}", block.title);
        assert!(!block.title.contains("</title>"));
        assert!(!block.content.contains("<content>"));
        assert!(!block.content.contains("</content>"));
    }
    assert_eq!(converted[0].title, "## ROLE");
    assert_eq!(converted[0].content, "You are a poet.");
}

#[test]
fn test_markdown_to_xml_round_trip_preserves_text() {
    let round = to_markdown(&to_xml(&to_markdown(&sample())));
    assert_eq!(round[0].content, "You are a poet.");
    assert_eq!(round[1].content, "Writes haiku only.");
}

#[test]
fn test_conversion_preserves_block_ids() {
    let original = sample();
    let converted = to_xml(&original);
    for (a, b) in original.iter().zip(&converted) {
        assert_eq!(a.id, b.id);
    }
}
