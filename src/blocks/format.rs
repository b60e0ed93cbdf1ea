// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Format-only block transforms
//!
//! Pure, synchronous conversions between markdown-style and XML-style block
//! markup. No network, no model call. Both conversions strip the other
//! format's markers before applying their own, so round-tripping between
//! formats never accumulates stale markup, and each is idempotent on its
//! own output.

use super::PromptBlock;

/// Convert every block to markdown form: `## Title` headings, bare content.
///
/// Block ids are preserved; only titles and contents change.
pub fn to_markdown(blocks: &[PromptBlock]) -> Vec<PromptBlock> {
    blocks
        .iter()
        .map(|block| {
            let clean_title = strip_leading_hashes(strip_tags(&block.title).trim()).to_string();
            let clean_content = strip_content_tags(&block.content).trim().to_string();

            PromptBlock {
                id: block.id.clone(),
                title: format!("## {}", clean_title),
                content: clean_content,
            }
        })
        .collect()
}

/// Convert every block to XML form: `<title>` wrapped titles and
/// `<content>` wrapped bodies, with any `#` markers removed.
pub fn to_xml(blocks: &[PromptBlock]) -> Vec<PromptBlock> {
    blocks
        .iter()
        .map(|block| {
            let clean_title = strip_leading_hashes(strip_tags(&block.title).trim()).to_string();
            let clean_content = strip_tags(&block.content).trim().to_string();

            PromptBlock {
                id: block.id.clone(),
                title: format!("<title>{}</title>", clean_title),
                content: format!("<content>\n{}\n</content>", clean_content),
            }
        })
        .collect()
}

/// Remove every `<title>`/`</title>`/`<content>`/`</content>` occurrence
fn strip_tags(text: &str) -> String {
    text.replace("<title>", "")
        .replace("</title>", "")
        .replace("<content>", "")
        .replace("</content>", "")
}

/// Remove `<content>` tags only (markdown content keeps everything else)
fn strip_content_tags(text: &str) -> String {
    text.replace("<content>", "").replace("</content>", "")
}

/// Strip a leading run of `#` characters and the whitespace after it
fn strip_leading_hashes(text: &str) -> &str {
    let stripped = text.trim_start_matches('#');
    if stripped.len() != text.len() {
        stripped.trim_start()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(title: &str, content: &str) -> PromptBlock {
        PromptBlock::new(title, content)
    }

    #[test]
    fn test_markdown_conversion() {
        let blocks = vec![block("# ROLE", "Be helpful.")];
        let converted = to_markdown(&blocks);
        assert_eq!(converted[0].title, "## ROLE");
        assert_eq!(converted[0].content, "Be helpful.");
    }

    #[test]
    fn test_markdown_is_idempotent() {
        let blocks = vec![block("# ROLE", "Be helpful."), block("## RULES", "None.")];
        let once = to_markdown(&blocks);
        let twice = to_markdown(&once);
        assert_eq!(once, twice);
        assert_eq!(twice[0].title, "## ROLE");
        assert_eq!(twice[1].title, "## RULES");
    }

    #[test]
    fn test_xml_conversion() {
        let blocks = vec![block("# ROLE", "Be helpful.")];
        let converted = to_xml(&blocks);
        assert_eq!(converted[0].title, "<title>ROLE</title>");
        assert_eq!(converted[0].content, "<content>\nBe helpful.\n</content>");
    }

    #[test]
    fn test_xml_is_idempotent() {
        let blocks = vec![block("# ROLE", "Be helpful.")];
        let once = to_xml(&blocks);
        let twice = to_xml(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_xml_then_markdown_leaves_no_tags() {
        let blocks = vec![block("# ROLE", "Be helpful.")];
        let round_tripped = to_markdown(&to_xml(&blocks));

        assert_eq!(round_tripped[0].title, "## ROLE");
        assert_eq!(round_tripped[0].content, "Be helpful.");
        assert!(!round_tripped[0].title.contains('<'));
        assert!(!round_tripped[0].content.contains("<content>"));
    }

    #[test]
    fn test_markdown_then_xml_strips_hashes() {
        let blocks = vec![block("# ROLE", "Be helpful.")];
        let converted = to_xml(&to_markdown(&blocks));
        assert_eq!(converted[0].title, "<title>ROLE</title>");
    }

    #[test]
    fn test_ids_survive_conversion() {
        let blocks = vec![block("# A", "a")];
        let id = blocks[0].id.clone();
        assert_eq!(to_markdown(&blocks)[0].id, id);
        assert_eq!(to_xml(&blocks)[0].id, id);
    }

    #[test]
    fn test_title_without_hash_gains_prefix() {
        let blocks = vec![block("PLAIN", "x")];
        assert_eq!(to_markdown(&blocks)[0].title, "## PLAIN");
    }
}
