//! Fenced code block extraction
//!
//! Model output usually wraps source code in markdown fences alongside prose.
//! This module pulls out the fenced bodies so the persisted file is runnable
//! code rather than chat text.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+\-]*\n(.*?)\n```").expect("fenced block regex")
});

/// Extract fenced code block bodies from generated text
///
/// Bodies of all fenced blocks are returned joined by a blank line, with the
/// fence delimiter lines excluded. Text with no complete fenced block is
/// returned unchanged.
pub fn extract_code_blocks(text: &str) -> String {
    let blocks: Vec<&str> = FENCED_BLOCK_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    if blocks.is_empty() {
        return text.to_string();
    }

    blocks.join("\n\n")
}
