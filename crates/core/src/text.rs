//! Derived text counters and the paragraph rule shared with the scheduler.
//!
//! A paragraph boundary is a run of whitespace with a newline on each end
//! (`\n\s*\n`). Counting ignores blocks that are only whitespace; the raw
//! split keeps them so paragraph indices line up with the editor's.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));

/// Counters shown next to the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TextStats {
    pub word_count: usize,
    pub paragraph_count: usize,
    /// Length of the untrimmed input in characters.
    pub char_count: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        let char_count = text.chars().count();
        if text.trim().is_empty() {
            return Self { word_count: 0, paragraph_count: 0, char_count };
        }

        Self { word_count: text.split_whitespace().count(), paragraph_count: count_paragraphs(text), char_count }
    }
}

/// Split text on paragraph boundaries, keeping whitespace-only blocks.
///
/// `"a\n\n"` yields `["a", ""]`: a trailing boundary opens an empty
/// paragraph, which is what the editor shows while the user starts typing.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK.split(text).collect()
}

/// Number of paragraphs with non-whitespace content.
pub fn count_paragraphs(text: &str) -> usize {
    split_paragraphs(text)
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .count()
}

/// Whether the text ends on a paragraph boundary (trailing blank paragraph).
pub fn ends_with_paragraph_break(text: &str) -> bool {
    let content_end = text.trim_end().len();
    content_end > 0 && PARAGRAPH_BREAK.is_match(&text[content_end..])
}
