use std::{ops::Range, sync::LazyLock};

use regex::Regex;

use crate::core::parsers::js::ScriptComment;

static TRANSLATOR_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*translator:\s?(.*)$").expect("valid regex"));

/// Translator notes that belong to the literal at `literal`.
///
/// A `translator:` comment attaches when it ends before the literal with at
/// most one newline in between, or starts after it on the same line. The
/// note must fit on one line; multi-line block comments are not notes.
pub fn translator_comments(
    source: &str,
    comments: &[ScriptComment],
    literal: &Range<usize>,
) -> Vec<String> {
    comments
        .iter()
        .filter(|comment| {
            if comment.range.end <= literal.start {
                source[comment.range.end..literal.start].matches('\n').count() < 2
            } else if comment.range.start >= literal.end {
                !source[literal.end..comment.range.start].contains('\n')
            } else {
                false
            }
        })
        .filter_map(|comment| {
            TRANSLATOR_COMMENT
                .captures(&comment.text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim_end().to_string())
        })
        .collect()
}
