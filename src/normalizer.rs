//! Content normalization for raw model output
//!
//! Model answers arrive wrapped in provisional markup: reasoning spans that must never
//! reach the reader, one or more answer spans holding the text meant for display, and
//! possibly a visualization block carrying chart JSON. This module reduces a raw response
//! to the prose that should be rendered.
//!
//! The steps run in a fixed order:
//!
//! 1. Remove every reasoning span (`<think>`, `<reasoning>`, optionally `redacted_` prefixed)
//! 2. Keep only the contents of `<answer>` spans, joined by a blank line. Without any
//!    answer span the whole remaining text is the answer.
//! 3. Remove the visualization block, which belongs to the chart extractor, not the prose
//! 4. Remove stray `answer`/`think`/`reasoning` tag markers left behind by unterminated spans
//!
//! All patterns are compiled by the `regex` crate, whose matching time is linear in the
//! input size, so adversarial input (thousands of unterminated tags) cannot cause
//! catastrophic backtracking. Unterminated spans simply do not match and are left for the
//! stray-tag pass.

use crate::visualization::extract::{CURRENT_BLOCK, LEGACY_BLOCK};
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator placed between answer spans when more than one is present.
pub const DEFAULT_ANSWER_SEPARATOR: &str = "\n\n";

static REASONING_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:redacted_)?(?:reasoning|think)>.*?</(?:redacted_)?(?:reasoning|think)>")
        .unwrap()
});

static ANSWER_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<answer>(.*?)</answer>").unwrap());

static STRAY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?(?:redacted_)?(?:answer|think|reasoning)>").unwrap());

/// Normalize a raw response using the default answer separator.
pub fn normalize(raw: &str) -> String {
    normalize_with_separator(raw, DEFAULT_ANSWER_SEPARATOR)
}

/// Normalize a raw response, joining multiple answer spans with `separator`.
pub fn normalize_with_separator(raw: &str, separator: &str) -> String {
    let without_reasoning = strip_reasoning(raw);

    let answer = match extract_answers(&without_reasoning, separator) {
        Some(joined) => joined,
        None => without_reasoning,
    };

    let without_block = strip_visualization_block(answer.trim());
    let cleaned = strip_stray_tags(without_block.trim());
    cleaned.trim().to_string()
}

/// Remove every reasoning span. Unterminated openers are left in place.
pub fn strip_reasoning(text: &str) -> String {
    REASONING_SPAN.replace_all(text, "").into_owned()
}

/// Concatenate the inner contents of all `<answer>` spans.
///
/// Returns `None` when the text contains no complete answer span, so the caller can fall
/// back to treating the whole text as the answer.
pub fn extract_answers(text: &str, separator: &str) -> Option<String> {
    let answers: Vec<&str> = ANSWER_SPAN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    if answers.is_empty() {
        None
    } else {
        Some(answers.join(separator))
    }
}

/// Remove the first visualization block, current syntax first, then the legacy marker.
pub fn strip_visualization_block(text: &str) -> String {
    if CURRENT_BLOCK.is_match(text) {
        return CURRENT_BLOCK.replace(text, "").into_owned();
    }
    LEGACY_BLOCK.replace(text, "").into_owned()
}

/// Final safety pass: drop any leftover answer/think/reasoning tag markers.
pub fn strip_stray_tags(text: &str) -> String {
    STRAY_TAG.replace_all(text, "").into_owned()
}
