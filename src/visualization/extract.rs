//! Visualization block extraction
//!
//! Two block syntaxes are recognized:
//!
//! - current: `<viz> ... </viz>`
//! - legacy: `[[VISUALIZATION_DATA]]` followed by everything up to the next `</answer>`
//!   or the end of the text
//!
//! The current syntax takes precedence: the legacy marker is only consulted when no
//! `<viz>` block exists anywhere in the text. The two are never merged.
//!
//! Extraction must run on the raw response, since the block may sit outside the answer
//! span. Failures never reach the caller: malformed JSON is logged and yields no charts.

use crate::visualization::spec::VisualizationSpec;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

pub(crate) static CURRENT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<viz>(.*?)</viz>").unwrap());

pub(crate) static LEGACY_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[\[VISUALIZATION_DATA\]\]\s*(.*?)(?:</answer>|$)").unwrap()
});

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?\s*").unwrap());

static CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*```$").unwrap());

/// Which syntax a block was found with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSyntax {
    Current,
    Legacy,
}

/// Extract every visualization spec from a raw response.
///
/// Entries without a string `id` are discarded. When an id repeats, the first entry
/// wins and later ones are dropped.
pub fn extract_visualizations(raw: &str) -> Vec<VisualizationSpec> {
    let Some((syntax, body)) = find_block(raw) else {
        return Vec::new();
    };
    debug!(?syntax, "found visualization block");
    parse_block(strip_code_fence(body))
}

/// Locate the visualization block and return its inner text.
pub fn find_block(raw: &str) -> Option<(BlockSyntax, &str)> {
    if let Some(caps) = CURRENT_BLOCK.captures(raw) {
        return caps.get(1).map(|m| (BlockSyntax::Current, m.as_str()));
    }
    LEGACY_BLOCK
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| (BlockSyntax::Legacy, m.as_str()))
}

/// Remove a surrounding markdown code fence (with an optional language hint).
pub fn strip_code_fence(body: &str) -> &str {
    let trimmed = body.trim();
    let start = OPENING_FENCE.find(trimmed).map_or(0, |m| m.end());
    let rest = &trimmed[start..];
    let end = CLOSING_FENCE.find(rest).map_or(rest.len(), |m| m.start());
    rest[..end].trim()
}

/// Parse block contents: either a JSON array of specs or an object with a
/// `visualizations` array.
pub fn parse_block(json_text: &str) -> Vec<VisualizationSpec> {
    let parsed: serde_json::Value = match serde_json::from_str(json_text) {
        Ok(value) => value,
        Err(e) => {
            warn!("visualization block is not valid JSON: {e}");
            return Vec::new();
        }
    };

    let entries = match parsed {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("visualizations") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                warn!("visualization block object has no `visualizations` array");
                return Vec::new();
            }
        },
        _ => {
            warn!("visualization block is neither an array nor an object");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut specs = Vec::with_capacity(entries.len());
    for entry in entries {
        if !entry.get("id").is_some_and(|id| id.is_string()) {
            debug!("skipping visualization entry without a string id");
            continue;
        }
        let spec: VisualizationSpec = match serde_json::from_value(entry) {
            Ok(spec) => spec,
            Err(e) => {
                warn!("skipping unreadable visualization entry: {e}");
                continue;
            }
        };
        if !seen.insert(spec.id.clone()) {
            warn!(id = %spec.id, "duplicate visualization id, keeping the first entry");
            continue;
        }
        specs.push(spec);
    }
    specs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualization::spec::ChartKind;

    const SPECS: &str = r#"[
        {"id": "CHART_1", "component": "BarChart", "data": [{"year": "2023", "sales": 10}], "index": "year", "categories": ["sales"]},
        {"id": "CHART_2", "component": "DonutChart", "data": []}
    ]"#;

    #[test]
    fn test_current_syntax() {
        let raw = format!("<answer>Text {{{{CHART_1}}}}</answer><viz>{SPECS}</viz>");
        let specs = extract_visualizations(&raw);
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].id, "CHART_1");
        assert_eq!(specs[0].kind, ChartKind::Bar);
        assert_eq!(specs[1].kind, ChartKind::Donut);
    }

    #[test]
    fn test_legacy_marker_matches_current_syntax() {
        let current = format!("<viz>\n```json\n{SPECS}\n```\n</viz>");
        let legacy = format!("<answer>Text\n[[VISUALIZATION_DATA]]\n```json\n{SPECS}\n```\n</answer>");
        assert_eq!(
            extract_visualizations(&current),
            extract_visualizations(&legacy)
        );
        assert_eq!(extract_visualizations(&legacy).len(), 2);
    }

    #[test]
    fn test_legacy_marker_runs_to_end_of_text() {
        let raw = format!("Text [[VISUALIZATION_DATA]] {SPECS}");
        assert_eq!(extract_visualizations(&raw).len(), 2);
    }

    #[test]
    fn test_current_syntax_takes_precedence() {
        let raw = format!(
            "[[VISUALIZATION_DATA]] [{{\"id\": \"LEGACY\"}}]</answer><viz>{SPECS}</viz>"
        );
        let specs = extract_visualizations(&raw);
        assert_eq!(specs.len(), 2);
        assert!(specs.iter().all(|s| s.id != "LEGACY"));
    }

    #[test]
    fn test_object_with_visualizations_field() {
        let raw = format!("<viz>{{\"visualizations\": {SPECS}}}</viz>");
        assert_eq!(extract_visualizations(&raw).len(), 2);
    }

    #[test]
    fn test_truncated_json_yields_nothing() {
        let raw = "<viz>[{\"id\": \"CHART_1\", \"data\": [</viz>";
        assert!(extract_visualizations(raw).is_empty());
    }

    #[test]
    fn test_entries_without_string_id_are_dropped() {
        let raw = r#"<viz>[{"id": 7}, {"title": "no id"}, {"id": "OK"}, "junk"]</viz>"#;
        let specs = extract_visualizations(raw);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].id, "OK");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let raw = r#"<viz>[{"id": "A", "title": "first"}, {"id": "A", "title": "second"}]</viz>"#;
        let specs = extract_visualizations(raw);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].title.as_deref(), Some("first"));
    }

    #[test]
    fn test_no_block() {
        assert!(extract_visualizations("<answer>plain</answer>").is_empty());
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```JSON [1]```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
    }
}
