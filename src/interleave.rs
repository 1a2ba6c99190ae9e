//! Interleaving prose with chart placeholders
//!
//! Prose marks where a chart belongs with `{{CHART_ID}}` (uppercase letters, digits and
//! underscores). Splitting on those tokens yields an ordered list of text and chart
//! segments which is the contract handed to the renderer.
//!
//! Two rules keep every chart visible:
//!
//! - a token whose id has no visualization becomes a [`ChartStatus::NotFound`] segment
//! - a visualization no token mentions is appended at the end as [`ChartStatus::Appended`]

use crate::visualization::spec::VisualizationSpec;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

static CHART_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([A-Z0-9_]+)\}\}").unwrap());

/// How a chart reference came to be in the segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStatus {
    /// Placed by a token and backed by a visualization.
    Inline,
    /// Placed by a token, but no visualization carries that id.
    NotFound,
    /// Not referenced by any token; appended after the prose.
    Appended,
}

/// One piece of renderable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSegment {
    Text { text: String },
    ChartReference { id: String, status: ChartStatus },
}

impl ContentSegment {
    pub fn text(text: impl Into<String>) -> Self {
        ContentSegment::Text { text: text.into() }
    }

    pub fn chart(id: impl Into<String>, status: ChartStatus) -> Self {
        ContentSegment::ChartReference {
            id: id.into(),
            status,
        }
    }

    pub fn chart_id(&self) -> Option<&str> {
        match self {
            ContentSegment::ChartReference { id, .. } => Some(id),
            ContentSegment::Text { .. } => None,
        }
    }
}

/// Split `text` on chart tokens and append unreferenced visualizations.
pub fn interleave(text: &str, visualizations: &[VisualizationSpec]) -> Vec<ContentSegment> {
    interleave_with(text, visualizations, true)
}

/// Like [`interleave`], with control over appending unreferenced visualizations.
pub fn interleave_with(
    text: &str,
    visualizations: &[VisualizationSpec],
    append_unreferenced: bool,
) -> Vec<ContentSegment> {
    let known: HashSet<&str> = visualizations.iter().map(|v| v.id.as_str()).collect();
    let mut used: HashSet<&str> = HashSet::new();
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in CHART_TOKEN.captures_iter(text) {
        let (Some(token), Some(id)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_text(&mut segments, &text[last..token.start()]);

        let id = id.as_str();
        let status = if known.contains(id) {
            used.insert(id);
            ChartStatus::Inline
        } else {
            ChartStatus::NotFound
        };
        segments.push(ContentSegment::chart(id, status));
        last = token.end();
    }
    push_text(&mut segments, &text[last..]);

    if segments.is_empty() {
        segments.push(ContentSegment::text(""));
    }

    if append_unreferenced {
        segments.extend(
            visualizations
                .iter()
                .filter(|v| !used.contains(v.id.as_str()))
                .map(|v| ContentSegment::chart(v.id.clone(), ChartStatus::Appended)),
        );
    }

    segments
}

fn push_text(segments: &mut Vec<ContentSegment>, span: &str) {
    if !span.is_empty() {
        segments.push(ContentSegment::text(span));
    }
}

/// Rebuild the text a segment list came from. Appended charts had no token and are skipped.
pub fn reconstruct(segments: &[ContentSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            ContentSegment::Text { text } => out.push_str(text),
            ContentSegment::ChartReference { status: ChartStatus::Appended, .. } => {}
            ContentSegment::ChartReference { id, .. } => {
                out.push_str("{{");
                out.push_str(id);
                out.push_str("}}");
            }
        }
    }
    out
}
