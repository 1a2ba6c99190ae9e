//! Outline formatter
//!
//! One line per node, two spaces of indentation per level, an icon and a short label:
//!
//! ```text
//! ⧉ 3 segments, 2 charts, 1 citations
//!   ¶ Revenue grew [CITATION_GROUP_1…
//!   ▦ SALES
//!   ⊕ SHARE
//!   ▥ SALES bar "Sales" 2 rows
//!     · 2023  sales=1,000
//!     · 2024  sales=1,500
//!   ▥ SHARE donut "SHARE" error: No data rows
//!   † 1,2 -> https://one
//! ```
//!
//! Icons
//!     Segments:
//!         Text: ¶
//!         Chart (inline): ▦
//!         Chart (not found): ∅
//!         Chart (appended): ⊕
//!     Charts: ▥
//!         Retained rows: ·
//!     Citation groups: †

use super::registry::{FormatError, Formatter};
use crate::citation::{find_groups, CitationGroup};
use crate::interleave::{ChartStatus, ContentSegment};
use crate::pipeline::{ExecutionOutput, RenderedDocument, RenderedVisualization};
use crate::visualization::present::format_value;
use crate::visualization::ChartKind;

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    let flat = s.replace('\n', "↵");
    if flat.chars().count() > max_chars {
        let mut truncated = flat.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        flat
    }
}

fn kind_name(kind: &ChartKind) -> String {
    match kind {
        ChartKind::Bar => "bar".into(),
        ChartKind::Line => "line".into(),
        ChartKind::Donut => "donut".into(),
        ChartKind::Area => "area".into(),
        ChartKind::Unsupported(name) => format!("unsupported({name})"),
    }
}

fn segment_line(segment: &ContentSegment) -> String {
    match segment {
        ContentSegment::Text { text } => format!("¶ {}", truncate(text, LABEL_WIDTH)),
        ContentSegment::ChartReference { id, status } => {
            let icon = match status {
                ChartStatus::Inline => '▦',
                ChartStatus::NotFound => '∅',
                ChartStatus::Appended => '⊕',
            };
            format!("{icon} {id}")
        }
    }
}

fn chart_line(chart: &RenderedVisualization) -> String {
    let mut line = format!(
        "▥ {} {} \"{}\"",
        chart.id(),
        kind_name(&chart.spec.kind),
        truncate(&chart.title, LABEL_WIDTH)
    );
    match &chart.data.error {
        Some(error) => line.push_str(&format!(" error: {error}")),
        None => line.push_str(&format!(" {} rows", chart.data.rows.len())),
    }
    if !chart.data.rejected_rows.is_empty() {
        line.push_str(&format!(", {} rejected", chart.data.rejected_rows.len()));
    }
    line
}

/// The chart line followed by one indented line per retained row.
fn chart_lines(chart: &RenderedVisualization) -> Vec<String> {
    let mut lines = vec![chart_line(chart)];
    for row in &chart.data.rows {
        let label = row
            .get(&chart.keys.label_key)
            .map(format_value)
            .unwrap_or_default();
        let series: Vec<String> = chart
            .keys
            .series_keys
            .iter()
            .filter_map(|key| row.get(key).map(|v| format!("{key}={}", format_value(v))))
            .collect();
        lines.push(format!(
            "  · {}  {}",
            truncate(&label, LABEL_WIDTH),
            series.join(", ")
        ));
    }
    lines
}

fn citation_line(group: &CitationGroup) -> String {
    let indices: Vec<String> = group.indices.iter().map(|i| i.to_string()).collect();
    format!("† {} -> {}", indices.join(","), group.representative_url)
}

pub fn to_outline_str(doc: &RenderedDocument) -> String {
    let mut lines = vec![format!(
        "⧉ {} segments, {} charts, {} citations",
        doc.segments.len(),
        doc.visualizations.len(),
        doc.citations.len()
    )];
    lines.extend(doc.segments.iter().map(|s| format!("  {}", segment_line(s))));
    lines.extend(
        doc.visualizations
            .iter()
            .flat_map(chart_lines)
            .map(|line| format!("  {line}")),
    );
    lines.extend(doc.citations.iter().map(|g| format!("  {}", citation_line(g))));
    lines.join("\n")
}

pub struct OutlineFormatter;

impl Formatter for OutlineFormatter {
    fn name(&self) -> &str {
        "outline"
    }

    fn serialize(&self, output: &ExecutionOutput) -> Result<String, FormatError> {
        Ok(match output {
            ExecutionOutput::Document(doc) => to_outline_str(doc),
            ExecutionOutput::Prose(text) => {
                let mut lines = vec![text.clone()];
                lines.extend(find_groups(text).iter().map(citation_line));
                lines.join("\n")
            }
            ExecutionOutput::Charts(charts) => charts
                .iter()
                .flat_map(chart_lines)
                .collect::<Vec<_>>()
                .join("\n"),
        })
    }

    fn description(&self) -> &str {
        "One line per segment, chart and citation group"
    }
}
