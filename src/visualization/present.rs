//! Presentation rules shared by every chart renderer
//!
//! These are the small decisions a renderer would otherwise have to re-derive from the
//! raw spec: the title to show, the color list, how a number is written in a tooltip, and
//! which sources back a given series value.

use crate::citation::{marker_indices, Source};
use crate::visualization::spec::{ChartKind, Row, RowValue, VisualizationSpec};

/// Named chart colors understood by the renderer.
pub const CHART_COLORS: [&str; 18] = [
    "blue", "cyan", "emerald", "violet", "amber", "gray", "pink", "lime", "fuchsia", "green",
    "red", "indigo", "purple", "yellow", "teal", "orange", "sky", "rose",
];

/// Palette used for donut charts that do not specify colors.
pub const DEFAULT_DONUT_PALETTE: [&str; 8] = [
    "blue", "emerald", "violet", "amber", "gray", "cyan", "pink", "indigo",
];

/// Suffix of the row column holding citation markers for a series value.
pub const DEFAULT_SERIES_SOURCE_SUFFIX: &str = "_출처";

/// Title shown above the chart: its own title, or its id.
pub fn display_title(spec: &VisualizationSpec) -> &str {
    spec.title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(spec.id.as_str())
}

/// Colors to draw with. Empty means "renderer default".
pub fn resolved_colors(spec: &VisualizationSpec, donut_palette: &[String]) -> Vec<String> {
    if !spec.colors.is_empty() {
        return spec.colors.clone();
    }
    match spec.kind {
        ChartKind::Donut => donut_palette.to_vec(),
        _ => Vec::new(),
    }
}

pub fn default_donut_palette() -> Vec<String> {
    DEFAULT_DONUT_PALETTE.iter().map(|c| c.to_string()).collect()
}

/// Format a cell for display: numbers get `,` grouping and at most three fraction digits.
pub fn format_value(value: &RowValue) -> String {
    match value {
        RowValue::Number(n) => format_number(*n),
        RowValue::Text(s) => s.clone(),
        RowValue::Other(value) => value.to_string(),
    }
}

pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let rendered = format!("{:.3}", n.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = n < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Sources cited for `series_key` in `row`, read from the `<series_key><suffix>` column.
///
/// Out-of-range markers are skipped; order follows the markers.
pub fn series_sources<'a>(
    row: &Row,
    series_key: &str,
    suffix: &str,
    sources: &'a [Source],
) -> Vec<&'a Source> {
    let column = format!("{series_key}{suffix}");
    let Some(RowValue::Text(note)) = row.get(&column) else {
        return Vec::new();
    };
    marker_indices(note)
        .into_iter()
        .filter_map(|index| index.checked_sub(1).and_then(|i| sources.get(i)))
        .collect()
}
