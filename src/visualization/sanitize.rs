//! Row validation and numeric coercion
//!
//! Models write numbers the way people do: `"1,234"`, `"12.5%"`, `"₩3,000"`. Before a
//! chart can be drawn every series value has to be a real number, so each row is checked
//! against the resolved accessor keys and its series values are coerced. Rows that cannot
//! be repaired are set aside with a reason; they never abort the chart unless nothing
//! usable remains.

use crate::visualization::spec::{AccessorKeys, Row, RowValue, VisualizationSpec};
use serde::Serialize;
use std::fmt;

/// Why a visualization has nothing to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SanitizeError {
    /// The visualization has no data rows at all.
    NoRows,
    /// No label key could be determined.
    MissingLabelKey,
    /// No series keys could be determined.
    MissingSeriesKeys,
    /// Every row was rejected.
    NoValidRows,
    /// The requested component is not one of the supported chart kinds.
    UnsupportedKind(String),
}

impl fmt::Display for SanitizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanitizeError::NoRows => write!(f, "No data rows"),
            SanitizeError::MissingLabelKey => write!(f, "Label key not found"),
            SanitizeError::MissingSeriesKeys => write!(f, "Series keys not found"),
            SanitizeError::NoValidRows => write!(f, "No valid data rows"),
            SanitizeError::UnsupportedKind(name) => {
                write!(f, "Chart type '{name}' is not supported")
            }
        }
    }
}

impl std::error::Error for SanitizeError {}

/// Why a single row was set aside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    MissingLabel(String),
    MissingSeries(String),
    NotNumeric(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingLabel(key) => write!(f, "label key '{key}' missing"),
            RejectReason::MissingSeries(key) => write!(f, "series key '{key}' missing"),
            RejectReason::NotNumeric(key) => write!(f, "series '{key}' is not a number"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    pub row: Row,
    pub reason: RejectReason,
}

/// Result of sanitizing one visualization.
///
/// Retained rows hold every series key as a finite [`RowValue::Number`]. When `error` is
/// set, `rows` is empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SanitizedVisualization {
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SanitizeError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_rows: Vec<RejectedRow>,
}

impl SanitizedVisualization {
    fn failed(error: SanitizeError) -> Self {
        SanitizedVisualization {
            rows: Vec::new(),
            error: Some(error),
            rejected_rows: Vec::new(),
        }
    }

    pub fn is_renderable(&self) -> bool {
        self.error.is_none() && !self.rows.is_empty()
    }
}

/// Validate and coerce the rows of `spec` against `keys`.
pub fn sanitize(spec: &VisualizationSpec, keys: &AccessorKeys) -> SanitizedVisualization {
    if spec.rows.is_empty() {
        return SanitizedVisualization::failed(SanitizeError::NoRows);
    }
    if keys.label_key.is_empty() {
        return SanitizedVisualization::failed(SanitizeError::MissingLabelKey);
    }
    if keys.series_keys.is_empty() {
        return SanitizedVisualization::failed(SanitizeError::MissingSeriesKeys);
    }

    let mut rows = Vec::with_capacity(spec.rows.len());
    let mut rejected_rows = Vec::new();

    for row in &spec.rows {
        if !row.contains_key(&keys.label_key) {
            rejected_rows.push(RejectedRow {
                row: row.clone(),
                reason: RejectReason::MissingLabel(keys.label_key.clone()),
            });
            continue;
        }

        let mut next = row.clone();
        let mut valid = true;
        for key in &keys.series_keys {
            let reason = match row.get(key) {
                None => RejectReason::MissingSeries(key.clone()),
                Some(value) => match coerce_number(value) {
                    Some(n) => {
                        next.insert(key.clone(), RowValue::Number(n));
                        continue;
                    }
                    None => RejectReason::NotNumeric(key.clone()),
                },
            };
            valid = false;
            rejected_rows.push(RejectedRow {
                row: row.clone(),
                reason,
            });
        }

        if valid {
            rows.push(next);
        }
    }

    if rows.is_empty() {
        return SanitizedVisualization {
            rows,
            error: Some(SanitizeError::NoValidRows),
            rejected_rows,
        };
    }

    SanitizedVisualization {
        rows,
        error: None,
        rejected_rows,
    }
}

/// Coerce a cell to a finite number.
///
/// Numbers pass through. Text loses thousands separators, percent signs and every
/// character other than digits, sign, decimal point and exponent before parsing.
/// Any other JSON value is never a number.
pub fn coerce_number(value: &RowValue) -> Option<f64> {
    match value {
        RowValue::Number(n) => n.is_finite().then_some(*n),
        RowValue::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| matches!(c, '0'..='9' | '.' | '-' | '+' | 'e' | 'E'))
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        RowValue::Other(_) => None,
    }
}
