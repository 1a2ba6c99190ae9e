//! Chart description types
//!
//! Specs are parsed from loosely structured JSON written by a model. Rows are therefore
//! modeled as maps of [`RowValue`]: text, numbers, and an opaque case for every other
//! JSON shape, which sanitation never treats as numeric. Alternate key names
//! (`index`/`category`, `categories`/`value`) are kept as they arrived and reduced to one
//! canonical pair by [`AccessorKeys::resolve`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One data row: column name to value.
pub type Row = BTreeMap<String, RowValue>;

/// A single cell of a data row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValue {
    Text(String),
    Number(f64),
    /// Any other JSON value (bool, null, array, object), kept as sent. Never numeric.
    Other(serde_json::Value),
}

impl From<serde_json::Value> for RowValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => RowValue::Text(s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => RowValue::Number(f),
                None => RowValue::Other(serde_json::Value::Number(n)),
            },
            other => RowValue::Other(other),
        }
    }
}

impl fmt::Display for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValue::Text(s) => write!(f, "{s}"),
            RowValue::Number(n) => write!(f, "{n}"),
            RowValue::Other(value) => write!(f, "{value}"),
        }
    }
}

impl<'de> Deserialize<'de> for RowValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(RowValue::from)
    }
}

/// Chart component requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Line,
    Donut,
    Area,
    /// Anything else, kept by name so the renderer can explain why nothing is drawn.
    Unsupported(String),
}

impl ChartKind {
    /// Map a component name (`BarChart`, `bar`, ...) to a chart kind.
    pub fn from_component_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "barchart" | "bar" => ChartKind::Bar,
            "linechart" | "line" => ChartKind::Line,
            "donutchart" | "donut" | "pie" | "piechart" => ChartKind::Donut,
            "areachart" | "area" => ChartKind::Area,
            _ => ChartKind::Unsupported(name.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ChartKind::Unsupported(_))
    }
}

impl Default for ChartKind {
    fn default() -> Self {
        ChartKind::Unsupported(String::new())
    }
}

impl<'de> Deserialize<'de> for ChartKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(name) => ChartKind::from_component_name(&name),
            other => ChartKind::Unsupported(other.to_string()),
        })
    }
}

/// One chart as described by the model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualizationSpec {
    pub id: String,
    #[serde(rename = "component", default)]
    pub kind: ChartKind,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(rename = "data", default, deserialize_with = "lenient_rows")]
    pub rows: Vec<Row>,
    /// Label accessor as sent (`index`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub index: Option<String>,
    /// Alternate label accessor (`category`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    /// Series accessors as sent (`categories`).
    #[serde(default, deserialize_with = "lenient_strings")]
    pub categories: Vec<String>,
    /// Alternate single series accessor (`value`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub colors: Vec<String>,
}

impl VisualizationSpec {
    pub fn keys(&self) -> AccessorKeys {
        AccessorKeys::resolve(self)
    }
}

/// Canonical accessors used by sanitation and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorKeys {
    pub label_key: String,
    pub series_keys: Vec<String>,
}

impl AccessorKeys {
    pub const DEFAULT_LABEL_KEY: &'static str = "category";
    pub const DEFAULT_SERIES_KEY: &'static str = "value";

    /// Pick the label key (`index`, then `category`, then `"category"`) and the series keys
    /// (`categories` when non-empty, then `[value]`, then `["value"]`).
    pub fn resolve(spec: &VisualizationSpec) -> Self {
        let label_key = non_empty(&spec.index)
            .or_else(|| non_empty(&spec.category))
            .unwrap_or(Self::DEFAULT_LABEL_KEY)
            .to_string();

        let series_keys = if spec.categories.is_empty() {
            vec![non_empty(&spec.value)
                .unwrap_or(Self::DEFAULT_SERIES_KEY)
                .to_string()]
        } else {
            spec.categories.clone()
        };

        AccessorKeys {
            label_key,
            series_keys,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// Model output is loose: a wrong type for an optional field must not sink the whole spec.

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        serde_json::Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Row>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::Object(map) => Some(
                    map.into_iter()
                        .map(|(key, value)| (key, RowValue::from(value)))
                        .collect(),
                ),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec_from(value: serde_json::Value) -> VisualizationSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_component_names() {
        assert_eq!(ChartKind::from_component_name("BarChart"), ChartKind::Bar);
        assert_eq!(ChartKind::from_component_name("linechart"), ChartKind::Line);
        assert_eq!(ChartKind::from_component_name("DonutChart"), ChartKind::Donut);
        assert_eq!(ChartKind::from_component_name("AreaChart"), ChartKind::Area);
        assert_eq!(
            ChartKind::from_component_name("ScatterChart"),
            ChartKind::Unsupported("ScatterChart".into())
        );
    }

    #[test]
    fn test_missing_component_is_unsupported() {
        let spec = spec_from(json!({"id": "A"}));
        assert!(!spec.kind.is_supported());
    }

    #[test]
    fn test_rows_become_text_or_number() {
        let spec = spec_from(json!({
            "id": "A",
            "component": "BarChart",
            "data": [{"year": "2023", "sales": 12.5, "flag": true, "none": null}, "skip me"]
        }));
        assert_eq!(spec.rows.len(), 1);
        let row = &spec.rows[0];
        assert_eq!(row["year"], RowValue::Text("2023".into()));
        assert_eq!(row["sales"], RowValue::Number(12.5));
        assert_eq!(row["flag"], RowValue::Other(json!(true)));
        assert_eq!(row["none"], RowValue::Other(serde_json::Value::Null));
    }

    #[test]
    fn test_keys_prefer_index_and_categories() {
        let spec = spec_from(json!({
            "id": "A",
            "index": "year",
            "category": "ignored",
            "categories": ["sales", "profit"],
            "value": "ignored"
        }));
        let keys = spec.keys();
        assert_eq!(keys.label_key, "year");
        assert_eq!(keys.series_keys, vec!["sales", "profit"]);
    }

    #[test]
    fn test_keys_fall_back_to_alternate_names() {
        let spec = spec_from(json!({"id": "A", "category": "company", "value": "share"}));
        let keys = spec.keys();
        assert_eq!(keys.label_key, "company");
        assert_eq!(keys.series_keys, vec!["share"]);
    }

    #[test]
    fn test_keys_fall_back_to_defaults() {
        let spec = spec_from(json!({"id": "A", "index": "", "categories": []}));
        let keys = spec.keys();
        assert_eq!(keys.label_key, "category");
        assert_eq!(keys.series_keys, vec!["value"]);
    }

    #[test]
    fn test_wrongly_typed_optional_fields_are_ignored() {
        let spec = spec_from(json!({
            "id": "A",
            "title": "T",
            "index": 3,
            "categories": "sales",
            "colors": ["blue", 7],
            "data": {"not": "a list"}
        }));
        assert_eq!(spec.index, None);
        assert_eq!(spec.categories, vec!["sales"]);
        assert_eq!(spec.colors, vec!["blue"]);
        assert!(spec.rows.is_empty());
    }
}
