//! Tunable rendering settings
//!
//! Every field has a default, so a settings file only needs the keys it overrides.
//! Files are read as YAML, which also accepts JSON.

use crate::citation::DEFAULT_FALLBACK_URL;
use crate::normalizer::DEFAULT_ANSWER_SEPARATOR;
use crate::visualization::present::{default_donut_palette, DEFAULT_SERIES_SOURCE_SUFFIX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Link target for citation groups whose first source has no URL.
    pub citation_fallback_url: String,
    /// Joins multiple answer spans.
    pub answer_separator: String,
    /// Append visualizations that no placeholder token references.
    pub append_unreferenced_charts: bool,
    /// Row column suffix holding citation markers for a series value.
    pub series_source_suffix: String,
    /// Colors for donut charts without explicit colors.
    pub donut_palette: Vec<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            citation_fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            answer_separator: DEFAULT_ANSWER_SEPARATOR.to_string(),
            append_unreferenced_charts: true,
            series_source_suffix: DEFAULT_SERIES_SOURCE_SUFFIX.to_string(),
            donut_palette: default_donut_palette(),
        }
    }
}

/// Errors while loading settings
#[derive(Debug)]
pub enum SettingsError {
    Io(String),
    Parse(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(msg) => write!(f, "Cannot read settings: {msg}"),
            SettingsError::Parse(msg) => write!(f, "Invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl RenderSettings {
    pub fn parse(source: &str) -> Result<Self, SettingsError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&source)
    }
}
