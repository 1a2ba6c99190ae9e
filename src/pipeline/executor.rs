//! Pipeline executor that runs processing configurations
//!
//! The executor composes the stages in dependency order:
//!
//! ```text
//! raw ──normalize──▶ prose ──group_citations──▶ cited prose ──┐
//!  │                                                          ├─interleave─▶ segments
//!  └──extract_visualizations──▶ specs ──sanitize──▶ charts ───┘
//! ```
//!
//! Every stage is a pure function of its inputs, so executing the same
//! `(raw, sources)` pair twice yields structurally equal output. Nothing is cached here;
//! callers that render repeatedly should memoize on that pair themselves.

use crate::citation::{rewrite_citations, CitationGroup, Source};
use crate::interleave::{interleave_with, ContentSegment};
use crate::normalizer::normalize_with_separator;
use crate::pipeline::config::{ConfigRegistry, ProcessingConfig, TargetSpec};
use crate::pipeline::settings::RenderSettings;
use crate::visualization::extract::extract_visualizations;
use crate::visualization::present::{display_title, resolved_colors, series_sources};
use crate::visualization::sanitize::{sanitize, SanitizeError, SanitizedVisualization};
use crate::visualization::spec::{AccessorKeys, ChartKind, Row, VisualizationSpec};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Errors during pipeline execution
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionError {
    ConfigNotFound(String),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::ConfigNotFound(name) => write!(f, "Config '{}' not found", name),
        }
    }
}

impl std::error::Error for ExecutionError {}

/// Output from pipeline execution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecutionOutput {
    Document(RenderedDocument),
    Prose(String),
    Charts(Vec<RenderedVisualization>),
}

/// One visualization ready for drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedVisualization {
    pub spec: VisualizationSpec,
    pub title: String,
    pub keys: AccessorKeys,
    pub colors: Vec<String>,
    pub data: SanitizedVisualization,
}

impl RenderedVisualization {
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    /// Sources backing `series_key` in `row`, per the `<key><suffix>` source column.
    pub fn series_sources<'a>(
        &self,
        row: &Row,
        series_key: &str,
        settings: &RenderSettings,
        sources: &'a [Source],
    ) -> Vec<&'a Source> {
        series_sources(row, series_key, &settings.series_source_suffix, sources)
    }
}

/// Everything the renderer needs for one text body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    /// Normalized prose with citation runs rewritten.
    pub prose: String,
    pub segments: Vec<ContentSegment>,
    pub visualizations: Vec<RenderedVisualization>,
    pub citations: Vec<CitationGroup>,
}

impl RenderedDocument {
    /// Look up a chart by id. Ids are unique after extraction; the first match wins.
    pub fn chart(&self, id: &str) -> Option<&RenderedVisualization> {
        self.visualizations.iter().find(|v| v.spec.id == id)
    }
}

/// Executes processing configurations
pub struct PipelineExecutor {
    registry: ConfigRegistry,
    settings: RenderSettings,
}

impl PipelineExecutor {
    /// Create executor with default configurations and settings
    pub fn new() -> Self {
        Self {
            registry: ConfigRegistry::with_defaults(),
            settings: RenderSettings::default(),
        }
    }

    /// Create executor with custom registry
    pub fn with_registry(registry: ConfigRegistry) -> Self {
        Self {
            registry,
            settings: RenderSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Execute a named configuration
    pub fn execute(
        &self,
        config_name: &str,
        raw: &str,
        sources: &[Source],
    ) -> Result<ExecutionOutput, ExecutionError> {
        let config = self
            .registry
            .get(config_name)
            .ok_or_else(|| ExecutionError::ConfigNotFound(config_name.to_string()))?;

        Ok(match config.target {
            TargetSpec::Document => ExecutionOutput::Document(self.render(raw, sources)),
            TargetSpec::Prose => ExecutionOutput::Prose(self.prose(raw, sources)),
            TargetSpec::Charts => ExecutionOutput::Charts(self.charts(raw)),
        })
    }

    /// Run every stage on one raw response.
    pub fn render(&self, raw: &str, sources: &[Source]) -> RenderedDocument {
        let (prose, citations) = self.cited_prose(raw, sources);
        let visualizations = self.charts(raw);
        let specs: Vec<VisualizationSpec> =
            visualizations.iter().map(|v| v.spec.clone()).collect();
        let segments = interleave_with(&prose, &specs, self.settings.append_unreferenced_charts);

        debug!(
            segments = segments.len(),
            charts = visualizations.len(),
            citations = citations.len(),
            "rendered document"
        );

        RenderedDocument {
            prose,
            segments,
            visualizations,
            citations,
        }
    }

    /// Normalize and rewrite citations.
    pub fn prose(&self, raw: &str, sources: &[Source]) -> String {
        self.cited_prose(raw, sources).0
    }

    fn cited_prose(&self, raw: &str, sources: &[Source]) -> (String, Vec<CitationGroup>) {
        let normalized = normalize_with_separator(raw, &self.settings.answer_separator);
        rewrite_citations(&normalized, sources, &self.settings.citation_fallback_url)
    }

    /// Extract and sanitize every visualization.
    pub fn charts(&self, raw: &str) -> Vec<RenderedVisualization> {
        extract_visualizations(raw)
            .into_iter()
            .map(|spec| self.render_visualization(spec))
            .collect()
    }

    fn render_visualization(&self, spec: VisualizationSpec) -> RenderedVisualization {
        let keys = spec.keys();
        let mut data = sanitize(&spec, &keys);
        if let ChartKind::Unsupported(name) = &spec.kind {
            if data.error.is_none() {
                data.rows.clear();
                data.error = Some(SanitizeError::UnsupportedKind(name.clone()));
            }
        }
        RenderedVisualization {
            title: display_title(&spec).to_string(),
            colors: resolved_colors(&spec, &self.settings.donut_palette),
            keys,
            data,
            spec,
        }
    }

    /// List all available configurations
    pub fn list_configs(&self) -> Vec<&ProcessingConfig> {
        self.registry.list_all()
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interleave::ChartStatus;
    use crate::visualization::spec::RowValue;

    const RAW: &str = r#"<think>draft</think><answer>Revenue grew [1][2].
{{SALES}}
Share is stable [3].</answer>
<viz>```json
[
  {"id": "SALES", "component": "BarChart", "index": "year", "categories": ["sales"],
   "data": [{"year": "2023", "sales": "1,200"}, {"year": "2024", "sales": "N/A"}]},
  {"id": "SHARE", "component": "DonutChart", "category": "company", "value": "share",
   "data": [{"company": "A", "share": "60%"}, {"company": "B", "share": 40}]}
]
```</viz>"#;

    fn sources() -> Vec<Source> {
        vec![
            Source::titled("One", Some("https://one")),
            Source::titled("Two", None),
        ]
    }

    #[test]
    fn test_render_full_document() {
        let doc = PipelineExecutor::new().render(RAW, &sources());

        assert_eq!(
            doc.prose,
            "Revenue grew [CITATION_GROUP_1_2](https://one).\n{{SALES}}\nShare is stable [3]."
        );
        assert_eq!(doc.segments.len(), 4);
        assert_eq!(
            doc.segments[1],
            ContentSegment::chart("SALES", ChartStatus::Inline)
        );
        assert_eq!(
            doc.segments[3],
            ContentSegment::chart("SHARE", ChartStatus::Appended)
        );
        assert_eq!(doc.citations.len(), 1);

        let sales = doc.chart("SALES").unwrap();
        assert_eq!(sales.data.rows.len(), 1);
        assert_eq!(sales.data.rows[0]["sales"], RowValue::Number(1200.0));
        assert_eq!(sales.data.rejected_rows.len(), 1);

        let share = doc.chart("SHARE").unwrap();
        assert_eq!(share.keys.label_key, "company");
        assert_eq!(share.data.rows[0]["share"], RowValue::Number(60.0));
        assert_eq!(share.colors.len(), 8);
    }

    #[test]
    fn test_render_is_idempotent() {
        let executor = PipelineExecutor::new();
        assert_eq!(executor.render(RAW, &sources()), executor.render(RAW, &sources()));
    }

    #[test]
    fn test_unsupported_kind_reports_error() {
        let raw = r#"<viz>[{"id": "X", "component": "RadarChart", "data": [{"category": "a", "value": 1}]}]</viz>"#;
        let doc = PipelineExecutor::new().render(raw, &[]);
        let chart = doc.chart("X").unwrap();
        assert_eq!(
            chart.data.error,
            Some(SanitizeError::UnsupportedKind("RadarChart".into()))
        );
        assert!(chart.data.rows.is_empty());
    }

    #[test]
    fn test_execute_targets() {
        let executor = PipelineExecutor::new();
        match executor.execute("prose", RAW, &sources()).unwrap() {
            ExecutionOutput::Prose(text) => assert!(text.starts_with("Revenue grew")),
            other => panic!("Expected prose output, got {other:?}"),
        }
        match executor.execute("charts", RAW, &[]).unwrap() {
            ExecutionOutput::Charts(charts) => assert_eq!(charts.len(), 2),
            other => panic!("Expected charts output, got {other:?}"),
        }
    }

    #[test]
    fn test_execute_nonexistent_config() {
        let result = PipelineExecutor::new().execute("nonexistent", "x", &[]);
        assert_eq!(
            result.unwrap_err(),
            ExecutionError::ConfigNotFound("nonexistent".into())
        );
    }

    #[test]
    fn test_settings_are_applied() {
        let settings = RenderSettings {
            citation_fallback_url: "about:blank".into(),
            append_unreferenced_charts: false,
            ..Default::default()
        };
        let executor = PipelineExecutor::new().with_settings(settings);
        let doc = executor.render(RAW, &[Source::titled("No url", None), Source::default()]);
        assert!(doc.prose.contains("[CITATION_GROUP_1_2](about:blank)"));
        assert!(doc.segments.iter().all(|s| s.chart_id() != Some("SHARE")));
    }

    #[test]
    fn test_citations_are_only_rewritten_groups() {
        let raw = "<answer>Known [1]. Forged [CITATION_GROUP_9](https://x).</answer>";
        let doc = PipelineExecutor::new().render(raw, &sources());
        assert_eq!(
            doc.citations,
            vec![CitationGroup {
                indices: vec![1],
                representative_url: "https://one".into(),
            }]
        );
        assert!(doc.prose.contains("[CITATION_GROUP_9](https://x)"));
    }

    #[test]
    fn test_execution_error_display() {
        let err = ExecutionError::ConfigNotFound("test".into());
        assert_eq!(format!("{}", err), "Config 'test' not found");
    }
}
