//! Stage composition
//!
//! - `config`: named processing configurations (`ConfigRegistry`)
//! - `settings`: tunable rendering settings (`RenderSettings`)
//! - `executor`: runs a configuration over one raw response (`PipelineExecutor`)

pub mod config;
pub mod executor;
pub mod settings;

pub use config::{ConfigRegistry, ProcessingConfig, TargetSpec};
pub use executor::{
    ExecutionError, ExecutionOutput, PipelineExecutor, RenderedDocument, RenderedVisualization,
};
pub use settings::{RenderSettings, SettingsError};

use crate::citation::Source;

/// Render one raw response with default settings.
pub fn render(raw: &str, sources: &[Source]) -> RenderedDocument {
    PipelineExecutor::new().render(raw, sources)
}
