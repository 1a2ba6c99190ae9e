//! Chart data embedded in model output
//!
//! A response may carry a block of chart descriptions next to its prose. This module
//! locates and parses that block (`extract`), describes the parsed data (`spec`),
//! validates and coerces row values before rendering (`sanitize`) and holds the small
//! presentation rules the renderer needs (`present`).

pub mod extract;
pub mod present;
pub mod sanitize;
pub mod spec;

pub use extract::extract_visualizations;
pub use sanitize::{sanitize, SanitizeError, SanitizedVisualization};
pub use spec::{AccessorKeys, ChartKind, Row, RowValue, VisualizationSpec};
