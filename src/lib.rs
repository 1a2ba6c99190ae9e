//! # factbook
//!
//! Turns raw generative-model answers into content a factbook page can render safely:
//! cleaned prose, validated chart data and resolved citation links.
//!
//! Model output is treated as adversarial. It may leak reasoning, carry malformed JSON,
//! cite sources that do not exist or mention charts that were never sent. Every stage
//! degrades to an explicit, visible state instead of failing.
//!
//! ## Stages
//!
//! 1. [`normalizer`]: strip reasoning spans, keep the answer
//! 2. [`visualization::extract`]: find and parse the chart block
//! 3. [`visualization::sanitize`]: validate rows and coerce numbers
//! 4. [`citation`]: collapse `[1][2]` runs into grouped citation links
//! 5. [`interleave`]: split prose on `{{CHART_ID}}` tokens into ordered segments
//!
//! [`pipeline::PipelineExecutor`] composes them; [`formats`] serializes the result.
//!
//! ```rust,ignore
//! use factbook::citation::Source;
//! use factbook::pipeline::render;
//!
//! let doc = render(raw_response, &sources);
//! for segment in &doc.segments {
//!     // Text { text } or ChartReference { id, status }
//! }
//! ```

pub mod citation;
pub mod formats;
pub mod interleave;
pub mod normalizer;
pub mod pipeline;
pub mod visualization;

pub use citation::{CitationGroup, Source};
pub use interleave::{ChartStatus, ContentSegment};
pub use pipeline::{render, PipelineExecutor, RenderSettings, RenderedDocument};
