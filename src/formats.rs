//! Output formats for pipeline results
//!
//! - `json`: the full output as pretty-printed JSON, the shape a renderer consumes
//! - `outline`: one line per segment, chart and citation group, for eyeballing results

pub mod json;
pub mod outline;
pub mod registry;

pub use json::JsonFormatter;
pub use outline::{to_outline_str, OutlineFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
