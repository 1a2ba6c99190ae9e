//! JSON output

use super::registry::{FormatError, Formatter};
use crate::pipeline::ExecutionOutput;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, output: &ExecutionOutput) -> Result<String, FormatError> {
        serde_json::to_string_pretty(output)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON"
    }
}
