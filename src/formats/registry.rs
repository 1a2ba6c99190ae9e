//! Format registry for pipeline output
//!
//! Each format implements the `Formatter` trait and can be registered with `FormatRegistry`.

use crate::pipeline::ExecutionOutput;
use std::collections::HashMap;
use std::fmt;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Trait for output formatters
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "json", "outline")
    fn name(&self) -> &str;

    fn serialize(&self, output: &ExecutionOutput) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

/// Registry of output formatters, looked up by name
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter
    ///
    /// If a formatter with the same name already exists, it will be replaced.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Serialize output using the specified format
    pub fn serialize(&self, output: &ExecutionOutput, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(output)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with default formatters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(super::JsonFormatter);
        registry.register(super::OutlineFormatter);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ProseOnly;
    impl Formatter for ProseOnly {
        fn name(&self) -> &str {
            "prose-only"
        }

        fn serialize(&self, output: &ExecutionOutput) -> Result<String, FormatError> {
            match output {
                ExecutionOutput::Prose(text) => Ok(text.clone()),
                _ => Err(FormatError::SerializationError("prose only".into())),
            }
        }
    }

    #[test]
    fn test_defaults() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.list_formats(), vec!["json", "outline"]);
    }

    #[test]
    fn test_register_and_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(ProseOnly);
        assert!(registry.has("prose-only"));

        let out = registry
            .serialize(&ExecutionOutput::Prose("hi".into()), "prose-only")
            .unwrap();
        assert_eq!(out, "hi");

        let err = registry
            .serialize(&ExecutionOutput::Charts(vec![]), "prose-only")
            .unwrap_err();
        assert_eq!(err.to_string(), "Serialization error: prose only");
    }

    #[test]
    fn test_unknown_format() {
        let registry = FormatRegistry::new();
        let err = registry
            .serialize(&ExecutionOutput::Prose(String::new()), "yaml")
            .unwrap_err();
        assert_eq!(err, FormatError::FormatNotFound("yaml".into()));
    }
}
