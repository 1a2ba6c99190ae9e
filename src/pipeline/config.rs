//! Named processing configurations
//!
//! A configuration picks which stages run and what the executor hands back:
//!
//! - `default`: every stage, producing a [`RenderedDocument`](super::RenderedDocument)
//! - `prose`: normalization and citation grouping only, producing text
//! - `charts`: extraction and sanitation only, producing visualizations

use std::collections::HashMap;

/// A named configuration specifying what the pipeline produces
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub name: String,
    pub description: String,
    pub target: TargetSpec,
}

/// What to produce from the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSpec {
    /// Segments, sanitized charts and citation groups
    Document,
    /// Normalized prose with citation groups rewritten
    Prose,
    /// Extracted and sanitized visualizations
    Charts,
}

/// Registry of processing configurations
pub struct ConfigRegistry {
    configs: HashMap<String, ProcessingConfig>,
}

impl ConfigRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ConfigRegistry {
            configs: HashMap::new(),
        }
    }

    /// Register a configuration, replacing one with the same name
    pub fn register(&mut self, config: ProcessingConfig) {
        self.configs.insert(config.name.clone(), config);
    }

    pub fn get(&self, name: &str) -> Option<&ProcessingConfig> {
        self.configs.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// List all configurations (sorted by name)
    pub fn list_all(&self) -> Vec<&ProcessingConfig> {
        let mut configs: Vec<_> = self.configs.values().collect();
        configs.sort_by(|a, b| a.name.cmp(&b.name));
        configs
    }

    /// Create registry with standard configurations
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(ProcessingConfig {
            name: "default".into(),
            description: "All stages: prose segments, sanitized charts and citation groups".into(),
            target: TargetSpec::Document,
        });

        registry.register(ProcessingConfig {
            name: "prose".into(),
            description: "Normalized answer text with grouped citations".into(),
            target: TargetSpec::Prose,
        });

        registry.register(ProcessingConfig {
            name: "charts".into(),
            description: "Extracted visualizations with sanitized rows".into(),
            target: TargetSpec::Charts,
        });

        registry
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
