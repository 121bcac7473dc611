// ABOUTME: Hooks that may modify a parsed document before it is rendered
// ABOUTME: Includes closure hooks plus metadata defaults and overrides for configured variables

use tracing::debug;

use super::error::Result;
use super::Document;
use crate::template::Mapping;

pub trait DocumentHook: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str {
        "hook"
    }

    fn apply(&self, document: &mut Document) -> Result<()>;
}

impl<F> DocumentHook for F
where
    F: Fn(&mut Document) -> Result<()> + Send + Sync,
{
    fn apply(&self, document: &mut Document) -> Result<()> {
        self(document)
    }
}

/// Replaces top-level metadata fields, adding any that are missing
#[derive(Debug, Clone, Default)]
pub struct MetadataOverrides {
    values: Mapping,
}

impl MetadataOverrides {
    pub fn new(values: Mapping) -> Self {
        Self { values }
    }
}

impl DocumentHook for MetadataOverrides {
    fn name(&self) -> &str {
        "metadata-overrides"
    }

    fn apply(&self, document: &mut Document) -> Result<()> {
        debug!("Overriding {} metadata fields", self.values.len());
        for (key, value) in &self.values {
            document.metadata.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

/// Adds top-level metadata fields only where the document has none
#[derive(Debug, Clone, Default)]
pub struct MetadataDefaults {
    values: Mapping,
}

impl MetadataDefaults {
    pub fn new(values: Mapping) -> Self {
        Self { values }
    }
}

impl DocumentHook for MetadataDefaults {
    fn name(&self) -> &str {
        "metadata-defaults"
    }

    fn apply(&self, document: &mut Document) -> Result<()> {
        for (key, value) in &self.values {
            document
                .metadata
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        Ok(())
    }
}
