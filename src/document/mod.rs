// ABOUTME: Document conversion glue around the template engine
// ABOUTME: Splits front matter, runs hooks, renders the body, and assembles the render context

pub mod body;
pub mod converter;
pub mod error;
pub mod frontmatter;
pub mod hooks;

pub use body::{BodyRenderer, PassthroughRenderer};
pub use converter::{Converter, DEFAULT_BODY_KEY};
pub use error::{DocumentError, Result};
pub use frontmatter::{split_front_matter, MetadataExtractor, YamlFrontMatter};
pub use hooks::{DocumentHook, MetadataDefaults, MetadataOverrides};

use crate::template::Mapping;

/// A source document after front matter extraction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub metadata: Mapping,
    pub body: String,
}

impl Document {
    pub fn new(metadata: Mapping, body: impl Into<String>) -> Self {
        Self {
            metadata,
            body: body.into(),
        }
    }
}
