// ABOUTME: Document conversion pipeline from source text to rendered output
// ABOUTME: Runs extraction, hooks, body rendering, and template rendering in order

use tracing::{debug, info};

use super::body::{BodyRenderer, PassthroughRenderer};
use super::error::{DocumentError, Result};
use super::frontmatter::{MetadataExtractor, YamlFrontMatter};
use super::hooks::DocumentHook;
use super::Document;
use crate::template::{Context, Node, Reference, Template, TemplateEngine, Value};

/// Context key the rendered body is stored under unless configured otherwise
pub const DEFAULT_BODY_KEY: &str = "body";

pub struct Converter {
    extractor: Box<dyn MetadataExtractor>,
    renderer: Box<dyn BodyRenderer>,
    hooks: Vec<Box<dyn DocumentHook>>,
    body_key: String,
    engine: TemplateEngine,
}

impl Converter {
    /// YAML front matter, pass-through body, no hooks
    pub fn new() -> Self {
        Self {
            extractor: Box::new(YamlFrontMatter),
            renderer: Box::new(PassthroughRenderer),
            hooks: Vec::new(),
            body_key: DEFAULT_BODY_KEY.to_string(),
            engine: TemplateEngine::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: impl MetadataExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_renderer(mut self, renderer: impl BodyRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Append a hook. Hooks run in the order they were added.
    pub fn with_hook(mut self, hook: impl DocumentHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn with_body_key(mut self, body_key: impl Into<String>) -> Self {
        self.body_key = body_key.into();
        self
    }

    pub fn with_engine(mut self, engine: TemplateEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    pub fn body_key(&self) -> &str {
        &self.body_key
    }

    /// Template that outputs only the rendered body. Built directly rather
    /// than compiled, since a key like `doc.body` or `sep` would not
    /// round-trip through `$key$` syntax.
    pub fn body_template(&self) -> Template {
        Template::from_nodes(vec![Node::Variable(Reference::key(self.body_key.as_str()))])
    }

    /// Extract metadata and body, then apply every hook
    pub fn parse(&self, source: &str) -> Result<Document> {
        let mut document = self.extractor.extract(source)?;
        for hook in &self.hooks {
            debug!("Applying document hook: {}", hook.name());
            hook.apply(&mut document).map_err(|e| match e {
                DocumentError::Hook { .. } => e,
                other => DocumentError::Hook {
                    hook: hook.name().to_string(),
                    message: other.to_string(),
                },
            })?;
        }
        Ok(document)
    }

    /// Render the body and combine it with the metadata. The body entry
    /// replaces any metadata field of the same name.
    pub fn context(&self, document: &Document) -> Result<Context> {
        let body = self.renderer.render(&document.body)?;
        let mut context = Context::from_mapping(document.metadata.clone());
        context.insert(self.body_key.clone(), Value::Scalar(body));
        Ok(context)
    }

    /// Convert `source` using an already compiled template
    pub fn convert(&self, source: &str, template: &Template) -> Result<String> {
        let document = self.parse(source)?;
        let mut context = self.context(&document)?;
        let output = template.render(&mut context);
        info!("Converted document: {} bytes of output", output.len());
        Ok(output)
    }

    /// Compile `template_source` and convert `source` with it
    pub fn convert_with(&self, source: &str, template_source: &str) -> Result<String> {
        let template = self.engine.compile(template_source)?;
        self.convert(source, &template)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
