// ABOUTME: Template evaluation against a Context and the TemplateEngine facade
// ABOUTME: Renders literals, variables, conditionals, and loops with scoped loop rebinding

use tracing::{debug, trace};

use super::ast::{Node, Reference, Template};
use super::context::{Context, Value};
use super::error::Result;
use super::parser::{self, DEFAULT_MAX_DEPTH};
use super::trim::trim;

impl Template {
    /// Render against `context`. Never fails; missing values render as nothing.
    ///
    /// Loops rebind their reference inside `context` while the body renders and
    /// restore it before returning, so the context is unchanged afterwards.
    pub fn render(&self, context: &mut Context) -> String {
        let output = render_nodes(self.nodes(), context);
        debug!("Template rendered successfully, {} characters", output.len());
        output
    }
}

/// Render a compiled template against a context
pub fn render(template: &Template, context: &mut Context) -> String {
    template.render(context)
}

/// Compile `source` and render it once
pub fn compile_and_render(source: &str, context: &mut Context) -> Result<String> {
    let template = parser::compile(source)?;
    Ok(template.render(context))
}

fn render_nodes(nodes: &[Node], context: &mut Context) -> String {
    let mut output = String::new();
    for node in nodes {
        render_node(node, context, &mut output);
    }
    output
}

fn render_node(node: &Node, context: &mut Context, output: &mut String) {
    match node {
        Node::Literal(text) => output.push_str(text),
        Node::Variable(reference) => {
            let value = context.resolve(reference);
            if value.is_null() {
                trace!("Unresolved template variable: {}", reference);
            }
            output.push_str(&value.to_text());
        }
        Node::Conditional {
            reference,
            then_branch,
            else_branch,
        } => {
            let branch = if context.resolve(reference).is_truthy() {
                Some(then_branch)
            } else {
                else_branch.as_ref()
            };
            if let Some(branch) = branch {
                output.push_str(&trim(render_nodes(branch, context)));
            }
        }
        Node::Loop {
            reference,
            body,
            separator,
        } => output.push_str(&render_loop(
            reference,
            body,
            separator.as_deref(),
            context,
        )),
    }
}

fn render_loop(
    reference: &Reference,
    body: &[Node],
    separator: Option<&[Node]>,
    context: &mut Context,
) -> String {
    let value = context.resolve(reference).clone();
    if !value.is_truthy() {
        trace!("Skipping loop over falsy value: {}", reference);
        return String::new();
    }

    let items = match &value {
        Value::Sequence(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };

    let mut buffer = String::new();
    for (index, item) in items.iter().enumerate() {
        context.bind(reference, item.clone());
        buffer.push_str(&render_nodes(body, context));
        if let Some(separator) = separator {
            if index + 1 < items.len() {
                buffer.push_str(&render_nodes(separator, context));
            }
        }
    }
    context.bind(reference, value);

    trim(buffer)
}

/// Compiles and renders templates with a configured nesting limit
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    max_depth: usize,
}

impl TemplateEngine {
    /// Create an engine with the default nesting limit
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Create an engine that rejects nesting deeper than `max_depth`
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Compile a template string
    pub fn compile(&self, source: &str) -> Result<Template> {
        parser::compile_with_limit(source, self.max_depth)
    }

    /// Render a compiled template with the given context
    pub fn render(&self, template: &Template, context: &mut Context) -> String {
        template.render(context)
    }

    /// Compile and render a template string with the given context
    pub fn render_str(&self, source: &str, context: &mut Context) -> Result<String> {
        let template = self.compile(source)?;
        Ok(template.render(context))
    }

    /// Validate template syntax without rendering
    pub fn validate(&self, source: &str) -> Result<()> {
        self.compile(source).map(|_| ())
    }

    /// Check if a string contains template constructs other than `$$` escapes
    pub fn has_templates(&self, text: &str) -> bool {
        text.replace("$$", "").contains('$')
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
