// ABOUTME: Command implementations for the quill CLI
// ABOUTME: Handles execution of render, check, and context commands

use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use super::args::{Args, ContextFormat};
use super::config::Config;
use crate::document::{Converter, MetadataDefaults, MetadataOverrides};
use crate::template::{Context, Mapping, TemplateEngine, Value};

/// Render a document through a template
pub async fn render_document(
    input: PathBuf,
    template: Option<PathBuf>,
    vars: Vec<String>,
    output: Option<PathBuf>,
    body_key: Option<String>,
    config: &Config,
) -> Result<()> {
    info!("Rendering document: {}", input.display());

    let converter = build_converter(&vars, body_key, config)?;
    let template = match template.or_else(|| config.default_template.clone()) {
        Some(path) => {
            let template_source = read_file(&path, "template").await?;
            converter
                .engine()
                .compile(&template_source)
                .map_err(|e| anyhow::anyhow!("Failed to compile template: {}", e))?
        }
        None => converter.body_template(),
    };

    let source = read_file(&input, "document").await?;
    let rendered = converter
        .convert(&source, &template)
        .map_err(|e| anyhow::anyhow!("Failed to convert '{}': {}", input.display(), e))?;

    match output {
        Some(path) => {
            fs::write(&path, rendered).await.map_err(|e| {
                anyhow::anyhow!("Failed to write output file '{}': {}", path.display(), e)
            })?;
            info!("Output written to: {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Check a template file for syntax errors
pub async fn check_template(template_path: PathBuf, config: &Config) -> Result<()> {
    info!("Checking template: {}", template_path.display());

    let source = read_file(&template_path, "template").await?;
    let engine = TemplateEngine::with_max_depth(config.max_nesting_depth);
    let template = engine.compile(&source).map_err(|e| {
        anyhow::anyhow!("Template '{}' is invalid: {}", template_path.display(), e)
    })?;

    println!("✓ Template '{}' is valid", template_path.display());
    println!("  Nodes: {}", template.nodes().len());
    println!("  Nesting depth: {}", template.depth());

    Ok(())
}

/// Print the context a document would be rendered with
pub async fn print_context(
    input: PathBuf,
    vars: Vec<String>,
    format: ContextFormat,
    body_key: Option<String>,
    config: &Config,
) -> Result<()> {
    info!("Building context for: {}", input.display());

    let converter = build_converter(&vars, body_key, config)?;
    let source = read_file(&input, "document").await?;
    let document = converter
        .parse(&source)
        .map_err(|e| anyhow::anyhow!("Failed to parse '{}': {}", input.display(), e))?;
    let context = converter.context(&document)?;

    println!("{}", format_context(&context, format)?);
    Ok(())
}

/// Serialize a context for display
pub fn format_context(context: &Context, format: ContextFormat) -> Result<String> {
    match format {
        ContextFormat::Json => Ok(serde_json::to_string_pretty(context)?),
        ContextFormat::Yaml => Ok(serde_yaml::to_string(context)?),
    }
}

/// Converter configured from the config file and command line variables
pub fn build_converter(
    vars: &[String],
    body_key: Option<String>,
    config: &Config,
) -> Result<Converter> {
    let overrides = Args::parse_variables(vars)?;
    info!("Parsed {} metadata overrides", overrides.len());

    Ok(Converter::new()
        .with_engine(TemplateEngine::with_max_depth(config.max_nesting_depth))
        .with_body_key(body_key.unwrap_or_else(|| config.body_key.clone()))
        .with_hook(MetadataDefaults::new(to_mapping(&config.variables)))
        .with_hook(MetadataOverrides::new(to_mapping(&overrides))))
}

fn to_mapping(variables: &HashMap<String, String>) -> Mapping {
    let mut entries: Vec<_> = variables.iter().collect();
    entries.sort();
    entries
        .into_iter()
        .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
        .collect()
}

async fn read_file(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {} '{}': {}", what, path.display(), e))
}
