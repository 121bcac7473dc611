// ABOUTME: YAML front matter extraction for source documents
// ABOUTME: Splits a leading '---' block from the body and converts it into template values

use tracing::debug;

use super::error::{DocumentError, Result};
use super::Document;
use crate::template::{Mapping, Value};

/// Produces a document's metadata and body from its source text
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, source: &str) -> Result<Document>;
}

/// Reads metadata from a YAML block delimited by `---` lines at the top of the source
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFrontMatter;

impl MetadataExtractor for YamlFrontMatter {
    fn extract(&self, source: &str) -> Result<Document> {
        let (yaml, body) = split_front_matter(source)?;
        let metadata = match yaml {
            Some(yaml) => parse_metadata(yaml)?,
            None => Mapping::new(),
        };
        debug!("Extracted {} front matter fields", metadata.len());
        Ok(Document::new(metadata, body))
    }
}

/// Split `source` into its front matter text (without delimiters) and body.
///
/// Front matter must open on the very first line with `---` and close with a
/// line reading `---` or `...`.
pub fn split_front_matter(source: &str) -> Result<(Option<&str>, &str)> {
    let mut lines = source.split_inclusive('\n');
    match lines.next() {
        Some(first) if strip_terminator(first) == "---" && first.ends_with('\n') => {}
        _ => return Ok((None, source)),
    }

    let yaml_start = first_line_len(source);
    let mut offset = yaml_start;
    for line in lines {
        let line_end = offset + line.len();
        let content = strip_terminator(line);
        if content == "---" || content == "..." {
            return Ok((Some(&source[yaml_start..offset]), &source[line_end..]));
        }
        offset = line_end;
    }

    Err(DocumentError::UnterminatedFrontMatter)
}

fn first_line_len(source: &str) -> usize {
    source.find('\n').map(|i| i + 1).unwrap_or(source.len())
}

fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}

fn parse_metadata(yaml: &str) -> Result<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let parsed: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    match Value::from(parsed) {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map),
        other => Err(DocumentError::FrontMatterNotMapping {
            found: kind_name(&other).to_string(),
        }),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Boolean(_) => "a boolean",
        Value::Scalar(_) => "a scalar",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
    }
}
