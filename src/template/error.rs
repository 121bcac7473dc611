// ABOUTME: Error types for template compilation
// ABOUTME: Parse failures carry a 1-based line number and a short source excerpt

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template syntax error on line {line}: unexpected \"{excerpt}\"")]
    Syntax { line: usize, excerpt: String },

    #[error("Template syntax error on line {line}: unexpected end of template")]
    UnexpectedEnd { line: usize },

    #[error("Template nesting on line {line} exceeds the limit of {limit} levels")]
    NestingTooDeep { line: usize, limit: usize },
}

impl TemplateError {
    /// Line the failure was detected on (1-based)
    pub fn line(&self) -> usize {
        match self {
            TemplateError::Syntax { line, .. }
            | TemplateError::UnexpectedEnd { line }
            | TemplateError::NestingTooDeep { line, .. } => *line,
        }
    }

    /// Source text starting at the failure point, empty at end of input
    pub fn excerpt(&self) -> &str {
        match self {
            TemplateError::Syntax { excerpt, .. } => excerpt,
            TemplateError::UnexpectedEnd { .. } | TemplateError::NestingTooDeep { .. } => "",
        }
    }

    /// Whether the parser ran off the end of the template
    pub fn is_at_end(&self) -> bool {
        matches!(self, TemplateError::UnexpectedEnd { .. })
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
