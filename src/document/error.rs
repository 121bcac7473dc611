// ABOUTME: Error types for document conversion
// ABOUTME: Covers front matter extraction, body rendering, hooks, and template compilation

use thiserror::Error;

use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to parse front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("Front matter must be a mapping, found {found}")]
    FrontMatterNotMapping { found: String },

    #[error("Front matter is not closed with '---' or '...'")]
    UnterminatedFrontMatter,

    #[error("Body rendering failed: {0}")]
    BodyRender(String),

    #[error("Hook '{hook}' failed: {message}")]
    Hook { hook: String, message: String },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

pub type Result<T> = std::result::Result<T, DocumentError>;
