// ABOUTME: Main library module for the quill document converter
// ABOUTME: Exports the template engine, document pipeline, and CLI as the public API

pub mod cli;
pub mod document;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use document::{Converter, Document, DocumentError};
pub use template::{
    compile, compile_and_render, render, Context, Template, TemplateEngine, TemplateError, Value,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
