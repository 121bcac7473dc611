// ABOUTME: Template engine module for quill document conversion
// ABOUTME: Compiles dollar-delimited templates and renders them against a nested context

pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod parser;
pub mod resolve;
pub mod trim;

pub use ast::{Node, Reference, Template};
pub use context::{Context, Mapping, Value};
pub use engine::{compile_and_render, render, TemplateEngine};
pub use error::{Result, TemplateError};
pub use parser::{compile, compile_with_limit, DEFAULT_MAX_DEPTH};
