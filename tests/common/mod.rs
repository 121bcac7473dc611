// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides builders for source documents and temporary file environments

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

use quill::template::Context;

pub struct TestDocumentBuilder {
    front_matter: Vec<(String, String)>,
    body: String,
}

impl TestDocumentBuilder {
    pub fn new() -> Self {
        Self {
            front_matter: Vec::new(),
            body: String::new(),
        }
    }

    /// Add a front matter field; `value` is written as raw YAML
    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.front_matter.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn build(&self) -> String {
        let mut source = String::new();
        if !self.front_matter.is_empty() {
            source.push_str("---\n");
            for (key, value) in &self.front_matter {
                source.push_str(&format!("{}: {}\n", key, value));
            }
            source.push_str("---\n");
        }
        source.push_str(&self.body);
        source
    }
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub async fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents)
            .await
            .expect("Failed to write test file");
        path
    }

    pub async fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.path().join(name))
            .await
            .expect("Failed to read test file")
    }
}

/// Build a context from a JSON literal
pub fn context(value: serde_json::Value) -> Context {
    Context::from(value)
}
