// ABOUTME: Configuration management for the quill application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::document::DEFAULT_BODY_KEY;
use crate::template::DEFAULT_MAX_DEPTH;

fn default_body_key() -> String {
    DEFAULT_BODY_KEY.to_string()
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_template: Option<PathBuf>,

    #[serde(default = "default_body_key")]
    pub body_key: String,

    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Metadata defaults; front matter and -V values take precedence
    #[serde(default)]
    pub variables: HashMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_template: None,
            body_key: default_body_key(),
            max_nesting_depth: default_max_nesting_depth(),
            variables: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file()?,
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::from_yaml(&contents)?
        } else {
            Config::default()
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the environment
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Result<PathBuf> {
        let possible_paths = vec![
            PathBuf::from("quill.yaml"),
            PathBuf::from("quill.yml"),
            PathBuf::from(".quill.yaml"),
            PathBuf::from(".quill.yml"),
        ];

        // Check current directory
        for path in possible_paths {
            if path.exists() {
                return Ok(path);
            }
        }

        // Check home directory
        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".quill").join("config.yaml");
            if home_config.exists() {
                return Ok(home_config);
            }
        }

        // Return default path (may not exist)
        Ok(PathBuf::from("quill.yaml"))
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(template) = lookup("QUILL_TEMPLATE") {
            self.default_template = Some(PathBuf::from(template));
        }
        if let Some(body_key) = lookup("QUILL_BODY_KEY") {
            self.body_key = body_key;
        }
        if let Some(depth) = lookup("QUILL_MAX_NESTING") {
            self.max_nesting_depth = depth.parse()?;
        }

        // Logging configuration
        if let Some(level) = lookup("QUILL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("QUILL_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }
}
