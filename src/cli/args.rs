// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for quill

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Convert documents with front matter through dollar-delimited templates")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a document through a template
    Render {
        #[arg(help = "Path to the source document")]
        input: PathBuf,

        #[arg(short, long, help = "Path to the template file")]
        template: Option<PathBuf>,

        #[arg(
            short = 'V',
            long = "var",
            help = "Set or override a metadata field (key=value)"
        )]
        vars: Vec<String>,

        #[arg(short, long, help = "Output file (defaults to stdout)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Context key the document body is stored under")]
        body_key: Option<String>,
    },

    /// Check a template for syntax errors without rendering
    Check {
        #[arg(help = "Path to the template file")]
        template: PathBuf,
    },

    /// Print the context a document would be rendered with
    Context {
        #[arg(help = "Path to the source document")]
        input: PathBuf,

        #[arg(
            short = 'V',
            long = "var",
            help = "Set or override a metadata field (key=value)"
        )]
        vars: Vec<String>,

        #[arg(long, value_enum, default_value_t = ContextFormat::Json, help = "Output format")]
        format: ContextFormat,

        #[arg(long, help = "Context key the document body is stored under")]
        body_key: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContextFormat {
    Json,
    Yaml,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from key=value format
    pub fn parse_variables(
        vars: &[String],
    ) -> anyhow::Result<std::collections::HashMap<String, String>> {
        let mut variables = std::collections::HashMap::new();

        for var in vars {
            if let Some((key, value)) = var.split_once('=') {
                if key.is_empty() {
                    return Err(anyhow::anyhow!("Variable '{}' has an empty name", var));
                }
                variables.insert(key.to_string(), value.to_string());
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid variable format '{}'. Expected 'key=value'",
                    var
                ));
            }
        }

        Ok(variables)
    }
}
