#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CreateError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Prompt failed")]
    Prompt {
        #[source]
        source: inquire::InquireError,
    },

    #[error("Failed to parse user config {path}")]
    #[diagnostic(help("Check the TOML syntax in your config.toml file"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Template root not found")]
    #[diagnostic(help(
        "Pass --templates-dir, set CREATE_PROJECT_TEMPLATES, or set templates_dir in the user config"
    ))]
    TemplateRootMissing,

    #[error("Template directory not found: {path}")]
    #[diagnostic(help("The template root must contain one directory per template kind"))]
    TemplateDirectoryMissing { path: PathBuf },

    #[error("No supported package manager found")]
    #[diagnostic(help("Install npm, yarn or pnpm and make sure it is on your PATH"))]
    NoPackageManager,

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}")]
    #[diagnostic(help("The generated file is not valid JSON; check the template content"))]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Glob pattern error: {pattern}")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },
}

pub type Result<T> = std::result::Result<T, CreateError>;
