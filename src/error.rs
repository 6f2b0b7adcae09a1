#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::context::Format;

/// Errors raised while building the context from data files.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Context path does not exist: {path}")]
    #[diagnostic(help("Relative context paths are resolved against the current directory"))]
    PathNotFound { path: PathBuf },

    #[error("Unrecognized context file extension '{extension}' for {path}")]
    #[diagnostic(help("Context files must be .json, .yaml, .yml or .plist"))]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("Failed to parse {format} context file {path}")]
    ParseError {
        path: PathBuf,
        format: Format,
        #[source]
        source: ParseFailure,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// The underlying reason a context file could not be turned into a mapping.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Plist(#[from] plist::Error),

    #[error("file is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("expected a mapping at the document root, found {found}")]
    RootNotMapping { found: &'static str },
}

/// Errors raised while loading or rendering a template.
#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("Template not found or unreadable: {path}")]
    #[diagnostic(help("Check the path passed to --template"))]
    TemplateNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template syntax error in {template}")]
    #[diagnostic(help("Check your Tera template syntax"))]
    SyntaxError {
        template: String,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to render {template}")]
    #[diagnostic(help(
        "A variable lookup or helper call failed; check the context keys and helper arguments"
    ))]
    EvaluationError {
        template: String,
        #[source]
        source: tera::Error,
    },
}

#[derive(Debug, Error, Diagnostic)]
pub enum StacheError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to parse settings file {path}")]
    #[diagnostic(help("Check the TOML syntax in your stache config.toml"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StacheError>;
