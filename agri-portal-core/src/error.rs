//! Error types for the agri portal core
//!
//! One `thiserror` enum per concern. The HTTP layer never exposes these to
//! callers directly; it logs them and answers with a generic body.

use thiserror::Error;

/// Invalid reply rule definition
#[derive(Error, Debug)]
pub enum ReplyRuleError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Service catalog loading and validation errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Service catalog is empty")]
    Empty,

    #[error("Service at position {index} has an empty label")]
    EmptyLabel { index: usize },

    #[error("Service '{label}' has an unsupported url '{url}' (expected http or https)")]
    InvalidUrl { label: String, url: String },
}

/// Server configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {var} value '{value}': {message}")]
    InvalidVar {
        var: &'static str,
        value: String,
        message: String,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Chat panel client errors
#[derive(Error, Debug)]
pub enum ChatClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Bad JSON from server")]
    BadJson,

    #[error("{0}")]
    Server(String),
}
