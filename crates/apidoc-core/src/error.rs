use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported mapping key: {0}")]
    UnsupportedKey(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("reference not found: {0}")]
    ReferenceNotFound(String),

    #[error("invalid reference format: {0}")]
    InvalidReference(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("malformed spec: {0}")]
    MalformedSpec(String),

    #[error("operation {method} {path} has no operationId")]
    MissingOperationId { method: String, path: String },

    #[error("no application/json or multipart/form-data schema for request body of {method} {path}")]
    MissingRequestSchema { method: String, path: String },
}

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("malformed spec: {0}")]
    MalformedSpec(String),

    #[error("operation {method} {path} has no operationId")]
    MissingOperationId { method: String, path: String },

    #[error("improper request body schema for {method} {path}")]
    MissingRequestSchema { method: String, path: String },

    #[error("request schema could not be compiled: {0}")]
    InvalidSchema(String),

    #[error("invalid request. {} error(s) found => {}", .0.len(), .0.join(" | "))]
    ValidationFailed(Vec<String>),
}

impl ValidateError {
    /// Individual schema violations, empty for every other error kind.
    pub fn violations(&self) -> &[String] {
        match self {
            ValidateError::ValidationFailed(violations) => violations,
            _ => &[],
        }
    }
}
