use serde::{Deserialize, Serialize};

/// Common error types
#[derive(thiserror::Error, Debug)]
pub enum PrismError {
    /// Malformed caller input, e.g. a design URL without a file key or a
    /// tree that exceeds the walk ceilings.
    #[error("invalid input: {0}")]
    Input(String),

    /// A referenced design node or catalog entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The design source, record store, or completion provider returned a
    /// non-success status or an unusable payload.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A valid outcome with nothing to report (empty catalog, no matches
    /// above threshold). Carries guidance text for the caller.
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// Required credential or endpoint missing; raised before any core
    /// logic runs.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl From<reqwest::Error> for PrismError {
    fn from(err: reqwest::Error) -> Self {
        PrismError::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PrismError>;

/// Structured payload crossing the external boundary. Raw stack traces
/// never leave the shell; callers get a message plus accumulated warnings
/// from secondary persistence writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub is_error: bool,
}

impl OperationOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            warnings: Vec::new(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            warnings: Vec::new(),
            is_error: true,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}
