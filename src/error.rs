//! Error types shared by the analysis pipeline.

use std::path::PathBuf;

/// Source text could not be turned into a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error{}: {message}", .line.map(|line| format!(" at line {line}")).unwrap_or_default())]
pub struct ParseError {
    pub line: Option<usize>,
    pub message: String,
}

impl ParseError {
    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }
}

/// A structural record violated the contract expected by the model builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed structural record at `{location}`: {reason}")]
pub struct MalformedInputError {
    pub location: String,
    pub reason: String,
}

impl MalformedInputError {
    pub fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON document {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("failed to load grammar: {0}")]
    Grammar(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
