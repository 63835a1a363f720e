//! Error types for loading and editing a ranking session.

use thiserror::Error;

/// Errors raised while parsing an uploaded JSONL file.
///
/// Line numbers are 1-based and count every physical line, blank ones included,
/// so they match what an editor shows.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Line is not valid JSON.
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Line is valid JSON but not an object.
    #[error("line {line}: expected a JSON object")]
    NotAnObject { line: usize },

    /// Required field absent.
    #[error("line {line}: missing field '{field}'")]
    MissingField { line: usize, field: &'static str },

    /// Field present with the wrong JSON type.
    #[error("line {line}: field '{field}' must be {expected}")]
    InvalidField {
        line: usize,
        field: &'static str,
        expected: &'static str,
    },
}

impl LoadError {
    /// Line the error was found on
    pub fn line(&self) -> usize {
        match self {
            LoadError::Json { line, .. }
            | LoadError::NotAnObject { line }
            | LoadError::MissingField { line, .. }
            | LoadError::InvalidField { line, .. } => *line,
        }
    }
}

/// Errors raised by operations on a loaded session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Drop-target id does not name a query in this session.
    #[error("unknown drop target '{0}'")]
    UnknownDropTarget(String),

    /// Reorder index outside the candidate list.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Operation requires a loaded file.
    #[error("no file loaded")]
    NoSession,
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
