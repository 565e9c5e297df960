use std::path::PathBuf;

use thiserror::Error;

/// File-level failures, nothing is returned from a parse that fails with one of these.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid input file '{path}': {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    #[error("Error reading file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single line which could not be decoded, recorded by the parser rather than propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid geometry: {message}")]
pub struct DecodeError {
    pub message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    #[error("Could not add layer; {0}")]
    InvalidLayer(String),

    #[error("Invalid layer index: {index}, layer count: {count}")]
    IndexOutOfRange { index: usize, count: usize },
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error("Style selection cancelled")]
    UserCancelled,

    #[error("Session closed, parse result discarded")]
    SessionClosed,

    #[error("Background parse failed: {0}")]
    WorkerFailed(String),
}
