//! All error types for the csvlocale crate.
//!
//! Only [`Error::InputRoot`] and [`Error::OutputRoot`] abort a run. Everything
//! else is downgraded to a [`crate::Diagnostic`] by the pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown output mode `{0}`")]
    UnknownMode(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("directory walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("input directory `{}` is not accessible: {source}", .path.display())]
    InputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output directory `{}` cannot be created: {source}", .path.display())]
    OutputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing header: {0}")]
    MissingHeader(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Whether this error terminates a run instead of being reported as a diagnostic.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InputRoot { .. } | Error::OutputRoot { .. })
    }
}
