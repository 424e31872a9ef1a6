//! Error types for HUML decoding and encoding.

use std::fmt::Display;

use thiserror::Error;

use crate::lexical::SUPPORTED_VERSION;

/// Result type for HUML operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed document: bad token, indentation, whitespace, duplicate key.
    Syntax,
    /// The `%HUML` header names a version this crate does not speak.
    VersionMismatch,
    /// The encoder was handed something HUML cannot represent.
    UnsupportedType,
}

/// Error type for HUML decoding and encoding.
///
/// Decoding is all-or-nothing: the first grammar violation aborts the whole
/// document and is reported with its 1-based line number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Grammar violation at the given line.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Unsupported version token in the `%HUML` header.
    #[error("line {line}: unsupported version '{found}'. expected '{}'", SUPPORTED_VERSION)]
    VersionMismatch { line: usize, found: String },

    /// Value outside the HUML data model.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
}

impl Error {
    /// Create a syntax error at a 1-based line.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Create an unsupported type error naming the offending kind.
    pub fn unsupported(what: impl Into<String>) -> Self {
        Error::UnsupportedType(what.into())
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::VersionMismatch { .. } => ErrorKind::VersionMismatch,
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
        }
    }

    /// The 1-based line number, for errors raised while decoding.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. } | Error::VersionMismatch { line, .. } => Some(*line),
            Error::UnsupportedType(_) => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::UnsupportedType(msg.to_string())
    }
}
