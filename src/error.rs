// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::gedcom::validator::ValidationRule;

#[derive(Debug, Error)]
pub enum GedcomError {
    #[error("Format error on line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("Invalid GEDCOM on line {line}: {rule}")]
    Validation { line: usize, rule: ValidationRule },

    #[error("Parent links through {id} form a cycle")]
    Cycle { id: String },

    #[error("No individual named {given} /{surname}/")]
    NotFound { given: String, surname: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, GedcomError>;

impl GedcomError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn validation(line: usize, rule: ValidationRule) -> Self {
        Self::Validation { line, rule }
    }

    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// True for errors caused by the file content rather than the caller or the OS.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Format { .. } | Self::Validation { .. } | Self::Cycle { .. }
        )
    }
}

// `?` on a bare io::Error has no path to report; callers that know it use `GedcomError::io`.
impl From<std::io::Error> for GedcomError {
    fn from(source: std::io::Error) -> Self {
        GedcomError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Directory walks surface as I/O errors on the offending path.
impl From<walkdir::Error> for GedcomError {
    fn from(e: walkdir::Error) -> Self {
        let path = e
            .path()
            .map_or_else(|| PathBuf::from("<unknown>"), std::path::Path::to_path_buf);
        let source = e
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed"));
        GedcomError::Io { source, path }
    }
}
