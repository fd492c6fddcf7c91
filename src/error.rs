//! The error taxonomy shared by every stage of loading, classification and evaluation.

use std::io;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KnnError>;

/// Every failure the crate can report.
///
/// Errors are raised where they are detected (parser, distance function, classifier)
/// and travel up unchanged; only the driver turns them into messages.
#[derive(thiserror::Error, Debug)]
pub enum KnnError {
    /// A token that should have been a number was not.
    #[error("invalid number `{token}`{}", line_suffix(.line))]
    Format { token: String, line: Option<usize> },

    /// A file (or the console) could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Two vectors of different length were compared.
    #[error("dimension mismatch: expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// An argument is outside the range the operation accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|n| format!(" on line {n}")).unwrap_or_default()
}

impl KnnError {
    pub fn format(token: impl Into<String>) -> Self {
        KnnError::Format { token: token.into(), line: None }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        KnnError::Io { path: path.into(), source }
    }

    /// Attaches a 1-based line number to a format error. Other kinds pass through.
    pub fn with_line(self, line: usize) -> Self {
        match self {
            KnnError::Format { token, .. } => KnnError::Format { token, line: Some(line) },
            other => other,
        }
    }

    /// Distinct non-zero process exit code per error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            KnnError::Format { .. } => 2,
            KnnError::Io { .. } => 3,
            KnnError::DimensionMismatch { .. } => 4,
            KnnError::InvalidArgument(_) => 5,
        }
    }
}
