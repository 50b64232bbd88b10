use derive_more::Display;
use snafu::Snafu;

/// Wording of a `NotFound` failure, which depends on what the caller was
/// looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Missing {
    #[display("No such file or directory")]
    Entry,
    #[display("Directory not found")]
    Directory,
    #[display("File not found")]
    File,
}

/// Failure kind without the offending path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    InvalidPath,
    NotFound,
    AlreadyExists,
    NotADirectory,
    NotAFile,
}

/// Every failure leaves the namespace exactly as it was before the call.
/// `path` is the argument as the caller passed it.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum NamespaceError {
    #[snafu(display("Invalid path: {path}"))]
    InvalidPath { path: String },
    #[snafu(display("{what}: {path}"))]
    NotFound { what: Missing, path: String },
    #[snafu(display("File/Directory exists: {path}"))]
    AlreadyExists { path: String },
    #[snafu(display("Not a directory: {path}"))]
    NotADirectory { path: String },
    #[snafu(display("Not a file: {path}"))]
    NotAFile { path: String },
}

impl NamespaceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NamespaceError::InvalidPath { .. } => ErrorKind::InvalidPath,
            NamespaceError::NotFound { .. } => ErrorKind::NotFound,
            NamespaceError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            NamespaceError::NotADirectory { .. } => ErrorKind::NotADirectory,
            NamespaceError::NotAFile { .. } => ErrorKind::NotAFile,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            NamespaceError::InvalidPath { path }
            | NamespaceError::NotFound { path, .. }
            | NamespaceError::AlreadyExists { path }
            | NamespaceError::NotADirectory { path }
            | NamespaceError::NotAFile { path } => path,
        }
    }
}
