//! Defines the file store error taxonomy --- [`Error`].

use std::fmt;
use std::path::{Path, PathBuf};

/// Result of file store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the file store core.
///
/// Each variant carries the structured fields a caller needs to build a
/// host-level diagnostic (a path, a reason string, or both).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The path does not exist, an intermediate component does not exist,
    /// or a symbolic link's target does not exist.
    NoSuchFile(PathBuf),
    /// `create_new`, a non-replace copy/move, or a symbolic-link creation
    /// targeted an already-occupied name.
    FileAlreadyExists(PathBuf),
    /// Directory enumeration (or traversal through) a non-directory.
    NotDirectory(PathBuf),
    /// Reading a symbolic link on a node that is not a link.
    NotLink(PathBuf),
    /// Deleting a non-empty directory, or moving a directory onto an
    /// existing non-empty directory, or moving the root.
    DirectoryNotEmpty(PathBuf),
    /// A read-only node or parent blocked a mutation.
    AccessDenied(PathBuf),
    /// Opening a directory as a byte stream/channel, or hard-linking a
    /// directory.
    IsDirectory(PathBuf),
    /// Generic file-system condition, carrying a human-readable reason.
    /// Used specifically for "maximum link depth exceeded".
    FileSystemError { path: PathBuf, reason: String },
    /// An unknown open option, copy option, or attribute view was named.
    UnsupportedOperation(String),
    /// An unknown attribute name within a known view, or an invalid URI
    /// scheme, was supplied.
    IllegalArgument(String),
    /// A directory-stream lifecycle rule was violated (`iterator()`
    /// called twice, or after `close()`).
    IllegalState(String),
    /// The channel or stream has already been closed.
    ClosedChannel,
    /// The channel is not open for reading.
    NonReadableChannel,
    /// The channel is not open for writing.
    NonWritableChannel,
    /// A requested byte-range lock overlaps an already-valid lock.
    OverlappingFileLock,
    /// A directory-stream filter raised an error during look-ahead.
    DirectoryIterationError(Box<Error>),
    /// An attribute value of the wrong type was supplied to a setter.
    ClassCastError,
}

impl Error {
    pub fn no_such_file(path: impl AsRef<Path>) -> Self {
        Error::NoSuchFile(path.as_ref().to_path_buf())
    }

    pub fn already_exists(path: impl AsRef<Path>) -> Self {
        Error::FileAlreadyExists(path.as_ref().to_path_buf())
    }

    pub fn not_directory(path: impl AsRef<Path>) -> Self {
        Error::NotDirectory(path.as_ref().to_path_buf())
    }

    pub fn not_link(path: impl AsRef<Path>) -> Self {
        Error::NotLink(path.as_ref().to_path_buf())
    }

    pub fn directory_not_empty(path: impl AsRef<Path>) -> Self {
        Error::DirectoryNotEmpty(path.as_ref().to_path_buf())
    }

    pub fn access_denied(path: impl AsRef<Path>) -> Self {
        Error::AccessDenied(path.as_ref().to_path_buf())
    }

    pub fn is_directory(path: impl AsRef<Path>) -> Self {
        Error::IsDirectory(path.as_ref().to_path_buf())
    }

    pub fn link_depth_exceeded(path: impl AsRef<Path>) -> Self {
        Error::FileSystemError {
            path: path.as_ref().to_path_buf(),
            reason: "maximum link depth exceeded".to_owned(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSuchFile(path) => write!(f, "no such file: {}", path.display()),
            Error::FileAlreadyExists(path) => write!(f, "already exists: {}", path.display()),
            Error::NotDirectory(path) => write!(f, "not a directory: {}", path.display()),
            Error::NotLink(path) => write!(f, "not a symbolic link: {}", path.display()),
            Error::DirectoryNotEmpty(path) => write!(f, "directory not empty: {}", path.display()),
            Error::AccessDenied(path) => write!(f, "access denied: {}", path.display()),
            Error::IsDirectory(path) => write!(f, "is a directory: {}", path.display()),
            Error::FileSystemError { path, reason } => {
                write!(f, "file system error on {}: {}", path.display(), reason)
            }
            Error::UnsupportedOperation(detail) => write!(f, "unsupported operation: {detail}"),
            Error::IllegalArgument(detail) => write!(f, "illegal argument: {detail}"),
            Error::IllegalState(detail) => write!(f, "illegal state: {detail}"),
            Error::ClosedChannel => write!(f, "channel is closed"),
            Error::NonReadableChannel => write!(f, "channel is not readable"),
            Error::NonWritableChannel => write!(f, "channel is not writable"),
            Error::OverlappingFileLock => write!(f, "overlapping file lock"),
            Error::DirectoryIterationError(cause) => {
                write!(f, "directory iteration error: {cause}")
            }
            Error::ClassCastError => write!(f, "attribute value has the wrong type"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DirectoryIterationError(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}
