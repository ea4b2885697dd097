// Centralized error handling for the user registry

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing the user data file
///
/// None of these reach the user directly: reads degrade to an empty
/// database and writes are reported as a failed operation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User data file '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot verify integrity of '{}', check that the file is readable", .0.display())]
    Unverifiable(PathBuf),

    #[error("Permission denied for '{}': {source}", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in '{}': {source}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Data in '{}' is not a JSON object, found {found}", path.display())]
    NotAnObject { path: PathBuf, found: &'static str },
}

impl StoreError {
    /// Classify an I/O error the way the store reports it
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            StoreError::Permission { path, source }
        } else {
            StoreError::Io { path, source }
        }
    }
}

/// Errors that end an interactive session
#[derive(Error, Debug)]
pub enum SessionError {
    /// The terminal reached end of input (Ctrl+D) while waiting for a reply
    #[error("Interrupted by user")]
    Interrupted,

    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("Stored record for user '{username}' is malformed: {source}")]
    CorruptRecord {
        username: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SessionError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, SessionError::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_permission() {
        let err = StoreError::from_io(
            PathBuf::from("data.json"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, StoreError::Permission { .. }));
    }

    #[test]
    fn test_from_io_other() {
        let err = StoreError::from_io(
            PathBuf::from("data.json"),
            io::Error::from(io::ErrorKind::UnexpectedEof),
        );
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().starts_with("I/O error on 'data.json'"));
    }

    #[test]
    fn test_not_an_object_message() {
        let err = StoreError::NotAnObject {
            path: PathBuf::from("data.json"),
            found: "array",
        };
        assert_eq!(
            err.to_string(),
            "Data in 'data.json' is not a JSON object, found array"
        );
    }

    #[test]
    fn test_session_error_interrupted() {
        assert!(SessionError::Interrupted.is_interrupted());
        assert!(!SessionError::Terminal(io::Error::from(io::ErrorKind::BrokenPipe)).is_interrupted());
    }
}
