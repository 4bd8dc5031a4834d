//! Error types for the Autonotes core library.

use thiserror::Error;

/// All errors that can occur within the Autonotes core library.
///
/// Unknown note or folder ids are not errors: store operations report them
/// as `Ok(false)`. What remains here is what stops an operation outright.
#[derive(Debug, Error)]
pub enum AutonotesError {
    /// An I/O operation on the namespace directory or a snapshot file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be serialized to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The user key cannot be used as a storage directory name.
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),
}

/// Convenience alias that pins the error type to [`AutonotesError`].
pub type Result<T> = std::result::Result<T, AutonotesError>;

impl AutonotesError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("Failed to save notes: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::InvalidNamespace(name) => format!("Unknown user: {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_namespace_message_names_the_key() {
        let e = AutonotesError::InvalidNamespace("../etc".to_string());
        assert!(e.to_string().contains("../etc"));
        assert!(e.user_message().contains("../etc"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: AutonotesError = io.into();
        assert!(matches!(e, AutonotesError::Io(_)));
        assert!(e.user_message().starts_with("Failed to save"));
    }
}
