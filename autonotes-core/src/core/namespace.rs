//! Per-user storage namespaces.

use crate::{AutonotesError, Result};
use std::fmt;

/// Namespace used when the caller supplies no user.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A validated user key.
///
/// Each namespace maps to its own directory, so the key must be usable as a
/// single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Resolves a caller-supplied user. Absent or empty means [`DEFAULT_NAMESPACE`].
    ///
    /// # Errors
    ///
    /// Returns [`AutonotesError::InvalidNamespace`] if the key is `.` or `..`
    /// or contains a path separator or NUL byte.
    pub fn resolve(user: Option<&str>) -> Result<Self> {
        match user {
            None | Some("") => Ok(Self::default()),
            Some(user) => Self::new(user),
        }
    }

    /// Validates `user` as a namespace key.
    ///
    /// # Errors
    ///
    /// See [`Namespace::resolve`]; the empty string is also rejected here.
    pub fn new(user: &str) -> Result<Self> {
        let invalid = user.is_empty()
            || user == "."
            || user == ".."
            || user.contains(['/', '\\', '\0']);
        if invalid {
            return Err(AutonotesError::InvalidNamespace(user.to_string()));
        }
        Ok(Self(user.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_string())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_or_empty_user_is_default() {
        assert_eq!(Namespace::resolve(None).unwrap().as_str(), "default");
        assert_eq!(Namespace::resolve(Some("")).unwrap().as_str(), "default");
    }

    #[test]
    fn test_named_user() {
        let ns = Namespace::resolve(Some("alice")).unwrap();
        assert_eq!(ns.as_str(), "alice");
        assert_eq!(ns.to_string(), "alice");
    }

    #[test]
    fn test_rejects_path_like_keys() {
        for bad in ["..", ".", "../x", "a/b", "a\\b", "nul\0"] {
            let result = Namespace::resolve(Some(bad));
            assert!(
                matches!(result, Err(AutonotesError::InvalidNamespace(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
