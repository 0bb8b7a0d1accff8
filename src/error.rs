//! Error types for scene persistence.
//!
//! Contract violations (double destroy, out of range indices) are not
//! represented here; they panic at the call site.

use std::fmt;

/// Error returned by scene load/save operations.
#[derive(Debug)]
pub enum SceneError {
    /// The scene file could not be opened, read or written.
    Io(std::io::Error),
    /// The scene text is not valid JSON or does not match the schema.
    Parse(serde_json::Error),
    /// A record parsed but carries values that cannot describe an object.
    InvalidRecord { index: usize, reason: String },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Parse(err) => write!(f, "scene parse error: {err}"),
            Self::InvalidRecord { index, reason } => {
                write!(f, "invalid object record {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::InvalidRecord { .. } => None,
        }
    }
}

/// Convenient Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;

impl From<std::io::Error> for SceneError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
