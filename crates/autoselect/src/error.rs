//! Error types for autoselect.
//!
//! Selection strings never produce errors: unknown or forbidden fields are
//! dropped silently. [`SelectError`] only covers compiling a tree for the
//! wrong entity, shape-cache failures and profile loading.

use std::fmt;

/// Errors that can occur while compiling selectors or loading a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The shape cache already holds a different field list under this key.
    ShapeConflict { key: String, type_name: String },
    /// A selection tree was compiled for a different entity than it was built for.
    EntityMismatch { expected: String, found: String },
    /// The profile could not be parsed.
    Config(String),
    /// The profile file could not be read.
    Io { path: String, message: String },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeConflict { key, type_name } => write!(
                f,
                "Shape conflict: key {} already holds a different shape for {}",
                key, type_name
            ),
            Self::EntityMismatch { expected, found } => write!(
                f,
                "Entity mismatch: selector for {} cannot compile a tree built for {}",
                expected, found
            ),
            Self::Config(msg) => write!(f, "Profile configuration error: {}", msg),
            Self::Io { path, message } => {
                write!(f, "Could not read profile {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for SelectError {}

impl From<toml::de::Error> for SelectError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
