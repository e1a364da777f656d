//! Selection profile: which fields callers may select and how deep.
//!
//! Profiles are plain data and usually live in a TOML file next to the rest of
//! an API's configuration:
//!
//! ```toml
//! unselectable_fields = ["password_hash", "orders.internal_note"]
//! max_depth = 3
//! ```

use crate::error::SelectError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Profile {
    /// Dotted paths (or bare field names, during default expansion) that are
    /// never selected. Case-insensitive.
    pub unselectable_fields: Vec<String>,
    /// When set, only these paths, their descendants and their ancestors may
    /// be selected.
    pub selectable_fields: Option<Vec<String>>,
    /// Maximum number of path segments kept. `Some(1)` allows top-level
    /// fields only.
    pub max_depth: Option<usize>,
}

impl Profile {
    pub fn from_toml_str(s: &str) -> Result<Self, SelectError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SelectError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| SelectError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn unselectable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unselectable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn selectable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectable_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// True if `key` (a full dotted path or a bare field name) is listed as
    /// unselectable.
    pub fn is_unselectable(&self, key: &str) -> bool {
        self.unselectable_fields
            .iter()
            .any(|field| field.eq_ignore_ascii_case(key))
    }

    /// True if `key` passes the selectable allow-list, or there is none.
    pub fn is_selectable(&self, key: &str) -> bool {
        let Some(allowed) = &self.selectable_fields else {
            return true;
        };
        let key = key.to_ascii_lowercase();
        allowed.iter().any(|entry| {
            let entry = entry.to_ascii_lowercase();
            entry == key
                || key.starts_with(&format!("{}.", entry))
                || entry.starts_with(&format!("{}.", key))
        })
    }

    /// True if a node with `depth` path segments may exist.
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }

    /// Combined check used for every node the tree builder creates.
    pub fn accepts(&self, key: &str) -> bool {
        !self.is_unselectable(key) && self.is_selectable(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_accepts_everything() {
        let profile = Profile::default();
        assert!(profile.accepts("anything.at.all"));
        assert!(profile.allows_depth(100));
    }

    #[test]
    fn unselectable_is_case_insensitive() {
        let profile = Profile::default().unselectable(["Name", "orders.Note"]);
        assert!(profile.is_unselectable("name"));
        assert!(profile.is_unselectable("ORDERS.NOTE"));
        assert!(!profile.is_unselectable("orders"));
    }

    #[test]
    fn selectable_allows_ancestors_and_descendants() {
        let profile = Profile::default().selectable(["orders.total", "id"]);
        assert!(profile.is_selectable("orders"));
        assert!(profile.is_selectable("orders.total"));
        assert!(profile.is_selectable("ID"));
        assert!(!profile.is_selectable("orders.status"));
        assert!(!profile.is_selectable("name"));
        assert!(!profile.is_selectable("ord"));
    }

    #[test]
    fn max_depth_counts_segments() {
        let profile = Profile::default().max_depth(2);
        assert!(profile.allows_depth(1));
        assert!(profile.allows_depth(2));
        assert!(!profile.allows_depth(3));
    }

    #[test]
    fn parses_toml() {
        let profile = Profile::from_toml_str(
            r#"
            unselectable_fields = ["password_hash"]
            selectable_fields = ["id", "orders"]
            max_depth = 3
            "#,
        )
        .unwrap();
        assert_eq!(profile.unselectable_fields, vec!["password_hash"]);
        assert_eq!(
            profile.selectable_fields,
            Some(vec!["id".to_string(), "orders".to_string()])
        );
        assert_eq!(profile.max_depth, Some(3));
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(Profile::from_toml_str("").unwrap(), Profile::default());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = Profile::from_toml_str("max_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, SelectError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Profile::from_file("/nonexistent/autoselect/profile.toml").unwrap_err();
        assert!(matches!(err, SelectError::Io { .. }));
    }
}
