//! Selection string parsing.
//!
//! `"id, name,orders.total"` becomes `[["id"], ["name"], ["orders", "total"]]`.
//! Whitespace around segments is trimmed and empty segments are dropped, so
//! `"a,,b"`, `"a, b"` and `"a,b"` are the same selection.

use std::fmt;

/// Segment that marks its parent path for all-field expansion.
pub const WILDCARD: &str = "*";

/// Ordered column paths of one selection string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPaths {
    paths: Vec<Vec<String>>,
}

impl FieldPaths {
    /// Parse a selection clause. `None` and blank clauses select nothing.
    pub fn parse(selection: Option<&str>) -> Self {
        let Some(selection) = selection else {
            return Self::default();
        };
        let paths = selection
            .split(',')
            .map(|item| {
                item.split('.')
                    .map(str::trim)
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|path| !path.is_empty())
            .collect();
        Self { paths }
    }

    pub fn paths(&self) -> &[Vec<String>] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.paths.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// True if some path is exactly `key` (compared case-insensitively).
    pub fn contains(&self, key: &str) -> bool {
        self.paths
            .iter()
            .any(|path| path.join(".").eq_ignore_ascii_case(key))
    }

    /// True if some path is `key.*`.
    pub fn contains_wildcard(&self, key: &str) -> bool {
        self.paths.iter().any(|path| match path.split_last() {
            Some((last, parent)) if last == WILDCARD && !parent.is_empty() => {
                parent.join(".").eq_ignore_ascii_case(key)
            }
            _ => false,
        })
    }
}

impl fmt::Display for FieldPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.paths.iter().map(|path| path.join(".")).collect();
        write!(f, "{}", joined.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Vec<Vec<String>> {
        FieldPaths::parse(Some(s)).paths().to_vec()
    }

    #[test]
    fn absent_selection_is_empty() {
        assert!(FieldPaths::parse(None).is_empty());
        assert!(FieldPaths::parse(Some("")).is_empty());
        assert!(FieldPaths::parse(Some(" , ,")).is_empty());
    }

    #[test]
    fn splits_on_commas_and_dots() {
        assert_eq!(
            parse("id,orders.items.sku"),
            vec![
                vec!["id".to_string()],
                vec!["orders".to_string(), "items".to_string(), "sku".to_string()],
            ]
        );
    }

    #[test]
    fn blank_tokens_and_whitespace_are_ignored() {
        assert_eq!(parse("a,,b"), parse("a,b"));
        assert_eq!(parse("a, b"), parse("a,b"));
        assert_eq!(parse(" orders . total "), parse("orders.total"));
        assert_eq!(parse("orders..total"), parse("orders.total"));
    }

    #[test]
    fn display_round_trips() {
        let paths = FieldPaths::parse(Some(" id , orders . total,,orders.*"));
        assert_eq!(paths.to_string(), "id,orders.total,orders.*");
        assert_eq!(FieldPaths::parse(Some(&paths.to_string())), paths);
    }

    #[test]
    fn contains_is_case_insensitive() {
        let paths = FieldPaths::parse(Some("Orders,Items.*"));
        assert!(paths.contains("orders"));
        assert!(!paths.contains("orders.total"));
        assert!(paths.contains_wildcard("items"));
        assert!(!paths.contains_wildcard("orders"));
    }

    #[test]
    fn bare_wildcard_marks_nothing() {
        let paths = FieldPaths::parse(Some("*"));
        assert_eq!(paths.len(), 1);
        assert!(!paths.contains_wildcard(""));
    }
}
