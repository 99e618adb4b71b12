//! Quadrant paths and the per-level records emitted while subdividing.

use serde::{Deserialize, Serialize};

/// Separator written after every quadrant label in a path.
pub const SEPARATOR: char = '.';

/// Identifier printed for the root node, which has an empty path.
pub const ROOT_ID: &str = "0";

/// A hierarchical quadrant address such as `"3.1."`.
///
/// Each level contributes one label in `1..=4` followed by [`SEPARATOR`]; the
/// root is the empty path. Labels are `1` north-west, `2` north-east, `3`
/// south-west and `4` south-east.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineagePath(String);

impl LineagePath {
    /// The empty path of the root node.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse a path string, accepting only `1`-`4` labels each terminated by
    /// the separator. The empty string is the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadlineage_types::lineage::LineagePath;
    ///
    /// assert!(LineagePath::parse("2.4.").is_some());
    /// assert!(LineagePath::parse("2.4").is_none());
    /// assert!(LineagePath::parse("5.").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        while let Some(label) = chars.next() {
            if !('1'..='4').contains(&label) || chars.next() != Some(SEPARATOR) {
                return None;
            }
        }
        Some(Self(s.to_string()))
    }

    /// Path of the given quadrant (1-4) below this one.
    ///
    /// # Panics
    ///
    /// Panics if `quadrant` is not in `1..=4`.
    pub fn child(&self, quadrant: u8) -> Self {
        assert!(
            (1..=4).contains(&quadrant),
            "quadrant label must be 1-4, got {}",
            quadrant
        );
        let mut path = String::with_capacity(self.0.len() + 2);
        path.push_str(&self.0);
        path.push(char::from(b'0' + quadrant));
        path.push(SEPARATOR);
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of levels in the path.
    pub fn depth(&self) -> usize {
        self.0.matches(SEPARATOR).count()
    }

    /// Quadrant labels from the top level down, without separators.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.0
            .strip_suffix(SEPARATOR)
            .into_iter()
            .flat_map(|trimmed| trimmed.split(SEPARATOR))
    }

    /// The path without its trailing separator, e.g. `"3.1"` for `"3.1."`.
    pub fn prefix(&self) -> &str {
        self.0.strip_suffix(SEPARATOR).unwrap_or(&self.0)
    }

    /// First `k` labels joined by the separator, or `None` when the path is
    /// shallower than `k` (or `k` is zero).
    ///
    /// # Examples
    ///
    /// ```
    /// use quadlineage_types::lineage::LineagePath;
    ///
    /// let path = LineagePath::parse("4.2.1.").unwrap();
    /// assert_eq!(path.truncate(2).as_deref(), Some("4.2"));
    /// assert_eq!(path.truncate(3).as_deref(), Some("4.2.1"));
    /// assert_eq!(path.truncate(4), None);
    /// ```
    pub fn truncate(&self, k: usize) -> Option<String> {
        let end = k.checked_sub(1)?;
        self.0
            .match_indices(SEPARATOR)
            .nth(end)
            .map(|(idx, _)| self.0[..idx].to_string())
    }

    /// Identifier used for quadtree nodes: the path itself, or [`ROOT_ID`].
    pub fn node_id(&self) -> &str {
        if self.is_root() { ROOT_ID } else { &self.0 }
    }
}

impl std::fmt::Display for LineagePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LineagePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One sample's membership in a quadrant produced by a single split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinRecord {
    pub sample_id: String,
    /// Depth of the split, starting at 1 for the root's quadrants
    pub depth: usize,
    pub path: LineagePath,
}

impl BinRecord {
    pub fn new(sample_id: impl Into<String>, depth: usize, path: LineagePath) -> Self {
        Self {
            sample_id: sample_id.into(),
            depth,
            path,
        }
    }
}
