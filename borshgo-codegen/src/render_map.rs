//! Relative output path to generated content.

use crate::error::{CodegenError, Result};
use std::collections::BTreeMap;

/// Content of one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// File text.
    pub content: String,
    /// Replace an existing file on disk.
    pub overwrite: bool,
}

impl Fragment {
    /// Creates an overwriting fragment.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            overwrite: true,
        }
    }
}

/// Mapping from relative output path to fragment.
///
/// A path mapped to `None` is explicitly absent: it produces no file and
/// yields to a present entry on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderMap {
    entries: BTreeMap<String, Option<Fragment>>,
}

impl RenderMap {
    /// Creates an empty render map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `path` to an overwriting fragment with the given content.
    pub fn add(&mut self, path: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.entries
            .insert(path.into(), Some(Fragment::new(content)));
        self
    }

    /// Flags the fragment at `path` so that an existing file is never replaced.
    ///
    /// Returns false if no fragment is present at `path`.
    pub fn keep_existing(&mut self, path: &str) -> bool {
        match self.entries.get_mut(path) {
            Some(Some(fragment)) => {
                fragment.overwrite = false;
                true
            }
            _ => false,
        }
    }

    /// Marks `path` as explicitly absent.
    pub fn add_absent(&mut self, path: impl Into<String>) -> &mut Self {
        self.entries.insert(path.into(), None);
        self
    }

    /// Returns the fragment at `path`, if present.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Fragment> {
        self.entries.get(path).and_then(Option::as_ref)
    }

    /// Returns true if `path` is mapped, present or absent.
    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Merges `other` into this map.
    ///
    /// # Errors
    /// Returns `CodegenError::PathCollision` if both maps hold a present
    /// fragment for the same path. The map is left unchanged in that case.
    pub fn merge(&mut self, other: RenderMap) -> Result<&mut Self> {
        if let Some(path) = other
            .entries
            .iter()
            .find(|(path, entry)| entry.is_some() && self.get(path).is_some())
            .map(|(path, _)| path.clone())
        {
            return Err(CodegenError::PathCollision { path });
        }

        for (path, entry) in other.entries {
            let keep_existing = match self.entries.get(&path) {
                Some(Some(_)) => true,
                Some(None) => entry.is_none(),
                None => false,
            };
            if !keep_existing {
                self.entries.insert(path, entry);
            }
        }
        Ok(self)
    }

    /// Iterates over present fragments in path order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &Fragment)> {
        self.entries
            .iter()
            .filter_map(|(path, entry)| entry.as_ref().map(|fragment| (path.as_str(), fragment)))
    }

    /// Returns the number of present fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files().count()
    }

    /// Returns true if no fragment is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_disjoint_is_union() {
        let mut left = RenderMap::new();
        left.add("a.go", "package a");
        let mut right = RenderMap::new();
        right.add("b.go", "package b");

        left.merge(right).expect("merge");
        assert_eq!(left.len(), 2);
        assert_eq!(left.get("a.go").map(|f| f.content.as_str()), Some("package a"));
        assert_eq!(left.get("b.go").map(|f| f.content.as_str()), Some("package b"));
    }

    #[test]
    fn test_merge_absent_yields_to_present() {
        let mut present = RenderMap::new();
        present.add("errors.go", "errors");
        let mut absent = RenderMap::new();
        absent.add_absent("errors.go");

        let mut left = present.clone();
        left.merge(absent.clone()).expect("present then absent");
        assert_eq!(left.get("errors.go"), present.get("errors.go"));

        let mut right = absent;
        right.merge(present.clone()).expect("absent then present");
        assert_eq!(right.get("errors.go"), present.get("errors.go"));
    }

    #[test]
    fn test_merge_collision_fails() {
        let mut left = RenderMap::new();
        left.add("a.go", "one").add("b.go", "kept");
        let mut right = RenderMap::new();
        right.add("a.go", "two").add("c.go", "not merged");

        let err = left.merge(right).unwrap_err();
        assert!(matches!(err, CodegenError::PathCollision { ref path } if path == "a.go"));
        assert!(!left.contains_path("c.go"));
    }

    #[test]
    fn test_absent_entries_are_not_files() {
        let mut map = RenderMap::new();
        map.add_absent("errors.go").add("hooks.go", "custom");
        assert!(map.keep_existing("hooks.go"));
        assert!(!map.keep_existing("errors.go"));
        assert!(!map.keep_existing("missing.go"));
        assert!(map.contains_path("errors.go"));
        assert!(map.get("errors.go").is_none());
        let files: Vec<_> = map.files().map(|(path, _)| path).collect();
        assert_eq!(files, vec!["hooks.go"]);
        assert!(!map.get("hooks.go").is_some_and(|f| f.overwrite));
    }
}
