//! Import accumulation and rendering.
//!
//! Generators record every module their output refers to in a
//! [`DependencySet`]. Identifiers are opaque strings: either a Go import path
//! (`github.com/gagliardetto/binary`) or an internal reference
//! `namespace::Symbol` that [`DependencySet::resolve`] rewrites through the
//! dependency map before the import block is rendered.

use std::collections::{BTreeMap, BTreeSet};

/// Borsh codec.
pub const BINARY: &str = "github.com/gagliardetto/binary";
/// Solana client types.
pub const SOLANA: &str = "github.com/gagliardetto/solana-go";
/// Pointer helpers.
pub const LO: &str = "github.com/samber/lo";
/// Standard library byte order helpers.
pub const ENCODING_BINARY: &str = "encoding/binary";
/// Standard library byte slice helpers.
pub const BYTES: &str = "bytes";
/// Standard library formatting.
pub const FMT: &str = "fmt";
/// Standard library float bit casts.
pub const MATH: &str = "math";

/// Separator between an internal namespace and its symbol.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Returns the conventional alias of a well-known import path.
#[must_use]
pub fn well_known_alias(path: &str) -> Option<&'static str> {
    match path {
        BINARY => Some("ag_binary"),
        SOLANA => Some("ag_solanago"),
        "github.com/gagliardetto/solana-go/text/format" => Some("ag_format"),
        "github.com/gagliardetto/treeout" => Some("ag_treeout"),
        _ => None,
    }
}

/// Accumulated module references of a generated fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    identifiers: BTreeSet<String>,
    aliases: BTreeMap<String, String>,
}

impl DependencySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding the given identifiers.
    #[must_use]
    pub fn of<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            aliases: BTreeMap::new(),
        }
    }

    /// Adds an identifier.
    pub fn add(&mut self, identifier: impl Into<String>) -> &mut Self {
        self.identifiers.insert(identifier.into());
        self
    }

    /// Removes an identifier and its alias.
    pub fn remove(&mut self, identifier: &str) -> &mut Self {
        self.identifiers.remove(identifier);
        self.aliases.remove(identifier);
        self
    }

    /// Sets the alias of an identifier, replacing any previous alias.
    pub fn add_alias(&mut self, identifier: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.aliases.insert(identifier.into(), alias.into());
        self
    }

    /// Merges another set into this one.
    ///
    /// Identifiers are unioned. When both sets alias the same identifier,
    /// the alias already present in `self` is kept.
    pub fn merge(&mut self, other: &DependencySet) -> &mut Self {
        self.identifiers
            .extend(other.identifiers.iter().cloned());
        for (identifier, alias) in &other.aliases {
            self.aliases
                .entry(identifier.clone())
                .or_insert_with(|| alias.clone());
        }
        self
    }

    /// Merges several sets into this one, in order.
    pub fn merge_all<'a>(&mut self, others: impl IntoIterator<Item = &'a DependencySet>) -> &mut Self {
        for other in others {
            self.merge(other);
        }
        self
    }

    /// Returns true if the set holds the identifier.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    /// Returns the declared alias of an identifier.
    #[must_use]
    pub fn alias(&self, identifier: &str) -> Option<&str> {
        self.aliases.get(identifier).map(String::as_str)
    }

    /// Iterates over identifiers in lexicographic order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }

    /// Returns the number of identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Returns true if the set holds no identifier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Rewrites internal identifiers through the dependency map.
    ///
    /// `namespace::Symbol` becomes the mapped import path, or disappears when
    /// the namespace maps to an empty path. Aliases follow their identifier.
    /// Identifiers without a mapped namespace are kept unchanged, which makes
    /// resolution idempotent.
    #[must_use]
    pub fn resolve(&self, dependency_map: &BTreeMap<String, String>) -> DependencySet {
        let mut resolved = DependencySet::new();
        for identifier in &self.identifiers {
            let target = match identifier.split_once(NAMESPACE_SEPARATOR) {
                Some((namespace, _)) => match dependency_map.get(namespace) {
                    Some(path) if path.is_empty() => None,
                    Some(path) => Some(path.clone()),
                    None => Some(identifier.clone()),
                },
                None => Some(identifier.clone()),
            };

            if let Some(target) = target {
                if let Some(alias) = self.aliases.get(identifier) {
                    resolved
                        .aliases
                        .entry(target.clone())
                        .or_insert_with(|| alias.clone());
                }
                resolved.identifiers.insert(target);
            }
        }
        resolved
    }

    /// Resolves the set and renders it as a Go import block.
    ///
    /// Standard library paths come first, then third-party paths, each group
    /// sorted. Declared aliases win over well-known aliases. Internal
    /// identifiers left unresolved are dropped with a warning. An empty set
    /// renders to an empty string.
    #[must_use]
    pub fn render(&self, dependency_map: &BTreeMap<String, String>) -> String {
        let resolved = self.resolve(dependency_map);
        let mut standard = Vec::new();
        let mut third_party = Vec::new();

        for identifier in resolved.identifiers() {
            if identifier.contains(NAMESPACE_SEPARATOR) {
                tracing::warn!(identifier, "dropping unresolved internal dependency");
                continue;
            }

            let alias = resolved
                .alias(identifier)
                .or_else(|| well_known_alias(identifier));
            let line = match alias {
                Some(alias) => format!("\t{alias} \"{identifier}\""),
                None => format!("\t\"{identifier}\""),
            };

            if is_standard_library(identifier) {
                standard.push(line);
            } else {
                third_party.push(line);
            }
        }

        if standard.is_empty() && third_party.is_empty() {
            return String::new();
        }

        let mut output = String::from("import (\n");
        output.push_str(&standard.join("\n"));
        if !standard.is_empty() && !third_party.is_empty() {
            output.push_str("\n\n");
        }
        output.push_str(&third_party.join("\n"));
        output.push_str("\n)\n");
        output
    }
}

/// Returns true if the first path segment has no domain-style dot.
#[must_use]
pub fn is_standard_library(path: &str) -> bool {
    path.split('/').next().is_none_or(|first| !first.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_add_remove_contains() {
        let mut deps = DependencySet::new();
        assert!(deps.is_empty());
        deps.add(BINARY).add(FMT);
        assert!(deps.contains(BINARY));
        assert_eq!(deps.len(), 2);
        deps.remove(FMT);
        assert!(!deps.contains(FMT));
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_merge_is_commutative_on_identifiers() {
        let a = DependencySet::of([BINARY, FMT]);
        let b = DependencySet::of([SOLANA, FMT]);

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        assert_eq!(
            ab.identifiers().collect::<Vec<_>>(),
            ba.identifiers().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_merge_keeps_first_alias() {
        let mut a = DependencySet::of(["github.com/acme/types"]);
        a.add_alias("github.com/acme/types", "first");
        let mut b = DependencySet::of(["github.com/acme/types"]);
        b.add_alias("github.com/acme/types", "second");

        a.merge(&b);
        assert_eq!(a.alias("github.com/acme/types"), Some("first"));

        a.add_alias("github.com/acme/types", "third");
        assert_eq!(a.alias("github.com/acme/types"), Some("third"));
    }

    #[test]
    fn test_resolve_rewrites_and_drops() {
        let mut deps = DependencySet::of(["generated::Point", "hooked::Fee", "other::Thing", FMT]);
        deps.add_alias("hooked::Fee", "hooked");
        let dependency_map = map(&[("generated", ""), ("hooked", "github.com/acme/hooked")]);

        let resolved = deps.resolve(&dependency_map);
        let ids: Vec<_> = resolved.identifiers().collect();
        assert_eq!(ids, vec!["fmt", "github.com/acme/hooked", "other::Thing"]);
        assert_eq!(resolved.alias("github.com/acme/hooked"), Some("hooked"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let deps = DependencySet::of(["generated::Point", "hooked::Fee", BINARY]);
        let dependency_map = map(&[("generated", ""), ("hooked", "github.com/acme/hooked")]);

        let once = deps.resolve(&dependency_map);
        let twice = once.resolve(&dependency_map);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_render_groups_and_sorts() {
        let deps = DependencySet::of([SOLANA, FMT, BINARY, ENCODING_BINARY]);
        let rendered = deps.render(&BTreeMap::new());
        assert_eq!(
            rendered,
            "import (\n\
             \t\"encoding/binary\"\n\
             \t\"fmt\"\n\
             \n\
             \tag_binary \"github.com/gagliardetto/binary\"\n\
             \tag_solanago \"github.com/gagliardetto/solana-go\"\n\
             )\n"
        );
    }

    #[test]
    fn test_render_declared_alias_wins() {
        let mut deps = DependencySet::of([BINARY]);
        deps.add_alias(BINARY, "bin");
        let rendered = deps.render(&BTreeMap::new());
        assert!(rendered.contains("\tbin \"github.com/gagliardetto/binary\""));
        assert!(!rendered.contains("ag_binary"));
    }

    #[test]
    fn test_render_empty_after_resolution() {
        let deps = DependencySet::of(["generated::Point"]);
        assert_eq!(deps.render(&map(&[("generated", "")])), "");
        assert_eq!(DependencySet::new().render(&BTreeMap::new()), "");
    }

    #[test]
    fn test_render_drops_unresolved_internal() {
        let deps = DependencySet::of(["unknown::Thing", FMT]);
        assert_eq!(deps.render(&BTreeMap::new()), "import (\n\t\"fmt\"\n)\n");
    }

    #[test]
    fn test_is_standard_library() {
        assert!(is_standard_library("fmt"));
        assert!(is_standard_library("encoding/binary"));
        assert!(!is_standard_library("github.com/samber/lo"));
    }
}
