//! Generation options.

use crate::error::CodegenError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Namespace used for declarations living in the generated package itself.
pub const GENERATED_NAMESPACE: &str = "generated";

/// Options recognised by the generator and the output writer.
///
/// Deserializes from camelCase JSON; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Go package name of every generated file.
    pub package_name: String,
    /// Internal namespace → import path; an empty path means "same package".
    pub dependency_map: BTreeMap<String, String>,
    /// Defined type name → module providing it instead of the generated package.
    pub link_overrides: BTreeMap<String, String>,
    /// Also render instructions that group sub-instructions.
    pub render_parent_instructions: bool,
    /// Delete the output directory before writing.
    pub delete_folder_before_rendering: bool,
    /// Run `gofmt` on the output directory after writing.
    pub format_code: bool,
    /// Output paths whose existing files are never replaced. Only useful
    /// with `delete_folder_before_rendering` turned off.
    pub preserved_files: BTreeSet<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            package_name: GENERATED_NAMESPACE.to_string(),
            dependency_map: BTreeMap::from([(GENERATED_NAMESPACE.to_string(), String::new())]),
            link_overrides: BTreeMap::new(),
            render_parent_instructions: false,
            delete_folder_before_rendering: true,
            format_code: true,
            preserved_files: BTreeSet::new(),
        }
    }
}

impl RenderOptions {
    /// Parses options from a JSON document, filling missing keys with defaults.
    ///
    /// # Errors
    /// Returns `CodegenError::Options` if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, CodegenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the Go package name.
    #[must_use]
    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    /// Maps an internal namespace to an import path.
    #[must_use]
    pub fn with_dependency(mut self, namespace: impl Into<String>, path: impl Into<String>) -> Self {
        self.dependency_map.insert(namespace.into(), path.into());
        self
    }

    /// Makes a defined type resolve from another module.
    #[must_use]
    pub fn with_link_override(mut self, name: impl Into<String>, module: impl Into<String>) -> Self {
        self.link_overrides.insert(name.into(), module.into());
        self
    }

    /// Keeps an existing file at `path` instead of regenerating it.
    #[must_use]
    pub fn with_preserved_file(mut self, path: impl Into<String>) -> Self {
        self.preserved_files.insert(path.into());
        self
    }
}
