//! # borshgo Codegen
//!
//! Go code generation from Codama-style schema trees.
//!
//! This crate provides:
//! - Type manifests lowering schema types to Go type syntax
//! - Literal rendering for default values and constants
//! - Import accumulation and rendering
//! - Render map assembly for accounts, defined types, instructions and programs
//! - Output writing with optional `gofmt` formatting

pub mod context;
pub mod dependencies;
pub mod error;
pub mod generator;
pub mod go;
pub mod manifest;
pub mod options;
pub mod render_map;
pub mod writer;

pub use context::{NamingContext, ParentSize, StructMode};
pub use dependencies::DependencySet;
pub use error::{CodegenError, Result};
pub use generator::Generator;
pub use go::{TypeGenerator, ValueGenerator, ValueLiteral};
pub use manifest::TypeManifest;
pub use options::RenderOptions;
pub use render_map::{Fragment, RenderMap};
pub use writer::{WriteSummary, write_render_map};

use borshgo_schema::RootNode;
use std::path::Path;

/// Generates the Go files of a schema root.
///
/// # Errors
/// Returns `CodegenError` if generation fails.
pub fn generate(root: &RootNode, options: &RenderOptions) -> Result<RenderMap> {
    Generator::new(root, options).generate()
}

/// Generates the Go files of a JSON schema document.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_json(json: &str, options: &RenderOptions) -> Result<RenderMap> {
    let root = borshgo_schema::parse_root(json)?;
    generate(&root, options)
}

/// Generates the Go files of a JSON schema file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(path: &Path, options: &RenderOptions) -> Result<RenderMap> {
    let root = borshgo_schema::parse_root_file(path)?;
    generate(&root, options)
}

/// Generates the Go files of a schema root and writes them under `dir`.
///
/// # Errors
/// Returns `CodegenError` if generation or writing fails.
pub fn render_to_directory(
    root: &RootNode,
    dir: &Path,
    options: &RenderOptions,
) -> Result<WriteSummary> {
    let map = generate(root, options)?;
    write_render_map(&map, dir, options)
}
