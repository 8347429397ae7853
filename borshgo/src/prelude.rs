//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! ```ignore
//! use borshgo::prelude::*;
//! ```

// Schema types
pub use borshgo_schema::{
    AccountNode, DefinedTypeNode, InstructionNode, ParseError, ProgramNode, RootNode, TypeNode,
    ValueNode, parse_root, parse_root_file,
};

// Code generation
pub use borshgo_codegen::{
    CodegenError, Fragment, RenderMap, RenderOptions, WriteSummary, generate, generate_from_file,
    generate_from_json, render_to_directory, write_render_map,
};
