//! # borshgo
//!
//! Go code generation for Borsh-serialized Solana programs.
//!
//! borshgo reads a Codama-style schema tree and emits Go sources built on
//! `github.com/gagliardetto/binary` and `github.com/gagliardetto/solana-go`:
//! account and defined types, discriminators, PDA finders, instruction
//! builders and program errors.
//!
//! ## Quick Start
//!
//! ```ignore
//! use borshgo::prelude::*;
//!
//! let options = RenderOptions::default().with_package_name("pump");
//! let files = generate_from_json(&schema_json, &options)?;
//! for (path, fragment) in files.files() {
//!     println!("{path}: {} bytes", fragment.content.len());
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Schema node tree and JSON loader
//! - [`codegen`] - Go code generation and output writing

pub mod prelude;

/// Schema node tree and JSON loader.
pub mod schema {
    pub use borshgo_schema::*;
}

/// Go code generation from schema trees.
pub mod codegen {
    pub use borshgo_codegen::*;
}

pub use borshgo_codegen::{
    generate, generate_from_file, generate_from_json, render_to_directory,
};
