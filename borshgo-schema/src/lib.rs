//! # borshgo Schema
//!
//! Schema node tree for Borsh-serialized Solana programs.
//!
//! This crate provides:
//! - Type nodes describing binary layouts
//! - Value nodes describing literals and defaults
//! - Program, account, instruction, PDA and error nodes
//! - A JSON loader for Codama-style schema documents
//! - Name casing helpers

pub mod error;
pub mod naming;
pub mod parser;
pub mod program;
pub mod types;
pub mod values;

pub use error::ParseError;
pub use naming::{to_camel_case, to_pascal_case, to_snake_case};
pub use parser::{parse_root, parse_root_file};
pub use program::{
    AccountNode, ContextualValueNode, DiscriminatorNode, ErrorNode, InstructionAccountNode,
    InstructionArgumentNode, InstructionInputValueNode, InstructionNode, OptionalAccountStrategy, PdaLinkNode, PdaNode, PdaSeedNode, ProgramNode,
    RootNode, SignerFlag,
};
pub use types::{
    ArrayTypeNode, BooleanTypeNode, CountNode, DefaultValueStrategy, DefinedTypeLinkNode,
    DefinedTypeNode, Endian, EnumTypeNode, EnumVariantTypeNode, FixedSizeTypeNode, MapTypeNode,
    NumberFormat, NumberTypeNode, OptionTypeNode, ProgramLinkNode, SetTypeNode,
    SizePrefixTypeNode, StringTypeNode, StructFieldTypeNode, StructTypeNode, TupleTypeNode,
    TypeNode, WrappedTypeNode,
};
pub use values::{
    BytesEncoding, BytesValueNode, ConstantValueNode, EnumValueNode, MapEntryValueNode,
    StructFieldValueNode, ValueNode,
};
