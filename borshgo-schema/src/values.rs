//! Schema value nodes.
//!
//! Literal values mirror the type tree: they describe default values of
//! fields and arguments, constant discriminators and PDA seeds.

use crate::error::ParseError;
use crate::types::{DefinedTypeLinkNode, TypeNode};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Encoding of textual byte payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BytesEncoding {
    /// Hexadecimal.
    Base16,
    /// Bitcoin-alphabet base58.
    Base58,
    /// Standard base64 with padding.
    Base64,
    /// Raw UTF-8 text.
    #[default]
    Utf8,
}

impl BytesEncoding {
    /// Returns the schema name of the encoding.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Base16 => "base16",
            Self::Base58 => "base58",
            Self::Base64 => "base64",
            Self::Utf8 => "utf8",
        }
    }

    /// Decodes `data` into raw bytes.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidBytes` if `data` is not valid in this encoding.
    pub fn decode(&self, data: &str) -> Result<Vec<u8>, ParseError> {
        match self {
            Self::Base16 => {
                hex::decode(data).map_err(|e| ParseError::invalid_bytes(self.name(), e))
            }
            Self::Base58 => bs58::decode(data)
                .into_vec()
                .map_err(|e| ParseError::invalid_bytes(self.name(), e)),
            Self::Base64 => base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| ParseError::invalid_bytes(self.name(), e)),
            Self::Utf8 => Ok(data.as_bytes().to_vec()),
        }
    }
}

/// One node of the schema value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueNode {
    /// Boolean literal.
    #[serde(rename = "booleanValueNode")]
    Boolean {
        /// Value.
        boolean: bool,
    },
    /// Number literal.
    #[serde(rename = "numberValueNode")]
    Number {
        /// Value.
        number: serde_json::Number,
    },
    /// String literal.
    #[serde(rename = "stringValueNode")]
    String {
        /// Value.
        string: String,
    },
    /// Byte sequence literal.
    #[serde(rename = "bytesValueNode")]
    Bytes(BytesValueNode),
    /// Absent option.
    #[serde(rename = "noneValueNode")]
    None,
    /// Present option.
    #[serde(rename = "someValueNode")]
    Some {
        /// Wrapped value.
        value: Box<ValueNode>,
    },
    /// Array literal.
    #[serde(rename = "arrayValueNode")]
    Array {
        /// Items in order.
        items: Vec<ValueNode>,
    },
    /// Set literal.
    #[serde(rename = "setValueNode")]
    Set {
        /// Items in order.
        items: Vec<ValueNode>,
    },
    /// Map literal.
    #[serde(rename = "mapValueNode")]
    Map {
        /// Entries in order.
        entries: Vec<MapEntryValueNode>,
    },
    /// Tuple literal.
    #[serde(rename = "tupleValueNode")]
    Tuple {
        /// Items in order.
        items: Vec<ValueNode>,
    },
    /// Struct literal.
    #[serde(rename = "structValueNode")]
    Struct {
        /// Field values in declaration order.
        fields: Vec<StructFieldValueNode>,
    },
    /// Enum variant literal.
    #[serde(rename = "enumValueNode")]
    Enum(EnumValueNode),
    /// Public key literal in base58.
    #[serde(rename = "publicKeyValueNode")]
    PublicKey {
        /// Base58 address.
        #[serde(rename = "publicKey")]
        public_key: String,
        /// Optional well-known identifier.
        #[serde(default)]
        identifier: Option<String>,
    },
    /// Literal folded into bytes according to `type`.
    #[serde(rename = "constantValueNode")]
    Constant(ConstantValueNode),
    /// Address of the enclosing program.
    #[serde(rename = "programIdValueNode")]
    ProgramId,
}

impl ValueNode {
    /// Shorthand for a number literal.
    #[must_use]
    pub fn number(value: impl Into<serde_json::Number>) -> Self {
        Self::Number {
            number: value.into(),
        }
    }

    /// Shorthand for a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String {
            string: value.into(),
        }
    }

    /// Shorthand for a base16 bytes literal.
    #[must_use]
    pub fn hex_bytes(data: impl Into<String>) -> Self {
        Self::Bytes(BytesValueNode {
            encoding: BytesEncoding::Base16,
            data: data.into(),
        })
    }

    /// Returns the node kind as it appears in the schema document.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "booleanValueNode",
            Self::Number { .. } => "numberValueNode",
            Self::String { .. } => "stringValueNode",
            Self::Bytes(_) => "bytesValueNode",
            Self::None => "noneValueNode",
            Self::Some { .. } => "someValueNode",
            Self::Array { .. } => "arrayValueNode",
            Self::Set { .. } => "setValueNode",
            Self::Map { .. } => "mapValueNode",
            Self::Tuple { .. } => "tupleValueNode",
            Self::Struct { .. } => "structValueNode",
            Self::Enum(_) => "enumValueNode",
            Self::PublicKey { .. } => "publicKeyValueNode",
            Self::Constant(_) => "constantValueNode",
            Self::ProgramId => "programIdValueNode",
        }
    }
}

/// Byte sequence literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytesValueNode {
    /// Encoding of `data`.
    pub encoding: BytesEncoding,
    /// Encoded payload.
    pub data: String,
}

impl BytesValueNode {
    /// Decodes the payload into raw bytes.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidBytes` if the payload does not match its encoding.
    pub fn decode(&self) -> Result<Vec<u8>, ParseError> {
        self.encoding.decode(&self.data)
    }
}

/// Entry of a map literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntryValueNode {
    /// Entry key.
    pub key: ValueNode,
    /// Entry value.
    pub value: ValueNode,
}

/// Field of a struct literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructFieldValueNode {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: ValueNode,
}

/// Enum variant literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueNode {
    /// Enum the variant belongs to.
    #[serde(rename = "enum")]
    pub r#enum: DefinedTypeLinkNode,
    /// Variant name.
    pub variant: String,
    /// Payload, a struct or tuple literal.
    #[serde(default)]
    pub value: Option<Box<ValueNode>>,
}

/// Literal paired with the type it must be folded into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantValueNode {
    /// Target type.
    #[serde(rename = "type")]
    pub r#type: Box<TypeNode>,
    /// Literal.
    pub value: Box<ValueNode>,
}
