//! Schema type nodes.
//!
//! This module contains the closed sum type describing every binary layout a
//! program schema can declare: scalars, collections, options, tuples, structs,
//! enums, links to named types and the two size wrappers.

use crate::naming::to_pascal_case;
use crate::values::{BytesEncoding, ValueNode};
use serde::{Deserialize, Serialize};

/// One node of the schema type tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeNode {
    /// Fixed-width integer or float.
    #[serde(rename = "numberTypeNode")]
    Number(NumberTypeNode),
    /// Boolean backed by a number.
    #[serde(rename = "booleanTypeNode")]
    Boolean(BooleanTypeNode),
    /// Text, sized by an enclosing wrapper or consuming the remainder.
    #[serde(rename = "stringTypeNode")]
    String(StringTypeNode),
    /// Raw bytes, sized by an enclosing wrapper or consuming the remainder.
    #[serde(rename = "bytesTypeNode")]
    Bytes,
    /// 32-byte public key.
    #[serde(rename = "publicKeyTypeNode")]
    PublicKey,
    /// Homogeneous list.
    #[serde(rename = "arrayTypeNode")]
    Array(ArrayTypeNode),
    /// Homogeneous set.
    #[serde(rename = "setTypeNode")]
    Set(SetTypeNode),
    /// Key/value map.
    #[serde(rename = "mapTypeNode")]
    Map(MapTypeNode),
    /// Nullable value with a presence prefix.
    #[serde(rename = "optionTypeNode")]
    Option(OptionTypeNode),
    /// Nullable value whose absence is signalled by the end of the buffer.
    #[serde(rename = "remainderOptionTypeNode")]
    RemainderOption(WrappedTypeNode),
    /// Nullable value whose absence is signalled by an all-zero encoding.
    #[serde(rename = "zeroableOptionTypeNode")]
    ZeroableOption(WrappedTypeNode),
    /// Ordered heterogeneous list.
    #[serde(rename = "tupleTypeNode")]
    Tuple(TupleTypeNode),
    /// Named, ordered fields.
    #[serde(rename = "structTypeNode")]
    Struct(StructTypeNode),
    /// Tagged union.
    #[serde(rename = "enumTypeNode")]
    Enum(EnumTypeNode),
    /// Reference to a named type defined elsewhere.
    #[serde(rename = "definedTypeLinkNode")]
    Link(DefinedTypeLinkNode),
    /// Attaches a byte count to its child.
    #[serde(rename = "fixedSizeTypeNode")]
    FixedSize(FixedSizeTypeNode),
    /// Attaches a length prefix to its child.
    #[serde(rename = "sizePrefixTypeNode")]
    SizePrefix(SizePrefixTypeNode),
}

impl TypeNode {
    /// Returns the node kind as it appears in the schema document.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "numberTypeNode",
            Self::Boolean(_) => "booleanTypeNode",
            Self::String(_) => "stringTypeNode",
            Self::Bytes => "bytesTypeNode",
            Self::PublicKey => "publicKeyTypeNode",
            Self::Array(_) => "arrayTypeNode",
            Self::Set(_) => "setTypeNode",
            Self::Map(_) => "mapTypeNode",
            Self::Option(_) => "optionTypeNode",
            Self::RemainderOption(_) => "remainderOptionTypeNode",
            Self::ZeroableOption(_) => "zeroableOptionTypeNode",
            Self::Tuple(_) => "tupleTypeNode",
            Self::Struct(_) => "structTypeNode",
            Self::Enum(_) => "enumTypeNode",
            Self::Link(_) => "definedTypeLinkNode",
            Self::FixedSize(_) => "fixedSizeTypeNode",
            Self::SizePrefix(_) => "sizePrefixTypeNode",
        }
    }

    /// Shorthand for a little-endian number node.
    #[must_use]
    pub const fn number(format: NumberFormat) -> Self {
        Self::Number(NumberTypeNode::le(format))
    }

    /// Shorthand for a link to a named type in the current program.
    #[must_use]
    pub fn link(name: impl Into<String>) -> Self {
        Self::Link(DefinedTypeLinkNode::new(name))
    }

    /// Returns the node with fixed-size and size-prefix wrappers removed.
    #[must_use]
    pub fn unwrapped(&self) -> &Self {
        match self {
            Self::FixedSize(node) => node.r#type.unwrapped(),
            Self::SizePrefix(node) => node.r#type.unwrapped(),
            other => other,
        }
    }
}

/// Number encoding formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberFormat {
    /// Unsigned 8-bit integer.
    #[serde(rename = "u8")]
    U8,
    /// Unsigned 16-bit integer.
    #[serde(rename = "u16")]
    U16,
    /// Unsigned 32-bit integer.
    #[serde(rename = "u32")]
    U32,
    /// Unsigned 64-bit integer.
    #[serde(rename = "u64")]
    U64,
    /// Unsigned 128-bit integer.
    #[serde(rename = "u128")]
    U128,
    /// Signed 8-bit integer.
    #[serde(rename = "i8")]
    I8,
    /// Signed 16-bit integer.
    #[serde(rename = "i16")]
    I16,
    /// Signed 32-bit integer.
    #[serde(rename = "i32")]
    I32,
    /// Signed 64-bit integer.
    #[serde(rename = "i64")]
    I64,
    /// Signed 128-bit integer.
    #[serde(rename = "i128")]
    I128,
    /// 32-bit floating point.
    #[serde(rename = "f32")]
    F32,
    /// 64-bit floating point.
    #[serde(rename = "f64")]
    F64,
    /// Compact 1-3 byte unsigned 16-bit integer.
    #[serde(rename = "shortU16")]
    ShortU16,
}

impl NumberFormat {
    /// Returns the encoded size in bytes, or `None` for variable-width formats.
    #[must_use]
    pub const fn size(&self) -> Option<usize> {
        match self {
            Self::U8 | Self::I8 => Some(1),
            Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 | Self::F32 => Some(4),
            Self::U64 | Self::I64 | Self::F64 => Some(8),
            Self::U128 | Self::I128 => Some(16),
            Self::ShortU16 => None,
        }
    }

    /// Returns the schema name of the format.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::ShortU16 => "shortU16",
        }
    }

    /// Returns true if this is a signed integer format.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::I128
        )
    }
}

impl std::fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte order of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Endian {
    /// Little-endian byte order.
    #[default]
    #[serde(rename = "le")]
    Little,
    /// Big-endian byte order.
    #[serde(rename = "be")]
    Big,
}

impl std::fmt::Display for Endian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Little => f.write_str("le"),
            Self::Big => f.write_str("be"),
        }
    }
}

/// Number type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberTypeNode {
    /// Encoding format.
    pub format: NumberFormat,
    /// Byte order.
    #[serde(default)]
    pub endian: Endian,
}

impl NumberTypeNode {
    /// Creates a little-endian number node.
    #[must_use]
    pub const fn le(format: NumberFormat) -> Self {
        Self {
            format,
            endian: Endian::Little,
        }
    }

    /// Creates a big-endian number node.
    #[must_use]
    pub const fn be(format: NumberFormat) -> Self {
        Self {
            format,
            endian: Endian::Big,
        }
    }
}

impl Default for NumberTypeNode {
    fn default() -> Self {
        Self::le(NumberFormat::U8)
    }
}

/// Boolean type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BooleanTypeNode {
    /// Backing number, `u8` little-endian unless stated otherwise.
    #[serde(default)]
    pub size: NumberTypeNode,
}

/// String type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringTypeNode {
    /// Character encoding of the payload.
    #[serde(default)]
    pub encoding: BytesEncoding,
}

/// Collection length discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CountNode {
    /// Exactly `value` items, no length encoded.
    #[serde(rename = "fixedCountNode")]
    Fixed {
        /// Item count.
        value: usize,
    },
    /// Item count encoded as a leading number.
    #[serde(rename = "prefixedCountNode")]
    Prefixed {
        /// Prefix number type.
        prefix: NumberTypeNode,
    },
    /// Items until the end of the buffer.
    #[serde(rename = "remainderCountNode")]
    Remainder,
}

impl CountNode {
    /// Returns the fixed count, if any.
    #[must_use]
    pub const fn fixed(&self) -> Option<usize> {
        match self {
            Self::Fixed { value } => Some(*value),
            _ => None,
        }
    }
}

impl Default for CountNode {
    fn default() -> Self {
        Self::Prefixed {
            prefix: NumberTypeNode::le(NumberFormat::U32),
        }
    }
}

/// Array type node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayTypeNode {
    /// Item type.
    pub item: Box<TypeNode>,
    /// Length discipline.
    #[serde(default)]
    pub count: CountNode,
}

/// Set type node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetTypeNode {
    /// Item type.
    pub item: Box<TypeNode>,
    /// Length discipline.
    #[serde(default)]
    pub count: CountNode,
}

/// Map type node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTypeNode {
    /// Key type.
    pub key: Box<TypeNode>,
    /// Value type.
    pub value: Box<TypeNode>,
    /// Length discipline.
    #[serde(default)]
    pub count: CountNode,
}

/// Option type node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionTypeNode {
    /// Wrapped type.
    pub item: Box<TypeNode>,
    /// Presence prefix.
    #[serde(default)]
    pub prefix: NumberTypeNode,
    /// Whether `None` still occupies the item's size.
    #[serde(default)]
    pub fixed: bool,
}

/// Node carrying a single wrapped type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedTypeNode {
    /// Wrapped type.
    pub item: Box<TypeNode>,
}

/// Tuple type node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TupleTypeNode {
    /// Item types in order.
    pub items: Vec<TypeNode>,
}

/// Struct type node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructTypeNode {
    /// Fields in declaration order.
    pub fields: Vec<StructFieldTypeNode>,
}

impl StructTypeNode {
    /// Creates a struct node from its fields.
    #[must_use]
    pub fn new(fields: Vec<StructFieldTypeNode>) -> Self {
        Self { fields }
    }

    /// Looks up a field by name, ignoring casing differences.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&StructFieldTypeNode> {
        let wanted = to_pascal_case(name);
        self.fields.iter().find(|f| to_pascal_case(&f.name) == wanted)
    }
}

/// How a default value participates in the generated API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultValueStrategy {
    /// The caller may override the default.
    Optional,
    /// The default is always applied and not exposed to the caller.
    Omitted,
}

/// Field of a struct type node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructFieldTypeNode {
    /// Field name.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub r#type: TypeNode,
    /// Default value.
    #[serde(default)]
    pub default_value: Option<ValueNode>,
    /// Default value strategy.
    #[serde(default)]
    pub default_value_strategy: Option<DefaultValueStrategy>,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl StructFieldTypeNode {
    /// Creates a field without default value.
    #[must_use]
    pub fn new(name: impl Into<String>, r#type: TypeNode) -> Self {
        Self {
            name: name.into(),
            r#type,
            default_value: None,
            default_value_strategy: None,
            docs: Vec::new(),
        }
    }

    /// Attaches a default value.
    #[must_use]
    pub fn with_default(mut self, value: ValueNode) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Enum type node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnumTypeNode {
    /// Variants in declaration order.
    pub variants: Vec<EnumVariantTypeNode>,
    /// Discriminator number type.
    #[serde(default)]
    pub size: NumberTypeNode,
}

impl EnumTypeNode {
    /// Returns true if no variant carries a payload.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.variants
            .iter()
            .all(|v| matches!(v, EnumVariantTypeNode::Empty { .. }))
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EnumVariantTypeNode {
    /// Variant without payload.
    #[serde(rename = "enumEmptyVariantTypeNode")]
    Empty {
        /// Variant name.
        name: String,
    },
    /// Variant with named fields.
    #[serde(rename = "enumStructVariantTypeNode")]
    Struct {
        /// Variant name.
        name: String,
        /// Payload fields.
        #[serde(rename = "struct")]
        r#struct: StructTypeNode,
    },
    /// Variant with positional fields.
    #[serde(rename = "enumTupleVariantTypeNode")]
    Tuple {
        /// Variant name.
        name: String,
        /// Payload items.
        tuple: TupleTypeNode,
    },
}

impl EnumVariantTypeNode {
    /// Returns the variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Empty { name } | Self::Struct { name, .. } | Self::Tuple { name, .. } => name,
        }
    }
}

/// Link to a program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramLinkNode {
    /// Program name.
    pub name: String,
}

/// Link to a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefinedTypeLinkNode {
    /// Type name.
    pub name: String,
    /// Owning program, when different from the current one.
    #[serde(default)]
    pub program: Option<ProgramLinkNode>,
}

impl DefinedTypeLinkNode {
    /// Creates a link to a type in the current program.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: None,
        }
    }
}

/// Fixed-size wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedSizeTypeNode {
    /// Size in bytes.
    pub size: usize,
    /// Wrapped type.
    #[serde(rename = "type")]
    pub r#type: Box<TypeNode>,
}

/// Size-prefix wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizePrefixTypeNode {
    /// Prefix number type.
    pub prefix: NumberTypeNode,
    /// Wrapped type.
    #[serde(rename = "type")]
    pub r#type: Box<TypeNode>,
}

/// Named type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinedTypeNode {
    /// Type name.
    pub name: String,
    /// Underlying type.
    #[serde(rename = "type")]
    pub r#type: TypeNode,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl DefinedTypeNode {
    /// Creates a named type declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, r#type: TypeNode) -> Self {
        Self {
            name: name.into(),
            r#type,
            docs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_format_size() {
        assert_eq!(NumberFormat::U8.size(), Some(1));
        assert_eq!(NumberFormat::I16.size(), Some(2));
        assert_eq!(NumberFormat::F32.size(), Some(4));
        assert_eq!(NumberFormat::U64.size(), Some(8));
        assert_eq!(NumberFormat::I128.size(), Some(16));
        assert_eq!(NumberFormat::ShortU16.size(), None);
    }

    #[test]
    fn test_deserialize_number_defaults_to_little_endian() {
        let node: TypeNode =
            serde_json::from_str(r#"{"kind":"numberTypeNode","format":"u32"}"#).expect("parse");
        assert_eq!(node, TypeNode::number(NumberFormat::U32));
    }

    #[test]
    fn test_deserialize_nested_array() {
        let json = r#"{
            "kind": "arrayTypeNode",
            "item": {"kind": "publicKeyTypeNode"},
            "count": {"kind": "fixedCountNode", "value": 3}
        }"#;
        let node: TypeNode = serde_json::from_str(json).expect("parse");
        match node {
            TypeNode::Array(array) => {
                assert_eq!(*array.item, TypeNode::PublicKey);
                assert_eq!(array.count.fixed(), Some(3));
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_enum_is_scalar() {
        let scalar = EnumTypeNode {
            variants: vec![
                EnumVariantTypeNode::Empty { name: "up".into() },
                EnumVariantTypeNode::Empty {
                    name: "down".into(),
                },
            ],
            size: NumberTypeNode::default(),
        };
        assert!(scalar.is_scalar());

        let mut data = scalar.clone();
        data.variants.push(EnumVariantTypeNode::Tuple {
            name: "jump".into(),
            tuple: TupleTypeNode {
                items: vec![TypeNode::number(NumberFormat::U8)],
            },
        });
        assert!(!data.is_scalar());
    }

    #[test]
    fn test_unwrapped_skips_size_wrappers() {
        let node = TypeNode::FixedSize(FixedSizeTypeNode {
            size: 4,
            r#type: Box::new(TypeNode::SizePrefix(SizePrefixTypeNode {
                prefix: NumberTypeNode::le(NumberFormat::U8),
                r#type: Box::new(TypeNode::Bytes),
            })),
        });
        assert_eq!(node.unwrapped(), &TypeNode::Bytes);
        assert_eq!(node.kind(), "fixedSizeTypeNode");
    }

    #[test]
    fn test_struct_field_lookup_ignores_casing() {
        let node = StructTypeNode::new(vec![StructFieldTypeNode::new(
            "maxValue",
            TypeNode::number(NumberFormat::U8),
        )]);
        assert!(node.field("max_value").is_some());
        assert!(node.field("MaxValue").is_some());
        assert!(node.field("min").is_none());
    }
}
