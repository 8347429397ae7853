//! Literal value rendering.

use crate::dependencies::{BINARY, DependencySet, ENCODING_BINARY, LO, MATH, SOLANA};
use crate::error::{CodegenError, Result};
use crate::go::{LinkResolver, byte_list, enum_payload_name, enum_variant_ident, quote};
use borshgo_schema::{
    BytesEncoding, ConstantValueNode, Endian, EnumValueNode, NumberFormat, NumberTypeNode,
    TypeNode, ValueNode, to_pascal_case,
};

/// A Go expression together with the modules it references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueLiteral {
    /// Go expression.
    pub expression: String,
    /// Referenced modules.
    pub dependencies: DependencySet,
}

impl ValueLiteral {
    /// Creates a literal without dependencies.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            dependencies: DependencySet::new(),
        }
    }

    /// Adds a dependency.
    #[must_use]
    pub fn with_dependency(mut self, identifier: &str) -> Self {
        self.dependencies.add(identifier);
        self
    }

    pub(crate) fn map(self, f: impl FnOnce(String) -> String) -> Self {
        Self {
            expression: f(self.expression),
            dependencies: self.dependencies,
        }
    }
}

/// Generator for literal expressions.
///
/// Without a type, aggregates render as untyped composite bodies (`{...}`).
/// Callers that know the declared schema type go through
/// [`TypeGenerator::render_value`](crate::go::TypeGenerator::render_value),
/// which types every nested level.
#[derive(Debug, Clone)]
pub struct ValueGenerator<'a> {
    links: LinkResolver<'a>,
    program_id: Option<String>,
}

impl<'a> ValueGenerator<'a> {
    /// Creates a value generator.
    #[must_use]
    pub fn new(links: LinkResolver<'a>) -> Self {
        Self {
            links,
            program_id: None,
        }
    }

    /// Sets the identifier a program id value renders to.
    #[must_use]
    pub fn with_program_id(mut self, identifier: impl Into<String>) -> Self {
        self.program_id = Some(identifier.into());
        self
    }

    /// Renders a value node.
    ///
    /// # Errors
    /// Returns an error for constants that cannot be folded, undecodable
    /// bytes, or a program id outside of a program.
    pub fn render(&self, node: &ValueNode) -> Result<ValueLiteral> {
        match node {
            ValueNode::Boolean { boolean } => Ok(ValueLiteral::new(boolean.to_string())),
            ValueNode::Number { number } => Ok(ValueLiteral::new(number.to_string())),
            ValueNode::String { string } => Ok(ValueLiteral::new(quote(string))),
            ValueNode::Bytes(bytes) => {
                let data = bytes.decode()?;
                Ok(ValueLiteral::new(format!(
                    "[{}]byte{{{}}}",
                    data.len(),
                    byte_list(&data)
                )))
            }
            ValueNode::None => Ok(ValueLiteral::new("nil")),
            ValueNode::Some { value } => Ok(self
                .render(value)?
                .map(|inner| format!("lo.ToPtr({inner})"))
                .with_dependency(LO)),
            ValueNode::Array { items } => self.composite(items.iter(), |lit| lit),
            ValueNode::Set { items } => self.composite(items.iter(), |lit| format!("{lit}: {{}}")),
            ValueNode::Map { entries } => {
                let mut dependencies = DependencySet::new();
                let mut parts = Vec::with_capacity(entries.len());
                for entry in entries {
                    let key = self.render(&entry.key)?;
                    let value = self.render(&entry.value)?;
                    dependencies.merge(&key.dependencies);
                    dependencies.merge(&value.dependencies);
                    parts.push(format!("{}: {}", key.expression, value.expression));
                }
                Ok(ValueLiteral {
                    expression: format!("{{{}}}", parts.join(", ")),
                    dependencies,
                })
            }
            ValueNode::Tuple { items } => match items.as_slice() {
                [single] => self.render(single),
                _ => self.composite(items.iter(), |lit| lit),
            },
            ValueNode::Struct { fields } => {
                let mut dependencies = DependencySet::new();
                let mut parts = Vec::with_capacity(fields.len());
                for field in fields {
                    let value = self.render(&field.value)?;
                    dependencies.merge(&value.dependencies);
                    parts.push(format!(
                        "{}: {}",
                        to_pascal_case(&field.name),
                        value.expression
                    ));
                }
                Ok(ValueLiteral {
                    expression: format!("{{{}}}", parts.join(", ")),
                    dependencies,
                })
            }
            ValueNode::Enum(node) => self.render_enum(node),
            ValueNode::PublicKey { public_key, .. } => Ok(ValueLiteral::new(format!(
                "ag_solanago.MustPublicKeyFromBase58({})",
                quote(public_key)
            ))
            .with_dependency(SOLANA)),
            ValueNode::Constant(constant) => self.fold_constant(constant),
            ValueNode::ProgramId => self
                .program_id
                .as_ref()
                .map(ValueLiteral::new)
                .ok_or_else(|| {
                    CodegenError::generation("program id value rendered outside of a program")
                }),
        }
    }

    /// Renders a value assigned to a declaration of type `type_syntax`.
    ///
    /// Composite bodies get the type prefixed, options become `lo.ToPtr`
    /// calls with an explicit type argument and strings or bytes assigned to
    /// fixed byte arrays become array literals.
    ///
    /// # Errors
    /// Same as [`ValueGenerator::render`].
    pub fn render_for_type(&self, node: &ValueNode, type_syntax: &str) -> Result<ValueLiteral> {
        if let Some(inner_type) = type_syntax.strip_prefix('*') {
            let inner = match node {
                ValueNode::None => return Ok(ValueLiteral::new("nil")),
                ValueNode::Some { value } => self.render_for_type(value, inner_type)?,
                other => self.render_for_type(other, inner_type)?,
            };
            return Ok(inner
                .map(|expression| format!("lo.ToPtr[{inner_type}]({expression})"))
                .with_dependency(LO));
        }

        match node {
            ValueNode::Bytes(bytes) => {
                let data = bytes.decode()?;
                Ok(ValueLiteral::new(format!(
                    "{type_syntax}{{{}}}",
                    byte_list(&data)
                )))
            }
            ValueNode::String { string } if is_byte_array(type_syntax) => Ok(ValueLiteral::new(
                format!("{type_syntax}{{{}}}", byte_list(string.as_bytes())),
            )),
            ValueNode::Number { number }
                if type_syntax == "ag_binary.Uint128" || type_syntax == "ag_binary.Int128" =>
            {
                let (lo, hi) = match number.as_u64() {
                    Some(value) => (value, 0),
                    None => {
                        let value = number.as_i64().ok_or_else(|| {
                            CodegenError::generation(format!(
                                "{number} is not an integer literal for {type_syntax}"
                            ))
                        })?;
                        (value as u64, if value < 0 { u64::MAX } else { 0 })
                    }
                };
                Ok(ValueLiteral::new(format!(
                    "{type_syntax}{{Lo: {lo}, Hi: {hi}}}"
                ))
                .with_dependency(BINARY))
            }
            _ => {
                let literal = self.render(node)?;
                if literal.expression.starts_with('{') {
                    Ok(literal.map(|body| format!("{type_syntax}{body}")))
                } else {
                    Ok(literal)
                }
            }
        }
    }

    /// Folds a constant value into a `[]byte` expression.
    ///
    /// Bytes are taken as is, strings are encoded with the string type's
    /// encoding and numbers are written with the declared width and byte
    /// order.
    ///
    /// # Errors
    /// Returns `CodegenError::UnsupportedConstant` for any other pairing, for
    /// 128-bit and variable-width numbers and for numbers out of range.
    pub fn fold_constant(&self, node: &ConstantValueNode) -> Result<ValueLiteral> {
        match (node.r#type.unwrapped(), node.value.as_ref()) {
            (_, ValueNode::Bytes(bytes)) => {
                let data = bytes.decode()?;
                Ok(ValueLiteral::new(format!("[]byte{{{}}}", byte_list(&data))))
            }
            (TypeNode::String(string), ValueNode::String { string: value }) => {
                match string.encoding {
                    BytesEncoding::Utf8 => Ok(ValueLiteral::new(format!("[]byte({})", quote(value)))),
                    encoding => {
                        let data = encoding.decode(value)?;
                        Ok(ValueLiteral::new(format!("[]byte{{{}}}", byte_list(&data))))
                    }
                }
            }
            (TypeNode::Number(number), ValueNode::Number { number: value }) => {
                fold_number(number, value)
            }
            (r#type, value) => Err(CodegenError::unsupported_constant(format!(
                "cannot fold {} into {}",
                value.kind(),
                r#type.kind()
            ))),
        }
    }

    pub(crate) fn render_enum(&self, node: &EnumValueNode) -> Result<ValueLiteral> {
        let link = &node.r#enum.name;
        let variant = enum_variant_ident(link, &node.variant);
        let (constructor, mut dependencies) = self.links.qualify(link, &variant);

        let Some(payload) = &node.value else {
            return Ok(ValueLiteral {
                expression: constructor,
                dependencies,
            });
        };

        let (payload_type, payload_dependencies) = self
            .links
            .qualify(link, &enum_payload_name(link, &node.variant));
        let inner = self.render(payload)?;
        dependencies.merge(&payload_dependencies);
        dependencies.merge(&inner.dependencies);

        let payload = if inner.expression.starts_with('{') {
            format!("{payload_type}{}", inner.expression)
        } else {
            format!("{payload_type}({})", inner.expression)
        };
        Ok(ValueLiteral {
            expression: format!("{constructor}({payload})"),
            dependencies,
        })
    }

    fn composite<'n>(
        &self,
        items: impl Iterator<Item = &'n ValueNode>,
        element: impl Fn(String) -> String,
    ) -> Result<ValueLiteral> {
        let mut dependencies = DependencySet::new();
        let mut parts = Vec::new();
        for item in items {
            let literal = self.render(item)?;
            dependencies.merge(&literal.dependencies);
            parts.push(element(literal.expression));
        }
        Ok(ValueLiteral {
            expression: format!("{{{}}}", parts.join(", ")),
            dependencies,
        })
    }
}

fn is_byte_array(type_syntax: &str) -> bool {
    type_syntax.starts_with('[') && !type_syntax.starts_with("[]") && type_syntax.ends_with("]byte")
}

fn fold_number(node: &NumberTypeNode, value: &serde_json::Number) -> Result<ValueLiteral> {
    let order = match node.endian {
        Endian::Little => "LittleEndian",
        Endian::Big => "BigEndian",
    };

    match node.format {
        NumberFormat::F32 => Ok(ValueLiteral::new(format!(
            "binary.{order}.AppendUint32(nil, math.Float32bits({value}))"
        ))
        .with_dependency(ENCODING_BINARY)
        .with_dependency(MATH)),
        NumberFormat::F64 => Ok(ValueLiteral::new(format!(
            "binary.{order}.AppendUint64(nil, math.Float64bits({value}))"
        ))
        .with_dependency(ENCODING_BINARY)
        .with_dependency(MATH)),
        NumberFormat::U128 | NumberFormat::I128 | NumberFormat::ShortU16 => {
            Err(CodegenError::unsupported_constant(format!(
                "{} constants cannot be folded into bytes",
                node.format
            )))
        }
        format => {
            let bits = integer_bits(format, value)?;
            match format.size() {
                Some(1) => Ok(ValueLiteral::new(format!("[]byte{{0x{bits:02x}}}"))),
                Some(size) => Ok(ValueLiteral::new(format!(
                    "binary.{order}.AppendUint{}(nil, {bits})",
                    size * 8
                ))
                .with_dependency(ENCODING_BINARY)),
                None => Err(CodegenError::unsupported_constant(format!(
                    "{format} has no fixed width"
                ))),
            }
        }
    }
}

/// Returns the two's complement bit pattern of `value` at the width of `format`.
fn integer_bits(format: NumberFormat, value: &serde_json::Number) -> Result<u64> {
    let width = format.size().unwrap_or(8) * 8;
    let out_of_range =
        || CodegenError::unsupported_constant(format!("{value} does not fit in {format}"));
    let mask = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };

    if format.is_signed() {
        let signed = value.as_i64().ok_or_else(out_of_range)?;
        let half = 1i128 << (width - 1);
        if i128::from(signed) < -half || i128::from(signed) >= half {
            return Err(out_of_range());
        }
        Ok((signed as u64) & mask)
    } else {
        let unsigned = value.as_u64().ok_or_else(out_of_range)?;
        if unsigned > mask {
            return Err(out_of_range());
        }
        Ok(unsigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use borshgo_schema::{
        DefinedTypeLinkNode, MapEntryValueNode, StringTypeNode, StructFieldValueNode,
    };
    use std::collections::BTreeMap;

    fn empty_map() -> &'static BTreeMap<String, String> {
        static EMPTY: std::sync::OnceLock<BTreeMap<String, String>> = std::sync::OnceLock::new();
        EMPTY.get_or_init(BTreeMap::new)
    }

    fn generator() -> ValueGenerator<'static> {
        ValueGenerator::new(LinkResolver::new(empty_map(), empty_map()))
    }

    fn constant(r#type: TypeNode, value: ValueNode) -> ConstantValueNode {
        ConstantValueNode {
            r#type: Box::new(r#type),
            value: Box::new(value),
        }
    }

    #[test]
    fn test_render_scalars() {
        let generator = generator();
        let rendered = |node: ValueNode| generator.render(&node).expect("render").expression;
        assert_eq!(rendered(ValueNode::Boolean { boolean: true }), "true");
        assert_eq!(rendered(ValueNode::number(42u64)), "42");
        assert_eq!(rendered(ValueNode::number(-3i64)), "-3");
        assert_eq!(rendered(ValueNode::string("hi \"there\"")), "\"hi \\\"there\\\"\"");
        assert_eq!(rendered(ValueNode::None), "nil");
    }

    #[test]
    fn test_render_bytes_as_fixed_array() {
        let literal = generator()
            .render(&ValueNode::hex_bytes("01020304"))
            .expect("render");
        assert_eq!(literal.expression, "[4]byte{0x01, 0x02, 0x03, 0x04}");
    }

    #[test]
    fn test_render_some_adds_lo() {
        let literal = generator()
            .render(&ValueNode::Some {
                value: Box::new(ValueNode::number(1u64)),
            })
            .expect("render");
        assert_eq!(literal.expression, "lo.ToPtr(1)");
        assert!(literal.dependencies.contains(LO));
    }

    #[test]
    fn test_render_aggregates() {
        let generator = generator();
        let array = ValueNode::Array {
            items: vec![ValueNode::number(1u64), ValueNode::number(2u64)],
        };
        assert_eq!(generator.render(&array).expect("array").expression, "{1, 2}");

        let set = ValueNode::Set {
            items: vec![ValueNode::string("a")],
        };
        assert_eq!(generator.render(&set).expect("set").expression, "{\"a\": {}}");

        let map = ValueNode::Map {
            entries: vec![MapEntryValueNode {
                key: ValueNode::string("k"),
                value: ValueNode::number(7u64),
            }],
        };
        assert_eq!(generator.render(&map).expect("map").expression, "{\"k\": 7}");

        let single = ValueNode::Tuple {
            items: vec![ValueNode::number(9u64)],
        };
        assert_eq!(generator.render(&single).expect("tuple").expression, "9");

        let point = ValueNode::Struct {
            fields: vec![
                StructFieldValueNode {
                    name: "x".into(),
                    value: ValueNode::number(1u64),
                },
                StructFieldValueNode {
                    name: "max_value".into(),
                    value: ValueNode::number(2u64),
                },
            ],
        };
        assert_eq!(
            generator.render(&point).expect("struct").expression,
            "{X: 1, MaxValue: 2}"
        );
    }

    #[test]
    fn test_render_enum_values_match_type_naming() {
        let generator = generator();
        let empty = ValueNode::Enum(EnumValueNode {
            r#enum: DefinedTypeLinkNode::new("direction"),
            variant: "up".into(),
            value: None,
        });
        assert_eq!(generator.render(&empty).expect("empty").expression, "Direction_Up");

        let with_struct = ValueNode::Enum(EnumValueNode {
            r#enum: DefinedTypeLinkNode::new("shape"),
            variant: "circle".into(),
            value: Some(Box::new(ValueNode::Struct {
                fields: vec![StructFieldValueNode {
                    name: "radius".into(),
                    value: ValueNode::number(3u64),
                }],
            })),
        });
        assert_eq!(
            generator.render(&with_struct).expect("struct payload").expression,
            "Shape_Circle(ShapeCircle{Radius: 3})"
        );

        let with_scalar = ValueNode::Enum(EnumValueNode {
            r#enum: DefinedTypeLinkNode::new("shape"),
            variant: "square".into(),
            value: Some(Box::new(ValueNode::Tuple {
                items: vec![ValueNode::number(4u64)],
            })),
        });
        assert_eq!(
            generator.render(&with_scalar).expect("tuple payload").expression,
            "Shape_Square(ShapeSquare(4))"
        );
    }

    #[test]
    fn test_render_public_key_and_program_id() {
        let generator = generator();
        let key = ValueNode::PublicKey {
            public_key: "11111111111111111111111111111111".into(),
            identifier: None,
        };
        let literal = generator.render(&key).expect("public key");
        assert_eq!(
            literal.expression,
            "ag_solanago.MustPublicKeyFromBase58(\"11111111111111111111111111111111\")"
        );
        assert!(literal.dependencies.contains(SOLANA));

        assert!(generator.render(&ValueNode::ProgramId).is_err());
        let scoped = generator.with_program_id("PumpProgramID");
        assert_eq!(
            scoped.render(&ValueNode::ProgramId).expect("program id").expression,
            "PumpProgramID"
        );
    }

    #[test]
    fn test_fold_u32_constant() {
        let literal = generator()
            .fold_constant(&constant(
                TypeNode::number(NumberFormat::U32),
                ValueNode::number(1u64),
            ))
            .expect("fold");
        assert_eq!(literal.expression, "binary.LittleEndian.AppendUint32(nil, 1)");
        assert!(literal.dependencies.contains(ENCODING_BINARY));
    }

    #[test]
    fn test_fold_single_byte_and_signed_constants() {
        let generator = generator();
        let byte = generator
            .fold_constant(&constant(
                TypeNode::number(NumberFormat::U8),
                ValueNode::number(7u64),
            ))
            .expect("u8");
        assert_eq!(byte.expression, "[]byte{0x07}");
        assert!(byte.dependencies.is_empty());

        let negative = generator
            .fold_constant(&constant(
                TypeNode::number(NumberFormat::I16),
                ValueNode::number(-1i64),
            ))
            .expect("i16");
        assert_eq!(negative.expression, "binary.LittleEndian.AppendUint16(nil, 65535)");

        let big = generator
            .fold_constant(&constant(
                TypeNode::Number(NumberTypeNode::be(NumberFormat::U64)),
                ValueNode::number(2u64),
            ))
            .expect("u64 be");
        assert_eq!(big.expression, "binary.BigEndian.AppendUint64(nil, 2)");
    }

    #[test]
    fn test_fold_float_constant() {
        let value = serde_json::Number::from_f64(1.5).expect("finite");
        let literal = generator()
            .fold_constant(&constant(
                TypeNode::number(NumberFormat::F32),
                ValueNode::Number { number: value },
            ))
            .expect("f32");
        assert_eq!(
            literal.expression,
            "binary.LittleEndian.AppendUint32(nil, math.Float32bits(1.5))"
        );
        assert!(literal.dependencies.contains(MATH));
    }

    #[test]
    fn test_fold_strings_and_bytes() {
        let generator = generator();
        let utf8 = generator
            .fold_constant(&constant(
                TypeNode::String(StringTypeNode::default()),
                ValueNode::string("vault"),
            ))
            .expect("utf8");
        assert_eq!(utf8.expression, "[]byte(\"vault\")");

        let encoded = generator
            .fold_constant(&constant(
                TypeNode::String(StringTypeNode {
                    encoding: BytesEncoding::Base16,
                }),
                ValueNode::string("abcd"),
            ))
            .expect("base16");
        assert_eq!(encoded.expression, "[]byte{0xab, 0xcd}");

        let bytes = generator
            .fold_constant(&constant(TypeNode::Bytes, ValueNode::hex_bytes("ff00")))
            .expect("bytes");
        assert_eq!(bytes.expression, "[]byte{0xff, 0x00}");
    }

    #[test]
    fn test_fold_unsupported_shapes() {
        let generator = generator();
        let mismatched = constant(TypeNode::number(NumberFormat::U32), ValueNode::string("x"));
        assert!(matches!(
            generator.fold_constant(&mismatched),
            Err(CodegenError::UnsupportedConstant { .. })
        ));

        let wide = constant(TypeNode::number(NumberFormat::U128), ValueNode::number(1u64));
        assert!(matches!(
            generator.fold_constant(&wide),
            Err(CodegenError::UnsupportedConstant { .. })
        ));

        let overflow = constant(TypeNode::number(NumberFormat::U8), ValueNode::number(300u64));
        assert!(matches!(
            generator.fold_constant(&overflow),
            Err(CodegenError::UnsupportedConstant { .. })
        ));
    }

    #[test]
    fn test_render_for_type() {
        let generator = generator();

        let bytes = generator
            .render_for_type(&ValueNode::hex_bytes("01020304"), "[4]byte")
            .expect("bytes");
        assert_eq!(bytes.expression, "[4]byte{0x01, 0x02, 0x03, 0x04}");

        let text = generator
            .render_for_type(&ValueNode::string("ab"), "[8]byte")
            .expect("string into array");
        assert_eq!(text.expression, "[8]byte{0x61, 0x62}");

        let pointer = generator
            .render_for_type(
                &ValueNode::Some {
                    value: Box::new(ValueNode::number(5u64)),
                },
                "*uint8",
            )
            .expect("pointer");
        assert_eq!(pointer.expression, "lo.ToPtr[uint8](5)");
        assert!(pointer.dependencies.contains(LO));

        let none = generator
            .render_for_type(&ValueNode::None, "*uint8")
            .expect("none");
        assert_eq!(none.expression, "nil");

        let slice = generator
            .render_for_type(
                &ValueNode::Array {
                    items: vec![ValueNode::number(1u64)],
                },
                "[]uint16",
            )
            .expect("slice");
        assert_eq!(slice.expression, "[]uint16{1}");

        let wide = generator
            .render_for_type(&ValueNode::number(-1i64), "ag_binary.Int128")
            .expect("int128");
        assert_eq!(
            wide.expression,
            format!("ag_binary.Int128{{Lo: {}, Hi: {}}}", u64::MAX, u64::MAX)
        );
    }
}
