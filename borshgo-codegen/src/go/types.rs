//! Type manifest generation.

use crate::context::{NamingContext, ParentSize, StructMode};
use crate::dependencies::{BINARY, LO, SOLANA};
use crate::error::{CodegenError, Result};
use crate::go::values::{ValueGenerator, ValueLiteral};
use crate::go::{LinkResolver, enum_payload_name, enum_variant_ident, number_type, quote};
use crate::manifest::{FieldLine, TypeManifest, struct_body};
use borshgo_schema::{
    BooleanTypeNode, DefinedTypeLinkNode, DefinedTypeNode, Endian, EnumTypeNode, EnumValueNode,
    EnumVariantTypeNode, NumberFormat, NumberTypeNode, StructFieldTypeNode, StructFieldValueNode,
    StructTypeNode, TupleTypeNode, TypeNode, ValueNode, to_pascal_case,
};

/// Generator lowering schema type nodes to Go type syntax.
#[derive(Debug, Clone)]
pub struct TypeGenerator<'a> {
    links: LinkResolver<'a>,
    values: ValueGenerator<'a>,
    defined_types: &'a [DefinedTypeNode],
}

impl<'a> TypeGenerator<'a> {
    /// Creates a new type generator.
    #[must_use]
    pub fn new(links: LinkResolver<'a>, values: ValueGenerator<'a>) -> Self {
        Self {
            links,
            values,
            defined_types: &[],
        }
    }

    /// Lets value rendering follow links into the given program types.
    #[must_use]
    pub fn with_defined_types(mut self, defined_types: &'a [DefinedTypeNode]) -> Self {
        self.defined_types = defined_types;
        self
    }

    /// Returns the value generator used for default annotations.
    #[must_use]
    pub fn values(&self) -> &ValueGenerator<'a> {
        &self.values
    }

    /// Lowers a named type declaration.
    ///
    /// Struct, enum and multi-item tuple shapes carry the name themselves;
    /// every other shape becomes `type Name = Underlying`.
    ///
    /// # Errors
    /// Propagates any error of the underlying shape.
    pub fn visit_defined_type(&self, node: &DefinedTypeNode) -> Result<TypeManifest> {
        let name = to_pascal_case(&node.name);
        let mut manifest = self.visit(&node.r#type, &NamingContext::top_level(&name))?;
        if !declares_itself(node.r#type.unwrapped()) {
            manifest.type_syntax = format!("type {name} = {}", manifest.type_syntax);
        }
        Ok(manifest)
    }

    /// Lowers a type node in the given naming context.
    ///
    /// # Errors
    /// Returns an error for unsupported numbers, booleans and options, for
    /// struct or enum shapes without an enclosing name and for default values
    /// that cannot be rendered.
    pub fn visit(&self, node: &TypeNode, ctx: &NamingContext) -> Result<TypeManifest> {
        match node {
            TypeNode::Number(number) => self.visit_number(number),
            TypeNode::Boolean(boolean) => visit_boolean(boolean),
            TypeNode::String(_) => Ok(match ctx.parent_size {
                Some(ParentSize::Fixed(size)) => TypeManifest::new(format!("[{size}]byte")),
                _ => TypeManifest::new("string"),
            }),
            TypeNode::Bytes => Ok(match ctx.parent_size {
                Some(ParentSize::Fixed(size)) => TypeManifest::new(format!("[{size}]byte")),
                Some(ParentSize::Prefixed(_)) | None => TypeManifest::new("[]byte"),
            }),
            TypeNode::PublicKey => {
                Ok(TypeManifest::new("ag_solanago.PublicKey").with_dependency(SOLANA))
            }
            TypeNode::Array(array) => {
                let mut manifest = TypeManifest::default();
                let item = manifest.absorb(self.visit(&array.item, &ctx.item("Item"))?);
                manifest.type_syntax = match array.count.fixed() {
                    Some(count) => format!("[{count}]{item}"),
                    None => format!("[]{item}"),
                };
                Ok(manifest)
            }
            TypeNode::Set(set) => {
                let mut manifest = TypeManifest::default();
                let item = manifest.absorb(self.visit(&set.item, &ctx.item("Item"))?);
                manifest.type_syntax = format!("map[{item}]struct{{}}");
                Ok(manifest)
            }
            TypeNode::Map(map) => {
                let mut manifest = TypeManifest::default();
                let key = manifest.absorb(self.visit(&map.key, &ctx.item("Key"))?);
                let value = manifest.absorb(self.visit(&map.value, &ctx.item("Value"))?);
                manifest.type_syntax = format!("map[{key}]{value}");
                Ok(manifest)
            }
            TypeNode::Option(option) => {
                if option.fixed
                    || option.prefix.format != NumberFormat::U8
                    || option.prefix.endian != Endian::Little
                {
                    return Err(CodegenError::UnsupportedOptionLayout {
                        format: option.prefix.format,
                        endian: option.prefix.endian,
                        fixed: option.fixed,
                    });
                }
                let mut manifest = TypeManifest::default();
                let item = manifest.absorb(self.visit(&option.item, &ctx.wrapped())?);
                manifest.type_syntax = format!("*{item}");
                manifest.option_field = true;
                Ok(manifest)
            }
            TypeNode::RemainderOption(_) | TypeNode::ZeroableOption(_) => {
                Err(CodegenError::UnsupportedNode { kind: node.kind() })
            }
            TypeNode::Tuple(tuple) => self.visit_tuple(tuple, ctx),
            TypeNode::Struct(node) => self.visit_struct(node, ctx),
            TypeNode::Enum(node) => self.visit_enum(node, ctx),
            TypeNode::Link(link) => Ok(self.visit_link(link)),
            TypeNode::FixedSize(fixed) => self.visit(
                &fixed.r#type,
                &ctx.with_parent_size(ParentSize::Fixed(fixed.size)),
            ),
            TypeNode::SizePrefix(prefixed) => self.visit(
                &prefixed.r#type,
                &ctx.with_parent_size(ParentSize::Prefixed(prefixed.prefix)),
            ),
        }
    }

    /// Lowers struct fields into field lines.
    ///
    /// Each field is visited with the parent name extended by the field's
    /// PascalCase name. The returned manifest carries the hoisted
    /// declarations and dependencies of every field; its syntax is empty.
    ///
    /// # Errors
    /// Propagates field type and default value errors.
    pub fn field_lines(
        &self,
        fields: &[StructFieldTypeNode],
        ctx: &NamingContext,
    ) -> Result<(Vec<FieldLine>, TypeManifest)> {
        let mut manifest = TypeManifest::default();
        let mut lines = Vec::with_capacity(fields.len());

        for field in fields {
            let name = to_pascal_case(&field.name);
            let field_manifest = self.visit(&field.r#type, &ctx.field(&name))?;
            let optional = field_manifest.option_field;
            let type_syntax = manifest.absorb(field_manifest);

            let annotation = match &field.default_value {
                Some(value) => {
                    let literal = self.render_value(value, &field.r#type, &ctx.field(&name))?;
                    Some(format!("default: {}", literal.expression))
                }
                None => None,
            };

            lines.push(FieldLine {
                name,
                type_syntax,
                optional,
                annotation,
                docs: field.docs.clone(),
            });
        }

        Ok((lines, manifest))
    }

    /// Renders `value` as a Go literal of the type `node` declared in `ctx`.
    ///
    /// The type is followed down every aggregate, so nested struct fields,
    /// collection items and option payloads are all written with their own
    /// Go type. Links are followed into the program's defined types. A link
    /// to another module, or a value whose shape does not match the type,
    /// falls back to [`ValueGenerator::render_for_type`].
    ///
    /// # Errors
    /// Returns an error for struct values naming undeclared fields, for
    /// tuple values of the wrong arity and for any value the value generator
    /// rejects.
    pub fn render_value(
        &self,
        value: &ValueNode,
        node: &TypeNode,
        ctx: &NamingContext,
    ) -> Result<ValueLiteral> {
        match (node, value) {
            (TypeNode::FixedSize(fixed), _) => self.render_value(
                value,
                &fixed.r#type,
                &ctx.with_parent_size(ParentSize::Fixed(fixed.size)),
            ),
            (TypeNode::SizePrefix(prefixed), _) => self.render_value(
                value,
                &prefixed.r#type,
                &ctx.with_parent_size(ParentSize::Prefixed(prefixed.prefix)),
            ),
            (TypeNode::Option(_), ValueNode::None) => Ok(ValueLiteral::new("nil")),
            (TypeNode::Option(option), _) => {
                let inner = match value {
                    ValueNode::Some { value } => value.as_ref(),
                    other => other,
                };
                let item_ctx = ctx.wrapped();
                let item = self.reference(&option.item, &item_ctx)?;
                let literal = self.render_value(inner, &option.item, &item_ctx)?;

                let mut dependencies = item.dependencies;
                dependencies.merge(&literal.dependencies);
                dependencies.add(LO);
                Ok(ValueLiteral {
                    expression: format!("lo.ToPtr[{}]({})", item.type_syntax, literal.expression),
                    dependencies,
                })
            }
            (_, ValueNode::Enum(enum_value)) => self.render_enum_value(enum_value),
            (TypeNode::Link(link), _) => match self.definition(&link.name) {
                Some(definition) => self.render_value(
                    value,
                    &definition.r#type,
                    &NamingContext::top_level(to_pascal_case(&definition.name)),
                ),
                None => self.fallback(value, node, ctx),
            },
            (TypeNode::Struct(r#struct), ValueNode::Struct { fields }) => {
                let reference = self.reference(node, ctx)?;
                self.struct_literal(reference, r#struct, fields, ctx)
            }
            (TypeNode::Tuple(tuple), ValueNode::Tuple { items }) => {
                if let ([item_type], [item]) = (tuple.items.as_slice(), items.as_slice()) {
                    return self.render_value(item, item_type, ctx);
                }
                let reference = self.reference(node, ctx)?;
                let field_ctx = match ctx.struct_mode {
                    StructMode::TopLevel => ctx.clone(),
                    StructMode::Nested | StructMode::Inline => ctx.inline(),
                };
                self.positional_literal(reference, &tuple.items, items, &field_ctx)
            }
            (TypeNode::Array(array), ValueNode::Array { items }) => {
                let item_ctx = ctx.item("Item");
                let parts = items
                    .iter()
                    .map(|item| self.render_value(item, &array.item, &item_ctx))
                    .collect::<Result<Vec<_>>>()?;
                Ok(composite(self.reference(node, ctx)?, parts))
            }
            (TypeNode::Set(set), ValueNode::Set { items }) => {
                let item_ctx = ctx.item("Item");
                let parts = items
                    .iter()
                    .map(|item| -> Result<ValueLiteral> {
                        let literal = self.render_value(item, &set.item, &item_ctx)?;
                        Ok(literal.map(|key| format!("{key}: {{}}")))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(composite(self.reference(node, ctx)?, parts))
            }
            (TypeNode::Map(map), ValueNode::Map { entries }) => {
                let key_ctx = ctx.item("Key");
                let value_ctx = ctx.item("Value");
                let mut parts = Vec::with_capacity(entries.len());
                for entry in entries {
                    let key = self.render_value(&entry.key, &map.key, &key_ctx)?;
                    let value = self.render_value(&entry.value, &map.value, &value_ctx)?;
                    let mut dependencies = key.dependencies;
                    dependencies.merge(&value.dependencies);
                    parts.push(ValueLiteral {
                        expression: format!("{}: {}", key.expression, value.expression),
                        dependencies,
                    });
                }
                Ok(composite(self.reference(node, ctx)?, parts))
            }
            _ => self.fallback(value, node, ctx),
        }
    }

    /// Lowers `node` for use in a literal: shapes that would declare
    /// themselves at the top level are referred to by their name instead.
    fn reference(&self, node: &TypeNode, ctx: &NamingContext) -> Result<TypeManifest> {
        if ctx.struct_mode == StructMode::TopLevel && declares_itself(node.unwrapped()) {
            let name = ctx.require_parent_name(node.kind())?;
            return Ok(TypeManifest::new(name));
        }
        self.visit(node, ctx)
    }

    fn fallback(&self, value: &ValueNode, node: &TypeNode, ctx: &NamingContext) -> Result<ValueLiteral> {
        let reference = self.reference(node, ctx)?;
        let mut literal = self.values.render_for_type(value, &reference.type_syntax)?;
        literal.dependencies.merge(&reference.dependencies);
        Ok(literal)
    }

    fn definition(&self, link_name: &str) -> Option<&'a DefinedTypeNode> {
        if !self.links.is_local(link_name) {
            return None;
        }
        let wanted = to_pascal_case(link_name);
        self.defined_types
            .iter()
            .find(|definition| to_pascal_case(&definition.name) == wanted)
    }

    fn struct_literal(
        &self,
        reference: TypeManifest,
        node: &StructTypeNode,
        values: &[StructFieldValueNode],
        ctx: &NamingContext,
    ) -> Result<ValueLiteral> {
        let mut parts = Vec::with_capacity(values.len());
        for field in values {
            let declared = node.field(&field.name).ok_or_else(|| {
                CodegenError::generation(format!(
                    "struct value sets '{}', which {} does not declare",
                    field.name, reference.type_syntax
                ))
            })?;
            let name = to_pascal_case(&declared.name);
            let literal = self.render_value(&field.value, &declared.r#type, &ctx.field(&name))?;
            parts.push(literal.map(|expression| format!("{name}: {expression}")));
        }
        Ok(composite(reference, parts))
    }

    fn positional_literal(
        &self,
        reference: TypeManifest,
        types: &[TypeNode],
        values: &[ValueNode],
        ctx: &NamingContext,
    ) -> Result<ValueLiteral> {
        if types.len() != values.len() {
            return Err(CodegenError::generation(format!(
                "tuple value has {} items but {} declares {}",
                values.len(),
                reference.type_syntax,
                types.len()
            )));
        }
        let parts = types
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (item_type, item))| {
                self.render_value(item, item_type, &ctx.field(&format!("Field{index}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(composite(reference, parts))
    }

    fn render_enum_value(&self, value: &EnumValueNode) -> Result<ValueLiteral> {
        let link = &value.r#enum.name;
        let variant = self
            .definition(link)
            .and_then(|definition| match definition.r#type.unwrapped() {
                TypeNode::Enum(node) => node
                    .variants
                    .iter()
                    .find(|v| to_pascal_case(v.name()) == to_pascal_case(&value.variant)),
                _ => None,
            });
        let (Some(variant), Some(payload)) = (variant, value.value.as_deref()) else {
            return self.values.render_enum(value);
        };

        let payload_name = enum_payload_name(link, &value.variant);
        let payload_ctx = NamingContext::nested(&payload_name);
        let literal = match (variant, payload) {
            (EnumVariantTypeNode::Struct { r#struct, .. }, ValueNode::Struct { fields }) => self
                .struct_literal(TypeManifest::new(&payload_name), r#struct, fields, &payload_ctx)?,
            (EnumVariantTypeNode::Tuple { tuple, .. }, ValueNode::Tuple { items }) => {
                match (tuple.items.as_slice(), items.as_slice()) {
                    ([item_type], [item]) => self
                        .render_value(item, item_type, &payload_ctx.field("Field0"))?
                        .map(|expression| format!("{payload_name}({expression})")),
                    _ => self.positional_literal(
                        TypeManifest::new(&payload_name),
                        &tuple.items,
                        items,
                        &payload_ctx,
                    )?,
                }
            }
            _ => return self.values.render_enum(value),
        };
        let constructor = enum_variant_ident(link, &value.variant);
        Ok(literal.map(|expression| format!("{constructor}({expression})")))
    }

    fn visit_number(&self, node: &NumberTypeNode) -> Result<TypeManifest> {
        if node.endian != Endian::Little {
            return Err(CodegenError::UnsupportedEndianness {
                format: node.format,
                endian: node.endian,
            });
        }
        match node.format {
            NumberFormat::U128 => {
                Ok(TypeManifest::new("ag_binary.Uint128").with_dependency(BINARY))
            }
            NumberFormat::I128 => Ok(TypeManifest::new("ag_binary.Int128").with_dependency(BINARY)),
            format => number_type(format)
                .map(TypeManifest::new)
                .ok_or(CodegenError::UnsupportedNumberFormat { format }),
        }
    }

    fn visit_tuple(&self, node: &TupleTypeNode, ctx: &NamingContext) -> Result<TypeManifest> {
        if let [single] = node.items.as_slice() {
            return self.visit(single, ctx);
        }

        let fields = positional_fields(node);
        match ctx.struct_mode {
            StructMode::TopLevel => {
                let name = ctx.require_parent_name(node_kind::TUPLE)?.to_string();
                let (lines, mut manifest) = self.field_lines(&fields, ctx)?;
                manifest.type_syntax = format!("type {name} {}", struct_body(&lines));
                Ok(manifest)
            }
            StructMode::Nested | StructMode::Inline => {
                let (lines, mut manifest) = self.field_lines(&fields, &ctx.inline())?;
                manifest.type_syntax = struct_body(&lines);
                Ok(manifest)
            }
        }
    }

    fn visit_struct(&self, node: &StructTypeNode, ctx: &NamingContext) -> Result<TypeManifest> {
        let name = ctx.require_parent_name(node_kind::STRUCT)?.to_string();
        let (lines, mut manifest) = self.field_lines(&node.fields, ctx)?;
        let body = struct_body(&lines);

        manifest.type_syntax = match ctx.struct_mode {
            StructMode::TopLevel => format!("type {name} {body}"),
            StructMode::Nested => {
                manifest.push_declaration(format!("type {name} {body}"));
                name
            }
            StructMode::Inline => body,
        };
        Ok(manifest)
    }

    fn visit_enum(&self, node: &EnumTypeNode, ctx: &NamingContext) -> Result<TypeManifest> {
        let name = ctx.require_parent_name(node_kind::ENUM)?.to_string();
        let mut manifest = if node.is_scalar() {
            self.scalar_enum(&name, node)?
        } else {
            self.data_enum(&name, node)?
        };

        if ctx.struct_mode != StructMode::TopLevel {
            let declaration = std::mem::replace(&mut manifest.type_syntax, name);
            manifest.push_declaration(declaration);
        }
        Ok(manifest)
    }

    fn scalar_enum(&self, name: &str, node: &EnumTypeNode) -> Result<TypeManifest> {
        let mut manifest = TypeManifest::default();
        let backing = manifest.absorb(self.visit_number(&node.size)?);

        let mut output = String::new();
        output.push_str(&format!("type {name} {backing}\n\n"));
        output.push_str("const (\n");
        for (index, variant) in node.variants.iter().enumerate() {
            let ident = enum_variant_ident(name, variant.name());
            if index == 0 {
                output.push_str(&format!("\t{ident} {name} = iota\n"));
            } else {
                output.push_str(&format!("\t{ident}\n"));
            }
        }
        output.push_str(")\n\n");

        output.push_str(&format!("func (value {name}) String() string {{\n"));
        output.push_str("\tswitch value {\n");
        for variant in &node.variants {
            output.push_str(&format!(
                "\tcase {}:\n\t\treturn {}\n",
                enum_variant_ident(name, variant.name()),
                quote(&to_pascal_case(variant.name()))
            ));
        }
        output.push_str("\tdefault:\n\t\treturn \"\"\n\t}\n}");

        manifest.type_syntax = output;
        Ok(manifest)
    }

    fn data_enum(&self, name: &str, node: &EnumTypeNode) -> Result<TypeManifest> {
        if node.size.format != NumberFormat::U8 || node.size.endian != Endian::Little {
            return Err(CodegenError::generation(format!(
                "data enum '{name}' must use a u8 discriminator, got {} {}",
                node.size.format, node.size.endian
            )));
        }

        let mut manifest = TypeManifest::default().with_dependency(BINARY);
        let mut fields = vec![FieldLine::new(
            "Enum",
            "ag_binary.BorshEnum `borsh_enum:\"true\"`",
        )];
        let mut constructors = Vec::with_capacity(node.variants.len());

        for (index, variant) in node.variants.iter().enumerate() {
            let field = to_pascal_case(variant.name());
            let ident = enum_variant_ident(name, variant.name());
            let payload = enum_payload_name(name, variant.name());

            match variant {
                EnumVariantTypeNode::Empty { .. } => {
                    fields.push(FieldLine::new(&field, "ag_binary.EmptyVariant"));
                    constructors.push(format!("var {ident} = {name}{{Enum: {index}}}"));
                }
                EnumVariantTypeNode::Struct { r#struct, .. } => {
                    let payload_ctx = NamingContext::nested(&payload);
                    manifest.absorb(self.visit_struct(r#struct, &payload_ctx)?);
                    fields.push(FieldLine::new(&field, &payload));
                    constructors.push(data_constructor(name, &ident, &payload, &field, index));
                }
                EnumVariantTypeNode::Tuple { tuple, .. } => {
                    let payload_ctx = NamingContext::nested(&payload);
                    let body = match tuple.items.as_slice() {
                        [single] => {
                            let item = self.visit(single, &payload_ctx.field("Field0"))?;
                            manifest.absorb(item)
                        }
                        _ => {
                            let fields = positional_fields(tuple);
                            let (lines, nested) = self.field_lines(&fields, &payload_ctx)?;
                            manifest.absorb(nested);
                            struct_body(&lines)
                        }
                    };
                    manifest.push_declaration(format!("type {payload} {body}"));
                    fields.push(FieldLine::new(&field, &payload));
                    constructors.push(data_constructor(name, &ident, &payload, &field, index));
                }
            }
        }

        let mut output = format!("type {name} {}", struct_body(&fields));
        for constructor in constructors {
            output.push_str("\n\n");
            output.push_str(&constructor);
        }
        manifest.type_syntax = output;
        Ok(manifest)
    }

    fn visit_link(&self, link: &DefinedTypeLinkNode) -> TypeManifest {
        let (syntax, dependencies) = self
            .links
            .qualify(&link.name, &to_pascal_case(&link.name));
        TypeManifest {
            type_syntax: syntax,
            dependencies,
            ..TypeManifest::default()
        }
    }
}

mod node_kind {
    pub const STRUCT: &str = "structTypeNode";
    pub const ENUM: &str = "enumTypeNode";
    pub const TUPLE: &str = "tupleTypeNode";
}

fn visit_boolean(node: &BooleanTypeNode) -> Result<TypeManifest> {
    if node.size.format != NumberFormat::U8 || node.size.endian != Endian::Little {
        return Err(CodegenError::UnsupportedBooleanSize {
            format: node.size.format,
            endian: node.size.endian,
        });
    }
    Ok(TypeManifest::new("bool"))
}

fn declares_itself(node: &TypeNode) -> bool {
    match node {
        TypeNode::Struct(_) | TypeNode::Enum(_) => true,
        TypeNode::Tuple(tuple) => tuple.items.len() != 1,
        _ => false,
    }
}

/// Writes `Type{part, part}` with the dependencies of the type and every part.
fn composite(reference: TypeManifest, parts: Vec<ValueLiteral>) -> ValueLiteral {
    let mut dependencies = reference.dependencies;
    let mut expressions = Vec::with_capacity(parts.len());
    for part in parts {
        dependencies.merge(&part.dependencies);
        expressions.push(part.expression);
    }
    ValueLiteral {
        expression: format!("{}{{{}}}", reference.type_syntax, expressions.join(", ")),
        dependencies,
    }
}

fn positional_fields(tuple: &TupleTypeNode) -> Vec<StructFieldTypeNode> {
    tuple
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| StructFieldTypeNode::new(format!("Field{index}"), item.clone()))
        .collect()
}

fn data_constructor(enum_name: &str, ident: &str, payload: &str, field: &str, index: usize) -> String {
    format!(
        "func {ident}(value {payload}) {enum_name} {{\n\treturn {enum_name}{{Enum: {index}, {field}: value}}\n}}"
    )
}
