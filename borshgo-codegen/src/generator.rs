//! Render map assembly.
//!
//! The generator walks the root top-down. All programs are registered in the
//! link registry before the first program child is visited, so PDA links can
//! point at any program of the tree.

use crate::context::{LinkRegistry, NamingContext, ProgramScope};
use crate::dependencies::{DependencySet, ENCODING_BINARY, MATH};
use crate::error::{CodegenError, Result};
use crate::go::pages::{
    AccountMetaItem, FieldItem, PageBody, PdaFinder, SignerMode, account_body, errors_body,
    index_body, instruction_body, program_body,
};
use crate::go::{
    AccountPage, DiscriminatorConstant, DiscriminatorKind, GoFile, InstructionPage, LinkResolver,
    TypeGenerator, ValueGenerator, ValueLiteral, param_name,
};
use crate::manifest::{FieldLine, TypeManifest, struct_body};
use crate::options::RenderOptions;
use crate::render_map::RenderMap;
use borshgo_schema::{
    AccountNode, ConstantValueNode, DefaultValueStrategy, DefinedTypeNode, DiscriminatorNode,
    InstructionInputValueNode, InstructionNode, PdaLinkNode, PdaSeedNode, ProgramNode, RootNode,
    SignerFlag, ValueNode, to_pascal_case, to_snake_case,
};
use std::collections::BTreeSet;

/// Path of the root instruction index.
pub const INDEX_PATH: &str = "instructions.go";

/// A data field a discriminator may point at.
struct DiscriminatedField<'n> {
    schema_name: &'n str,
    go_name: String,
    type_syntax: String,
    default_literal: Option<ValueLiteral>,
}

/// Generator producing Go files from a schema root.
#[derive(Debug)]
pub struct Generator<'a> {
    root: &'a RootNode,
    options: &'a RenderOptions,
}

impl<'a> Generator<'a> {
    /// Creates a generator.
    #[must_use]
    pub fn new(root: &'a RootNode, options: &'a RenderOptions) -> Self {
        Self { root, options }
    }

    /// Generates every file of the root.
    ///
    /// # Errors
    /// Returns the first fatal error met during the traversal. No partial
    /// map is returned.
    pub fn generate(&self) -> Result<RenderMap> {
        let mut registry = LinkRegistry::new();
        for program in self.root.programs() {
            registry.register_program(program);
        }

        let mut map = RenderMap::new();
        let mut index = Vec::new();
        for program in self.root.programs() {
            let scope = ProgramScope {
                program,
                registry: &registry,
            };
            map.merge(self.visit_program(scope)?)?;

            let names: Vec<String> = program
                .renderable_instructions(self.options.render_parent_instructions)
                .into_iter()
                .map(|instruction| instruction.name.clone())
                .collect();
            if !names.is_empty() {
                index.push((to_pascal_case(&program.name), names));
            }
        }

        let mut root_map = RenderMap::new();
        if index.is_empty() {
            root_map.add_absent(INDEX_PATH);
        } else {
            root_map.add(INDEX_PATH, self.file(index_body(&index), Vec::new()));
        }
        map.merge(root_map)?;

        for path in &self.options.preserved_files {
            if !map.keep_existing(path) {
                tracing::warn!(path = %path, "preserved file is not generated");
            }
        }

        tracing::debug!(files = map.len(), "generated render map");
        Ok(map)
    }

    fn visit_program(&self, scope: ProgramScope<'_>) -> Result<RenderMap> {
        let program = scope.program;
        let prefix = to_pascal_case(&program.name);
        let snake = to_snake_case(&program.name);
        tracing::debug!(program = %program.name, "visiting program");

        let links = LinkResolver::new(&self.options.link_overrides, &self.options.dependency_map);
        let values = ValueGenerator::new(links).with_program_id(program_id_ident(program));
        let types = TypeGenerator::new(links, values).with_defined_types(&program.defined_types);

        let mut map = RenderMap::new();
        let mut program_map = RenderMap::new();
        program_map.add(
            format!("{snake}_program.go"),
            self.file(
                program_body(
                    &prefix,
                    &program.name,
                    &program.version,
                    &program.public_key,
                    &program.docs,
                ),
                Vec::new(),
            ),
        );
        if program.errors.is_empty() {
            program_map.add_absent(format!("{snake}_errors.go"));
        } else {
            program_map.add(
                format!("{snake}_errors.go"),
                self.file(errors_body(&prefix, &program.errors), Vec::new()),
            );
        }
        map.merge(program_map)?;

        for account in &program.accounts {
            map.merge(self.visit_account(scope, &types, account)?)?;
        }
        for defined_type in &program.defined_types {
            map.merge(self.visit_defined_type(&types, defined_type)?)?;
        }
        for instruction in program.renderable_instructions(self.options.render_parent_instructions)
        {
            map.merge(self.visit_instruction(program, &types, instruction)?)?;
        }
        Ok(map)
    }

    fn visit_defined_type(
        &self,
        types: &TypeGenerator<'_>,
        node: &DefinedTypeNode,
    ) -> Result<RenderMap> {
        tracing::debug!(defined_type = %node.name, "visiting defined type");
        let manifest = types.visit_defined_type(node)?;
        let mut docs = crate::manifest::doc_comment(&node.docs);
        docs.push_str(&manifest.type_syntax);
        let body = PageBody {
            body: docs,
            dependencies: manifest.dependencies,
        };

        let mut map = RenderMap::new();
        map.add(
            format!("{}.go", to_snake_case(&node.name)),
            self.file(body, manifest.nested_declarations),
        );
        Ok(map)
    }

    fn visit_account(
        &self,
        scope: ProgramScope<'_>,
        types: &TypeGenerator<'_>,
        account: &AccountNode,
    ) -> Result<RenderMap> {
        tracing::debug!(account = %account.name, "visiting account");
        let name = to_pascal_case(&account.name);
        let ctx = NamingContext::top_level(&name);
        let (lines, mut manifest) = types.field_lines(&account.data.fields, &ctx)?;
        let declaration = format!("type {name} {}", struct_body(&lines));

        let mut fields = Vec::with_capacity(lines.len());
        for (field, line) in account.data.fields.iter().zip(&lines) {
            let default_literal = match &field.default_value {
                Some(value) => Some(types.render_value(value, &field.r#type, &ctx.field(&line.name))?),
                None => None,
            };
            fields.push(DiscriminatedField {
                schema_name: &field.name,
                go_name: line.name.clone(),
                type_syntax: line.type_syntax.clone(),
                default_literal,
            });
        }
        let discriminators = self.discriminator_constants(
            types,
            &name,
            &account.discriminators,
            &fields,
            &mut manifest.dependencies,
        )?;

        let finder = match &account.pda {
            Some(link) => Some(self.pda_finder(scope, types, &name, link)?),
            None => None,
        };

        let page = AccountPage {
            name: &name,
            docs: &account.docs,
            declaration: &declaration,
            discriminators: &discriminators,
            finder: finder.as_ref(),
        };
        let mut body = account_body(&page);
        body.dependencies.merge(&manifest.dependencies);

        let mut map = RenderMap::new();
        map.add(
            format!("{}.go", to_snake_case(&account.name)),
            self.file(body, manifest.nested_declarations),
        );
        Ok(map)
    }

    fn visit_instruction(
        &self,
        program: &ProgramNode,
        types: &TypeGenerator<'_>,
        instruction: &InstructionNode,
    ) -> Result<RenderMap> {
        tracing::debug!(instruction = %instruction.name, "visiting instruction");
        let name = to_pascal_case(&instruction.name);
        let ctx = NamingContext::nested(&name);

        let account_names: BTreeSet<String> = instruction
            .accounts
            .iter()
            .map(|account| to_pascal_case(&account.name))
            .collect();

        let mut manifest = TypeManifest::default();
        let mut lines = Vec::with_capacity(instruction.arguments.len());
        let mut items = Vec::with_capacity(instruction.arguments.len());
        let mut fields = Vec::with_capacity(instruction.arguments.len());

        for argument in &instruction.arguments {
            let pascal = to_pascal_case(&argument.name);
            let go_name = if account_names.contains(&pascal) {
                tracing::warn!(
                    instruction = %instruction.name,
                    argument = %argument.name,
                    "instruction argument collides with an account, renaming to {pascal}Arg"
                );
                format!("{pascal}Arg")
            } else {
                pascal.clone()
            };

            let argument_manifest = types.visit(&argument.r#type, &ctx.field(&pascal))?;
            let optional = argument_manifest.option_field;
            let type_syntax = manifest.absorb(argument_manifest);

            let default_value = match &argument.default_value {
                Some(InstructionInputValueNode::Value(value)) => Some(value),
                Some(InstructionInputValueNode::Contextual(value)) => {
                    tracing::warn!(
                        instruction = %instruction.name,
                        argument = %argument.name,
                        kind = value.kind(),
                        "ignoring argument default resolved at assembly time"
                    );
                    None
                }
                None => None,
            };
            let default_literal = match default_value {
                Some(value) => {
                    let literal = types.render_value(value, &argument.r#type, &ctx.field(&pascal))?;
                    manifest.dependencies.merge(&literal.dependencies);
                    Some(literal)
                }
                None => None,
            };

            lines.push(FieldLine {
                name: go_name.clone(),
                type_syntax: type_syntax.clone(),
                optional,
                annotation: default_literal
                    .as_ref()
                    .map(|literal| format!("default: {}", literal.expression)),
                docs: argument.docs.clone(),
            });
            items.push(FieldItem {
                name: go_name.clone(),
                type_syntax: type_syntax.clone(),
                optional,
                default_literal: default_literal
                    .as_ref()
                    .map(|literal| literal.expression.clone()),
                omitted: argument.default_value_strategy == Some(DefaultValueStrategy::Omitted),
            });
            fields.push(DiscriminatedField {
                schema_name: &argument.name,
                go_name,
                type_syntax,
                default_literal,
            });
        }

        let discriminators = self.discriminator_constants(
            types,
            &name,
            &instruction.discriminators,
            &fields,
            &mut manifest.dependencies,
        )?;
        let accounts = instruction
            .accounts
            .iter()
            .map(|account| -> Result<AccountMetaItem> {
                let default_literal = match &account.default_value {
                    Some(InstructionInputValueNode::Value(
                        value @ (ValueNode::PublicKey { .. } | ValueNode::ProgramId),
                    )) => {
                        let literal = types.values().render(value)?;
                        manifest.dependencies.merge(&literal.dependencies);
                        Some(literal.expression)
                    }
                    Some(value) => {
                        tracing::warn!(
                            instruction = %instruction.name,
                            account = %account.name,
                            kind = value.kind(),
                            "ignoring account default that is not an address"
                        );
                        None
                    }
                    None => None,
                };
                Ok(AccountMetaItem {
                    name: to_pascal_case(&account.name),
                    writable: account.is_writable,
                    signer: match account.is_signer {
                        SignerFlag::Fixed(true) => SignerMode::Always,
                        SignerFlag::Fixed(false) => SignerMode::Never,
                        SignerFlag::Either(_) => SignerMode::Either,
                    },
                    optional: account.is_optional,
                    default_literal,
                    docs: account.docs.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let data_struct = struct_body(&lines);
        let program_id = program_id_ident(program);
        let page = InstructionPage {
            name: &name,
            docs: &instruction.docs,
            discriminators: &discriminators,
            fields: &items,
            data_struct: &data_struct,
            accounts: &accounts,
            program_id: &program_id,
            optional_account_strategy: instruction.optional_account_strategy,
        };
        let mut body = instruction_body(&page);
        body.dependencies.merge(&manifest.dependencies);

        let mut map = RenderMap::new();
        map.add(
            format!("{}_instruction.go", to_snake_case(&instruction.name)),
            self.file(body, manifest.nested_declarations),
        );
        Ok(map)
    }

    fn discriminator_constants(
        &self,
        types: &TypeGenerator<'_>,
        owner: &str,
        discriminators: &[DiscriminatorNode],
        fields: &[DiscriminatedField<'_>],
        dependencies: &mut DependencySet,
    ) -> Result<Vec<DiscriminatorConstant>> {
        let mut constants = Vec::with_capacity(discriminators.len());
        for discriminator in discriminators {
            let ordinal = constants
                .iter()
                .filter(|c: &&DiscriminatorConstant| {
                    !matches!(c.kind, DiscriminatorKind::Size { .. })
                })
                .count();
            let name = match ordinal {
                0 => format!("{owner}Discriminator"),
                n => format!("{owner}Discriminator{}", n + 1),
            };

            match discriminator {
                DiscriminatorNode::Constant { constant, offset } => {
                    let literal = types.values().fold_constant(constant)?;
                    dependencies.merge(&literal.dependencies);
                    constants.push(DiscriminatorConstant {
                        name,
                        kind: DiscriminatorKind::Bytes { offset: *offset },
                        literal: literal.expression,
                    });
                }
                DiscriminatorNode::Size { size } => constants.push(DiscriminatorConstant {
                    name: format!("{owner}Size"),
                    kind: DiscriminatorKind::Size { size: *size },
                    literal: size.to_string(),
                }),
                DiscriminatorNode::Field { name: field, .. } => {
                    let Some(target) = fields.iter().find(|f| f.schema_name == field.as_str()) else {
                        return Err(CodegenError::UnresolvedLink {
                            kind: "discriminator field",
                            name: field.clone(),
                        });
                    };
                    let Some(literal) = &target.default_literal else {
                        tracing::warn!(
                            owner,
                            field = %field,
                            "field discriminator without a default value, skipping"
                        );
                        continue;
                    };
                    dependencies.merge(&literal.dependencies);
                    constants.push(DiscriminatorConstant {
                        name,
                        kind: DiscriminatorKind::Field {
                            field: target.go_name.clone(),
                            type_syntax: target.type_syntax.clone(),
                        },
                        literal: literal.expression.clone(),
                    });
                }
            }
        }
        Ok(constants)
    }

    fn pda_finder(
        &self,
        scope: ProgramScope<'_>,
        types: &TypeGenerator<'_>,
        account: &str,
        link: &PdaLinkNode,
    ) -> Result<PdaFinder> {
        let (owner, pda) = scope.registry.pda(link, scope.program)?;
        let owner_id = program_id_ident(owner);
        let mut dependencies = DependencySet::new();
        let mut params = Vec::new();
        let mut seeds = Vec::with_capacity(pda.seeds.len());

        for seed in &pda.seeds {
            match seed {
                PdaSeedNode::Variable { name, r#type, .. } => {
                    let param = param_name(name);
                    let ctx = NamingContext::nested(format!("{account}{}", to_pascal_case(name)));
                    let mut manifest = types.visit(r#type, &ctx)?;
                    let type_syntax = std::mem::take(&mut manifest.type_syntax);
                    dependencies.merge(&manifest.dependencies);

                    let (expression, seed_dependencies) = variable_seed(&param, &type_syntax)?;
                    dependencies.merge(&seed_dependencies);
                    params.push((param, type_syntax));
                    seeds.push(expression);
                }
                PdaSeedNode::Constant { value, .. } if matches!(value, ValueNode::ProgramId) => {
                    seeds.push(format!("{owner_id}.Bytes()"));
                }
                PdaSeedNode::Constant { value, .. } if matches!(value, ValueNode::PublicKey { .. }) => {
                    let literal = types.values().render(value)?;
                    dependencies.merge(&literal.dependencies);
                    seeds.push(format!("{}.Bytes()", literal.expression));
                }
                PdaSeedNode::Constant { r#type, value } => {
                    let constant = ConstantValueNode {
                        r#type: Box::new(r#type.clone()),
                        value: Box::new(value.clone()),
                    };
                    let literal = types.values().fold_constant(&constant)?;
                    dependencies.merge(&literal.dependencies);
                    seeds.push(literal.expression);
                }
            }
        }

        Ok(PdaFinder {
            params,
            seeds,
            program_id: owner_id,
            dependencies,
        })
    }

    fn file(&self, body: PageBody, declarations: Vec<String>) -> String {
        GoFile {
            package_name: self.options.package_name.clone(),
            imports: body.dependencies.render(&self.options.dependency_map),
            declarations,
            body: body.body,
        }
        .render()
    }
}

/// Go identifier of a program's address variable.
#[must_use]
pub fn program_id_ident(program: &ProgramNode) -> String {
    format!("{}ProgramID", to_pascal_case(&program.name))
}

/// Renders a variable seed parameter as a `[]byte` expression.
fn variable_seed(param: &str, type_syntax: &str) -> Result<(String, DependencySet)> {
    let mut dependencies = DependencySet::new();
    let expression = match type_syntax {
        "ag_solanago.PublicKey" => format!("{param}.Bytes()"),
        "string" => format!("[]byte({param})"),
        "[]byte" => param.to_string(),
        "uint8" => format!("[]byte{{{param}}}"),
        "int8" => format!("[]byte{{byte({param})}}"),
        "uint16" | "uint32" | "uint64" => {
            dependencies.add(ENCODING_BINARY);
            format!(
                "binary.LittleEndian.AppendUint{}(nil, {param})",
                &type_syntax[4..]
            )
        }
        "int16" | "int32" | "int64" => {
            dependencies.add(ENCODING_BINARY);
            let bits = &type_syntax[3..];
            format!("binary.LittleEndian.AppendUint{bits}(nil, uint{bits}({param}))")
        }
        "float32" | "float64" => {
            dependencies.add(ENCODING_BINARY).add(MATH);
            let bits = &type_syntax[5..];
            format!("binary.LittleEndian.AppendUint{bits}(nil, math.Float{bits}bits({param}))")
        }
        array if array.starts_with('[') && array.ends_with("]byte") => format!("{param}[:]"),
        other => {
            return Err(CodegenError::generation(format!(
                "seed '{param}' of type {other} cannot be converted to bytes"
            )));
        }
    };
    Ok((expression, dependencies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use borshgo_schema::{
        ContextualValueNode, InstructionAccountNode, InstructionArgumentNode, NumberFormat,
        PdaNode, StructFieldTypeNode, StructTypeNode, TupleTypeNode, TypeNode,
    };
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            let buffer = self.0.lock().expect("log buffer");
            String::from_utf8_lossy(&buffer).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn generate_with_logs(root: &RootNode, options: &RenderOptions) -> (RenderMap, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let map = tracing::subscriber::with_default(subscriber, || {
            Generator::new(root, options).generate().expect("generate")
        });
        (map, logs.contents())
    }

    const SYSTEM: &str = "11111111111111111111111111111111";

    fn options() -> RenderOptions {
        RenderOptions::default().with_package_name("pump")
    }

    fn generate(root: &RootNode) -> RenderMap {
        Generator::new(root, &options()).generate().expect("generate")
    }

    fn content<'m>(map: &'m RenderMap, path: &str) -> &'m str {
        map.get(path)
            .map(|fragment| fragment.content.as_str())
            .unwrap_or_else(|| panic!("missing {path}"))
    }

    #[test]
    fn test_program_without_errors_has_no_errors_file() {
        let root = RootNode::new(ProgramNode::new("pump", SYSTEM));
        let map = generate(&root);
        assert!(map.get("pump_program.go").is_some());
        assert!(map.contains_path("pump_errors.go"));
        assert!(map.get("pump_errors.go").is_none());
        assert!(map.get(INDEX_PATH).is_none());
    }

    #[test]
    fn test_argument_colliding_with_account_is_suffixed() {
        let mut instruction = InstructionNode::new("setAuthority");
        instruction.accounts = vec![InstructionAccountNode::new("authority")];
        instruction.arguments = vec![InstructionArgumentNode::new(
            "authority",
            TypeNode::PublicKey,
        )];
        let mut program = ProgramNode::new("pump", SYSTEM);
        program.instructions = vec![instruction];

        let (map, logs) = generate_with_logs(&RootNode::new(program), &options());
        assert!(logs.contains("WARN"));
        assert!(logs.contains("renaming to AuthorityArg"));
        assert!(logs.contains("argument=authority"));
        let file = content(&map, "set_authority_instruction.go");
        assert!(file.contains("\tAuthorityArg ag_solanago.PublicKey\n"));
        assert!(file.contains("\tAuthority ag_solanago.PublicKey\n"));
        assert!(content(&map, INDEX_PATH).contains("\"setAuthority\","));
    }

    #[test]
    fn test_contextual_defaults_are_skipped_with_a_warning() {
        let mut curve = InstructionAccountNode::new("bondingCurve");
        curve.default_value = Some(InstructionInputValueNode::Contextual(
            ContextualValueNode::Pda {
                pda: PdaLinkNode {
                    name: "bondingCurve".into(),
                    program: None,
                },
            },
        ));
        let mut payer = InstructionAccountNode::new("payer");
        payer.default_value = Some(InstructionInputValueNode::Contextual(ContextualValueNode::Payer));
        let mut system = InstructionAccountNode::new("systemProgram");
        system.default_value = Some(ValueNode::PublicKey {
            public_key: SYSTEM.into(),
            identifier: None,
        }
        .into());
        let mut bump = InstructionArgumentNode::new("bump", TypeNode::number(NumberFormat::U8));
        bump.default_value = Some(InstructionInputValueNode::Contextual(
            ContextualValueNode::AccountBump {
                name: "bondingCurve".into(),
            },
        ));

        let mut instruction = InstructionNode::new("create");
        instruction.accounts = vec![curve, payer, system];
        instruction.arguments = vec![bump];
        let mut program = ProgramNode::new("pump", SYSTEM);
        program.instructions = vec![instruction];

        let (map, logs) = generate_with_logs(&RootNode::new(program), &options());
        assert!(logs.contains("ignoring account default that is not an address"));
        assert!(logs.contains("kind=\"pdaValueNode\"") || logs.contains("kind=pdaValueNode"));
        assert!(logs.contains("ignoring argument default resolved at assembly time"));

        let file = content(&map, "create_instruction.go");
        assert!(!file.contains("accounts.BondingCurve.IsZero()"));
        assert!(!file.contains("accounts.Payer.IsZero()"));
        assert!(file.contains("\tif accounts.SystemProgram.IsZero() {\n"));
        assert!(!file.contains("NewCreateInstructionData"));
    }

    #[test]
    fn test_tuple_argument_default_annotation_is_single_line() {
        let pair = TypeNode::Tuple(TupleTypeNode {
            items: vec![
                TypeNode::number(NumberFormat::U8),
                TypeNode::number(NumberFormat::U16),
            ],
        });
        let mut argument = InstructionArgumentNode::new("range", pair);
        argument.default_value = Some(
            ValueNode::Tuple {
                items: vec![ValueNode::number(1u64), ValueNode::number(2u64)],
            }
            .into(),
        );
        let mut instruction = InstructionNode::new("swap");
        instruction.arguments = vec![argument];
        let mut program = ProgramNode::new("pump", SYSTEM);
        program.instructions = vec![instruction];

        let map = generate(&RootNode::new(program));
        let file = content(&map, "swap_instruction.go");
        assert!(file.contains(
            "\t} // default: struct { Field0 uint8; Field1 uint16 }{1, 2}\n"
        ));
        assert!(file.contains(
            "\t\tRange: struct {\n\t\t\tField0 uint8\n\t\t\tField1 uint16\n\t\t}{1, 2},\n"
        ));
    }

    #[test]
    fn test_preserved_files_keep_existing_content() {
        let root = RootNode::new(ProgramNode::new("pump", SYSTEM));
        let options = options()
            .with_preserved_file("pump_program.go")
            .with_preserved_file("hooks.go");
        let (map, logs) = generate_with_logs(&root, &options);
        assert!(!map.get("pump_program.go").expect("program page").overwrite);
        assert!(logs.contains("preserved file is not generated"));
        assert!(logs.contains("hooks.go"));
    }

    #[test]
    fn test_account_with_discriminator_and_pda() {
        let mut account = AccountNode::new(
            "bondingCurve",
            StructTypeNode::new(vec![StructFieldTypeNode::new(
                "reserves",
                TypeNode::number(NumberFormat::U64),
            )]),
        );
        account.discriminators = vec![DiscriminatorNode::Constant {
            constant: ConstantValueNode {
                r#type: Box::new(TypeNode::Bytes),
                value: Box::new(ValueNode::hex_bytes("0102")),
            },
            offset: 0,
        }];
        account.pda = Some(PdaLinkNode {
            name: "bondingCurve".into(),
            program: None,
        });

        let mut program = ProgramNode::new("pump", SYSTEM);
        program.pdas = vec![PdaNode {
            name: "bondingCurve".into(),
            seeds: vec![
                PdaSeedNode::Constant {
                    r#type: TypeNode::String(Default::default()),
                    value: ValueNode::string("bonding-curve"),
                },
                PdaSeedNode::Variable {
                    name: "mint".into(),
                    r#type: TypeNode::PublicKey,
                    docs: Vec::new(),
                },
            ],
            docs: Vec::new(),
        }];
        program.accounts = vec![account];

        let map = generate(&RootNode::new(program));
        let file = content(&map, "bonding_curve.go");
        assert!(file.starts_with("// Code generated by borshgo. DO NOT EDIT.\n\npackage pump\n"));
        assert!(file.contains("var BondingCurveDiscriminator = []byte{0x01, 0x02}"));
        assert!(file.contains("type BondingCurve struct {\n\tReserves uint64\n}"));
        assert!(file.contains("\t\t[]byte(\"bonding-curve\"),\n\t\tmint.Bytes(),\n"));
        assert!(file.contains("ag_solanago.FindProgramAddress(seeds, PumpProgramID)"));
        assert!(file.contains("\t\"bytes\"\n"));
        assert!(file.contains("\tag_solanago \"github.com/gagliardetto/solana-go\"\n"));
    }

    #[test]
    fn test_unknown_pda_link_fails() {
        let mut account = AccountNode::new("curve", StructTypeNode::default());
        account.pda = Some(PdaLinkNode {
            name: "missing".into(),
            program: None,
        });
        let mut program = ProgramNode::new("pump", SYSTEM);
        program.accounts = vec![account];

        let root = RootNode::new(program);
        let err = Generator::new(&root, &options()).generate().unwrap_err();
        assert!(matches!(err, CodegenError::UnresolvedLink { kind: "pda", .. }));
    }

    #[test]
    fn test_colliding_paths_fail() {
        let mut program = ProgramNode::new("pump", SYSTEM);
        program.defined_types = vec![
            DefinedTypeNode::new("fee", TypeNode::number(NumberFormat::U8)),
            DefinedTypeNode::new("Fee", TypeNode::number(NumberFormat::U16)),
        ];
        let root = RootNode::new(program);
        let err = Generator::new(&root, &options()).generate().unwrap_err();
        assert!(matches!(err, CodegenError::PathCollision { ref path } if path == "fee.go"));
    }

    #[test]
    fn test_variable_seed_expressions() {
        assert_eq!(variable_seed("a", "uint8").expect("u8").0, "[]byte{a}");
        assert_eq!(
            variable_seed("a", "uint32").expect("u32").0,
            "binary.LittleEndian.AppendUint32(nil, a)"
        );
        assert_eq!(
            variable_seed("a", "int64").expect("i64").0,
            "binary.LittleEndian.AppendUint64(nil, uint64(a))"
        );
        assert_eq!(variable_seed("a", "[32]byte").expect("array").0, "a[:]");
        assert!(variable_seed("a", "map[uint8]uint8").is_err());
    }
}
