//! File page layout.
//!
//! Pages arrange already-lowered type syntax and literals into Go file
//! bodies. They never lower schema nodes themselves: every type and literal
//! comes in as text from the type and value generators.

use crate::dependencies::{BINARY, BYTES, DependencySet, FMT, SOLANA};
use crate::go::quote;
use crate::manifest::doc_comment;
use borshgo_schema::{ErrorNode, OptionalAccountStrategy, to_camel_case};

/// Header line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by borshgo. DO NOT EDIT.";

/// Text of one Go file before it is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoFile {
    /// Go package name.
    pub package_name: String,
    /// Rendered import block, possibly empty.
    pub imports: String,
    /// Hoisted declarations.
    pub declarations: Vec<String>,
    /// Entity body.
    pub body: String,
}

impl GoFile {
    /// Assembles the file text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = format!("{GENERATED_HEADER}\n\npackage {}\n\n", self.package_name);
        if !self.imports.is_empty() {
            output.push_str(&self.imports);
            output.push('\n');
        }
        for declaration in &self.declarations {
            output.push_str(declaration);
            output.push_str("\n\n");
        }
        output.push_str(self.body.trim_end());
        output.push('\n');
        output
    }
}

/// Body text of a page and the modules it references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageBody {
    /// Go source.
    pub body: String,
    /// Referenced modules.
    pub dependencies: DependencySet,
}

/// How a discriminator identifies its entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscriminatorKind {
    /// `[]byte` constant expected at `offset`.
    Bytes {
        /// Byte offset.
        offset: usize,
    },
    /// Expected value of a data field.
    Field {
        /// Go field name.
        field: String,
        /// Go type of the field.
        type_syntax: String,
    },
    /// Expected total data size.
    Size {
        /// Size in bytes.
        size: usize,
    },
}

/// Named discriminator constant of an account or instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminatorConstant {
    /// Go identifier.
    pub name: String,
    /// Discriminator shape.
    pub kind: DiscriminatorKind,
    /// Go expression of the expected value.
    pub literal: String,
}

impl DiscriminatorConstant {
    /// Renders the Go declaration of the constant.
    #[must_use]
    pub fn declaration(&self) -> String {
        match &self.kind {
            DiscriminatorKind::Bytes { .. } => format!("var {} = {}", self.name, self.literal),
            DiscriminatorKind::Field { type_syntax, .. } => {
                format!("var {} {} = {}", self.name, type_syntax, self.literal)
            }
            DiscriminatorKind::Size { size } => format!("const {} = {size}", self.name),
        }
    }

    fn leading_bytes(&self) -> bool {
        matches!(self.kind, DiscriminatorKind::Bytes { offset: 0 })
    }
}

/// Address derivation function of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdaFinder {
    /// Parameters as `(name, type)` pairs.
    pub params: Vec<(String, String)>,
    /// Seed expressions, each a `[]byte`.
    pub seeds: Vec<String>,
    /// Identifier of the owning program address.
    pub program_id: String,
    /// Seed modules.
    pub dependencies: DependencySet,
}

/// Account page input.
#[derive(Debug, Clone)]
pub struct AccountPage<'a> {
    /// Go type name.
    pub name: &'a str,
    /// Doc lines.
    pub docs: &'a [String],
    /// Struct declaration.
    pub declaration: &'a str,
    /// Discriminator constants.
    pub discriminators: &'a [DiscriminatorConstant],
    /// Address derivation, when the account is a PDA.
    pub finder: Option<&'a PdaFinder>,
}

/// Renders an account page: declaration, discriminators, Borsh methods,
/// a decoding function and an address finder.
#[must_use]
pub fn account_body(page: &AccountPage<'_>) -> PageBody {
    let name = page.name;
    let mut dependencies = DependencySet::of([BINARY]);
    let mut output = doc_comment(page.docs);
    output.push_str(page.declaration);
    output.push_str("\n\n");
    push_discriminators(&mut output, page.discriminators);

    let leading = page.discriminators.iter().find(|d| d.leading_bytes());

    output.push_str(&format!(
        "func (obj {name}) MarshalWithEncoder(encoder *ag_binary.Encoder) error {{\n"
    ));
    if let Some(discriminator) = leading {
        output.push_str(&format!(
            "\tif err := encoder.WriteBytes({}, false); err != nil {{\n\t\treturn err\n\t}}\n",
            discriminator.name
        ));
    }
    output.push_str(&format!(
        "\ttype raw {name}\n\treturn encoder.Encode(raw(obj))\n}}\n\n"
    ));

    output.push_str(&format!(
        "func (obj *{name}) UnmarshalWithDecoder(decoder *ag_binary.Decoder) error {{\n"
    ));
    if let Some(discriminator) = leading {
        let constant = &discriminator.name;
        output.push_str(&format!(
            "\tdiscriminator, err := decoder.ReadNBytes(len({constant}))\n\
             \tif err != nil {{\n\t\treturn err\n\t}}\n\
             \tif !bytes.Equal(discriminator, {constant}) {{\n\
             \t\treturn fmt.Errorf(\"invalid {name} discriminator: %x\", discriminator)\n\t}}\n"
        ));
        dependencies.add(BYTES).add(FMT);
    }
    output.push_str(&format!(
        "\ttype raw {name}\n\treturn decoder.Decode((*raw)(obj))\n}}\n\n"
    ));

    output.push_str(&format!(
        "// Decode{name} decodes and checks {name} account data.\n\
         func Decode{name}(data []byte) (*{name}, error) {{\n"
    ));
    for discriminator in page.discriminators {
        let constant = &discriminator.name;
        match &discriminator.kind {
            DiscriminatorKind::Size { .. } => {
                output.push_str(&format!(
                    "\tif len(data) != {constant} {{\n\
                     \t\treturn nil, fmt.Errorf(\"invalid {name} size: %d\", len(data))\n\t}}\n"
                ));
                dependencies.add(FMT);
            }
            DiscriminatorKind::Bytes { offset } if *offset > 0 => {
                output.push_str(&format!(
                    "\tif len(data) < {offset}+len({constant}) || \
                     !bytes.Equal(data[{offset}:{offset}+len({constant})], {constant}) {{\n\
                     \t\treturn nil, fmt.Errorf(\"invalid {name} discriminator at offset {offset}\")\n\t}}\n"
                ));
                dependencies.add(BYTES).add(FMT);
            }
            _ => {}
        }
    }
    output.push_str(&format!(
        "\tobj := new({name})\n\
         \tif err := obj.UnmarshalWithDecoder(ag_binary.NewBorshDecoder(data)); err != nil {{\n\
         \t\treturn nil, err\n\t}}\n"
    ));
    for discriminator in page.discriminators {
        if let DiscriminatorKind::Field { field, type_syntax } = &discriminator.kind {
            if is_comparable(type_syntax) {
                output.push_str(&format!(
                    "\tif obj.{field} != {} {{\n\
                     \t\treturn nil, fmt.Errorf(\"invalid {name} {field}: %v\", obj.{field})\n\t}}\n",
                    discriminator.name
                ));
                dependencies.add(FMT);
            }
        }
    }
    output.push_str("\treturn obj, nil\n}\n");

    if let Some(finder) = page.finder {
        output.push('\n');
        output.push_str(&finder_function(name, finder));
        dependencies.add(SOLANA).merge(&finder.dependencies);
    }

    PageBody {
        body: output,
        dependencies,
    }
}

fn finder_function(name: &str, finder: &PdaFinder) -> String {
    let params = finder
        .params
        .iter()
        .map(|(param, type_syntax)| format!("{param} {type_syntax}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut output = format!(
        "// Find{name}Address derives the address of a {name} account.\n\
         func Find{name}Address({params}) (ag_solanago.PublicKey, uint8, error) {{\n"
    );
    if finder.seeds.is_empty() {
        output.push_str("\tseeds := [][]byte{}\n");
    } else {
        output.push_str("\tseeds := [][]byte{\n");
        for seed in &finder.seeds {
            output.push_str(&format!("\t\t{seed},\n"));
        }
        output.push_str("\t}\n");
    }
    output.push_str(&format!(
        "\treturn ag_solanago.FindProgramAddress(seeds, {})\n}}\n",
        finder.program_id
    ));
    output
}

/// Data argument of an instruction page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldItem {
    /// Go field name.
    pub name: String,
    /// Go type.
    pub type_syntax: String,
    /// Whether the field is a Borsh option.
    pub optional: bool,
    /// Default value expression.
    pub default_literal: Option<String>,
    /// Whether the default is always applied by the builder.
    pub omitted: bool,
}

/// Signing requirement of an instruction account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerMode {
    /// Never signs.
    Never,
    /// Always signs.
    Always,
    /// Decided by the caller.
    Either,
}

/// Account parameter of an instruction page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMetaItem {
    /// Go field name.
    pub name: String,
    /// Writable flag.
    pub writable: bool,
    /// Signing requirement.
    pub signer: SignerMode,
    /// Whether the caller may leave the account out.
    pub optional: bool,
    /// Address used when the caller leaves the account unset.
    pub default_literal: Option<String>,
    /// Doc lines.
    pub docs: Vec<String>,
}

/// Instruction page input.
#[derive(Debug, Clone)]
pub struct InstructionPage<'a> {
    /// PascalCase instruction name.
    pub name: &'a str,
    /// Doc lines.
    pub docs: &'a [String],
    /// Discriminator constants.
    pub discriminators: &'a [DiscriminatorConstant],
    /// Data arguments.
    pub fields: &'a [FieldItem],
    /// `struct { ... }` body of the data type.
    pub data_struct: &'a str,
    /// Account parameters.
    pub accounts: &'a [AccountMetaItem],
    /// Identifier of the program address.
    pub program_id: &'a str,
    /// Handling of missing optional accounts.
    pub optional_account_strategy: OptionalAccountStrategy,
}

/// Renders an instruction page: data and accounts types, discriminators and
/// a `New<Name>Instruction` builder.
#[must_use]
pub fn instruction_body(page: &InstructionPage<'_>) -> PageBody {
    let name = page.name;
    let data = format!("{name}InstructionData");
    let accounts = format!("{name}Accounts");
    let mut dependencies = DependencySet::of([BINARY, BYTES, SOLANA]);

    let mut output = String::new();
    push_discriminators(&mut output, page.discriminators);

    output.push_str(&doc_comment(page.docs));
    if page.docs.is_empty() {
        output.push_str(&format!(
            "// {data} holds the arguments of the {name} instruction.\n"
        ));
    }
    output.push_str(&format!("type {data} {}\n\n", page.data_struct));

    let defaults: Vec<_> = page
        .fields
        .iter()
        .filter_map(|field| {
            field
                .default_literal
                .as_ref()
                .filter(|_| !field.omitted)
                .map(|literal| (&field.name, literal))
        })
        .collect();
    if !defaults.is_empty() {
        output.push_str(&format!(
            "// New{data} returns instruction data populated with its default values.\n\
             func New{data}() {data} {{\n\treturn {data}{{\n"
        ));
        for (field, literal) in defaults {
            let literal = literal.replace('\n', "\n\t\t");
            output.push_str(&format!("\t\t{field}: {literal},\n"));
        }
        output.push_str("\t}\n}\n\n");
    }

    output.push_str(&format!("type {accounts} struct"));
    if page.accounts.is_empty() {
        output.push_str("{}\n\n");
    } else {
        output.push_str(" {\n");
        for account in page.accounts {
            for doc in &account.docs {
                output.push_str(&format!("\t// {doc}\n"));
            }
            let type_syntax = if account.optional {
                "*ag_solanago.PublicKey"
            } else {
                "ag_solanago.PublicKey"
            };
            output.push_str(&format!("\t{} {type_syntax}\n", account.name));
            if account.signer == SignerMode::Either {
                output.push_str(&format!("\t{}IsSigner bool\n", account.name));
            }
        }
        output.push_str("}\n\n");
    }

    output.push_str(&format!(
        "// New{name}Instruction builds a {name} instruction.\n\
         func New{name}Instruction(accounts {accounts}, data {data}) (*ag_solanago.GenericInstruction, error) {{\n"
    ));
    for field in page.fields.iter().filter(|field| field.omitted) {
        if let Some(literal) = &field.default_literal {
            let literal = literal.replace('\n', "\n\t");
            output.push_str(&format!("\tdata.{} = {literal}\n", field.name));
        }
    }
    for account in page.accounts.iter().filter(|account| !account.optional) {
        if let Some(literal) = &account.default_literal {
            output.push_str(&format!(
                "\tif accounts.{0}.IsZero() {{\n\t\taccounts.{0} = {literal}\n\t}}\n",
                account.name
            ));
        }
    }

    output.push_str("\tbuf := new(bytes.Buffer)\n");
    if let Some(discriminator) = page.discriminators.iter().find(|d| d.leading_bytes()) {
        output.push_str(&format!("\tbuf.Write({})\n", discriminator.name));
    }
    output.push_str(
        "\tif err := ag_binary.NewBorshEncoder(buf).Encode(data); err != nil {\n\t\treturn nil, err\n\t}\n",
    );

    output.push_str("\tmetas := ag_solanago.AccountMetaSlice{}\n");
    for account in page.accounts {
        output.push_str(&account_meta_lines(
            account,
            page.program_id,
            page.optional_account_strategy,
        ));
    }
    output.push_str(&format!(
        "\treturn ag_solanago.NewInstruction({}, metas, buf.Bytes()), nil\n}}\n",
        page.program_id
    ));

    PageBody {
        body: output,
        dependencies,
    }
}

fn account_meta_lines(
    account: &AccountMetaItem,
    program_id: &str,
    strategy: OptionalAccountStrategy,
) -> String {
    let field = format!("accounts.{}", account.name);
    if !account.optional {
        return append_meta(account, &field, 1);
    }

    let mut output = format!(
        "\tif {field} != nil {{\n{}",
        append_meta(account, &format!("*{field}"), 2)
    );
    match (&account.default_literal, strategy) {
        (Some(literal), _) => {
            output.push_str(&format!("\t}} else {{\n{}", append_meta(account, literal, 2)));
        }
        (None, OptionalAccountStrategy::ProgramId) => {
            output.push_str(&format!(
                "\t}} else {{\n\t\tmetas.Append(ag_solanago.Meta({program_id}))\n"
            ));
        }
        (None, OptionalAccountStrategy::Omitted) => {}
    }
    output.push_str("\t}\n");
    output
}

fn append_meta(account: &AccountMetaItem, target: &str, depth: usize) -> String {
    let indent = "\t".repeat(depth);
    let writable = if account.writable { ".WRITE()" } else { "" };
    let line = |signer: &str| {
        format!("{indent}metas.Append(ag_solanago.Meta({target}){writable}{signer})\n")
    };
    match account.signer {
        SignerMode::Never => line(""),
        SignerMode::Always => line(".SIGNER()"),
        SignerMode::Either => format!(
            "{indent}if accounts.{}IsSigner {{\n\t{}{indent}}} else {{\n\t{}{indent}}}\n",
            account.name,
            line(".SIGNER()"),
            line("")
        ),
    }
}

/// Renders the program page: name, version and address.
#[must_use]
pub fn program_body(program: &str, name: &str, version: &str, public_key: &str, docs: &[String]) -> PageBody {
    let mut output = doc_comment(docs);
    output.push_str(&format!("const {program}ProgramName = {}\n\n", quote(name)));
    if !version.is_empty() {
        output.push_str(&format!(
            "const {program}ProgramVersion = {}\n\n",
            quote(version)
        ));
    }
    if public_key.is_empty() {
        output.push_str(&format!("var {program}ProgramID ag_solanago.PublicKey\n"));
    } else {
        output.push_str(&format!(
            "var {program}ProgramID = ag_solanago.MustPublicKeyFromBase58({})\n",
            quote(public_key)
        ));
    }
    PageBody {
        body: output,
        dependencies: DependencySet::of([SOLANA]),
    }
}

/// Renders the errors page of a program with at least one error.
#[must_use]
pub fn errors_body(program: &str, errors: &[ErrorNode]) -> PageBody {
    let error_type = format!("{program}Error");
    let lookup = format!("{}ErrorsByCode", to_camel_case(program));

    let mut output = format!(
        "// {error_type} is an error returned by the {program} program.\n\
         type {error_type} struct {{\n\tCode    uint32\n\tName    string\n\tMessage string\n}}\n\n\
         func (e *{error_type}) Error() string {{\n\
         \treturn fmt.Sprintf(\"%s (%d): %s\", e.Name, e.Code, e.Message)\n}}\n\n"
    );

    output.push_str("var (\n");
    for error in errors {
        let ident = format!("{error_type}{}", borshgo_schema::to_pascal_case(&error.name));
        for doc in &error.docs {
            output.push_str(&format!("\t// {doc}\n"));
        }
        output.push_str(&format!(
            "\t{ident} = &{error_type}{{Code: {}, Name: {}, Message: {}}}\n",
            error.code,
            quote(&borshgo_schema::to_pascal_case(&error.name)),
            quote(&error.message)
        ));
    }
    output.push_str(")\n\n");

    output.push_str(&format!("var {lookup} = map[uint32]*{error_type}{{\n"));
    for error in errors {
        output.push_str(&format!(
            "\t{}: {error_type}{},\n",
            error.code,
            borshgo_schema::to_pascal_case(&error.name)
        ));
    }
    output.push_str("}\n\n");

    output.push_str(&format!(
        "// {error_type}FromCode returns the {program} error with the given code.\n\
         func {error_type}FromCode(code uint32) (*{error_type}, bool) {{\n\
         \terr, ok := {lookup}[code]\n\treturn err, ok\n}}\n"
    ));

    PageBody {
        body: output,
        dependencies: DependencySet::of([FMT]),
    }
}

/// Renders the root index listing exported instructions per program.
#[must_use]
pub fn index_body(programs: &[(String, Vec<String>)]) -> PageBody {
    let mut output = String::new();
    for (program, instructions) in programs {
        output.push_str(&format!(
            "// {program}InstructionNames lists the instructions exported for {program}.\n\
             var {program}InstructionNames = []string{{\n"
        ));
        for instruction in instructions {
            output.push_str(&format!("\t{},\n", quote(instruction)));
        }
        output.push_str("}\n\n");
    }
    PageBody {
        body: output,
        dependencies: DependencySet::new(),
    }
}

fn push_discriminators(output: &mut String, discriminators: &[DiscriminatorConstant]) {
    if discriminators.is_empty() {
        return;
    }
    for discriminator in discriminators {
        output.push_str(&discriminator.declaration());
        output.push('\n');
    }
    output.push('\n');
}

/// Returns true if values of the type can be compared with `!=`.
fn is_comparable(type_syntax: &str) -> bool {
    const SCALARS: &[&str] = &[
        "bool",
        "string",
        "uint8",
        "uint16",
        "uint32",
        "uint64",
        "int8",
        "int16",
        "int32",
        "int64",
        "float32",
        "float64",
        "ag_solanago.PublicKey",
    ];
    SCALARS.contains(&type_syntax)
        || (type_syntax.starts_with('[')
            && !type_syntax.starts_with("[]")
            && type_syntax.ends_with("]byte"))
}
