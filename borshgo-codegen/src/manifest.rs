//! Type manifests and struct body layout.

use crate::dependencies::DependencySet;

/// Result of lowering one schema type node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeManifest {
    /// Type reference, or a full declaration for top-level shapes.
    pub type_syntax: String,
    /// Named declarations to hoist to the top of the file, in discovery order.
    pub nested_declarations: Vec<String>,
    /// Modules referenced by the syntax and the declarations.
    pub dependencies: DependencySet,
    /// Set when the node is an option, so the enclosing field can tag it.
    pub option_field: bool,
}

impl TypeManifest {
    /// Creates a manifest with the given syntax and nothing else.
    #[must_use]
    pub fn new(type_syntax: impl Into<String>) -> Self {
        Self {
            type_syntax: type_syntax.into(),
            ..Self::default()
        }
    }

    /// Adds a dependency.
    #[must_use]
    pub fn with_dependency(mut self, identifier: impl Into<String>) -> Self {
        self.dependencies.add(identifier);
        self
    }

    /// Appends a hoisted declaration unless an identical one is present.
    pub fn push_declaration(&mut self, declaration: String) {
        if !self.nested_declarations.contains(&declaration) {
            self.nested_declarations.push(declaration);
        }
    }

    /// Takes over the declarations and dependencies of `other` and returns
    /// its type syntax.
    pub fn absorb(&mut self, other: TypeManifest) -> String {
        for declaration in other.nested_declarations {
            self.push_declaration(declaration);
        }
        self.dependencies.merge(&other.dependencies);
        other.type_syntax
    }
}

/// One field line of a generated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    /// Go field name.
    pub name: String,
    /// Go type syntax.
    pub type_syntax: String,
    /// Tags the field as a Borsh option.
    pub optional: bool,
    /// Trailing comment, e.g. the default value.
    pub annotation: Option<String>,
    /// Doc comment lines.
    pub docs: Vec<String>,
}

impl FieldLine {
    /// Creates a plain field line.
    #[must_use]
    pub fn new(name: impl Into<String>, type_syntax: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_syntax: type_syntax.into(),
            optional: false,
            annotation: None,
            docs: Vec::new(),
        }
    }
}

/// Renders `struct { ... }` for the given fields.
///
/// Multi-line field types are indented one level deeper. An empty field
/// list renders as `struct{}`.
#[must_use]
pub fn struct_body(fields: &[FieldLine]) -> String {
    if fields.is_empty() {
        return "struct{}".to_string();
    }

    let mut output = String::from("struct {\n");
    for field in fields {
        for doc in &field.docs {
            output.push_str(&format!("\t// {doc}\n"));
        }
        let type_syntax = field.type_syntax.replace('\n', "\n\t");
        output.push_str(&format!("\t{} {}", field.name, type_syntax));
        if field.optional {
            output.push_str(" `bin:\"optional\"`");
        }
        if let Some(annotation) = &field.annotation {
            output.push_str(&format!(" // {}", single_line(annotation)));
        }
        output.push('\n');
    }
    output.push('}');
    output
}

/// Collapses a multi-line Go expression onto one line.
///
/// Comment lines and trailing comments are dropped. Lines are joined with a
/// space next to braces and with `; ` otherwise, which keeps inline struct
/// types valid Go.
#[must_use]
pub fn single_line(expression: &str) -> String {
    let mut output = String::new();
    for line in expression.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }
        if !output.is_empty() {
            let separator = if output.ends_with('{') || line.starts_with('}') {
                " "
            } else {
                "; "
            };
            output.push_str(separator);
        }
        output.push_str(line);
    }
    output
}

fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    let mut escaped = false;
    let mut previous_slash = false;
    for (index, ch) in line.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if ch == '\\' => escaped = true,
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '`' => quote = Some(ch),
            None if ch == '/' && previous_slash => return &line[..index - 1],
            None => {}
        }
        previous_slash = quote.is_none() && ch == '/';
    }
    line
}

/// Renders doc lines as Go line comments, each followed by a newline.
#[must_use]
pub fn doc_comment(docs: &[String]) -> String {
    docs.iter().map(|line| format!("// {line}\n")).collect()
}
