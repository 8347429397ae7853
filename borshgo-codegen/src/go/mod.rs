//! Go code generation modules.
//!
//! The helpers here hold the naming conventions shared by the type and value
//! generators, so that a literal always addresses the exact identifiers the
//! matching declaration introduced.

pub mod pages;
pub mod types;
pub mod values;

pub use pages::{AccountPage, DiscriminatorConstant, DiscriminatorKind, GoFile, InstructionPage};
pub use types::TypeGenerator;
pub use values::{ValueGenerator, ValueLiteral};

use crate::dependencies::{DependencySet, NAMESPACE_SEPARATOR};
use borshgo_schema::{NumberFormat, to_camel_case, to_pascal_case};
use std::collections::BTreeMap;

const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Identifier of an enum variant constant or constructor: `Enum_Variant`.
#[must_use]
pub fn enum_variant_ident(enum_name: &str, variant: &str) -> String {
    format!("{}_{}", to_pascal_case(enum_name), to_pascal_case(variant))
}

/// Name of the payload aggregate of a data enum variant: `EnumVariant`.
#[must_use]
pub fn enum_payload_name(enum_name: &str, variant: &str) -> String {
    format!("{}{}", to_pascal_case(enum_name), to_pascal_case(variant))
}

/// Go parameter name for a schema name, avoiding reserved words.
#[must_use]
pub fn param_name(name: &str) -> String {
    let ident = to_camel_case(name);
    if GO_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else {
        ident
    }
}

/// Go type of a fixed-width integer or float format.
#[must_use]
pub const fn number_type(format: NumberFormat) -> Option<&'static str> {
    match format {
        NumberFormat::U8 => Some("uint8"),
        NumberFormat::U16 => Some("uint16"),
        NumberFormat::U32 => Some("uint32"),
        NumberFormat::U64 => Some("uint64"),
        NumberFormat::I8 => Some("int8"),
        NumberFormat::I16 => Some("int16"),
        NumberFormat::I32 => Some("int32"),
        NumberFormat::I64 => Some("int64"),
        NumberFormat::F32 => Some("float32"),
        NumberFormat::F64 => Some("float64"),
        NumberFormat::U128 | NumberFormat::I128 | NumberFormat::ShortU16 => None,
    }
}

/// Quotes a string as a Go interpreted string literal.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut output = String::with_capacity(value.len() + 2);
    output.push('"');
    for c in value.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                output.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => output.push(c),
        }
    }
    output.push('"');
    output
}

/// Formats bytes as the body of a Go byte composite literal.
#[must_use]
pub fn byte_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{b:02x}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves defined type links to Go identifiers.
///
/// A link override naming a module with a `/` or `.` is an import path; the
/// identifier is qualified by its last path segment. Any other override is an
/// internal namespace resolved through the dependency map at render time. A
/// link without override refers to the generated package itself.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    overrides: &'a BTreeMap<String, String>,
    dependency_map: &'a BTreeMap<String, String>,
}

impl<'a> LinkResolver<'a> {
    /// Creates a resolver.
    #[must_use]
    pub fn new(
        overrides: &'a BTreeMap<String, String>,
        dependency_map: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            overrides,
            dependency_map,
        }
    }

    /// Returns true if `link_name` resolves to the generated package itself.
    #[must_use]
    pub fn is_local(&self, link_name: &str) -> bool {
        match self.overrides.get(link_name) {
            None => true,
            Some(module) => {
                !module.contains('/')
                    && !module.contains('.')
                    && self
                        .dependency_map
                        .get(module)
                        .is_some_and(String::is_empty)
            }
        }
    }

    /// Returns the Go expression naming `symbol` exported alongside the
    /// defined type `link_name`, with the dependencies it needs.
    #[must_use]
    pub fn qualify(&self, link_name: &str, symbol: &str) -> (String, DependencySet) {
        let mut dependencies = DependencySet::new();
        let Some(module) = self.overrides.get(link_name) else {
            return (symbol.to_string(), dependencies);
        };

        if module.contains('/') || module.contains('.') {
            let alias = package_alias(module);
            dependencies.add(module.clone());
            dependencies.add_alias(module.clone(), alias.clone());
            return (format!("{alias}.{symbol}"), dependencies);
        }

        if self
            .dependency_map
            .get(module)
            .is_some_and(String::is_empty)
        {
            return (symbol.to_string(), dependencies);
        }

        let identifier = format!(
            "{module}{NAMESPACE_SEPARATOR}{}",
            to_pascal_case(link_name)
        );
        dependencies.add(identifier.clone());
        dependencies.add_alias(identifier, module.clone());
        (format!("{module}.{symbol}"), dependencies)
    }
}

/// Import alias for a Go module path: its last segment as an identifier.
#[must_use]
pub fn package_alias(path: &str) -> String {
    let last = path.rsplit('/').next().unwrap_or(path);
    last.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_naming_helpers() {
        assert_eq!(enum_variant_ident("direction", "up"), "Direction_Up");
        assert_eq!(enum_payload_name("shape", "circle"), "ShapeCircle");
    }

    #[test]
    fn test_param_name_avoids_keywords() {
        assert_eq!(param_name("owner"), "owner");
        assert_eq!(param_name("type"), "type_");
        assert_eq!(param_name("mint_authority"), "mintAuthority");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
        assert_eq!(quote("\u{1}"), "\"\\x01\"");
        assert_eq!(quote("héllo"), "\"héllo\"");
    }

    #[test]
    fn test_byte_list() {
        assert_eq!(byte_list(&[0, 255, 16]), "0x00, 0xff, 0x10");
    }

    #[test]
    fn test_link_resolver() {
        let overrides = BTreeMap::from([
            ("fee".to_string(), "github.com/acme/fee-types".to_string()),
            ("hooked".to_string(), "hooks".to_string()),
            ("local".to_string(), "generated".to_string()),
        ]);
        let dependency_map = BTreeMap::from([
            ("generated".to_string(), String::new()),
            ("hooks".to_string(), "github.com/acme/hooks".to_string()),
        ]);
        let resolver = LinkResolver::new(&overrides, &dependency_map);

        let (syntax, deps) = resolver.qualify("point", "Point");
        assert_eq!(syntax, "Point");
        assert!(deps.is_empty());

        let (syntax, deps) = resolver.qualify("fee", "Fee");
        assert_eq!(syntax, "fee_types.Fee");
        assert_eq!(deps.alias("github.com/acme/fee-types"), Some("fee_types"));

        let (syntax, deps) = resolver.qualify("hooked", "Hooked");
        assert_eq!(syntax, "hooks.Hooked");
        assert!(deps.contains("hooks::Hooked"));

        let (syntax, deps) = resolver.qualify("local", "Local");
        assert_eq!(syntax, "Local");
        assert!(deps.is_empty());

        assert!(resolver.is_local("point"));
        assert!(resolver.is_local("local"));
        assert!(!resolver.is_local("fee"));
        assert!(!resolver.is_local("hooked"));
    }
}
