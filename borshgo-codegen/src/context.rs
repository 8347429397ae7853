//! Traversal context passed down every recursive generation step.
//!
//! [`NamingContext`] is an immutable descriptor: each descent derives a new
//! value from its parent instead of mutating shared state, so nothing has to
//! be restored when a step returns or fails. [`ProgramScope`] carries the
//! program currently being rendered together with the link registry, which is
//! filled once when the traversal enters the root and only read afterwards.

use crate::error::{CodegenError, Result};
use borshgo_schema::{NumberTypeNode, PdaLinkNode, PdaNode, ProgramNode};
use std::collections::BTreeMap;

/// How a struct shape is emitted at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructMode {
    /// Named declaration returned as the type syntax itself.
    #[default]
    TopLevel,
    /// Named declaration hoisted into the nested declarations, referenced by name.
    Nested,
    /// Anonymous aggregate written in place.
    Inline,
}

/// Ambient size installed by a fixed-size or size-prefix wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentSize {
    /// Exactly this many bytes.
    Fixed(usize),
    /// Length encoded by a leading number.
    Prefixed(NumberTypeNode),
}

/// Naming state of one recursive descent step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingContext {
    /// Nearest enclosing name, used to synthesize nested type names.
    pub parent_name: Option<String>,
    /// Emission mode of struct shapes at this position.
    pub struct_mode: StructMode,
    /// Size wrapper applying to the immediate child.
    pub parent_size: Option<ParentSize>,
}

impl NamingContext {
    /// Context for a named top-level declaration.
    #[must_use]
    pub fn top_level(name: impl Into<String>) -> Self {
        Self {
            parent_name: Some(name.into()),
            struct_mode: StructMode::TopLevel,
            parent_size: None,
        }
    }

    /// Context whose struct shapes are hoisted under `name`.
    #[must_use]
    pub fn nested(name: impl Into<String>) -> Self {
        Self {
            parent_name: Some(name.into()),
            struct_mode: StructMode::Nested,
            parent_size: None,
        }
    }

    /// Context for the field `field` (already PascalCase) of the current shape.
    #[must_use]
    pub fn field(&self, field: &str) -> Self {
        Self {
            parent_name: Some(self.extended(field)),
            struct_mode: StructMode::Nested,
            parent_size: None,
        }
    }

    /// Context for the item of a collection, named `parent + suffix`.
    #[must_use]
    pub fn item(&self, suffix: &str) -> Self {
        self.field(suffix)
    }

    /// Context for the value wrapped by an option.
    ///
    /// A top-level option cannot reuse the declared name for its payload,
    /// so the payload is named `parent + "Value"` there.
    #[must_use]
    pub fn wrapped(&self) -> Self {
        match self.struct_mode {
            StructMode::TopLevel => self.item("Value"),
            _ => Self {
                parent_size: None,
                ..self.clone()
            },
        }
    }

    /// Context emitting struct shapes as anonymous aggregates.
    #[must_use]
    pub fn inline(&self) -> Self {
        Self {
            struct_mode: StructMode::Inline,
            ..self.clone()
        }
    }

    /// Context with a size wrapper installed for the immediate child.
    #[must_use]
    pub fn with_parent_size(&self, size: ParentSize) -> Self {
        Self {
            parent_size: Some(size),
            ..self.clone()
        }
    }

    /// Returns the parent name or fails for a node of `kind`.
    ///
    /// # Errors
    /// Returns `CodegenError::MissingParentName` when no name is in scope.
    pub fn require_parent_name(&self, kind: &'static str) -> Result<&str> {
        self.parent_name
            .as_deref()
            .ok_or(CodegenError::MissingParentName { kind })
    }

    fn extended(&self, suffix: &str) -> String {
        match &self.parent_name {
            Some(parent) => format!("{parent}{suffix}"),
            None => suffix.to_string(),
        }
    }
}

/// Cross-entity lookup table for PDA links.
///
/// Populated before any program child is visited.
#[derive(Debug, Default)]
pub struct LinkRegistry<'a> {
    programs: BTreeMap<String, &'a ProgramNode>,
    pdas: BTreeMap<(String, String), &'a PdaNode>,
}

impl<'a> LinkRegistry<'a> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a program and its PDAs.
    pub fn register_program(&mut self, program: &'a ProgramNode) {
        self.programs.insert(program.name.clone(), program);
        for pda in &program.pdas {
            self.pdas
                .insert((program.name.clone(), pda.name.clone()), pda);
        }
    }

    /// Looks up a registered program.
    #[must_use]
    pub fn program(&self, name: &str) -> Option<&'a ProgramNode> {
        self.programs.get(name).copied()
    }

    /// Resolves a PDA link relative to `current`.
    ///
    /// Returns the owning program together with the PDA.
    ///
    /// # Errors
    /// Returns `CodegenError::UnresolvedLink` if the program or PDA is unknown.
    pub fn pda(
        &self,
        link: &PdaLinkNode,
        current: &'a ProgramNode,
    ) -> Result<(&'a ProgramNode, &'a PdaNode)> {
        let program = match &link.program {
            Some(program) => self
                .program(&program.name)
                .ok_or_else(|| CodegenError::UnresolvedLink {
                    kind: "program",
                    name: program.name.clone(),
                })?,
            None => current,
        };
        self.pdas
            .get(&(program.name.clone(), link.name.clone()))
            .map(|pda| (program, *pda))
            .ok_or_else(|| CodegenError::UnresolvedLink {
                kind: "pda",
                name: link.name.clone(),
            })
    }
}

/// The program being rendered and the registry shared by the traversal.
#[derive(Debug, Clone, Copy)]
pub struct ProgramScope<'a> {
    /// Current program.
    pub program: &'a ProgramNode,
    /// Link registry.
    pub registry: &'a LinkRegistry<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use borshgo_schema::{PdaSeedNode, ProgramLinkNode};

    #[test]
    fn test_field_extends_parent_name() {
        let ctx = NamingContext::top_level("A");
        let nested = ctx.field("B").field("C");
        assert_eq!(nested.parent_name.as_deref(), Some("ABC"));
        assert_eq!(nested.struct_mode, StructMode::Nested);
        assert_eq!(ctx.parent_name.as_deref(), Some("A"));
        assert_eq!(ctx.struct_mode, StructMode::TopLevel);
    }

    #[test]
    fn test_size_does_not_leak_into_fields() {
        let ctx = NamingContext::nested("A").with_parent_size(ParentSize::Fixed(4));
        assert_eq!(ctx.parent_size, Some(ParentSize::Fixed(4)));
        assert_eq!(ctx.field("B").parent_size, None);
        assert_eq!(ctx.wrapped().parent_size, None);
    }

    #[test]
    fn test_wrapped_renames_top_level_payload() {
        let top = NamingContext::top_level("Maybe");
        assert_eq!(top.wrapped().parent_name.as_deref(), Some("MaybeValue"));
        let nested = NamingContext::nested("Maybe");
        assert_eq!(nested.wrapped().parent_name.as_deref(), Some("Maybe"));
    }

    #[test]
    fn test_require_parent_name() {
        let ctx = NamingContext::default();
        let err = ctx.require_parent_name("structTypeNode").unwrap_err();
        assert!(matches!(
            err,
            CodegenError::MissingParentName {
                kind: "structTypeNode"
            }
        ));
    }

    #[test]
    fn test_registry_resolves_local_and_foreign_pdas() {
        let mut main = ProgramNode::new("main", "");
        main.pdas.push(PdaNode {
            name: "vault".into(),
            seeds: vec![PdaSeedNode::Variable {
                name: "owner".into(),
                r#type: borshgo_schema::TypeNode::PublicKey,
                docs: Vec::new(),
            }],
            docs: Vec::new(),
        });
        let mut other = ProgramNode::new("other", "");
        other.pdas.push(PdaNode {
            name: "config".into(),
            seeds: Vec::new(),
            docs: Vec::new(),
        });

        let mut registry = LinkRegistry::new();
        registry.register_program(&main);
        registry.register_program(&other);

        let local = PdaLinkNode {
            name: "vault".into(),
            program: None,
        };
        let (owner, pda) = registry.pda(&local, &main).expect("local pda");
        assert_eq!(owner.name, "main");
        assert_eq!(pda.seeds.len(), 1);

        let foreign = PdaLinkNode {
            name: "config".into(),
            program: Some(ProgramLinkNode {
                name: "other".into(),
            }),
        };
        let (owner, _) = registry.pda(&foreign, &main).expect("foreign pda");
        assert_eq!(owner.name, "other");

        let missing = PdaLinkNode {
            name: "nope".into(),
            program: None,
        };
        assert!(matches!(
            registry.pda(&missing, &main),
            Err(CodegenError::UnresolvedLink { kind: "pda", .. })
        ));
    }
}
