//! Program-level schema nodes.
//!
//! This module contains the entities a generator walks: the root, programs,
//! accounts, instructions, PDAs, errors and discriminators.

use crate::types::{
    DefaultValueStrategy, DefinedTypeNode, ProgramLinkNode, StructTypeNode, TypeNode,
};
use crate::values::{ConstantValueNode, ValueNode};
use serde::{Deserialize, Serialize};

/// Root of a schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootNode {
    /// Main program.
    pub program: ProgramNode,
    /// Programs the main program depends on.
    #[serde(default)]
    pub additional_programs: Vec<ProgramNode>,
}

impl RootNode {
    /// Creates a root with a single program.
    #[must_use]
    pub fn new(program: ProgramNode) -> Self {
        Self {
            program,
            additional_programs: Vec::new(),
        }
    }

    /// Iterates over every program, main program first.
    pub fn programs(&self) -> impl Iterator<Item = &ProgramNode> {
        std::iter::once(&self.program).chain(self.additional_programs.iter())
    }
}

/// Program node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramNode {
    /// Program name.
    pub name: String,
    /// Base58 program address.
    #[serde(default)]
    pub public_key: String,
    /// Program version.
    #[serde(default)]
    pub version: String,
    /// Account layouts.
    #[serde(default)]
    pub accounts: Vec<AccountNode>,
    /// Instructions, possibly nested.
    #[serde(default)]
    pub instructions: Vec<InstructionNode>,
    /// Named types.
    #[serde(default)]
    pub defined_types: Vec<DefinedTypeNode>,
    /// Program-derived address specs.
    #[serde(default)]
    pub pdas: Vec<PdaNode>,
    /// Program errors.
    #[serde(default)]
    pub errors: Vec<ErrorNode>,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl ProgramNode {
    /// Creates an empty program.
    #[must_use]
    pub fn new(name: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_key: public_key.into(),
            ..Self::default()
        }
    }

    /// Returns the instructions to render, depth first.
    ///
    /// Leaf instructions are always included; instructions with
    /// sub-instructions are included only when `include_parents` is set.
    #[must_use]
    pub fn renderable_instructions(&self, include_parents: bool) -> Vec<&InstructionNode> {
        let mut out = Vec::new();
        for instruction in &self.instructions {
            instruction.collect(include_parents, &mut out);
        }
        out
    }
}

/// Account node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountNode {
    /// Account name.
    pub name: String,
    /// Account data layout.
    pub data: StructTypeNode,
    /// Address derivation.
    #[serde(default)]
    pub pda: Option<PdaLinkNode>,
    /// Discriminators identifying the account kind.
    #[serde(default)]
    pub discriminators: Vec<DiscriminatorNode>,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl AccountNode {
    /// Creates an account without discriminators or PDA.
    #[must_use]
    pub fn new(name: impl Into<String>, data: StructTypeNode) -> Self {
        Self {
            name: name.into(),
            data,
            pda: None,
            discriminators: Vec::new(),
            docs: Vec::new(),
        }
    }
}

/// Discriminator identifying an account or instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DiscriminatorNode {
    /// Constant bytes at an offset.
    #[serde(rename = "constantDiscriminatorNode")]
    Constant {
        /// Expected bytes.
        constant: ConstantValueNode,
        /// Byte offset.
        #[serde(default)]
        offset: usize,
    },
    /// Default value of a data field.
    #[serde(rename = "fieldDiscriminatorNode")]
    Field {
        /// Field name.
        name: String,
        /// Byte offset.
        #[serde(default)]
        offset: usize,
    },
    /// Total data size.
    #[serde(rename = "sizeDiscriminatorNode")]
    Size {
        /// Size in bytes.
        size: usize,
    },
}

/// PDA node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdaNode {
    /// PDA name.
    pub name: String,
    /// Seeds in order.
    pub seeds: Vec<PdaSeedNode>,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}

/// PDA seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PdaSeedNode {
    /// Seed known at generation time.
    #[serde(rename = "constantPdaSeedNode")]
    Constant {
        /// Seed type.
        #[serde(rename = "type")]
        r#type: TypeNode,
        /// Seed value.
        value: ValueNode,
    },
    /// Seed supplied by the caller.
    #[serde(rename = "variablePdaSeedNode")]
    Variable {
        /// Parameter name.
        name: String,
        /// Parameter type.
        #[serde(rename = "type")]
        r#type: TypeNode,
        /// Documentation lines.
        #[serde(default)]
        docs: Vec<String>,
    },
}

/// Link to a PDA.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PdaLinkNode {
    /// PDA name.
    pub name: String,
    /// Owning program, when different from the current one.
    #[serde(default)]
    pub program: Option<ProgramLinkNode>,
}

/// Whether an instruction account signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignerFlag {
    /// Always or never a signer.
    Fixed(bool),
    /// Either, decided by the caller (`"either"`).
    Either(String),
}

impl Default for SignerFlag {
    fn default() -> Self {
        Self::Fixed(false)
    }
}

/// Account parameter of an instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionAccountNode {
    /// Account name.
    pub name: String,
    /// Whether the account is writable.
    #[serde(default)]
    pub is_writable: bool,
    /// Whether the account signs.
    #[serde(default)]
    pub is_signer: SignerFlag,
    /// Whether the account may be omitted.
    #[serde(default)]
    pub is_optional: bool,
    /// Default address.
    #[serde(default)]
    pub default_value: Option<InstructionInputValueNode>,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl InstructionAccountNode {
    /// Creates a read-only, non-signing, required account.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_writable: false,
            is_signer: SignerFlag::default(),
            is_optional: false,
            default_value: None,
            docs: Vec::new(),
        }
    }
}

/// Default of an instruction account or argument.
///
/// Besides plain literals, instruction inputs may default to values that
/// only exist when the instruction is assembled, such as another account or
/// a derived address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstructionInputValueNode {
    /// Literal known at generation time.
    Value(ValueNode),
    /// Value resolved from the surrounding instruction.
    Contextual(ContextualValueNode),
}

impl InstructionInputValueNode {
    /// Returns the literal, if the default is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&ValueNode> {
        match self {
            Self::Value(value) => Some(value),
            Self::Contextual(_) => None,
        }
    }

    /// Returns the node kind as it appears in the schema document.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Value(value) => value.kind(),
            Self::Contextual(value) => value.kind(),
        }
    }
}

impl From<ValueNode> for InstructionInputValueNode {
    fn from(value: ValueNode) -> Self {
        Self::Value(value)
    }
}

/// Instruction input default resolved at assembly time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ContextualValueNode {
    /// Address of another account of the instruction.
    #[serde(rename = "accountValueNode")]
    Account {
        /// Account name.
        name: String,
    },
    /// Value of an instruction argument.
    #[serde(rename = "argumentValueNode")]
    Argument {
        /// Argument name.
        name: String,
    },
    /// Bump seed of a derived account.
    #[serde(rename = "accountBumpValueNode")]
    AccountBump {
        /// Account name.
        name: String,
    },
    /// Address derived from a PDA.
    #[serde(rename = "pdaValueNode")]
    Pda {
        /// Linked or inline PDA; only the name is kept.
        pda: PdaLinkNode,
    },
    /// Transaction fee payer.
    #[serde(rename = "payerValueNode")]
    Payer,
    /// Wallet identity of the caller.
    #[serde(rename = "identityValueNode")]
    Identity,
    /// Value chosen by a condition on other inputs.
    #[serde(rename = "conditionalValueNode")]
    Conditional,
    /// Value computed by a named client-side resolver.
    #[serde(rename = "resolverValueNode")]
    Resolver {
        /// Resolver name.
        name: String,
    },
}

impl ContextualValueNode {
    /// Returns the node kind as it appears in the schema document.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Account { .. } => "accountValueNode",
            Self::Argument { .. } => "argumentValueNode",
            Self::AccountBump { .. } => "accountBumpValueNode",
            Self::Pda { .. } => "pdaValueNode",
            Self::Payer => "payerValueNode",
            Self::Identity => "identityValueNode",
            Self::Conditional => "conditionalValueNode",
            Self::Resolver { .. } => "resolverValueNode",
        }
    }
}

/// Data argument of an instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionArgumentNode {
    /// Argument name.
    pub name: String,
    /// Argument type.
    #[serde(rename = "type")]
    pub r#type: TypeNode,
    /// Default value.
    #[serde(default)]
    pub default_value: Option<InstructionInputValueNode>,
    /// Default value strategy.
    #[serde(default)]
    pub default_value_strategy: Option<DefaultValueStrategy>,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl InstructionArgumentNode {
    /// Creates an argument without default value.
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
}

/// What a generated builder does with a missing optional account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionalAccountStrategy {
    /// Pass the program address in its place.
    #[default]
    ProgramId,
    /// Drop the account meta entirely.
    Omitted,
}

/// Instruction node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionNode {
    /// Instruction name.
    pub name: String,
    /// Account parameters.
    #[serde(default)]
    pub accounts: Vec<InstructionAccountNode>,
    /// Data arguments.
    #[serde(default)]
    pub arguments: Vec<InstructionArgumentNode>,
    /// Discriminators identifying the instruction.
    #[serde(default)]
    pub discriminators: Vec<DiscriminatorNode>,
    /// Grouped instructions.
    #[serde(default)]
    pub sub_instructions: Vec<InstructionNode>,
    /// Missing optional account handling.
    #[serde(default)]
    pub optional_account_strategy: OptionalAccountStrategy,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}

impl InstructionNode {
    /// Creates an instruction without accounts or arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accounts: Vec::new(),
            arguments: Vec::new(),
            discriminators: Vec::new(),
            sub_instructions: Vec::new(),
            optional_account_strategy: OptionalAccountStrategy::default(),
            docs: Vec::new(),
        }
    }

    /// Returns true if the instruction has no sub-instructions.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.sub_instructions.is_empty()
    }

    fn collect<'a>(&'a self, include_parents: bool, out: &mut Vec<&'a InstructionNode>) {
        if self.is_leaf() || include_parents {
            out.push(self);
        }
        for sub in &self.sub_instructions {
            sub.collect(include_parents, out);
        }
    }
}

/// Program error node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNode {
    /// Error name.
    pub name: String,
    /// Error code.
    pub code: u32,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Documentation lines.
    #[serde(default)]
    pub docs: Vec<String>,
}
