//! Schema document loader.
//!
//! Schema documents are JSON trees where every node carries a `kind` tag.
//! A document is either a `rootNode` or a bare `programNode`, which is
//! wrapped into a root with no additional programs.

use crate::error::ParseError;
use crate::program::{ProgramNode, RootNode};

/// Parses a schema document from a string.
///
/// # Arguments
/// * `json` - Schema document content
///
/// # Returns
/// Parsed root node or parse error.
///
/// # Errors
/// Returns `ParseError` if the JSON is malformed or its root is not a
/// `rootNode` or `programNode`.
pub fn parse_root(json: &str) -> Result<RootNode, ParseError> {
    let document: serde_json::Value = serde_json::from_str(json)?;
    let kind = document
        .get("kind")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();

    match kind.as_str() {
        "rootNode" => Ok(serde_json::from_value(document)?),
        "programNode" => {
            let program: ProgramNode = serde_json::from_value(document)?;
            Ok(RootNode::new(program))
        }
        _ => Err(ParseError::UnexpectedRoot { kind }),
    }
}

/// Parses a schema document from a file.
///
/// # Errors
/// Returns `ParseError` if reading or parsing fails.
pub fn parse_root_file(path: &std::path::Path) -> Result<RootNode, ParseError> {
    let json = std::fs::read_to_string(path)?;
    parse_root(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NumberFormat, TypeNode};

    const PROGRAM: &str = r#"{
        "kind": "programNode",
        "name": "counter",
        "publicKey": "Counter111111111111111111111111111111111111",
        "accounts": [{
            "kind": "accountNode",
            "name": "counter",
            "data": {
                "kind": "structTypeNode",
                "fields": [{
                    "kind": "structFieldTypeNode",
                    "name": "count",
                    "type": {"kind": "numberTypeNode", "format": "u64", "endian": "le"}
                }]
            }
        }],
        "instructions": [{
            "kind": "instructionNode",
            "name": "increment",
            "accounts": [{"kind": "instructionAccountNode", "name": "counter", "isWritable": true, "isSigner": false}],
            "arguments": []
        }]
    }"#;

    #[test]
    fn test_parse_program_document() {
        let root = parse_root(PROGRAM).expect("Failed to parse");
        assert_eq!(root.program.name, "counter");
        assert!(root.additional_programs.is_empty());
        assert_eq!(root.program.accounts.len(), 1);
        assert_eq!(
            root.program.accounts[0].data.fields[0].r#type,
            TypeNode::number(NumberFormat::U64)
        );
        assert_eq!(root.program.instructions[0].accounts[0].name, "counter");
    }

    #[test]
    fn test_parse_root_document() {
        let json = format!(
            r#"{{"kind": "rootNode", "program": {PROGRAM}, "additionalPrograms": []}}"#
        );
        let root = parse_root(&json).expect("Failed to parse");
        assert_eq!(root.program.name, "counter");
    }

    #[test]
    fn test_parse_unexpected_root() {
        let err = parse_root(r#"{"kind": "accountNode"}"#).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedRoot { ref kind } if kind == "accountNode"));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(parse_root("{"), Err(ParseError::Json(_))));
    }
}
