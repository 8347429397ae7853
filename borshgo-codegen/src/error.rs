//! Error types for code generation.

use borshgo_schema::{Endian, NumberFormat};
use thiserror::Error;

/// Error type for code generation operations.
///
/// Every variant is fatal: the run that produced it returns no render map.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema loading error.
    #[error("schema parse error: {0}")]
    Parse(#[from] borshgo_schema::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options document error.
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),

    /// Number with a byte order the target codec cannot read.
    #[error("unsupported endianness '{endian}' for number format '{format}'")]
    UnsupportedEndianness {
        /// Number format.
        format: NumberFormat,
        /// Declared byte order.
        endian: Endian,
    },

    /// Number format without a target representation.
    #[error("unsupported number format '{format}'")]
    UnsupportedNumberFormat {
        /// Number format.
        format: NumberFormat,
    },

    /// Boolean backed by anything other than a little-endian `u8`.
    #[error("unsupported boolean width: booleans must be backed by u8 le, got {format} {endian}")]
    UnsupportedBooleanSize {
        /// Backing number format.
        format: NumberFormat,
        /// Backing byte order.
        endian: Endian,
    },

    /// Option whose presence flag is not a single `u8`, or that keeps its
    /// item size when absent.
    #[error(
        "unsupported option layout: options must use a u8 le presence flag and no fixed size, got {format} {endian} (fixed: {fixed})"
    )]
    UnsupportedOptionLayout {
        /// Presence flag format.
        format: NumberFormat,
        /// Presence flag byte order.
        endian: Endian,
        /// Whether `None` keeps the item size.
        fixed: bool,
    },

    /// Node that needs to synthesize a name reached without an enclosing name.
    #[error("'{kind}' requires an enclosing name")]
    MissingParentName {
        /// Node kind.
        kind: &'static str,
    },

    /// Schema shape explicitly not supported by the generator.
    #[error("unsupported schema node '{kind}'")]
    UnsupportedNode {
        /// Node kind.
        kind: &'static str,
    },

    /// Constant value that cannot be folded into bytes.
    #[error("unsupported constant value: {message}")]
    UnsupportedConstant {
        /// Description of the shape.
        message: String,
    },

    /// Two render maps claim the same output path.
    #[error("output path collision: '{path}' is rendered twice")]
    PathCollision {
        /// Output path.
        path: String,
    },

    /// Link to a node that is not registered.
    #[error("unresolved {kind} '{name}'")]
    UnresolvedLink {
        /// Link kind.
        kind: &'static str,
        /// Linked name.
        name: String,
    },

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates an unsupported constant error with the given message.
    pub fn unsupported_constant(message: impl Into<String>) -> Self {
        Self::UnsupportedConstant {
            message: message.into(),
        }
    }
}

/// Result alias for code generation operations.
pub type Result<T> = std::result::Result<T, CodegenError>;
