//! Error types for parsing and building schema documents.

use thiserror::Error;

/// Text failed to parse into a document.
///
/// Carries the origin name of the source (a file name or a caller-chosen
/// label) and the 1-based position of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{origin}:{line}:{column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub origin: String,
    pub line: u32,
    pub column: u32,
}

/// Errors raised while building an [`ExecutableSchema`](crate::ExecutableSchema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Two definitions share a name.
    #[error("duplicate definition: {0}")]
    DuplicateDefinition(String),
    /// A member (field, value, argument) is declared twice on one type.
    #[error("duplicate member {member} on {name}")]
    DuplicateMember { name: String, member: String },
    /// A type is referenced but never defined.
    #[error("unknown type {referenced} referenced from {from}")]
    UnknownType { referenced: String, from: String },
    /// An `extend` targets a type that has no definition.
    #[error("cannot extend undefined type: {0}")]
    ExtensionWithoutBase(String),
    /// An extension's kind differs from its base definition's kind.
    #[error("extension of {name} does not match its {expected} definition")]
    ExtensionKindMismatch { name: String, expected: String },
    /// A root operation type is missing or not an object type.
    #[error("{operation} root type {type_name} must be a defined object type")]
    InvalidRootType {
        operation: String,
        type_name: String,
    },
    /// More than one `schema` block was supplied.
    #[error("schema block defined more than once")]
    DuplicateSchemaDefinition,
}

/// Convenience alias for parse results.
pub type Result<T> = std::result::Result<T, SyntaxError>;
