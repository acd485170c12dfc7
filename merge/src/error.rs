//! Error types for merge operations.
//!
//! Every failure is permanent for the given input: the merge is a pure
//! transform, so nothing here is retried and no partial result survives.

use sdl_merge_core::{DeclarationKind, SyntaxError};
use thiserror::Error;

/// Two same-named declarations could not be reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conflict merging {kind} {name}: {member}: {reason}")]
pub struct MergeConflict {
    /// Kind of the declaration being merged.
    pub kind: DeclarationKind,
    /// Declaration name (`schema` for the root block).
    pub name: String,
    /// Qualified conflicting member, e.g. `User.id` or `Color.RED`.
    pub member: String,
    /// What differed between the operands.
    pub reason: String,
}

impl MergeConflict {
    pub fn new(
        kind: DeclarationKind,
        name: impl Into<String>,
        member: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            member: member.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while loading a [`MergeConfig`](crate::MergeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a supported format.
    #[error("unsupported config format: {0}")]
    UnknownFormat(String),
}

/// Errors that can occur during a merge.
#[derive(Debug, Error)]
pub enum MergeError {
    /// An input was not one of the accepted shapes.
    #[error("invalid input: unsupported schema input of type {type_name}")]
    InvalidInput { type_name: String },

    /// Text input failed to parse.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Declarations with the same name could not be merged.
    #[error(transparent)]
    Conflict(#[from] MergeConflict),

    /// The merge configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience alias for results with [`MergeError`].
pub type Result<T> = std::result::Result<T, MergeError>;
