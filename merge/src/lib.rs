//! Merges independently authored schema definition documents into one.
//!
//! The pipeline has four stages, each public for callers who need to run
//! them separately:
//!
//! 1. [`collect`] flattens a [`SchemaInput`] (text, parsed documents,
//!    executable schemas, sequences, thunks) into declarations.
//! 2. [`NodeMerger`] folds same-named declarations under the conflict policy
//!    in [`MergeConfig`], recording authored comments into a
//!    [`CommentRegistry`].
//! 3. [`compose`] settles the root schema block.
//! 4. [`serialize`] sorts and renders the result as a [`MergeOutput`].
//!
//! [`merge_declarations`] runs all four.
//!
//! # Example
//!
//! ```
//! use sdl_merge::*;
//!
//! let input = SchemaInput::from(vec![
//!     SchemaInput::from("type User { id: ID }"),
//!     SchemaInput::from("type User { name: String } type Query { me: User }"),
//! ]);
//! let output = merge_declarations(input, &MergeConfig::default()).unwrap();
//!
//! assert_eq!(
//!     output.to_sdl(),
//!     "type User {\n  id: ID\n  name: String\n}\n\n\
//!      type Query {\n  me: User\n}\n\n\
//!      schema {\n  query: Query\n}\n"
//! );
//! ```

mod collect;
mod comments;
mod compose;
mod config;
mod error;
mod fields;
mod input;
mod merger;
mod output;

pub use collect::collect;
pub use comments::CommentRegistry;
pub use compose::compose;
pub use config::{
    Comparator, ConflictResolution, FieldConflict, FieldConflictHook, MergeConfig, SortOrder,
    lexical_order,
};
pub use error::{ConfigError, MergeConflict, MergeError, Result};
pub use input::{SchemaInput, Thunk};
pub use merger::{MergedResultMap, NodeMerger};
pub use output::{MergeOutput, serialize};

use sdl_merge_core::{Declaration, Document};
use tracing::debug;

/// Merges every declaration reachable from `input` into one document.
///
/// Returns [`MergeOutput::Text`] when `config.comment_descriptions` is set
/// and [`MergeOutput::Tree`] otherwise. Comments collected for rendering
/// live only for the duration of this call.
///
/// # Errors
///
/// Fails with [`MergeError::InvalidInput`] for unsupported input values,
/// [`MergeError::Syntax`] for malformed text and [`MergeError::Conflict`]
/// for declarations that cannot be reconciled. No partial result is
/// returned.
pub fn merge_declarations(
    input: impl Into<SchemaInput>,
    config: &MergeConfig,
) -> Result<MergeOutput> {
    let input = input.into();
    let mut comments = CommentRegistry::new();
    let declarations = run(&input, config, &mut comments)?;
    let output = serialize(declarations, config, &comments);
    comments.reset();
    Ok(output)
}

/// Like [`merge_declarations`] but always returns the tree, ignoring
/// `comment_descriptions`.
pub fn merge_to_document(input: impl Into<SchemaInput>, config: &MergeConfig) -> Result<Document> {
    let input = input.into();
    let mut comments = CommentRegistry::new();
    let declarations = run(&input, config, &mut comments)?;
    Ok(output::ordered_document(declarations, &config.sort))
}

fn run(
    input: &SchemaInput,
    config: &MergeConfig,
    comments: &mut CommentRegistry,
) -> Result<Vec<Declaration>> {
    debug!(input = input.tag(), "Starting merge");
    let nodes = collect(input)?;
    let merged = NodeMerger::new(config).merge(nodes, comments)?;
    let composed = compose(merged, config);
    Ok(composed.into_declarations())
}
