//! Root schema block composition.

use sdl_merge_core::{OperationType, OperationTypeDefinition};
use tracing::debug;

use crate::config::MergeConfig;
use crate::merger::MergedResultMap;

/// Settles the root schema block of `merged`.
///
/// Starting from the merged explicit block (or an empty one), missing roles
/// are inferred from declarations named `Query`, `Mutation` and
/// `Subscription` when `use_schema_definition` is set. With
/// `force_schema_definition`, a block that still has no entries gets
/// `query: Query` even if no such type exists. A block with no entries is
/// dropped.
///
/// # Examples
///
/// ```
/// use sdl_merge::{CommentRegistry, MergeConfig, NodeMerger, compose};
/// use sdl_merge_core::{OperationType, parse};
///
/// let config = MergeConfig::default();
/// let doc = parse("type User { id: ID } type Query { user: User }").unwrap();
/// let merged = NodeMerger::new(&config).merge(doc.definitions, &mut CommentRegistry::new()).unwrap();
///
/// let composed = compose(merged, &config);
/// assert_eq!(composed.root().unwrap().operation_type(OperationType::Query), Some("Query"));
/// ```
pub fn compose(mut merged: MergedResultMap, config: &MergeConfig) -> MergedResultMap {
    let explicit = merged.root().is_some();
    let mut root = merged.take_root().unwrap_or_default();

    if config.use_schema_definition {
        for operation in OperationType::ALL {
            let type_name = operation.default_type_name();
            if root.operation_type(operation).is_none() && merged.contains(type_name) {
                debug!(%operation, type_name, "Inferred root operation type");
                root.operations.push(OperationTypeDefinition {
                    operation,
                    type_name: type_name.to_string(),
                });
            }
        }
    }

    if config.force_schema_definition && root.operations.is_empty() {
        debug!("Forcing root block with query: Query");
        root = root.with_operation(OperationType::Query, OperationType::Query.default_type_name());
    }

    if root.operations.is_empty() {
        debug!(explicit, "Dropping root block without operation types");
        merged.set_root(None);
    } else {
        merged.set_root(Some(root));
    }
    merged
}
