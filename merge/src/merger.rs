//! Folding of same-named declarations into one.
//!
//! [`NodeMerger`] groups declarations by name and left-folds each group in
//! input order: the earliest declaration is the accumulator and every later
//! one is merged into it. The result is a [`MergedResultMap`] that keeps
//! first-seen order across the whole input and holds the root schema block
//! in a separate slot.

use std::collections::HashMap;

use sdl_merge_core::{
    CompositeType, Declaration, DeclarationKind, DirectiveDefinition, EnumType, Field,
    InputObjectType, InputValue, ScalarType, SchemaDefinition, UnionType,
};
use tracing::{debug, warn};

use crate::comments::CommentRegistry;
use crate::config::{ConflictResolution, FieldConflict, MergeConfig};
use crate::error::{MergeConflict, Result};
use crate::fields::{
    ArgumentClash, argument_conflict, input_field_conflict, merge_arguments, merge_directives,
    merge_input_value, merge_text, reconcile_output, union_names,
};

/// Merged declarations in first-seen order, keyed by node path (`User`,
/// `@auth`), plus the root schema block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedResultMap {
    declarations: Vec<Declaration>,
    index: HashMap<String, usize>,
    root: Option<SchemaDefinition>,
}

impl MergedResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declarations, the root block included.
    pub fn len(&self) -> usize {
        self.declarations.len() + usize::from(self.root.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a declaration by path: a type name, or `@name` for a
    /// directive definition.
    pub fn get(&self, path: &str) -> Option<&Declaration> {
        self.index.get(path).map(|&i| &self.declarations[i])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Paths of the named declarations, in first-seen order.
    pub fn paths(&self) -> Vec<String> {
        self.declarations.iter().map(Declaration::path).collect()
    }

    /// Named declarations in first-seen order; the root block is not included.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn root(&self) -> Option<&SchemaDefinition> {
        self.root.as_ref()
    }

    pub fn set_root(&mut self, root: Option<SchemaDefinition>) {
        self.root = root;
    }

    pub fn take_root(&mut self) -> Option<SchemaDefinition> {
        self.root.take()
    }

    /// Inserts or replaces a declaration, returning the one it replaced.
    /// A replaced declaration keeps its original position.
    pub fn insert(&mut self, decl: Declaration) -> Option<Declaration> {
        if let Declaration::Schema(schema) = decl {
            return self.root.replace(schema).map(Declaration::Schema);
        }
        let path = decl.path();
        match self.index.get(&path) {
            Some(&i) => Some(std::mem::replace(&mut self.declarations[i], decl)),
            None => {
                self.index.insert(path, self.declarations.len());
                self.declarations.push(decl);
                None
            }
        }
    }

    /// Named declarations in first-seen order followed by the root block.
    pub fn into_declarations(self) -> Vec<Declaration> {
        let mut out = self.declarations;
        out.extend(self.root.map(Declaration::Schema));
        out
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut Declaration> {
        let i = *self.index.get(path)?;
        self.declarations.get_mut(i)
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Declaration> {
        self.declarations.iter_mut()
    }
}

/// Merges collected declarations under one [`MergeConfig`].
///
/// # Examples
///
/// ```
/// use sdl_merge::{CommentRegistry, MergeConfig, NodeMerger};
/// use sdl_merge_core::parse;
///
/// let doc = parse("type User { id: ID } type User { name: String }").unwrap();
/// let config = MergeConfig::default();
/// let mut comments = CommentRegistry::new();
/// let merged = NodeMerger::new(&config).merge(doc.definitions, &mut comments).unwrap();
///
/// let Some(sdl_merge_core::Declaration::Object(user)) = merged.get("User") else { panic!() };
/// assert_eq!(user.field_names(), vec!["id", "name"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NodeMerger<'a> {
    config: &'a MergeConfig,
}

impl<'a> NodeMerger<'a> {
    pub fn new(config: &'a MergeConfig) -> Self {
        Self { config }
    }

    /// Folds `nodes` into a [`MergedResultMap`].
    ///
    /// When the config asks for comment descriptions, the comments that
    /// survive the fold are recorded into `comments` by node path.
    ///
    /// # Errors
    ///
    /// Returns [`MergeConflict`] when two declarations sharing a name have
    /// different kinds, or when a structural conflict cannot be resolved
    /// under the configured policy.
    pub fn merge(
        &self,
        nodes: Vec<Declaration>,
        comments: &mut CommentRegistry,
    ) -> Result<MergedResultMap> {
        let mut merged = MergedResultMap::new();
        let total = nodes.len();

        for node in nodes {
            let node = match node {
                Declaration::Schema(schema) => {
                    let root = match merged.take_root() {
                        Some(existing) => self.merge_root(existing, schema)?,
                        None => schema,
                    };
                    merged.set_root(Some(root));
                    continue;
                }
                other => other,
            };

            let path = node.path();
            if self.config.is_excluded(&path) {
                debug!(path = %path, "Excluding declaration");
                continue;
            }

            match merged.get_mut(&path) {
                Some(existing) => {
                    debug!(path = %path, kind = %node.kind(), "Merging declaration");
                    self.merge_into(existing, node)?;
                }
                None => {
                    merged.insert(node);
                }
            }
        }

        for decl in merged.iter_mut() {
            self.exclude_members(decl);
            if self.config.convert_extensions {
                decl.set_extension(false);
            }
        }
        if self.config.convert_extensions {
            if let Some(mut root) = merged.take_root() {
                root.extension = false;
                merged.set_root(Some(root));
            }
        }
        if self.config.comment_descriptions {
            for decl in merged.iter() {
                record_comments(decl, comments);
            }
            if let Some(text) = merged.root().and_then(|root| root.comment.as_deref()) {
                comments.record("schema", text);
            }
        }

        debug!(
            input = total,
            merged = merged.len(),
            "Merged declarations"
        );
        Ok(merged)
    }

    fn merge_into(&self, existing: &mut Declaration, incoming: Declaration) -> Result<()> {
        match (existing, incoming) {
            (Declaration::Object(target), Declaration::Object(other)) => {
                self.merge_composite(DeclarationKind::ObjectType, target, other)
            }
            (Declaration::Interface(target), Declaration::Interface(other)) => {
                self.merge_composite(DeclarationKind::InterfaceType, target, other)
            }
            (Declaration::Union(target), Declaration::Union(other)) => {
                self.merge_union(target, other);
                Ok(())
            }
            (Declaration::Enum(target), Declaration::Enum(other)) => self.merge_enum(target, other),
            (Declaration::InputObject(target), Declaration::InputObject(other)) => {
                self.merge_input_object(target, other)
            }
            (Declaration::Scalar(target), Declaration::Scalar(other)) => {
                self.merge_scalar(target, other);
                Ok(())
            }
            (Declaration::Directive(target), Declaration::Directive(other)) => {
                self.merge_directive_definition(target, other)
            }
            (existing, incoming) => Err(MergeConflict::new(
                existing.kind(),
                existing.path(),
                existing.path(),
                format!(
                    "declared as {} but redeclared as {}",
                    existing.kind(),
                    incoming.kind()
                ),
            )
            .into()),
        }
    }

    fn merge_composite(
        &self,
        kind: DeclarationKind,
        target: &mut CompositeType,
        incoming: CompositeType,
    ) -> Result<()> {
        let reverse = self.config.reverse_directives;
        merge_text(&mut target.description, incoming.description);
        merge_text(&mut target.comment, incoming.comment);
        union_names(&mut target.interfaces, incoming.interfaces);
        merge_directives(&mut target.directives, incoming.directives, reverse);

        for field in incoming.fields {
            match target.fields.iter_mut().find(|f| f.name == field.name) {
                Some(existing) => self.merge_field(kind, &target.name, existing, field)?,
                None => target.fields.push(field),
            }
        }
        target.extension &= incoming.extension;
        Ok(())
    }

    fn merge_field(
        &self,
        kind: DeclarationKind,
        owner: &str,
        existing: &mut Field,
        incoming: Field,
    ) -> Result<()> {
        let Some(ty) = reconcile_output(&existing.ty, &incoming.ty) else {
            let reason = format!("type {} conflicts with {}", existing.ty, incoming.ty);
            let conflict = FieldConflict {
                type_name: owner,
                field_name: &existing.name,
                argument: None,
                existing: &existing.ty,
                incoming: &incoming.ty,
            };
            if self.take_incoming(kind, &conflict, reason)? {
                *existing = incoming;
            }
            return Ok(());
        };
        if let Some(clash) = argument_conflict(&existing.arguments, &incoming.arguments) {
            let ArgumentClash {
                existing: before,
                incoming: after,
                reason,
            } = clash;
            let conflict = FieldConflict {
                type_name: owner,
                field_name: &existing.name,
                argument: Some(&after.name),
                existing: &before.ty,
                incoming: &after.ty,
            };
            if self.take_incoming(kind, &conflict, reason)? {
                *existing = incoming;
            }
            return Ok(());
        }

        let reverse = self.config.reverse_directives;
        existing.ty = ty;
        merge_arguments(&mut existing.arguments, incoming.arguments, reverse);
        merge_text(&mut existing.description, incoming.description);
        merge_text(&mut existing.comment, incoming.comment);
        merge_directives(&mut existing.directives, incoming.directives, reverse);
        Ok(())
    }

    fn merge_input_object(
        &self,
        target: &mut InputObjectType,
        incoming: InputObjectType,
    ) -> Result<()> {
        let reverse = self.config.reverse_directives;
        merge_text(&mut target.description, incoming.description);
        merge_text(&mut target.comment, incoming.comment);
        merge_directives(&mut target.directives, incoming.directives, reverse);

        for field in incoming.fields {
            let Some(existing) = target.fields.iter_mut().find(|f| f.name == field.name) else {
                target.fields.push(field);
                continue;
            };
            let Some(reason) = input_field_conflict(existing, &field) else {
                merge_input_value(existing, field, reverse);
                continue;
            };
            let conflict = FieldConflict {
                type_name: &target.name,
                field_name: &existing.name,
                argument: None,
                existing: &existing.ty,
                incoming: &field.ty,
            };
            if self.take_incoming(DeclarationKind::InputObjectType, &conflict, reason)? {
                *existing = field;
            }
        }
        target.extension &= incoming.extension;
        Ok(())
    }

    fn merge_union(&self, target: &mut UnionType, incoming: UnionType) {
        merge_text(&mut target.description, incoming.description);
        merge_text(&mut target.comment, incoming.comment);
        merge_directives(&mut target.directives, incoming.directives, self.config.reverse_directives);
        union_names(&mut target.members, incoming.members);
        target.extension &= incoming.extension;
    }

    fn merge_enum(&self, target: &mut EnumType, incoming: EnumType) -> Result<()> {
        merge_text(&mut target.description, incoming.description);
        merge_text(&mut target.comment, incoming.comment);
        merge_directives(&mut target.directives, incoming.directives, self.config.reverse_directives);

        for value in incoming.values {
            let Some(existing) = target.values.iter_mut().find(|v| v.name == value.name) else {
                target.values.push(value);
                continue;
            };
            if existing.description == value.description && existing.directives == value.directives {
                merge_text(&mut existing.comment, value.comment);
                continue;
            }
            if self.config.consistent_enum_merge {
                return Err(MergeConflict::new(
                    DeclarationKind::EnumType,
                    &target.name,
                    format!("{}.{}", target.name, value.name),
                    "enum value redeclared with a different description or directives",
                )
                .into());
            }
            debug!(enum_type = %target.name, value = %value.name, "Later enum value overrides");
            existing.description = value.description;
            existing.comment = value.comment;
            existing.directives = value.directives;
        }
        target.extension &= incoming.extension;
        Ok(())
    }

    fn merge_scalar(&self, target: &mut ScalarType, incoming: ScalarType) {
        merge_text(&mut target.description, incoming.description);
        merge_text(&mut target.comment, incoming.comment);
        merge_directives(&mut target.directives, incoming.directives, self.config.reverse_directives);
        target.extension &= incoming.extension;
    }

    fn merge_directive_definition(
        &self,
        target: &mut DirectiveDefinition,
        incoming: DirectiveDefinition,
    ) -> Result<()> {
        let path = format!("@{}", target.name);
        if target.repeatable != incoming.repeatable {
            let conflict = MergeConflict::new(
                DeclarationKind::DirectiveDefinition,
                &path,
                &path,
                "repeatable flag differs between definitions",
            );
            if self.config.throw_on_conflict {
                return Err(conflict.into());
            }
            warn!(directive = %path, "Keeping earliest directive definition: {conflict}");
            return Ok(());
        }

        merge_text(&mut target.description, incoming.description);
        merge_text(&mut target.comment, incoming.comment);
        for location in incoming.locations {
            if !target.locations.contains(&location) {
                target.locations.push(location);
            }
        }

        match argument_conflict(&target.arguments, &incoming.arguments) {
            Some(clash) => {
                let conflict = MergeConflict::new(
                    DeclarationKind::DirectiveDefinition,
                    &path,
                    format!("{path}.{}", clash.incoming.name),
                    clash.reason,
                );
                if self.config.throw_on_conflict {
                    return Err(conflict.into());
                }
                debug!(directive = %path, "Keeping earliest directive arguments: {conflict}");
            }
            None => merge_arguments(
                &mut target.arguments,
                incoming.arguments,
                self.config.reverse_directives,
            ),
        }
        Ok(())
    }

    fn merge_root(
        &self,
        mut target: SchemaDefinition,
        incoming: SchemaDefinition,
    ) -> Result<SchemaDefinition> {
        warn!(
            existing = target.operations.len(),
            incoming = incoming.operations.len(),
            "Multiple root schema blocks; unioning their operation types"
        );
        merge_text(&mut target.description, incoming.description);
        merge_text(&mut target.comment, incoming.comment);
        merge_directives(&mut target.directives, incoming.directives, self.config.reverse_directives);

        for op in incoming.operations {
            match target.operation_type(op.operation) {
                None => target.operations.push(op),
                Some(bound) if bound == op.type_name => {}
                Some(bound) => {
                    let conflict = MergeConflict::new(
                        DeclarationKind::RootSchemaBlock,
                        "schema",
                        format!("schema.{}", op.operation),
                        format!("bound to {bound} but rebound to {}", op.type_name),
                    );
                    if self.config.throw_on_conflict {
                        return Err(conflict.into());
                    }
                    warn!("Keeping first root binding: {conflict}");
                }
            }
        }
        target.extension &= incoming.extension;
        Ok(target)
    }

    /// Applies the conflict policy to a shared member whose definitions
    /// cannot be reconciled. Returns whether the later definition replaces
    /// the earlier one.
    fn take_incoming(
        &self,
        kind: DeclarationKind,
        conflict: &FieldConflict<'_>,
        reason: String,
    ) -> Result<bool> {
        let owner = conflict.type_name;
        let member = conflict.field_name;
        if let Some(hook) = &self.config.on_field_conflict {
            match hook.resolve(conflict) {
                ConflictResolution::KeepExisting => return Ok(false),
                ConflictResolution::TakeIncoming => return Ok(true),
                ConflictResolution::Default => {}
            }
        }
        if self.config.ignore_field_conflicts {
            debug!(type_name = owner, field = member, %reason, "Ignoring field conflict");
            return Ok(false);
        }
        if self.config.throw_on_conflict {
            return Err(MergeConflict::new(kind, owner, format!("{owner}.{member}"), reason).into());
        }
        debug!(type_name = owner, field = member, %reason, "Keeping earliest field definition");
        Ok(false)
    }

    fn exclude_members(&self, decl: &mut Declaration) {
        let config = self.config;
        match decl {
            Declaration::Object(t) | Declaration::Interface(t) => {
                t.fields.retain(|f| !config.is_member_excluded(&t.name, &f.name));
            }
            Declaration::InputObject(t) => {
                t.fields.retain(|f| !config.is_member_excluded(&t.name, &f.name));
            }
            Declaration::Enum(t) => {
                t.values.retain(|v| !config.is_member_excluded(&t.name, &v.name));
            }
            Declaration::Directive(d) => {
                let owner = format!("@{}", d.name);
                d.arguments.retain(|a| !config.is_member_excluded(&owner, &a.name));
            }
            Declaration::Union(_) | Declaration::Scalar(_) | Declaration::Schema(_) => {}
        }
    }
}

/// Records every authored comment in `decl` under its node path.
fn record_comments(decl: &Declaration, comments: &mut CommentRegistry) {
    let path = decl.path();
    if let Some(text) = decl.comment() {
        comments.record(path.clone(), text);
    }
    match decl {
        Declaration::Object(t) | Declaration::Interface(t) => {
            for field in &t.fields {
                let field_path = format!("{path}.{}", field.name);
                if let Some(text) = &field.comment {
                    comments.record(field_path.clone(), text.as_str());
                }
                record_input_values(&field_path, &field.arguments, comments);
            }
        }
        Declaration::InputObject(t) => record_input_values(&path, &t.fields, comments),
        Declaration::Directive(d) => record_input_values(&path, &d.arguments, comments),
        Declaration::Enum(t) => {
            for value in &t.values {
                if let Some(text) = &value.comment {
                    comments.record(format!("{path}.{}", value.name), text.as_str());
                }
            }
        }
        Declaration::Union(_) | Declaration::Scalar(_) | Declaration::Schema(_) => {}
    }
}

fn record_input_values(owner: &str, values: &[InputValue], comments: &mut CommentRegistry) {
    for value in values {
        if let Some(text) = &value.comment {
            comments.record(format!("{owner}.{}", value.name), text.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sdl_merge_core::{OperationType, parse};

    use super::*;
    use crate::config::FieldConflictHook;
    use crate::error::MergeError;

    fn merge_with(sdl: &str, config: &MergeConfig) -> Result<MergedResultMap> {
        let doc = parse(sdl).unwrap();
        NodeMerger::new(config).merge(doc.definitions, &mut CommentRegistry::new())
    }

    fn merge(sdl: &str) -> MergedResultMap {
        merge_with(sdl, &MergeConfig::default()).unwrap()
    }

    fn object<'m>(merged: &'m MergedResultMap, name: &str) -> &'m CompositeType {
        match merged.get(name) {
            Some(Declaration::Object(t)) => t,
            other => panic!("expected object {name}, got {other:?}"),
        }
    }

    #[test]
    fn test_first_seen_order_across_groups() {
        let merged = merge("type B { b: Int } type A { a: Int } type B { c: Int } scalar C");
        assert_eq!(merged.paths(), vec!["B", "A", "C"]);
        assert_eq!(object(&merged, "B").field_names(), vec!["b", "c"]);
    }

    #[test]
    fn test_interfaces_are_unioned() {
        let merged = merge(
            "type User implements Node { id: ID! } type User implements Entity & Node { id: ID! }",
        );
        assert_eq!(object(&merged, "User").interfaces, vec!["Node", "Entity"]);
    }

    #[test]
    fn test_conflicting_field_keeps_earliest_by_default() {
        let merged = merge("type User { id: ID } type User { id: String }");
        assert_eq!(object(&merged, "User").fields[0].ty.to_string(), "ID");
    }

    #[test]
    fn test_conflicting_field_errors_when_strict() {
        let config = MergeConfig::default().with_throw_on_conflict(true);
        let err = merge_with("type User { id: ID } type User { id: String }", &config).unwrap_err();
        match err {
            MergeError::Conflict(conflict) => {
                assert_eq!(conflict.kind, DeclarationKind::ObjectType);
                assert_eq!(conflict.member, "User.id");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_ignore_field_conflicts_wins_over_throw() {
        let mut config = MergeConfig::default().with_throw_on_conflict(true);
        config.ignore_field_conflicts = true;
        let merged = merge_with("type User { id: ID } type User { id: String }", &config).unwrap();
        assert_eq!(object(&merged, "User").fields[0].ty.to_string(), "ID");
    }

    #[test]
    fn test_hook_decides_before_policy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let config = MergeConfig::default()
            .with_throw_on_conflict(true)
            .with_on_field_conflict(FieldConflictHook::new(move |conflict| {
                seen.fetch_add(1, Ordering::SeqCst);
                assert_eq!(conflict.field_name, "id");
                assert_eq!(conflict.argument, None);
                ConflictResolution::TakeIncoming
            }));
        let merged = merge_with("type User { id: ID } type User { id: String }", &config).unwrap();
        assert_eq!(object(&merged, "User").fields[0].ty.to_string(), "String");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hook_sees_clashing_argument_types() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let config = MergeConfig::default().with_on_field_conflict(FieldConflictHook::new(
            move |conflict| {
                seen.fetch_add(1, Ordering::SeqCst);
                assert_eq!(conflict.type_name, "Query");
                assert_eq!(conflict.field_name, "users");
                assert_eq!(conflict.argument, Some("first"));
                assert_eq!(conflict.existing.to_string(), "Int");
                assert_eq!(conflict.incoming.to_string(), "String");
                ConflictResolution::TakeIncoming
            },
        ));
        let merged = merge_with(
            "type Query { users(first: Int): [User] } type Query { users(first: String): [User] }",
            &config,
        )
        .unwrap();
        let users = &object(&merged, "Query").fields[0];
        assert_eq!(users.arguments[0].ty.to_string(), "String");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nullability_difference_keeps_non_null() {
        let merged = merge("type User { id: ID } type User { id: ID! }");
        assert_eq!(object(&merged, "User").fields[0].ty.to_string(), "ID!");
    }

    #[test]
    fn test_field_arguments_union_and_conflict() {
        let merged = merge(
            "type Query { users(first: Int): [User] } type Query { users(after: String): [User] }",
        );
        let users = &object(&merged, "Query").fields[0];
        let names: Vec<_> = users.arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["first", "after"]);

        let strict = MergeConfig::default().with_throw_on_conflict(true);
        let err = merge_with(
            "type Query { users(first: Int): [User] } type Query { users(first: String): [User] }",
            &strict,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Query.users"));
    }

    #[test]
    fn test_directives_append_or_prepend() {
        let sdl = "type User @a { id: ID } type User @b { id: ID }";
        let appended = merge(sdl);
        let names: Vec<_> = object(&appended, "User")
            .directives
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let mut config = MergeConfig::default();
        config.reverse_directives = true;
        let prepended = merge_with(sdl, &config).unwrap();
        let names: Vec<_> = object(&prepended, "User")
            .directives
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_union_members_deduplicated() {
        let merged = merge("union R = A | B union R = B | C");
        let Some(Declaration::Union(union)) = merged.get("R") else {
            panic!("expected union");
        };
        assert_eq!(union.members, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_enum_values_union_and_consistency() {
        let merged = merge("enum Color { RED } enum Color { GREEN RED }");
        let Some(Declaration::Enum(color)) = merged.get("Color") else {
            panic!("expected enum");
        };
        assert_eq!(color.value_names(), vec!["RED", "GREEN"]);

        let sdl = "enum Color { RED } enum Color { RED @deprecated }";
        let relaxed = merge(sdl);
        let Some(Declaration::Enum(color)) = relaxed.get("Color") else {
            panic!("expected enum");
        };
        assert_eq!(color.values[0].directives.len(), 1);

        let mut config = MergeConfig::default();
        config.consistent_enum_merge = true;
        let err = merge_with(sdl, &config).unwrap_err();
        assert!(matches!(err, MergeError::Conflict(ref c) if c.member == "Color.RED"));
    }

    #[test]
    fn test_input_fields_require_exact_types() {
        let strict = MergeConfig::default().with_throw_on_conflict(true);
        let err = merge_with("input New { name: String } input New { name: String! }", &strict)
            .unwrap_err();
        assert!(matches!(err, MergeError::Conflict(ref c) if c.member == "New.name"));

        let merged = merge("input New { name: String } input New { age: Int = 3 }");
        let Some(Declaration::InputObject(input)) = merged.get("New") else {
            panic!("expected input");
        };
        assert_eq!(input.fields.len(), 2);
    }

    #[test]
    fn test_directive_definitions_union_locations() {
        let merged = merge("directive @auth on FIELD_DEFINITION directive @auth(role: String) on OBJECT");
        let Some(Declaration::Directive(auth)) = merged.get("@auth") else {
            panic!("expected directive");
        };
        assert_eq!(auth.locations.len(), 2);
        assert_eq!(auth.arguments.len(), 1);
    }

    #[test]
    fn test_directive_repeatable_mismatch() {
        let sdl = "directive @tag on OBJECT directive @tag repeatable on OBJECT";
        let merged = merge(sdl);
        let Some(Declaration::Directive(tag)) = merged.get("@tag") else {
            panic!("expected directive");
        };
        assert!(!tag.repeatable);

        let strict = MergeConfig::default().with_throw_on_conflict(true);
        assert!(merge_with(sdl, &strict).is_err());
    }

    #[test]
    fn test_kind_mismatch_always_errors() {
        let err = merge_with("type Thing { a: Int } enum Thing { A }", &MergeConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("redeclared as enum"));
    }

    #[test]
    fn test_extensions_fold_into_base() {
        let merged = merge("extend type User { name: String } type User { id: ID }");
        let user = object(&merged, "User");
        assert!(!user.extension);
        assert_eq!(user.field_names(), vec!["name", "id"]);

        let lone = merge("extend type Orphan { a: Int }");
        assert!(object(&lone, "Orphan").extension);

        let mut config = MergeConfig::default();
        config.convert_extensions = true;
        let converted = merge_with("extend type Orphan { a: Int }", &config).unwrap();
        assert!(!object(&converted, "Orphan").extension);
    }

    #[test]
    fn test_exclusions_drop_types_and_members() {
        let config = MergeConfig::default().with_exclusions(["Internal", "User.secret", "@auth"]);
        let merged = merge_with(
            "type Internal { x: Int } type User { id: ID secret: String } directive @auth on OBJECT",
            &config,
        )
        .unwrap();
        assert_eq!(merged.paths(), vec!["User"]);
        assert_eq!(object(&merged, "User").field_names(), vec!["id"]);
    }

    #[test]
    fn test_multiple_root_blocks_are_unioned() {
        let merged = merge("schema { query: Q } schema { mutation: M query: Q }");
        let root = merged.root().unwrap();
        assert_eq!(root.operation_type(OperationType::Query), Some("Q"));
        assert_eq!(root.operation_type(OperationType::Mutation), Some("M"));

        let strict = MergeConfig::default().with_throw_on_conflict(true);
        let err = merge_with("schema { query: Q } schema { query: Other }", &strict).unwrap_err();
        assert!(err.to_string().contains("schema.query"));
    }

    #[test]
    fn test_comments_recorded_only_in_comment_mode() {
        let sdl = "# Account\ntype User {\n  # Key\n  id: ID\n}\n";
        let doc = parse(sdl).unwrap();

        let mut comments = CommentRegistry::new();
        NodeMerger::new(&MergeConfig::default())
            .merge(doc.definitions.clone(), &mut comments)
            .unwrap();
        assert!(comments.is_empty());

        let config = MergeConfig::default().with_comment_descriptions(true);
        NodeMerger::new(&config)
            .merge(doc.definitions, &mut comments)
            .unwrap();
        assert_eq!(comments.lookup("User"), Some("Account"));
        assert_eq!(comments.lookup("User.id"), Some("Key"));
    }

    #[test]
    fn test_comments_come_from_surviving_definitions() {
        let config = MergeConfig::default().with_comment_descriptions(true);
        let doc = parse(
            "enum Color {\n  # old meaning\n  RED\n}\n\
             enum Color { \"new meaning\" RED @deprecated }\n\
             # entry\nschema { query: Q }\n",
        )
        .unwrap();

        let mut comments = CommentRegistry::new();
        NodeMerger::new(&config)
            .merge(doc.definitions, &mut comments)
            .unwrap();
        assert_eq!(comments.lookup("Color.RED"), None);
        assert_eq!(comments.lookup("schema"), Some("entry"));
    }

    #[test]
    fn test_map_insert_replaces_in_place() {
        let mut map = MergedResultMap::new();
        assert!(map.insert(Declaration::Scalar(ScalarType::new("A"))).is_none());
        map.insert(Declaration::Scalar(ScalarType::new("B")));
        let replaced = map.insert(Declaration::Scalar(ScalarType::new("A")));
        assert!(replaced.is_some());
        assert_eq!(map.paths(), vec!["A", "B"]);
        map.insert(Declaration::Schema(SchemaDefinition::default()));
        assert_eq!(map.len(), 3);
        assert!(matches!(
            map.into_declarations().last(),
            Some(Declaration::Schema(_))
        ));
    }
}
