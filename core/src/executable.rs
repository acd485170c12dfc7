//! In-memory executable schema built from a document.
//!
//! [`ExecutableSchema::build`] folds extensions into their base definitions,
//! checks that every referenced type exists and resolves the root operation
//! types. [`ExecutableSchema::to_document`] derives the equivalent document
//! again, which is how the merge engine consumes already-built schemas.
//!
//! # Example
//!
//! ```
//! use sdl_merge_core::{ExecutableSchema, parse};
//!
//! let doc = parse("type Query { me: User } type User { id: ID! } extend type User { name: String }").unwrap();
//! let schema = ExecutableSchema::build(&doc).unwrap();
//! assert_eq!(schema.query_type(), Some("Query"));
//! assert_eq!(schema.types().len(), 2);
//!
//! let derived = schema.to_document();
//! assert!(derived.schema_definition().is_some());
//! ```

use std::collections::{HashMap, HashSet};

use crate::error::BuildError;
use crate::types::{
    Declaration, DirectiveDefinition, DirectiveUsage, Document, InputValue, OperationType,
    SchemaDefinition, is_builtin_scalar,
};

/// A validated schema with extensions applied and roots resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableSchema {
    types: Vec<Declaration>,
    directives: Vec<DirectiveDefinition>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    description: Option<String>,
    comment: Option<String>,
    schema_directives: Vec<DirectiveUsage>,
}

impl ExecutableSchema {
    /// Builds a schema from a type-system document.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] for duplicate definitions or members,
    /// extensions without a matching base, references to undefined types,
    /// and root operation types that are not defined object types.
    pub fn build(doc: &Document) -> Result<Self, BuildError> {
        let mut types: Vec<Declaration> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut directives: Vec<DirectiveDefinition> = Vec::new();
        let mut directive_names: HashSet<String> = HashSet::new();
        let mut schema: Option<SchemaDefinition> = None;
        let mut schema_extensions: Vec<&SchemaDefinition> = Vec::new();
        let mut extensions: Vec<&Declaration> = Vec::new();

        for decl in &doc.definitions {
            match decl {
                Declaration::Schema(s) if s.extension => schema_extensions.push(s),
                Declaration::Schema(s) => {
                    if schema.is_some() {
                        return Err(BuildError::DuplicateSchemaDefinition);
                    }
                    schema = Some(s.clone());
                }
                Declaration::Directive(d) => {
                    if !directive_names.insert(d.name.clone()) {
                        return Err(BuildError::DuplicateDefinition(format!("@{}", d.name)));
                    }
                    directives.push(d.clone());
                }
                other if other.is_extension() => extensions.push(other),
                other => {
                    let name = other.name().unwrap_or_default().to_string();
                    if index.contains_key(&name) {
                        return Err(BuildError::DuplicateDefinition(name));
                    }
                    index.insert(name, types.len());
                    types.push(other.clone());
                }
            }
        }

        for extension in extensions {
            let name = extension.name().unwrap_or_default();
            let position = *index
                .get(name)
                .ok_or_else(|| BuildError::ExtensionWithoutBase(name.to_string()))?;
            apply_extension(&mut types[position], extension)?;
        }

        for decl in &types {
            check_members(decl)?;
            check_references(decl, &index)?;
        }
        for directive in &directives {
            check_arguments(&format!("@{}", directive.name), &directive.arguments, &index)?;
        }

        let mut schema = schema.unwrap_or_default();
        for extension in schema_extensions {
            schema.directives.extend(extension.directives.iter().cloned());
            schema.operations.extend(extension.operations.iter().cloned());
        }

        let explicit_roots = !schema.operations.is_empty();
        let mut roots: [Option<String>; 3] = [None, None, None];
        for (slot, operation) in roots.iter_mut().zip(OperationType::ALL) {
            let candidate = if explicit_roots {
                schema.operation_type(operation).map(str::to_string)
            } else {
                let conventional = operation.default_type_name();
                index
                    .get(conventional)
                    .filter(|&&i| matches!(types[i], Declaration::Object(_)))
                    .map(|_| conventional.to_string())
            };
            if let Some(type_name) = &candidate {
                let is_object = index
                    .get(type_name)
                    .is_some_and(|&i| matches!(types[i], Declaration::Object(_)));
                if !is_object {
                    return Err(BuildError::InvalidRootType {
                        operation: operation.to_string(),
                        type_name: type_name.clone(),
                    });
                }
            }
            *slot = candidate;
        }
        let [query_type, mutation_type, subscription_type] = roots;

        Ok(Self {
            types,
            directives,
            query_type,
            mutation_type,
            subscription_type,
            description: schema.description,
            comment: schema.comment,
            schema_directives: schema.directives,
        })
    }

    pub fn query_type(&self) -> Option<&str> {
        self.query_type.as_deref()
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    /// Root type bound to `operation`.
    pub fn root_type(&self, operation: OperationType) -> Option<&str> {
        match operation {
            OperationType::Query => self.query_type(),
            OperationType::Mutation => self.mutation_type(),
            OperationType::Subscription => self.subscription_type(),
        }
    }

    pub fn get_type(&self, name: &str) -> Option<&Declaration> {
        self.types.iter().find(|decl| decl.name() == Some(name))
    }

    /// Named types in definition order, extensions folded in.
    pub fn types(&self) -> &[Declaration] {
        &self.types
    }

    pub fn directives(&self) -> &[DirectiveDefinition] {
        &self.directives
    }

    /// Derives the equivalent document: types, then directive definitions,
    /// then a schema block when any root type is set.
    pub fn to_document(&self) -> Document {
        let mut definitions = self.types.clone();
        definitions.extend(self.directives.iter().cloned().map(Declaration::Directive));

        let mut schema = SchemaDefinition {
            description: self.description.clone(),
            comment: self.comment.clone(),
            directives: self.schema_directives.clone(),
            ..Default::default()
        };
        for operation in OperationType::ALL {
            if let Some(type_name) = self.root_type(operation) {
                schema = schema.with_operation(operation, type_name);
            }
        }
        if !schema.operations.is_empty() {
            definitions.push(Declaration::Schema(schema));
        }

        Document::new(definitions)
    }
}

fn apply_extension(base: &mut Declaration, extension: &Declaration) -> Result<(), BuildError> {
    match (base, extension) {
        (Declaration::Object(b), Declaration::Object(e))
        | (Declaration::Interface(b), Declaration::Interface(e)) => {
            for interface in &e.interfaces {
                if !b.interfaces.contains(interface) {
                    b.interfaces.push(interface.clone());
                }
            }
            b.directives.extend(e.directives.iter().cloned());
            b.fields.extend(e.fields.iter().cloned());
        }
        (Declaration::Union(b), Declaration::Union(e)) => {
            b.directives.extend(e.directives.iter().cloned());
            b.members.extend(e.members.iter().cloned());
        }
        (Declaration::Enum(b), Declaration::Enum(e)) => {
            b.directives.extend(e.directives.iter().cloned());
            b.values.extend(e.values.iter().cloned());
        }
        (Declaration::InputObject(b), Declaration::InputObject(e)) => {
            b.directives.extend(e.directives.iter().cloned());
            b.fields.extend(e.fields.iter().cloned());
        }
        (Declaration::Scalar(b), Declaration::Scalar(e)) => {
            b.directives.extend(e.directives.iter().cloned());
        }
        (base, extension) => {
            return Err(BuildError::ExtensionKindMismatch {
                name: extension.name().unwrap_or_default().to_string(),
                expected: base.kind().to_string(),
            });
        }
    }
    Ok(())
}

fn check_unique<'a>(
    owner: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(BuildError::DuplicateMember {
                name: owner.to_string(),
                member: name.to_string(),
            });
        }
    }
    Ok(())
}

fn check_members(decl: &Declaration) -> Result<(), BuildError> {
    match decl {
        Declaration::Object(t) | Declaration::Interface(t) => {
            check_unique(&t.name, t.fields.iter().map(|f| f.name.as_str()))?;
            for field in &t.fields {
                check_unique(
                    &format!("{}.{}", t.name, field.name),
                    field.arguments.iter().map(|a| a.name.as_str()),
                )?;
            }
            Ok(())
        }
        Declaration::Union(t) => check_unique(&t.name, t.members.iter().map(String::as_str)),
        Declaration::Enum(t) => check_unique(&t.name, t.values.iter().map(|v| v.name.as_str())),
        Declaration::InputObject(t) => {
            check_unique(&t.name, t.fields.iter().map(|f| f.name.as_str()))
        }
        Declaration::Scalar(_) | Declaration::Directive(_) | Declaration::Schema(_) => Ok(()),
    }
}

fn require_type(
    referenced: &str,
    from: &str,
    index: &HashMap<String, usize>,
) -> Result<(), BuildError> {
    if is_builtin_scalar(referenced) || index.contains_key(referenced) {
        Ok(())
    } else {
        Err(BuildError::UnknownType {
            referenced: referenced.to_string(),
            from: from.to_string(),
        })
    }
}

fn check_arguments(
    owner: &str,
    arguments: &[InputValue],
    index: &HashMap<String, usize>,
) -> Result<(), BuildError> {
    for arg in arguments {
        require_type(arg.ty.base_name(), &format!("{owner}.{}", arg.name), index)?;
    }
    Ok(())
}

fn check_references(decl: &Declaration, index: &HashMap<String, usize>) -> Result<(), BuildError> {
    match decl {
        Declaration::Object(t) | Declaration::Interface(t) => {
            for interface in &t.interfaces {
                require_type(interface, &t.name, index)?;
            }
            for field in &t.fields {
                let path = format!("{}.{}", t.name, field.name);
                require_type(field.ty.base_name(), &path, index)?;
                check_arguments(&path, &field.arguments, index)?;
            }
        }
        Declaration::Union(t) => {
            for member in &t.members {
                require_type(member, &t.name, index)?;
            }
        }
        Declaration::InputObject(t) => check_arguments(&t.name, &t.fields, index)?,
        Declaration::Enum(_)
        | Declaration::Scalar(_)
        | Declaration::Directive(_)
        | Declaration::Schema(_) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn build(source: &str) -> Result<ExecutableSchema, BuildError> {
        ExecutableSchema::build(&parse(source).unwrap())
    }

    #[test]
    fn test_build_folds_extensions() {
        let schema = build("type Query { a: Int } extend type Query { b: String }").unwrap();
        let Some(Declaration::Object(query)) = schema.get_type("Query") else {
            panic!("Query missing")
        };
        assert_eq!(query.field_names(), vec!["a", "b"]);
        assert!(!query.extension);
    }

    #[test]
    fn test_build_rejects_duplicate_definitions() {
        let err = build("type A { a: Int } type A { b: Int }").unwrap_err();
        assert_eq!(err, BuildError::DuplicateDefinition("A".to_string()));
    }

    #[test]
    fn test_build_rejects_duplicate_field_after_extension() {
        let err = build("type A { a: Int } extend type A { a: String }").unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateMember {
                name: "A".to_string(),
                member: "a".to_string()
            }
        );
    }

    #[test]
    fn test_build_rejects_unknown_types() {
        let err = build("type Query { me: User }").unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownType {
                referenced: "User".to_string(),
                from: "Query.me".to_string()
            }
        );
    }

    #[test]
    fn test_build_rejects_orphan_extension() {
        let err = build("extend type Ghost { a: Int }").unwrap_err();
        assert_eq!(err, BuildError::ExtensionWithoutBase("Ghost".to_string()));
    }

    #[test]
    fn test_explicit_roots_must_be_object_types() {
        let schema = build("schema { query: Root } type Root { a: Int }").unwrap();
        assert_eq!(schema.query_type(), Some("Root"));
        assert_eq!(schema.mutation_type(), None);

        let err = build("schema { query: Missing }").unwrap_err();
        assert!(matches!(err, BuildError::InvalidRootType { .. }));
    }

    #[test]
    fn test_to_document_emits_schema_block_for_roots() {
        let schema = build("type Query { a: Int } type Mutation { b: Int } directive @x on FIELD")
            .unwrap();
        let doc = schema.to_document();
        assert_eq!(doc.names(), vec!["Query", "Mutation", "x"]);
        let block = doc.schema_definition().unwrap();
        assert_eq!(block.operation_type(OperationType::Query), Some("Query"));
        assert_eq!(block.operation_type(OperationType::Mutation), Some("Mutation"));
    }

    #[test]
    fn test_to_document_keeps_schema_block_comment() {
        let schema = build("# Entry points\nschema { query: Root } type Root { a: Int }").unwrap();
        let doc = schema.to_document();
        let block = doc.schema_definition().unwrap();
        assert_eq!(block.comment.as_deref(), Some("Entry points"));
        assert_eq!(block.operation_type(OperationType::Query), Some("Root"));
    }

    #[test]
    fn test_to_document_without_roots_has_no_schema_block() {
        let doc = build("type User { id: ID }").unwrap().to_document();
        assert!(doc.schema_definition().is_none());
    }
}
