//! Declaration tree definitions for schema definition language documents.
//!
//! This module defines the data model shared by the parser, the printer, the
//! executable schema builder and the merge engine. The types are designed for
//! serialization with [`serde`] so a document can round-trip through JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar names every schema provides without declaring them.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Returns `true` when `name` is one of the [`BUILTIN_SCALARS`].
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// A parsed type-system document: an ordered list of declarations.
///
/// # Examples
///
/// ```
/// use sdl_merge_core::*;
///
/// let doc = Document::new(vec![
///     Declaration::Object(CompositeType::new("User").with_field(Field::new("id", TypeRef::named("ID")))),
/// ]);
/// assert_eq!(doc.len(), 1);
/// assert!(doc.find("User").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub definitions: Vec<Declaration>,
}

impl Document {
    pub fn new(definitions: Vec<Declaration>) -> Self {
        Self { definitions }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Finds the first named declaration called `name`.
    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.definitions
            .iter()
            .find(|decl| decl.name() == Some(name))
    }

    /// Returns the first root schema block, if any.
    pub fn schema_definition(&self) -> Option<&SchemaDefinition> {
        self.definitions.iter().find_map(|decl| match decl {
            Declaration::Schema(schema) => Some(schema),
            _ => None,
        })
    }

    /// Names of all named declarations, in document order.
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().filter_map(Declaration::name).collect()
    }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Kind of a [`Declaration`], used for grouping during merges and in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    ObjectType,
    InterfaceType,
    UnionType,
    EnumType,
    InputObjectType,
    ScalarType,
    DirectiveDefinition,
    RootSchemaBlock,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectType => "type",
            Self::InterfaceType => "interface",
            Self::UnionType => "union",
            Self::EnumType => "enum",
            Self::InputObjectType => "input",
            Self::ScalarType => "scalar",
            Self::DirectiveDefinition => "directive",
            Self::RootSchemaBlock => "schema",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single top-level construct of a type-system document.
///
/// Interfaces share the [`CompositeType`] shape with object types; the
/// variant carries the distinction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Declaration {
    Object(CompositeType),
    Interface(CompositeType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
    Scalar(ScalarType),
    Directive(DirectiveDefinition),
    Schema(SchemaDefinition),
}

impl Declaration {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            Self::Object(_) => DeclarationKind::ObjectType,
            Self::Interface(_) => DeclarationKind::InterfaceType,
            Self::Union(_) => DeclarationKind::UnionType,
            Self::Enum(_) => DeclarationKind::EnumType,
            Self::InputObject(_) => DeclarationKind::InputObjectType,
            Self::Scalar(_) => DeclarationKind::ScalarType,
            Self::Directive(_) => DeclarationKind::DirectiveDefinition,
            Self::Schema(_) => DeclarationKind::RootSchemaBlock,
        }
    }

    /// Declared name; `None` only for the root schema block.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Object(t) | Self::Interface(t) => Some(&t.name),
            Self::Union(t) => Some(&t.name),
            Self::Enum(t) => Some(&t.name),
            Self::InputObject(t) => Some(&t.name),
            Self::Scalar(t) => Some(&t.name),
            Self::Directive(d) => Some(&d.name),
            Self::Schema(_) => None,
        }
    }

    /// Whether the declaration was authored with `extend`.
    pub fn is_extension(&self) -> bool {
        match self {
            Self::Object(t) | Self::Interface(t) => t.extension,
            Self::Union(t) => t.extension,
            Self::Enum(t) => t.extension,
            Self::InputObject(t) => t.extension,
            Self::Scalar(t) => t.extension,
            Self::Directive(_) => false,
            Self::Schema(s) => s.extension,
        }
    }

    /// Clears the extension marker so the node prints as a definition.
    pub fn set_extension(&mut self, extension: bool) {
        match self {
            Self::Object(t) | Self::Interface(t) => t.extension = extension,
            Self::Union(t) => t.extension = extension,
            Self::Enum(t) => t.extension = extension,
            Self::InputObject(t) => t.extension = extension,
            Self::Scalar(t) => t.extension = extension,
            Self::Directive(_) => {}
            Self::Schema(s) => s.extension = extension,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Object(t) | Self::Interface(t) => t.description.as_deref(),
            Self::Union(t) => t.description.as_deref(),
            Self::Enum(t) => t.description.as_deref(),
            Self::InputObject(t) => t.description.as_deref(),
            Self::Scalar(t) => t.description.as_deref(),
            Self::Directive(d) => d.description.as_deref(),
            Self::Schema(s) => s.description.as_deref(),
        }
    }

    /// Comment block authored immediately above the declaration.
    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Object(t) | Self::Interface(t) => t.comment.as_deref(),
            Self::Union(t) => t.comment.as_deref(),
            Self::Enum(t) => t.comment.as_deref(),
            Self::InputObject(t) => t.comment.as_deref(),
            Self::Scalar(t) => t.comment.as_deref(),
            Self::Directive(d) => d.comment.as_deref(),
            Self::Schema(s) => s.comment.as_deref(),
        }
    }

    /// Node path used to key comments: the name, `@name` for directive
    /// definitions, `schema` for the root block.
    pub fn path(&self) -> String {
        match self {
            Self::Directive(d) => format!("@{}", d.name),
            Self::Schema(_) => "schema".to_string(),
            other => other.name().unwrap_or_default().to_string(),
        }
    }
}

/// Object type or interface: `type User implements Node @key { id: ID! }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUsage>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub extension: bool,
}

impl CompositeType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_interface(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_directive(mut self, directive: DirectiveUsage) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }
}

/// Union type: `union SearchResult = User | Post`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnionType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUsage>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub extension: bool,
}

impl UnionType {
    pub fn new(name: &str, members: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }
}

/// Enum type: `enum Color { RED GREEN }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUsage>,
    #[serde(default)]
    pub values: Vec<EnumValue>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub extension: bool,
}

impl EnumType {
    pub fn new(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            values: values.iter().map(|v| EnumValue::new(v)).collect(),
            ..Default::default()
        }
    }

    pub fn value_names(&self) -> Vec<&str> {
        self.values.iter().map(|value| value.name.as_str()).collect()
    }
}

/// A single enum member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUsage>,
}

impl EnumValue {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Input object type: `input NewUser { name: String! }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputObjectType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUsage>,
    #[serde(default)]
    pub fields: Vec<InputValue>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub extension: bool,
}

impl InputObjectType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: InputValue) -> Self {
        self.fields.push(field);
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&InputValue> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Custom scalar: `scalar DateTime @specifiedBy(url: "...")`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUsage>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub extension: bool,
}

impl ScalarType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Directive definition: `directive @auth(role: String) repeatable on FIELD_DEFINITION`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectiveDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<InputValue>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
}

impl DirectiveDefinition {
    pub fn new(name: &str, locations: &[DirectiveLocation]) -> Self {
        Self {
            name: name.to_string(),
            locations: locations.to_vec(),
            ..Default::default()
        }
    }
}

/// The root schema block: `schema { query: Query }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUsage>,
    #[serde(default)]
    pub operations: Vec<OperationTypeDefinition>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub extension: bool,
}

impl SchemaDefinition {
    /// Type bound to `operation`, if the block has an entry for it.
    pub fn operation_type(&self, operation: OperationType) -> Option<&str> {
        self.operations
            .iter()
            .find(|op| op.operation == operation)
            .map(|op| op.type_name.as_str())
    }

    pub fn with_operation(mut self, operation: OperationType, type_name: &str) -> Self {
        self.operations.push(OperationTypeDefinition {
            operation,
            type_name: type_name.to_string(),
        });
        self
    }
}

/// One `role: TypeName` entry of the root schema block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationTypeDefinition {
    pub operation: OperationType,
    pub type_name: String,
}

/// The three canonical operation roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    pub const ALL: [OperationType; 3] = [Self::Query, Self::Mutation, Self::Subscription];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }

    /// Conventional root type name for this role (`Query`, `Mutation`, `Subscription`).
    pub fn default_type_name(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "query" => Some(Self::Query),
            "mutation" => Some(Self::Mutation),
            "subscription" => Some(Self::Subscription),
            _ => None,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An output field of an object type or interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<InputValue>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUsage>,
}

impl Field {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            comment: None,
            arguments: Vec::new(),
            ty,
            directives: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: InputValue) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_directive(mut self, directive: DirectiveUsage) -> Self {
        self.directives.push(directive);
        self
    }
}

/// Argument or input-object field, optionally with a default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveUsage>,
}

impl InputValue {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            comment: None,
            ty,
            default_value: None,
            directives: Vec::new(),
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Reference to a type, with list and non-null modifiers.
///
/// # Examples
///
/// ```
/// use sdl_merge_core::TypeRef;
///
/// let ty = TypeRef::non_null(TypeRef::list(TypeRef::named("String")));
/// assert_eq!(ty.to_string(), "[String]!");
/// assert_eq!(ty.base_name(), "String");
/// assert!(ty.is_non_null());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        match inner {
            already @ Self::NonNull(_) => already,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Innermost named type, with all modifiers stripped.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// The type with its outermost non-null wrapper removed.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            Self::NonNull(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// Constant value used for default values and directive arguments.
///
/// Numbers keep their source text so printing reproduces the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Boolean(bool),
    Int(String),
    Float(String),
    String(String),
    Enum(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Int(raw) | Self::Float(raw) | Self::Enum(raw) => f.write_str(raw),
            Self::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Escapes a string for a single-line `"..."` literal.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// A directive applied to a node: `@deprecated(reason: "use name")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveUsage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<(String, Value)>,
}

impl DirectiveUsage {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: &str, value: Value) -> Self {
        self.arguments.push((name.to_string(), value));
        self
    }
}

impl fmt::Display for DirectiveUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("(")?;
            for (i, (name, value)) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name}: {value}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Where a directive may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl DirectiveLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Mutation => "MUTATION",
            Self::Subscription => "SUBSCRIPTION",
            Self::Field => "FIELD",
            Self::FragmentDefinition => "FRAGMENT_DEFINITION",
            Self::FragmentSpread => "FRAGMENT_SPREAD",
            Self::InlineFragment => "INLINE_FRAGMENT",
            Self::VariableDefinition => "VARIABLE_DEFINITION",
            Self::Schema => "SCHEMA",
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::FieldDefinition => "FIELD_DEFINITION",
            Self::ArgumentDefinition => "ARGUMENT_DEFINITION",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::EnumValue => "ENUM_VALUE",
            Self::InputObject => "INPUT_OBJECT",
            Self::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let location = match name {
            "QUERY" => Self::Query,
            "MUTATION" => Self::Mutation,
            "SUBSCRIPTION" => Self::Subscription,
            "FIELD" => Self::Field,
            "FRAGMENT_DEFINITION" => Self::FragmentDefinition,
            "FRAGMENT_SPREAD" => Self::FragmentSpread,
            "INLINE_FRAGMENT" => Self::InlineFragment,
            "VARIABLE_DEFINITION" => Self::VariableDefinition,
            "SCHEMA" => Self::Schema,
            "SCALAR" => Self::Scalar,
            "OBJECT" => Self::Object,
            "FIELD_DEFINITION" => Self::FieldDefinition,
            "ARGUMENT_DEFINITION" => Self::ArgumentDefinition,
            "INTERFACE" => Self::Interface,
            "UNION" => Self::Union,
            "ENUM" => Self::Enum,
            "ENUM_VALUE" => Self::EnumValue,
            "INPUT_OBJECT" => Self::InputObject,
            "INPUT_FIELD_DEFINITION" => Self::InputFieldDefinition,
            _ => return None,
        };
        Some(location)
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_display_and_base_name() {
        let ty = TypeRef::list(TypeRef::non_null(TypeRef::named("User")));
        assert_eq!(ty.to_string(), "[User!]");
        assert_eq!(ty.base_name(), "User");
        assert!(!ty.is_non_null());
    }

    #[test]
    fn test_non_null_does_not_double_wrap() {
        let ty = TypeRef::non_null(TypeRef::non_null(TypeRef::named("ID")));
        assert_eq!(ty.to_string(), "ID!");
        assert_eq!(ty.nullable(), &TypeRef::named("ID"));
    }

    #[test]
    fn test_declaration_path_and_kind() {
        let directive = Declaration::Directive(DirectiveDefinition::new(
            "auth",
            &[DirectiveLocation::FieldDefinition],
        ));
        assert_eq!(directive.path(), "@auth");
        assert_eq!(directive.kind(), DeclarationKind::DirectiveDefinition);

        let schema = Declaration::Schema(SchemaDefinition::default());
        assert_eq!(schema.name(), None);
        assert_eq!(schema.path(), "schema");
    }

    #[test]
    fn test_value_display_escapes_strings() {
        let value = Value::List(vec![
            Value::String("a\"b".to_string()),
            Value::Int("3".to_string()),
        ]);
        assert_eq!(value.to_string(), "[\"a\\\"b\", 3]");
    }

    #[test]
    fn test_directive_location_round_trips_through_names() {
        for name in ["FIELD_DEFINITION", "INPUT_OBJECT", "VARIABLE_DEFINITION"] {
            let location = DirectiveLocation::parse(name).unwrap();
            assert_eq!(location.as_str(), name);
        }
        assert!(DirectiveLocation::parse("NOWHERE").is_none());
    }

    #[test]
    fn test_document_serializes_to_json() {
        let doc = Document::new(vec![Declaration::Scalar(ScalarType::new("Date"))]);
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"kind\": \"Scalar\""));
        assert!(json.contains("\"name\": \"Date\""));
    }
}
