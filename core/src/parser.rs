//! Parser for type-system documents.
//!
//! The parser converts the token stream of a [`Lexer`] into a [`Document`].
//! Only type-system definitions and extensions are accepted; operations and
//! fragments are rejected with a [`SyntaxError`].
//!
//! A block of `#` comment lines ending on the line directly above a
//! declaration, field, argument, input field or enum value is attached to
//! that node as its `comment`. Comments trailing other tokens on the same
//! line are ignored.
//!
//! # Example
//!
//! ```
//! use sdl_merge_core::{Declaration, parse};
//!
//! let doc = parse("# A user\ntype User { id: ID! }").unwrap();
//! let Declaration::Object(user) = &doc.definitions[0] else { panic!() };
//! assert_eq!(user.comment.as_deref(), Some("A user"));
//! assert_eq!(user.fields[0].ty.to_string(), "ID!");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyntaxError};
use crate::lexer::{Lexer, Span, Token, TokenKind};
use crate::types::{
    CompositeType, Declaration, DirectiveDefinition, DirectiveLocation, DirectiveUsage, Document,
    EnumType, EnumValue, Field, InputObjectType, InputValue, OperationType,
    OperationTypeDefinition, ScalarType, SchemaDefinition, TypeRef, UnionType, Value,
};

/// Origin name used when text is parsed without one.
pub const DEFAULT_ORIGIN: &str = "schema.graphql";

/// Source text together with the name of where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub body: String,
    pub name: String,
}

impl Source {
    pub fn new(body: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            name: name.into(),
        }
    }
}

/// Parses text into a document, using [`DEFAULT_ORIGIN`] in errors.
///
/// # Errors
///
/// Returns a [`SyntaxError`] when the text is not a valid type-system
/// document.
pub fn parse(text: &str) -> Result<Document> {
    Parser::new(text, DEFAULT_ORIGIN).parse_document()
}

/// Parses a named source into a document.
///
/// # Errors
///
/// Returns a [`SyntaxError`] naming `source.name` when the text is not a
/// valid type-system document.
pub fn parse_source(source: &Source) -> Result<Document> {
    Parser::new(&source.body, &source.name).parse_document()
}

/// Parser for schema definition language source.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Comment block directly above `current`.
    current_comment: Option<String>,
    /// Line on which `current` ends, used to drop trailing comments.
    current_end_line: u32,
    /// Origin name for error messages.
    origin: String,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, origin: &str) -> Self {
        let mut parser = Self {
            lexer: Lexer::new(source),
            current: Token::new(TokenKind::Eof, Span::default()),
            current_comment: None,
            current_end_line: 0,
            origin: origin.to_string(),
        };
        parser.bump();
        parser
    }

    /// Parses the whole source as a document.
    ///
    /// # Errors
    /// Returns an error if the source cannot be parsed.
    pub fn parse_document(&mut self) -> Result<Document> {
        let mut definitions = Vec::new();
        while self.current.kind != TokenKind::Eof {
            definitions.push(self.parse_definition()?);
        }
        Ok(Document::new(definitions))
    }

    /// Moves to the next significant token, collecting the comment block
    /// that precedes it. Returns the token that was current.
    fn bump(&mut self) -> Token {
        let previous_end = self.current_end_line;
        let mut block: Vec<String> = Vec::new();
        let mut last_comment_line: Option<u32> = None;

        loop {
            let token = self.lexer.next_token();
            if let TokenKind::Comment(text) = &token.kind {
                if previous_end != 0 && token.span.line == previous_end {
                    continue;
                }
                if last_comment_line.is_some_and(|line| line + 1 != token.span.line) {
                    block.clear();
                }
                last_comment_line = Some(token.span.line);
                block.push(text.clone());
                continue;
            }

            let comment = match last_comment_line {
                Some(line) if line + 1 == token.span.line && !block.is_empty() => {
                    Some(block.join("\n"))
                }
                _ => None,
            };
            self.current_end_line = self.lexer.line();
            self.current_comment = comment;
            return std::mem::replace(&mut self.current, token);
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            origin: self.origin.clone(),
            line: self.current.span.line,
            column: self.current.span.column,
        }
    }

    fn unexpected(&self) -> SyntaxError {
        match &self.current.kind {
            TokenKind::Error(msg) => self.error(msg.clone()),
            other => self.error(format!("unexpected {}", other.describe())),
        }
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Name(name) if name == keyword)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                kind.describe(),
                self.current.kind.describe()
            )))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.at_keyword(keyword) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(format!(
                "expected \"{keyword}\", found {}",
                self.current.kind.describe()
            )))
        }
    }

    fn expect_name(&mut self) -> Result<String> {
        match &self.current.kind {
            TokenKind::Name(name) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            TokenKind::Error(_) => Err(self.unexpected()),
            other => Err(self.error(format!("expected name, found {}", other.describe()))),
        }
    }

    fn take_comment(&mut self) -> Option<String> {
        self.current_comment.take()
    }

    fn parse_description(&mut self) -> Option<String> {
        match &self.current.kind {
            TokenKind::String(text) | TokenKind::BlockString(text) => {
                let text = text.clone();
                self.bump();
                Some(text)
            }
            _ => None,
        }
    }

    fn parse_definition(&mut self) -> Result<Declaration> {
        let comment = self.take_comment();
        let description = self.parse_description();

        let keyword = match &self.current.kind {
            TokenKind::Name(name) => name.clone(),
            TokenKind::LBrace => {
                return Err(self.error("executable definitions are not supported"));
            }
            _ => return Err(self.unexpected()),
        };

        if keyword == "extend" {
            if description.is_some() {
                return Err(self.error("extensions cannot have a description"));
            }
            self.bump();
            let mut decl = self.parse_type_system_definition(None)?;
            decl.set_extension(true);
            set_comment(&mut decl, comment);
            return Ok(decl);
        }

        let mut decl = self.parse_type_system_definition(description)?;
        set_comment(&mut decl, comment);
        Ok(decl)
    }

    fn parse_type_system_definition(&mut self, description: Option<String>) -> Result<Declaration> {
        let keyword = match &self.current.kind {
            TokenKind::Name(name) => name.clone(),
            _ => return Err(self.unexpected()),
        };

        match keyword.as_str() {
            "schema" => self.parse_schema_definition(description),
            "scalar" => self.parse_scalar(description),
            "type" => self
                .parse_composite("type", description)
                .map(Declaration::Object),
            "interface" => self
                .parse_composite("interface", description)
                .map(Declaration::Interface),
            "union" => self.parse_union(description),
            "enum" => self.parse_enum(description),
            "input" => self.parse_input_object(description),
            "directive" => self.parse_directive_definition(description),
            "query" | "mutation" | "subscription" | "fragment" => {
                Err(self.error("executable definitions are not supported"))
            }
            other => Err(self.error(format!("unknown definition keyword \"{other}\""))),
        }
    }

    fn parse_schema_definition(&mut self, description: Option<String>) -> Result<Declaration> {
        self.expect_keyword("schema")?;
        let directives = self.parse_directives()?;
        let mut operations = Vec::new();

        if self.eat(&TokenKind::LBrace) {
            while !self.eat(&TokenKind::RBrace) {
                let keyword = self.expect_name()?;
                let operation = OperationType::from_keyword(&keyword).ok_or_else(|| {
                    self.error(format!("unknown operation type \"{keyword}\""))
                })?;
                self.expect(&TokenKind::Colon)?;
                let type_name = self.expect_name()?;
                operations.push(OperationTypeDefinition {
                    operation,
                    type_name,
                });
            }
        }

        Ok(Declaration::Schema(SchemaDefinition {
            description,
            comment: None,
            directives,
            operations,
            extension: false,
        }))
    }

    fn parse_scalar(&mut self, description: Option<String>) -> Result<Declaration> {
        self.expect_keyword("scalar")?;
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        Ok(Declaration::Scalar(ScalarType {
            name,
            description,
            comment: None,
            directives,
            extension: false,
        }))
    }

    fn parse_composite(&mut self, keyword: &str, description: Option<String>) -> Result<CompositeType> {
        self.expect_keyword(keyword)?;
        let name = self.expect_name()?;

        let mut interfaces = Vec::new();
        if self.at_keyword("implements") {
            self.bump();
            self.eat(&TokenKind::Amp);
            interfaces.push(self.expect_name()?);
            while self.eat(&TokenKind::Amp) {
                interfaces.push(self.expect_name()?);
            }
        }

        let directives = self.parse_directives()?;
        let mut fields = Vec::new();
        if self.eat(&TokenKind::LBrace) {
            while !self.eat(&TokenKind::RBrace) {
                fields.push(self.parse_field()?);
            }
        }

        Ok(CompositeType {
            name,
            description,
            comment: None,
            interfaces,
            directives,
            fields,
            extension: false,
        })
    }

    fn parse_field(&mut self) -> Result<Field> {
        let comment = self.take_comment();
        let description = self.parse_description();
        let name = self.expect_name()?;
        let arguments = self.parse_arguments_definition()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let directives = self.parse_directives()?;
        Ok(Field {
            name,
            description,
            comment,
            arguments,
            ty,
            directives,
        })
    }

    fn parse_arguments_definition(&mut self) -> Result<Vec<InputValue>> {
        let mut arguments = Vec::new();
        if self.eat(&TokenKind::LParen) {
            while !self.eat(&TokenKind::RParen) {
                arguments.push(self.parse_input_value()?);
            }
            if arguments.is_empty() {
                return Err(self.error("argument list cannot be empty"));
            }
        }
        Ok(arguments)
    }

    fn parse_input_value(&mut self) -> Result<InputValue> {
        let comment = self.take_comment();
        let description = self.parse_description();
        let name = self.expect_name()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let default_value = if self.eat(&TokenKind::Equals) {
            Some(self.parse_value()?)
        } else {
            None
        };
        let directives = self.parse_directives()?;
        Ok(InputValue {
            name,
            description,
            comment,
            ty,
            default_value,
            directives,
        })
    }

    fn parse_union(&mut self, description: Option<String>) -> Result<Declaration> {
        self.expect_keyword("union")?;
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        let mut members = Vec::new();
        if self.eat(&TokenKind::Equals) {
            self.eat(&TokenKind::Pipe);
            members.push(self.expect_name()?);
            while self.eat(&TokenKind::Pipe) {
                members.push(self.expect_name()?);
            }
        }
        Ok(Declaration::Union(UnionType {
            name,
            description,
            comment: None,
            directives,
            members,
            extension: false,
        }))
    }

    fn parse_enum(&mut self, description: Option<String>) -> Result<Declaration> {
        self.expect_keyword("enum")?;
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        let mut values = Vec::new();
        if self.eat(&TokenKind::LBrace) {
            while !self.eat(&TokenKind::RBrace) {
                let comment = self.take_comment();
                let description = self.parse_description();
                let value_name = self.expect_name()?;
                if matches!(value_name.as_str(), "true" | "false" | "null") {
                    return Err(self.error(format!("enum value cannot be \"{value_name}\"")));
                }
                let directives = self.parse_directives()?;
                values.push(EnumValue {
                    name: value_name,
                    description,
                    comment,
                    directives,
                });
            }
        }
        Ok(Declaration::Enum(EnumType {
            name,
            description,
            comment: None,
            directives,
            values,
            extension: false,
        }))
    }

    fn parse_input_object(&mut self, description: Option<String>) -> Result<Declaration> {
        self.expect_keyword("input")?;
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        let mut fields = Vec::new();
        if self.eat(&TokenKind::LBrace) {
            while !self.eat(&TokenKind::RBrace) {
                fields.push(self.parse_input_value()?);
            }
        }
        Ok(Declaration::InputObject(InputObjectType {
            name,
            description,
            comment: None,
            directives,
            fields,
            extension: false,
        }))
    }

    fn parse_directive_definition(&mut self, description: Option<String>) -> Result<Declaration> {
        self.expect_keyword("directive")?;
        self.expect(&TokenKind::At)?;
        let name = self.expect_name()?;
        let arguments = self.parse_arguments_definition()?;
        let repeatable = if self.at_keyword("repeatable") {
            self.bump();
            true
        } else {
            false
        };
        self.expect_keyword("on")?;
        self.eat(&TokenKind::Pipe);
        let mut locations = vec![self.parse_directive_location()?];
        while self.eat(&TokenKind::Pipe) {
            locations.push(self.parse_directive_location()?);
        }
        Ok(Declaration::Directive(DirectiveDefinition {
            name,
            description,
            comment: None,
            arguments,
            repeatable,
            locations,
        }))
    }

    fn parse_directive_location(&mut self) -> Result<DirectiveLocation> {
        let name = self.expect_name()?;
        DirectiveLocation::parse(&name)
            .ok_or_else(|| self.error(format!("unknown directive location \"{name}\"")))
    }

    fn parse_directives(&mut self) -> Result<Vec<DirectiveUsage>> {
        let mut directives = Vec::new();
        while self.eat(&TokenKind::At) {
            let name = self.expect_name()?;
            let mut arguments = Vec::new();
            if self.eat(&TokenKind::LParen) {
                while !self.eat(&TokenKind::RParen) {
                    let arg_name = self.expect_name()?;
                    self.expect(&TokenKind::Colon)?;
                    arguments.push((arg_name, self.parse_value()?));
                }
            }
            directives.push(DirectiveUsage { name, arguments });
        }
        Ok(directives)
    }

    fn parse_type(&mut self) -> Result<TypeRef> {
        let inner = if self.eat(&TokenKind::LBracket) {
            let item = self.parse_type()?;
            self.expect(&TokenKind::RBracket)?;
            TypeRef::list(item)
        } else {
            TypeRef::Named(self.expect_name()?)
        };
        if self.eat(&TokenKind::Bang) {
            Ok(TypeRef::NonNull(Box::new(inner)))
        } else {
            Ok(inner)
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        let value = match &self.current.kind {
            TokenKind::Int(raw) => Value::Int(raw.clone()),
            TokenKind::Float(raw) => Value::Float(raw.clone()),
            TokenKind::String(text) | TokenKind::BlockString(text) => Value::String(text.clone()),
            TokenKind::Name(name) => match name.as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                "null" => Value::Null,
                other => Value::Enum(other.to_string()),
            },
            TokenKind::LBracket => {
                self.bump();
                let mut items = Vec::new();
                while !self.eat(&TokenKind::RBracket) {
                    items.push(self.parse_value()?);
                }
                return Ok(Value::List(items));
            }
            TokenKind::LBrace => {
                self.bump();
                let mut entries = Vec::new();
                while !self.eat(&TokenKind::RBrace) {
                    let key = self.expect_name()?;
                    self.expect(&TokenKind::Colon)?;
                    entries.push((key, self.parse_value()?));
                }
                return Ok(Value::Object(entries));
            }
            TokenKind::Dollar => {
                return Err(self.error("variables are not allowed in constant values"));
            }
            _ => return Err(self.unexpected()),
        };
        self.bump();
        Ok(value)
    }
}

fn set_comment(decl: &mut Declaration, comment: Option<String>) {
    let slot = match decl {
        Declaration::Object(t) | Declaration::Interface(t) => &mut t.comment,
        Declaration::Union(t) => &mut t.comment,
        Declaration::Enum(t) => &mut t.comment,
        Declaration::InputObject(t) => &mut t.comment,
        Declaration::Scalar(t) => &mut t.comment,
        Declaration::Directive(d) => &mut d.comment,
        Declaration::Schema(s) => &mut s.comment,
    };
    *slot = comment;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(decl: &Declaration) -> &CompositeType {
        match decl {
            Declaration::Object(t) | Declaration::Interface(t) => t,
            other => panic!("expected object type, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_object_with_arguments_and_defaults() {
        let doc = parse(
            r#"
            type Query {
              users(first: Int = 10, after: String): [User!]! @deprecated(reason: "paged")
            }
            "#,
        )
        .unwrap();
        let query = object(&doc.definitions[0]);
        let users = &query.fields[0];
        assert_eq!(users.ty.to_string(), "[User!]!");
        assert_eq!(users.arguments.len(), 2);
        assert_eq!(
            users.arguments[0].default_value,
            Some(Value::Int("10".to_string()))
        );
        assert_eq!(users.directives[0].name, "deprecated");
    }

    #[test]
    fn test_parse_descriptions_and_comments() {
        let doc = parse(
            r#"
            # Shown as a comment
            """
            A person
            """
            type User {
              # identifier
              id: ID
              "display name"
              name: String # trailing, ignored
              age: Int
            }
            "#,
        )
        .unwrap();
        let user = object(&doc.definitions[0]);
        assert_eq!(user.comment.as_deref(), Some("Shown as a comment"));
        assert_eq!(user.description.as_deref(), Some("A person"));
        assert_eq!(user.fields[0].comment.as_deref(), Some("identifier"));
        assert_eq!(user.fields[1].description.as_deref(), Some("display name"));
        assert_eq!(user.fields[2].comment, None);
    }

    #[test]
    fn test_comment_separated_by_blank_line_is_dropped() {
        let doc = parse("# stray\n\ntype A { a: Int }").unwrap();
        assert_eq!(doc.definitions[0].comment(), None);
    }

    #[test]
    fn test_parse_multi_line_comment_block() {
        let doc = parse("# first\n# second\nscalar Date").unwrap();
        assert_eq!(doc.definitions[0].comment(), Some("first\nsecond"));
    }

    #[test]
    fn test_parse_interfaces_union_enum_input_directive() {
        let doc = parse(
            r#"
            interface Node { id: ID! }
            type User implements Node & Entity { id: ID! }
            union Result = | User | Post
            enum Color { RED GREEN @deprecated }
            input Filter { limit: Int = 5, tags: [String!] = ["a"] }
            directive @auth(role: String!) repeatable on FIELD_DEFINITION | OBJECT
            "#,
        )
        .unwrap();
        assert_eq!(doc.len(), 6);
        assert!(matches!(doc.definitions[0], Declaration::Interface(_)));
        assert_eq!(object(&doc.definitions[1]).interfaces, vec!["Node", "Entity"]);
        let Declaration::Union(result) = &doc.definitions[2] else {
            panic!()
        };
        assert_eq!(result.members, vec!["User", "Post"]);
        let Declaration::Enum(color) = &doc.definitions[3] else {
            panic!()
        };
        assert_eq!(color.value_names(), vec!["RED", "GREEN"]);
        let Declaration::InputObject(filter) = &doc.definitions[4] else {
            panic!()
        };
        assert_eq!(
            filter.fields[1].default_value,
            Some(Value::List(vec![Value::String("a".to_string())]))
        );
        let Declaration::Directive(auth) = &doc.definitions[5] else {
            panic!()
        };
        assert!(auth.repeatable);
        assert_eq!(
            auth.locations,
            vec![DirectiveLocation::FieldDefinition, DirectiveLocation::Object]
        );
    }

    #[test]
    fn test_parse_schema_and_extensions() {
        let doc = parse(
            r#"
            schema { query: Root mutation: Mut }
            extend type Root { extra: Int }
            extend schema @link
            "#,
        )
        .unwrap();
        let schema = doc.schema_definition().unwrap();
        assert_eq!(schema.operation_type(OperationType::Query), Some("Root"));
        assert_eq!(schema.operation_type(OperationType::Mutation), Some("Mut"));
        assert!(doc.definitions[1].is_extension());
        assert!(doc.definitions[2].is_extension());
    }

    #[test]
    fn test_syntax_error_reports_origin_and_position() {
        let source = Source::new("type User {\n  id ID\n}", "users.graphql");
        let err = parse_source(&source).unwrap_err();
        assert_eq!(err.origin, "users.graphql");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 6);
        assert!(err.to_string().starts_with("users.graphql:2:6:"));
    }

    #[test]
    fn test_rejects_executable_definitions() {
        let err = parse("query { me }").unwrap_err();
        assert!(err.message.contains("executable definitions"));
        assert!(parse("{ me }").is_err());
    }

    #[test]
    fn test_rejects_variables_in_default_values() {
        assert!(parse("input A { a: Int = $x }").is_err());
    }
}
