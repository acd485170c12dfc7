//! Printer for documents.
//!
//! Converts a [`Document`] back to schema definition language text. By
//! default descriptions are printed as string literals. With
//! [`PrintOptions::comment_descriptions`] every description slot is printed
//! as `#` comment lines instead, sourced from a [`CommentLookup`] when it
//! has an entry for the node's path and from the literal description
//! otherwise.
//!
//! # Example
//!
//! ```
//! use sdl_merge_core::{parse, print_document};
//!
//! let doc = parse("type User { id: ID!, name: String }").unwrap();
//! assert_eq!(print_document(&doc), "type User {\n  id: ID!\n  name: String\n}\n");
//! ```

use std::collections::HashMap;

use crate::types::{
    CompositeType, Declaration, DirectiveDefinition, DirectiveUsage, Document, EnumType, Field,
    InputObjectType, InputValue, ScalarType, SchemaDefinition, UnionType,
};

/// Source of preserved comments, keyed by node path (`User`, `User.id`,
/// `User.id.arg`, `Color.RED`, `@auth`, `@auth.role`, `schema`).
pub trait CommentLookup {
    fn comment_for(&self, path: &str) -> Option<&str>;
}

/// A lookup with no entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoComments;

impl CommentLookup for NoComments {
    fn comment_for(&self, _path: &str) -> Option<&str> {
        None
    }
}

impl CommentLookup for HashMap<String, String> {
    fn comment_for(&self, path: &str) -> Option<&str> {
        self.get(path).map(String::as_str)
    }
}

/// Configuration for printing.
#[derive(Debug, Clone)]
pub struct PrintOptions {
    /// Number of spaces for each indentation level.
    pub indent_width: usize,
    /// Render descriptions as `#` comments instead of string literals.
    pub comment_descriptions: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            comment_descriptions: false,
        }
    }
}

/// Prints a document with default options.
pub fn print_document(doc: &Document) -> String {
    print_document_with(doc, &PrintOptions::default(), &NoComments)
}

/// Prints a document with custom options and a comment source.
pub fn print_document_with(
    doc: &Document,
    options: &PrintOptions,
    comments: &dyn CommentLookup,
) -> String {
    let mut printer = Printer::new(options, comments);
    for (i, decl) in doc.definitions.iter().enumerate() {
        if i > 0 {
            printer.output.push('\n');
        }
        printer.print_declaration(decl);
    }
    printer.output
}

/// Prints a single declaration with default options.
pub fn print_declaration(decl: &Declaration) -> String {
    let options = PrintOptions::default();
    let mut printer = Printer::new(&options, &NoComments);
    printer.print_declaration(decl);
    printer.output
}

struct Printer<'a> {
    options: &'a PrintOptions,
    comments: &'a dyn CommentLookup,
    output: String,
    indent_level: usize,
}

impl<'a> Printer<'a> {
    fn new(options: &'a PrintOptions, comments: &'a dyn CommentLookup) -> Self {
        Self {
            options,
            comments,
            output: String::new(),
            indent_level: 0,
        }
    }

    fn indent(&self) -> String {
        " ".repeat(self.indent_level * self.options.indent_width)
    }

    fn line(&mut self, text: &str) {
        let indent = self.indent();
        self.output.push_str(&indent);
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Emits the description slot of the node at `path`.
    fn description(&mut self, path: &str, description: Option<&str>) {
        if self.options.comment_descriptions {
            let text = self.comments.comment_for(path).or(description);
            if let Some(text) = text {
                for line in text.lines() {
                    if line.is_empty() {
                        self.line("#");
                    } else {
                        self.line(&format!("# {line}"));
                    }
                }
            }
            return;
        }

        let Some(text) = description else {
            return;
        };
        if text.contains('\n') || text.contains('"') || text.contains('\\') {
            self.line("\"\"\"");
            for line in text.lines() {
                if line.is_empty() {
                    self.output.push('\n');
                } else {
                    self.line(&line.replace("\"\"\"", "\\\"\"\""));
                }
            }
            self.line("\"\"\"");
        } else {
            self.line(&format!("\"{text}\""));
        }
    }

    fn has_description(&self, path: &str, description: Option<&str>) -> bool {
        description.is_some()
            || (self.options.comment_descriptions && self.comments.comment_for(path).is_some())
    }

    fn print_declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Object(t) => self.print_composite("type", t),
            Declaration::Interface(t) => self.print_composite("interface", t),
            Declaration::Union(t) => self.print_union(t),
            Declaration::Enum(t) => self.print_enum(t),
            Declaration::InputObject(t) => self.print_input_object(t),
            Declaration::Scalar(t) => self.print_scalar(t),
            Declaration::Directive(d) => self.print_directive_definition(d),
            Declaration::Schema(s) => self.print_schema(s),
        }
    }

    fn head(&mut self, extension: bool, path: &str, description: Option<&str>) -> String {
        if extension {
            "extend ".to_string()
        } else {
            self.description(path, description);
            String::new()
        }
    }

    fn print_composite(&mut self, keyword: &str, t: &CompositeType) {
        let mut head = self.head(t.extension, &t.name, t.description.as_deref());
        head.push_str(&format!("{keyword} {}", t.name));
        if !t.interfaces.is_empty() {
            head.push_str(" implements ");
            head.push_str(&t.interfaces.join(" & "));
        }
        head.push_str(&directives_suffix(&t.directives));

        if t.fields.is_empty() {
            self.line(&head);
            return;
        }
        self.line(&format!("{head} {{"));
        self.indent_level += 1;
        for field in &t.fields {
            self.print_field(&t.name, field);
        }
        self.indent_level -= 1;
        self.line("}");
    }

    fn print_field(&mut self, owner: &str, field: &Field) {
        let path = format!("{owner}.{}", field.name);
        self.description(&path, field.description.as_deref());
        let args = self.arguments(&path, &field.arguments);
        let text = format!(
            "{}{args}: {}{}",
            field.name,
            field.ty,
            directives_suffix(&field.directives)
        );
        if args.contains('\n') {
            let indent = self.indent();
            self.output.push_str(&indent);
            self.output.push_str(&text);
            self.output.push('\n');
        } else {
            self.line(&text);
        }
    }

    /// Renders an argument list: inline when no argument carries a
    /// description, one argument per line otherwise.
    fn arguments(&mut self, owner_path: &str, arguments: &[InputValue]) -> String {
        if arguments.is_empty() {
            return String::new();
        }

        let multi_line = arguments.iter().any(|arg| {
            self.has_description(&format!("{owner_path}.{}", arg.name), arg.description.as_deref())
        });

        if !multi_line {
            let inline = arguments
                .iter()
                .map(input_value_text)
                .collect::<Vec<_>>()
                .join(", ");
            return format!("({inline})");
        }

        let outer = std::mem::take(&mut self.output);
        self.output.push_str("(\n");
        self.indent_level += 1;
        for arg in arguments {
            let path = format!("{owner_path}.{}", arg.name);
            self.description(&path, arg.description.as_deref());
            self.line(&input_value_text(arg));
        }
        self.indent_level -= 1;
        let closing = self.indent();
        self.output.push_str(&closing);
        self.output.push(')');
        std::mem::replace(&mut self.output, outer)
    }

    fn print_union(&mut self, t: &UnionType) {
        let mut text = self.head(t.extension, &t.name, t.description.as_deref());
        text.push_str(&format!("union {}", t.name));
        text.push_str(&directives_suffix(&t.directives));
        if !t.members.is_empty() {
            text.push_str(" = ");
            text.push_str(&t.members.join(" | "));
        }
        self.line(&text);
    }

    fn print_enum(&mut self, t: &EnumType) {
        let mut head = self.head(t.extension, &t.name, t.description.as_deref());
        head.push_str(&format!("enum {}", t.name));
        head.push_str(&directives_suffix(&t.directives));
        if t.values.is_empty() {
            self.line(&head);
            return;
        }
        self.line(&format!("{head} {{"));
        self.indent_level += 1;
        for value in &t.values {
            let path = format!("{}.{}", t.name, value.name);
            self.description(&path, value.description.as_deref());
            self.line(&format!(
                "{}{}",
                value.name,
                directives_suffix(&value.directives)
            ));
        }
        self.indent_level -= 1;
        self.line("}");
    }

    fn print_input_object(&mut self, t: &InputObjectType) {
        let mut head = self.head(t.extension, &t.name, t.description.as_deref());
        head.push_str(&format!("input {}", t.name));
        head.push_str(&directives_suffix(&t.directives));
        if t.fields.is_empty() {
            self.line(&head);
            return;
        }
        self.line(&format!("{head} {{"));
        self.indent_level += 1;
        for field in &t.fields {
            let path = format!("{}.{}", t.name, field.name);
            self.description(&path, field.description.as_deref());
            self.line(&input_value_text(field));
        }
        self.indent_level -= 1;
        self.line("}");
    }

    fn print_scalar(&mut self, t: &ScalarType) {
        let mut text = self.head(t.extension, &t.name, t.description.as_deref());
        text.push_str(&format!("scalar {}", t.name));
        text.push_str(&directives_suffix(&t.directives));
        self.line(&text);
    }

    fn print_directive_definition(&mut self, d: &DirectiveDefinition) {
        let path = format!("@{}", d.name);
        self.description(&path, d.description.as_deref());
        let args = self.arguments(&path, &d.arguments);
        let locations = d
            .locations
            .iter()
            .map(|location| location.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        let repeatable = if d.repeatable { " repeatable" } else { "" };
        let text = format!("directive @{}{args}{repeatable} on {locations}", d.name);
        let indent = self.indent();
        self.output.push_str(&indent);
        self.output.push_str(&text);
        self.output.push('\n');
    }

    fn print_schema(&mut self, s: &SchemaDefinition) {
        let mut head = self.head(s.extension, "schema", s.description.as_deref());
        head.push_str("schema");
        head.push_str(&directives_suffix(&s.directives));
        if s.operations.is_empty() {
            self.line(&head);
            return;
        }
        self.line(&format!("{head} {{"));
        self.indent_level += 1;
        for op in &s.operations {
            self.line(&format!("{}: {}", op.operation, op.type_name));
        }
        self.indent_level -= 1;
        self.line("}");
    }
}

fn input_value_text(value: &InputValue) -> String {
    let mut text = format!("{}: {}", value.name, value.ty);
    if let Some(default) = &value.default_value {
        text.push_str(&format!(" = {default}"));
    }
    text.push_str(&directives_suffix(&value.directives));
    text
}

fn directives_suffix(directives: &[DirectiveUsage]) -> String {
    directives.iter().map(|d| format!(" {d}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn round_trip(source: &str) -> String {
        print_document(&parse(source).unwrap())
    }

    #[test]
    fn test_prints_types_with_interfaces_and_directives() {
        let out = round_trip("type User implements Node & Entity @key(fields: \"id\") { id: ID! }");
        assert_eq!(
            out,
            "type User implements Node & Entity @key(fields: \"id\") {\n  id: ID!\n}\n"
        );
    }

    #[test]
    fn test_prints_declarations_separated_by_blank_line() {
        let out = round_trip("scalar Date union U = A | B");
        assert_eq!(out, "scalar Date\n\nunion U = A | B\n");
    }

    #[test]
    fn test_prints_inline_and_described_arguments() {
        let inline = round_trip("type Q { f(a: Int = 1, b: [String!]): Int }");
        assert_eq!(inline, "type Q {\n  f(a: Int = 1, b: [String!]): Int\n}\n");

        let described = round_trip("type Q { f(\"the a\" a: Int): Int }");
        assert_eq!(
            described,
            "type Q {\n  f(\n    \"the a\"\n    a: Int\n  ): Int\n}\n"
        );
    }

    #[test]
    fn test_prints_block_description_for_multi_line_text() {
        let out = round_trip("\"\"\"\nline one\nline two\n\"\"\"\nscalar S");
        assert_eq!(out, "\"\"\"\nline one\nline two\n\"\"\"\nscalar S\n");
    }

    #[test]
    fn test_prints_extensions_without_descriptions() {
        let out = round_trip("extend type User @tag { age: Int }");
        assert_eq!(out, "extend type User @tag {\n  age: Int\n}\n");
    }

    #[test]
    fn test_prints_directive_definition_and_schema() {
        let out = round_trip(
            "directive @auth(role: String = \"admin\") repeatable on OBJECT | FIELD_DEFINITION\nschema { query: Q }",
        );
        assert_eq!(
            out,
            "directive @auth(role: String = \"admin\") repeatable on OBJECT | FIELD_DEFINITION\n\nschema {\n  query: Q\n}\n"
        );
    }

    #[test]
    fn test_comment_descriptions_prefer_lookup_then_literal() {
        let doc = parse("\"literal\" type User { \"field doc\" id: ID name: String }").unwrap();
        let mut comments = HashMap::new();
        comments.insert("User.name".to_string(), "from comment".to_string());
        let options = PrintOptions {
            comment_descriptions: true,
            ..Default::default()
        };

        let out = print_document_with(&doc, &options, &comments);
        assert_eq!(
            out,
            "# literal\ntype User {\n  # field doc\n  id: ID\n  # from comment\n  name: String\n}\n"
        );
    }

    #[test]
    fn test_print_declaration_renders_single_node() {
        let doc = parse("\"A user\" type User implements Node { id: ID! }").unwrap();
        assert_eq!(
            print_declaration(&doc.definitions[0]),
            "\"A user\"\ntype User implements Node {\n  id: ID!\n}\n"
        );
    }

    #[test]
    fn test_enum_and_input_printing() {
        let out = round_trip("enum Color { RED GREEN @deprecated } input F { a: Int = 1 }");
        assert_eq!(
            out,
            "enum Color {\n  RED\n  GREEN @deprecated\n}\n\ninput F {\n  a: Int = 1\n}\n"
        );
    }
}
