//! Final ordering and rendering of merged declarations.

use std::fmt;

use sdl_merge_core::{Declaration, Document, PrintOptions, print_document, print_document_with};
use tracing::debug;

use crate::comments::CommentRegistry;
use crate::config::{MergeConfig, SortOrder, lexical_order};

/// Result of a merge: a tree, or text when descriptions are rendered as
/// comments.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutput {
    Tree(Document),
    Text(String),
}

impl MergeOutput {
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Tree(doc) => Some(doc),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Tree(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    pub fn into_document(self) -> Option<Document> {
        match self {
            Self::Tree(doc) => Some(doc),
            Self::Text(_) => None,
        }
    }

    /// Pretty JSON: the document structure, or the text as a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Self::Tree(doc) => doc.to_json(),
            Self::Text(text) => serde_json::to_string_pretty(text),
        }
    }

    /// Schema text; trees are printed with string-literal descriptions.
    pub fn to_sdl(&self) -> String {
        match self {
            Self::Tree(doc) => print_document(doc),
            Self::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for MergeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(doc) => f.write_str(&print_document(doc)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Orders `declarations` per `config.sort` and renders them.
///
/// In comment mode, each description slot is printed as `#` lines taken
/// from `comments` when it has an entry for the node, else from the literal
/// description.
pub fn serialize(
    declarations: Vec<Declaration>,
    config: &MergeConfig,
    comments: &CommentRegistry,
) -> MergeOutput {
    let doc = ordered_document(declarations, &config.sort);
    if !config.comment_descriptions {
        return MergeOutput::Tree(doc);
    }
    debug!(
        declarations = doc.len(),
        comments = comments.len(),
        "Rendering with comment descriptions"
    );
    let options = PrintOptions {
        comment_descriptions: true,
        ..PrintOptions::default()
    };
    MergeOutput::Text(print_document_with(&doc, &options, comments))
}

/// Stable sort into a document; the root block is keyed as `None`.
pub(crate) fn ordered_document(mut declarations: Vec<Declaration>, sort: &SortOrder) -> Document {
    match sort {
        SortOrder::Unsorted => {}
        SortOrder::Lexical => declarations.sort_by(|a, b| lexical_order(a.name(), b.name())),
        SortOrder::Custom(compare) => declarations.sort_by(|a, b| (**compare)(a.name(), b.name())),
    }
    Document::new(declarations)
}

#[cfg(test)]
mod tests {
    use sdl_merge_core::{ScalarType, SchemaDefinition};

    use super::*;

    fn scalars(names: &[&str]) -> Vec<Declaration> {
        let mut decls: Vec<_> = names
            .iter()
            .map(|name| Declaration::Scalar(ScalarType::new(name)))
            .collect();
        decls.push(Declaration::Schema(SchemaDefinition::default()));
        decls
    }

    fn order(output: &MergeOutput) -> Vec<String> {
        output
            .as_document()
            .unwrap()
            .definitions
            .iter()
            .map(|d| d.name().unwrap_or("schema").to_string())
            .collect()
    }

    #[test]
    fn test_unsorted_keeps_input_order() {
        let out = serialize(scalars(&["Zebra", "Apple"]), &MergeConfig::default(), &CommentRegistry::new());
        assert_eq!(order(&out), vec!["Zebra", "Apple", "schema"]);
    }

    #[test]
    fn test_lexical_sort_places_root_last() {
        let config = MergeConfig::default().with_sort(SortOrder::Lexical);
        let out = serialize(scalars(&["Zebra", "Apple", "Mango"]), &config, &CommentRegistry::new());
        assert_eq!(order(&out), vec!["Apple", "Mango", "Zebra", "schema"]);
    }

    #[test]
    fn test_custom_comparator_sees_root_as_none() {
        let config = MergeConfig::default().with_sort(SortOrder::custom(|a, b| match (a, b) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, _) => std::cmp::Ordering::Less,
            (_, None) => std::cmp::Ordering::Greater,
            (Some(a), Some(b)) => b.cmp(a),
        }));
        let out = serialize(scalars(&["Apple", "Zebra"]), &config, &CommentRegistry::new());
        assert_eq!(order(&out), vec!["schema", "Zebra", "Apple"]);
    }

    #[test]
    fn test_comment_mode_renders_text() {
        let mut comments = CommentRegistry::new();
        comments.record("Date", "ISO-8601 date");
        let config = MergeConfig::default().with_comment_descriptions(true);
        let decls = vec![Declaration::Scalar(ScalarType::new("Date"))];
        let out = serialize(decls, &config, &comments);
        assert_eq!(out.as_text(), Some("# ISO-8601 date\nscalar Date\n"));
        assert!(out.as_document().is_none());
    }

    #[test]
    fn test_output_helpers() {
        let out = serialize(
            vec![Declaration::Scalar(ScalarType::new("Date"))],
            &MergeConfig::default(),
            &CommentRegistry::new(),
        );
        assert_eq!(out.to_sdl(), "scalar Date\n");
        assert_eq!(out.to_string(), "scalar Date\n");
        assert!(out.to_json().unwrap().contains("\"Date\""));
        assert_eq!(out.into_document().unwrap().len(), 1);
    }
}
