//! Heterogeneous merge input.
//!
//! [`SchemaInput`] is a closed sum over every shape the collector accepts.
//! Compound shapes (sequences, thunks) and pre-built trees are held behind
//! an [`Arc`]; the collector uses that allocation as the input's identity
//! when guarding against self-referential inputs.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use sdl_merge_core::{Declaration, Document, ExecutableSchema, Source};

/// Zero-argument producer of further input.
pub type Thunk = Arc<dyn Fn() -> SchemaInput + Send + Sync>;

/// One unit of merge input.
///
/// # Examples
///
/// ```
/// use sdl_merge::SchemaInput;
///
/// let input = SchemaInput::from(vec![
///     SchemaInput::from("type User { id: ID }"),
///     SchemaInput::thunk(|| SchemaInput::from("type Query { me: User }")),
/// ]);
/// assert_eq!(input.tag(), "sequence");
/// ```
#[derive(Clone)]
pub enum SchemaInput {
    /// Raw schema text.
    Text(String),
    /// Schema text with an origin name used in syntax errors.
    Source(Source),
    /// Already-parsed document.
    Document(Arc<Document>),
    /// Built executable schema; its equivalent document is merged.
    Executable(Arc<ExecutableSchema>),
    /// A single declaration.
    Declaration(Declaration),
    /// Ordered collection of further inputs.
    Sequence(Arc<Vec<SchemaInput>>),
    /// Deferred input, invoked once during collection.
    Thunk(Thunk),
    /// A value of some other type; always rejected.
    Unsupported {
        type_name: &'static str,
        value: Arc<dyn Any + Send + Sync>,
    },
}

impl SchemaInput {
    pub fn thunk<F>(producer: F) -> Self
    where
        F: Fn() -> SchemaInput + Send + Sync + 'static,
    {
        Self::Thunk(Arc::new(producer))
    }

    pub fn sequence(items: Vec<SchemaInput>) -> Self {
        Self::Sequence(Arc::new(items))
    }

    /// Wraps a value of an unaccepted type so it can be passed through and
    /// reported by name.
    pub fn unsupported<T: Any + Send + Sync>(value: T) -> Self {
        Self::Unsupported {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Short name of the variant, used in logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Source(_) => "source",
            Self::Document(_) => "document",
            Self::Executable(_) => "executable",
            Self::Declaration(_) => "declaration",
            Self::Sequence(_) => "sequence",
            Self::Thunk(_) => "thunk",
            Self::Unsupported { .. } => "unsupported",
        }
    }

    /// Address of the shared allocation for reference-carrying variants.
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Self::Document(doc) => Some(Arc::as_ptr(doc) as *const () as usize),
            Self::Executable(schema) => Some(Arc::as_ptr(schema) as *const () as usize),
            Self::Sequence(items) => Some(Arc::as_ptr(items) as *const () as usize),
            Self::Thunk(thunk) => Some(Arc::as_ptr(thunk) as *const () as usize),
            Self::Text(_)
            | Self::Source(_)
            | Self::Declaration(_)
            | Self::Unsupported { .. } => None,
        }
    }
}

impl fmt::Debug for SchemaInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Source(source) => f.debug_tuple("Source").field(&source.name).finish(),
            Self::Document(doc) => f.debug_tuple("Document").field(&doc.len()).finish(),
            Self::Executable(_) => f.write_str("Executable(..)"),
            Self::Declaration(decl) => f.debug_tuple("Declaration").field(&decl.path()).finish(),
            Self::Sequence(items) => f.debug_list().entries(items.iter()).finish(),
            Self::Thunk(_) => f.write_str("Thunk(..)"),
            Self::Unsupported { type_name, .. } => {
                f.debug_tuple("Unsupported").field(type_name).finish()
            }
        }
    }
}

impl From<&str> for SchemaInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SchemaInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Source> for SchemaInput {
    fn from(source: Source) -> Self {
        Self::Source(source)
    }
}

impl From<Document> for SchemaInput {
    fn from(doc: Document) -> Self {
        Self::Document(Arc::new(doc))
    }
}

impl From<ExecutableSchema> for SchemaInput {
    fn from(schema: ExecutableSchema) -> Self {
        Self::Executable(Arc::new(schema))
    }
}

impl From<Declaration> for SchemaInput {
    fn from(decl: Declaration) -> Self {
        Self::Declaration(decl)
    }
}

impl From<Vec<SchemaInput>> for SchemaInput {
    fn from(items: Vec<SchemaInput>) -> Self {
        Self::sequence(items)
    }
}
