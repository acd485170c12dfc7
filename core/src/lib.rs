//! Core declaration tree and text handling for schema definition documents.
//!
//! This crate defines the foundational types for modeling type-system
//! documents:
//!
//! - [`Document`]: an ordered list of [`Declaration`]s.
//! - [`Declaration`]: object types, interfaces, unions, enums, input
//!   objects, scalars, directive definitions and the root schema block.
//! - [`TypeRef`], [`Value`], [`DirectiveUsage`]: the shared building blocks.
//!
//! Text enters through [`parse`] / [`parse_source`] and leaves through
//! [`print_document`] / [`print_document_with`]. [`ExecutableSchema`] is a
//! validated, extension-folded view of a document that can be turned back
//! into one with [`ExecutableSchema::to_document`].
//!
//! # Example
//!
//! ```
//! use sdl_merge_core::*;
//!
//! let doc = parse(r#"
//!     "A registered account"
//!     type User { id: ID!, name: String }
//! "#).unwrap();
//!
//! let Some(Declaration::Object(user)) = doc.find("User") else { panic!() };
//! assert_eq!(user.description.as_deref(), Some("A registered account"));
//! assert_eq!(user.field_names(), vec!["id", "name"]);
//! assert!(print_document(&doc).starts_with("\"A registered account\"\ntype User {"));
//! ```

mod error;
mod executable;
mod lexer;
mod parser;
mod printer;
mod types;

pub use error::{BuildError, Result, SyntaxError};
pub use executable::ExecutableSchema;
pub use lexer::block_string_value;
pub use parser::{DEFAULT_ORIGIN, Source, parse, parse_source};
pub use printer::{
    CommentLookup, NoComments, PrintOptions, print_declaration, print_document,
    print_document_with,
};
pub use types::*;
