//! Flattening of heterogeneous input into declarations.
//!
//! [`collect`] walks a [`SchemaInput`] depth-first and returns every
//! declaration it reaches, in input order. Reference-carrying inputs are
//! visited at most once per call; a second encounter of the same allocation
//! is skipped, which bounds traversal of self-referential thunks and
//! sequences. Structurally equal inputs behind distinct allocations are
//! each traversed.

use std::collections::HashSet;

use sdl_merge_core::{Declaration, parse, parse_source};
use tracing::debug;

use crate::error::{MergeError, Result};
use crate::input::SchemaInput;

/// Flattens `input` into an ordered list of declarations.
///
/// # Errors
///
/// Returns [`MergeError::Syntax`] when text input fails to parse and
/// [`MergeError::InvalidInput`] for [`SchemaInput::Unsupported`] values.
///
/// # Examples
///
/// ```
/// use sdl_merge::{SchemaInput, collect};
///
/// let input = SchemaInput::from(vec![
///     SchemaInput::from("type A { a: Int }"),
///     SchemaInput::thunk(|| SchemaInput::from("type B { b: Int } scalar C")),
/// ]);
/// let names: Vec<_> = collect(&input).unwrap().iter().filter_map(|d| d.name().map(String::from)).collect();
/// assert_eq!(names, vec!["A", "B", "C"]);
/// ```
pub fn collect(input: &SchemaInput) -> Result<Vec<Declaration>> {
    let mut collector = SourceCollector::default();
    collector.visit(input)?;
    debug!(
        declarations = collector.nodes.len(),
        inputs = collector.retained.len(),
        "Collected declarations"
    );
    Ok(collector.nodes)
}

#[derive(Default)]
struct SourceCollector {
    /// Identities of reference-carrying inputs already visited.
    visited: HashSet<usize>,
    /// Keeps visited allocations alive so their addresses stay unique.
    retained: Vec<SchemaInput>,
    nodes: Vec<Declaration>,
}

impl SourceCollector {
    fn visit(&mut self, input: &SchemaInput) -> Result<()> {
        if let Some(identity) = input.identity() {
            if !self.visited.insert(identity) {
                debug!(tag = input.tag(), "Skipping already visited input");
                return Ok(());
            }
            self.retained.push(input.clone());
        }

        match input {
            SchemaInput::Thunk(producer) => {
                let produced = (**producer)();
                self.visit(&produced)
            }
            SchemaInput::Sequence(items) => {
                for item in items.iter() {
                    self.visit(item)?;
                }
                Ok(())
            }
            SchemaInput::Executable(schema) => {
                let doc = schema.to_document();
                debug!(declarations = doc.len(), "Derived document from executable schema");
                self.nodes.extend(doc.definitions);
                Ok(())
            }
            SchemaInput::Text(text) => {
                let doc = parse(text)?;
                debug!(bytes = text.len(), declarations = doc.len(), "Parsed text");
                self.nodes.extend(doc.definitions);
                Ok(())
            }
            SchemaInput::Source(source) => {
                let doc = parse_source(source)?;
                debug!(origin = %source.name, declarations = doc.len(), "Parsed source");
                self.nodes.extend(doc.definitions);
                Ok(())
            }
            SchemaInput::Declaration(decl) => {
                self.nodes.push(decl.clone());
                Ok(())
            }
            SchemaInput::Document(doc) => {
                self.nodes.extend(doc.definitions.iter().cloned());
                Ok(())
            }
            SchemaInput::Unsupported { type_name, .. } => Err(MergeError::InvalidInput {
                type_name: (*type_name).to_string(),
            }),
        }
    }
}
