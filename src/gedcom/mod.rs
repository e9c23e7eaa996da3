// src/gedcom/mod.rs
//! GEDCOM 5.5 text handling: tokenize, validate, serialize.

pub mod tokenizer;
pub mod types;
pub mod validator;
pub mod writer;

pub use tokenizer::Tokenizer;
pub use types::{Record, Xref};
pub use validator::{classify, validate, Classification, HeaderField, ValidationRule};
pub use writer::render;

use crate::error::Result;
use crate::graph::{self, Graph};

/// Tokenizes, validates and builds a graph from file text.
///
/// # Errors
/// Returns the first format, validation or cycle error found.
pub fn parse_str(text: &str) -> Result<Graph> {
    let records = validate(Tokenizer::new(text))?;
    graph::build(&records)
}

/// Like [`parse_str`] for raw file bytes.
///
/// # Errors
/// Same as [`parse_str`].
pub fn parse_bytes(bytes: &[u8]) -> Result<Graph> {
    parse_str(&tokenizer::decode(bytes))
}

#[must_use]
pub fn classify_str(text: &str) -> Classification {
    classify(Tokenizer::new(text))
}
