// src/lib.rs
//! GEDCOM 5.5 genealogy engine.
//!
//! Files are tokenized and validated by [`gedcom`], built into a [`graph::Graph`],
//! queried and mutated there, and written back through [`store::Library`].

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod exit;
pub mod gedcom;
pub mod graph;
pub mod store;

pub use error::{GedcomError, Result};
