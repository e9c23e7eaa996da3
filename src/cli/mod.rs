// src/cli/mod.rs
//! CLI command handlers.

pub mod args;
pub mod dispatch;
pub mod display;
pub mod handlers;

pub use args::{Cli, Commands};
